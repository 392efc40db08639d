// Copyright 2025 The TopicRoute Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::Serialize;
use topicroute_common::Message;

/// An order of the sample topology. Its fields become application properties; `priority` is
/// also the correlation id and `color` the subject.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Order {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<&'static str>,
}

impl Order {
    pub const fn new(color: &'static str, quantity: i64, priority: &'static str) -> Self {
        Order {
            color: Some(color),
            quantity: Some(quantity),
            priority: Some(priority),
        }
    }

    pub fn to_message(&self) -> Message {
        let body = serde_json::to_vec(self).unwrap_or_default();
        let mut message = Message::new(body);
        if let Some(color) = self.color {
            message = message.with_subject(color).with_property("color", color);
        }
        if let Some(quantity) = self.quantity {
            message = message.with_property("quantity", quantity);
        }
        if let Some(priority) = self.priority {
            message = message.with_correlation_id(priority).with_property("priority", priority);
        }
        message.ensure_message_id();
        message
    }
}

/// The thirteen orders of the sample, starting with one that carries no properties.
pub fn sample_orders() -> Vec<Order> {
    vec![
        Order::default(),
        Order::new("blue", 5, "low"),
        Order::new("red", 10, "high"),
        Order::new("yellow", 5, "low"),
        Order::new("blue", 10, "low"),
        Order::new("blue", 5, "high"),
        Order::new("blue", 10, "low"),
        Order::new("red", 5, "low"),
        Order::new("red", 10, "low"),
        Order::new("red", 5, "low"),
        Order::new("yellow", 10, "high"),
        Order::new("yellow", 5, "low"),
        Order::new("yellow", 10, "low"),
    ]
}

pub fn sample_messages() -> Vec<Message> {
    sample_orders().iter().map(Order::to_message).collect()
}

#[cfg(test)]
mod tests {
    use topicroute_common::PropertyValue;

    use super::*;

    #[test]
    fn order_message_properties() {
        let message = Order::new("red", 10, "high").to_message();
        assert_eq!(message.subject().map(|v| v.as_str()), Some("red"));
        assert_eq!(message.correlation_id().map(|v| v.as_str()), Some("high"));
        assert_eq!(message.property("quantity"), Some(&PropertyValue::Int(10)));
        assert!(message.message_id().is_some());
        assert_eq!(
            message.body().as_ref(),
            br#"{"Color":"red","Quantity":10,"Priority":"high"}"#
        );
    }

    #[test]
    fn default_order_has_no_properties() {
        let messages = sample_messages();
        assert_eq!(messages.len(), 13);
        assert!(messages[0].application_properties().is_empty());
        assert!(messages[0].subject().is_none());
        assert_eq!(messages[0].body().as_ref(), b"{}");
    }
}
