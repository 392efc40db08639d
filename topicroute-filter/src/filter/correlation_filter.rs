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

use std::collections::HashMap;
use std::fmt;

use cheetah_string::CheetahString;
use topicroute_common::PropertyValue;
use topicroute_common::SystemProperties;
use topicroute_common::SystemProperty;

use crate::expression::evaluation_context::EvaluationContext;
use crate::expression::fmt_literal;

/// Equality filter over system and application properties.
///
/// Every configured field must equal the message's field; unset fields are wildcards.
/// Application properties compare by value and type, so an expected `10` does not match a
/// message carrying `10.0` or `'10'`. A filter with nothing configured matches every message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrelationFilter {
    system_properties: SystemProperties,
    properties: HashMap<CheetahString, PropertyValue>,
}

impl CorrelationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_correlation_id(self, correlation_id: impl Into<CheetahString>) -> Self {
        self.with_system_property(SystemProperty::CorrelationId, correlation_id)
    }

    pub fn with_subject(self, subject: impl Into<CheetahString>) -> Self {
        self.with_system_property(SystemProperty::Subject, subject)
    }

    pub fn with_message_id(self, message_id: impl Into<CheetahString>) -> Self {
        self.with_system_property(SystemProperty::MessageId, message_id)
    }

    pub fn with_system_property(mut self, property: SystemProperty, value: impl Into<CheetahString>) -> Self {
        self.system_properties.set(property, Some(value.into()));
        self
    }

    pub fn with_property(mut self, name: impl Into<CheetahString>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn system_properties(&self) -> &SystemProperties {
        &self.system_properties
    }

    pub fn properties(&self) -> &HashMap<CheetahString, PropertyValue> {
        &self.properties
    }

    pub fn matches(&self, context: &dyn EvaluationContext) -> bool {
        self.system_properties
            .iter()
            .all(|(property, expected)| context.system_property(property) == Some(expected))
            && self
                .properties
                .iter()
                .all(|(name, expected)| context.user_property(name.as_str()) == Some(expected))
    }
}

impl fmt::Display for CorrelationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CorrelationFilter(")?;
        let mut first = true;
        for (property, value) in self.system_properties.iter() {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{}='{}'", property.name(), value)?;
        }
        let mut names: Vec<_> = self.properties.keys().collect();
        names.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        for name in names {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{name}=")?;
            fmt_literal(&self.properties[name], f)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use topicroute_common::Message;

    use super::*;

    fn high_priority_red() -> CorrelationFilter {
        CorrelationFilter::new().with_subject("red").with_correlation_id("high")
    }

    #[test]
    fn all_configured_fields_must_match() {
        let filter = high_priority_red();
        let red_high = Message::new("").with_subject("red").with_correlation_id("high");
        let red_low = Message::new("").with_subject("red").with_correlation_id("low");
        let unlabelled = Message::new("").with_correlation_id("high");

        assert!(filter.matches(&red_high));
        assert!(!filter.matches(&red_low));
        assert!(!filter.matches(&unlabelled));
    }

    #[test]
    fn unset_fields_are_wildcards() {
        let filter = CorrelationFilter::new().with_subject("red");
        let message = Message::new("")
            .with_subject("red")
            .with_message_id("m-1")
            .with_property("anything", 1);
        assert!(filter.matches(&message));
        assert!(CorrelationFilter::new().matches(&Message::default()));
    }

    #[test]
    fn property_equality_is_by_value_and_type() {
        let filter = CorrelationFilter::new().with_property("quantity", 10);
        assert!(filter.matches(&Message::new("").with_property("quantity", 10)));
        assert!(!filter.matches(&Message::new("").with_property("quantity", 10.0)));
        assert!(!filter.matches(&Message::new("").with_property("quantity", "10")));
        assert!(!filter.matches(&Message::default()));
    }

    #[test]
    fn property_order_is_irrelevant() {
        let filter = CorrelationFilter::new()
            .with_property("color", "red")
            .with_property("priority", "high");
        let forward = Message::new("")
            .with_property("color", "red")
            .with_property("priority", "high");
        let backward = Message::new("")
            .with_property("priority", "high")
            .with_property("color", "red");
        assert_eq!(filter.matches(&forward), filter.matches(&backward));
        assert!(filter.matches(&forward));
    }

    #[test]
    fn display_lists_configured_fields() {
        let filter = high_priority_red().with_property("quantity", 10).with_property("color", "red");
        assert_eq!(
            filter.to_string(),
            "CorrelationFilter(CorrelationId='high', Subject='red', color='red', quantity=10)"
        );
    }
}
