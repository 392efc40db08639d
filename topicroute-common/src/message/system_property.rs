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

use std::fmt;

use cheetah_string::CheetahString;
use serde::Deserialize;
use serde::Serialize;

/// Broker-defined message metadata addressable as `sys.<Name>` in filter expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SystemProperty {
    MessageId,
    CorrelationId,
    Subject,
    To,
    ReplyTo,
    ContentType,
    SessionId,
    ReplyToSessionId,
}

impl SystemProperty {
    pub const ALL: [SystemProperty; 8] = [
        SystemProperty::MessageId,
        SystemProperty::CorrelationId,
        SystemProperty::Subject,
        SystemProperty::To,
        SystemProperty::ReplyTo,
        SystemProperty::ContentType,
        SystemProperty::SessionId,
        SystemProperty::ReplyToSessionId,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SystemProperty::MessageId => "MessageId",
            SystemProperty::CorrelationId => "CorrelationId",
            SystemProperty::Subject => "Subject",
            SystemProperty::To => "To",
            SystemProperty::ReplyTo => "ReplyTo",
            SystemProperty::ContentType => "ContentType",
            SystemProperty::SessionId => "SessionId",
            SystemProperty::ReplyToSessionId => "ReplyToSessionId",
        }
    }

    /// Case-insensitive lookup. `Label` is accepted as the legacy name of `Subject`.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("Label") {
            return Some(SystemProperty::Subject);
        }
        SystemProperty::ALL
            .into_iter()
            .find(|property| property.name().eq_ignore_ascii_case(name))
    }

    /// Whether a rule action may SET this property. `MessageId` is assigned by the sender.
    #[inline]
    pub fn is_mutable(&self) -> bool {
        !matches!(self, SystemProperty::MessageId)
    }
}

impl fmt::Display for SystemProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// The system property block of a [`Message`](crate::Message).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct SystemProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<CheetahString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<CheetahString>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "Label")]
    pub subject: Option<CheetahString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<CheetahString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<CheetahString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<CheetahString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<CheetahString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_session_id: Option<CheetahString>,
}

impl SystemProperties {
    pub fn get(&self, property: SystemProperty) -> Option<&CheetahString> {
        self.slot(property).as_ref()
    }

    /// Replaces the property, returning the previous value. `None` clears it.
    pub fn set(&mut self, property: SystemProperty, value: Option<CheetahString>) -> Option<CheetahString> {
        std::mem::replace(self.slot_mut(property), value)
    }

    /// Properties that carry a value, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (SystemProperty, &CheetahString)> + '_ {
        SystemProperty::ALL
            .into_iter()
            .filter_map(move |property| self.get(property).map(|value| (property, value)))
    }

    fn slot(&self, property: SystemProperty) -> &Option<CheetahString> {
        match property {
            SystemProperty::MessageId => &self.message_id,
            SystemProperty::CorrelationId => &self.correlation_id,
            SystemProperty::Subject => &self.subject,
            SystemProperty::To => &self.to,
            SystemProperty::ReplyTo => &self.reply_to,
            SystemProperty::ContentType => &self.content_type,
            SystemProperty::SessionId => &self.session_id,
            SystemProperty::ReplyToSessionId => &self.reply_to_session_id,
        }
    }

    fn slot_mut(&mut self, property: SystemProperty) -> &mut Option<CheetahString> {
        match property {
            SystemProperty::MessageId => &mut self.message_id,
            SystemProperty::CorrelationId => &mut self.correlation_id,
            SystemProperty::Subject => &mut self.subject,
            SystemProperty::To => &mut self.to,
            SystemProperty::ReplyTo => &mut self.reply_to,
            SystemProperty::ContentType => &mut self.content_type,
            SystemProperty::SessionId => &mut self.session_id,
            SystemProperty::ReplyToSessionId => &mut self.reply_to_session_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_is_case_insensitive() {
        assert_eq!(SystemProperty::from_name("correlationid"), Some(SystemProperty::CorrelationId));
        assert_eq!(SystemProperty::from_name("SUBJECT"), Some(SystemProperty::Subject));
        assert_eq!(SystemProperty::from_name("Label"), Some(SystemProperty::Subject));
        assert_eq!(SystemProperty::from_name("ReplyToSessionId"), Some(SystemProperty::ReplyToSessionId));
        assert_eq!(SystemProperty::from_name("Priority"), None);
    }

    #[test]
    fn only_message_id_is_read_only() {
        let read_only: Vec<_> = SystemProperty::ALL.into_iter().filter(|p| !p.is_mutable()).collect();
        assert_eq!(read_only, vec![SystemProperty::MessageId]);
    }

    #[test]
    fn set_returns_previous_value() {
        let mut properties = SystemProperties::default();
        assert!(properties
            .set(SystemProperty::CorrelationId, Some(CheetahString::from("high")))
            .is_none());
        let previous = properties.set(SystemProperty::CorrelationId, Some(CheetahString::from("low")));
        assert_eq!(previous.as_ref().map(|v| v.as_str()), Some("high"));
        assert_eq!(properties.get(SystemProperty::CorrelationId).map(|v| v.as_str()), Some("low"));

        properties.set(SystemProperty::CorrelationId, None);
        assert!(properties.get(SystemProperty::CorrelationId).is_none());
    }

    #[test]
    fn iter_skips_unset_properties() {
        let properties = SystemProperties {
            subject: Some(CheetahString::from("red")),
            message_id: Some(CheetahString::from("m-1")),
            ..Default::default()
        };
        let names: Vec<_> = properties.iter().map(|(p, _)| p.name()).collect();
        assert_eq!(names, vec!["MessageId", "Subject"]);
    }

    #[test]
    fn serde_uses_pascal_case() {
        let properties: SystemProperties =
            serde_json::from_str(r#"{"CorrelationId":"high","Label":"red"}"#).unwrap();
        assert_eq!(properties.correlation_id.as_ref().map(|v| v.as_str()), Some("high"));
        assert_eq!(properties.subject.as_ref().map(|v| v.as_str()), Some("red"));

        let json = serde_json::to_string(&properties).unwrap();
        assert_eq!(json, r#"{"CorrelationId":"high","Subject":"red"}"#);
    }
}
