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

use serde::Deserialize;
use serde::Serialize;
use topicroute_common::PropertyValue;
use topicroute_common::SystemProperty;
use topicroute_error::ParseError;

use crate::filter::CorrelationFilter;
use crate::filter::Filter;
use crate::filter::SqlFilter;

/// Serializable form of a [`Filter`], as written in topology files:
///
/// ```toml
/// filter = { type = "sql", expression = "color='blue' AND quantity=10" }
/// filter = { type = "correlation", subject = "red", correlation_id = "high" }
/// filter = { type = "true" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FilterDescription {
    #[default]
    True,
    False,
    Sql {
        expression: String,
    },
    Correlation {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        correlation_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none", alias = "label")]
        subject: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reply_to: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content_type: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reply_to_session_id: Option<String>,
        #[serde(default, skip_serializing_if = "HashMap::is_empty")]
        properties: HashMap<String, PropertyValue>,
    },
}

impl FilterDescription {
    pub fn sql(expression: impl Into<String>) -> Self {
        FilterDescription::Sql {
            expression: expression.into(),
        }
    }

    /// Builds the filter, parsing SQL expressions.
    pub fn build(&self) -> Result<Filter, ParseError> {
        Filter::try_from(self)
    }
}

impl TryFrom<&FilterDescription> for Filter {
    type Error = ParseError;

    fn try_from(description: &FilterDescription) -> Result<Self, Self::Error> {
        let filter = match description {
            FilterDescription::True => Filter::True,
            FilterDescription::False => Filter::False,
            FilterDescription::Sql { expression } => Filter::Sql(SqlFilter::new(expression)?),
            FilterDescription::Correlation {
                message_id,
                correlation_id,
                subject,
                to,
                reply_to,
                content_type,
                session_id,
                reply_to_session_id,
                properties,
            } => {
                let expected = [
                    (SystemProperty::MessageId, message_id),
                    (SystemProperty::CorrelationId, correlation_id),
                    (SystemProperty::Subject, subject),
                    (SystemProperty::To, to),
                    (SystemProperty::ReplyTo, reply_to),
                    (SystemProperty::ContentType, content_type),
                    (SystemProperty::SessionId, session_id),
                    (SystemProperty::ReplyToSessionId, reply_to_session_id),
                ];
                let mut filter = CorrelationFilter::new();
                for (property, value) in expected {
                    if let Some(value) = value {
                        filter = filter.with_system_property(property, value.as_str());
                    }
                }
                for (name, value) in properties {
                    filter = filter.with_property(name.as_str(), value.clone());
                }
                Filter::Correlation(filter)
            }
        };
        Ok(filter)
    }
}

impl TryFrom<FilterDescription> for Filter {
    type Error = ParseError;

    fn try_from(description: FilterDescription) -> Result<Self, Self::Error> {
        Filter::try_from(&description)
    }
}

impl Filter {
    /// Inverse of [`FilterDescription::build`].
    pub fn describe(&self) -> FilterDescription {
        match self {
            Filter::True => FilterDescription::True,
            Filter::False => FilterDescription::False,
            Filter::Sql(filter) => FilterDescription::sql(filter.expression_text()),
            Filter::Correlation(filter) => {
                let system = filter.system_properties();
                let owned = |property: SystemProperty| system.get(property).map(|value| value.to_string());
                FilterDescription::Correlation {
                    message_id: owned(SystemProperty::MessageId),
                    correlation_id: owned(SystemProperty::CorrelationId),
                    subject: owned(SystemProperty::Subject),
                    to: owned(SystemProperty::To),
                    reply_to: owned(SystemProperty::ReplyTo),
                    content_type: owned(SystemProperty::ContentType),
                    session_id: owned(SystemProperty::SessionId),
                    reply_to_session_id: owned(SystemProperty::ReplyToSessionId),
                    properties: filter
                        .properties()
                        .iter()
                        .map(|(name, value)| (name.to_string(), value.clone()))
                        .collect(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use topicroute_common::Message;

    use super::*;

    #[test]
    fn deserialize_tagged_descriptions() {
        let descriptions: Vec<FilterDescription> = serde_json::from_str(
            r#"[
                {"type": "true"},
                {"type": "sql", "expression": "color='blue' AND quantity=10"},
                {"type": "correlation", "subject": "red", "correlation_id": "high", "properties": {"quantity": 10}}
            ]"#,
        )
        .unwrap();
        assert_eq!(descriptions[0], FilterDescription::True);
        assert_eq!(descriptions[1], FilterDescription::sql("color='blue' AND quantity=10"));

        let filter = descriptions[2].build().unwrap();
        let message = Message::new("")
            .with_subject("red")
            .with_correlation_id("high")
            .with_property("quantity", 10);
        assert!(filter.matches(&message));
        assert!(!filter.matches(&Message::new("").with_subject("red")));
    }

    #[test]
    fn invalid_sql_fails_to_build() {
        let err = FilterDescription::sql("color = = 'x'").build().unwrap_err();
        assert_eq!(err.position(), 8);
    }

    #[test]
    fn describe_round_trips() {
        let filters = [
            Filter::True,
            Filter::False,
            Filter::sql("user.color='red'").unwrap(),
            Filter::Correlation(
                CorrelationFilter::new()
                    .with_subject("red")
                    .with_correlation_id("high")
                    .with_property("quantity", 10),
            ),
        ];
        for filter in filters {
            let description = filter.describe();
            let rebuilt = description.build().unwrap();
            assert_eq!(rebuilt.describe(), description);
        }
    }

    #[test]
    fn serialize_skips_unset_fields() {
        let description = Filter::Correlation(CorrelationFilter::new().with_subject("red")).describe();
        let json = serde_json::to_string(&description).unwrap();
        assert_eq!(json, r#"{"type":"correlation","subject":"red"}"#);
    }
}
