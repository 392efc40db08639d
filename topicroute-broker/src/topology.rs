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

use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use topicroute_common::utils::parse_config_file::parse_config_file;
use topicroute_error::RouteResult;
use topicroute_filter::FilterDescription;

use crate::rule::RuleDescription;

/// Name of the topic provisioned by [`Topology::sample`].
pub const SAMPLE_TOPIC: &str = "topicfiltersampletopic";

/// Declarative description of topics, subscriptions and rules.
///
/// Loaded from any format the `config` crate understands, for example TOML:
///
/// ```toml
/// [[topics]]
/// name = "orders"
///
/// [[topics.subscriptions]]
/// name = "BlueOrders"
///
/// [[topics.subscriptions.rules]]
/// name = "blue"
/// filter = { type = "sql", expression = "color = 'blue'" }
/// action = "SET priority = 'low'"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Topology {
    pub topics: Vec<TopicConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicConfig {
    pub name: String,
    #[serde(default)]
    pub subscriptions: Vec<SubscriptionConfig>,
}

/// A subscription and its rules in evaluation order. No rules means the `$Default` rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionConfig {
    pub name: String,
    #[serde(default)]
    pub rules: Vec<RuleDescription>,
}

impl Topology {
    pub fn load(path: impl AsRef<Path>) -> RouteResult<Self> {
        parse_config_file(path.as_ref().to_path_buf())
    }

    pub fn from_json_str(json: &str) -> RouteResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The order-routing sample: one topic with four subscriptions covering every filter kind
    /// and a rule action.
    pub fn sample() -> Self {
        let subscription = |name: &str, rules: Vec<RuleDescription>| SubscriptionConfig {
            name: name.to_string(),
            rules,
        };
        Topology {
            topics: vec![TopicConfig {
                name: SAMPLE_TOPIC.to_string(),
                subscriptions: vec![
                    subscription("AllOrders", vec![]),
                    subscription(
                        "ColorBlueSize10Orders",
                        vec![RuleDescription::new(
                            "BlueSize10Orders",
                            FilterDescription::sql("color='blue' AND quantity=10"),
                        )],
                    ),
                    subscription(
                        "ColorRed",
                        vec![RuleDescription::new("RedOrdersWithAction", FilterDescription::sql("user.color='red'"))
                            .with_action("SET quantity = quantity / 2; REMOVE priority;SET sys.CorrelationId = 'low';")],
                    ),
                    subscription(
                        "HighPriorityRedOrders",
                        vec![RuleDescription::new(
                            "HighPriorityRedOrdersRule",
                            FilterDescription::Correlation {
                                message_id: None,
                                correlation_id: Some("high".to_string()),
                                subject: Some("red".to_string()),
                                to: None,
                                reply_to: None,
                                content_type: None,
                                session_id: None,
                                reply_to_session_id: None,
                                properties: Default::default(),
                            },
                        )],
                    ),
                ],
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use topicroute_error::RouteError;

    use super::*;

    #[test]
    fn load_toml_topology() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
[[topics]]
name = "orders"

[[topics.subscriptions]]
name = "all"

[[topics.subscriptions]]
name = "blue"

[[topics.subscriptions.rules]]
name = "blue"
filter = {{ type = "sql", expression = "color = 'blue'" }}
action = "SET priority = 'low'"

[[topics.subscriptions.rules]]
name = "urgent"
filter = {{ type = "correlation", correlation_id = "high" }}
"#
        )
        .unwrap();

        let topology = Topology::load(file.path()).unwrap();
        assert_eq!(topology.topics.len(), 1);
        let topic = &topology.topics[0];
        assert_eq!(topic.name, "orders");
        assert!(topic.subscriptions[0].rules.is_empty());

        let rules = &topic.subscriptions[1].rules;
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].filter, FilterDescription::sql("color = 'blue'"));
        assert_eq!(rules[0].action.as_deref(), Some("SET priority = 'low'"));
        assert!(matches!(
            &rules[1].filter,
            FilterDescription::Correlation { correlation_id: Some(id), .. } if id == "high"
        ));
    }

    #[test]
    fn json_topology_defaults() {
        let topology = Topology::from_json_str(r#"{"topics":[{"name":"t","subscriptions":[{"name":"s"}]}]}"#).unwrap();
        assert_eq!(topology.topics[0].subscriptions[0].name, "s");
        assert!(topology.topics[0].subscriptions[0].rules.is_empty());

        assert!(matches!(Topology::from_json_str("{"), Err(RouteError::Json(_))));
    }

    #[test]
    fn sample_survives_json() {
        let sample = Topology::sample();
        let json = serde_json::to_string(&sample).unwrap();
        assert_eq!(Topology::from_json_str(&json).unwrap(), sample);
    }
}
