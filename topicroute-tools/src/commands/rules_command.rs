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

use clap::Parser;
use tabled::settings::Style;
use tabled::Table;
use tabled::Tabled;
use topicroute_broker::TopicRouter;
use topicroute_error::EntityKind;
use topicroute_error::RouteError;
use topicroute_error::RouteResult;

use crate::commands::CommandExecute;
use crate::commands::TopologyArgs;

#[derive(Debug, Clone, Parser)]
pub struct RulesCommand {
    #[command(flatten)]
    topology_args: TopologyArgs,

    #[arg(short = 't', long = "topic", required = false, help = "topic name, all topics when omitted")]
    topic: Option<String>,

    #[arg(short = 's', long = "subscription", required = false, help = "subscription name")]
    subscription: Option<String>,
}

#[derive(Tabled, Debug, Clone)]
pub(crate) struct RuleRow {
    #[tabled(rename = "Topic")]
    topic: String,

    #[tabled(rename = "Subscription")]
    subscription: String,

    #[tabled(rename = "Rule")]
    rule: String,

    #[tabled(rename = "Filter")]
    filter: String,

    #[tabled(rename = "Action")]
    action: String,
}

impl RulesCommand {
    pub(crate) fn rows(&self, router: &TopicRouter) -> RouteResult<Vec<RuleRow>> {
        let topics = match &self.topic {
            Some(topic) => vec![router.topic(topic)?],
            None => router
                .topic_names()
                .iter()
                .map(|name| router.topic(name.as_str()))
                .collect::<RouteResult<Vec<_>>>()?,
        };

        let mut rows = Vec::new();
        for topic in topics {
            let subscriptions = match &self.subscription {
                Some(name) => vec![topic
                    .subscription(name)
                    .ok_or_else(|| RouteError::not_found(EntityKind::Subscription, name.as_str()))?],
                None => topic.snapshot().iter().cloned().collect(),
            };
            for subscription in subscriptions {
                for rule in subscription.rules() {
                    rows.push(RuleRow {
                        topic: topic.name().to_string(),
                        subscription: subscription.name().to_string(),
                        rule: rule.name().to_string(),
                        filter: rule.filter().to_string(),
                        action: rule.action().map(|action| action.text().to_string()).unwrap_or_default(),
                    });
                }
            }
        }
        Ok(rows)
    }
}

impl CommandExecute for RulesCommand {
    async fn execute(&self) -> RouteResult<()> {
        let router = TopicRouter::from_topology(&self.topology_args.load()?)?;
        let mut table = Table::new(self.rows(&router)?);
        table.with(Style::extended());
        println!("{table}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use topicroute_broker::Topology;

    use super::*;

    fn sample_router() -> TopicRouter {
        TopicRouter::from_topology(&Topology::sample()).unwrap()
    }

    #[test]
    fn lists_every_rule_in_order() {
        let cmd = RulesCommand::try_parse_from(["rules"]).unwrap();
        let rows = cmd.rows(&sample_router()).unwrap();
        let rules: Vec<_> = rows.iter().map(|row| row.rule.as_str()).collect();
        assert_eq!(
            rules,
            vec![
                "$Default",
                "BlueSize10Orders",
                "RedOrdersWithAction",
                "HighPriorityRedOrdersRule"
            ]
        );
        assert_eq!(rows[0].filter, "TrueFilter");
        assert!(rows[2].action.starts_with("SET quantity"));
    }

    #[test]
    fn filters_by_subscription() {
        let cmd = RulesCommand::try_parse_from(["rules", "-s", "ColorRed"]).unwrap();
        let rows = cmd.rows(&sample_router()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].filter, "SqlFilter(user.color='red')");

        let cmd = RulesCommand::try_parse_from(["rules", "-t", "missing"]).unwrap();
        assert!(matches!(cmd.rows(&sample_router()), Err(RouteError::NotFound { .. })));
    }
}
