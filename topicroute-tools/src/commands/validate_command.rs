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
use topicroute_broker::Rule;
use topicroute_broker::Topology;
use topicroute_error::RouteError;
use topicroute_error::RouteResult;
use topicroute_filter::SqlAction;
use topicroute_filter::SqlFilter;

use crate::commands::CommandExecute;
use crate::commands::TopologyArgs;

/// Checks a whole topology, or a single filter expression and action given inline.
#[derive(Debug, Clone, Parser)]
pub struct ValidateCommand {
    #[command(flatten)]
    topology_args: TopologyArgs,

    #[arg(short = 'e', long = "expression", required = false, help = "SQL filter expression to check")]
    expression: Option<String>,

    #[arg(short = 'a', long = "action", required = false, help = "SQL rule action to check")]
    action: Option<String>,
}

#[derive(Tabled, Debug, Clone)]
pub(crate) struct ValidationRow {
    #[tabled(rename = "Location")]
    location: String,

    #[tabled(rename = "Status")]
    status: String,
}

impl ValidationRow {
    fn new(location: String, result: RouteResult<String>) -> (Self, bool) {
        let ok = result.is_ok();
        let status = match result {
            Ok(parsed) => format!("OK {parsed}"),
            Err(error) => format!("ERROR {error}"),
        };
        (ValidationRow { location, status }, ok)
    }
}

impl ValidateCommand {
    /// Validation rows and the number of failures.
    pub(crate) fn check(&self) -> RouteResult<(Vec<ValidationRow>, usize)> {
        let mut results = Vec::new();
        if self.expression.is_some() || self.action.is_some() {
            if let Some(expression) = &self.expression {
                let parsed = SqlFilter::new(expression)
                    .map(|filter| filter.expression().to_string())
                    .map_err(RouteError::from);
                results.push(ValidationRow::new("expression".to_string(), parsed));
            }
            if let Some(action) = &self.action {
                let parsed = SqlAction::new(action).map(|action| {
                    action
                        .statements()
                        .iter()
                        .map(|statement| statement.to_string())
                        .collect::<Vec<_>>()
                        .join("; ")
                });
                results.push(ValidationRow::new("action".to_string(), parsed));
            }
        } else {
            let topology: Topology = self.topology_args.load()?;
            for topic in &topology.topics {
                for subscription in &topic.subscriptions {
                    for description in &subscription.rules {
                        let location = format!("{}/{}/{}", topic.name, subscription.name, description.name);
                        let parsed = Rule::from_description(description).map(|rule| rule.filter().to_string());
                        results.push(ValidationRow::new(location, parsed));
                    }
                }
            }
        }

        let failures = results.iter().filter(|(_, ok)| !ok).count();
        Ok((results.into_iter().map(|(row, _)| row).collect(), failures))
    }
}

impl CommandExecute for ValidateCommand {
    async fn execute(&self) -> RouteResult<()> {
        let (rows, failures) = self.check()?;
        let checked = rows.len();
        let mut table = Table::new(rows);
        table.with(Style::extended());
        println!("{table}");
        if failures > 0 {
            return Err(RouteError::illegal_argument(format!(
                "{failures} of {checked} checks failed"
            )));
        }
        println!("{checked} checks passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn inline_expression_and_action() {
        let cmd = ValidateCommand::try_parse_from([
            "validate",
            "-e",
            "color = 'red' AND quantity > 5",
            "-a",
            "SET quantity = quantity / 2; REMOVE priority",
        ])
        .unwrap();
        let (rows, failures) = cmd.check().unwrap();
        assert_eq!(failures, 0);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.status.starts_with("OK")));
    }

    #[test]
    fn reports_parse_position() {
        let cmd = ValidateCommand::try_parse_from(["validate", "-e", "color = "]).unwrap();
        let (rows, failures) = cmd.check().unwrap();
        assert_eq!(failures, 1);
        assert!(rows[0].status.starts_with("ERROR"));
        assert!(rows[0].status.contains("position"));
    }

    #[test]
    fn checks_every_rule_of_a_topology() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"topics":[{{"name":"orders","subscriptions":[{{"name":"s","rules":[
                {{"name":"good","filter":{{"type":"sql","expression":"a = 1"}}}},
                {{"name":"bad","filter":{{"type":"sql","expression":"a = = 1"}}}},
                {{"name":"readonly","filter":{{"type":"true"}},"action":"SET sys.MessageId = 'x'"}}
            ]}}]}}]}}"#
        )
        .unwrap();

        let cmd = ValidateCommand::try_parse_from(["validate", "-c", file.path().to_str().unwrap()]).unwrap();
        let (rows, failures) = cmd.check().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(failures, 2);
        assert_eq!(rows[1].location, "orders/s/bad");
    }

    #[test]
    fn sample_topology_is_valid() {
        let cmd = ValidateCommand::try_parse_from(["validate"]).unwrap();
        assert_eq!(cmd.check().unwrap().1, 0);
    }
}
