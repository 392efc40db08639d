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

mod route_command;
mod rules_command;
mod send_sample_command;
mod validate_command;

use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use tabled::settings::Style;
use tabled::Table;
use tabled::Tabled;
use topicroute_broker::topology::SAMPLE_TOPIC;
use topicroute_broker::Topology;
use topicroute_error::RouteResult;
use tracing::info;

pub use route_command::RouteCommand;
pub use rules_command::RulesCommand;
pub use send_sample_command::SendSampleCommand;
pub use validate_command::ValidateCommand;

/// Execution behavior shared by every admin command.
#[allow(async_fn_in_trait)]
pub trait CommandExecute {
    async fn execute(&self) -> RouteResult<()>;
}

/// Topology selection shared by commands that route or inspect rules.
#[derive(Debug, Args, Clone, Default)]
pub struct TopologyArgs {
    #[arg(
        short = 'c',
        long = "topology",
        value_name = "FILE",
        help = "Topology file (toml, yaml or json); the built-in order sample when omitted"
    )]
    pub topology: Option<PathBuf>,
}

impl TopologyArgs {
    pub fn load(&self) -> RouteResult<Topology> {
        match &self.topology {
            Some(path) => {
                info!("loading topology from {}", path.display());
                Topology::load(path)
            }
            None => Ok(Topology::sample()),
        }
    }
}

/// Topic to use when none is given: the only topic of a single-topic topology, otherwise the
/// sample topic.
pub(crate) fn default_topic(topology: &Topology) -> String {
    match topology.topics.as_slice() {
        [only] => only.name.clone(),
        _ => SAMPLE_TOPIC.to_string(),
    }
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        name = "route",
        about = "Route messages through a topic",
        long_about = r#"Route the messages of a JSON file through a topic and print the copy every
matching subscription receives, after rule actions."#
    )]
    Route(RouteCommand),

    #[command(
        name = "validate",
        about = "Validate a topology",
        long_about = r#"Parse every filter and action of a topology and report the ones that fail."#
    )]
    Validate(ValidateCommand),

    #[command(name = "rules", about = "List subscriptions and rules")]
    Rules(RulesCommand),

    #[command(
        name = "send-sample",
        about = "Route the sample orders",
        long_about = r#"Publish the thirteen sample orders in parallel and print how many each
subscription received."#
    )]
    SendSample(SendSampleCommand),

    #[command(about = "Category commands show")]
    Show(ClassificationTablePrint),
}

impl CommandExecute for Commands {
    async fn execute(&self) -> RouteResult<()> {
        match self {
            Commands::Route(value) => value.execute().await,
            Commands::Validate(value) => value.execute().await,
            Commands::Rules(value) => value.execute().await,
            Commands::SendSample(value) => value.execute().await,
            Commands::Show(value) => value.execute().await,
        }
    }
}

// ================for commands table print================
#[derive(Tabled, Clone)]
struct Command {
    #[tabled(rename = "Category")]
    category: &'static str,

    #[tabled(rename = "Command")]
    command: &'static str,

    #[tabled(rename = "Remark")]
    remark: &'static str,
}

#[derive(Parser)]
pub struct ClassificationTablePrint;

impl CommandExecute for ClassificationTablePrint {
    async fn execute(&self) -> RouteResult<()> {
        let commands = vec![
            Command {
                category: "Routing",
                command: "route",
                remark: "Route messages through a topic.",
            },
            Command {
                category: "Routing",
                command: "send-sample",
                remark: "Route the sample orders.",
            },
            Command {
                category: "Topology",
                command: "rules",
                remark: "List subscriptions and rules.",
            },
            Command {
                category: "Topology",
                command: "validate",
                remark: "Validate a topology.",
            },
        ];
        let mut table = Table::new(commands);
        table.with(Style::extended());
        print!("{table}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use topicroute_broker::topology::TopicConfig;

    use super::*;

    #[test]
    fn default_topic_prefers_single_topic() {
        let mut topology = Topology::default();
        assert_eq!(default_topic(&topology), SAMPLE_TOPIC);

        topology.topics.push(TopicConfig {
            name: "orders".to_string(),
            subscriptions: vec![],
        });
        assert_eq!(default_topic(&topology), "orders");
    }

    #[test]
    fn missing_topology_file_fails() {
        let args = TopologyArgs {
            topology: Some(PathBuf::from("no-such-topology.toml")),
        };
        assert!(args.load().is_err());
        assert_eq!(TopologyArgs::default().load().unwrap(), Topology::sample());
    }
}
