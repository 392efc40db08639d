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

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;
use tabled::settings::Style;
use tabled::Table;
use tabled::Tabled;
use topicroute_broker::PublishOutcome;
use topicroute_broker::TopicRouter;
use topicroute_common::Message;
use topicroute_error::RouteResult;

use crate::commands::default_topic;
use crate::commands::CommandExecute;
use crate::commands::TopologyArgs;
use crate::message_file::load_messages;

#[derive(Debug, Clone, Parser)]
pub struct RouteCommand {
    #[command(flatten)]
    topology_args: TopologyArgs,

    #[arg(short = 't', long = "topic", required = false, help = "topic name")]
    topic: Option<String>,

    #[arg(
        short = 'm',
        long = "message",
        required = true,
        value_name = "FILE",
        help = "JSON file with one message or an array of messages"
    )]
    message: PathBuf,

    #[arg(long = "json", help = "print delivered copies as JSON instead of a table")]
    json: bool,
}

#[derive(Tabled, Debug, Clone, PartialEq)]
pub(crate) struct DeliveryRow {
    #[tabled(rename = "Message")]
    message: String,

    #[tabled(rename = "Subscription")]
    subscription: String,

    #[tabled(rename = "CorrelationId")]
    correlation_id: String,

    #[tabled(rename = "Subject")]
    subject: String,

    #[tabled(rename = "Properties")]
    properties: String,
}

/// One row per delivered copy, then one per skipped subscription.
pub(crate) fn delivery_rows(message: &Message, outcome: &PublishOutcome) -> Vec<DeliveryRow> {
    let message_id = message.message_id().map(|id| id.to_string()).unwrap_or_default();
    let mut rows: Vec<DeliveryRow> = outcome
        .matched()
        .into_iter()
        .filter_map(|name| outcome.delivered_to(name).map(|copy| (name, copy)))
        .map(|(name, copy)| DeliveryRow {
            message: message_id.clone(),
            subscription: name.to_string(),
            correlation_id: copy.correlation_id().map(|v| v.to_string()).unwrap_or_default(),
            subject: copy.subject().map(|v| v.to_string()).unwrap_or_default(),
            properties: render_properties(copy),
        })
        .collect();
    rows.extend(outcome.failures().iter().map(|failure| DeliveryRow {
        message: message_id.clone(),
        subscription: failure.subscription.to_string(),
        correlation_id: String::new(),
        subject: String::new(),
        properties: format!("skipped: {}", failure.error),
    }));
    rows
}

fn render_properties(message: &Message) -> String {
    let mut properties: Vec<String> = message
        .application_properties()
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect();
    properties.sort();
    properties.join(", ")
}

impl CommandExecute for RouteCommand {
    async fn execute(&self) -> RouteResult<()> {
        let topology = self.topology_args.load()?;
        let router = TopicRouter::from_topology(&topology)?;
        let topic = self.topic.clone().unwrap_or_else(|| default_topic(&topology));
        let messages = load_messages(&self.message)?;

        let mut rows = Vec::new();
        let mut copies = Vec::new();
        for message in &messages {
            let outcome = router.publish(&topic, message)?;
            rows.extend(delivery_rows(message, &outcome));
            copies.push(
                outcome
                    .into_deliveries()
                    .into_iter()
                    .map(|(subscription, copy)| (subscription.to_string(), copy))
                    .collect::<BTreeMap<String, Message>>(),
            );
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&copies)?);
            return Ok(());
        }
        if rows.is_empty() {
            println!("No subscription of topic {topic} accepted the messages.");
            return Ok(());
        }
        let mut table = Table::new(rows);
        table.with(Style::extended());
        println!("{table}");
        Ok(())
    }
}
