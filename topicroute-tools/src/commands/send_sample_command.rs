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
use topicroute_broker::MemorySink;
use topicroute_broker::TopicRouter;
use topicroute_error::RouteResult;
use tracing::info;
use tracing::warn;

use crate::commands::default_topic;
use crate::commands::CommandExecute;
use crate::commands::TopologyArgs;
use crate::sample::sample_messages;

#[derive(Debug, Clone, Parser)]
pub struct SendSampleCommand {
    #[command(flatten)]
    topology_args: TopologyArgs,

    #[arg(short = 't', long = "topic", required = false, help = "topic name")]
    topic: Option<String>,
}

#[derive(Tabled, Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReceivedRow {
    #[tabled(rename = "Subscription")]
    pub(crate) subscription: String,

    #[tabled(rename = "Received")]
    pub(crate) received: usize,
}

impl SendSampleCommand {
    /// Routes the sample orders in parallel and returns, per subscription of the topic, how
    /// many copies landed in the sink.
    pub(crate) async fn run(&self) -> RouteResult<Vec<ReceivedRow>> {
        let topology = self.topology_args.load()?;
        let router = TopicRouter::from_topology(&topology)?;
        let topic = self.topic.clone().unwrap_or_else(|| default_topic(&topology));

        let messages = sample_messages();
        info!("sending {} sample orders to topic {}", messages.len(), topic);
        let sink = MemorySink::new();
        let summaries = router.dispatch_batch(&topic, messages, &sink).await?;
        let rejected: usize = summaries.iter().map(|summary| summary.sink_failures.len()).sum();
        if rejected > 0 {
            warn!("{} sample deliveries were rejected by the sink", rejected);
        }

        Ok(router
            .topic(&topic)?
            .subscription_names()
            .into_iter()
            .map(|name| ReceivedRow {
                received: sink.len(name.as_str()),
                subscription: name.to_string(),
            })
            .collect())
    }
}

impl CommandExecute for SendSampleCommand {
    async fn execute(&self) -> RouteResult<()> {
        let mut table = Table::new(self.run().await?);
        table.with(Style::extended());
        println!("{table}");
        Ok(())
    }
}
