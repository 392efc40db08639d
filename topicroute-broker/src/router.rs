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

use std::sync::Arc;

use cheetah_string::CheetahString;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use topicroute_common::Message;
use topicroute_error::EntityKind;
use topicroute_error::RouteError;
use topicroute_error::RouteResult;
use tracing::info;
use tracing::warn;

use crate::rule::Rule;
use crate::rule::RuleDescription;
use crate::sink::OutboundSink;
use crate::topic::PublishOutcome;
use crate::topic::SubscriptionFailure;
use crate::topic::Topic;
use crate::topology::Topology;

/// Holds every topic and backs the provisioning and publish operations.
///
/// `TopicRouter` is `Send + Sync`; share it behind an `Arc`. Topics are looked up in a
/// [`DashMap`] and each publish works on the topic's current subscription snapshot, so
/// publishes for independent messages run fully in parallel.
#[derive(Debug, Default)]
pub struct TopicRouter {
    topics: DashMap<CheetahString, Arc<Topic>>,
}

impl TopicRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provisions topics, subscriptions and rules described by `topology`.
    ///
    /// A subscription listed without rules gets `$Default`. The first error aborts and is
    /// returned; the partially provisioned router is dropped.
    pub fn from_topology(topology: &Topology) -> RouteResult<Self> {
        let router = TopicRouter::new();
        for topic in &topology.topics {
            router.create_topic(&topic.name)?;
            for subscription in &topic.subscriptions {
                let mut rules = subscription.rules.iter();
                let initial_rule = rules.next().map(Rule::from_description).transpose()?;
                router.create_subscription(&topic.name, &subscription.name, initial_rule)?;
                for rule in rules {
                    router.add_rule(&topic.name, &subscription.name, Rule::from_description(rule)?)?;
                }
            }
        }
        Ok(router)
    }

    pub fn create_topic(&self, name: &str) -> RouteResult<Arc<Topic>> {
        if name.trim().is_empty() {
            return Err(RouteError::illegal_argument("topic name must not be empty"));
        }
        match self.topics.entry(CheetahString::from(name)) {
            Entry::Occupied(_) => Err(RouteError::duplicate_name(EntityKind::Topic, name)),
            Entry::Vacant(entry) => {
                let topic = Arc::new(Topic::new(name));
                entry.insert(topic.clone());
                info!("created topic {}", name);
                Ok(topic)
            }
        }
    }

    pub fn delete_topic(&self, name: &str) -> RouteResult<()> {
        self.topics
            .remove(name)
            .map(|_| info!("deleted topic {}", name))
            .ok_or_else(|| RouteError::not_found(EntityKind::Topic, name))
    }

    pub fn topic(&self, name: &str) -> RouteResult<Arc<Topic>> {
        self.topics
            .get(name)
            .map(|topic| topic.value().clone())
            .ok_or_else(|| RouteError::not_found(EntityKind::Topic, name))
    }

    /// Topic names, sorted.
    pub fn topic_names(&self) -> Vec<CheetahString> {
        let mut names: Vec<CheetahString> = self.topics.iter().map(|topic| topic.key().clone()).collect();
        names.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        names
    }

    pub fn create_subscription(&self, topic: &str, name: &str, initial_rule: Option<Rule>) -> RouteResult<()> {
        self.topic(topic)?.create_subscription(name, initial_rule)
    }

    pub fn delete_subscription(&self, topic: &str, name: &str) -> RouteResult<()> {
        self.topic(topic)?.delete_subscription(name)
    }

    pub fn add_rule(&self, topic: &str, subscription: &str, rule: Rule) -> RouteResult<()> {
        self.topic(topic)?.add_rule(subscription, rule)
    }

    pub fn delete_rule(&self, topic: &str, subscription: &str, rule_name: &str) -> RouteResult<()> {
        self.topic(topic)?.delete_rule(subscription, rule_name)
    }

    /// Rules of a subscription, in evaluation order.
    pub fn rules(&self, topic: &str, subscription: &str) -> RouteResult<Vec<RuleDescription>> {
        self.topic(topic)?
            .subscription(subscription)
            .map(|s| s.describe_rules())
            .ok_or_else(|| RouteError::not_found(EntityKind::Subscription, subscription))
    }

    pub fn publish(&self, topic: &str, message: &Message) -> RouteResult<PublishOutcome> {
        Ok(self.topic(topic)?.publish(message))
    }

    pub fn publish_with_cancellation(
        &self,
        topic: &str,
        message: &Message,
        token: &CancellationToken,
    ) -> RouteResult<PublishOutcome> {
        self.topic(topic)?.publish_with_cancellation(message, token)
    }

    /// Publishes `message` and hands every copy to `sink`.
    ///
    /// Deliveries for different subscriptions run concurrently. A rejected delivery is
    /// logged and reported in the summary; it is not retried.
    pub async fn dispatch<S>(&self, topic: &str, message: &Message, sink: &S) -> RouteResult<DispatchSummary>
    where
        S: OutboundSink + Sync,
    {
        let outcome = self.publish(topic, message)?;
        Ok(deliver(outcome, sink).await)
    }

    /// [`TopicRouter::publish_batch`] followed by delivery of every copy to `sink`.
    /// Summaries keep input order.
    pub async fn dispatch_batch<S>(
        &self,
        topic: &str,
        messages: Vec<Message>,
        sink: &S,
    ) -> RouteResult<Vec<DispatchSummary>>
    where
        S: OutboundSink + Sync,
    {
        let outcomes = self.publish_batch(topic, messages).await?;
        let mut summaries = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            summaries.push(deliver(outcome, sink).await);
        }
        Ok(summaries)
    }

    /// Routes `messages` in parallel, one tokio task per message. Outcomes keep input order.
    pub async fn publish_batch(&self, topic: &str, messages: Vec<Message>) -> RouteResult<Vec<PublishOutcome>> {
        let topic = self.topic(topic)?;
        let handles: Vec<_> = messages
            .into_iter()
            .map(|message| {
                let topic = topic.clone();
                tokio::spawn(async move { topic.publish(&message) })
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .map(|joined| joined.map_err(|e| RouteError::Internal(format!("publish task failed: {e}"))))
            .collect()
    }
}

async fn deliver<S>(outcome: PublishOutcome, sink: &S) -> DispatchSummary
where
    S: OutboundSink + Sync,
{
    let (deliveries, failures) = outcome.into_parts();
    let results = join_all(deliveries.into_iter().map(|(subscription, copy)| async move {
        let result = sink.deliver(subscription.as_str(), copy).await;
        (subscription, result)
    }))
    .await;

    let mut summary = DispatchSummary {
        delivered: Vec::with_capacity(results.len()),
        sink_failures: Vec::new(),
        evaluation_failures: failures,
    };
    for (subscription, result) in results {
        match result {
            Ok(()) => summary.delivered.push(subscription),
            Err(error) => {
                warn!("sink rejected message for subscription {}: {}", subscription, error);
                summary.sink_failures.push((subscription, error));
            }
        }
    }
    summary.delivered.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    summary
}

/// Result of [`TopicRouter::dispatch`] for one message.
#[derive(Debug, Default)]
pub struct DispatchSummary {
    /// Subscriptions whose copy the sink accepted, sorted.
    pub delivered: Vec<CheetahString>,
    pub sink_failures: Vec<(CheetahString, RouteError)>,
    pub evaluation_failures: Vec<SubscriptionFailure>,
}

#[cfg(test)]
mod tests {
    use topicroute_filter::Filter;

    use super::*;
    use crate::sink::MemorySink;

    #[test]
    fn topic_lifecycle() {
        let router = TopicRouter::new();
        router.create_topic("b").unwrap();
        router.create_topic("a").unwrap();
        assert!(matches!(router.create_topic("a"), Err(RouteError::DuplicateName { .. })));
        assert_eq!(router.topic_names(), vec![CheetahString::from("a"), CheetahString::from("b")]);

        router.delete_topic("a").unwrap();
        assert!(matches!(router.delete_topic("a"), Err(RouteError::NotFound { .. })));
        assert!(matches!(
            router.publish("a", &Message::default()),
            Err(RouteError::NotFound { .. })
        ));
    }

    #[test]
    fn provisioning_forwards_to_topic() {
        let router = TopicRouter::new();
        router.create_topic("orders").unwrap();
        router.create_subscription("orders", "Red", None).unwrap();
        router.delete_rule("orders", "Red", "$Default").unwrap();
        router
            .add_rule("orders", "Red", Rule::new("red", Filter::sql("color='red'").unwrap()))
            .unwrap();

        let rules = router.rules("orders", "Red").unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name, "red");
        assert!(router.rules("orders", "Blue").is_err());

        let outcome = router
            .publish("orders", &Message::new("").with_property("color", "red"))
            .unwrap();
        assert_eq!(outcome.matched(), vec!["Red"]);

        router.delete_subscription("orders", "Red").unwrap();
        assert!(router.publish("orders", &Message::default()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn dispatch_reports_sink_failures() {
        let router = TopicRouter::new();
        router.create_topic("orders").unwrap();
        router.create_subscription("orders", "A", None).unwrap();
        router.create_subscription("orders", "B", None).unwrap();

        let sink = MemorySink::with_capacity(1);
        let summary = router.dispatch("orders", &Message::new("1"), &sink).await.unwrap();
        assert_eq!(summary.delivered, vec![CheetahString::from("A"), CheetahString::from("B")]);
        assert!(summary.sink_failures.is_empty());

        let summary = router.dispatch("orders", &Message::new("2"), &sink).await.unwrap();
        assert!(summary.delivered.is_empty());
        assert_eq!(summary.sink_failures.len(), 2);
        assert_eq!(sink.total(), 2);
    }

    #[tokio::test]
    async fn dispatch_batch_delivers_in_input_order() {
        let router = TopicRouter::new();
        router.create_topic("orders").unwrap();
        router
            .create_subscription("orders", "Red", Some(Rule::new("red", Filter::sql("color='red'").unwrap())))
            .unwrap();

        let messages = vec![
            Message::new("1").with_property("color", "red"),
            Message::new("2").with_property("color", "blue"),
            Message::new("3").with_property("color", "red"),
        ];
        let sink = MemorySink::new();
        let summaries = router.dispatch_batch("orders", messages, &sink).await.unwrap();

        let delivered: Vec<usize> = summaries.iter().map(|summary| summary.delivered.len()).collect();
        assert_eq!(delivered, vec![1, 0, 1]);
        let bodies: Vec<_> = sink.messages("Red").iter().map(|m| m.body().clone()).collect();
        assert_eq!(bodies, vec!["1", "3"]);
    }
}
