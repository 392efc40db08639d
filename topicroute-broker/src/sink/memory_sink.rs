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

use cheetah_string::CheetahString;
use dashmap::DashMap;
use topicroute_common::Message;
use topicroute_error::RouteError;
use topicroute_error::RouteResult;

use crate::sink::OutboundSink;

/// In-memory sink keeping one FIFO queue per subscription.
#[derive(Debug, Default)]
pub struct MemorySink {
    queues: DashMap<CheetahString, Vec<Message>>,
    capacity: Option<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that rejects deliveries once a subscription holds `capacity` messages.
    pub fn with_capacity(capacity: usize) -> Self {
        MemorySink {
            queues: DashMap::new(),
            capacity: Some(capacity),
        }
    }

    /// Messages queued for `subscription`, oldest first.
    pub fn messages(&self, subscription: &str) -> Vec<Message> {
        self.queues
            .get(subscription)
            .map(|queue| queue.value().clone())
            .unwrap_or_default()
    }

    pub fn len(&self, subscription: &str) -> usize {
        self.queues.get(subscription).map(|queue| queue.len()).unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.queues.iter().map(|queue| queue.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Removes and returns everything queued for `subscription`.
    pub fn drain(&self, subscription: &str) -> Vec<Message> {
        self.queues
            .get_mut(subscription)
            .map(|mut queue| std::mem::take(queue.value_mut()))
            .unwrap_or_default()
    }

    /// Subscriptions that received at least one message, sorted.
    pub fn subscription_names(&self) -> Vec<CheetahString> {
        let mut names: Vec<CheetahString> = self.queues.iter().map(|queue| queue.key().clone()).collect();
        names.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        names
    }
}

impl OutboundSink for MemorySink {
    async fn deliver(&self, subscription: &str, message: Message) -> RouteResult<()> {
        let mut queue = self.queues.entry(CheetahString::from(subscription)).or_default();
        if let Some(capacity) = self.capacity {
            if queue.len() >= capacity {
                return Err(RouteError::sink(
                    subscription,
                    format!("queue is full ({capacity} messages)"),
                ));
            }
        }
        queue.push(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queues_per_subscription() {
        let sink = MemorySink::new();
        sink.deliver("A", Message::new("1")).await.unwrap();
        sink.deliver("A", Message::new("2")).await.unwrap();
        sink.deliver("B", Message::new("3")).await.unwrap();

        assert_eq!(sink.len("A"), 2);
        assert_eq!(sink.total(), 3);
        assert_eq!(sink.messages("A")[1].body().as_ref(), b"2");
        assert_eq!(sink.subscription_names(), vec![CheetahString::from("A"), CheetahString::from("B")]);

        assert_eq!(sink.drain("A").len(), 2);
        assert_eq!(sink.len("A"), 0);
        assert!(sink.messages("missing").is_empty());
    }

    #[tokio::test]
    async fn capacity_is_enforced() {
        let sink = MemorySink::with_capacity(1);
        sink.deliver("A", Message::new("1")).await.unwrap();
        let err = sink.deliver("A", Message::new("2")).await.unwrap_err();
        assert!(matches!(err, RouteError::Sink { .. }));
        assert_eq!(sink.len("A"), 1);
    }
}
