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
use std::sync::Arc;

use cheetah_string::CheetahString;
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;
use topicroute_common::Message;
use topicroute_error::EntityKind;
use topicroute_error::EvaluationError;
use topicroute_error::RouteError;
use topicroute_error::RouteResult;
use tracing::info;
use tracing::warn;

use crate::rule::Rule;
use crate::subscription::Subscription;

type SubscriptionSet = Arc<Vec<Arc<Subscription>>>;

/// A topic and its subscriptions.
///
/// The subscription set is an immutable snapshot swapped under a write lock. Publishing
/// takes the read lock only long enough to clone the snapshot, then evaluates without
/// holding it, so a publish sees either the old or the new rule set, never a mix.
#[derive(Debug)]
pub struct Topic {
    name: CheetahString,
    subscriptions: RwLock<SubscriptionSet>,
}

impl Topic {
    pub fn new(name: impl Into<CheetahString>) -> Self {
        Topic {
            name: name.into(),
            subscriptions: RwLock::new(Arc::new(Vec::new())),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Current subscription set, in creation order.
    pub fn snapshot(&self) -> SubscriptionSet {
        self.subscriptions.read().clone()
    }

    pub fn subscription(&self, name: &str) -> Option<Arc<Subscription>> {
        self.snapshot().iter().find(|s| s.name() == name).cloned()
    }

    pub fn subscription_names(&self) -> Vec<CheetahString> {
        self.snapshot()
            .iter()
            .map(|s| CheetahString::from(s.name()))
            .collect()
    }

    /// Creates a subscription. Without `initial_rule` it gets the `$Default` rule.
    pub fn create_subscription(&self, name: &str, initial_rule: Option<Rule>) -> RouteResult<()> {
        if name.trim().is_empty() {
            return Err(RouteError::illegal_argument("subscription name must not be empty"));
        }
        let mut guard = self.subscriptions.write();
        if guard.iter().any(|s| s.name() == name) {
            return Err(RouteError::duplicate_name(EntityKind::Subscription, name));
        }
        let subscription = match initial_rule {
            Some(rule) => Subscription::with_rule(name, rule),
            None => Subscription::new(name),
        };
        let mut next = Vec::clone(&guard);
        next.push(Arc::new(subscription));
        *guard = Arc::new(next);
        info!("created subscription {} on topic {}", name, self.name);
        Ok(())
    }

    pub fn delete_subscription(&self, name: &str) -> RouteResult<()> {
        let mut guard = self.subscriptions.write();
        let index = position(&guard, name)?;
        let mut next = Vec::clone(&guard);
        next.remove(index);
        *guard = Arc::new(next);
        info!("deleted subscription {} from topic {}", name, self.name);
        Ok(())
    }

    pub fn add_rule(&self, subscription: &str, rule: Rule) -> RouteResult<()> {
        let rule_name = rule.name().to_string();
        self.update_subscription(subscription, |s| s.add_rule(rule))?;
        info!(
            "added rule {} to subscription {} on topic {}",
            rule_name, subscription, self.name
        );
        Ok(())
    }

    pub fn delete_rule(&self, subscription: &str, rule_name: &str) -> RouteResult<()> {
        self.update_subscription(subscription, |s| s.delete_rule(rule_name).map(|_| ()))?;
        info!(
            "deleted rule {} from subscription {} on topic {}",
            rule_name, subscription, self.name
        );
        Ok(())
    }

    /// Copy-on-write update of one subscription. When `update` fails nothing is swapped in.
    fn update_subscription<F>(&self, name: &str, update: F) -> RouteResult<()>
    where
        F: FnOnce(&mut Subscription) -> RouteResult<()>,
    {
        let mut guard = self.subscriptions.write();
        let index = position(&guard, name)?;
        let mut updated = Subscription::clone(&guard[index]);
        update(&mut updated)?;
        let mut next = Vec::clone(&guard);
        next[index] = Arc::new(updated);
        *guard = Arc::new(next);
        Ok(())
    }

    /// Routes `message` to every subscription of the topic.
    ///
    /// Subscriptions are evaluated independently. One whose action fails is skipped,
    /// logged, and listed in [`PublishOutcome::failures`].
    pub fn publish(&self, message: &Message) -> PublishOutcome {
        let snapshot = self.snapshot();
        let mut outcome = PublishOutcome::default();
        for subscription in snapshot.iter() {
            self.route_one(subscription, message, &mut outcome);
        }
        outcome
    }

    /// Like [`Topic::publish`], checking `token` before each subscription.
    ///
    /// A cancelled publish returns [`RouteError::Cancelled`] and none of the copies built
    /// so far are handed out.
    pub fn publish_with_cancellation(
        &self,
        message: &Message,
        token: &CancellationToken,
    ) -> RouteResult<PublishOutcome> {
        self.publish_until(message, || token.is_cancelled())
    }

    /// Routes subscription by subscription, asking `stop` before each one.
    fn publish_until<F>(&self, message: &Message, mut stop: F) -> RouteResult<PublishOutcome>
    where
        F: FnMut() -> bool,
    {
        let snapshot = self.snapshot();
        let mut outcome = PublishOutcome::default();
        for subscription in snapshot.iter() {
            if stop() {
                info!("publish to topic {} cancelled", self.name);
                return Err(RouteError::cancelled(self.name.as_str()));
            }
            self.route_one(subscription, message, &mut outcome);
        }
        Ok(outcome)
    }

    fn route_one(&self, subscription: &Subscription, message: &Message, outcome: &mut PublishOutcome) {
        match subscription.route(message) {
            Ok(Some(copy)) => {
                outcome.deliveries.insert(CheetahString::from(subscription.name()), copy);
            }
            Ok(None) => {}
            Err(error) => {
                warn!(
                    "subscription {} on topic {} skipped message {:?}: {}",
                    subscription.name(),
                    self.name,
                    message.message_id(),
                    error
                );
                outcome.failures.push(SubscriptionFailure {
                    subscription: CheetahString::from(subscription.name()),
                    error,
                });
            }
        }
    }
}

fn position(subscriptions: &[Arc<Subscription>], name: &str) -> RouteResult<usize> {
    subscriptions
        .iter()
        .position(|s| s.name() == name)
        .ok_or_else(|| RouteError::not_found(EntityKind::Subscription, name))
}

/// A subscription skipped during a publish because its acting rule's action failed.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionFailure {
    pub subscription: CheetahString,
    pub error: EvaluationError,
}

/// Result of routing one message through a topic.
#[derive(Debug, Clone, Default)]
pub struct PublishOutcome {
    deliveries: HashMap<CheetahString, Message>,
    failures: Vec<SubscriptionFailure>,
}

impl PublishOutcome {
    /// Subscription name to delivered copy, for matching subscriptions only.
    pub fn deliveries(&self) -> &HashMap<CheetahString, Message> {
        &self.deliveries
    }

    pub fn into_deliveries(self) -> HashMap<CheetahString, Message> {
        self.deliveries
    }

    pub fn into_parts(self) -> (HashMap<CheetahString, Message>, Vec<SubscriptionFailure>) {
        (self.deliveries, self.failures)
    }

    pub fn failures(&self) -> &[SubscriptionFailure] {
        &self.failures
    }

    pub fn delivered_to(&self, subscription: &str) -> Option<&Message> {
        self.deliveries.get(subscription)
    }

    /// Names of matching subscriptions, sorted.
    pub fn matched(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.deliveries.keys().map(|name| name.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.deliveries.len()
    }
}
