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
use topicroute_common::Message;
use topicroute_error::EntityKind;
use topicroute_error::EvaluationError;
use topicroute_error::RouteError;
use topicroute_error::RouteResult;
use tracing::debug;

use crate::rule::Rule;
use crate::rule::RuleDescription;

/// A named recipient of a topic's messages, gated by an ordered rule set.
///
/// A message matches the subscription when any rule matches. Rules are tried in insertion
/// order and the first match is the acting rule: its action, and only its action, is
/// applied to the subscription's copy. A subscription without rules receives nothing.
#[derive(Debug, Clone)]
pub struct Subscription {
    name: CheetahString,
    rules: Vec<Arc<Rule>>,
}

impl Subscription {
    /// Creates the subscription with the `$Default` rule.
    pub fn new(name: impl Into<CheetahString>) -> Self {
        Self::with_rule(name, Rule::default_rule())
    }

    /// Creates the subscription with `rule` in place of `$Default`.
    pub fn with_rule(name: impl Into<CheetahString>, rule: Rule) -> Self {
        Subscription {
            name: name.into(),
            rules: vec![Arc::new(rule)],
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    #[inline]
    pub fn rules(&self) -> &[Arc<Rule>] {
        &self.rules
    }

    pub fn rule(&self, name: &str) -> Option<&Arc<Rule>> {
        self.rules.iter().find(|rule| rule.name() == name)
    }

    pub fn describe_rules(&self) -> Vec<RuleDescription> {
        self.rules.iter().map(|rule| rule.describe()).collect()
    }

    pub fn add_rule(&mut self, rule: Rule) -> RouteResult<()> {
        if self.rule(rule.name()).is_some() {
            return Err(RouteError::duplicate_name(EntityKind::Rule, rule.name()));
        }
        self.rules.push(Arc::new(rule));
        Ok(())
    }

    pub fn delete_rule(&mut self, name: &str) -> RouteResult<Arc<Rule>> {
        let index = self
            .rules
            .iter()
            .position(|rule| rule.name() == name)
            .ok_or_else(|| RouteError::not_found(EntityKind::Rule, name))?;
        Ok(self.rules.remove(index))
    }

    /// First rule, in insertion order, whose filter matches `message`.
    pub fn acting_rule(&self, message: &Message) -> Option<&Arc<Rule>> {
        self.rules.iter().find(|rule| rule.matches(message))
    }

    /// The copy this subscription receives, or `None` when no rule matches.
    ///
    /// `message` is never modified. An action failure discards the copy and is returned
    /// as an error.
    pub fn route(&self, message: &Message) -> Result<Option<Message>, EvaluationError> {
        let Some(rule) = self.acting_rule(message) else {
            debug!("subscription {} filtered out message {:?}", self.name, message.message_id());
            return Ok(None);
        };
        let copy = message.clone();
        match rule.action() {
            Some(action) => action.apply(copy).map(Some),
            None => Ok(Some(copy)),
        }
    }
}
