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

use std::fmt;

use cheetah_string::CheetahString;
use serde::Deserialize;
use serde::Serialize;
use topicroute_error::RouteError;
use topicroute_error::RouteResult;
use topicroute_filter::EvaluationContext;
use topicroute_filter::Filter;
use topicroute_filter::FilterDescription;
use topicroute_filter::SqlAction;

/// Name of the rule every subscription starts with unless created with an explicit rule.
pub const DEFAULT_RULE_NAME: &str = "$Default";

/// A named filter with an optional action, attached to a subscription.
#[derive(Debug, Clone)]
pub struct Rule {
    name: CheetahString,
    filter: Filter,
    action: Option<SqlAction>,
}

impl Rule {
    pub fn new(name: impl Into<CheetahString>, filter: Filter) -> Self {
        Rule {
            name: name.into(),
            filter,
            action: None,
        }
    }

    /// The `$Default` rule: matches everything, no action.
    pub fn default_rule() -> Self {
        Rule::new(DEFAULT_RULE_NAME, Filter::True)
    }

    pub fn with_action(mut self, action: SqlAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Builds a rule from its serializable form, parsing the filter and the action.
    pub fn from_description(description: &RuleDescription) -> RouteResult<Self> {
        if description.name.trim().is_empty() {
            return Err(RouteError::illegal_argument("rule name must not be empty"));
        }
        let filter = description.filter.build()?;
        let action = description.action.as_deref().map(SqlAction::new).transpose()?;
        Ok(Rule {
            name: CheetahString::from(description.name.as_str()),
            filter,
            action,
        })
    }

    pub fn describe(&self) -> RuleDescription {
        RuleDescription {
            name: self.name.to_string(),
            filter: self.filter.describe(),
            action: self.action.as_ref().map(|action| action.text().to_string()),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    #[inline]
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    #[inline]
    pub fn action(&self) -> Option<&SqlAction> {
        self.action.as_ref()
    }

    #[inline]
    pub fn matches(&self, context: &dyn EvaluationContext) -> bool {
        self.filter.matches(context)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.filter)?;
        if let Some(action) = &self.action {
            write!(f, " -> {action}")?;
        }
        Ok(())
    }
}

/// Serializable form of a [`Rule`], as written in topology files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDescription {
    pub name: String,
    #[serde(default)]
    pub filter: FilterDescription,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl RuleDescription {
    pub fn new(name: impl Into<String>, filter: FilterDescription) -> Self {
        RuleDescription {
            name: name.into(),
            filter,
            action: None,
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use topicroute_common::Message;

    use super::*;

    #[test]
    fn default_rule_matches_everything() {
        let rule = Rule::default_rule();
        assert_eq!(rule.name(), "$Default");
        assert!(rule.matches(&Message::default()));
        assert!(rule.action().is_none());
    }

    #[test]
    fn from_description_parses_filter_and_action() {
        let description = RuleDescription::new("RedOrdersWithAction", FilterDescription::sql("user.color='red'"))
            .with_action("SET quantity = quantity / 2; REMOVE priority;SET sys.CorrelationId = 'low';");
        let rule = Rule::from_description(&description).unwrap();
        assert_eq!(rule.name(), "RedOrdersWithAction");
        assert_eq!(rule.action().map(|a| a.statements().len()), Some(3));
        assert_eq!(rule.describe(), description);
    }

    #[test]
    fn from_description_reports_errors() {
        let bad_filter = RuleDescription::new("r", FilterDescription::sql("color ="));
        assert!(matches!(Rule::from_description(&bad_filter), Err(RouteError::Parse(_))));

        let bad_action = RuleDescription::new("r", FilterDescription::True).with_action("SET sys.MessageId = 'x'");
        assert!(matches!(Rule::from_description(&bad_action), Err(RouteError::Action(_))));

        let unnamed = RuleDescription::new("  ", FilterDescription::True);
        assert!(matches!(
            Rule::from_description(&unnamed),
            Err(RouteError::IllegalArgument(_))
        ));
    }

    #[test]
    fn description_defaults_to_true_filter() {
        let description: RuleDescription = serde_json::from_str(r#"{"name": "all"}"#).unwrap();
        assert_eq!(description.filter, FilterDescription::True);
        assert!(description.action.is_none());
    }
}
