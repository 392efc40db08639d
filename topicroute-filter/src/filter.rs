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

//! Rule filters.
//!
//! A [`Filter`] decides whether a message matches a rule. The variants mirror what a
//! subscription rule can carry:
//!
//! - [`Filter::True`] and [`Filter::False`] match every message or none
//! - [`CorrelationFilter`] compares system and application properties for equality
//! - [`SqlFilter`] evaluates a boolean [`Expression`](crate::expression::Expression)
//!
//! Filters are built once, when a rule is created, and evaluated many times. Building a
//! filter is where syntax errors surface; evaluating one never fails from the caller's
//! point of view: [`Filter::matches`] reports evaluation errors as "no match".
//!
//! ```rust,ignore
//! use topicroute_filter::filter::Filter;
//!
//! let filter = Filter::sql("color = 'blue' AND quantity = 10")?;
//! let message = Message::new("").with_property("color", "blue").with_property("quantity", 10);
//! assert!(filter.matches(&message));
//! ```

mod correlation_filter;
mod filter_description;
mod sql_filter;

use std::fmt;

pub use correlation_filter::CorrelationFilter;
pub use filter_description::FilterDescription;
pub use sql_filter::SqlFilter;
use topicroute_error::EvaluationError;
use topicroute_error::ParseError;
use tracing::debug;

use crate::expression::evaluation_context::EvaluationContext;

#[derive(Debug, Clone)]
pub enum Filter {
    True,
    False,
    Correlation(CorrelationFilter),
    Sql(SqlFilter),
}

impl Filter {
    /// Parses `expression` into a [`Filter::Sql`].
    pub fn sql(expression: &str) -> Result<Filter, ParseError> {
        SqlFilter::new(expression).map(Filter::Sql)
    }

    /// Whether the message matches. Evaluation errors count as no match and are logged.
    pub fn matches(&self, context: &dyn EvaluationContext) -> bool {
        match self.try_matches(context) {
            Ok(matched) => matched,
            Err(error) => {
                debug!("filter {} treated as not matching: {}", self, error);
                false
            }
        }
    }

    /// Like [`Filter::matches`], but surfaces evaluation errors.
    pub fn try_matches(&self, context: &dyn EvaluationContext) -> Result<bool, EvaluationError> {
        match self {
            Filter::True => Ok(true),
            Filter::False => Ok(false),
            Filter::Correlation(filter) => Ok(filter.matches(context)),
            Filter::Sql(filter) => filter.try_matches(context),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Filter::True => "true",
            Filter::False => "false",
            Filter::Correlation(_) => "correlation",
            Filter::Sql(_) => "sql",
        }
    }
}

impl From<CorrelationFilter> for Filter {
    fn from(filter: CorrelationFilter) -> Self {
        Filter::Correlation(filter)
    }
}

impl From<SqlFilter> for Filter {
    fn from(filter: SqlFilter) -> Self {
        Filter::Sql(filter)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::True => write!(f, "TrueFilter"),
            Filter::False => write!(f, "FalseFilter"),
            Filter::Correlation(filter) => write!(f, "{filter}"),
            Filter::Sql(filter) => write!(f, "{filter}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use topicroute_common::Message;

    use super::*;

    fn blue_order() -> Message {
        Message::new("")
            .with_property("color", "blue")
            .with_property("quantity", 10)
    }

    #[test]
    fn true_and_false_filters() {
        assert!(Filter::True.matches(&blue_order()));
        assert!(Filter::True.matches(&Message::default()));
        assert!(!Filter::False.matches(&blue_order()));
    }

    #[test]
    fn sql_filter_matches() {
        let filter = Filter::sql("color='blue' AND quantity=10").unwrap();
        assert!(filter.matches(&blue_order()));
        assert!(!filter.matches(&Message::default()));
        assert_eq!(filter.kind(), "sql");
    }

    #[test]
    fn evaluation_errors_do_not_match() {
        let filter = Filter::sql("quantity / 0 = 1").unwrap();
        assert!(!filter.matches(&blue_order()));
        assert_eq!(
            filter.try_matches(&blue_order()).unwrap_err(),
            EvaluationError::DivisionByZero
        );
    }

    #[test]
    fn non_boolean_result_does_not_match() {
        let filter = Filter::sql("quantity + 1").unwrap();
        assert!(!filter.matches(&blue_order()));
        assert_eq!(
            filter.try_matches(&blue_order()).unwrap_err(),
            EvaluationError::NonBooleanResult("integer")
        );
    }

    #[test]
    fn parse_errors_surface_at_construction() {
        let err = Filter::sql("color = ").unwrap_err();
        assert_eq!(err.position(), 8);
    }

    #[test]
    fn display() {
        assert_eq!(Filter::True.to_string(), "TrueFilter");
        assert_eq!(
            Filter::sql("user.color='red'").unwrap().to_string(),
            "SqlFilter(user.color='red')"
        );
        let filter: Filter = CorrelationFilter::new().with_subject("red").into();
        assert_eq!(filter.to_string(), "CorrelationFilter(Subject='red')");
    }
}
