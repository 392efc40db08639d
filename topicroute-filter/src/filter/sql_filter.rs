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
use topicroute_common::PropertyValue;
use topicroute_error::EvaluationError;
use topicroute_error::ParseError;

use crate::expression::evaluation_context::EvaluationContext;
use crate::expression::Expression;

/// Boolean expression filter.
///
/// The expression text is parsed once by [`SqlFilter::new`]. A message matches when the
/// expression evaluates to `TRUE`; `NULL` means no match.
#[derive(Debug, Clone)]
pub struct SqlFilter {
    expression_text: CheetahString,
    expression: Expression,
}

impl SqlFilter {
    pub fn new(expression_text: &str) -> Result<Self, ParseError> {
        let expression = Expression::parse(expression_text)?;
        Ok(SqlFilter {
            expression_text: CheetahString::from(expression_text),
            expression,
        })
    }

    /// The expression as written when the filter was created.
    pub fn expression_text(&self) -> &str {
        self.expression_text.as_str()
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn try_matches(&self, context: &dyn EvaluationContext) -> Result<bool, EvaluationError> {
        match self.expression.evaluate(context)? {
            PropertyValue::Bool(matched) => Ok(matched),
            PropertyValue::Null => Ok(false),
            other => Err(EvaluationError::NonBooleanResult(other.type_name())),
        }
    }

    pub fn matches(&self, context: &dyn EvaluationContext) -> bool {
        self.try_matches(context).unwrap_or(false)
    }
}

impl PartialEq for SqlFilter {
    fn eq(&self, other: &Self) -> bool {
        self.expression == other.expression
    }
}

impl fmt::Display for SqlFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SqlFilter({})", self.expression_text)
    }
}

#[cfg(test)]
mod tests {
    use topicroute_common::Message;

    use super::*;

    #[test]
    fn keeps_original_text() {
        let filter = SqlFilter::new("color='blue'  AND quantity=10").unwrap();
        assert_eq!(filter.expression_text(), "color='blue'  AND quantity=10");
        assert_eq!(filter.expression().to_string(), "((color = 'blue') AND (quantity = 10))");
    }

    #[test]
    fn null_result_is_no_match() {
        let filter = SqlFilter::new("size").unwrap();
        assert_eq!(filter.try_matches(&Message::default()), Ok(false));
    }

    #[test]
    fn equality_ignores_formatting() {
        let a = SqlFilter::new("color='red'").unwrap();
        let b = SqlFilter::new("color = 'red'").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn oversized_filter_fails_at_creation() {
        let chain = (0..100_000)
            .map(|i| format!("color = 'c{i}'"))
            .collect::<Vec<_>>()
            .join(" OR ");
        assert!(SqlFilter::new(&chain).is_err());

        let chain = (0..200)
            .map(|i| format!("color = 'c{i}'"))
            .collect::<Vec<_>>()
            .join(" OR ");
        let filter = SqlFilter::new(&chain).unwrap();
        assert!(filter.matches(&Message::default().with_property("color", "c199")));
        assert!(!filter.matches(&Message::default().with_property("color", "red")));
    }
}
