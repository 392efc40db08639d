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

//! SQL-like expression language over message properties.
//!
//! The grammar covers what rule filters and actions need:
//!
//! - comparison: `=`, `<>` (also `!=`), `<`, `<=`, `>`, `>=`
//! - logic: `AND`, `OR`, `NOT`
//! - arithmetic: `+`, `-`, `*`, `/`, `%` and unary `-`
//! - predicates: `IS [NOT] NULL`, `[NOT] LIKE 'pattern' [ESCAPE 'c']`, `[NOT] IN (...)`,
//!   `EXISTS(property)`
//! - literals: `'string'` (`''` escapes a quote), integers, floats, `TRUE`, `FALSE`, `NULL`
//! - properties: `name` or `user.name` for application properties, `sys.Name` for system
//!   properties, `[any name]` for application property names that are not plain identifiers
//!
//! Keywords and system property names are case-insensitive; application property names are
//! not.
//!
//! ```ignore
//! let expression = Expression::parse("color = 'blue' AND quantity = 10")?;
//! let message = Message::new("").with_property("color", "blue").with_property("quantity", 10);
//! assert_eq!(expression.evaluate(&message)?, PropertyValue::Bool(true));
//! ```

pub mod empty_evaluation_context;
pub mod evaluation_context;
mod evaluator;
pub(crate) mod lexer;
pub mod like_pattern;
pub(crate) mod parser;

use std::fmt;

use cheetah_string::CheetahString;
use topicroute_common::PropertyValue;
use topicroute_common::SystemProperty;
use topicroute_error::EvaluationError;
use topicroute_error::ParseError;

use crate::constant::BinaryType;
use crate::constant::UnaryType;
use crate::expression::evaluation_context::EvaluationContext;
use crate::expression::like_pattern::LikePattern;

/// A property reference: application (`user.`) or system (`sys.`) property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyRef {
    User(CheetahString),
    System(SystemProperty),
}

impl PropertyRef {
    pub fn user(name: impl Into<CheetahString>) -> Self {
        PropertyRef::User(name.into())
    }

    /// Current value in `context`; undefined properties are `NULL`.
    pub fn resolve(&self, context: &dyn EvaluationContext) -> PropertyValue {
        match self {
            PropertyRef::User(name) => context.user_property(name.as_str()).cloned().unwrap_or_default(),
            PropertyRef::System(property) => context
                .system_property(*property)
                .map(|value| PropertyValue::String(value.clone()))
                .unwrap_or_default(),
        }
    }

    pub fn exists(&self, context: &dyn EvaluationContext) -> bool {
        match self {
            PropertyRef::User(name) => context.user_property(name.as_str()).is_some(),
            PropertyRef::System(property) => context.system_property(*property).is_some(),
        }
    }
}

impl fmt::Display for PropertyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyRef::User(name) if parser::is_plain_identifier(name.as_str()) => write!(f, "{name}"),
            PropertyRef::User(name) => write!(f, "[{name}]"),
            PropertyRef::System(property) => write!(f, "sys.{}", property.name()),
        }
    }
}

/// Parsed expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(PropertyValue),
    Property(PropertyRef),
    Unary {
        op: UnaryType,
        operand: Box<Expression>,
    },
    Binary {
        op: BinaryType,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    IsNull {
        operand: Box<Expression>,
        negated: bool,
    },
    Like {
        operand: Box<Expression>,
        pattern: LikePattern,
        negated: bool,
    },
    In {
        operand: Box<Expression>,
        values: Vec<PropertyValue>,
        negated: bool,
    },
    Exists(PropertyRef),
}

impl Expression {
    /// Parses a complete expression. Trailing input is an error.
    pub fn parse(text: &str) -> Result<Expression, ParseError> {
        parser::parse_expression(text)
    }

    pub fn evaluate(&self, context: &dyn EvaluationContext) -> Result<PropertyValue, EvaluationError> {
        evaluator::evaluate(self, context)
    }

    pub(crate) fn binary(op: BinaryType, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub(crate) fn unary(op: UnaryType, operand: Expression) -> Self {
        Expression::Unary {
            op,
            operand: Box::new(operand),
        }
    }
}

/// Parses `text` into an [`Expression`].
pub fn parse(text: &str) -> Result<Expression, ParseError> {
    Expression::parse(text)
}

/// Evaluates `expression` against `context`.
pub fn evaluate(expression: &Expression, context: &dyn EvaluationContext) -> Result<PropertyValue, EvaluationError> {
    expression.evaluate(context)
}

pub(crate) fn fmt_literal(value: &PropertyValue, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        PropertyValue::Null => write!(f, "NULL"),
        PropertyValue::Bool(true) => write!(f, "TRUE"),
        PropertyValue::Bool(false) => write!(f, "FALSE"),
        PropertyValue::Int(value) => write!(f, "{value}"),
        PropertyValue::Float(value) => write!(f, "{value:?}"),
        PropertyValue::String(value) => write!(f, "'{}'", value.as_str().replace('\'', "''")),
    }
}

/// Renders the tree fully parenthesised, so the output re-parses to the same tree.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(value) => fmt_literal(value, f),
            Expression::Property(property) => write!(f, "{property}"),
            Expression::Unary {
                op: UnaryType::Not,
                operand,
            } => write!(f, "(NOT {operand})"),
            Expression::Unary {
                op: UnaryType::Negate,
                operand,
            } => write!(f, "(-{operand})"),
            Expression::Binary { op, left, right } => write!(f, "({left} {op} {right})"),
            Expression::IsNull { operand, negated } => {
                let not = if *negated { "NOT " } else { "" };
                write!(f, "({operand} IS {not}NULL)")
            }
            Expression::Like {
                operand,
                pattern,
                negated,
            } => {
                let not = if *negated { "NOT " } else { "" };
                write!(f, "({operand} {not}LIKE {pattern})")
            }
            Expression::In {
                operand,
                values,
                negated,
            } => {
                let not = if *negated { "NOT " } else { "" };
                write!(f, "({operand} {not}IN (")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    fmt_literal(value, f)?;
                }
                write!(f, "))")
            }
            Expression::Exists(property) => write!(f, "EXISTS({property})"),
        }
    }
}
