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

/// Malformed filter expression or action statement.
///
/// `position` is the byte offset in the source text where parsing failed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at position {position}")]
pub struct ParseError {
    message: String,
    position: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }

    pub fn unexpected_end(expected: &str, position: usize) -> Self {
        Self::new(format!("Unexpected end of input, expected {expected}"), position)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

/// Error types for expression evaluation
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("Operator '{operator}' cannot be applied to {left} and {right}")]
    TypeMismatch {
        operator: &'static str,
        left: &'static str,
        right: &'static str,
    },

    #[error("Operator '{operator}' cannot be applied to {operand}")]
    InvalidOperand {
        operator: &'static str,
        operand: &'static str,
    },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Integer overflow in '{0}'")]
    Overflow(&'static str),

    #[error("Filter expression produced {0}, expected a boolean")]
    NonBooleanResult(&'static str),
}

impl EvaluationError {
    pub fn type_mismatch(operator: &'static str, left: &'static str, right: &'static str) -> Self {
        EvaluationError::TypeMismatch { operator, left, right }
    }

    pub fn invalid_operand(operator: &'static str, operand: &'static str) -> Self {
        EvaluationError::InvalidOperand { operator, operand }
    }
}

/// Error types for rule action validation
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("System property '{0}' is read-only and cannot be SET")]
    ReadOnlySystemProperty(String),

    #[error("System property '{0}' cannot be REMOVEd")]
    RemoveSystemProperty(String),

    #[error("Action contains no statements")]
    Empty,
}
