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

//! Unified error system for TopicRoute
//!
//! Creation-time errors (parse, validation, duplicate or missing names) abort a single
//! provisioning call. Evaluation-time errors are scoped to one subscription of one publish.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::filter_error::ActionError;
use crate::filter_error::EvaluationError;
use crate::filter_error::ParseError;

/// The kind of named entity a provisioning error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Topic,
    Subscription,
    Rule,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Topic => f.pad("Topic"),
            EntityKind::Subscription => f.pad("Subscription"),
            EntityKind::Rule => f.pad("Rule"),
        }
    }
}

/// Main error type for all TopicRoute operations
///
/// # Examples
///
/// ```rust
/// use topicroute_error::EntityKind;
/// use topicroute_error::RouteError;
///
/// let err = RouteError::duplicate_name(EntityKind::Rule, "$Default");
/// assert_eq!(err.to_string(), "Rule '$Default' already exists");
/// ```
#[derive(Debug, Error)]
pub enum RouteError {
    // ============================================================================
    // Creation-time Errors
    // ============================================================================
    /// Malformed filter expression or action text
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Action statement targets a property that cannot be changed
    #[error("Invalid action: {0}")]
    Action(#[from] ActionError),

    /// Entity with the same name already exists in its parent
    #[error("{kind} '{name}' already exists")]
    DuplicateName { kind: EntityKind, name: String },

    /// Entity does not exist in its parent
    #[error("{kind} '{name}' not found")]
    NotFound { kind: EntityKind, name: String },

    // ============================================================================
    // Evaluation-time Errors
    // ============================================================================
    /// Illegal operator/type combination during evaluation
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    /// Publish was cancelled before every subscription was evaluated
    #[error("Publish to topic '{topic}' was cancelled")]
    Cancelled { topic: String },

    /// Outbound sink refused a delivered copy
    #[error("Outbound sink rejected message for subscription '{subscription}': {reason}")]
    Sink { subscription: String, reason: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    /// Configuration file could not be read or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// JSON document could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ============================================================================
    // System Errors
    // ============================================================================
    /// IO error from std::io
    #[error("IO error: {0}")]
    IO(#[from] io::Error),

    /// Illegal argument
    #[error("Illegal argument: {0}")]
    IllegalArgument(String),

    /// Internal error (should be rare)
    #[error("Internal error: {0}")]
    Internal(String),
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl RouteError {
    #[inline]
    pub fn duplicate_name(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::DuplicateName {
            kind,
            name: name.into(),
        }
    }

    #[inline]
    pub fn not_found(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    #[inline]
    pub fn cancelled(topic: impl Into<String>) -> Self {
        Self::Cancelled { topic: topic.into() }
    }

    #[inline]
    pub fn sink(subscription: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Sink {
            subscription: subscription.into(),
            reason: reason.into(),
        }
    }

    #[inline]
    pub fn illegal_argument(reason: impl Into<String>) -> Self {
        Self::IllegalArgument(reason.into())
    }

    /// Returns true for errors raised while creating or deleting topology entities.
    pub fn is_creation_error(&self) -> bool {
        matches!(
            self,
            RouteError::Parse(_)
                | RouteError::Action(_)
                | RouteError::DuplicateName { .. }
                | RouteError::NotFound { .. }
                | RouteError::IllegalArgument(_)
        )
    }
}

// ============================================================================
// Type Aliases
// ============================================================================

/// Result type alias for TopicRoute operations
///
/// # Examples
///
/// ```rust
/// use topicroute_error::RouteResult;
///
/// fn create_rule() -> RouteResult<()> {
///     // ... operation
///     Ok(())
/// }
/// ```
pub type RouteResult<T> = std::result::Result<T, RouteError>;
