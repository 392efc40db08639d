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

//! Filters and actions for TopicRoute rules.
//!
//! - [`expression`]: the SQL-like expression language (lexer, parser, evaluator)
//! - [`filter`]: true/false, correlation and SQL filters
//! - [`action`]: `SET`/`REMOVE` rule actions

pub mod action;
pub mod constant;
pub mod expression;
pub mod filter;

pub use action::ActionStatement;
pub use action::SqlAction;
pub use expression::evaluation_context::EvaluationContext;
pub use expression::Expression;
pub use expression::PropertyRef;
pub use filter::CorrelationFilter;
pub use filter::Filter;
pub use filter::FilterDescription;
pub use filter::SqlFilter;
