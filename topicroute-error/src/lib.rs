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

//! # TopicRoute Error Handling
//!
//! This crate provides the error taxonomy shared by every TopicRoute crate.
//!
//! - [`ParseError`]: malformed filter or action text, raised when a rule is created
//! - [`EvaluationError`]: illegal operator/type combination while evaluating an expression
//! - [`ActionError`]: an action statement targets a property that cannot be changed
//! - [`RouteError`]: the unified error returned by provisioning and routing operations
//!
//! ### Usage
//!
//! ```rust
//! use topicroute_error::EntityKind;
//! use topicroute_error::RouteError;
//! use topicroute_error::RouteResult;
//!
//! fn find_topic(name: &str) -> RouteResult<()> {
//!     if name.is_empty() {
//!         return Err(RouteError::not_found(EntityKind::Topic, name));
//!     }
//!     Ok(())
//! }
//! # find_topic("orders").unwrap();
//! ```

pub mod filter_error;
pub mod unified;

pub use filter_error::ActionError;
pub use filter_error::EvaluationError;
pub use filter_error::ParseError;
pub use unified::EntityKind;
pub use unified::RouteError;
pub use unified::RouteResult;
