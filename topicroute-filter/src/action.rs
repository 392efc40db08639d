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

//! Rule actions: `SET`/`REMOVE` statements applied to a subscription's copy of a message.

mod sql_action;

use std::fmt;

pub use sql_action::SqlAction;
use topicroute_common::Message;
use topicroute_error::EvaluationError;

use crate::expression::Expression;
use crate::expression::PropertyRef;

#[derive(Debug, Clone, PartialEq)]
pub enum ActionStatement {
    Set { target: PropertyRef, value: Expression },
    Remove { target: PropertyRef },
}

impl ActionStatement {
    pub fn target(&self) -> &PropertyRef {
        match self {
            ActionStatement::Set { target, .. } | ActionStatement::Remove { target } => target,
        }
    }

    /// Executes the statement against `message`, which is both the evaluation context and
    /// the mutation target.
    pub fn apply(&self, message: &mut Message) -> Result<(), EvaluationError> {
        match self {
            ActionStatement::Set { target, value } => {
                let value = value.evaluate(&*message)?;
                match target {
                    PropertyRef::User(name) => {
                        message.set_property(name.clone(), value);
                    }
                    PropertyRef::System(property) => {
                        message.set_system_property(*property, value.to_cheetah_string());
                    }
                }
            }
            ActionStatement::Remove { target } => match target {
                PropertyRef::User(name) => {
                    message.remove_property(name.as_str());
                }
                PropertyRef::System(property) => {
                    message.set_system_property(*property, None);
                }
            },
        }
        Ok(())
    }
}

impl fmt::Display for ActionStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionStatement::Set { target, value } => write!(f, "SET {target} = {value}"),
            ActionStatement::Remove { target } => write!(f, "REMOVE {target}"),
        }
    }
}
