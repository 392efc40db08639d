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
use topicroute_common::Message;
use topicroute_error::ActionError;
use topicroute_error::EvaluationError;
use topicroute_error::RouteResult;

use crate::action::ActionStatement;
use crate::expression::parser::parse_action_statements;
use crate::expression::PropertyRef;

/// A list of `SET`/`REMOVE` statements, parsed and validated when the rule is created.
///
/// ```ignore
/// let action = SqlAction::new("SET quantity = quantity / 2; REMOVE priority;SET sys.CorrelationId = 'low';")?;
/// let copy = action.apply(message.clone())?;
/// ```
///
/// Statements run in order against the same copy, so later statements see earlier
/// mutations. [`SqlAction::apply`] consumes the copy and only hands it back when every
/// statement succeeded.
#[derive(Debug, Clone)]
pub struct SqlAction {
    text: CheetahString,
    statements: Vec<ActionStatement>,
}

impl SqlAction {
    /// Fails with [`RouteError::Parse`](topicroute_error::RouteError::Parse) for malformed
    /// text and [`RouteError::Action`](topicroute_error::RouteError::Action) when a statement
    /// targets a property actions may not change.
    pub fn new(text: &str) -> RouteResult<Self> {
        let statements = parse_action_statements(text)?;
        validate(&statements)?;
        Ok(SqlAction {
            text: CheetahString::from(text),
            statements,
        })
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn statements(&self) -> &[ActionStatement] {
        &self.statements
    }

    pub fn apply(&self, mut message: Message) -> Result<Message, EvaluationError> {
        for statement in &self.statements {
            statement.apply(&mut message)?;
        }
        Ok(message)
    }
}

fn validate(statements: &[ActionStatement]) -> Result<(), ActionError> {
    if statements.is_empty() {
        return Err(ActionError::Empty);
    }
    for statement in statements {
        match statement {
            ActionStatement::Set {
                target: PropertyRef::System(property),
                ..
            } if !property.is_mutable() => {
                return Err(ActionError::ReadOnlySystemProperty(property.name().to_string()));
            }
            ActionStatement::Remove {
                target: PropertyRef::System(property),
            } => {
                return Err(ActionError::RemoveSystemProperty(property.name().to_string()));
            }
            _ => {}
        }
    }
    Ok(())
}

impl PartialEq for SqlAction {
    fn eq(&self, other: &Self) -> bool {
        self.statements == other.statements
    }
}

impl fmt::Display for SqlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SqlAction({})", self.text)
    }
}

#[cfg(test)]
mod tests {
    use topicroute_common::PropertyValue;
    use topicroute_common::SystemProperty;
    use topicroute_error::RouteError;

    use super::*;

    const RED_ORDERS_ACTION: &str = "SET quantity = quantity / 2; REMOVE priority;SET sys.CorrelationId = 'low';";

    fn red_order() -> Message {
        Message::new("order")
            .with_message_id("m-1")
            .with_correlation_id("high")
            .with_subject("red")
            .with_property("color", "red")
            .with_property("quantity", 10)
            .with_property("priority", "high")
    }

    #[test]
    fn set_and_remove_compose() {
        let action = SqlAction::new("SET quantity = quantity / 2; REMOVE priority").unwrap();
        let copy = action
            .apply(Message::new("").with_property("quantity", 10).with_property("priority", "high"))
            .unwrap();
        assert_eq!(copy.property("quantity"), Some(&PropertyValue::Int(5)));
        assert!(copy.property("priority").is_none());
        assert_eq!(copy.application_properties().len(), 1);
    }

    #[test]
    fn red_orders_action() {
        let original = red_order();
        let action = SqlAction::new(RED_ORDERS_ACTION).unwrap();
        let copy = action.apply(original.clone()).unwrap();

        assert_eq!(copy.property("quantity"), Some(&PropertyValue::Int(5)));
        assert!(copy.property("priority").is_none());
        assert_eq!(copy.correlation_id().map(|v| v.as_str()), Some("low"));
        assert_eq!(copy.subject(), original.subject());
        assert_eq!(copy.body(), original.body());
        assert_eq!(original.property("quantity"), Some(&PropertyValue::Int(10)));
    }

    #[test]
    fn later_statements_see_earlier_mutations() {
        let action = SqlAction::new("SET quantity = quantity * 2; SET total = quantity + 1; SET sys.Subject = total").unwrap();
        let copy = action.apply(Message::new("").with_property("quantity", 3)).unwrap();
        assert_eq!(copy.property("quantity"), Some(&PropertyValue::Int(6)));
        assert_eq!(copy.property("total"), Some(&PropertyValue::Int(7)));
        assert_eq!(copy.subject().map(|v| v.as_str()), Some("7"));
    }

    #[test]
    fn set_system_property_to_null_clears_it() {
        let action = SqlAction::new("SET sys.CorrelationId = missing").unwrap();
        let copy = action.apply(red_order()).unwrap();
        assert!(copy.correlation_id().is_none());
    }

    #[test]
    fn remove_missing_property_is_noop() {
        let action = SqlAction::new("REMOVE nothing").unwrap();
        let original = red_order();
        assert_eq!(action.apply(original.clone()).unwrap(), original);
    }

    #[test]
    fn evaluation_error_discards_copy() {
        let action = SqlAction::new("SET quantity = 1; SET ratio = quantity / 0").unwrap();
        assert_eq!(
            action.apply(red_order()).unwrap_err(),
            EvaluationError::DivisionByZero
        );
    }

    #[test]
    fn validation_rejects_reserved_targets() {
        assert!(matches!(
            SqlAction::new("SET sys.MessageId = 'x'"),
            Err(RouteError::Action(ActionError::ReadOnlySystemProperty(name))) if name == "MessageId"
        ));
        assert!(matches!(
            SqlAction::new("REMOVE sys.Subject"),
            Err(RouteError::Action(ActionError::RemoveSystemProperty(_)))
        ));
        assert!(matches!(SqlAction::new(" ; "), Err(RouteError::Action(ActionError::Empty))));
        assert!(matches!(SqlAction::new("SET = 1"), Err(RouteError::Parse(_))));
    }

    #[test]
    fn every_other_system_property_is_settable() {
        for property in SystemProperty::ALL.into_iter().filter(SystemProperty::is_mutable) {
            let action = SqlAction::new(&format!("SET sys.{} = 'v'", property.name())).unwrap();
            let copy = action.apply(Message::default()).unwrap();
            assert_eq!(copy.system_property(property).map(|v| v.as_str()), Some("v"));
        }
    }
}
