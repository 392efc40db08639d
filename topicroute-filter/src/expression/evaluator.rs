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

use std::cmp::Ordering;

use topicroute_common::PropertyValue;
use topicroute_error::EvaluationError;

use crate::constant::BinaryType;
use crate::constant::UnaryType;
use crate::expression::evaluation_context::EvaluationContext;
use crate::expression::Expression;

pub(crate) fn evaluate(
    expression: &Expression,
    context: &dyn EvaluationContext,
) -> Result<PropertyValue, EvaluationError> {
    match expression {
        Expression::Literal(value) => Ok(value.clone()),
        Expression::Property(property) => Ok(property.resolve(context)),
        Expression::Exists(property) => Ok(PropertyValue::Bool(property.exists(context))),
        Expression::Unary { op, operand } => {
            let value = evaluate(operand, context)?;
            unary(*op, value)
        }
        Expression::Binary {
            op: BinaryType::And,
            left,
            right,
        } => {
            if !logical_operand(BinaryType::And, evaluate(left, context)?)? {
                return Ok(PropertyValue::Bool(false));
            }
            Ok(PropertyValue::Bool(logical_operand(BinaryType::And, evaluate(right, context)?)?))
        }
        Expression::Binary {
            op: BinaryType::Or,
            left,
            right,
        } => {
            if logical_operand(BinaryType::Or, evaluate(left, context)?)? {
                return Ok(PropertyValue::Bool(true));
            }
            Ok(PropertyValue::Bool(logical_operand(BinaryType::Or, evaluate(right, context)?)?))
        }
        Expression::Binary { op, left, right } => {
            let left = evaluate(left, context)?;
            let right = evaluate(right, context)?;
            if op.is_arithmetic() {
                arithmetic(*op, left, right)
            } else {
                compare(*op, &left, &right).map(PropertyValue::Bool)
            }
        }
        Expression::IsNull { operand, negated } => {
            let value = evaluate(operand, context)?;
            Ok(PropertyValue::Bool(value.is_null() != *negated))
        }
        Expression::Like {
            operand,
            pattern,
            negated,
        } => match evaluate(operand, context)? {
            PropertyValue::Null => Ok(PropertyValue::Bool(false)),
            PropertyValue::String(text) => Ok(PropertyValue::Bool(pattern.matches(text.as_str()) != *negated)),
            other => Err(EvaluationError::invalid_operand("LIKE", other.type_name())),
        },
        Expression::In {
            operand,
            values,
            negated,
        } => {
            let value = evaluate(operand, context)?;
            if value.is_null() {
                return Ok(PropertyValue::Bool(false));
            }
            let found = values.iter().any(|candidate| values_equal(&value, candidate));
            Ok(PropertyValue::Bool(found != *negated))
        }
    }
}

fn unary(op: UnaryType, value: PropertyValue) -> Result<PropertyValue, EvaluationError> {
    match (op, value) {
        (UnaryType::Not, PropertyValue::Bool(value)) => Ok(PropertyValue::Bool(!value)),
        (UnaryType::Negate, PropertyValue::Null) => Ok(PropertyValue::Null),
        (UnaryType::Negate, PropertyValue::Int(value)) => value
            .checked_neg()
            .map(PropertyValue::Int)
            .ok_or(EvaluationError::Overflow("-")),
        (UnaryType::Negate, PropertyValue::Float(value)) => Ok(PropertyValue::Float(-value)),
        (op, value) => Err(EvaluationError::invalid_operand(op.symbol(), value.type_name())),
    }
}

/// `NULL` counts as false so an undefined property never satisfies a condition.
fn logical_operand(op: BinaryType, value: PropertyValue) -> Result<bool, EvaluationError> {
    match value {
        PropertyValue::Bool(value) => Ok(value),
        PropertyValue::Null => Ok(false),
        other => Err(EvaluationError::invalid_operand(op.symbol(), other.type_name())),
    }
}

fn arithmetic(op: BinaryType, left: PropertyValue, right: PropertyValue) -> Result<PropertyValue, EvaluationError> {
    match (&left, &right) {
        (PropertyValue::Null, _) | (_, PropertyValue::Null) => Ok(PropertyValue::Null),
        (PropertyValue::Int(l), PropertyValue::Int(r)) => integer_arithmetic(op, *l, *r).map(PropertyValue::Int),
        (l, r) if l.is_numeric() && r.is_numeric() => {
            let (l, r) = (l.as_f64().unwrap_or_default(), r.as_f64().unwrap_or_default());
            float_arithmetic(op, l, r).map(PropertyValue::Float)
        }
        (l, r) => Err(EvaluationError::type_mismatch(op.symbol(), l.type_name(), r.type_name())),
    }
}

fn integer_arithmetic(op: BinaryType, left: i64, right: i64) -> Result<i64, EvaluationError> {
    let result = match op {
        BinaryType::Add => left.checked_add(right),
        BinaryType::Subtract => left.checked_sub(right),
        BinaryType::Multiply => left.checked_mul(right),
        BinaryType::Divide | BinaryType::Modulo if right == 0 => return Err(EvaluationError::DivisionByZero),
        // integer division truncates toward zero
        BinaryType::Divide => left.checked_div(right),
        BinaryType::Modulo => left.checked_rem(right),
        _ => unreachable!("not an arithmetic operator: {op:?}"),
    };
    result.ok_or(EvaluationError::Overflow(op.symbol()))
}

fn float_arithmetic(op: BinaryType, left: f64, right: f64) -> Result<f64, EvaluationError> {
    match op {
        BinaryType::Add => Ok(left + right),
        BinaryType::Subtract => Ok(left - right),
        BinaryType::Multiply => Ok(left * right),
        BinaryType::Divide | BinaryType::Modulo if right == 0.0 => Err(EvaluationError::DivisionByZero),
        BinaryType::Divide => Ok(left / right),
        BinaryType::Modulo => Ok(left % right),
        _ => unreachable!("not an arithmetic operator: {op:?}"),
    }
}

/// Comparisons involving `NULL` are false, including `<>`.
fn compare(op: BinaryType, left: &PropertyValue, right: &PropertyValue) -> Result<bool, EvaluationError> {
    if left.is_null() || right.is_null() {
        return Ok(false);
    }
    match op {
        BinaryType::Equal => Ok(values_equal(left, right)),
        BinaryType::NotEqual => Ok(!values_equal(left, right)),
        _ => {
            let Some(ordering) = ordering(op, left, right)? else {
                // NaN is unordered
                return Ok(false);
            };
            Ok(match op {
                BinaryType::LessThan => ordering == Ordering::Less,
                BinaryType::LessThanOrEqual => ordering != Ordering::Greater,
                BinaryType::GreaterThan => ordering == Ordering::Greater,
                BinaryType::GreaterThanOrEqual => ordering != Ordering::Less,
                _ => unreachable!("not a comparison operator: {op:?}"),
            })
        }
    }
}

/// Equality with integer to float promotion. Values of different types are never equal.
fn values_equal(left: &PropertyValue, right: &PropertyValue) -> bool {
    match (left, right) {
        (PropertyValue::Int(l), PropertyValue::Int(r)) => l == r,
        (l, r) if l.is_numeric() && r.is_numeric() => l.as_f64() == r.as_f64(),
        (l, r) => l == r,
    }
}

fn ordering(op: BinaryType, left: &PropertyValue, right: &PropertyValue) -> Result<Option<Ordering>, EvaluationError> {
    match (left, right) {
        (PropertyValue::Int(l), PropertyValue::Int(r)) => Ok(Some(l.cmp(r))),
        (l, r) if l.is_numeric() && r.is_numeric() => {
            Ok(l.as_f64().unwrap_or_default().partial_cmp(&r.as_f64().unwrap_or_default()))
        }
        (PropertyValue::String(l), PropertyValue::String(r)) => Ok(Some(l.as_str().cmp(r.as_str()))),
        (l, r) => Err(EvaluationError::type_mismatch(op.symbol(), l.type_name(), r.type_name())),
    }
}
