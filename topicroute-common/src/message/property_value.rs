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
use serde::Deserialize;
use serde::Serialize;

/// Value of an application property, and the result type of filter expressions.
///
/// Equality is by value *and* type: `Int(10)` is not equal to `Float(10.0)`. Expression
/// comparisons that promote integers to floats live in the evaluator, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum PropertyValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(CheetahString),
}

impl PropertyValue {
    /// Name of the value's type as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Null => "null",
            PropertyValue::Bool(_) => "boolean",
            PropertyValue::Int(_) => "integer",
            PropertyValue::Float(_) => "float",
            PropertyValue::String(_) => "string",
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, PropertyValue::Int(_) | PropertyValue::Float(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Numeric value widened to `f64`, for integers and floats alike.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Int(value) => Some(*value as f64),
            PropertyValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// String rendering used when a value is written into a system property.
    /// `Null` has no rendering.
    pub fn to_cheetah_string(&self) -> Option<CheetahString> {
        match self {
            PropertyValue::Null => None,
            PropertyValue::String(value) => Some(value.clone()),
            other => Some(CheetahString::from(other.to_string())),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => write!(f, "null"),
            PropertyValue::Bool(value) => write!(f, "{value}"),
            PropertyValue::Int(value) => write!(f, "{value}"),
            PropertyValue::Float(value) => write!(f, "{value}"),
            PropertyValue::String(value) => write!(f, "{value}"),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Int(value as i64)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(CheetahString::from(value))
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(CheetahString::from(value))
    }
}

impl From<CheetahString> for PropertyValue {
    fn from(value: CheetahString) -> Self {
        PropertyValue::String(value)
    }
}

impl<T> From<Option<T>> for PropertyValue
where
    T: Into<PropertyValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(PropertyValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_value_and_type() {
        assert_eq!(PropertyValue::from(10), PropertyValue::Int(10));
        assert_ne!(PropertyValue::Int(10), PropertyValue::Float(10.0));
        assert_ne!(PropertyValue::from("10"), PropertyValue::Int(10));
        assert_eq!(PropertyValue::from(None::<i64>), PropertyValue::Null);
    }

    #[test]
    fn type_names() {
        assert_eq!(PropertyValue::Null.type_name(), "null");
        assert_eq!(PropertyValue::Bool(true).type_name(), "boolean");
        assert_eq!(PropertyValue::Int(1).type_name(), "integer");
        assert_eq!(PropertyValue::Float(1.5).type_name(), "float");
        assert_eq!(PropertyValue::from("red").type_name(), "string");
    }

    #[test]
    fn string_rendering() {
        assert_eq!(PropertyValue::Int(5).to_cheetah_string().unwrap().as_str(), "5");
        assert_eq!(PropertyValue::Bool(false).to_cheetah_string().unwrap().as_str(), "false");
        assert_eq!(PropertyValue::from("low").to_cheetah_string().unwrap().as_str(), "low");
        assert!(PropertyValue::Null.to_cheetah_string().is_none());
    }

    #[test]
    fn deserialize_untagged_json() {
        let values: Vec<PropertyValue> = serde_json::from_str(r#"[null, true, 10, 2.5, "blue"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                PropertyValue::Null,
                PropertyValue::Bool(true),
                PropertyValue::Int(10),
                PropertyValue::Float(2.5),
                PropertyValue::from("blue"),
            ]
        );
    }

    #[test]
    fn numeric_accessors() {
        assert_eq!(PropertyValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(PropertyValue::Float(3.5).as_i64(), None);
        assert!(PropertyValue::Float(3.5).is_numeric());
        assert!(!PropertyValue::from("3").is_numeric());
    }
}
