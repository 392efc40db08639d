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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryType {
    Negate,
    Not,
}

impl UnaryType {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryType::Negate => "-",
            UnaryType::Not => "NOT",
        }
    }
}

/// Binary operators in ascending precedence groups: logical, comparison, additive,
/// multiplicative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryType {
    Or,
    And,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl BinaryType {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryType::Or => "OR",
            BinaryType::And => "AND",
            BinaryType::Equal => "=",
            BinaryType::NotEqual => "<>",
            BinaryType::LessThan => "<",
            BinaryType::LessThanOrEqual => "<=",
            BinaryType::GreaterThan => ">",
            BinaryType::GreaterThanOrEqual => ">=",
            BinaryType::Add => "+",
            BinaryType::Subtract => "-",
            BinaryType::Multiply => "*",
            BinaryType::Divide => "/",
            BinaryType::Modulo => "%",
        }
    }

    #[inline]
    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryType::And | BinaryType::Or)
    }

    #[inline]
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryType::Equal
                | BinaryType::NotEqual
                | BinaryType::LessThan
                | BinaryType::LessThanOrEqual
                | BinaryType::GreaterThan
                | BinaryType::GreaterThanOrEqual
        )
    }

    #[inline]
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryType::Add | BinaryType::Subtract | BinaryType::Multiply | BinaryType::Divide | BinaryType::Modulo
        )
    }
}

impl fmt::Display for UnaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.symbol())
    }
}

impl fmt::Display for BinaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unary_type_symbol() {
        assert_eq!(UnaryType::Negate.symbol(), "-");
        assert_eq!(UnaryType::Not.to_string(), "NOT");
    }

    #[test]
    fn test_binary_type_groups() {
        assert!(BinaryType::And.is_logical());
        assert!(!BinaryType::And.is_comparison());
        assert!(BinaryType::NotEqual.is_comparison());
        assert!(BinaryType::Modulo.is_arithmetic());
        assert!(!BinaryType::Or.is_arithmetic());
    }

    #[test]
    fn test_binary_type_display() {
        assert_eq!(format!("{}", BinaryType::GreaterThanOrEqual), ">=");
        assert_eq!(format!("{}", BinaryType::NotEqual), "<>");
    }
}
