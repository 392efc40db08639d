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

//! Recursive-descent parser. Precedence, loosest first:
//! `OR`, `AND`, `NOT`, predicates (comparison, `IS NULL`, `LIKE`, `IN`), `+ -`, `* / %`,
//! unary `-`, primaries.

use topicroute_common::PropertyValue;
use topicroute_common::SystemProperty;
use topicroute_error::ParseError;

use crate::action::ActionStatement;
use crate::constant::BinaryType;
use crate::constant::UnaryType;
use crate::expression::lexer::tokenize;
use crate::expression::lexer::Keyword;
use crate::expression::lexer::Token;
use crate::expression::lexer::TokenKind;
use crate::expression::like_pattern::LikePattern;
use crate::expression::Expression;
use crate::expression::PropertyRef;

pub(crate) fn parse_expression(text: &str) -> Result<Expression, ParseError> {
    let mut parser = Parser::new(text)?;
    if parser.at_end() {
        return Err(ParseError::unexpected_end("an expression", parser.peek().offset));
    }
    let expression = parser.expression()?;
    parser.expect_end()?;
    Ok(expression)
}

/// Parses `;`-separated `SET`/`REMOVE` statements. Empty statements are skipped.
pub(crate) fn parse_action_statements(text: &str) -> Result<Vec<ActionStatement>, ParseError> {
    let mut parser = Parser::new(text)?;
    let mut statements = Vec::new();
    loop {
        while parser.eat(&TokenKind::Semicolon) {}
        if parser.at_end() {
            return Ok(statements);
        }
        statements.push(parser.statement()?);
        if !parser.at_end() {
            parser.expect(&TokenKind::Semicolon, "';'")?;
        }
    }
}

/// Whether `name` can be written without brackets and still parse as the same user property.
pub(crate) fn is_plain_identifier(name: &str) -> bool {
    let mut bytes = name.bytes();
    let starts_well = matches!(bytes.next(), Some(b) if b.is_ascii_alphabetic() || b == b'_' || b == b'$');
    starts_well
        && bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'$')
        && Keyword::lookup(name).is_none()
}

/// Deepest expression tree the parser builds. Evaluation and drop recurse over the tree, so
/// longer chains such as thousands of `OR` terms are rejected here instead of overflowing the
/// stack on the publish path.
pub(crate) const MAX_EXPRESSION_DEPTH: usize = 256;

/// Deepest nesting of parentheses and prefix operators.
pub(crate) const MAX_NESTING: usize = 128;

const TOO_DEEP: &str = "Expression is nested too deeply";

/// An expression and the depth of its tree.
type Parsed = (Expression, usize);

fn check_depth(depth: usize, offset: usize) -> Result<(), ParseError> {
    if depth > MAX_EXPRESSION_DEPTH {
        return Err(ParseError::new(TOO_DEEP, offset));
    }
    Ok(())
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    nesting: usize,
}

impl Parser {
    fn new(text: &str) -> Result<Self, ParseError> {
        Ok(Parser {
            tokens: tokenize(text)?,
            pos: 0,
            nesting: 0,
        })
    }

    fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    fn peek_kind_at(&self, ahead: usize) -> &TokenKind {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + ahead).min(last)].kind
    }

    fn at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if &self.peek().kind == kind {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        self.eat(&TokenKind::Keyword(keyword))
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<Token, ParseError> {
        if &self.peek().kind == kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_end(&self) -> Result<(), ParseError> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.unexpected("end of input"))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        match token.kind {
            TokenKind::Eof => ParseError::unexpected_end(expected, token.offset),
            ref kind => ParseError::new(format!("Unexpected {kind}, expected {expected}"), token.offset),
        }
    }

    fn statement(&mut self) -> Result<ActionStatement, ParseError> {
        if self.eat_keyword(Keyword::Set) {
            let target = self.property_ref()?;
            self.expect(&TokenKind::Equal, "'='")?;
            if self.at_end() || self.peek().kind == TokenKind::Semicolon {
                return Err(self.unexpected("an expression"));
            }
            let value = self.expression()?;
            Ok(ActionStatement::Set { target, value })
        } else if self.eat_keyword(Keyword::Remove) {
            let target = self.property_ref()?;
            Ok(ActionStatement::Remove { target })
        } else {
            Err(self.unexpected("SET or REMOVE"))
        }
    }

    fn expression(&mut self) -> Result<Expression, ParseError> {
        self.or_expression().map(|(expression, _)| expression)
    }

    /// Folds `left op right`, rejecting trees deeper than [`MAX_EXPRESSION_DEPTH`].
    fn join(&self, op: BinaryType, left: Parsed, right: Parsed, offset: usize) -> Result<Parsed, ParseError> {
        let depth = left.1.max(right.1) + 1;
        check_depth(depth, offset)?;
        Ok((Expression::binary(op, left.0, right.0), depth))
    }

    fn wrap(&self, op: UnaryType, operand: Parsed, offset: usize) -> Result<Parsed, ParseError> {
        let depth = operand.1 + 1;
        check_depth(depth, offset)?;
        Ok((Expression::unary(op, operand.0), depth))
    }

    /// Guards parser recursion through parentheses and prefix operators.
    fn enter(&mut self) -> Result<(), ParseError> {
        if self.nesting >= MAX_NESTING {
            return Err(ParseError::new(TOO_DEEP, self.peek().offset));
        }
        self.nesting += 1;
        Ok(())
    }

    fn leave<T>(&mut self, result: T) -> T {
        self.nesting -= 1;
        result
    }

    fn or_expression(&mut self) -> Result<Parsed, ParseError> {
        let mut left = self.and_expression()?;
        loop {
            let offset = self.peek().offset;
            if !self.eat_keyword(Keyword::Or) {
                return Ok(left);
            }
            let right = self.and_expression()?;
            left = self.join(BinaryType::Or, left, right, offset)?;
        }
    }

    fn and_expression(&mut self) -> Result<Parsed, ParseError> {
        let mut left = self.not_expression()?;
        loop {
            let offset = self.peek().offset;
            if !self.eat_keyword(Keyword::And) {
                return Ok(left);
            }
            let right = self.not_expression()?;
            left = self.join(BinaryType::And, left, right, offset)?;
        }
    }

    fn not_expression(&mut self) -> Result<Parsed, ParseError> {
        let offset = self.peek().offset;
        if self.eat_keyword(Keyword::Not) {
            self.enter()?;
            let operand = self.not_expression();
            let operand = self.leave(operand)?;
            return self.wrap(UnaryType::Not, operand, offset);
        }
        self.predicate()
    }

    fn predicate(&mut self) -> Result<Parsed, ParseError> {
        let left = self.additive()?;
        let offset = self.peek().offset;
        let comparison = match self.peek().kind {
            TokenKind::Equal => Some(BinaryType::Equal),
            TokenKind::NotEqual => Some(BinaryType::NotEqual),
            TokenKind::LessThan => Some(BinaryType::LessThan),
            TokenKind::LessThanOrEqual => Some(BinaryType::LessThanOrEqual),
            TokenKind::GreaterThan => Some(BinaryType::GreaterThan),
            TokenKind::GreaterThanOrEqual => Some(BinaryType::GreaterThanOrEqual),
            _ => None,
        };
        if let Some(op) = comparison {
            self.advance();
            let right = self.additive()?;
            return self.join(op, left, right, offset);
        }

        match self.peek().kind {
            TokenKind::Keyword(Keyword::Is) => {
                self.advance();
                let negated = self.eat_keyword(Keyword::Not);
                self.expect(&TokenKind::Keyword(Keyword::Null), "NULL")?;
                let depth = left.1 + 1;
                check_depth(depth, offset)?;
                Ok((
                    Expression::IsNull {
                        operand: Box::new(left.0),
                        negated,
                    },
                    depth,
                ))
            }
            TokenKind::Keyword(Keyword::Like) => self.like(left, false),
            TokenKind::Keyword(Keyword::In) => self.in_list(left, false),
            TokenKind::Keyword(Keyword::Not) => match self.peek_kind_at(1) {
                TokenKind::Keyword(Keyword::Like) => {
                    self.advance();
                    self.like(left, true)
                }
                TokenKind::Keyword(Keyword::In) => {
                    self.advance();
                    self.in_list(left, true)
                }
                _ => Err(self.unexpected("LIKE or IN after NOT")),
            },
            _ => Ok(left),
        }
    }

    fn like(&mut self, operand: Parsed, negated: bool) -> Result<Parsed, ParseError> {
        let offset = self.advance().offset;
        let pattern_token = self.peek().clone();
        let TokenKind::String(ref pattern) = pattern_token.kind else {
            return Err(self.unexpected("a string pattern after LIKE"));
        };
        self.advance();

        let escape = if self.eat_keyword(Keyword::Escape) {
            let escape_token = self.advance();
            match escape_token.kind {
                TokenKind::String(ref escape) if escape.chars().count() == 1 => escape.chars().next(),
                _ => {
                    return Err(ParseError::new(
                        "ESCAPE must be followed by a single-character string",
                        escape_token.offset,
                    ))
                }
            }
        } else {
            None
        };

        let pattern = LikePattern::compile(pattern, escape)
            .map_err(|message| ParseError::new(message, pattern_token.offset))?;
        let depth = operand.1 + 1;
        check_depth(depth, offset)?;
        Ok((
            Expression::Like {
                operand: Box::new(operand.0),
                pattern,
                negated,
            },
            depth,
        ))
    }

    fn in_list(&mut self, operand: Parsed, negated: bool) -> Result<Parsed, ParseError> {
        let offset = self.advance().offset;
        self.expect(&TokenKind::LeftParen, "'(' after IN")?;
        let mut values = vec![self.literal_value()?];
        while self.eat(&TokenKind::Comma) {
            values.push(self.literal_value()?);
        }
        self.expect(&TokenKind::RightParen, "',' or ')'")?;
        let depth = operand.1 + 1;
        check_depth(depth, offset)?;
        Ok((
            Expression::In {
                operand: Box::new(operand.0),
                values,
                negated,
            },
            depth,
        ))
    }

    fn literal_value(&mut self) -> Result<PropertyValue, ParseError> {
        let negative = self.eat(&TokenKind::Minus);
        let value = match self.peek().kind {
            TokenKind::Integer(value) => PropertyValue::Int(if negative { -value } else { value }),
            TokenKind::Float(value) => PropertyValue::Float(if negative { -value } else { value }),
            TokenKind::String(ref value) if !negative => PropertyValue::from(value.as_str()),
            TokenKind::Keyword(Keyword::True) if !negative => PropertyValue::Bool(true),
            TokenKind::Keyword(Keyword::False) if !negative => PropertyValue::Bool(false),
            TokenKind::Keyword(Keyword::Null) if !negative => PropertyValue::Null,
            _ => return Err(self.unexpected(if negative { "a number" } else { "a literal" })),
        };
        self.advance();
        Ok(value)
    }

    fn additive(&mut self) -> Result<Parsed, ParseError> {
        let mut left = self.multiplicative()?;
        loop {
            let offset = self.peek().offset;
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryType::Add,
                TokenKind::Minus => BinaryType::Subtract,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.multiplicative()?;
            left = self.join(op, left, right, offset)?;
        }
    }

    fn multiplicative(&mut self) -> Result<Parsed, ParseError> {
        let mut left = self.unary()?;
        loop {
            let offset = self.peek().offset;
            let op = match self.peek().kind {
                TokenKind::Star => BinaryType::Multiply,
                TokenKind::Slash => BinaryType::Divide,
                TokenKind::Percent => BinaryType::Modulo,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.unary()?;
            left = self.join(op, left, right, offset)?;
        }
    }

    fn unary(&mut self) -> Result<Parsed, ParseError> {
        let offset = self.peek().offset;
        if self.eat(&TokenKind::Minus) {
            self.enter()?;
            let operand = self.unary();
            let (operand, depth) = self.leave(operand)?;
            // fold negative numeric literals
            return match operand {
                Expression::Literal(PropertyValue::Int(value)) if value >= 0 => {
                    Ok((Expression::Literal(PropertyValue::Int(-value)), depth))
                }
                Expression::Literal(PropertyValue::Float(value)) => {
                    Ok((Expression::Literal(PropertyValue::Float(-value)), depth))
                }
                other => self.wrap(UnaryType::Negate, (other, depth), offset),
            };
        }
        if self.eat(&TokenKind::Plus) {
            self.enter()?;
            let operand = self.unary();
            return self.leave(operand);
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Parsed, ParseError> {
        let token = self.peek().clone();
        let expression = match token.kind {
            TokenKind::String(value) => Expression::Literal(PropertyValue::from(value)),
            TokenKind::Integer(value) => Expression::Literal(PropertyValue::Int(value)),
            TokenKind::Float(value) => Expression::Literal(PropertyValue::Float(value)),
            TokenKind::Keyword(Keyword::True) => Expression::Literal(PropertyValue::Bool(true)),
            TokenKind::Keyword(Keyword::False) => Expression::Literal(PropertyValue::Bool(false)),
            TokenKind::Keyword(Keyword::Null) => Expression::Literal(PropertyValue::Null),
            TokenKind::Keyword(Keyword::Exists) => {
                self.advance();
                self.expect(&TokenKind::LeftParen, "'(' after EXISTS")?;
                let property = self.property_ref()?;
                self.expect(&TokenKind::RightParen, "')'")?;
                return Ok((Expression::Exists(property), 1));
            }
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => {
                return Ok((Expression::Property(self.property_ref()?), 1));
            }
            TokenKind::LeftParen => {
                self.enter()?;
                self.advance();
                let inner = self.or_expression();
                let inner = self.leave(inner)?;
                self.expect(&TokenKind::RightParen, "')'")?;
                return Ok(inner);
            }
            _ => return Err(self.unexpected("an operand")),
        };
        self.advance();
        Ok((expression, 1))
    }

    fn property_ref(&mut self) -> Result<PropertyRef, ParseError> {
        let token = self.peek().clone();
        let property = match token.kind {
            TokenKind::Identifier(ref name) => resolve_identifier(name, token.offset)?,
            TokenKind::QuotedIdentifier(ref name) => PropertyRef::user(name.as_str()),
            _ => return Err(self.unexpected("a property name")),
        };
        self.advance();
        Ok(property)
    }
}

fn resolve_identifier(name: &str, offset: usize) -> Result<PropertyRef, ParseError> {
    let Some((prefix, rest)) = name.split_once('.') else {
        return Ok(PropertyRef::user(name));
    };
    if prefix.eq_ignore_ascii_case("sys") {
        return SystemProperty::from_name(rest)
            .map(PropertyRef::System)
            .ok_or_else(|| ParseError::new(format!("Unknown system property '{rest}'"), offset));
    }
    if prefix.eq_ignore_ascii_case("user") {
        if rest.is_empty() {
            return Err(ParseError::new("Missing property name after 'user.'", offset));
        }
        return Ok(PropertyRef::user(rest));
    }
    Ok(PropertyRef::user(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(text: &str) -> String {
        parse_expression(text).unwrap().to_string()
    }

    #[test]
    fn deeply_nested_parentheses_are_rejected() {
        let text = format!("{}a = 1{}", "(".repeat(1000), ")".repeat(1000));
        let err = parse_expression(&text).unwrap_err();
        assert_eq!(err.to_string(), format!("Expression is nested too deeply at position {MAX_NESTING}"));

        let text = format!("{}a = 1{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert!(parse_expression(&text).is_ok());
    }

    #[test]
    fn long_or_chain_is_rejected() {
        let chain = |terms: usize| {
            (0..terms)
                .map(|i| format!("color = 'c{i}'"))
                .collect::<Vec<_>>()
                .join(" OR ")
        };
        let err = parse_expression(&chain(100_000)).unwrap_err();
        assert!(err.to_string().starts_with("Expression is nested too deeply"));

        // each comparison adds one level below the OR chain
        assert!(parse_expression(&chain(MAX_EXPRESSION_DEPTH - 1)).is_ok());
        assert!(parse_expression(&chain(MAX_EXPRESSION_DEPTH)).is_err());
    }

    #[test]
    fn prefix_operator_chains_are_bounded() {
        assert!(parse_expression(&format!("{}TRUE", "NOT ".repeat(10_000))).is_err());
        assert!(parse_expression(&format!("{}1 = 1", "+".repeat(10_000))).is_err());
        assert!(parse_expression(&format!("{}x > 0", "- ".repeat(10_000))).is_err());
        assert!(parse_action_statements(&format!("SET q = {}", vec!["q"; 5_000].join(" + "))).is_err());
    }

    #[test]
    fn and_binds_tighter_than_or() {
        assert_eq!(render("a = 1 OR b = 2 AND c = 3"), "((a = 1) OR ((b = 2) AND (c = 3)))");
        assert_eq!(render("(a = 1 OR b = 2) AND c = 3"), "(((a = 1) OR (b = 2)) AND (c = 3))");
    }

    #[test]
    fn not_binds_tighter_than_and() {
        assert_eq!(render("NOT a = 1 AND b"), "((NOT (a = 1)) AND b)");
    }

    #[test]
    fn arithmetic_precedence() {
        assert_eq!(render("quantity / 2 + 1 * 3 > 4"), "(((quantity / 2) + (1 * 3)) > 4)");
        assert_eq!(render("a - b - c"), "((a - b) - c)");
        assert_eq!(render("-5 + -x"), "(-5 + (-x))");
    }

    #[test]
    fn property_prefixes() {
        assert_eq!(
            parse_expression("user.color").unwrap(),
            Expression::Property(PropertyRef::user("color"))
        );
        assert_eq!(
            parse_expression("SYS.correlationid").unwrap(),
            Expression::Property(PropertyRef::System(SystemProperty::CorrelationId))
        );
        assert_eq!(
            parse_expression("sys.Label").unwrap(),
            Expression::Property(PropertyRef::System(SystemProperty::Subject))
        );
        assert_eq!(render("[order id] = 'x'"), "([order id] = 'x')");
        assert_eq!(render("[and] IS NULL"), "([and] IS NULL)");
    }

    #[test]
    fn predicates() {
        assert_eq!(render("color IS NOT NULL"), "(color IS NOT NULL)");
        assert_eq!(render("color NOT LIKE 'bl%'"), "(color NOT LIKE 'bl%')");
        assert_eq!(render("code LIKE '10!%' ESCAPE '!'"), "(code LIKE '10!%' ESCAPE '!')");
        assert_eq!(
            render("priority IN ('high', 'low', -1, 2.5, NULL)"),
            "(priority IN ('high', 'low', -1, 2.5, NULL))"
        );
        assert_eq!(render("color not in ('red')"), "(color NOT IN ('red'))");
        assert_eq!(render("EXISTS(sys.To) AND exists(color)"), "(EXISTS(sys.To) AND EXISTS(color))");
    }

    #[test]
    fn display_round_trips() {
        for text in [
            "color='blue' AND quantity=10",
            "user.color='red'",
            "NOT (a <> 'it''s' OR b >= 1.5)",
            "x % 3 = 0 AND y IS NULL",
        ] {
            let parsed = parse_expression(text).unwrap();
            assert_eq!(parse_expression(&parsed.to_string()).unwrap(), parsed, "{text}");
        }
    }

    #[test]
    fn syntax_errors_report_position() {
        let err = parse_expression("color = ").unwrap_err();
        assert_eq!(err.position(), 8);
        assert!(err.message().contains("Unexpected end of input"));

        let err = parse_expression("color = 'blue' quantity").unwrap_err();
        assert_eq!(err.position(), 15);

        let err = parse_expression("(a = 1").unwrap_err();
        assert_eq!(err.position(), 6);

        let err = parse_expression("sys.Priority = 'high'").unwrap_err();
        assert_eq!(err.position(), 0);
        assert!(err.message().contains("Unknown system property"));

        assert!(parse_expression("").is_err());
        assert!(parse_expression("a LIKE 5").is_err());
        assert!(parse_expression("a IN ()").is_err());
        assert!(parse_expression("a NOT = 1").is_err());
        assert!(parse_expression("a LIKE 'x' ESCAPE 'ab'").is_err());
    }

    #[test]
    fn action_statements() {
        let statements =
            parse_action_statements("SET quantity = quantity / 2; REMOVE priority;SET sys.CorrelationId = 'low';")
                .unwrap();
        assert_eq!(statements.len(), 3);
        assert_eq!(
            statements[0],
            ActionStatement::Set {
                target: PropertyRef::user("quantity"),
                value: parse_expression("quantity / 2").unwrap(),
            }
        );
        assert_eq!(
            statements[1],
            ActionStatement::Remove {
                target: PropertyRef::user("priority")
            }
        );
        assert_eq!(
            statements[2],
            ActionStatement::Set {
                target: PropertyRef::System(SystemProperty::CorrelationId),
                value: Expression::Literal(PropertyValue::from("low")),
            }
        );
    }

    #[test]
    fn action_keywords_are_case_insensitive() {
        let statements = parse_action_statements("set a = 1 ;; remove b").unwrap();
        assert_eq!(statements.len(), 2);
        assert!(parse_action_statements("  ").unwrap().is_empty());
    }

    #[test]
    fn action_syntax_errors() {
        assert!(parse_action_statements("SET a 1").is_err());
        assert!(parse_action_statements("SET a =").is_err());
        assert!(parse_action_statements("SET a = 1 REMOVE b").is_err());
        assert!(parse_action_statements("DELETE a").is_err());
        assert!(parse_action_statements("REMOVE 'a'").is_err());
    }
}
