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

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(char),
    AnyChar,
    AnyString,
}

/// A compiled `LIKE` pattern: `%` matches any run of characters, `_` exactly one.
/// The optional escape character makes the following wildcard literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikePattern {
    source: String,
    escape: Option<char>,
    segments: Vec<Segment>,
}

impl LikePattern {
    /// Fails with a message when the pattern ends with a dangling escape character.
    pub fn compile(source: &str, escape: Option<char>) -> Result<Self, String> {
        let mut segments = Vec::with_capacity(source.len());
        let mut chars = source.chars();
        while let Some(c) = chars.next() {
            let segment = if Some(c) == escape {
                match chars.next() {
                    Some(escaped) => Segment::Literal(escaped),
                    None => return Err(format!("LIKE pattern '{source}' ends with the escape character")),
                }
            } else {
                match c {
                    '%' => Segment::AnyString,
                    '_' => Segment::AnyChar,
                    other => Segment::Literal(other),
                }
            };
            // consecutive '%' behave like one
            if segment == Segment::AnyString && segments.last() == Some(&Segment::AnyString) {
                continue;
            }
            segments.push(segment);
        }
        Ok(LikePattern {
            source: source.to_string(),
            escape,
            segments,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn escape(&self) -> Option<char> {
        self.escape
    }

    pub fn matches(&self, text: &str) -> bool {
        let text: Vec<char> = text.chars().collect();
        let segments = &self.segments;
        let (mut t, mut p) = (0usize, 0usize);
        // position of the last '%' and the text index it is currently absorbing up to
        let mut backtrack: Option<(usize, usize)> = None;

        while t < text.len() {
            match segments.get(p) {
                Some(Segment::AnyString) => {
                    backtrack = Some((p, t));
                    p += 1;
                    continue;
                }
                Some(Segment::AnyChar) => {
                    t += 1;
                    p += 1;
                    continue;
                }
                Some(Segment::Literal(c)) if *c == text[t] => {
                    t += 1;
                    p += 1;
                    continue;
                }
                _ => {}
            }
            match backtrack {
                Some((star, absorbed)) => {
                    p = star + 1;
                    t = absorbed + 1;
                    backtrack = Some((star, absorbed + 1));
                }
                None => return false,
            }
        }
        segments[p..].iter().all(|segment| *segment == Segment::AnyString)
    }
}

impl fmt::Display for LikePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.source.replace('\'', "''"))?;
        if let Some(escape) = self.escape {
            write!(f, " ESCAPE '{}'", escape.to_string().replace('\'', "''"))?;
        }
        Ok(())
    }
}
