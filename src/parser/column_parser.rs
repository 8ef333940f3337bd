//! Whitespace-token column definition parsing for Snowflake CREATE TABLE
//!
//! ## Supported Syntax
//!
//! ```sql
//! name TYPE [NOT NULL | NULL] [DEFAULT value] [COMMENT 'text']
//!     [COLLATE 'collation'] [[CONSTRAINT name] PRIMARY KEY | UNIQUE | REFERENCES t [(cols)]]
//!     [constraint flags]
//! ```
//!
//! The entry is split on whitespace. A type whose parentheses are unbalanced is
//! re-joined with the following tokens (`DECIMAL(10, 2)`); multi-token defaults and
//! comments are joined until their quote closes and their parentheses balance.
//! Anything unrecognized (IDENTITY, AUTOINCREMENT, masking policies, tags) is skipped.

use super::constraint_parser::{apply_constraint_flag, parse_references, ParsedConstraint};
use super::identifier_utils::{
    leading_identifier, paren_balance, unquote_identifier, unquote_string_literal,
};
use crate::model::{ColumnDefinition, ConstraintKind};

/// Two-word type names that whitespace splitting would otherwise cut in half
const MULTI_WORD_TYPES: &[(&str, &str)] = &[
    ("DOUBLE", "PRECISION"),
    ("CHARACTER", "VARYING"),
    ("CHAR", "VARYING"),
];

/// Result of parsing a column-list entry that defines a column
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedColumn {
    pub column: ColumnDefinition,
    /// Inline `PRIMARY KEY`, `UNIQUE` and `REFERENCES` on this column
    pub inline_constraints: Vec<ParsedConstraint>,
}

/// Cursor over the whitespace tokens of one column definition
pub struct ColumnTokenParser<'a> {
    tokens: Vec<&'a str>,
    pos: usize,
}

impl<'a> ColumnTokenParser<'a> {
    /// Create a parser over a comment-free column-list entry
    pub fn new(entry: &'a str) -> Self {
        Self {
            tokens: split_entry_tokens(entry),
            pos: 0,
        }
    }

    /// Parse the column. Returns `None` for entries with fewer than two tokens.
    pub fn parse(&mut self) -> Option<ParsedColumn> {
        if self.tokens.len() < 2 {
            return None;
        }

        let name = unquote_identifier(self.advance()?);
        let data_type = self.parse_data_type()?;
        let mut result = ParsedColumn {
            column: ColumnDefinition::new(name, data_type),
            inline_constraints: Vec::new(),
        };
        self.parse_column_modifiers(&mut result);
        Some(result)
    }

    fn parse_column_modifiers(&mut self, result: &mut ParsedColumn) {
        let mut pending_name: Option<String> = None;

        while let Some(token) = self.peek() {
            let upper = token.to_ascii_uppercase();
            match upper.as_str() {
                "NOT" if self.peek_upper_at(1).as_deref() == Some("NULL") => {
                    result.column.nullable = false;
                    self.pos += 2;
                }
                "NULL" => {
                    result.column.nullable = true;
                    self.pos += 1;
                }
                "DEFAULT" => {
                    self.pos += 1;
                    result.column.default_value = self.parse_value();
                }
                "COMMENT" => {
                    self.pos += 1;
                    result.column.comment = self.parse_value().map(|value| {
                        if value.starts_with('\'') {
                            unquote_string_literal(&value)
                        } else {
                            value
                        }
                    });
                }
                "COLLATE" => self.pos += 2,
                "CONSTRAINT" => {
                    pending_name = self.peek_at(1).map(unquote_identifier);
                    self.pos += 2;
                }
                "PRIMARY" if self.peek_upper_at(1).as_deref() == Some("KEY") => {
                    self.pos += 2;
                    self.push_inline(result, ConstraintKind::PrimaryKey, pending_name.take());
                }
                "UNIQUE" => {
                    self.pos += 1;
                    self.push_inline(result, ConstraintKind::Unique, pending_name.take());
                }
                "REFERENCES" => {
                    let rest = self.tokens[self.pos..].join(" ");
                    match parse_references(&rest) {
                        Some((references, remaining)) => {
                            let consumed = self.tokens.len() - self.pos
                                - remaining.split_whitespace().count();
                            self.pos += consumed.max(1);
                            self.push_inline(result, ConstraintKind::ForeignKey, pending_name.take());
                            if let Some(last) = result.inline_constraints.last_mut() {
                                last.references = Some(references);
                            }
                        }
                        None => self.pos += 1,
                    }
                }
                _ => {
                    let consumed = match result.inline_constraints.last_mut() {
                        Some(last) => {
                            apply_constraint_flag(&self.tokens, self.pos, &mut last.properties)
                        }
                        None => None,
                    };
                    if consumed.is_none() {
                        log::debug!(
                            "Skipping column option '{}' on {}",
                            token,
                            result.column.name
                        );
                    }
                    self.pos += consumed.unwrap_or(1);
                }
            }
        }
    }

    fn push_inline(&self, result: &mut ParsedColumn, kind: ConstraintKind, name: Option<String>) {
        let mut constraint = ParsedConstraint::new(kind, vec![result.column.name.clone()]);
        constraint.name = name;
        result.inline_constraints.push(constraint);
    }

    /// Type token, re-joined with following tokens while its parentheses are open
    fn parse_data_type(&mut self) -> Option<String> {
        let mut data_type = self.advance()?.to_string();
        let mut depth = paren_balance(&data_type);

        if let Some(next) = self.peek_upper_at(0) {
            let first = data_type.to_ascii_uppercase();
            if MULTI_WORD_TYPES.iter().any(|(a, b)| *a == first && *b == next) {
                data_type.push(' ');
                data_type.push_str(self.advance()?);
            }
        }

        loop {
            if depth > 0 {
                let Some(token) = self.advance() else { break };
                data_type.push(' ');
                data_type.push_str(token);
                depth += paren_balance(token);
            } else if self.peek().is_some_and(|t| t.starts_with('(')) {
                let token = self.advance()?;
                data_type.push_str(token);
                depth += paren_balance(token);
            } else {
                break;
            }
        }

        Some(data_type)
    }

    /// DEFAULT/COMMENT value: joined until quotes close and parentheses balance.
    /// An unterminated quote runs to the end of the tokens.
    fn parse_value(&mut self) -> Option<String> {
        let mut value = self.advance()?.to_string();
        let mut quotes = value.matches('\'').count();
        let mut depth = paren_balance(&value);

        while quotes % 2 == 1 || depth > 0 {
            let Some(token) = self.advance() else { break };
            value.push(' ');
            value.push_str(token);
            quotes += token.matches('\'').count();
            depth += paren_balance(token);
        }

        Some(value)
    }

    fn advance(&mut self) -> Option<&'a str> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<&'a str> {
        self.tokens.get(self.pos + offset).copied()
    }

    fn peek_upper_at(&self, offset: usize) -> Option<String> {
        self.peek_at(offset).map(|t| t.to_ascii_uppercase())
    }
}

/// Whitespace tokens, except that a leading double-quoted name stays one token
fn split_entry_tokens(entry: &str) -> Vec<&str> {
    let entry = entry.trim();
    let (name, rest) = leading_identifier(entry);
    if name.is_empty() {
        return Vec::new();
    }
    let mut tokens = vec![name];
    tokens.extend(rest.split_whitespace());
    tokens
}

/// Parse one column-list entry into a column
pub fn parse_column_definition(entry: &str) -> Option<ParsedColumn> {
    ColumnTokenParser::new(entry).parse()
}
