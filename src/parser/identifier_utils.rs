//! Identifier and clause helpers shared by the object extractors.
//!
//! # Examples
//!
//! ```ignore
//! use crate::parser::identifier_utils::*;
//!
//! assert_eq!(unquote_identifier("\"My Table\""), "My Table");
//! assert_eq!(split_top_level_commas("a(1,2), b"), vec!["a(1,2)", "b"]);
//!
//! let name = split_qualified_name("db.sales.orders");
//! assert_eq!(name.schema.as_deref(), Some("sales"));
//! ```

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::DdlParseError;
use crate::model::QualifiedName;

/// `COMMENT = '...'` clause. Input: masked statement text (literal interiors are `_`,
/// so the first `'` after the opening one closes it); unanchored.
static COMMENT_CLAUSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bCOMMENT\s*=\s*'[^']*'?").unwrap());

/// Strips double quotes and backticks from an identifier.
///
/// A fully quoted identifier keeps its inner text with `""` unescaped; stray quote
/// characters elsewhere are removed.
///
/// ```ignore
/// assert_eq!(unquote_identifier("\"MyTable\""), "MyTable");
/// assert_eq!(unquote_identifier("\"a\"\"b\""), "a\"b");
/// assert_eq!(unquote_identifier("  orders "), "orders");
/// ```
pub fn unquote_identifier(ident: &str) -> String {
    let trimmed = ident.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        return trimmed[1..trimmed.len() - 1].replace("\"\"", "\"");
    }
    trimmed.chars().filter(|&c| c != '"' && c != '`').collect()
}

/// Split a dot-separated name into database/schema/name by part count.
///
/// Dots inside double quotes do not separate parts. With more than three parts the
/// last three are used.
pub fn split_qualified_name(full_name: &str) -> QualifiedName {
    let mut parts = split_outside_quotes(full_name.trim(), '.')
        .into_iter()
        .map(unquote_identifier)
        .collect::<Vec<_>>();

    let name = parts.pop().unwrap_or_default();
    let schema = parts.pop();
    let database = parts.pop();
    QualifiedName {
        database,
        schema,
        name,
    }
}

/// Split on `separator` occurring outside double quotes
fn split_outside_quotes(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quote = false;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if c == '"' {
            in_quote = !in_quote;
        } else if c == separator && !in_quote {
            parts.push(&text[start..i]);
            start = i + c.len_utf8();
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Read the object name starting at byte `from` of a statement.
///
/// The name ends at the first whitespace or `(` of the masked text, so quoted parts may
/// contain either. Returns the split name and the byte offset just past it.
pub fn read_object_name(
    statement: &str,
    masked: &str,
    from: usize,
    object: &'static str,
) -> Result<(QualifiedName, usize), DdlParseError> {
    let start = skip_whitespace(masked, from);
    let end = masked[start..]
        .find(|c: char| c.is_whitespace() || c == '(' || c == ';')
        .map(|i| start + i)
        .unwrap_or(masked.len());
    if start == end {
        return Err(DdlParseError::MissingName { object });
    }
    let name = split_qualified_name(&statement[start..end]);
    if name.name.is_empty() {
        return Err(DdlParseError::MissingName { object });
    }
    Ok((name, end))
}

/// Find a `COMMENT = '...'` clause within `range` of the statement and return its
/// unquoted text.
pub fn find_comment_clause(statement: &str, masked: &str, range: Range<usize>) -> Option<String> {
    let offset = range.start;
    let found = COMMENT_CLAUSE_RE.find(&masked[range])?;
    let literal = &statement[offset + found.start()..offset + found.end()];
    let quote = literal.find('\'')?;
    Some(unquote_string_literal(&literal[quote..]))
}

/// Split a comma-separated list at top level only.
///
/// Commas inside parentheses or inside single/double quotes do not split. Parts are
/// trimmed and empty parts dropped.
pub fn split_top_level_commas(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;

    for c in text.chars() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' => quote = Some(c),
                '(' => depth += 1,
                ')' => depth -= 1,
                ',' if depth == 0 => {
                    push_trimmed(&mut parts, &current);
                    current.clear();
                    continue;
                }
                _ => {}
            },
        }
        current.push(c);
    }
    push_trimmed(&mut parts, &current);
    parts
}

fn push_trimmed(parts: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        parts.push(trimmed.to_string());
    }
}

/// Find the `)` matching the `(` at byte offset `open`.
///
/// Parentheses inside single or double quotes are ignored. Returns `None` if `open`
/// is not a `(` or the span never closes.
pub fn find_matching_paren(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&b'(') {
        return None;
    }
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'\'' | b'"' => quote = Some(b),
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split the leading identifier off `text`, returning `(identifier, rest)`.
///
/// A double-quoted identifier may contain whitespace; otherwise the identifier ends
/// at the first whitespace. The identifier is returned as written (quotes kept).
pub fn leading_identifier(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    if text.starts_with('"') {
        let bytes = text.as_bytes();
        let mut i = 1;
        while i < bytes.len() {
            if bytes[i] == b'"' {
                if bytes.get(i + 1) == Some(&b'"') {
                    i += 2;
                    continue;
                }
                return (&text[..=i], &text[i + 1..]);
            }
            i += 1;
        }
        return (text, "");
    }
    match text.find(char::is_whitespace) {
        Some(end) => (&text[..end], &text[end..]),
        None => (text, ""),
    }
}

/// Offset of the first non-whitespace character at or after `from`
pub fn skip_whitespace(text: &str, from: usize) -> usize {
    text[from..]
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(i, _)| from + i)
        .unwrap_or(text.len())
}

/// Net parenthesis depth change of a token (`(` minus `)`)
pub fn paren_balance(token: &str) -> i32 {
    token.chars().fold(0, |depth, c| match c {
        '(' => depth + 1,
        ')' => depth - 1,
        _ => depth,
    })
}

/// Strip one layer of single quotes from a string literal and unescape `''`.
///
/// An unterminated literal keeps everything after the opening quote.
pub fn unquote_string_literal(literal: &str) -> String {
    let trimmed = literal.trim();
    let inner = trimmed.strip_prefix('\'').unwrap_or(trimmed);
    let inner = if trimmed.len() >= 2 {
        inner.strip_suffix('\'').unwrap_or(inner)
    } else {
        inner
    };
    inner.replace("''", "'")
}
