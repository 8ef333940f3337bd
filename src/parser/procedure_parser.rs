//! CREATE PROCEDURE extraction
//!
//! ```sql
//! CREATE [OR REPLACE] PROCEDURE [IF NOT EXISTS] name ([arg TYPE [DEFAULT value], ...])
//!     RETURNS type | RETURNS TABLE (...)
//!     [LANGUAGE SQL | JAVASCRIPT | ...]
//!     [COMMENT = 'text']
//!     [EXECUTE AS OWNER | CALLER]
//!     AS $$ body $$ | 'body' | body
//! ```
//!
//! The body is kept verbatim apart from one layer of delimiters.

use std::sync::LazyLock;

use regex::Regex;

use super::identifier_utils::{
    find_comment_clause, find_matching_paren, leading_identifier, read_object_name,
    split_top_level_commas, unquote_identifier,
};
use super::scanner::{mask_literals, strip_comments};
use super::view_parser::AS_KEYWORD_RE;
use crate::error::DdlParseError;
use crate::model::{
    ExecuteAs, ProcedureDefinition, ProcedureParameter, DEFAULT_PROCEDURE_LANGUAGE,
};
use crate::util::ends_with_ci;

/// Statement prefix up to the procedure name.
/// Input: masked statement; anchored at the start.
static PROCEDURE_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*CREATE\s+(?:OR\s+REPLACE\s+)?PROCEDURE\s+(?:IF\s+NOT\s+EXISTS\s+)?")
        .unwrap()
});

/// `RETURNS <type>` with an optional `(` right after the type word.
/// Input: masked header between the parameter list and the body; unanchored.
static RETURNS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bRETURNS\s+([A-Za-z_][A-Za-z0-9_]*)(\s*\()?").unwrap()
});

/// `LANGUAGE <word>`. Input: masked header; unanchored.
static LANGUAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bLANGUAGE\s+(\w+)").unwrap());

/// A `DEFAULT` word inside one parameter entry. Input: comment-stripped entry; unanchored.
static PARAM_DEFAULT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bDEFAULT\b").unwrap());

/// Extract a procedure from one CREATE PROCEDURE statement
pub fn parse_create_procedure(statement: &str) -> Result<ProcedureDefinition, DdlParseError> {
    let masked = mask_literals(statement);
    let header = PROCEDURE_HEADER_RE
        .find(&masked)
        .ok_or(DdlParseError::MissingName {
            object: "PROCEDURE",
        })?;
    let (name, name_end) = read_object_name(statement, &masked, header.end(), "PROCEDURE")?;

    let open = masked[name_end..]
        .find('(')
        .map(|i| name_end + i)
        .ok_or(DdlParseError::MissingParameterList)?;
    let close = find_matching_paren(&masked, open).ok_or(DdlParseError::UnbalancedParentheses {
        context: "parameter list",
    })?;
    let parameters = parse_parameters(&statement[open + 1..close]);

    let clauses = locate_body(&masked, close + 1)?;
    let header_range = close + 1..clauses.as_start;
    let header_text = &masked[header_range.clone()];

    let return_type = RETURNS_RE.captures(header_text).and_then(|caps| {
        let word = caps.get(1)?;
        let start = header_range.start + word.start();
        let end = match caps.get(2) {
            Some(paren) => find_matching_paren(&masked, header_range.start + paren.end() - 1)? + 1,
            None => header_range.start + word.end(),
        };
        Some(statement[start..end].to_string())
    });

    // RETURNS TABLE (...) may hold a column named LANGUAGE
    let language = LANGUAGE_RE
        .captures_iter(header_text)
        .find(|caps| paren_depth(&header_text[..caps.get(0).map_or(0, |m| m.start())]) == 0)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_PROCEDURE_LANGUAGE.to_string());

    let code_end = clauses.as_end + masked[clauses.as_end..].trim_end().len();
    let body = strip_body_delimiters(statement[clauses.as_end..code_end].trim());

    Ok(ProcedureDefinition {
        name,
        parameters,
        return_type,
        body,
        comment: find_comment_clause(statement, &masked, header_range),
        language,
        execute_as: clauses.execute_as,
    })
}

/// Open parentheses left unclosed in masked text
fn paren_depth(masked: &str) -> i32 {
    masked.chars().fold(0, |depth, c| match c {
        '(' => depth + 1,
        ')' => depth - 1,
        _ => depth,
    })
}

/// Position of the body-introducing `AS` and the `EXECUTE AS` mode seen before it
struct BodyClauses {
    as_start: usize,
    as_end: usize,
    execute_as: Option<ExecuteAs>,
}

fn locate_body(masked: &str, from: usize) -> Result<BodyClauses, DdlParseError> {
    let mut execute_as = None;

    for found in AS_KEYWORD_RE.find_iter(&masked[from..]) {
        let as_start = from + found.start();
        let as_end = from + found.end();
        let before = masked[..as_start].trim_end();

        if ends_with_ci(before, "EXECUTE")
            && !before[..before.len() - "EXECUTE".len()]
                .ends_with(|c: char| c.is_ascii_alphanumeric() || c == '_')
        {
            let (mode, _) = leading_identifier(&masked[as_end..]);
            execute_as = match mode.to_ascii_uppercase().as_str() {
                "OWNER" => Some(ExecuteAs::Owner),
                // RESTRICTED CALLER
                _ => Some(ExecuteAs::Caller),
            };
            continue;
        }

        return Ok(BodyClauses {
            as_start,
            as_end,
            execute_as,
        });
    }

    Err(DdlParseError::MissingBody {
        object: "PROCEDURE",
    })
}

fn parse_parameters(list: &str) -> Vec<ProcedureParameter> {
    split_top_level_commas(&strip_comments(list))
        .iter()
        .map(|entry| {
            let (raw_name, rest) = leading_identifier(entry);
            let (data_type, default_value) = match PARAM_DEFAULT_RE.find(rest) {
                Some(m) => {
                    let default = rest[m.end()..].trim();
                    (
                        rest[..m.start()].trim(),
                        (!default.is_empty()).then(|| default.to_string()),
                    )
                }
                None => (rest.trim(), None),
            };
            ProcedureParameter {
                name: unquote_identifier(raw_name),
                data_type: data_type.to_string(),
                default_value,
            }
        })
        .collect()
}

/// Remove one layer of `$tag$`, `'`, `"` or `/` delimiters and trim.
///
/// A single-quoted body has its doubled quotes unescaped.
fn strip_body_delimiters(body: &str) -> String {
    if let Some(marker) = dollar_marker(body) {
        if body.len() >= 2 * marker.len() && body.ends_with(marker) {
            return body[marker.len()..body.len() - marker.len()].trim().to_string();
        }
    }

    if body.len() >= 2 {
        let first = body.as_bytes()[0];
        if matches!(first, b'\'' | b'"' | b'/') && body.as_bytes()[body.len() - 1] == first {
            let inner = body[1..body.len() - 1].trim();
            if first == b'\'' {
                return inner.replace("''", "'");
            }
            return inner.to_string();
        }
    }

    body.to_string()
}

/// The `$tag$` marker a body starts with, if any
fn dollar_marker(body: &str) -> Option<&str> {
    let rest = body.strip_prefix('$')?;
    let tag_len = rest.find('$')?;
    let tag = &rest[..tag_len];
    if tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Some(&body[..tag_len + 2])
    } else {
        None
    }
}
