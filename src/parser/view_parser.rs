//! CREATE VIEW extraction
//!
//! ```sql
//! CREATE [OR REPLACE] [SECURE] VIEW [IF NOT EXISTS] name [(col [COMMENT '...'], ...)]
//!     [COPY GRANTS] [COMMENT = 'text'] AS query
//! ```

use std::sync::LazyLock;

use regex::Regex;

use super::identifier_utils::{
    find_comment_clause, find_matching_paren, leading_identifier, read_object_name,
    skip_whitespace, split_top_level_commas, unquote_identifier,
};
use super::scanner::{mask_literals, strip_comments};
use crate::error::DdlParseError;
use crate::model::ViewDefinition;

/// Statement prefix up to the view name, capturing the OR REPLACE and SECURE flags.
/// Input: masked statement; anchored at the start.
static VIEW_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)^\s*CREATE\s+(OR\s+REPLACE\s+)?(SECURE\s+)?VIEW\s+(?:IF\s+NOT\s+EXISTS\s+)?",
    )
    .unwrap()
});

/// The `AS` keyword. Input: masked statement; unanchored, used from an offset.
pub(crate) static AS_KEYWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bAS\b").unwrap());

/// Extract a view from one CREATE VIEW statement
pub fn parse_create_view(statement: &str) -> Result<ViewDefinition, DdlParseError> {
    let masked = mask_literals(statement);
    let header = VIEW_HEADER_RE
        .captures(&masked)
        .ok_or(DdlParseError::MissingName { object: "VIEW" })?;
    let header_end = header.get(0).map(|m| m.end()).unwrap_or(0);
    let or_replace = header.get(1).is_some();
    let secure = header.get(2).is_some();

    let (name, name_end) = read_object_name(statement, &masked, header_end, "VIEW")?;

    let mut body_search = name_end;
    let mut columns = None;
    let open = skip_whitespace(&masked, name_end);
    if masked.as_bytes().get(open) == Some(&b'(') {
        let close = find_matching_paren(&masked, open).ok_or(
            DdlParseError::UnbalancedParentheses {
                context: "view column list",
            },
        )?;
        columns = Some(output_columns(&statement[open + 1..close]));
        body_search = close + 1;
    }

    let as_keyword = AS_KEYWORD_RE
        .find(&masked[body_search..])
        .ok_or(DdlParseError::MissingBody { object: "VIEW" })?;
    let as_start = body_search + as_keyword.start();
    let as_end = body_search + as_keyword.end();

    // Trailing comments would swallow the appended terminator
    let code_end = as_end + masked[as_end..].trim_end().len();
    let mut query = statement[as_end..code_end].trim().to_string();
    if query.is_empty() {
        return Err(DdlParseError::MissingBody { object: "VIEW" });
    }
    if !query.ends_with(';') {
        query.push(';');
    }

    Ok(ViewDefinition {
        name,
        columns,
        query,
        comment: find_comment_clause(statement, &masked, header_end..as_start),
        secure,
        or_replace,
    })
}

/// First identifier of each entry of a view's output-column list
fn output_columns(list: &str) -> Vec<String> {
    split_top_level_commas(&strip_comments(list))
        .iter()
        .map(|entry| unquote_identifier(leading_identifier(entry).0))
        .filter(|name| !name.is_empty())
        .collect()
}
