//! Script-level DDL parsing: segment, classify, extract

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::procedure_parser::parse_create_procedure;
use super::scanner::{split_statements, strip_comments};
use super::table_parser::parse_create_table;
use super::view_parser::parse_create_view;
use crate::error::DdlParseError;
use crate::model::DdlObject;
use crate::util::excerpt;

// Classifiers. Input: comment-stripped statement text; anchored at the start.
static CREATE_TABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*CREATE\s+(OR\s+REPLACE\s+)?TABLE\s").unwrap());
static CREATE_VIEW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*CREATE\s+(OR\s+REPLACE\s+)?(SECURE\s+)?VIEW\s").unwrap()
});
static CREATE_PROCEDURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*CREATE\s+(OR\s+REPLACE\s+)?PROCEDURE\s").unwrap());

/// Characters of statement text kept in a diagnostic excerpt
const EXCERPT_LEN: usize = 80;

/// A recognized CREATE statement that could not be extracted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line the statement starts on
    pub line: usize,
    /// Start of the statement, whitespace collapsed
    pub excerpt: String,
    pub error: DdlParseError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ({})", self.line, self.error, self.excerpt)
    }
}

/// Objects extracted from a script, plus the statements that were dropped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutput {
    pub objects: Vec<DdlObject>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse a script into DDL objects, in statement order.
///
/// Statements other than CREATE TABLE/VIEW/PROCEDURE are skipped. Malformed CREATE
/// statements are dropped; use [`parse_ddl`] to see why.
pub fn parse(sql: &str) -> Vec<DdlObject> {
    parse_ddl(sql).objects
}

/// Parse a script, keeping a diagnostic for every recognized statement that failed
pub fn parse_ddl(sql: &str) -> ParseOutput {
    let mut output = ParseOutput::default();

    for statement in split_statements(sql) {
        let stripped = strip_comments(statement.text);
        let result = if CREATE_TABLE_RE.is_match(&stripped) {
            parse_create_table(statement.text).map(DdlObject::Table)
        } else if CREATE_VIEW_RE.is_match(&stripped) {
            parse_create_view(statement.text).map(DdlObject::View)
        } else if CREATE_PROCEDURE_RE.is_match(&stripped) {
            parse_create_procedure(statement.text).map(DdlObject::Procedure)
        } else {
            continue;
        };

        match result {
            Ok(object) => output.objects.push(object),
            Err(error) => {
                let diagnostic = Diagnostic {
                    line: statement.start_line,
                    excerpt: excerpt(statement.text, EXCERPT_LEN),
                    error,
                };
                log::warn!("Dropping statement at {}", diagnostic);
                output.diagnostics.push(diagnostic);
            }
        }
    }

    output
}
