//! CREATE TABLE extraction
//!
//! ```sql
//! CREATE [OR REPLACE] TABLE [IF NOT EXISTS] name (
//!     column_or_constraint [, ...]
//! ) [CLUSTER BY (expr, ...)] [COMMENT = 'text'] [other options]
//! ```
//!
//! Structure is located on the masked statement and the pieces are sliced from the
//! original text, so parentheses and keywords inside literals or comments never count.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::column_parser::parse_column_definition;
use super::constraint_parser::{
    is_constraint_entry, is_named_constraint_entry, parse_table_constraint, ParsedConstraint,
};
use super::identifier_utils::{
    find_comment_clause, find_matching_paren, read_object_name, skip_whitespace,
    split_top_level_commas, unquote_identifier,
};
use super::scanner::{mask_literals, strip_comments};
use crate::error::DdlParseError;
use crate::model::{ConstraintDefinition, TableDefinition};

/// Statement prefix up to the table name.
/// Input: masked statement; anchored at the start.
static TABLE_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*CREATE\s+(?:OR\s+REPLACE\s+)?TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?").unwrap()
});

/// `CLUSTER BY (` after the column list. Input: masked statement tail; unanchored.
static CLUSTER_BY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bCLUSTER\s+BY\s*(?:LINEAR\s*)?\(").unwrap());

/// Extract a table from one CREATE TABLE statement
pub fn parse_create_table(statement: &str) -> Result<TableDefinition, DdlParseError> {
    let masked = mask_literals(statement);
    let header = TABLE_HEADER_RE
        .find(&masked)
        .ok_or(DdlParseError::MissingName { object: "TABLE" })?;
    let (name, name_end) = read_object_name(statement, &masked, header.end(), "TABLE")?;

    let open = skip_whitespace(&masked, name_end);
    if masked.as_bytes().get(open) != Some(&b'(') {
        return Err(DdlParseError::MissingColumnList);
    }
    let close = find_matching_paren(&masked, open).ok_or(DdlParseError::UnbalancedParentheses {
        context: "column list",
    })?;

    let mut table = TableDefinition {
        name,
        ..Default::default()
    };
    let column_list = strip_comments(&statement[open + 1..close]);
    let mut names = ConstraintNamer::new(&table.name.name);

    for entry in split_top_level_commas(&column_list) {
        if is_constraint_entry(&entry) {
            if let Some(constraint) = parse_table_constraint(&entry) {
                table.constraints.push(names.finish(constraint));
                continue;
            }
            if is_named_constraint_entry(&entry) {
                log::debug!("Skipping unrecognized constraint in {}: {}", table.name.name, entry);
                continue;
            }
        }

        match parse_column_definition(&entry) {
            Some(parsed) => {
                table.columns.push(parsed.column);
                for constraint in parsed.inline_constraints {
                    table.constraints.push(names.finish(constraint));
                }
            }
            None => log::debug!("Skipping column entry in {}: {}", table.name.name, entry),
        }
    }

    let tail = close + 1;
    table.comment = find_comment_clause(statement, &masked, tail..statement.len());
    table.cluster_by = find_cluster_by(statement, &masked, tail);

    Ok(table)
}

fn find_cluster_by(statement: &str, masked: &str, from: usize) -> Option<Vec<String>> {
    let found = CLUSTER_BY_RE.find(&masked[from..])?;
    let open = from + found.end() - 1;
    let close = find_matching_paren(masked, open)?;
    let keys: Vec<String> = split_top_level_commas(&strip_comments(&statement[open + 1..close]))
        .iter()
        .map(|key| unquote_identifier(key))
        .filter(|key| !key.is_empty())
        .collect();
    (!keys.is_empty()).then_some(keys)
}

/// Assigns `<TABLE>_<PK|FK|UK|CK>[_n]` names to constraints declared without one
struct ConstraintNamer {
    table: String,
    used: HashSet<String>,
}

impl ConstraintNamer {
    fn new(table: &str) -> Self {
        Self {
            table: table.to_uppercase(),
            used: HashSet::new(),
        }
    }

    fn finish(&mut self, constraint: ParsedConstraint) -> ConstraintDefinition {
        let base = format!("{}_{}", self.table, constraint.kind.abbreviation());
        let used = &self.used;
        let definition = constraint.into_definition(|| {
            if !used.contains(&base) {
                return base.clone();
            }
            (2..)
                .map(|n| format!("{}_{}", base, n))
                .find(|candidate| !used.contains(candidate))
                .unwrap_or_default()
        });
        self.used.insert(definition.name.clone());
        definition
    }
}
