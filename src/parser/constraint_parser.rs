//! Table constraint parsing for Snowflake CREATE TABLE column lists
//!
//! ## Supported Syntax
//!
//! Out-of-line constraints (one column-list entry each):
//! ```sql
//! [CONSTRAINT name] PRIMARY KEY (col, ...) [flags]
//! [CONSTRAINT name] UNIQUE (col, ...) [flags]
//! [CONSTRAINT name] FOREIGN KEY (col, ...) REFERENCES table [(col, ...)] [flags]
//! [CONSTRAINT name] CHECK (expression)
//! ```
//!
//! Flags: `RELY | NORELY`, `ENABLE | DISABLE`, `ENFORCED | NOT ENFORCED`,
//! `DEFERRABLE | NOT DEFERRABLE`. `VALIDATE`, `NOVALIDATE` and `INITIALLY ...`
//! are accepted and ignored.

use std::sync::LazyLock;

use regex::Regex;

use super::identifier_utils::{
    find_matching_paren, split_qualified_name, split_top_level_commas, unquote_identifier,
};
use crate::model::{ConstraintDefinition, ConstraintKind, ConstraintProperties, ForeignKeyReference};

/// Entry introducers that mark a column-list entry as a constraint.
/// Input: one trimmed, comment-stripped column-list entry; anchored at its start.
static CONSTRAINT_INTRODUCER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(CONSTRAINT|PRIMARY\s+KEY|FOREIGN\s+KEY|UNIQUE|CHECK)\b").unwrap()
});

/// `CONSTRAINT <name> <rest>`; the name may be double-quoted.
/// Input: one trimmed column-list entry; anchored at its start.
static NAMED_CONSTRAINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)^CONSTRAINT\s+("(?:[^"]|"")+"|[^\s(]+)\s*(.*)$"#).unwrap()
});

/// Constraint kind keywords at the start of the remaining entry text, up to the `(`
static KIND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(PRIMARY\s+KEY|UNIQUE|FOREIGN\s+KEY|CHECK)\s*\(").unwrap()
});

/// `REFERENCES <table>` right after a foreign key column list
static REFERENCES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)^\s*REFERENCES\s+("[^"]*"|[^\s(]+)+"#).unwrap());

/// A constraint as written in SQL, before the owning table assigns a name to unnamed ones
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedConstraint {
    pub name: Option<String>,
    pub kind: ConstraintKind,
    pub columns: Vec<String>,
    pub properties: ConstraintProperties,
    pub references: Option<ForeignKeyReference>,
    pub expression: Option<String>,
}

impl ParsedConstraint {
    pub fn new(kind: ConstraintKind, columns: Vec<String>) -> Self {
        Self {
            name: None,
            kind,
            columns,
            properties: ConstraintProperties::default(),
            references: None,
            expression: None,
        }
    }

    /// Finish the constraint, using `fallback_name` when the SQL gave none
    pub fn into_definition(self, fallback_name: impl FnOnce() -> String) -> ConstraintDefinition {
        ConstraintDefinition {
            name: self.name.unwrap_or_else(fallback_name),
            kind: self.kind,
            columns: self.columns,
            properties: self.properties,
            references: self.references,
            expression: self.expression,
        }
    }
}

/// Whether a column-list entry starts like a constraint rather than a column
pub fn is_constraint_entry(entry: &str) -> bool {
    CONSTRAINT_INTRODUCER_RE.is_match(entry.trim_start())
}

/// Whether a column-list entry starts with the explicit `CONSTRAINT` keyword
pub fn is_named_constraint_entry(entry: &str) -> bool {
    let trimmed = entry.trim_start();
    trimmed
        .get(..10)
        .is_some_and(|keyword| keyword.eq_ignore_ascii_case("CONSTRAINT"))
        && trimmed[10..].starts_with(char::is_whitespace)
}

/// Parse one out-of-line constraint entry.
///
/// Returns `None` if the entry is not a recognizable constraint.
pub fn parse_table_constraint(entry: &str) -> Option<ParsedConstraint> {
    let entry = entry.trim();
    let (name, rest) = match NAMED_CONSTRAINT_RE.captures(entry) {
        Some(caps) => {
            let name = unquote_identifier(caps.get(1)?.as_str());
            (Some(name), caps.get(2)?.as_str())
        }
        None => (None, entry),
    };

    let kind_match = KIND_RE.captures(rest)?;
    let kind = kind_from_keyword(kind_match.get(1)?.as_str())?;
    let open = kind_match.get(0)?.end() - 1;
    let close = find_matching_paren(rest, open)?;
    let inner = &rest[open + 1..close];
    let mut tail = &rest[close + 1..];

    let mut constraint = match kind {
        ConstraintKind::Check => {
            let mut check = ParsedConstraint::new(kind, Vec::new());
            check.expression = Some(inner.trim().to_string());
            check
        }
        _ => ParsedConstraint::new(kind, identifier_list(inner)),
    };
    constraint.name = name;

    if kind == ConstraintKind::ForeignKey {
        let (references, remaining) = parse_references(tail)?;
        constraint.references = Some(references);
        tail = remaining;
    }

    let tokens: Vec<&str> = tail.split_whitespace().collect();
    let mut i = 0;
    while i < tokens.len() {
        i += apply_constraint_flag(&tokens, i, &mut constraint.properties).unwrap_or(1);
    }

    Some(constraint)
}

fn kind_from_keyword(keyword: &str) -> Option<ConstraintKind> {
    let upper = keyword.to_ascii_uppercase();
    if upper.starts_with("PRIMARY") {
        Some(ConstraintKind::PrimaryKey)
    } else if upper.starts_with("FOREIGN") {
        Some(ConstraintKind::ForeignKey)
    } else if upper == "UNIQUE" {
        Some(ConstraintKind::Unique)
    } else if upper == "CHECK" {
        Some(ConstraintKind::Check)
    } else {
        None
    }
}

/// Parse `REFERENCES table [(cols)]`, returning the reference and the text after it
pub fn parse_references(text: &str) -> Option<(ForeignKeyReference, &str)> {
    let caps = REFERENCES_RE.captures(text)?;
    let whole = caps.get(0)?;
    let table = split_qualified_name(whole.as_str().trim_start()[10..].trim());

    let after_table = &text[whole.end()..];
    let open = after_table.len() - after_table.trim_start().len();
    if after_table[open..].starts_with('(') {
        let close = find_matching_paren(after_table, open)?;
        let columns = identifier_list(&after_table[open + 1..close]);
        return Some((ForeignKeyReference { table, columns }, &after_table[close + 1..]));
    }

    Some((
        ForeignKeyReference {
            table,
            columns: Vec::new(),
        },
        after_table,
    ))
}

/// Apply a constraint flag starting at `tokens[i]`.
///
/// Returns the number of tokens consumed, or `None` if `tokens[i]` is not a flag.
pub fn apply_constraint_flag(
    tokens: &[&str],
    i: usize,
    properties: &mut ConstraintProperties,
) -> Option<usize> {
    let word = tokens.get(i)?.to_ascii_uppercase();
    let next = tokens.get(i + 1).map(|t| t.to_ascii_uppercase());
    match word.as_str() {
        "RELY" => properties.rely = Some(true),
        "NORELY" => properties.rely = Some(false),
        "ENABLE" | "ENFORCED" => properties.enable = Some(true),
        "DISABLE" => properties.enable = Some(false),
        "DEFERRABLE" => properties.deferrable = Some(true),
        "VALIDATE" | "NOVALIDATE" => {}
        "INITIALLY" => return Some(if next.is_some() { 2 } else { 1 }),
        "NOT" => match next.as_deref() {
            Some("ENFORCED") => {
                properties.enable = Some(false);
                return Some(2);
            }
            Some("DEFERRABLE") => {
                properties.deferrable = Some(false);
                return Some(2);
            }
            _ => return None,
        },
        _ => return None,
    }
    Some(1)
}

fn identifier_list(text: &str) -> Vec<String> {
    split_top_level_commas(text)
        .iter()
        .map(|c| unquote_identifier(c))
        .filter(|c| !c.is_empty())
        .collect()
}
