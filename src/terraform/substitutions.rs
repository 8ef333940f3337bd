//! Rewrites applied to view queries and procedure bodies before they are embedded
//!
//! 1. Terraform template introducers are escaped (`${` → `$${`, `%{` → `%%{`).
//! 2. Database names become `${local.databases[var.DATABASE]}`.
//! 3. Identifiers ending in an environment suffix (`_SANDBOX`) lose it.

use regex::Regex;

use super::hcl_helpers::escape_template_sequences;
use super::naming::DATABASE_REFERENCE;

/// Compiled body rewrites for one conversion
#[derive(Debug, Clone)]
pub struct BodySubstitutions {
    /// Input: template-escaped body; unanchored, case-insensitive, word-bounded
    database_re: Option<Regex>,
    /// Input: body after database replacement; unanchored, case-insensitive
    suffix_re: Option<Regex>,
}

impl BodySubstitutions {
    pub fn new<S: AsRef<str>>(database_tokens: &[S], schema_suffixes: &[S]) -> Self {
        Self {
            database_re: alternation(database_tokens).and_then(|alternatives| {
                Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives)).ok()
            }),
            suffix_re: alternation(schema_suffixes).and_then(|alternatives| {
                Regex::new(&format!(r"(?i)\b([A-Za-z0-9_]+?)(?:{})\b", alternatives)).ok()
            }),
        }
    }

    /// Apply all rewrites to a body
    pub fn apply(&self, body: &str) -> String {
        let mut text = escape_template_sequences(body);

        if let Some(re) = &self.database_re {
            let replacement = format!("${{{}}}", DATABASE_REFERENCE);
            text = re
                .replace_all(&text, regex::NoExpand(&replacement))
                .into_owned();
        }

        if let Some(re) = &self.suffix_re {
            text = re.replace_all(&text, "${1}").into_owned();
        }

        text
    }
}

/// Escaped `a|b|c` of the non-empty tokens, longest first so prefixes never win
fn alternation<S: AsRef<str>>(tokens: &[S]) -> Option<String> {
    let mut escaped: Vec<String> = tokens
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .map(regex::escape)
        .collect();
    if escaped.is_empty() {
        return None;
    }
    escaped.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    escaped.dedup();
    Some(escaped.join("|"))
}
