//! Low-level HCL writing utilities.
//!
//! These are the building blocks the resource writers use: string escaping,
//! default-value classification, heredoc formatting and an indenting line writer.

use std::sync::LazyLock;

use regex::Regex;

/// Numeric literal written as a `constant` default. Input: trimmed default text; anchored.
static NUMERIC_LITERAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?$").unwrap());

/// Escape a value for a double-quoted HCL string.
///
/// Order: `\`, `"`, `'`, LF, CR, TAB, `$`, NUL.
pub fn escape_string(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
        .replace('$', "\\$")
        .replace('\0', "\\0")
}

/// How a column default is expressed inside its `default` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    /// Numeric or boolean literal, written bare
    Constant(String),
    /// Anything else, written as an escaped string
    Expression(String),
}

impl DefaultValue {
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();
        if NUMERIC_LITERAL_RE.is_match(trimmed) {
            DefaultValue::Constant(trimmed.to_string())
        } else if trimmed.eq_ignore_ascii_case("TRUE") || trimmed.eq_ignore_ascii_case("FALSE") {
            DefaultValue::Constant(trimmed.to_ascii_lowercase())
        } else {
            DefaultValue::Expression(trimmed.to_string())
        }
    }

    /// `(attribute, rendered value)` for the `default` block
    pub fn attribute(&self) -> (&'static str, String) {
        match self {
            DefaultValue::Constant(literal) => ("constant", literal.clone()),
            DefaultValue::Expression(expression) => {
                ("expression", format!("\"{}\"", escape_string(expression)))
            }
        }
    }
}

/// Replace Terraform template introducers so they render literally
pub fn escape_template_sequences(text: &str) -> String {
    text.replace("${", "$${").replace("%{", "%%{")
}

/// Format a body as an indented heredoc for a top-level resource attribute.
///
/// Line endings are normalized to LF, common indentation is removed, each line is
/// indented by four spaces and the closing marker by two. The marker is `EOT`, or
/// `EOSQL` when a body line is exactly `EOT`. Template sequences must already be
/// escaped.
pub fn format_heredoc(body: &str) -> String {
    let normalized = body.replace("\r\n", "\n");
    let lines: Vec<&str> = normalized.trim_matches('\n').lines().collect();

    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let marker = if lines.iter().any(|line| line.trim() == "EOT") {
        "EOSQL"
    } else {
        "EOT"
    };

    let mut out = format!("<<-{}\n", marker);
    for line in &lines {
        if line.trim().is_empty() {
            out.push('\n');
        } else {
            out.push_str("    ");
            let dedented = line.get(indent..).unwrap_or_else(|| line.trim_start());
            out.push_str(dedented.trim_end());
            out.push('\n');
        }
    }
    out.push_str("  ");
    out.push_str(marker);
    out
}

/// Indenting writer for one `resource` block
pub struct HclWriter {
    out: String,
    depth: usize,
}

impl HclWriter {
    /// Start `resource "<type>" "<name>" {`
    pub fn resource(terraform_type: &str, name: &str) -> Self {
        Self {
            out: format!("resource \"{}\" \"{}\" {{\n", terraform_type, name),
            depth: 1,
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
    }

    /// `key = value` with the value written as given
    pub fn raw(&mut self, key: &str, value: &str) {
        self.indent();
        self.out.push_str(key);
        self.out.push_str(" = ");
        self.out.push_str(value);
        self.out.push('\n');
    }

    /// `key = "value"`, escaped
    pub fn string(&mut self, key: &str, value: &str) {
        self.raw(key, &format!("\"{}\"", escape_string(value)));
    }

    pub fn bool(&mut self, key: &str, value: bool) {
        self.raw(key, if value { "true" } else { "false" });
    }

    /// `key = ["a", "b"]`, each item escaped
    pub fn string_list<S: AsRef<str>>(&mut self, key: &str, items: &[S]) {
        let quoted: Vec<String> = items
            .iter()
            .map(|item| format!("\"{}\"", escape_string(item.as_ref())))
            .collect();
        self.raw(key, &format!("[{}]", quoted.join(", ")));
    }

    /// `key = <<-EOT ... EOT`, preceded by a blank line
    pub fn heredoc(&mut self, key: &str, body: &str) {
        self.blank_line();
        self.raw(key, &format_heredoc(body));
    }

    /// Open a nested block. Top-level blocks are preceded by a blank line.
    pub fn open_block(&mut self, name: &str) {
        if self.depth == 1 {
            self.blank_line();
        }
        self.indent();
        self.out.push_str(name);
        self.out.push_str(" {\n");
        self.depth += 1;
    }

    pub fn close_block(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        self.out.push_str("}\n");
    }

    pub fn blank_line(&mut self) {
        self.out.push('\n');
    }

    /// Close the resource and return the block text, ending in `}\n`
    pub fn finish(mut self) -> String {
        while self.depth > 1 {
            self.close_block();
        }
        self.out.push_str("}\n");
        self.out
    }
}
