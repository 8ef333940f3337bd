//! Lexical scanner for Snowflake SQL scripts
//!
//! Classifies a script into regions (code, quoted strings, quoted identifiers,
//! comments, dollar-quoted bodies) and derives the views the extractors work on:
//!
//! - [`split_statements`]: top-level statements, split on `;` in code only
//! - [`strip_comments`]: comment-free text used for keyword classification
//! - [`mask_literals`]: an offset-preserving projection where comments are
//!   blanked and literal interiors are replaced by `_`, so structural regexes
//!   can run on it and their offsets can slice the original statement
//!
//! All delimiters are ASCII, so every region boundary is a char boundary.

/// Lexical state a region was scanned in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    Code,
    SingleQuote,
    DoubleQuote,
    LineComment,
    BlockComment,
    DollarQuote,
}

/// A byte range of the input scanned in a single lexical state.
///
/// Quoted and dollar-quoted regions include their delimiters. Line comments
/// stop before the newline, which belongs to the following code region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub kind: RegionKind,
    pub start: usize,
    pub end: usize,
}

impl Region {
    fn new(kind: RegionKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, RegionKind::LineComment | RegionKind::BlockComment)
    }
}

/// A top-level statement with the line it starts on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statement<'a> {
    /// Statement text, trimmed, without its terminator
    pub text: &'a str,
    /// 1-based line number of the first non-whitespace character
    pub start_line: usize,
}

/// Scan `sql` into consecutive regions covering the whole input.
///
/// Unterminated strings, comments and dollar-quoted bodies run to the end of input.
pub fn scan_regions(sql: &str) -> Vec<Region> {
    let bytes = sql.as_bytes();
    let mut regions = Vec::new();
    let mut code_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let next = bytes.get(i + 1).copied();
        let special = match bytes[i] {
            b'\'' => Some((RegionKind::SingleQuote, quoted_end(bytes, i, b'\''))),
            b'"' => Some((RegionKind::DoubleQuote, quoted_end(bytes, i, b'"'))),
            b'-' if next == Some(b'-') => Some((RegionKind::LineComment, line_comment_end(bytes, i))),
            b'/' if next == Some(b'*') => {
                Some((RegionKind::BlockComment, block_comment_end(bytes, i)))
            }
            b'$' => dollar_marker_len(bytes, i)
                .map(|marker_len| (RegionKind::DollarQuote, dollar_quote_end(bytes, i, marker_len))),
            _ => None,
        };

        match special {
            Some((kind, end)) => {
                if code_start < i {
                    regions.push(Region::new(RegionKind::Code, code_start, i));
                }
                regions.push(Region::new(kind, i, end));
                i = end;
                code_start = end;
            }
            None => i += 1,
        }
    }

    if code_start < bytes.len() {
        regions.push(Region::new(RegionKind::Code, code_start, bytes.len()));
    }

    regions
}

/// End (exclusive) of a quoted region starting at `start`. A doubled quote is an escape.
fn quoted_end(bytes: &[u8], start: usize, quote: u8) -> usize {
    let mut j = start + 1;
    while j < bytes.len() {
        if bytes[j] == quote {
            if bytes.get(j + 1) == Some(&quote) {
                j += 2;
                continue;
            }
            return j + 1;
        }
        j += 1;
    }
    bytes.len()
}

fn line_comment_end(bytes: &[u8], start: usize) -> usize {
    bytes[start + 2..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|pos| start + 2 + pos)
        .unwrap_or(bytes.len())
}

fn block_comment_end(bytes: &[u8], start: usize) -> usize {
    bytes[start + 2..]
        .windows(2)
        .position(|w| w == b"*/")
        .map(|pos| start + 2 + pos + 2)
        .unwrap_or(bytes.len())
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Length of a `$tag$` opening marker at `start`, where the tag is empty or made of
/// word characters. A `$` that continues an identifier (`MY$COL`) never opens one.
fn dollar_marker_len(bytes: &[u8], start: usize) -> Option<usize> {
    if start > 0 && is_ident_byte(bytes[start - 1]) {
        return None;
    }
    let mut j = start + 1;
    while j < bytes.len() && (bytes[j].is_ascii_alphanumeric() || bytes[j] == b'_') {
        j += 1;
    }
    (j < bytes.len() && bytes[j] == b'$').then_some(j - start + 1)
}

fn dollar_quote_end(bytes: &[u8], start: usize, marker_len: usize) -> usize {
    let marker = &bytes[start..start + marker_len];
    let body_start = start + marker_len;
    bytes[body_start..]
        .windows(marker_len)
        .position(|w| w == marker)
        .map(|pos| body_start + pos + marker_len)
        .unwrap_or(bytes.len())
}

/// Split a script into top-level statements.
///
/// `;` terminates a statement only in code. Statements are trimmed and empty ones
/// dropped; trailing text after the last terminator forms a final statement.
pub fn split_statements(sql: &str) -> Vec<Statement<'_>> {
    let mut splitter = StatementSplitter::new(sql);

    for region in scan_regions(sql) {
        if region.kind != RegionKind::Code {
            continue;
        }
        for (offset, _) in sql[region.start..region.end].match_indices(';') {
            splitter.close_at(region.start + offset);
        }
    }
    splitter.finish()
}

struct StatementSplitter<'a> {
    sql: &'a str,
    statements: Vec<Statement<'a>>,
    statement_start: usize,
    // Line counting is incremental so long scripts stay linear
    line: usize,
    line_counted_to: usize,
}

impl<'a> StatementSplitter<'a> {
    fn new(sql: &'a str) -> Self {
        Self {
            sql,
            statements: Vec::new(),
            statement_start: 0,
            line: 1,
            line_counted_to: 0,
        }
    }

    fn close_at(&mut self, terminator: usize) {
        self.push(self.statement_start, terminator);
        self.statement_start = terminator + 1;
    }

    fn finish(mut self) -> Vec<Statement<'a>> {
        self.push(self.statement_start, self.sql.len());
        self.statements
    }

    fn push(&mut self, start: usize, end: usize) {
        let raw = &self.sql[start..end];
        let text = raw.trim();
        if text.is_empty() {
            return;
        }
        let text_start = start + (raw.len() - raw.trim_start().len());
        self.line += self.sql[self.line_counted_to..text_start].matches('\n').count();
        self.line_counted_to = text_start;
        self.statements.push(Statement {
            text,
            start_line: self.line,
        });
    }
}

/// Remove comments, keeping quoted and dollar-quoted content unchanged.
///
/// Line comments are dropped up to (not including) their newline; block comments
/// are replaced by a single space.
pub fn strip_comments(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    for region in scan_regions(sql) {
        match region.kind {
            RegionKind::LineComment => {}
            RegionKind::BlockComment => out.push(' '),
            _ => out.push_str(&sql[region.start..region.end]),
        }
    }
    out
}

/// [`strip_comments`] that also empties single-quoted strings, leaving `''`.
///
/// Quoted identifiers and dollar-quoted bodies are kept.
pub fn strip_comments_and_strings(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    for region in scan_regions(sql) {
        match region.kind {
            RegionKind::LineComment => {}
            RegionKind::BlockComment => out.push(' '),
            RegionKind::SingleQuote => out.push_str("''"),
            _ => out.push_str(&sql[region.start..region.end]),
        }
    }
    out
}

/// Offset-preserving projection of `sql`: comments become spaces, the interior of
/// strings, quoted identifiers and dollar-quoted bodies becomes `_`. Delimiters and
/// newlines are kept, so byte offsets into the result are valid in `sql`.
pub fn mask_literals(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    for region in scan_regions(sql) {
        let text = &sql[region.start..region.end];
        match region.kind {
            RegionKind::Code => out.push_str(text),
            RegionKind::LineComment | RegionKind::BlockComment => {
                push_masked(&mut out, text.as_bytes(), ' ');
            }
            RegionKind::SingleQuote | RegionKind::DoubleQuote => {
                let bytes = text.as_bytes();
                let close = usize::from(bytes.len() >= 2 && bytes[bytes.len() - 1] == bytes[0]);
                push_delimited(&mut out, text, 1, close);
            }
            RegionKind::DollarQuote => {
                let bytes = text.as_bytes();
                let marker_len = dollar_marker_len(bytes, 0).unwrap_or(1);
                let terminated = bytes.len() >= 2 * marker_len
                    && bytes[bytes.len() - marker_len..] == bytes[..marker_len];
                let close = if terminated { marker_len } else { 0 };
                push_delimited(&mut out, text, marker_len, close);
            }
        }
    }
    out
}

fn push_delimited(out: &mut String, text: &str, open: usize, close: usize) {
    let open = open.min(text.len());
    let close_start = text.len().saturating_sub(close).max(open);
    out.push_str(&text[..open]);
    push_masked(out, &text.as_bytes()[open..close_start], '_');
    out.push_str(&text[close_start..]);
}

/// Push one replacement byte per input byte, keeping newlines
fn push_masked(out: &mut String, bytes: &[u8], fill: char) {
    out.extend(bytes.iter().map(|&b| if b == b'\n' { '\n' } else { fill }));
}
