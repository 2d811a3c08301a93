//! Provenance comment block holding the original grammar text.

use super::doc::Doc;
use std::path::{Path, PathBuf};

/// The grammar text a rule table was generated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSnapshot {
    path: PathBuf,
    text: String,
}

impl SourceSnapshot {
    /// Captures grammar text together with the path it was read from.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// The originating path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The raw grammar text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

const PLACEHOLDER: &str = "// Grammar source not embedded.";
const SEPARATOR: &str = "// ----";

fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Splits text on any line terminator: `\r\n`, `\n`, `\r`, U+2028 or U+2029.
///
/// A terminator at the very end does not start another line.
pub(crate) fn source_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let Some(at) = rest.find(is_line_break) else {
            lines.push(rest);
            break;
        };
        lines.push(&rest[..at]);
        let terminator = if rest[at..].starts_with("\r\n") {
            2
        } else {
            rest[at..].chars().next().map_or(1, char::len_utf8)
        };
        rest = &rest[at + terminator..];
    }
    lines
}

/// The source block: the embedded grammar, or a placeholder when `snapshot`
/// is `None`.
pub(crate) fn source_block(snapshot: Option<&SourceSnapshot>) -> Vec<Doc> {
    let Some(snapshot) = snapshot else {
        return vec![Doc::text(PLACEHOLDER), Doc::Line];
    };

    let path = snapshot.path().display().to_string().replace(is_line_break, " ");
    let mut docs = vec![Doc::text(format!("// Grammar source: {path}")), Doc::Line];
    for line in source_lines(snapshot.text()) {
        if line.is_empty() {
            docs.push(Doc::text("//"));
        } else {
            docs.push(Doc::text(format!("// {line}")));
        }
        docs.push(Doc::Line);
    }
    docs.push(Doc::text(SEPARATOR));
    docs.push(Doc::Line);
    docs
}
