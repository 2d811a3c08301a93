//! A flat document model for generated source, and its printer.
//!
//! Emitters describe output as a sequence of [`Doc`] items; the [`Printer`]
//! owns indentation and string-literal escaping. Nesting is expressed with
//! `Indent`/`Dedent` markers rather than nested documents, so printing never
//! recurses however deep the rule tree is.

use std::borrow::Cow;

/// One item of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Doc {
    /// Verbatim text. Must not contain line breaks.
    Text(Cow<'static, str>),
    /// A double-quoted string literal, escaped by the printer.
    Str(String),
    /// A line break.
    Line,
    /// Increase indentation for the following lines.
    Indent,
    /// Decrease indentation for the following lines.
    Dedent,
}

impl Doc {
    pub(crate) fn text(text: impl Into<Cow<'static, str>>) -> Self {
        Doc::Text(text.into())
    }

    pub(crate) fn str(value: impl Into<String>) -> Self {
        Doc::Str(value.into())
    }
}

/// Renders [`Doc`] items to a string.
pub(crate) struct Printer {
    output: String,
    indent_level: usize,
    at_line_start: bool,
}

const INDENT: &str = "  ";

impl Printer {
    pub(crate) fn new() -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            at_line_start: true,
        }
    }

    pub(crate) fn print(mut self, docs: &[Doc]) -> String {
        for doc in docs {
            match doc {
                Doc::Text(text) => self.push(text),
                Doc::Str(value) => {
                    let quoted = quote(value);
                    self.push(&quoted);
                }
                Doc::Line => {
                    self.output.push('\n');
                    self.at_line_start = true;
                }
                Doc::Indent => self.indent_level += 1,
                Doc::Dedent => self.indent_level = self.indent_level.saturating_sub(1),
            }
        }
        self.output
    }

    fn push(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.at_line_start {
            for _ in 0..self.indent_level {
                self.output.push_str(INDENT);
            }
            self.at_line_start = false;
        }
        self.output.push_str(text);
    }
}

/// Quotes `value` as a string literal valid in both JSON and ECMAScript.
pub(crate) fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            '\u{8}' => quoted.push_str("\\b"),
            '\u{c}' => quoted.push_str("\\f"),
            // Line terminators in ECMAScript source, though legal in JSON strings.
            '\u{2028}' | '\u{2029}' => quoted.push_str(&format!("\\u{:04x}", u32::from(c))),
            c if u32::from(c) < 0x20 || c == '\u{7f}' => {
                quoted.push_str(&format!("\\u{:04x}", u32::from(c)));
            }
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
