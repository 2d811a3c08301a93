//! Error types for the rule-table pipeline.
//!
//! Every error is terminal for a run. [`Error::exit_code`] gives each category
//! its own process exit status.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Pipeline result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Invalid configuration, detected before any file is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The grammar dialect is not one of the supported notations.
    #[error("unknown grammar dialect '{0}' (expected one of: bnf, w3c-ebnf, custom)")]
    UnknownDialect(String),

    /// The log level is not one of the supported verbosities.
    #[error("unknown log level '{0}' (expected one of: quiet, debug, verbose)")]
    UnknownLogLevel(String),

    /// The export symbol is empty.
    #[error("export symbol must not be empty")]
    EmptySymbol,

    /// The export symbol is not shaped like an identifier.
    #[error("export symbol '{0}' is not a valid identifier")]
    InvalidSymbol(String),

    /// The export symbol is a reserved word and cannot name a declaration.
    #[error("export symbol '{0}' is a reserved word")]
    ReservedSymbol(String),

    /// The output path does not end in a recognised source extension.
    #[error(
        "unsupported output file '{}' (expected a .ts, .tsx, .js or .mjs extension)",
        .0.display()
    )]
    UnsupportedExtension(PathBuf),
}

/// A grammar engine rejected its input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{engine} grammar, line {line}, column {column}: {message}")]
pub struct ParseError {
    /// Name of the engine that raised the error.
    pub engine: &'static str,
    /// 1-based line of the offending position.
    pub line: usize,
    /// 1-based column (in characters) of the offending position.
    pub column: usize,
    /// What went wrong.
    pub message: String,
}

impl ParseError {
    /// Creates an error located at byte `offset` of `source`.
    #[must_use]
    pub fn at(
        engine: &'static str,
        source: &str,
        offset: usize,
        message: impl Into<String>,
    ) -> Self {
        let before = source.get(..offset).unwrap_or(source);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        Self {
            engine,
            line,
            column,
            message: message.into(),
        }
    }
}

/// Any failure of a pipeline run.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The grammar file could not be read.
    #[error("cannot read grammar '{}': {source}", .path.display())]
    Input {
        /// The grammar path.
        path: PathBuf,
        /// The underlying I/O failure.
        source: io::Error,
    },

    /// The grammar engine rejected the grammar text.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The output file could not be written.
    #[error("cannot write '{}': {source}", .path.display())]
    Output {
        /// The output path.
        path: PathBuf,
        /// The underlying I/O failure.
        source: io::Error,
    },
}

impl Error {
    /// Process exit status for this error category.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Config(_) => 2,
            Error::Input { .. } => 3,
            Error::Parse(_) => 4,
            Error::Output { .. } => 5,
        }
    }
}
