//! Run configuration, validated once before any file is touched.

use crate::dialect::{ExportDescriptor, GrammarDialect};
use crate::error::ConfigError;
use std::path::PathBuf;

/// Export symbol used when none is configured.
pub const DEFAULT_SYMBOL: &str = "rules";

/// How much the command-line tool logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Informational messages only.
    #[default]
    Quiet,
    /// Per-stage progress.
    Debug,
    /// Per-rule detail.
    Verbose,
}

impl LogLevel {
    /// Resolves an optional raw configuration value; missing or blank is
    /// [`LogLevel::Quiet`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownLogLevel`] for an unrecognised value.
    pub fn resolve(raw: Option<&str>) -> Result<Self, ConfigError> {
        match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("quiet") => Ok(LogLevel::Quiet),
            Some("debug") => Ok(LogLevel::Debug),
            Some("verbose") => Ok(LogLevel::Verbose),
            Some(_) => Err(ConfigError::UnknownLogLevel(
                raw.unwrap_or_default().to_owned(),
            )),
        }
    }

    /// The `tracing` filter directive for this level.
    #[must_use]
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Quiet => "info",
            LogLevel::Debug => "debug",
            LogLevel::Verbose => "trace",
        }
    }
}

/// Everything one run needs, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Grammar file to read.
    pub input: PathBuf,
    /// Module to write.
    pub output: PathBuf,
    /// Notation of the grammar file.
    pub dialect: GrammarDialect,
    /// Name and shape of the generated declaration.
    pub export: ExportDescriptor,
    /// Whether to embed the grammar text in the output.
    pub embed_source: bool,
}

impl Config {
    /// Validates raw settings.
    ///
    /// The export symbol is checked first, then the output extension, then the
    /// grammar dialect. Nothing here reads or writes files.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn resolve(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        dialect: Option<&str>,
        symbol: Option<&str>,
        embed_source: bool,
    ) -> Result<Self, ConfigError> {
        let output = output.into();
        let export = ExportDescriptor::for_output(symbol.unwrap_or(DEFAULT_SYMBOL), &output)?;
        let dialect = GrammarDialect::resolve(dialect)?;

        Ok(Self {
            input: input.into(),
            output,
            dialect,
            export,
            embed_source,
        })
    }
}
