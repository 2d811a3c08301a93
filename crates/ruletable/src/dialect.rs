//! Input and output dialects.
//!
//! The grammar dialect picks which engine reads the grammar text; the output
//! dialect, derived from the output file's extension, picks the shape of the
//! generated declaration. Both are closed enums parsed once at the boundary.

use crate::engine::{bnf::BnfEngine, custom::CustomEngine, w3c::W3cEngine, GrammarEngine};
use crate::error::ConfigError;
use crate::ident::validate_symbol;
use std::path::Path;
use std::str::FromStr;

/// The notation a grammar file is written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GrammarDialect {
    /// Classical BNF: `<rule> ::= <other> "literal"`.
    Bnf,
    /// W3C EBNF as used by the XML specification.
    W3cEbnf,
    /// ISO-style EBNF with `,` concatenation and `;` terminators.
    #[default]
    Custom,
}

impl GrammarDialect {
    /// Resolves an optional raw configuration value.
    ///
    /// A missing or blank value selects [`GrammarDialect::Custom`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownDialect`] for any other unrecognised value.
    pub fn resolve(raw: Option<&str>) -> Result<Self, ConfigError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(value) => value.parse(),
        }
    }

    /// The engine that reads this dialect.
    #[must_use]
    pub fn engine(self) -> &'static dyn GrammarEngine {
        match self {
            GrammarDialect::Bnf => &BnfEngine,
            GrammarDialect::W3cEbnf => &W3cEngine,
            GrammarDialect::Custom => &CustomEngine,
        }
    }

    /// The configuration spelling of this dialect.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GrammarDialect::Bnf => "bnf",
            GrammarDialect::W3cEbnf => "w3c-ebnf",
            GrammarDialect::Custom => "custom",
        }
    }
}

impl FromStr for GrammarDialect {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bnf" => Ok(GrammarDialect::Bnf),
            "w3c-ebnf" => Ok(GrammarDialect::W3cEbnf),
            "custom" => Ok(GrammarDialect::Custom),
            _ => Err(ConfigError::UnknownDialect(s.to_owned())),
        }
    }
}

/// The flavour of generated source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputDialect {
    /// TypeScript: a typed constant declaration.
    Typed,
    /// JavaScript: a property assignment on a plain namespace object.
    Untyped,
}

const TYPED_EXTENSIONS: &[&str] = &["ts", "tsx"];
const UNTYPED_EXTENSIONS: &[&str] = &["js", "mjs"];

impl OutputDialect {
    /// Detects the dialect from the output path's extension.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedExtension`] when the extension is
    /// missing or not one of `.ts`, `.tsx`, `.js`, `.mjs`.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if TYPED_EXTENSIONS.contains(&extension.as_str()) {
            Ok(OutputDialect::Typed)
        } else if UNTYPED_EXTENSIONS.contains(&extension.as_str()) {
            Ok(OutputDialect::Untyped)
        } else {
            Err(ConfigError::UnsupportedExtension(path.to_path_buf()))
        }
    }
}

/// The name and shape of the generated declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDescriptor {
    symbol: String,
    dialect: OutputDialect,
}

impl ExportDescriptor {
    /// Builds a descriptor after validating the symbol.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `symbol` cannot name a declaration.
    pub fn new(symbol: impl Into<String>, dialect: OutputDialect) -> Result<Self, ConfigError> {
        let symbol = symbol.into();
        validate_symbol(&symbol)?;
        Ok(Self { symbol, dialect })
    }

    /// Builds a descriptor for the module written to `output`.
    ///
    /// The symbol is validated before the output extension is looked at.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an invalid symbol or an unsupported
    /// output extension.
    pub fn for_output(symbol: impl Into<String>, output: &Path) -> Result<Self, ConfigError> {
        let symbol = symbol.into();
        validate_symbol(&symbol)?;
        let dialect = OutputDialect::from_path(output)?;
        Ok(Self { symbol, dialect })
    }

    /// The exported identifier.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The output dialect.
    #[must_use]
    pub fn dialect(&self) -> OutputDialect {
        self.dialect
    }
}
