//! Export symbol validation.
//!
//! The symbol becomes a declaration name (`export const <symbol>`) or a
//! property assignment (`grammar.<symbol> = ...`), so the whole string must be
//! an identifier and must not be a reserved word.

use crate::error::ConfigError;
use once_cell::sync::Lazy;
use regex::Regex;

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid"));

const RESERVED_WORDS: &[&str] = &[
    "arguments",
    "await",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "eval",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "implements",
    "import",
    "in",
    "instanceof",
    "interface",
    "let",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
];

/// Checks that `symbol` can name the generated declaration.
///
/// # Errors
///
/// Returns [`ConfigError::EmptySymbol`], [`ConfigError::InvalidSymbol`] or
/// [`ConfigError::ReservedSymbol`].
pub fn validate_symbol(symbol: &str) -> Result<(), ConfigError> {
    if symbol.is_empty() {
        return Err(ConfigError::EmptySymbol);
    }
    if !IDENTIFIER.is_match(symbol) {
        return Err(ConfigError::InvalidSymbol(symbol.to_owned()));
    }
    if RESERVED_WORDS.contains(&symbol) {
        return Err(ConfigError::ReservedSymbol(symbol.to_owned()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_identifiers() {
        for symbol in ["rules", "G", "_private", "grammar_v2", "CamelCase"] {
            assert_eq!(validate_symbol(symbol), Ok(()), "{symbol}");
        }
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(validate_symbol(""), Err(ConfigError::EmptySymbol));
    }

    #[test]
    fn test_requires_whole_string_match() {
        for symbol in ["my rules", "rules;", "2fast", "a-b", "x.y", "名前"] {
            assert_eq!(
                validate_symbol(symbol),
                Err(ConfigError::InvalidSymbol(symbol.to_owned())),
                "{symbol}"
            );
        }
    }

    #[test]
    fn test_rejects_reserved_words() {
        assert_eq!(
            validate_symbol("default"),
            Err(ConfigError::ReservedSymbol("default".to_owned()))
        );
    }

    #[test]
    fn test_rejects_strict_mode_restricted_names() {
        for name in ["eval", "arguments"] {
            assert_eq!(
                validate_symbol(name),
                Err(ConfigError::ReservedSymbol(name.to_owned()))
            );
        }
        assert_eq!(validate_symbol("evaluate"), Ok(()));
    }
}
