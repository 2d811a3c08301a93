//! Compile grammar definitions into precomputed rule-table source modules.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::multiple_crate_versions)]

/// Core structures for parsed grammar rules.
///
/// This module defines the working nodes grammar engines build and the
/// annotation-free nodes that generated code is made of. Everything else in
/// the pipeline passes these types along.
pub mod tree;

/// Grammar engines for the supported notations.
pub mod engine;

/// Input and output dialect selection.
pub mod dialect;

/// Export symbol validation.
pub mod ident;

/// Removal of parse-time annotations before emission.
pub mod sanitize;

/// Rendering of rule tables as TypeScript or JavaScript modules.
pub mod emit;

/// Validated run configuration.
pub mod config;

/// Error types shared by every stage.
pub mod error;

/// The read → parse → sanitize → emit → write run.
pub mod pipeline;

pub use config::{Config, LogLevel};
pub use dialect::{ExportDescriptor, GrammarDialect, OutputDialect};
pub use emit::{embed::SourceSnapshot, emit};
pub use engine::GrammarEngine;
pub use error::{ConfigError, Error, ParseError};
pub use pipeline::{compile, run};
pub use sanitize::{sanitize, sanitize_in_place, sanitize_rule};
pub use tree::{Annotations, ParsedRule, RuleKind, RuleNode, RuleTree};
