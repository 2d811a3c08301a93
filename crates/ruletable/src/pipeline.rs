//! The end-to-end run: read, parse, sanitize, emit, write.

use crate::config::Config;
use crate::dialect::ExportDescriptor;
use crate::emit::{embed::SourceSnapshot, emit};
use crate::engine::GrammarEngine;
use crate::error::{Error, ParseError, Result};
use crate::sanitize::sanitize;
use chrono::{DateTime, Utc};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Parses grammar text and renders the generated module, without any I/O.
///
/// When `source_path` is given, the grammar text is embedded under that path.
///
/// # Errors
///
/// Propagates the engine's [`ParseError`] unchanged.
pub fn compile(
    engine: &dyn GrammarEngine,
    text: &str,
    export: &ExportDescriptor,
    source_path: Option<&Path>,
    generated_at: DateTime<Utc>,
) -> std::result::Result<String, ParseError> {
    let tree = engine.parse(text)?;
    debug!(
        engine = engine.name(),
        rules = tree.len(),
        nodes = tree.iter().map(|rule| rule.node_count()).sum::<usize>(),
        depth = tree.iter().map(|rule| rule.depth()).max().unwrap_or_default(),
        "parsed grammar"
    );
    let rules = sanitize(tree);
    let snapshot = source_path.map(|path| SourceSnapshot::new(path, text));
    Ok(emit(&rules, export, snapshot.as_ref(), generated_at))
}

/// Runs the whole pipeline for a validated configuration.
///
/// # Errors
///
/// Returns [`Error::Input`] if the grammar cannot be read, [`Error::Parse`] if
/// the engine rejects it, and [`Error::Output`] if the module cannot be
/// written. On any error the output path is left untouched.
pub fn run(config: &Config) -> Result<()> {
    let engine = config.dialect.engine();
    debug!(input = %config.input.display(), engine = engine.name(), "reading grammar");
    let text = fs::read_to_string(&config.input).map_err(|source| Error::Input {
        path: config.input.clone(),
        source,
    })?;

    let source_path = config.embed_source.then_some(config.input.as_path());
    let module = compile(engine, &text, &config.export, source_path, Utc::now())?;

    write_atomically(&config.output, module.as_bytes())?;
    info!(
        output = %config.output.display(),
        bytes = module.len(),
        "wrote rule table"
    );
    Ok(())
}

/// Mode for the replacement file: an existing target keeps its own, a new
/// file is world-readable like one created by `fs::write`.
fn target_permissions(path: &Path) -> Option<fs::Permissions> {
    if let Ok(metadata) = fs::metadata(path) {
        return Some(metadata.permissions());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        Some(fs::Permissions::from_mode(0o644))
    }
    #[cfg(not(unix))]
    {
        None
    }
}

/// Writes `contents` to `path` through a temporary file in the same
/// directory, renamed into place once fully written.
fn write_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    let output_error = |source| Error::Output {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(output_error)?;
    file.write_all(contents).map_err(output_error)?;
    file.as_file().sync_all().map_err(output_error)?;
    if let Some(permissions) = target_permissions(path) {
        file.as_file()
            .set_permissions(permissions)
            .map_err(output_error)?;
    }
    file.persist(path).map_err(|err| output_error(err.error))?;
    debug!(output = %path.display(), "renamed temporary file into place");
    Ok(())
}
