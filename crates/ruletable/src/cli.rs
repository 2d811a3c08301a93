//! Command-line entry point: `ruletable <input> <output> [options]`.

use facet::Facet;
use ruletable::{Config, Error, LogLevel};
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

/// Exit status for arguments that could not be parsed at all.
const USAGE_EXIT: u8 = 64;

/// Compile a grammar into a rule-table module.
#[derive(Debug, Facet)]
struct Cli {
    /// Grammar file to read.
    #[facet(positional)]
    input: String,

    /// Module to write; `.ts`/`.tsx` give TypeScript, `.js`/`.mjs` JavaScript.
    #[facet(positional)]
    output: String,

    /// Grammar notation: `bnf`, `w3c-ebnf` or `custom` (default).
    #[facet(named, short = 'd')]
    #[facet(default)]
    dialect: Option<String>,

    /// Log verbosity: `quiet` (default), `debug` or `verbose`.
    #[facet(named, short = 'l')]
    #[facet(default)]
    log: Option<String>,

    /// Name the rule table is exported under (default `rules`).
    #[facet(named, short = 's')]
    #[facet(default)]
    symbol: Option<String>,

    /// Embed the grammar text in the output as a comment block.
    #[facet(named, short = 'e')]
    #[facet(default)]
    embed_source: bool,
}

/// Installs the stderr subscriber. `RUST_LOG` overrides `level`.
fn init_logging(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directive()));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn fail(err: &Error) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(err.exit_code())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let cli: Cli = match facet_args::from_slice(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(USAGE_EXIT);
        }
    };

    let level = match LogLevel::resolve(cli.log.as_deref()) {
        Ok(level) => level,
        Err(e) => return fail(&Error::Config(e)),
    };
    init_logging(level);

    let config: Result<Config, Error> = Config::resolve(
        &cli.input,
        &cli.output,
        cli.dialect.as_deref(),
        cli.symbol.as_deref(),
        cli.embed_source,
    )
    .map_err(Error::from);

    match config.and_then(|config| ruletable::run(&config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => fail(&err),
    }
}
