//! Process-wide `tracing` subscriber setup, used by the CLI.

use crate::error::{Error, Result};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Install the global subscriber.
///
/// `RUST_LOG` overrides `level` when set. With `json_output` every event is
/// one JSON object per line. Events go to stderr; stdout carries command output.
pub fn init_logging(level: Level, json_output: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("student_performance={level},warn")));

    let result = if json_output {
        let fmt_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr);
        Registry::default().with(env_filter).with(fmt_layer).try_init()
    } else {
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_thread_names(false)
            .with_writer(std::io::stderr);
        Registry::default().with(env_filter).with(fmt_layer).try_init()
    };

    result.map_err(|e| Error::Config(format!("cannot install logger: {e}")))
}

/// Parse a `--log-level` value.
pub fn parse_level(value: &str) -> Result<Level> {
    value
        .parse::<Level>()
        .map_err(|_| Error::Config(format!("unknown log level '{value}'")))
}
