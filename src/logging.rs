// src/logging.rs

//! Tracing setup for the `firedag` binary.
//!
//! Filtering is resolved in order: the `--log-level` flag, then the
//! `FIREDAG_LOG` environment variable, then `info`. The env var accepts
//! full `tracing_subscriber` directive syntax, so per-target filters like
//! `FIREDAG_LOG=warn,firedag::engine=trace` work.

use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

/// Environment variable consulted when no `--log-level` flag is given.
pub const LOG_ENV_VAR: &str = "FIREDAG_LOG";

/// Install the global subscriber. Call once, before any engine work;
/// a second call panics.
pub fn init(cli_level: Option<LogLevel>) {
    let directives = filter_directives(cli_level, std::env::var(LOG_ENV_VAR).ok());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directives))
        .with_target(true)
        .init();
}

/// The directive string the subscriber is filtered with. An explicit CLI
/// level overrides the environment wholesale; invalid directives in the
/// env var are dropped by [`EnvFilter`] rather than failing startup.
fn filter_directives(cli_level: Option<LogLevel>, env_value: Option<String>) -> String {
    match (cli_level, env_value) {
        (Some(level), _) => level.as_directive().to_string(),
        (None, Some(value)) => value,
        (None, None) => "info".to_string(),
    }
}
