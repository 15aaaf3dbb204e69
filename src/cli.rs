// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `firedag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "firedag",
    version,
    about = "Inspect and plan post-fire assessment pipelines.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the run request (TOML).
    #[arg(
        long,
        value_name = "PATH",
        default_value_os_t = crate::config::default_config_path()
    )]
    pub config: PathBuf,

    /// Print the builtin dependency graph in GraphViz DOT format and exit.
    #[arg(long)]
    pub dot: bool,

    /// Logging level. If omitted, `FIREDAG_LOG` or `info` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Subscriber filter directive for this level.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_to_the_conventional_path() {
        let args = CliArgs::try_parse_from(["firedag"]).unwrap();
        assert_eq!(args.config, crate::config::default_config_path());
        assert!(!args.dot);
        assert!(args.log_level.is_none());
    }

    #[test]
    fn explicit_config_path_overrides_the_default() {
        let args = CliArgs::try_parse_from(["firedag", "--config", "runs/jatai.toml"]).unwrap();
        assert_eq!(args.config, PathBuf::from("runs/jatai.toml"));
    }
}
