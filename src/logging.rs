//! Tracing subscriber setup.
//!
//! The `--log` option selects where output goes:
//! `0`/`off`, `1`/`stdout`, `2`/`stderr` (default), or a file path
//! (append mode, no ANSI colors). `RUST_LOG` overrides the level filter.

use anyhow::Result;
use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

/// Where log output is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Off,
    Stdout,
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    /// Parse the `--log` argument.
    pub fn parse(value: &str) -> Self {
        match value {
            "0" | "off" => LogTarget::Off,
            "1" | "stdout" => LogTarget::Stdout,
            "2" | "stderr" | "" => LogTarget::Stderr,
            filename => LogTarget::File(PathBuf::from(filename)),
        }
    }
}

/// Default level: debug when verbose, info otherwise.
pub fn default_level(verbose: bool) -> Level {
    if verbose { Level::DEBUG } else { Level::INFO }
}

/// Build the level filter, preferring `RUST_LOG` when it is set.
fn build_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose).as_str().to_lowercase()))
}

/// Install the global tracing subscriber.
pub fn init(target: &LogTarget, verbose: bool) -> Result<()> {
    match target {
        LogTarget::Off => {}
        LogTarget::Stdout => {
            let subscriber = fmt()
                .with_env_filter(build_filter(verbose))
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogTarget::Stderr => {
            let subscriber = fmt()
                .with_env_filter(build_filter(verbose))
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let subscriber = fmt()
                .with_env_filter(build_filter(verbose))
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_numeric_and_named_targets() {
        assert_eq!(LogTarget::parse("0"), LogTarget::Off);
        assert_eq!(LogTarget::parse("off"), LogTarget::Off);
        assert_eq!(LogTarget::parse("1"), LogTarget::Stdout);
        assert_eq!(LogTarget::parse("stdout"), LogTarget::Stdout);
        assert_eq!(LogTarget::parse("2"), LogTarget::Stderr);
        assert_eq!(LogTarget::parse("stderr"), LogTarget::Stderr);
    }

    #[test]
    fn parse_filename_target() {
        assert_eq!(
            LogTarget::parse("kanban.log"),
            LogTarget::File(PathBuf::from("kanban.log"))
        );
    }

    #[test]
    fn verbose_raises_level() {
        assert_eq!(default_level(true), Level::DEBUG);
        assert_eq!(default_level(false), Level::INFO);
    }
}
