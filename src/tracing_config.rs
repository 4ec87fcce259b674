//! Tracing setup for binaries and tests that embed shapecheck.
//!
//! The engines emit `trace!` events for every relation decision and `debug!`
//! events when a depth limit trips or a record construction fails. Nothing is
//! printed unless a subscriber is installed, and [`init_tracing`] installs one
//! only when `SHAPECHECK_LOG` (or `RUST_LOG`) is set.
//!
//! ```bash
//! # Every relation decision, as an indented tree
//! SHAPECHECK_LOG=trace SHAPECHECK_LOG_FORMAT=tree my-app
//!
//! # Only record construction failures, as JSON lines
//! SHAPECHECK_LOG="shapecheck_record=debug" SHAPECHECK_LOG_FORMAT=json my-app
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const LOG_VAR: &str = "SHAPECHECK_LOG";
const FORMAT_VAR: &str = "SHAPECHECK_LOG_FORMAT";

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    /// Hierarchical output via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON.
    Json,
}

impl LogFormat {
    /// Case-insensitive; unknown names fall back to `Text`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        std::env::var(FORMAT_VAR)
            .map(|name| Self::parse(&name))
            .unwrap_or_default()
    }
}

/// `SHAPECHECK_LOG` wins over `RUST_LOG`. `None` when neither is set.
fn filter_from_env() -> Option<EnvFilter> {
    match std::env::var(LOG_VAR) {
        Ok(directives) => Some(EnvFilter::builder().parse_lossy(directives)),
        Err(_) if std::env::var_os("RUST_LOG").is_some() => Some(EnvFilter::from_default_env()),
        Err(_) => None,
    }
}

/// Install a global subscriber writing to stderr.
///
/// Returns `false` when logging was not requested or a global subscriber is
/// already installed, so calling it from several tests is harmless.
pub fn init_tracing() -> bool {
    let Some(filter) = filter_from_env() else {
        return false;
    };

    let installed = match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree).try_init()
        }
        LogFormat::Json => {
            let json = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json).try_init()
        }
        LogFormat::Text => {
            let text = fmt::layer().with_target(true).with_writer(std::io::stderr);
            Registry::default().with(filter).with(text).try_init()
        }
    };
    installed.is_ok()
}
