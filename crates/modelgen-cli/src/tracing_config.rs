//! Tracing configuration for debugging resolution runs.
//!
//! The filter comes from the first of these that is set:
//!
//! 1. `MODELGEN_LOG`: a full `EnvFilter` directive list, or a bare level
//!    (`debug`) that is applied to the modelgen crates only
//! 2. `RUST_LOG`: used as is
//! 3. `-v` / `-vv` on the command line: `debug` / `trace` for the modelgen
//!    crates
//!
//! With none of them set no subscriber is installed. The output format is
//! picked by `MODELGEN_LOG_FORMAT`:
//!
//! - `text` (default): standard `tracing-subscriber` flat output
//! - `tree`: hierarchical indented output via `tracing-tree`
//! - `json`: one JSON object per span/event
//!
//! ```bash
//! MODELGEN_LOG=debug MODELGEN_LOG_FORMAT=tree modelgen model.json
//! MODELGEN_LOG="modelgen_resolver::cache=trace" modelgen model.json
//! modelgen -vv model.json
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Crates whose spans and events a bare level or `-v` turns on.
const MODELGEN_TARGETS: &[&str] = &["modelgen_model", "modelgen_resolver", "modelgen_cli"];

/// Everything outside [`MODELGEN_TARGETS`] stays at this level.
const BASELINE_LEVEL: &str = "warn";

const LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Resolved logging setup: an `EnvFilter` directive string and the format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub directives: String,
    pub format: LogFormat,
}

impl TracingConfig {
    /// Pick the filter from the environment values and the `-v` count.
    ///
    /// Returns `None` when logging stays off.
    pub fn resolve(
        modelgen_log: Option<&str>,
        rust_log: Option<&str>,
        log_format: Option<&str>,
        verbosity: u8,
    ) -> Option<Self> {
        let directives = match (modelgen_log, rust_log) {
            (Some(value), _) if is_bare_level(value) => scoped_to_modelgen(value.trim()),
            (Some(value), _) => value.to_string(),
            (None, Some(value)) => value.to_string(),
            (None, None) => match verbosity {
                0 => return None,
                1 => scoped_to_modelgen("debug"),
                _ => scoped_to_modelgen("trace"),
            },
        };
        Some(Self {
            directives,
            format: log_format.map_or(LogFormat::Text, LogFormat::parse),
        })
    }

    fn from_env(verbosity: u8) -> Option<Self> {
        let modelgen_log = std::env::var("MODELGEN_LOG").ok();
        let rust_log = std::env::var("RUST_LOG").ok();
        let log_format = std::env::var("MODELGEN_LOG_FORMAT").ok();
        Self::resolve(
            modelgen_log.as_deref(),
            rust_log.as_deref(),
            log_format.as_deref(),
            verbosity,
        )
    }
}

fn is_bare_level(value: &str) -> bool {
    let value = value.trim();
    LEVELS.iter().any(|level| level.eq_ignore_ascii_case(value))
}

/// `warn,modelgen_model=<level>,modelgen_resolver=<level>,...`
fn scoped_to_modelgen(level: &str) -> String {
    let level = level.to_lowercase();
    std::iter::once(BASELINE_LEVEL.to_string())
        .chain(MODELGEN_TARGETS.iter().map(|target| format!("{target}={level}")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialise the global tracing subscriber. Output goes to stderr so the
/// report on stdout stays machine-readable.
pub fn init_tracing(verbosity: u8) {
    let Some(config) = TracingConfig::from_env(verbosity) else {
        return;
    };

    let filter = EnvFilter::builder().parse_lossy(&config.directives);
    match config.format {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

#[cfg(test)]
#[path = "../tests/tracing_config_tests.rs"]
mod tracing_config_tests;
