use anyhow::{Context, Result};
use modelgen_resolver::GeneratorSettings;
use std::path::Path;

use crate::args::CliArgs;

pub fn parse_settings(source: &str) -> Result<GeneratorSettings> {
    serde_json::from_str(source).context("invalid generator settings")
}

pub fn load_settings(path: &Path) -> Result<GeneratorSettings> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read settings: {}", path.display()))?;
    parse_settings(&source).with_context(|| format!("failed to parse settings: {}", path.display()))
}

/// Settings for a run: the settings file (or defaults) with command-line
/// overrides applied.
pub fn resolve_settings(args: &CliArgs) -> Result<GeneratorSettings> {
    let settings = match &args.settings {
        Some(path) => load_settings(path)?,
        None => GeneratorSettings::default(),
    };
    if args.published_interfaces {
        return Ok(settings.with_published_interfaces(true));
    }
    Ok(settings)
}

#[cfg(test)]
#[path = "../tests/config_tests.rs"]
mod config_tests;
