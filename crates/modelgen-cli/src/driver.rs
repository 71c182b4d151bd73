use anyhow::{Result, bail};
use modelgen_resolver::{ModelNodeCache, ResolveError};
use std::sync::Arc;
use tracing::{info, warn};

use crate::args::{CliArgs, OutputFormat};
use crate::config::resolve_settings;
use crate::report::{Reporter, RunReport, TypeReport};
use crate::snapshot::load_snapshot;

pub const EXIT_SUCCESS: i32 = 0;
/// Resolution finished but reported error diagnostics.
pub const EXIT_DIAGNOSTICS: i32 = 1;
/// The model could not be resolved at all (broken supertype chain).
pub const EXIT_STRUCTURAL_ERROR: i32 = 2;

#[derive(Debug)]
pub struct RunOutcome {
    pub report: RunReport,
    pub structural_error: Option<ResolveError>,
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        if self.structural_error.is_some() {
            EXIT_STRUCTURAL_ERROR
        } else if self.report.has_errors() {
            EXIT_DIAGNOSTICS
        } else {
            EXIT_SUCCESS
        }
    }
}

pub fn run(args: &CliArgs) -> Result<RunOutcome> {
    let snapshot = load_snapshot(&args.model)?;
    let graph = Arc::new(snapshot.to_graph()?);
    let settings = resolve_settings(args)?;

    for name in &args.types {
        if graph.type_by_name(name).is_none() {
            bail!("unknown type '{name}'");
        }
    }

    let cache = ModelNodeCache::new(Arc::clone(&graph), settings);
    let builders = match cache.resolve_all() {
        Ok(builders) => builders,
        Err(err) if err.is_structural() => {
            warn!(%err, "model cannot be resolved");
            return Ok(RunOutcome {
                report: RunReport {
                    types: Vec::new(),
                    diagnostics: cache.diagnostics(),
                },
                structural_error: Some(err),
            });
        }
        Err(err) => return Err(err.into()),
    };

    let types = builders
        .iter()
        .filter(|builder| args.types.is_empty() || args.types.iter().any(|t| t == builder.name()))
        .map(|builder| TypeReport::from_builder(&graph, builder))
        .collect();
    let report = RunReport {
        types,
        diagnostics: cache.diagnostics(),
    };
    info!(
        types = builders.len(),
        diagnostics = report.diagnostics.len(),
        "resolution finished"
    );

    Ok(RunOutcome {
        report,
        structural_error: None,
    })
}

pub fn render(outcome: &RunOutcome, format: OutputFormat, color: bool) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&outcome.report)?),
        OutputFormat::Text => {
            let mut out = Reporter::new(color).render(&outcome.report);
            if let Some(err) = &outcome.structural_error {
                out.push_str(&format!("error: {err}\n"));
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
#[path = "../tests/driver_tests.rs"]
mod driver_tests;
