//! Command-line front end: loads a JSON model snapshot, runs the resolver
//! over every type and reports the resolved builders and diagnostics.

pub mod args;
pub mod config;
pub mod driver;
pub mod report;
pub mod snapshot;
pub mod tracing_config;

#[cfg(test)]
#[path = "../tests/fixtures.rs"]
pub(crate) mod fixtures;
