use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the modelgen binary.
#[derive(Parser, Debug)]
#[command(
    name = "modelgen",
    version,
    about = "Resolve inheritance and derived unions of a model snapshot"
)]
pub struct CliArgs {
    /// Model snapshot (JSON) to resolve.
    pub model: PathBuf,

    /// Generator settings file (JSON).
    #[arg(short = 's', long)]
    pub settings: Option<PathBuf>,

    /// Generate published interfaces; overrides the settings file.
    #[arg(long)]
    pub published_interfaces: bool,

    /// Report only these types (repeatable). Every type is still resolved.
    #[arg(short = 't', long = "type", value_name = "NAME")]
    pub types: Vec<String>,

    /// Output format of the report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, ignore_case = true)]
    pub format: OutputFormat,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,

    /// Log resolution to stderr (`-v` debug, `-vv` trace). `MODELGEN_LOG`
    /// and `RUST_LOG` take precedence.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
#[path = "../tests/args_tests.rs"]
mod args_tests;
