#![allow(clippy::print_stderr, clippy::print_stdout)]

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;

use modelgen_cli::args::CliArgs;
use modelgen_cli::driver;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    // Zero cost unless MODELGEN_LOG, RUST_LOG or -v is set.
    modelgen_cli::tracing_config::init_tracing(args.verbose);

    let color = !args.no_color && std::io::stdout().is_terminal();

    let outcome = driver::run(&args)?;
    print!("{}", driver::render(&outcome, args.format, color)?);

    let code = outcome.exit_code();
    if code != driver::EXIT_SUCCESS {
        std::process::exit(code);
    }
    Ok(())
}
