//! tfreadme - Check that a Terraform module README documents what the module declares
//!
//! Exit status: 0 when the README is clean, 1 when problems were found,
//! 2 when the check itself could not run.

use clap::Parser;
use owo_colors::OwoColorize;
use std::process::ExitCode;
use tfreadme::config::Args;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match tfreadme::run(&args, &mut std::io::stdout().lock()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("{} {err:?}", "error:".red().bold());
            ExitCode::from(2)
        }
    }
}

/// Logs go to stderr so the report on stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
