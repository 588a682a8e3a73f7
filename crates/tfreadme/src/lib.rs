//! tfreadme - Check that a Terraform module README documents what the module declares
//!
//! The binary is a thin wrapper around [`run`]; the pieces are public so the
//! same checks can be embedded in other tools.

pub mod config;
pub mod output;

use config::Args;
use eyre::Result;
use output::{Report, render_report};
use std::io::Write;
use tfreadme_core::ReadmeValidator;

/// Validate the README described by `args` and write the report to `out`.
///
/// Returns whether the README is clean. Errors are operational failures
/// (unreadable README, unwritable output), not findings.
pub fn run(args: &Args, out: &mut impl Write) -> Result<bool> {
    let validator = ReadmeValidator::new(&args.readme, args.options())?;

    let errors = if args.fail_fast {
        validator.validate_fail_fast().into_iter().collect()
    } else {
        validator.validate()
    };
    tracing::info!(errors = errors.len(), "validation finished");

    let report = Report {
        readme: &args.readme,
        format: validator.format(),
        detection: validator.detection(),
        errors: &errors,
    };
    out.write_all(render_report(&report, args.output)?.as_bytes())?;
    Ok(report.is_clean())
}
