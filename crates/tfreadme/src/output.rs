//! Report rendering

use crate::config::OutputFormat;
use eyre::{Result, WrapErr};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::Path;
use tfreadme_core::{Detection, Format, ValidationError};

/// Outcome of checking one README.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub readme: &'a Path,
    pub format: Format,
    pub detection: Detection,
    pub errors: &'a [ValidationError],
}

impl Report<'_> {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Render a report in the requested format
pub fn render_report(report: &Report<'_>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report)),
        OutputFormat::Json => render_json(report),
    }
}

fn render_text(report: &Report<'_>) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} {} ({} format)\n",
        "->".blue().bold(),
        report.readme.display(),
        report.format.cyan()
    ));

    if report.is_clean() {
        output.push_str(&format!("{} No issues found\n", "ok".green().bold()));
        return output;
    }

    for error in report.errors {
        output.push_str(&format!("  {} {}\n", "-".red(), error));
    }
    let noun = if report.errors.len() == 1 { "issue" } else { "issues" };
    output.push_str(&format!(
        "{} {} {noun} found\n",
        "!".red().bold(),
        report.errors.len()
    ));
    output
}

fn render_json(report: &Report<'_>) -> Result<String> {
    let mut json = serde_json::to_string_pretty(report).wrap_err("failed to serialize report")?;
    json.push('\n');
    Ok(json)
}
