//! Command-line and environment configuration
//!
//! Every flag can also come from the environment so the tool drops into CI
//! pipelines that only set variables (`README_PATH`, `MODULE_PATH`, `FORMAT`,
//! `VERBOSE`, `PROVIDER_PREFIXES`).

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tfreadme_core::{FormatOption, Options, ScanStrategy};

/// How the report is printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Check that a Terraform module README documents exactly what the module declares
#[derive(Debug, Clone, Parser)]
#[command(name = "tfreadme", version, about)]
pub struct Args {
    /// Path to the README to check
    #[arg(long, env = "README_PATH", default_value = "README.md")]
    pub readme: PathBuf,

    /// Terraform module directory (default: the README's directory)
    #[arg(long, env = "MODULE_PATH")]
    pub module_path: Option<PathBuf>,

    /// README layout: auto, table or document
    #[arg(long, env = "FORMAT", default_value = "auto")]
    pub format: String,

    /// Link-text prefix naming a Terraform resource, e.g. azurerm_ (repeatable)
    #[arg(
        long = "provider-prefix",
        env = "PROVIDER_PREFIXES",
        value_delimiter = ','
    )]
    pub provider_prefixes: Vec<String>,

    /// Additional section that must be present (repeatable)
    #[arg(long = "section")]
    pub sections: Vec<String>,

    /// Additional file that must exist, relative to the module (repeatable)
    #[arg(long = "file")]
    pub files: Vec<String>,

    /// Scan .tf files in subdirectories too
    #[arg(long)]
    pub recursive: bool,

    /// Stop at the first problem found
    #[arg(long)]
    pub fail_fast: bool,

    /// Do not fetch URLs found in the README
    #[arg(long)]
    pub skip_urls: bool,

    /// Do not check required files
    #[arg(long)]
    pub skip_files: bool,

    /// Do not check section headings and table columns
    #[arg(long)]
    pub skip_sections: bool,

    /// Do not check resources and data sources
    #[arg(long)]
    pub skip_resources: bool,

    /// Do not check variables
    #[arg(long)]
    pub skip_variables: bool,

    /// Do not check outputs
    #[arg(long)]
    pub skip_outputs: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Log what is being checked
    #[arg(long, short, env = "VERBOSE")]
    pub verbose: bool,
}

impl Args {
    /// Requested README layout; an unknown value falls back to detection.
    pub fn format_option(&self) -> FormatOption {
        FormatOption::parse(&self.format).unwrap_or_else(|| {
            tracing::warn!(format = %self.format, "unknown format, using auto-detection");
            FormatOption::Auto
        })
    }

    /// Validation options for the core library.
    pub fn options(&self) -> Options {
        let strategy = if self.recursive {
            ScanStrategy::Recursive
        } else {
            ScanStrategy::Shallow
        };

        let prefixes = self
            .provider_prefixes
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty());

        let mut options = Options::new()
            .with_format(self.format_option())
            .with_provider_prefixes(prefixes)
            .with_additional_sections(self.sections.iter().cloned())
            .with_additional_files(self.files.iter().cloned())
            .with_scan_strategy(strategy)
            .skip_urls(self.skip_urls)
            .skip_files(self.skip_files)
            .skip_sections(self.skip_sections)
            .skip_resources(self.skip_resources)
            .skip_variables(self.skip_variables)
            .skip_outputs(self.skip_outputs);

        if let Some(module_path) = &self.module_path {
            options = options.with_module_path(module_path);
        }
        options
    }
}
