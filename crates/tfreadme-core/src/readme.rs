//! Top-level validation of one module README

use crate::error::ValidationError;
use crate::format::{Detection, Format, FormatOption};
use crate::markdown::MarkdownContent;
use crate::terraform::{ScanStrategy, TerraformContent};
use crate::validate::{FileValidator, ItemValidator, ResourceValidator, SectionValidator, Validator};
use eyre::{Result, WrapErr};
use std::path::{Path, PathBuf};

/// What to check and how.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub format: FormatOption,
    /// Sections that must exist besides the required ones
    pub additional_sections: Vec<String>,
    /// Files that must exist besides the standard ones, relative to the module
    pub additional_files: Vec<String>,
    /// Link-text prefixes naming Terraform resources, e.g. `azurerm_`
    pub provider_prefixes: Vec<String>,
    pub scan_strategy: ScanStrategy,
    /// Module directory; the README's directory when unset
    pub module_path: Option<PathBuf>,
    pub skip_sections: bool,
    pub skip_files: bool,
    pub skip_urls: bool,
    pub skip_resources: bool,
    pub skip_variables: bool,
    pub skip_outputs: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: FormatOption) -> Self {
        self.format = format;
        self
    }

    pub fn with_additional_sections(
        mut self,
        sections: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.additional_sections = sections.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_additional_files(mut self, files: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.additional_files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_provider_prefixes(
        mut self,
        prefixes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.provider_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_scan_strategy(mut self, strategy: ScanStrategy) -> Self {
        self.scan_strategy = strategy;
        self
    }

    pub fn with_module_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.module_path = Some(path.into());
        self
    }

    pub fn skip_sections(mut self, skip: bool) -> Self {
        self.skip_sections = skip;
        self
    }

    pub fn skip_files(mut self, skip: bool) -> Self {
        self.skip_files = skip;
        self
    }

    pub fn skip_urls(mut self, skip: bool) -> Self {
        self.skip_urls = skip;
        self
    }

    pub fn skip_resources(mut self, skip: bool) -> Self {
        self.skip_resources = skip;
        self
    }

    pub fn skip_variables(mut self, skip: bool) -> Self {
        self.skip_variables = skip;
        self
    }

    pub fn skip_outputs(mut self, skip: bool) -> Self {
        self.skip_outputs = skip;
        self
    }
}

/// A README and the module it documents, ready to be checked.
#[derive(Debug)]
pub struct ReadmeValidator {
    readme_path: PathBuf,
    module_path: PathBuf,
    markdown: MarkdownContent,
    terraform: TerraformContent,
    options: Options,
}

impl ReadmeValidator {
    /// Read and parse the README. Fails only if the README cannot be read.
    pub fn new(readme_path: impl AsRef<Path>, options: Options) -> Result<Self> {
        let readme_path = std::path::absolute(readme_path.as_ref()).wrap_err_with(|| {
            format!("failed to resolve README path {}", readme_path.as_ref().display())
        })?;

        let module_path = match &options.module_path {
            Some(path) => std::path::absolute(path)
                .wrap_err_with(|| format!("failed to resolve module path {}", path.display()))?,
            None => readme_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        };

        let source = std::fs::read_to_string(&readme_path)
            .wrap_err_with(|| format!("failed to read {}", readme_path.display()))?;

        let markdown =
            MarkdownContent::new(source, options.format, options.provider_prefixes.as_slice());
        let terraform = TerraformContent::new(&module_path, options.scan_strategy);

        tracing::info!(
            readme = %readme_path.display(),
            module = %module_path.display(),
            format = %markdown.format(),
            "validating README"
        );

        Ok(Self {
            readme_path,
            module_path,
            markdown,
            terraform,
            options,
        })
    }

    pub fn readme_path(&self) -> &Path {
        &self.readme_path
    }

    pub fn module_path(&self) -> &Path {
        &self.module_path
    }

    /// The format in effect for this README
    pub fn format(&self) -> Format {
        self.markdown.format()
    }

    pub fn detection(&self) -> Detection {
        self.markdown.detection()
    }

    pub fn markdown(&self) -> &MarkdownContent {
        &self.markdown
    }

    fn validators(&self) -> Vec<Box<dyn Validator + '_>> {
        let options = &self.options;
        let mut validators: Vec<Box<dyn Validator + '_>> = Vec::new();

        if !options.skip_sections {
            validators.push(Box::new(SectionValidator::new(
                &self.markdown,
                &options.additional_sections,
            )));
        }
        if !options.skip_files {
            validators.push(Box::new(FileValidator::new(
                &self.readme_path,
                &self.module_path,
                &options.additional_files,
            )));
        }
        #[cfg(feature = "fetch")]
        if !options.skip_urls {
            validators.push(Box::new(crate::validate::UrlValidator::new(&self.markdown)));
        }
        if !options.skip_resources {
            validators.push(Box::new(ResourceValidator::new(&self.markdown, &self.terraform)));
        }
        if !options.skip_variables {
            validators.push(Box::new(ItemValidator::variables(&self.markdown, &self.terraform)));
        }
        if !options.skip_outputs {
            validators.push(Box::new(ItemValidator::outputs(&self.markdown, &self.terraform)));
        }
        validators
    }

    /// Run every enabled validator and return all findings.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for validator in self.validators() {
            let found = validator.validate();
            tracing::debug!(validator = validator.name(), errors = found.len(), "validator finished");
            errors.extend(found);
        }
        errors
    }

    /// Stop at the first validator that reports anything and return its first
    /// finding.
    pub fn validate_fail_fast(&self) -> Option<ValidationError> {
        self.validators().into_iter().find_map(|validator| {
            let first = validator.validate().into_iter().next();
            if first.is_some() {
                tracing::debug!(validator = validator.name(), "stopping at first finding");
            }
            first
        })
    }
}
