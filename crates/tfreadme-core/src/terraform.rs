//! Terraform configuration extraction
//!
//! Reads `.tf` files with `hcl-rs` and lists the names the README is expected
//! to document: variable and output names, and resource and data source types
//! in both bare (`azurerm_subnet`) and qualified (`azurerm_subnet.this`) form.

use eyre::{Result, WrapErr};
use std::path::{Path, PathBuf};

/// Resource and data source names, each kind in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Definitions {
    pub resources: Vec<String>,
    pub data_sources: Vec<String>,
}

impl Definitions {
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty() && self.data_sources.is_empty()
    }

    pub fn extend(&mut self, other: Definitions) {
        self.resources.extend(other.resources);
        self.data_sources.extend(other.data_sources);
    }
}

/// Which `.tf` files make up the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanStrategy {
    /// `.tf` files directly in the module directory
    #[default]
    Shallow,
    /// Every `.tf` file below the module directory, honoring `.gitignore`
    Recursive,
}

/// A Terraform module on disk.
#[derive(Debug, Clone)]
pub struct TerraformContent {
    root: PathBuf,
    strategy: ScanStrategy,
}

impl TerraformContent {
    pub fn new(root: impl Into<PathBuf>, strategy: ScanStrategy) -> Self {
        Self {
            root: root.into(),
            strategy,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn strategy(&self) -> ScanStrategy {
        self.strategy
    }

    /// First label of every top-level `block_kind` block in `path`.
    ///
    /// A missing file yields no items; a file that does not parse is an error.
    pub fn extract_items(&self, path: &Path, block_kind: &str) -> Result<Vec<String>> {
        let Some(body) = parse_file(path)? else {
            return Ok(Vec::new());
        };

        let items = body
            .blocks()
            .filter(|block| block.identifier() == block_kind)
            .filter_map(|block| block.labels().first())
            .map(|label| label.as_str().trim().to_string())
            .collect();
        Ok(items)
    }

    /// Every `resource` and `data` block in the module, per the scan strategy.
    pub fn extract_resources_and_data_sources(&self) -> Result<Definitions> {
        let files = match self.strategy {
            ScanStrategy::Shallow => self.shallow_files()?,
            ScanStrategy::Recursive => self.recursive_files(),
        };
        tracing::debug!(
            root = %self.root.display(),
            strategy = ?self.strategy,
            files = files.len(),
            "scanning terraform files"
        );

        let per_file = extract_all(&files)?;
        let mut found = Definitions::default();
        for definitions in per_file {
            found.extend(definitions);
        }
        Ok(found)
    }

    fn shallow_files(&self) -> Result<Vec<PathBuf>> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e)
                    .wrap_err_with(|| format!("error reading directory {}", self.root.display()));
            }
        };

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && is_terraform_file(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn recursive_files(&self) -> Vec<PathBuf> {
        use ignore::{WalkBuilder, WalkState};
        use std::sync::{Mutex, PoisonError};

        let files = Mutex::new(Vec::new());

        // hidden directories (.terraform, .git) are skipped by default
        let walker = WalkBuilder::new(&self.root)
            .git_ignore(true)
            .git_exclude(true)
            .require_git(false)
            .build_parallel();

        walker.run(|| {
            let files = &files;
            Box::new(move |entry| {
                let Ok(entry) = entry else {
                    return WalkState::Continue;
                };
                let path = entry.path();
                if entry.file_type().is_some_and(|t| t.is_file()) && is_terraform_file(path) {
                    files
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(path.to_path_buf());
                }
                WalkState::Continue
            })
        });

        let mut files = files.into_inner().unwrap_or_else(PoisonError::into_inner);
        files.sort();
        files
    }
}

fn is_terraform_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "tf")
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse one file; `None` when it does not exist.
fn parse_file(path: &Path) -> Result<Option<hcl::Body>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).wrap_err_with(|| format!("error reading file {}", base_name(path)));
        }
    };

    let body = hcl::parse(&content)
        .wrap_err_with(|| format!("error parsing HCL in {}", base_name(path)))?;
    Ok(Some(body))
}

fn extract_file(path: &Path) -> Result<Definitions> {
    let mut found = Definitions::default();
    let Some(body) = parse_file(path)? else {
        return Ok(found);
    };

    for block in body.blocks() {
        let target = match block.identifier() {
            "resource" => &mut found.resources,
            "data" => &mut found.data_sources,
            _ => continue,
        };
        let [kind, name, ..] = block.labels() else {
            continue;
        };
        let kind = kind.as_str().trim();
        let name = name.as_str().trim();
        target.push(kind.to_string());
        target.push(format!("{kind}.{name}"));
    }
    Ok(found)
}

/// Extract every file, keeping the input order in the output.
fn extract_all(files: &[PathBuf]) -> Result<Vec<Definitions>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        files.par_iter().map(|path| extract_file(path)).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        files.iter().map(|path| extract_file(path)).collect()
    }
}
