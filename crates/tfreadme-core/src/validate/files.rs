use super::Validator;
use crate::error::ValidationError;
use std::path::{Path, PathBuf};

/// Files every module directory must carry besides the README.
pub const REQUIRED_FILES: &[&str] = &["outputs.tf", "variables.tf", "terraform.tf"];

/// Checks that the README, the standard module files and any extra files
/// exist and are not empty.
#[derive(Debug, Clone)]
pub struct FileValidator {
    files: Vec<PathBuf>,
}

impl FileValidator {
    /// `additional` paths are taken relative to `module_path` unless absolute.
    pub fn new(readme_path: &Path, module_path: &Path, additional: &[String]) -> Self {
        let mut files = vec![readme_path.to_path_buf()];
        files.extend(REQUIRED_FILES.iter().map(|name| module_path.join(name)));
        files.extend(additional.iter().map(|file| {
            let path = Path::new(file);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                module_path.join(path)
            }
        }));
        Self { files }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

impl Validator for FileValidator {
    fn name(&self) -> &'static str {
        "files"
    }

    fn validate(&self) -> Vec<ValidationError> {
        self.files.iter().filter_map(|path| check_file(path)).collect()
    }
}

fn check_file(path: &Path) -> Option<ValidationError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    match std::fs::metadata(path) {
        Ok(meta) if meta.len() == 0 => Some(ValidationError::EmptyFile { name }),
        Ok(_) => None,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Some(ValidationError::MissingFile { name })
        }
        Err(e) => Some(ValidationError::FileAccess {
            name,
            cause: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_complete_module() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["README.md", "outputs.tf", "variables.tf", "terraform.tf"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        let validator = FileValidator::new(&dir.path().join("README.md"), dir.path(), &[]);
        assert!(validator.validate().is_empty());
    }

    #[test]
    fn test_missing_and_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README.md"), "# Module\n").unwrap();
        fs::write(dir.path().join("variables.tf"), "").unwrap();
        fs::write(dir.path().join("terraform.tf"), "terraform {}\n").unwrap();

        let validator = FileValidator::new(&dir.path().join("README.md"), dir.path(), &[]);
        let messages: Vec<String> = validator.validate().iter().map(|e| e.to_string()).collect();
        assert_eq!(
            messages,
            vec!["file does not exist: outputs.tf", "file is empty: variables.tf"]
        );
    }

    #[test]
    fn test_additional_files() {
        let dir = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let absolute = elsewhere.path().join("CHANGELOG.md");
        fs::write(&absolute, "## 1.0.0\n").unwrap();
        for name in ["README.md", "outputs.tf", "variables.tf", "terraform.tf"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }

        let additional = vec!["Makefile".to_string(), absolute.display().to_string()];
        let validator = FileValidator::new(&dir.path().join("README.md"), dir.path(), &additional);
        assert_eq!(validator.files().len(), 6);
        let errors = validator.validate();
        assert_eq!(
            errors,
            vec![ValidationError::MissingFile {
                name: "Makefile".into()
            }]
        );
    }
}
