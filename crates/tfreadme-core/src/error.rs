//! Validation findings
//!
//! Every finding is reported, never thrown: validators accumulate these and the
//! orchestrator concatenates them. `Display` yields the human-readable message;
//! [`ValidationError::kind`] gives a stable code for machine consumers.

use serde::ser::SerializeMap;
use std::fmt;

/// Which side of the comparison an item was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Terraform,
    Markdown,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Terraform => "Terraform",
            Side::Markdown => "markdown",
        }
    }

    pub fn other(&self) -> Side {
        match self {
            Side::Terraform => Side::Markdown,
            Side::Markdown => Side::Terraform,
        }
    }
}

/// A single documentation problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An item exists on `present_in` but not on the other side
    ItemMismatch {
        item_type: String,
        name: String,
        present_in: Side,
    },
    /// An expected section heading is absent
    MissingSection { section: String, required: bool },
    /// A heading looks like a typo of an expected section
    MisspelledSection { found: String, expected: String },
    /// A section that needs a table is not followed by one
    MissingTable { section: String },
    /// The table under a section has no header row
    MissingTableHeader { section: String },
    /// A required column is absent from a section's table
    MissingColumn { column: String, section: String },
    /// A column is not one the section's table may have
    UnexpectedColumn {
        column: String,
        section: String,
        suggestion: Option<String>,
    },
    /// A "Resources" heading exists but lists no resources or data sources
    ResourcesNotDocumented,
    /// A required file is absent
    MissingFile { name: String },
    /// A required file exists but is empty
    EmptyFile { name: String },
    /// A required file could not be inspected
    FileAccess { name: String, cause: String },
    /// A URL could not be fetched
    UnreachableUrl { url: String, cause: String },
    /// A URL answered with something other than 200
    BadUrlStatus { url: String, status: u16 },
    /// Reading or parsing an input failed; the validator stopped early
    Extraction { message: String },
}

impl ValidationError {
    pub fn missing_in_markdown(item_type: &str, name: &str) -> Self {
        Self::ItemMismatch {
            item_type: item_type.to_string(),
            name: name.to_string(),
            present_in: Side::Terraform,
        }
    }

    pub fn missing_in_terraform(item_type: &str, name: &str) -> Self {
        Self::ItemMismatch {
            item_type: item_type.to_string(),
            name: name.to_string(),
            present_in: Side::Markdown,
        }
    }

    /// Wrap an operational failure, keeping its context chain.
    pub fn extraction(report: &eyre::Report) -> Self {
        Self::Extraction {
            message: format!("{report:#}"),
        }
    }

    /// Stable machine-readable code for this finding.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ItemMismatch {
                present_in: Side::Terraform,
                ..
            } => "missing-in-markdown",
            Self::ItemMismatch {
                present_in: Side::Markdown,
                ..
            } => "missing-in-terraform",
            Self::MissingSection { .. } => "missing-section",
            Self::MisspelledSection { .. } => "misspelled-section",
            Self::MissingTable { .. } => "missing-table",
            Self::MissingTableHeader { .. } => "missing-table-header",
            Self::MissingColumn { .. } => "missing-column",
            Self::UnexpectedColumn { .. } => "unexpected-column",
            Self::ResourcesNotDocumented => "resources-not-documented",
            Self::MissingFile { .. } => "missing-file",
            Self::EmptyFile { .. } => "empty-file",
            Self::FileAccess { .. } => "file-access",
            Self::UnreachableUrl { .. } => "unreachable-url",
            Self::BadUrlStatus { .. } => "bad-url-status",
            Self::Extraction { .. } => "extraction",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ItemMismatch {
                item_type,
                name,
                present_in,
            } => write!(
                f,
                "{item_type} in {} but missing in {}: {name}",
                present_in.as_str(),
                present_in.other().as_str()
            ),
            Self::MissingSection { section, required } => {
                let which = if *required { "required" } else { "additional" };
                write!(f, "{which} section missing: '{section}'")
            }
            Self::MisspelledSection { found, expected } => write!(
                f,
                "section '{found}' appears to be misspelled (should be '{expected}')"
            ),
            Self::MissingTable { section } => {
                write!(f, "missing table after header: {section}")
            }
            Self::MissingTableHeader { section } => {
                write!(f, "table has no header row under header: {section}")
            }
            Self::MissingColumn { column, section } => write!(
                f,
                "missing required column '{column}' in table under header: {section}"
            ),
            Self::UnexpectedColumn {
                column,
                section,
                suggestion,
            } => {
                write!(
                    f,
                    "unexpected column '{column}' in table under header: {section}"
                )?;
                if let Some(suggestion) = suggestion {
                    write!(f, " (did you mean '{suggestion}'?)")?;
                }
                Ok(())
            }
            Self::ResourcesNotDocumented => f.write_str("resources section not found or empty"),
            Self::MissingFile { name } => write!(f, "file does not exist: {name}"),
            Self::EmptyFile { name } => write!(f, "file is empty: {name}"),
            Self::FileAccess { name, cause } => {
                write!(f, "error accessing file: {name}: {cause}")
            }
            Self::UnreachableUrl { url, cause } => write!(f, "error accessing URL: {url}: {cause}"),
            Self::BadUrlStatus { url, status } => {
                write!(f, "URL returned non-OK status: {url}: Status: {status}")
            }
            Self::Extraction { message } => f.write_str(message),
        }
    }
}

impl std::error::Error for ValidationError {}

// Serialized as `{ "kind": ..., "message": ... }` so JSON consumers get both
// the code and the exact text
impl serde::Serialize for ValidationError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("kind", self.kind())?;
        map.serialize_entry("message", &self.to_string())?;
        map.end()
    }
}
