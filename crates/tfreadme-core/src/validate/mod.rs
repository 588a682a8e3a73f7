//! Validators
//!
//! Each validator checks one documentation concern and reports every problem
//! it finds. Validators never fail: an extraction error becomes a single
//! [`ValidationError::Extraction`] finding and the other validators still run.

mod files;
mod items;
mod resources;
mod sections;
#[cfg(feature = "fetch")]
mod urls;

pub use files::{FileValidator, REQUIRED_FILES};
pub use items::ItemValidator;
pub use resources::ResourceValidator;
pub use sections::{SectionValidator, TableSpec, table_spec};
#[cfg(feature = "fetch")]
pub use urls::{UrlValidator, collect_urls};

use crate::error::ValidationError;

/// One documentation check.
pub trait Validator {
    /// Short name used in logs ("sections", "resources", ...)
    fn name(&self) -> &'static str;

    /// Run the check and return every finding.
    fn validate(&self) -> Vec<ValidationError>;
}
