//! tfreadme-core - Consistency checks between Terraform modules and their READMEs
//!
//! This crate provides the building blocks for:
//! - Extracting variables, outputs, resources and data sources from `.tf` files
//! - Extracting the items a terraform-docs style README documents, in either
//!   table or heading layout (detected automatically)
//! - Reconciling both sides and reporting every item documented on one side only
//! - Checking section headings, table columns, required files and links
//!
//! # Features
//!
//! - `parallel` - Parse `.tf` files in parallel (brings in `rayon`)
//! - `fetch` - Enable [`validate::UrlValidator`] for link checking (brings in `ureq`)
//!
//! # Validating a module
//!
//! ```no_run
//! use tfreadme_core::{Options, ReadmeValidator};
//!
//! let validator = ReadmeValidator::new(
//!     "modules/network/README.md",
//!     Options::new().with_provider_prefixes(["azurerm_"]),
//! )?;
//!
//! for error in validator.validate() {
//!     println!("{error}");
//! }
//! # Ok::<(), eyre::Report>(())
//! ```
//!
//! # Reconciling item lists
//!
//! A README that documents a resource by its bare type counts as documenting
//! every declared instance of it:
//!
//! ```
//! use tfreadme_core::reconcile;
//!
//! let declared = ["azurerm_subnet", "azurerm_subnet.this", "azurerm_subnet.that"];
//! let documented = ["azurerm_subnet"];
//! assert!(reconcile(&declared, &documented, "Resources").is_empty());
//!
//! let errors = reconcile(&declared, &["azurerm_virtual_network.main"], "Resources");
//! assert_eq!(errors.len(), 2);
//! ```

pub mod document;
mod error;
mod format;
mod index;
mod markdown;
mod readme;
mod reconcile;
pub mod section;
mod terraform;
pub mod validate;

pub use error::{Side, ValidationError};
pub use format::{Detection, Format, FormatOption, SIGNAL_SECTIONS, detect};
pub use index::{ItemEntry, ItemIndex};
pub use markdown::{AnchorKind, MarkdownContent, RESOURCES_SECTION, ResourcesNotDocumented};
pub use readme::{Options, ReadmeValidator};
pub use reconcile::reconcile;
pub use terraform::{Definitions, ScanStrategy, TerraformContent};
pub use validate::Validator;
