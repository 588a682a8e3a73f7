//! Markdown content extraction
//!
//! [`MarkdownContent`] holds one parsed README for the duration of a validation
//! run and answers the questions the validators ask of it: which sections
//! exist, which items a section documents, and which resources and data
//! sources the "Resources" section links to.
//!
//! ```
//! use tfreadme_core::{FormatOption, MarkdownContent};
//!
//! let readme = r#"
//! ### Resources
//!
//! - [azurerm_resource_group.main](https://registry.terraform.io/providers/hashicorp/azurerm/latest/docs/resources/resource_group) (resource)
//!
//! ### Outputs
//!
//! #### <a name="output_id"></a> [id](#output\_id)
//! "#;
//!
//! let md = MarkdownContent::new(readme, FormatOption::Auto, &["azurerm_"]);
//! assert!(md.has_section("Resources"));
//! assert_eq!(md.extract_section_items(&["Outputs"]), vec!["id"]);
//!
//! let found = md.extract_resources_and_data_sources().unwrap();
//! assert_eq!(found.resources, vec!["azurerm_resource_group.main", "azurerm_resource_group"]);
//! ```

use crate::document::{Document, HeadingRef, Node, NodeKind, Walk};
use crate::format::{self, Detection, Format, FormatOption};
use crate::section::matches_section;
use crate::terraform::Definitions;
use regex::Regex;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::LazyLock;

static INPUT_ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<a\s+name="input_([^"\s]+)""#).expect("valid regex"));
static OUTPUT_ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<a\s+name="output_([^"\s]+)""#).expect("valid regex"));

/// Name of the section listing resources and data sources.
pub const RESOURCES_SECTION: &str = "Resources";

/// Destination fragment marking a link as a data source.
const DATA_SOURCE_PATH: &str = "/data-sources/";

/// Kind of terraform-docs anchor (`<a name="input_x">` / `<a name="output_x">`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    Input,
    Output,
}

impl AnchorKind {
    fn regex(self) -> &'static Regex {
        match self {
            AnchorKind::Input => &INPUT_ANCHOR,
            AnchorKind::Output => &OUTPUT_ANCHOR,
        }
    }

    /// The anchor kind a set of section names asks for, judged by the first
    /// name mentioning "input" or "output".
    fn expected_for(section_names: &[&str]) -> Option<AnchorKind> {
        section_names.iter().find_map(|name| {
            let lower = name.to_lowercase();
            if lower.contains("input") {
                Some(AnchorKind::Input)
            } else if lower.contains("output") {
                Some(AnchorKind::Output)
            } else {
                None
            }
        })
    }
}

/// No resource or data source links were found anywhere in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourcesNotDocumented;

impl fmt::Display for ResourcesNotDocumented {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("resources section not found or empty")
    }
}

impl std::error::Error for ResourcesNotDocumented {}

/// One parsed README and the per-document caches built while querying it.
///
/// Not `Sync`: the caches are plain interior mutability, so an instance
/// belongs to a single validation run.
#[derive(Debug)]
pub struct MarkdownContent {
    doc: Document,
    detection: Detection,
    format: Format,
    provider_prefixes: Vec<String>,
    /// Level-2 headings in document order
    sections: Vec<HeadingRef>,
    /// Lowercased item name -> anchor kinds seen for it in the raw text
    anchor_kinds: HashMap<String, HashSet<AnchorKind>>,
    /// `has_section` answers, keyed by the literal requested name
    section_presence: RefCell<HashMap<String, bool>>,
    /// Indexes into `sections`, keyed by the literal requested name
    section_matches: RefCell<HashMap<String, Vec<usize>>>,
}

impl MarkdownContent {
    /// Parse `source` and settle its format.
    ///
    /// `provider_prefixes` (e.g. `azurerm_`) decide which links in the
    /// Resources section name Terraform resources; with none, no link does.
    pub fn new<P: AsRef<str>>(
        source: impl Into<String>,
        format: FormatOption,
        provider_prefixes: &[P],
    ) -> Self {
        let doc = Document::parse(source);
        let detection = format::detect(&doc);
        let format = match format {
            FormatOption::Auto => detection.format,
            FormatOption::Table => Format::Table,
            FormatOption::Document => Format::Heading,
        };
        let sections = doc.headings(2);
        let anchor_kinds = index_anchors(doc.source());

        Self {
            doc,
            detection,
            format,
            provider_prefixes: provider_prefixes
                .iter()
                .map(|p| p.as_ref().to_lowercase())
                .collect(),
            sections,
            anchor_kinds,
            section_presence: RefCell::new(HashMap::new()),
            section_matches: RefCell::new(HashMap::new()),
        }
    }

    /// The raw markdown source
    pub fn content(&self) -> &str {
        self.doc.source()
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// The format in effect (forced or detected)
    pub fn format(&self) -> Format {
        self.format
    }

    /// What detection concluded, even when the format was forced
    pub fn detection(&self) -> Detection {
        self.detection
    }

    /// Whether any level-2 heading fuzzy-matches `name`.
    pub fn has_section(&self, name: &str) -> bool {
        if let Some(&found) = self.section_presence.borrow().get(name) {
            return found;
        }
        let found = !self.matching_sections(name).is_empty();
        self.section_presence
            .borrow_mut()
            .insert(name.to_string(), found);
        found
    }

    /// Literal text of every level-2 heading, in document order.
    pub fn all_sections(&self) -> Vec<String> {
        self.sections.iter().map(|h| h.text.clone()).collect()
    }

    /// Items documented under every section matching any of `names`.
    ///
    /// When no heading matches, falls back to scanning the raw text for
    /// `<a name="input_…">` / `<a name="output_…">` anchors.
    pub fn extract_section_items(&self, names: &[&str]) -> Vec<String> {
        let headings = self.collect_sections(names);
        if headings.is_empty() {
            let items = self.anchored_items(names);
            return self.filter_by_anchor_kind(names, items);
        }

        let mut items = Vec::new();
        for heading in headings {
            match self.format {
                Format::Heading => items.extend(self.heading_items(heading)),
                Format::Table => items.extend(self.table_items(heading)),
            }
        }
        self.filter_by_anchor_kind(names, items)
    }

    /// Resource and data source names linked from the Resources section, or
    /// from anywhere in the document when there is no such section.
    ///
    /// Both the linked name and its base type are listed, deduplicated.
    pub fn extract_resources_and_data_sources(
        &self,
    ) -> Result<Definitions, ResourcesNotDocumented> {
        let headings = self.collect_sections(&[RESOURCES_SECTION]);
        let mut found = Definitions::default();

        if headings.is_empty() {
            self.doc
                .walk(&mut |node| self.visit_link(node, &mut found));
        } else {
            for heading in headings {
                for node in self.doc.section_body(heading) {
                    node.walk(&mut |n| self.visit_link(n, &mut found));
                }
            }
        }

        if found.is_empty() {
            return Err(ResourcesNotDocumented);
        }
        Ok(found)
    }

    /// Sections matching `name`, computed once per literal requested name.
    fn matching_sections(&self, name: &str) -> Vec<usize> {
        if name.trim().is_empty() {
            return Vec::new();
        }
        if let Some(cached) = self.section_matches.borrow().get(name) {
            return cached.clone();
        }

        let matches: Vec<usize> = self
            .sections
            .iter()
            .enumerate()
            .filter(|(_, h)| matches_section(&h.text, name))
            .map(|(i, _)| i)
            .collect();
        self.section_matches
            .borrow_mut()
            .insert(name.to_string(), matches.clone());
        matches
    }

    /// Headings matching any of `names`, each at most once, in document order.
    pub(crate) fn collect_sections(&self, names: &[&str]) -> Vec<&HeadingRef> {
        let mut indexes: Vec<usize> = names
            .iter()
            .flat_map(|name| self.matching_sections(name))
            .collect();
        indexes.sort_unstable();
        indexes.dedup();
        indexes.into_iter().map(|i| &self.sections[i]).collect()
    }

    /// Level-3 heading names until the next heading of the section's level.
    fn heading_items(&self, heading: &HeadingRef) -> Vec<String> {
        self.doc
            .section_body(heading)
            .iter()
            .filter(|node| node.heading_level() == Some(3))
            .filter_map(|node| item_name_from_heading(&node.text()))
            .collect()
    }

    /// First-column values of the first table in the section.
    fn table_items(&self, heading: &HeadingRef) -> Vec<String> {
        let Some(table) = self.section_table(heading) else {
            return Vec::new();
        };
        table
            .table_rows()
            .iter()
            .filter_map(|row| row.first())
            .map(|cell| cell.trim().trim_matches('`').trim().to_string())
            .filter(|name| !name.is_empty() && name != "Name")
            .collect()
    }

    /// The first table between a heading and the next heading of its level.
    pub(crate) fn section_table(&self, heading: &HeadingRef) -> Option<&Node> {
        self.doc.section_body(heading).iter().find(|n| n.is_table())
    }

    /// Whether the section opens with a terraform-docs placeholder such as
    /// "No resources." instead of a table.
    pub(crate) fn section_says_none(&self, heading: &HeadingRef) -> bool {
        self.doc
            .section_body(heading)
            .iter()
            .find(|n| n.kind == NodeKind::Paragraph)
            .is_some_and(|p| p.text().trim_start().starts_with("No "))
    }

    fn anchored_items(&self, names: &[&str]) -> Vec<String> {
        let mut wanted = Vec::new();
        for name in names {
            let lower = name.to_lowercase();
            if lower.contains("input") && !wanted.contains(&AnchorKind::Input) {
                wanted.push(AnchorKind::Input);
            }
            if lower.contains("output") && !wanted.contains(&AnchorKind::Output) {
                wanted.push(AnchorKind::Output);
            }
        }

        let mut seen = HashSet::new();
        let mut items = Vec::new();
        for kind in wanted {
            for capture in kind.regex().captures_iter(self.doc.source()) {
                let name = capture[1].trim();
                if !name.is_empty() && seen.insert(name.to_string()) {
                    items.push(name.to_string());
                }
            }
        }
        items
    }

    /// Drop items whose anchors say they belong to the other kind of section.
    /// Items with no anchor at all pass through.
    fn filter_by_anchor_kind(&self, names: &[&str], items: Vec<String>) -> Vec<String> {
        let Some(expected) = AnchorKind::expected_for(names) else {
            return items;
        };
        items
            .into_iter()
            .filter(|item| {
                self.anchor_kinds
                    .get(&item.to_lowercase())
                    .is_none_or(|kinds| kinds.is_empty() || kinds.contains(&expected))
            })
            .collect()
    }

    fn visit_link(&self, node: &Node, found: &mut Definitions) -> Walk {
        let NodeKind::Link { destination } = &node.kind else {
            return Walk::Continue;
        };

        let text = node.text();
        if !self.has_provider_prefix(&text) {
            return Walk::SkipChildren;
        }

        let name = text.trim().to_string();
        let base = name.split('.').next().unwrap_or_default().to_string();

        let target = if destination.contains(DATA_SOURCE_PATH) {
            &mut found.data_sources
        } else {
            &mut found.resources
        };
        push_unique(target, name);
        push_unique(target, base);

        Walk::SkipChildren
    }

    fn has_provider_prefix(&self, text: &str) -> bool {
        let text = text.trim().to_lowercase();
        self.provider_prefixes
            .iter()
            .any(|prefix| text.starts_with(prefix.as_str()))
    }
}

/// Strip brackets and whitespace from a level-3 heading's text. The
/// terraform-docs anchor is inline HTML and never part of the text.
fn item_name_from_heading(text: &str) -> Option<String> {
    let name = text
        .trim()
        .trim_matches(|c: char| c == ' ' || c == '[' || c == ']')
        .trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn index_anchors(source: &str) -> HashMap<String, HashSet<AnchorKind>> {
    let mut kinds: HashMap<String, HashSet<AnchorKind>> = HashMap::new();
    for kind in [AnchorKind::Input, AnchorKind::Output] {
        for capture in kind.regex().captures_iter(source) {
            let name = capture[1].trim().to_lowercase();
            if !name.is_empty() {
                kinds.entry(name).or_default().insert(kind);
            }
        }
    }
    kinds
}

fn push_unique(list: &mut Vec<String>, item: String) {
    if !item.is_empty() && !list.contains(&item) {
        list.push(item);
    }
}
