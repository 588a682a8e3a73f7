//! Document format detection
//!
//! terraform-docs style READMEs come in two layouts: items listed as rows of a
//! table under each section, or each item as its own level-3 heading. The
//! layout is scored from structural signals once per document.

use crate::document::{Document, NodeKind, Walk};
use serde::Serialize;
use std::fmt;

/// How items are laid out within a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Item details are rows of a markdown table; the first column is the name
    Table,
    /// Each item is its own level-3 heading under a level-2 section
    #[serde(rename = "document")]
    Heading,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Table => "table",
            Format::Heading => "document",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested format: forced, or detected from the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatOption {
    #[default]
    Auto,
    Table,
    Document,
}

impl FormatOption {
    /// Parse `auto`, `table`, `document` (or `heading`), case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" | "" => Some(Self::Auto),
            "table" => Some(Self::Table),
            "document" | "heading" => Some(Self::Document),
            _ => None,
        }
    }
}

impl std::str::FromStr for FormatOption {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            eyre::eyre!("unknown markdown format '{s}' (expected auto, table or document)")
        })
    }
}

/// Sections whose layout is inspected for signals.
pub const SIGNAL_SECTIONS: &[&str] = &[
    "Required Inputs",
    "Optional Inputs",
    "Inputs",
    "Outputs",
    "Resources",
    "Requirements",
    "Providers",
];

/// Bonus applied to the heading score when any level-3 heading exists.
const GLOBAL_HEADING_BONUS: u32 = 2;

/// Type-annotation fragments typical of heading-style docs.
const TYPE_FRAGMENTS: &[&str] = &["object(", "list(", "map("];

/// Outcome of format detection, with the scores that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Detection {
    pub format: Format,
    pub table_score: u32,
    pub heading_score: u32,
}

impl Detection {
    /// Share of the total score held by the winning format (0.5 means a coin flip).
    pub fn confidence(&self) -> f64 {
        let total = self.table_score + self.heading_score;
        if total == 0 {
            return 0.5;
        }
        let winner = match self.format {
            Format::Table => self.table_score,
            Format::Heading => self.heading_score,
        };
        f64::from(winner) / f64::from(total)
    }
}

/// Score the document's structure and pick a format.
///
/// Ties (including a document with no signals at all) resolve to
/// [`Format::Heading`].
pub fn detect(doc: &Document) -> Detection {
    let mut table_score = 0u32;
    let mut heading_score = 0u32;

    for heading in doc.headings(2) {
        let is_signal_section = SIGNAL_SECTIONS
            .iter()
            .any(|name| heading.text.eq_ignore_ascii_case(name));
        if !is_signal_section {
            continue;
        }

        let following = doc.following(&heading.path);
        match following {
            [next, ..] if next.is_table() => table_score += 1,
            [next, ..] if next.heading_level() == Some(3) => heading_score += 1,
            [next, after, ..]
                if next.kind == NodeKind::Paragraph && after.heading_level() == Some(3) =>
            {
                heading_score += 1
            }
            _ => {}
        }
    }

    if !doc.headings(3).is_empty() {
        heading_score += GLOBAL_HEADING_BONUS;
    }

    if table_score == heading_score {
        if has_type_annotations(doc) {
            heading_score += 1;
        }
        if count_tables(doc) > 1 {
            table_score += 1;
        }
    }

    let format = if table_score > heading_score {
        Format::Table
    } else {
        Format::Heading
    };

    tracing::debug!(
        format = %format,
        table_score,
        heading_score,
        "detected markdown format"
    );

    Detection {
        format,
        table_score,
        heading_score,
    }
}

fn has_type_annotations(doc: &Document) -> bool {
    let mut found = false;
    doc.walk(&mut |node| {
        if let NodeKind::CodeBlock { literal, .. } = &node.kind {
            if TYPE_FRAGMENTS.iter().any(|f| literal.contains(f)) {
                found = true;
                return Walk::Stop;
            }
        }
        Walk::Continue
    });
    found
}

fn count_tables(doc: &Document) -> usize {
    let mut count = 0;
    doc.walk(&mut |node| {
        if node.is_table() {
            count += 1;
            return Walk::SkipChildren;
        }
        Walk::Continue
    });
    count
}
