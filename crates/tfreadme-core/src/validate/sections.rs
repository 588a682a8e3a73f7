use super::Validator;
use crate::error::ValidationError;
use crate::format::Format;
use crate::markdown::MarkdownContent;
use crate::section::{is_inputs_variant, is_similar_section};
use std::collections::HashSet;

/// Sections every README must have, whatever its format.
const COMMON_SECTIONS: &[&str] = &["Resources", "Providers", "Requirements"];
const TABLE_SECTIONS: &[&str] = &["Inputs", "Outputs"];
const HEADING_SECTIONS: &[&str] = &["Required Inputs", "Optional Inputs", "Outputs"];

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Column layout expected of the table under a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub section: &'static str,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

const TABLE_SPECS: &[TableSpec] = &[
    TableSpec {
        section: "Resources",
        required: &["Name", "Type"],
        optional: &[],
    },
    TableSpec {
        section: "Providers",
        required: &["Name", "Version"],
        optional: &[],
    },
    TableSpec {
        section: "Requirements",
        required: &["Name", "Version"],
        optional: &[],
    },
    TableSpec {
        section: "Inputs",
        required: &["Name", "Description", "Required"],
        optional: &["Type", "Default"],
    },
    TableSpec {
        section: "Outputs",
        required: &["Name", "Description"],
        optional: &[],
    },
];

/// The expected columns for a table-format section, if it has a table.
pub fn table_spec(section: &str) -> Option<&'static TableSpec> {
    TABLE_SPECS
        .iter()
        .find(|spec| spec.section.eq_ignore_ascii_case(section))
}

/// Checks that required and additional sections exist and are spelled right,
/// and in table format that each section's table has the expected columns.
pub struct SectionValidator<'a> {
    markdown: &'a MarkdownContent,
    required: &'static [&'static str],
    additional: Vec<String>,
}

impl<'a> SectionValidator<'a> {
    pub fn new(markdown: &'a MarkdownContent, additional: &[String]) -> Self {
        let required = match markdown.format() {
            Format::Table => TABLE_SECTIONS,
            Format::Heading => HEADING_SECTIONS,
        };
        Self {
            markdown,
            required,
            additional: additional.to_vec(),
        }
    }

    /// Every section this validator expects, required ones first.
    pub fn expected_sections(&self) -> Vec<&str> {
        COMMON_SECTIONS
            .iter()
            .chain(self.required)
            .copied()
            .chain(self.additional.iter().map(String::as_str))
            .collect()
    }

    fn check_sections(&self) -> Vec<ValidationError> {
        let found = self.markdown.all_sections();
        let required: Vec<&str> = COMMON_SECTIONS.iter().chain(self.required).copied().collect();

        // an exact heading can never be claimed as somebody else's typo
        let mut handled: HashSet<&str> = self
            .expected_sections()
            .into_iter()
            .filter(|expected| found.iter().any(|f| f == expected))
            .collect();

        let mut errors = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        let expected = required
            .iter()
            .map(|s| (*s, true))
            .chain(self.additional.iter().map(|s| (s.as_str(), false)));

        for (section, is_required) in expected {
            if !seen.insert(section) {
                continue;
            }
            if found.iter().any(|f| f == section || is_inputs_variant(f, section)) {
                continue;
            }

            let misspelled = found
                .iter()
                .find(|f| !handled.contains(f.as_str()) && is_similar_section(f, section));
            match misspelled {
                Some(found_section) => {
                    handled.insert(found_section.as_str());
                    errors.push(ValidationError::MisspelledSection {
                        found: found_section.clone(),
                        expected: section.to_string(),
                    });
                }
                None => errors.push(ValidationError::MissingSection {
                    section: section.to_string(),
                    required: is_required,
                }),
            }
        }
        errors
    }

    fn check_tables(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for spec in TABLE_SPECS {
            let Some(heading) = self.markdown.collect_sections(&[spec.section]).into_iter().next()
            else {
                continue;
            };

            let Some(table) = self.markdown.section_table(heading) else {
                if !self.markdown.section_says_none(heading) {
                    errors.push(ValidationError::MissingTable {
                        section: heading.text.clone(),
                    });
                }
                continue;
            };

            let Some(header) = table.table_header() else {
                errors.push(ValidationError::MissingTableHeader {
                    section: heading.text.clone(),
                });
                continue;
            };

            errors.extend(check_columns(spec, &heading.text, &header));
        }
        errors
    }
}

impl Validator for SectionValidator<'_> {
    fn name(&self) -> &'static str {
        "sections"
    }

    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = self.check_sections();
        if self.markdown.format() == Format::Table {
            errors.extend(self.check_tables());
        }
        errors
    }
}

/// Unexpected columns first, then missing required ones.
fn check_columns(spec: &TableSpec, section: &str, header: &[String]) -> Vec<ValidationError> {
    let known: Vec<&str> = spec.required.iter().chain(spec.optional).copied().collect();
    let mut errors = Vec::new();

    for column in header {
        if !known.contains(&column.as_str()) {
            errors.push(ValidationError::UnexpectedColumn {
                column: column.clone(),
                section: section.to_string(),
                suggestion: suggest(column, &known),
            });
        }
    }

    for required in spec.required {
        if !header.iter().any(|c| c == required) {
            errors.push(ValidationError::MissingColumn {
                column: required.to_string(),
                section: section.to_string(),
            });
        }
    }
    errors
}

fn suggest(column: &str, known: &[&str]) -> Option<String> {
    let column = column.to_lowercase();
    known
        .iter()
        .map(|k| (strsim::jaro_winkler(&column, &k.to_lowercase()), *k))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, k)| k.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FormatOption;

    const PREFIXES: &[&str] = &["azurerm_"];

    fn heading_doc(sections: &[&str]) -> MarkdownContent {
        let mut source = String::new();
        for section in sections {
            source.push_str(&format!("## {section}\n\n### item\n\n"));
        }
        MarkdownContent::new(source, FormatOption::Document, PREFIXES)
    }

    fn messages(errors: &[ValidationError]) -> Vec<String> {
        errors.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_all_sections_present() {
        let md = heading_doc(&[
            "Requirements",
            "Providers",
            "Resources",
            "Required Inputs",
            "Optional Inputs",
            "Outputs",
        ]);
        assert!(SectionValidator::new(&md, &[]).validate().is_empty());
    }

    #[test]
    fn test_misspelled_not_also_missing() {
        let md = heading_doc(&[
            "Requirements",
            "Providers",
            "Resourses",
            "Required Inputs",
            "Optional Inputs",
            "Outputs",
        ]);
        let errors = SectionValidator::new(&md, &[]).validate();
        assert_eq!(
            messages(&errors),
            vec!["section 'Resourses' appears to be misspelled (should be 'Resources')"]
        );
    }

    #[test]
    fn test_missing_required_and_additional() {
        let md = heading_doc(&["Requirements", "Providers", "Resources", "Required Inputs", "Outputs"]);
        let errors = SectionValidator::new(&md, &["Usage".to_string()]).validate();
        assert_eq!(
            messages(&errors),
            vec![
                "required section missing: 'Optional Inputs'",
                "additional section missing: 'Usage'",
            ]
        );
    }

    #[test]
    fn test_extra_and_duplicate_sections_ignored() {
        let md = heading_doc(&[
            "Requirements",
            "Providers",
            "Resources",
            "Resources",
            "Required Inputs",
            "Optional Inputs",
            "Outputs",
            "Examples",
        ]);
        assert!(SectionValidator::new(&md, &[]).validate().is_empty());
    }

    #[test]
    fn test_additional_section_already_required() {
        let md = heading_doc(&["Requirements", "Providers", "Required Inputs", "Optional Inputs", "Outputs"]);
        let errors = SectionValidator::new(&md, &["Resources".to_string()]).validate();
        assert_eq!(messages(&errors), vec!["required section missing: 'Resources'"]);
    }

    #[test]
    fn test_table_format_inputs_accepts_split_sections() {
        let source = "## Requirements\n\nNo requirements.\n\n## Providers\n\nNo providers.\n\n\
                      ## Resources\n\nNo resources.\n\n## Required Inputs\n\nNo required inputs.\n\n\
                      ## Outputs\n\nNo outputs.\n";
        let md = MarkdownContent::new(source, FormatOption::Table, PREFIXES);
        assert!(SectionValidator::new(&md, &[]).validate().is_empty());
    }

    #[test]
    fn test_table_columns() {
        let source = r#"
## Requirements

| Name | Version |
|------|---------|
| terraform | >= 1.5 |

## Providers

| Name | Ver |
|------|-----|
| azurerm | >= 3.0 |

## Resources

| Name | Type |
|------|------|
| [azurerm_resource_group.main](https://x/docs/resources/resource_group) | resource |

## Inputs

| Name | Description | Type | Default | Required |
|------|-------------|------|---------|:--------:|
| location | Region | `string` | n/a | yes |

## Outputs

Some prose but no table.
"#;
        let md = MarkdownContent::new(source, FormatOption::Auto, PREFIXES);
        assert_eq!(md.format(), Format::Table);
        let errors = SectionValidator::new(&md, &[]).validate();
        assert_eq!(
            messages(&errors),
            vec![
                "unexpected column 'Ver' in table under header: Providers (did you mean 'Version'?)",
                "missing required column 'Version' in table under header: Providers",
                "missing table after header: Outputs",
            ]
        );
    }

    #[test]
    fn test_suggest() {
        assert_eq!(suggest("Ver", &["Name", "Version"]), Some("Version".to_string()));
        assert_eq!(suggest("descripton", &["Name", "Description"]), Some("Description".to_string()));
        assert_eq!(suggest("Sensitive", &["Name", "Description"]), None);
    }

    #[test]
    fn test_table_spec_lookup() {
        assert_eq!(table_spec("inputs").map(|s| s.required.len()), Some(3));
        assert!(table_spec("Usage").is_none());
    }
}
