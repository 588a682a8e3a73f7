use super::Validator;
use crate::error::ValidationError;
use crate::markdown::{MarkdownContent, RESOURCES_SECTION};
use crate::reconcile::reconcile;
use crate::terraform::{Definitions, TerraformContent};

/// Checks that resources and data sources declared in the module are the ones
/// linked from the README, in both directions.
pub struct ResourceValidator<'a> {
    markdown: &'a MarkdownContent,
    terraform: &'a TerraformContent,
}

impl<'a> ResourceValidator<'a> {
    pub fn new(markdown: &'a MarkdownContent, terraform: &'a TerraformContent) -> Self {
        Self {
            markdown,
            terraform,
        }
    }

    /// A module with nothing to declare may leave the section out or say
    /// "No resources."; a Resources heading with nothing under it is a finding.
    fn nothing_documented(&self) -> Vec<ValidationError> {
        let headings = self.markdown.collect_sections(&[RESOURCES_SECTION]);
        if headings.is_empty() || headings.iter().any(|h| self.markdown.section_says_none(h)) {
            Vec::new()
        } else {
            vec![ValidationError::ResourcesNotDocumented]
        }
    }
}

impl Validator for ResourceValidator<'_> {
    fn name(&self) -> &'static str {
        "resources"
    }

    fn validate(&self) -> Vec<ValidationError> {
        let declared = match self.terraform.extract_resources_and_data_sources() {
            Ok(declared) => declared,
            Err(report) => return vec![ValidationError::extraction(&report)],
        };

        let documented = match self.markdown.extract_resources_and_data_sources() {
            Ok(documented) => documented,
            Err(_) if declared.is_empty() => return self.nothing_documented(),
            Err(_) => Definitions::default(),
        };

        let mut errors = reconcile(&declared.resources, &documented.resources, "Resources");
        errors.extend(reconcile(
            &declared.data_sources,
            &documented.data_sources,
            "Data Sources",
        ));
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FormatOption;
    use crate::terraform::ScanStrategy;
    use std::fs;

    const PREFIXES: &[&str] = &["azurerm_"];

    fn module(main_tf: Option<&str>) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        if let Some(main_tf) = main_tf {
            fs::write(dir.path().join("main.tf"), main_tf).unwrap();
        }
        dir
    }

    fn run(readme: &str, main_tf: Option<&str>) -> Vec<String> {
        let dir = module(main_tf);
        let md = MarkdownContent::new(readme, FormatOption::Document, PREFIXES);
        let tf = TerraformContent::new(dir.path(), ScanStrategy::Shallow);
        ResourceValidator::new(&md, &tf)
            .validate()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_exact_match() {
        let readme = "## Resources\n\n\
            - [azurerm_resource_group.main](https://x/docs/resources/resource_group) (resource)\n\
            - [azurerm_client_config.current](https://x/docs/data-sources/client_config) (data source)\n";
        let main_tf = "resource \"azurerm_resource_group\" \"main\" {}\n\
                       data \"azurerm_client_config\" \"current\" {}\n";
        assert!(run(readme, Some(main_tf)).is_empty());
    }

    #[test]
    fn test_undocumented_resource() {
        let readme = "## Resources\n\n\
            - [azurerm_resource_group.main](https://x/docs/resources/resource_group) (resource)\n";
        let main_tf = "resource \"azurerm_resource_group\" \"main\" {}\n\
                       resource \"azurerm_virtual_network\" \"main\" {}\n";
        assert_eq!(
            run(readme, Some(main_tf)),
            vec!["Resources in Terraform but missing in markdown: azurerm_virtual_network.main"]
        );
    }

    #[test]
    fn test_data_source_documented_as_resource() {
        let readme = "## Resources\n\n\
            - [azurerm_client_config.current](https://x/docs/resources/client_config) (resource)\n";
        let main_tf = "data \"azurerm_client_config\" \"current\" {}\n";
        let errors = run(readme, Some(main_tf));
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(
            &"Data Sources in Terraform but missing in markdown: azurerm_client_config.current"
                .to_string()
        ));
        assert!(errors.contains(
            &"Resources in markdown but missing in Terraform: azurerm_client_config.current"
                .to_string()
        ));
    }

    #[test]
    fn test_empty_module_without_section() {
        assert!(run("## Outputs\n\n### id\n", None).is_empty());
    }

    #[test]
    fn test_empty_module_with_placeholder() {
        assert!(run("## Resources\n\nNo resources.\n", None).is_empty());
    }

    #[test]
    fn test_empty_section_reported() {
        assert_eq!(
            run("## Resources\n\nTODO\n", None),
            vec!["resources section not found or empty"]
        );
    }

    #[test]
    fn test_resources_declared_but_section_empty() {
        let main_tf = "resource \"azurerm_subnet\" \"this\" {}\n";
        assert_eq!(
            run("## Resources\n\nNo resources.\n", Some(main_tf)),
            vec!["Resources in Terraform but missing in markdown: azurerm_subnet.this"]
        );
    }

    #[test]
    fn test_parse_error_is_single_finding() {
        let errors = run("## Resources\n", Some("resource \"x\" {\n"));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("error parsing HCL in main.tf"));
    }
}
