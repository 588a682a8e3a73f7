use super::Validator;
use crate::error::ValidationError;
use crate::markdown::MarkdownContent;
use crate::reconcile::reconcile;
use crate::terraform::TerraformContent;

const VARIABLE_SECTIONS: &[&str] = &["Required Inputs", "Optional Inputs", "Inputs"];
const OUTPUT_SECTIONS: &[&str] = &["Outputs"];

/// Checks that the named blocks of one kind in one file (variables in
/// `variables.tf`, outputs in `outputs.tf`) match the items documented
/// under the given sections.
pub struct ItemValidator<'a> {
    markdown: &'a MarkdownContent,
    terraform: &'a TerraformContent,
    item_type: &'static str,
    block_kind: &'static str,
    sections: &'static [&'static str],
    file_name: &'static str,
}

impl<'a> ItemValidator<'a> {
    pub fn new(
        markdown: &'a MarkdownContent,
        terraform: &'a TerraformContent,
        item_type: &'static str,
        block_kind: &'static str,
        sections: &'static [&'static str],
        file_name: &'static str,
    ) -> Self {
        Self {
            markdown,
            terraform,
            item_type,
            block_kind,
            sections,
            file_name,
        }
    }

    pub fn variables(markdown: &'a MarkdownContent, terraform: &'a TerraformContent) -> Self {
        Self::new(
            markdown,
            terraform,
            "Variables",
            "variable",
            VARIABLE_SECTIONS,
            "variables.tf",
        )
    }

    pub fn outputs(markdown: &'a MarkdownContent, terraform: &'a TerraformContent) -> Self {
        Self::new(
            markdown,
            terraform,
            "Outputs",
            "output",
            OUTPUT_SECTIONS,
            "outputs.tf",
        )
    }
}

impl Validator for ItemValidator<'_> {
    fn name(&self) -> &'static str {
        self.file_name
    }

    fn validate(&self) -> Vec<ValidationError> {
        let path = self.terraform.root().join(self.file_name);
        let declared = match self.terraform.extract_items(&path, self.block_kind) {
            Ok(items) => items,
            Err(report) => return vec![ValidationError::extraction(&report)],
        };

        let documented_somewhere = self.sections.iter().any(|s| self.markdown.has_section(s));
        if !documented_somewhere && declared.is_empty() {
            tracing::debug!(item_type = self.item_type, "nothing declared or documented, skipping");
            return Vec::new();
        }

        let documented = self.markdown.extract_section_items(self.sections);
        reconcile(&declared, &documented, self.item_type)
    }
}
