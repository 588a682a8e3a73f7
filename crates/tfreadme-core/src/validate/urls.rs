use super::Validator;
use crate::document::{NodeKind, Walk};
use crate::error::ValidationError;
use crate::markdown::MarkdownContent;
use rayon::prelude::*;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;

static BARE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>()\[\]"'`]+"#).expect("valid regex"));

/// Provider documentation links are generated by terraform-docs and not checked.
const SKIPPED_URL_PART: &str = "registry.terraform.io/providers/";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_CONCURRENT_REQUESTS: usize = 5;

/// Every distinct `http(s)` URL in the README, link targets and bare URLs,
/// in order of first appearance.
pub fn collect_urls(markdown: &MarkdownContent) -> Vec<String> {
    let mut candidates = Vec::new();
    markdown.document().walk(&mut |node| {
        if let NodeKind::Link { destination } = &node.kind {
            if destination.starts_with("http://") || destination.starts_with("https://") {
                candidates.push(destination.clone());
            }
        }
        Walk::Continue
    });
    candidates.extend(
        BARE_URL
            .find_iter(markdown.content())
            .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?']).to_string()),
    );

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|url| !url.contains(SKIPPED_URL_PART))
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Fetches every URL in the README and reports the ones that do not answer 200.
pub struct UrlValidator<'a> {
    markdown: &'a MarkdownContent,
}

impl<'a> UrlValidator<'a> {
    pub fn new(markdown: &'a MarkdownContent) -> Self {
        Self { markdown }
    }
}

impl Validator for UrlValidator<'_> {
    fn name(&self) -> &'static str {
        "urls"
    }

    fn validate(&self) -> Vec<ValidationError> {
        let urls = collect_urls(self.markdown);
        if urls.is_empty() {
            return Vec::new();
        }
        tracing::debug!(count = urls.len(), "checking urls");

        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .http_status_as_error(false)
            .build()
            .into();
        let check = |url: &String| check_url(&agent, url);

        match rayon::ThreadPoolBuilder::new()
            .num_threads(MAX_CONCURRENT_REQUESTS)
            .build()
        {
            Ok(pool) => pool.install(|| urls.par_iter().filter_map(check).collect()),
            Err(e) => {
                tracing::warn!(error = %e, "could not start url workers, checking sequentially");
                urls.iter().filter_map(check).collect()
            }
        }
    }
}

fn check_url(agent: &ureq::Agent, url: &str) -> Option<ValidationError> {
    match agent.get(url).call() {
        Ok(response) if response.status().as_u16() == 200 => None,
        Ok(response) => Some(ValidationError::BadUrlStatus {
            url: url.to_string(),
            status: response.status().as_u16(),
        }),
        Err(e) => Some(ValidationError::UnreachableUrl {
            url: url.to_string(),
            cause: e.to_string(),
        }),
    }
}
