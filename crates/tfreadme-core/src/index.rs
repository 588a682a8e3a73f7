//! Canonical item index
//!
//! Normalizes raw item names (`azurerm_resource_group`, `azurerm_resource_group.main`)
//! into a lookup structure that matches case-insensitively and understands the
//! difference between a qualified `type.label` name and its bare `type`.

use std::collections::{HashMap, HashSet};

/// A raw item name after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemEntry {
    /// The trimmed name as it appeared in the source
    pub original: String,
    /// Lowercased `original`, unique within an index
    pub key: String,
    /// Lowercased portion before the first `.`
    pub base: String,
    /// Whether the name was qualified (`type.label`)
    pub has_dot: bool,
}

impl ItemEntry {
    /// Normalize a raw name. Returns `None` for blank input.
    pub fn normalize(raw: &str) -> Option<Self> {
        let original = raw.trim();
        if original.is_empty() {
            return None;
        }

        let key = original.to_lowercase();
        let (base, has_dot) = match key.split_once('.') {
            Some((base, _)) => (base.trim().to_string(), true),
            None => (key.clone(), false),
        };

        Some(Self {
            original: original.to_string(),
            key,
            base,
            has_dot,
        })
    }
}

/// Lookup structure over normalized item names.
///
/// Built once per side of a comparison and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct ItemIndex {
    entries: HashMap<String, ItemEntry>,
    by_base: HashMap<String, Vec<String>>,
}

impl ItemIndex {
    /// Build an index from raw names.
    ///
    /// Blank names are skipped and the first occurrence of a key wins. Once any
    /// qualified name exists for a base, the bare form of that base is dropped.
    pub fn build<S: AsRef<str>>(items: &[S]) -> Self {
        let mut entries: HashMap<String, ItemEntry> = HashMap::with_capacity(items.len());

        for raw in items {
            let Some(entry) = ItemEntry::normalize(raw.as_ref()) else {
                continue;
            };
            entries.entry(entry.key.clone()).or_insert(entry);
        }

        let qualified_bases: HashSet<String> = entries
            .values()
            .filter(|e| e.has_dot)
            .map(|e| e.base.clone())
            .collect();
        entries.retain(|_, e| e.has_dot || !qualified_bases.contains(&e.base));

        let mut by_base: HashMap<String, Vec<String>> = HashMap::new();
        for entry in entries.values() {
            by_base
                .entry(entry.base.clone())
                .or_default()
                .push(entry.key.clone());
        }

        Self { entries, by_base }
    }

    /// True if the target's key exists verbatim, or any entry shares its base.
    pub fn has_match(&self, target: &ItemEntry) -> bool {
        self.entries.contains_key(&target.key) || self.by_base.contains_key(&target.base)
    }

    /// True if an entry with exactly this (case-insensitive) name exists.
    pub fn contains(&self, name: &str) -> bool {
        ItemEntry::normalize(name).is_some_and(|e| self.entries.contains_key(&e.key))
    }

    /// All surviving entries, sorted by key for stable output.
    pub fn items(&self) -> Vec<&ItemEntry> {
        let mut items: Vec<&ItemEntry> = self.entries.values().collect();
        items.sort_by(|a, b| a.key.cmp(&b.key));
        items
    }

    /// Number of surviving entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(index: &ItemIndex) -> Vec<String> {
        index.items().iter().map(|e| e.key.clone()).collect()
    }

    #[test]
    fn test_normalize_qualified() {
        let entry = ItemEntry::normalize("  Azurerm_Resource_Group.Main ").unwrap();
        assert_eq!(entry.original, "Azurerm_Resource_Group.Main");
        assert_eq!(entry.key, "azurerm_resource_group.main");
        assert_eq!(entry.base, "azurerm_resource_group");
        assert!(entry.has_dot);
    }

    #[test]
    fn test_normalize_blank() {
        assert!(ItemEntry::normalize("   ").is_none());
        assert!(ItemEntry::normalize("").is_none());
    }

    #[test]
    fn test_build_skips_blank_and_duplicates() {
        let index = ItemIndex::build(&["foo", "", "  ", "FOO", "foo "]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.items()[0].original, "foo");
    }

    #[test]
    fn test_build_is_idempotent() {
        let items = ["a", "b.x", "b", "C"];
        let doubled: Vec<&str> = items.iter().chain(items.iter()).copied().collect();
        assert_eq!(keys(&ItemIndex::build(&items)), keys(&ItemIndex::build(doubled.as_slice())));
    }

    #[test]
    fn test_qualified_supersedes_bare() {
        let index = ItemIndex::build(&["resource_type", "resource_type.instance"]);
        assert_eq!(keys(&index), vec!["resource_type.instance"]);

        let index = ItemIndex::build(&["resource_type"]);
        assert_eq!(keys(&index), vec!["resource_type"]);
    }

    #[test]
    fn test_multiple_qualified_forms_survive() {
        let index = ItemIndex::build(&["t", "t.a", "t.b"]);
        assert_eq!(keys(&index), vec!["t.a", "t.b"]);
    }

    #[test]
    fn test_case_insensitive_match() {
        let index = ItemIndex::build(&["Foo"]);
        assert!(index.has_match(&ItemEntry::normalize("foo").unwrap()));
        assert!(index.contains("FOO"));
    }

    #[test]
    fn test_base_level_match() {
        let index = ItemIndex::build(&["azurerm_resource_group"]);
        assert!(index.has_match(&ItemEntry::normalize("azurerm_resource_group.main").unwrap()));

        let index = ItemIndex::build(&["azurerm_resource_group.main"]);
        assert!(index.has_match(&ItemEntry::normalize("azurerm_resource_group").unwrap()));
        assert!(!index.has_match(&ItemEntry::normalize("azurerm_virtual_network").unwrap()));
    }

    #[test]
    fn test_empty_input() {
        let empty: [&str; 0] = [];
        let index = ItemIndex::build(&empty);
        assert!(index.is_empty());
        assert!(index.items().is_empty());
    }
}
