//! Bidirectional diff between Terraform-declared and markdown-documented items

use crate::error::ValidationError;
use crate::index::ItemIndex;
use std::collections::HashSet;

/// Compare item names from both sides and report every one-sided item.
///
/// `item_type` is the human label used in messages ("Resources", "Variables").
/// At most one error is reported per base name, so `t.one` and `t.two` missing
/// together yield a single finding for `t.one`. Pure: the same inputs always
/// yield the same errors, sorted by name within each direction.
pub fn reconcile<T, M>(tf_items: &[T], md_items: &[M], item_type: &str) -> Vec<ValidationError>
where
    T: AsRef<str>,
    M: AsRef<str>,
{
    let tf = ItemIndex::build(tf_items);
    let md = ItemIndex::build(md_items);

    let mut errors = Vec::new();
    let mut reported: HashSet<&str> = HashSet::new();

    for entry in tf.items() {
        if !md.has_match(entry) && reported.insert(&entry.base) {
            errors.push(ValidationError::missing_in_markdown(item_type, &entry.original));
        }
    }

    for entry in md.items() {
        if !tf.has_match(entry) && reported.insert(&entry.base) {
            errors.push(ValidationError::missing_in_terraform(item_type, &entry.original));
        }
    }

    errors
}
