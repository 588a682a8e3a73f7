//! Fuzzy section-name matching
//!
//! Decides whether an observed heading denotes the same logical section as an
//! expected name, tolerating case, singular/plural variation and small typos.

/// Maximum edit distance still considered a typo of the expected name.
pub const MAX_TYPO_DISTANCE: usize = 2;

/// Whether `observed` heading text denotes the `expected` section.
pub fn matches_section(observed: &str, expected: &str) -> bool {
    let observed = observed.trim();
    let expected = expected.trim();

    if observed.is_empty() || expected.is_empty() {
        return false;
    }

    if observed.eq_ignore_ascii_case(expected) {
        return true;
    }

    if is_plural_of(observed, expected) {
        return true;
    }

    if is_inputs_variant(observed, expected) {
        return true;
    }

    strsim::levenshtein(&observed.to_lowercase(), &expected.to_lowercase()) <= MAX_TYPO_DISTANCE
}

/// Whether a found heading is likely a misspelling of an expected one.
///
/// Unlike [`matches_section`] this keeps case significant in the distance
/// check, so `resources` vs `Resources` is only caught by the explicit
/// case-insensitive rule.
pub fn is_similar_section(found: &str, expected: &str) -> bool {
    if found == expected {
        return true;
    }

    if format!("{found}s") == expected || found == format!("{expected}s") {
        return true;
    }

    if strsim::levenshtein(found, expected) <= MAX_TYPO_DISTANCE {
        return true;
    }

    found.eq_ignore_ascii_case(expected)
}

/// `Inputs` is split into `Required Inputs` and `Optional Inputs` by convention.
pub fn is_inputs_variant(observed: &str, expected: &str) -> bool {
    expected == "Inputs"
        && (observed.eq_ignore_ascii_case("Required Inputs")
            || observed.eq_ignore_ascii_case("Optional Inputs"))
}

fn is_plural_of(a: &str, b: &str) -> bool {
    let (a, b) = (a.to_lowercase(), b.to_lowercase());
    a == format!("{b}s") || b == format!("{a}s")
}
