//! Canonical comparison form for identity fields.
//!
//! `normalize` is total: every cell maps to a key, `Empty` maps to `""`.
//! Keys are only ever compared or sorted, never written back to output.

use crate::table::Cell;

/// Normalized projection of a cell: text form, lowercased, trimmed.
pub fn normalize(value: &Cell) -> String {
    match value {
        Cell::Empty => String::new(),
        Cell::Text(s) => normalize_str(s),
        other => normalize_str(&other.to_string()),
    }
}

/// Same projection applied to raw text.
pub fn normalize_str(s: &str) -> String {
    s.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_is_empty_string() {
        assert_eq!(normalize(&Cell::Empty), "");
    }

    #[test]
    fn lowercases_and_trims() {
        assert_eq!(normalize(&Cell::text("  HR@IBM.COM ")), "hr@ibm.com");
        assert_eq!(normalize(&Cell::text("\tGoogle\n")), "google");
    }

    #[test]
    fn whitespace_only_collapses_to_empty() {
        assert_eq!(normalize(&Cell::text("   ")), "");
    }

    #[test]
    fn numbers_use_text_form() {
        assert_eq!(normalize(&Cell::Int(42)), "42");
        assert_eq!(normalize(&Cell::float(3.0)), "3.0");
        assert_eq!(normalize(&Cell::Bool(true)), "true");
    }

    proptest! {
        #[test]
        fn idempotent(s in "\\PC{0,40}") {
            let once = normalize_str(&s);
            prop_assert_eq!(normalize_str(&once), once.clone());
            prop_assert_eq!(normalize(&Cell::Text(once.clone())), once);
        }
    }
}
