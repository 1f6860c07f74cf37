//! Deterministic ordering of clean records.

use crate::normalize::normalize;
use crate::table::Record;

/// Stable sort by normalized company, ascending. Records whose keys compare
/// equal keep their input order.
pub fn sort_by_company(records: &mut [Record], company_idx: usize) {
    // sort_by_cached_key is stable and normalizes each key once
    records.sort_by_cached_key(|r| normalize(r.cell(company_idx)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Cell, RowId};

    fn rec(id: usize, company: &str) -> Record {
        Record::new(RowId(id), vec![Cell::from(company)])
    }

    fn ids(records: &[Record]) -> Vec<usize> {
        records.iter().map(|r| r.id.0).collect()
    }

    #[test]
    fn orders_by_normalized_company() {
        let mut rs = vec![rec(0, "zeta"), rec(1, " Beta"), rec(2, "ALPHA")];
        sort_by_company(&mut rs, 0);
        assert_eq!(ids(&rs), vec![2, 1, 0]);
    }

    #[test]
    fn ties_keep_input_order() {
        let mut rs = vec![rec(0, "acme"), rec(1, "Beta"), rec(2, "ACME"), rec(3, "Acme ")];
        sort_by_company(&mut rs, 0);
        assert_eq!(ids(&rs), vec![0, 2, 3, 1]);
    }

    #[test]
    fn empty_company_sorts_first() {
        let mut rs = vec![rec(0, "b"), rec(1, ""), rec(2, "a")];
        sort_by_company(&mut rs, 0);
        assert_eq!(ids(&rs), vec![1, 2, 0]);
    }
}
