//! Drop repeated clean records by raw (company, email) pair.

use std::collections::HashSet;

use crate::table::{Cell, Record};

/// Keep the first record for each distinct raw `(company, email)` pair.
/// Comparison is on the cells as read, not on their normalized form, so
/// `"Acme"` and `"acme"` are different keys.
pub fn dedupe(records: Vec<Record>, company_idx: usize, email_idx: usize) -> Vec<Record> {
    let before = records.len();
    let mut seen: HashSet<(Cell, Cell)> = HashSet::with_capacity(before);

    let kept: Vec<Record> = records
        .into_iter()
        .filter(|r| seen.insert((r.cell(company_idx).clone(), r.cell(email_idx).clone())))
        .collect();

    if kept.len() != before {
        log::debug!("dedupe: dropped {} duplicate record(s)", before - kept.len());
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::RowId;

    fn rec(id: usize, company: &str, email: &str) -> Record {
        Record::new(RowId(id), vec![Cell::from(company), Cell::from(email), Cell::Int(id as i64)])
    }

    fn ids(records: &[Record]) -> Vec<usize> {
        records.iter().map(|r| r.id.0).collect()
    }

    #[test]
    fn keeps_first_occurrence() {
        let out = dedupe(
            vec![
                rec(0, "Acme", "a@a.com"),
                rec(1, "Globex", "g@g.com"),
                rec(2, "Acme", "a@a.com"),
            ],
            0,
            1,
        );
        assert_eq!(ids(&out), vec![0, 1]);
    }

    #[test]
    fn raw_case_difference_is_not_a_duplicate() {
        let out = dedupe(
            vec![rec(0, "Acme", "a@a.com"), rec(1, "acme", "a@a.com")],
            0,
            1,
        );
        assert_eq!(ids(&out), vec![0, 1]);
    }

    #[test]
    fn other_columns_do_not_matter() {
        // third cell differs (row id), pair is equal
        let out = dedupe(vec![rec(0, "A", "x"), rec(5, "A", "x")], 0, 1);
        assert_eq!(ids(&out), vec![0]);
    }

    #[test]
    fn empty_pairs_collapse() {
        let out = dedupe(vec![rec(0, "", ""), rec(1, "", "")], 0, 1);
        assert_eq!(ids(&out), vec![0]);
    }

    #[test]
    fn idempotent() {
        let once = dedupe(
            vec![rec(0, "A", "x"), rec(1, "A", "x"), rec(2, "B", "y"), rec(3, "B", "y")],
            0,
            1,
        );
        let twice = dedupe(once.clone(), 0, 1);
        assert_eq!(once, twice);
    }
}
