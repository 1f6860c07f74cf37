//! Classify every record of a dataset as blocked or clean.

use crate::blacklist::{BlacklistIndex, BlockReason};
use crate::table::{Dataset, Record};

/// A record excluded by the blacklist, with the side that matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedRecord {
    pub record: Record,
    pub reason: BlockReason,
}

/// Output of [`partition`]. Both sides keep source order.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub blocked: Vec<BlockedRecord>,
    pub clean: Vec<Record>,
}

impl Partition {
    pub fn blocked_records(&self) -> impl Iterator<Item = &Record> {
        self.blocked.iter().map(|b| &b.record)
    }
}

/// Split `dataset` by the OR-membership test. Every input record lands in
/// exactly one side.
pub fn partition(dataset: &Dataset, index: &BlacklistIndex) -> Partition {
    let mut out = Partition::default();

    for record in dataset.records() {
        match index.block_reason(dataset.company(record), dataset.email(record)) {
            Some(reason) => out.blocked.push(BlockedRecord {
                record: record.clone(),
                reason,
            }),
            None => out.clean.push(record.clone()),
        }
    }

    log::debug!(
        "partition: {} records -> {} blocked, {} clean",
        dataset.records().len(),
        out.blocked.len(),
        out.clean.len()
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Cell, ColumnNames, Table};

    fn dataset(rows: &[(&str, &str)]) -> Dataset {
        let table = Table::from_rows(
            vec!["Company Name".into(), "Email".into()],
            rows.iter()
                .map(|(c, e)| vec![Cell::from(*c), Cell::from(*e)])
                .collect(),
        );
        Dataset::bind(table, &ColumnNames::default()).unwrap()
    }

    #[test]
    fn company_match_is_case_insensitive() {
        let ds = dataset(&[("Google", "x@y.com")]);
        let idx = BlacklistIndex::from_keys(["google"], Vec::<&str>::new());
        let p = partition(&ds, &idx);
        assert_eq!(p.blocked.len(), 1);
        assert_eq!(p.blocked[0].reason, BlockReason::Company);
        assert!(p.clean.is_empty());
    }

    #[test]
    fn email_match_is_trimmed_and_case_insensitive() {
        let ds = dataset(&[("IBM", " HR@IBM.COM")]);
        let idx = BlacklistIndex::from_keys(Vec::<&str>::new(), ["hr@ibm.com"]);
        let p = partition(&ds, &idx);
        assert_eq!(p.blocked.len(), 1);
        assert_eq!(p.blocked[0].reason, BlockReason::Email);
    }

    #[test]
    fn preserves_relative_order_on_both_sides() {
        let ds = dataset(&[
            ("Zeta", "z@z.com"),
            ("Google", "g@g.com"),
            ("Alpha", "a@a.com"),
            ("GOOGLE", "g2@g.com"),
        ]);
        let idx = BlacklistIndex::from_keys(["google"], Vec::<&str>::new());
        let p = partition(&ds, &idx);
        let blocked: Vec<usize> = p.blocked_records().map(|r| r.id.0).collect();
        let clean: Vec<usize> = p.clean.iter().map(|r| r.id.0).collect();
        assert_eq!(blocked, vec![1, 3]);
        assert_eq!(clean, vec![0, 2]);
        assert_eq!(p.blocked.len() + p.clean.len(), 4);
    }

    #[test]
    fn empty_fields_stay_clean_against_populated_index() {
        let ds = dataset(&[("", ""), ("  ", "  ")]);
        let idx = BlacklistIndex::from_keys(["google"], ["hr@ibm.com"]);
        let p = partition(&ds, &idx);
        assert!(p.blocked.is_empty());
        assert_eq!(p.clean.len(), 2);
    }
}
