use serde::Serialize;

use crate::blacklist::{BlacklistIndex, BlockReason};
use crate::dedupe::dedupe;
use crate::filter::{partition, BlockedRecord};
use crate::session::EditSession;
use crate::sort::sort_by_company;
use crate::table::{Cell, Dataset, Record, RowId, Table};

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScrubSummary {
    pub total_rows: usize,
    pub blocked: usize,
    pub blocked_by_company: usize,
    pub blocked_by_email: usize,
    pub blocked_by_both: usize,
    pub clean_before_dedupe: usize,
    pub duplicates_removed: usize,
    pub clean: usize,
    pub blacklist_companies: usize,
    pub blacklist_emails: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScrubMeta {
    pub engine_version: String,
    pub run_at: String,
    pub company_column: String,
    pub email_column: String,
}

/// Result of one full pass: blocked rows in source order, clean rows
/// deduplicated and sorted.
#[derive(Debug, Clone)]
pub struct ScrubOutcome {
    pub columns: Vec<String>,
    pub company_idx: usize,
    pub email_idx: usize,
    pub blocked: Vec<BlockedRecord>,
    pub clean: Vec<Record>,
    pub summary: ScrubSummary,
    pub meta: ScrubMeta,
}

/// One blocked row as it appears in the JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct BlockedRow {
    pub id: RowId,
    pub reason: BlockReason,
    pub company: Cell,
    pub email: Cell,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScrubReport {
    pub meta: ScrubMeta,
    pub summary: ScrubSummary,
    pub blocked: Vec<BlockedRow>,
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// partition -> dedupe(clean) -> sort(clean). `blocked` is never deduped or
/// reordered.
pub fn scrub(dataset: &Dataset, index: &BlacklistIndex) -> ScrubOutcome {
    let split = partition(dataset, index);

    let mut summary = ScrubSummary {
        total_rows: dataset.records().len(),
        blocked: split.blocked.len(),
        clean_before_dedupe: split.clean.len(),
        blacklist_companies: index.companies().len(),
        blacklist_emails: index.emails().len(),
        ..Default::default()
    };
    for b in &split.blocked {
        match b.reason {
            BlockReason::Company => summary.blocked_by_company += 1,
            BlockReason::Email => summary.blocked_by_email += 1,
            BlockReason::Both => summary.blocked_by_both += 1,
        }
    }

    let mut clean = dedupe(split.clean, dataset.company_idx, dataset.email_idx);
    sort_by_company(&mut clean, dataset.company_idx);

    summary.clean = clean.len();
    summary.duplicates_removed = summary.clean_before_dedupe - summary.clean;

    log::info!(
        "scrub: {} rows, {} blocked, {} duplicates removed, {} clean",
        summary.total_rows,
        summary.blocked,
        summary.duplicates_removed,
        summary.clean
    );

    let columns = dataset.columns().to_vec();
    ScrubOutcome {
        meta: ScrubMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            company_column: columns[dataset.company_idx].clone(),
            email_column: columns[dataset.email_idx].clone(),
        },
        columns,
        company_idx: dataset.company_idx,
        email_idx: dataset.email_idx,
        blocked: split.blocked,
        clean,
        summary,
    }
}

impl ScrubOutcome {
    pub fn blocked_table(&self) -> Table {
        Table::new(
            self.columns.clone(),
            self.blocked.iter().map(|b| b.record.clone()).collect(),
        )
    }

    pub fn clean_table(&self) -> Table {
        Table::new(self.columns.clone(), self.clean.clone())
    }

    /// Start an edit session whose baseline is this outcome's clean set.
    pub fn session(&self) -> EditSession {
        EditSession::new(
            self.columns.clone(),
            self.clean.clone(),
            self.company_idx,
            self.email_idx,
        )
    }

    pub fn report(&self) -> ScrubReport {
        ScrubReport {
            meta: self.meta.clone(),
            summary: self.summary.clone(),
            blocked: self
                .blocked
                .iter()
                .map(|b| BlockedRow {
                    id: b.record.id,
                    reason: b.reason,
                    company: b.record.cell(self.company_idx).clone(),
                    email: b.record.cell(self.email_idx).clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnNames;

    fn dataset(rows: &[(&str, &str)]) -> Dataset {
        let table = Table::from_rows(
            vec!["Email".into(), "Company Name".into(), "Notes".into()],
            rows.iter()
                .enumerate()
                .map(|(i, (c, e))| vec![Cell::from(*e), Cell::from(*c), Cell::Int(i as i64)])
                .collect(),
        );
        Dataset::bind(table, &ColumnNames::default()).unwrap()
    }

    #[test]
    fn full_pass_counts_add_up() {
        let ds = dataset(&[
            ("Google", "x@y.com"),
            ("Zeta", "z@z.com"),
            ("IBM", "HR@IBM.COM"),
            ("acme", "a@a.com"),
            ("Acme", "a@a.com"),
            ("Zeta", "z@z.com"),
            ("google", "hr@ibm.com"),
        ]);
        let idx = BlacklistIndex::from_keys(["google"], ["hr@ibm.com"]);
        let out = scrub(&ds, &idx);

        let s = &out.summary;
        assert_eq!(s.total_rows, 7);
        assert_eq!(s.blocked, 3);
        assert_eq!(s.blocked_by_company, 1);
        assert_eq!(s.blocked_by_email, 1);
        assert_eq!(s.blocked_by_both, 1);
        assert_eq!(s.clean_before_dedupe, 4);
        assert_eq!(s.duplicates_removed, 1);
        assert_eq!(s.clean, 3);
        assert_eq!(s.blocked + s.clean_before_dedupe, s.total_rows);

        // acme/Acme adjacent in input order, Zeta last
        let ids: Vec<usize> = out.clean.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![3, 4, 1]);

        // blocked keeps source order
        let blocked: Vec<usize> = out.blocked.iter().map(|b| b.record.id.0).collect();
        assert_eq!(blocked, vec![0, 2, 6]);
    }

    #[test]
    fn meta_names_bound_columns() {
        let out = scrub(&dataset(&[]), &BlacklistIndex::default());
        assert_eq!(out.meta.company_column, "Company Name");
        assert_eq!(out.meta.email_column, "Email");
        assert_eq!(out.summary, ScrubSummary::default());
    }

    #[test]
    fn report_lists_blocked_identities() {
        let ds = dataset(&[("Google", "x@y.com"), ("Acme", "a@a.com")]);
        let idx = BlacklistIndex::from_keys(["google"], Vec::<&str>::new());
        let report = scrub(&ds, &idx).report();
        assert_eq!(report.blocked.len(), 1);
        assert_eq!(report.blocked[0].id, RowId(0));
        assert_eq!(report.blocked[0].company, Cell::text("Google"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["blocked"][0]["reason"], "company");
        assert_eq!(json["summary"]["clean"], 1);
    }

    #[test]
    fn tables_keep_columns() {
        let ds = dataset(&[("Google", "x@y.com"), ("Acme", "a@a.com")]);
        let idx = BlacklistIndex::from_keys(["google"], Vec::<&str>::new());
        let out = scrub(&ds, &idx);
        assert_eq!(out.clean_table().columns, ds.columns());
        assert_eq!(out.blocked_table().len(), 1);
        assert_eq!(out.session().len(), 1);
    }
}
