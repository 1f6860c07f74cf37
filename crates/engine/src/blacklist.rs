//! Lookup sets built from the blacklist reference table.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::ScrubError;
use crate::normalize::{normalize, normalize_str};
use crate::table::{Cell, ColumnNames, Table};

/// Normalized company names and emails that cause a record to be blocked.
///
/// A set whose source column was absent stays empty and matches nothing.
#[derive(Debug, Clone, Default)]
pub struct BlacklistIndex {
    companies: HashSet<String>,
    emails: HashSet<String>,
    company_column: Option<String>,
    email_column: Option<String>,
}

/// Which side of the OR test caught a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    Company,
    Email,
    Both,
}

impl std::fmt::Display for BlockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Company => write!(f, "company"),
            Self::Email => write!(f, "email"),
            Self::Both => write!(f, "company+email"),
        }
    }
}

impl BlacklistIndex {
    /// Build the index from `table`, resolving each column name
    /// case-insensitively. Either column may be absent, not both.
    pub fn build(
        table: &Table,
        company_column: Option<&str>,
        email_column: Option<&str>,
    ) -> Result<Self, ScrubError> {
        let company_column = company_column.filter(|c| !c.trim().is_empty());
        let email_column = email_column.filter(|c| !c.trim().is_empty());
        let company_idx = company_column.and_then(|c| table.resolve_column(c));
        let email_idx = email_column.and_then(|c| table.resolve_column(c));

        if company_idx.is_none() && email_idx.is_none() {
            let wanted: Vec<&str> = [company_column, email_column].into_iter().flatten().collect();
            return Err(ScrubError::config(format!(
                "blacklist has none of the columns [{}] (found: {})",
                wanted.join(", "),
                table.columns.join(", ")
            )));
        }

        let collect = |idx: Option<usize>| -> HashSet<String> {
            let Some(idx) = idx else {
                return HashSet::new();
            };
            table
                .rows
                .iter()
                .map(|r| normalize(r.cell(idx)))
                // Blank cells are absent entries, not a blacklisted empty value.
                .filter(|k| !k.is_empty())
                .collect()
        };

        let index = Self {
            companies: collect(company_idx),
            emails: collect(email_idx),
            company_column: company_idx.map(|i| table.columns[i].clone()),
            email_column: email_idx.map(|i| table.columns[i].clone()),
        };

        log::debug!(
            "blacklist index: {} companies (column {:?}), {} emails (column {:?}) from {} rows",
            index.companies.len(),
            index.company_column,
            index.emails.len(),
            index.email_column,
            table.len()
        );

        Ok(index)
    }

    /// Build using the configured header names.
    pub fn from_table(table: &Table, names: &ColumnNames) -> Result<Self, ScrubError> {
        Self::build(table, Some(&names.company), Some(&names.email))
    }

    /// Build directly from raw keys; each is normalized on the way in.
    pub fn from_keys<C, E>(companies: C, emails: E) -> Self
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let keep = |s: &str| {
            let k = normalize_str(s);
            (!k.is_empty()).then_some(k)
        };
        Self {
            companies: companies.into_iter().filter_map(|c| keep(c.as_ref())).collect(),
            emails: emails.into_iter().filter_map(|e| keep(e.as_ref())).collect(),
            company_column: None,
            email_column: None,
        }
    }

    pub fn companies(&self) -> &HashSet<String> {
        &self.companies
    }

    pub fn emails(&self) -> &HashSet<String> {
        &self.emails
    }

    /// Header the company set was read from, if the column was present.
    pub fn company_column(&self) -> Option<&str> {
        self.company_column.as_deref()
    }

    pub fn email_column(&self) -> Option<&str> {
        self.email_column.as_deref()
    }

    pub fn contains_company(&self, value: &Cell) -> bool {
        !self.companies.is_empty() && self.companies.contains(&normalize(value))
    }

    pub fn contains_email(&self, value: &Cell) -> bool {
        !self.emails.is_empty() && self.emails.contains(&normalize(value))
    }

    /// The blocked predicate. Each field is checked only against its own set.
    pub fn block_reason(&self, company: &Cell, email: &Cell) -> Option<BlockReason> {
        match (self.contains_company(company), self.contains_email(email)) {
            (true, true) => Some(BlockReason::Both),
            (true, false) => Some(BlockReason::Company),
            (false, true) => Some(BlockReason::Email),
            (false, false) => None,
        }
    }

    pub fn is_blocked(&self, company: &Cell, email: &Cell) -> bool {
        self.block_reason(company, email).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blacklist(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table::from_rows(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|v| Cell::from(*v)).collect())
                .collect(),
        )
    }

    #[test]
    fn builds_both_sets_normalized() {
        let t = blacklist(
            &["company name", "EMAIL"],
            &[&[" Google ", "HR@IBM.com"], &["GOOGLE", "jobs@acme.io"]],
        );
        let idx = BlacklistIndex::from_table(&t, &ColumnNames::default()).unwrap();
        assert_eq!(idx.companies().len(), 1);
        assert!(idx.companies().contains("google"));
        assert!(idx.emails().contains("hr@ibm.com"));
        assert_eq!(idx.emails().len(), 2);
        assert_eq!(idx.company_column(), Some("company name"));
    }

    #[test]
    fn neither_column_is_config_error() {
        let t = blacklist(&["Name", "Phone"], &[&["x", "y"]]);
        let err = BlacklistIndex::from_table(&t, &ColumnNames::default()).unwrap_err();
        assert!(matches!(err, ScrubError::Config(_)));
        assert!(err.to_string().contains("found: Name, Phone"));
    }

    #[test]
    fn company_only_leaves_email_set_empty() {
        let t = blacklist(&["Company Name"], &[&["Google"]]);
        let idx = BlacklistIndex::from_table(&t, &ColumnNames::default()).unwrap();
        assert!(idx.emails().is_empty());
        assert!(idx.email_column().is_none());
        assert!(!idx.contains_email(&Cell::text("hr@ibm.com")));
        assert!(idx.contains_company(&Cell::text("GOOGLE")));
    }

    #[test]
    fn empty_set_never_matches_empty_key() {
        let idx = BlacklistIndex::from_keys(Vec::<&str>::new(), Vec::<&str>::new());
        assert!(!idx.is_blocked(&Cell::Empty, &Cell::Empty));
        assert!(!idx.is_blocked(&Cell::text("  "), &Cell::text("")));
    }

    #[test]
    fn blank_blacklist_cells_are_not_entries() {
        let t = blacklist(&["Company Name", "Email"], &[&["", "hr@ibm.com"], &["Google", ""]]);
        let idx = BlacklistIndex::from_table(&t, &ColumnNames::default()).unwrap();
        assert!(!idx.companies().contains(""));
        assert!(!idx.emails().contains(""));
        assert!(!idx.is_blocked(&Cell::Empty, &Cell::Empty));
    }

    #[test]
    fn no_cross_matching() {
        let idx = BlacklistIndex::from_keys(["hr@ibm.com"], ["google"]);
        // company value that appears only in the email set is not a hit
        assert!(!idx.is_blocked(&Cell::text("google"), &Cell::text("hr@ibm.com")));
    }

    #[test]
    fn block_reason_reports_sides() {
        let idx = BlacklistIndex::from_keys(["google"], ["hr@ibm.com"]);
        assert_eq!(
            idx.block_reason(&Cell::text("Google"), &Cell::text("x@y.com")),
            Some(BlockReason::Company)
        );
        assert_eq!(
            idx.block_reason(&Cell::text("IBM"), &Cell::text(" HR@IBM.COM ")),
            Some(BlockReason::Email)
        );
        assert_eq!(
            idx.block_reason(&Cell::text("google"), &Cell::text("hr@ibm.com")),
            Some(BlockReason::Both)
        );
        assert_eq!(idx.block_reason(&Cell::text("Acme"), &Cell::text("a@a.com")), None);
    }
}
