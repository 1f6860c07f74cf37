//! Editable working copy of the clean set.
//!
//! The session owns two vectors: the immutable `baseline` captured at
//! construction and the `working` copy that deletes mutate. Reset copies the
//! baseline back; nothing is recomputed. One session per user; no sharing.

use std::collections::HashSet;

use serde::Serialize;

use crate::blacklist::BlacklistIndex;
use crate::table::{Record, RowId, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Working copy equals the baseline.
    Initialized,
    /// At least one delete/purge/extend is outstanding.
    Mutated,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized => write!(f, "initialized"),
            Self::Mutated => write!(f, "mutated"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EditSession {
    columns: Vec<String>,
    company_idx: usize,
    email_idx: usize,
    baseline: Vec<Record>,
    working: Vec<Record>,
}

impl EditSession {
    pub fn new(columns: Vec<String>, clean: Vec<Record>, company_idx: usize, email_idx: usize) -> Self {
        Self {
            columns,
            company_idx,
            email_idx,
            working: clean.clone(),
            baseline: clean,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn company_idx(&self) -> usize {
        self.company_idx
    }

    pub fn email_idx(&self) -> usize {
        self.email_idx
    }

    /// Current working copy, in order.
    pub fn working(&self) -> &[Record] {
        &self.working
    }

    pub fn baseline(&self) -> &[Record] {
        &self.baseline
    }

    pub fn len(&self) -> usize {
        self.working.len()
    }

    pub fn is_empty(&self) -> bool {
        self.working.is_empty()
    }

    pub fn contains(&self, id: RowId) -> bool {
        self.working.iter().any(|r| r.id == id)
    }

    pub fn state(&self) -> SessionState {
        if self.working == self.baseline {
            SessionState::Initialized
        } else {
            SessionState::Mutated
        }
    }

    /// Baseline identities missing from the working copy, in baseline order.
    pub fn deleted_ids(&self) -> Vec<RowId> {
        let present: HashSet<RowId> = self.working.iter().map(|r| r.id).collect();
        self.baseline
            .iter()
            .map(|r| r.id)
            .filter(|id| !present.contains(id))
            .collect()
    }

    /// Remove the record with `id`. Returns false (and changes nothing) when
    /// it is not in the working copy.
    pub fn delete(&mut self, id: RowId) -> bool {
        match self.working.iter().position(|r| r.id == id) {
            Some(pos) => {
                self.working.remove(pos);
                log::debug!("session: deleted row {id}");
                true
            }
            None => {
                log::debug!("session: delete of row {id} ignored (not present)");
                false
            }
        }
    }

    /// Remove every listed identity in one step. Unknown ids are ignored.
    /// Returns how many records were removed.
    pub fn delete_many(&mut self, ids: &[RowId]) -> usize {
        let targets: HashSet<RowId> = ids.iter().copied().collect();
        let before = self.working.len();
        self.working.retain(|r| !targets.contains(&r.id));
        let removed = before - self.working.len();
        log::debug!("session: batch delete removed {removed} of {} requested", targets.len());
        removed
    }

    /// Discard all edits, restoring the baseline.
    pub fn reset(&mut self) {
        self.working.clone_from(&self.baseline);
        log::debug!("session: reset to {} baseline rows", self.baseline.len());
    }

    /// Re-apply the blocked predicate to the current working copy. Returns
    /// the identities removed, in working order.
    pub fn purge_blacklisted(&mut self, index: &BlacklistIndex) -> Vec<RowId> {
        let (company_idx, email_idx) = (self.company_idx, self.email_idx);
        let mut removed = Vec::new();
        self.working.retain(|r| {
            let blocked = index.is_blocked(r.cell(company_idx), r.cell(email_idx));
            if blocked {
                removed.push(r.id);
            }
            !blocked
        });
        if !removed.is_empty() {
            log::info!("session: purged {} blacklisted row(s)", removed.len());
        }
        removed
    }

    /// Append records that arrive after filtering (pasted or re-imported
    /// rows). Records whose identity is already present are skipped.
    /// Returns how many were appended.
    pub fn extend(&mut self, records: impl IntoIterator<Item = Record>) -> usize {
        let mut present: HashSet<RowId> = self.working.iter().map(|r| r.id).collect();
        let before = self.working.len();
        for record in records {
            if present.insert(record.id) {
                self.working.push(record);
            }
        }
        self.working.len() - before
    }

    /// The exact working copy, in order, ready for an export collaborator.
    pub fn to_table(&self) -> Table {
        Table::new(self.columns.clone(), self.working.clone())
    }
}
