//! In-memory tabular model shared by every stage.
//!
//! A [`Table`] is an ordered list of [`Record`]s plus the column-name list.
//! Each record keeps its original cells untouched; comparison happens on
//! projections computed by [`crate::normalize`].

use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::ScrubError;

/// Header bound to the company field when nothing else is configured.
pub const DEFAULT_COMPANY_COLUMN: &str = "Company Name";
/// Header bound to the email field when nothing else is configured.
pub const DEFAULT_EMAIL_COLUMN: &str = "Email";

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A single scalar value as read from the source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(OrderedFloat<f64>),
    Bool(bool),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn float(f: f64) -> Self {
        Self::Float(OrderedFloat(f))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(v) => {
                let v = v.into_inner();
                // Integral floats keep their decimal point so 1.0 and 1 stay distinct.
                if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
                    write!(f, "{v:.1}")
                } else {
                    write!(f, "{v}")
                }
            }
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Text(s.to_string())
        }
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Text(s)
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Empty => serializer.serialize_none(),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Float(v) => serializer.serialize_f64(v.into_inner()),
            Self::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// Stable identity of a record: its 0-based data-row position in the source
/// table. Assigned once at ingestion and never renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub usize);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: RowId,
    /// Aligned with the owning table's `columns`.
    pub cells: Vec<Cell>,
}

impl Record {
    pub fn new(id: RowId, cells: Vec<Cell>) -> Self {
        Self { id, cells }
    }

    /// Cell at `idx`, or `Empty` when the row is shorter than the header.
    pub fn cell(&self, idx: usize) -> &Cell {
        static EMPTY: Cell = Cell::Empty;
        self.cells.get(idx).unwrap_or(&EMPTY)
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Record>) -> Self {
        Self { columns, rows }
    }

    /// Build a table from raw rows, assigning `RowId`s by position.
    /// Rows shorter than the header are padded with `Empty`.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, mut cells)| {
                if cells.len() < width {
                    cells.resize(width, Cell::Empty);
                }
                Record::new(RowId(i), cells)
            })
            .collect();
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first header equal to `name`, ignoring case and
    /// surrounding whitespace.
    pub fn resolve_column(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.columns
            .iter()
            .position(|c| c.trim().to_lowercase() == wanted)
    }
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// Header names bound to the two identity fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    pub company: String,
    pub email: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            company: DEFAULT_COMPANY_COLUMN.to_string(),
            email: DEFAULT_EMAIL_COLUMN.to_string(),
        }
    }
}

/// A table whose company and email columns have been resolved.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub table: Table,
    pub company_idx: usize,
    pub email_idx: usize,
}

impl Dataset {
    /// Bind the identity columns. Fails naming every missing column and
    /// listing the headers that were present.
    pub fn bind(table: Table, names: &ColumnNames) -> Result<Self, ScrubError> {
        let company_idx = table.resolve_column(&names.company);
        let email_idx = table.resolve_column(&names.email);

        match (company_idx, email_idx) {
            (Some(company_idx), Some(email_idx)) => Ok(Self {
                table,
                company_idx,
                email_idx,
            }),
            _ => {
                let mut missing = Vec::new();
                if company_idx.is_none() {
                    missing.push(names.company.clone());
                }
                if email_idx.is_none() {
                    missing.push(names.email.clone());
                }
                Err(ScrubError::InputValidation {
                    table: "input".into(),
                    missing,
                    found: table.columns.clone(),
                })
            }
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.table.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.table.rows
    }

    pub fn company<'a>(&self, record: &'a Record) -> &'a Cell {
        record.cell(self.company_idx)
    }

    pub fn email<'a>(&self, record: &'a Record) -> &'a Cell {
        record.cell(self.email_idx)
    }
}
