//! `scrubgrid-engine` — blacklist scrubbing for tabular contact lists.
//!
//! Pure engine crate: receives pre-loaded tables, returns blocked/clean
//! partitions and an editable session over the clean set. No CLI or IO
//! dependencies.

pub mod blacklist;
pub mod config;
pub mod dedupe;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod pipeline;
pub mod session;
pub mod sort;
pub mod table;

pub use blacklist::{BlacklistIndex, BlockReason};
pub use config::ScrubConfig;
pub use error::ScrubError;
pub use pipeline::{scrub, ScrubOutcome, ScrubSummary};
pub use session::{EditSession, SessionState};
pub use table::{Cell, ColumnNames, Dataset, Record, RowId, Table};
