// File I/O operations

pub mod csv;
pub mod source;
pub mod xlsx;

use std::path::Path;

use scrubgrid_engine::config::OutputFormat;
use scrubgrid_engine::table::Table;
use scrubgrid_engine::ScrubError;

pub use source::{resolve_locator, BlacklistSource};

/// MIME type of the default `filtered_results.xlsx` export.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const CSV_MIME: &str = "text/csv";

/// MIME type for an export format.
pub fn mime_type(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Xlsx => XLSX_MIME,
        OutputFormat::Csv => CSV_MIME,
    }
}

/// Load a table, choosing the reader by file extension.
pub fn load_table(path: &Path) -> Result<Table, ScrubError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" | "txt" => csv::import(path),
        "tsv" => csv::import_tsv(path),
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => xlsx::import(path),
        "" => Err(ScrubError::io(format!(
            "{}: cannot determine file type (no extension)",
            path.display()
        ))),
        other => Err(ScrubError::io(format!(
            "{}: unsupported file type '.{other}' (expected csv, tsv, xlsx, xls, ods)",
            path.display()
        ))),
    }
}
