// Excel import (xlsx, xls, xlsb, ods) and xlsx export

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};

use scrubgrid_engine::table::{Cell, Table};
use scrubgrid_engine::ScrubError;

/// Worksheet name used for exported working sets.
pub const EXPORT_SHEET_NAME: &str = "Filtered";

// xlsx hard limits
const MAX_ROWS: usize = 1_048_576;
const MAX_COLS: usize = 16_384;

/// Import the first worksheet. The first row is the header.
pub fn import(path: &Path) -> Result<Table, ScrubError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| ScrubError::io(format!("Failed to open spreadsheet {}: {e}", path.display())))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ScrubError::io(format!("{} contains no sheets", path.display())))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ScrubError::io(format!("Failed to read sheet '{sheet_name}': {e}")))?;

    let mut rows = range.rows();
    let columns: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(header_text).collect(),
        None => return Ok(Table::default()),
    };

    let data: Vec<Vec<Cell>> = rows
        .map(|row| row.iter().map(to_cell).collect::<Vec<_>>())
        .filter(|cells| cells.iter().any(|c| !c.is_empty()))
        .collect();

    log::debug!(
        "xlsx: sheet '{}' -> {} columns, {} rows",
        sheet_name,
        columns.len(),
        data.len()
    );
    Ok(Table::from_rows(columns, data))
}

fn header_text(cell: &Data) -> String {
    to_cell(cell).to_string()
}

fn to_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::from(s.as_str()),
        Data::Float(n) => number_cell(*n),
        Data::Int(n) => Cell::Int(*n),
        Data::Bool(b) => Cell::Bool(*b),
        Data::Error(e) => Cell::text(format!("#{e:?}")),
        // Serial number; the 1900 date system is assumed
        Data::DateTime(dt) => number_cell(dt.as_f64()),
        Data::DateTimeIso(s) => Cell::text(s.clone()),
        Data::DurationIso(s) => Cell::text(s.clone()),
    }
}

/// xlsx stores every number as a double. Whole values come back as `Int` so
/// `123` reads the same here as it does from CSV.
fn number_cell(n: f64) -> Cell {
    if n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        Cell::Int(n as i64)
    } else {
        Cell::float(n)
    }
}

/// Serialize `table` as an xlsx workbook: bold header row, then every row
/// in order. Text stays text, numbers stay numbers, empty cells stay blank.
pub fn export(table: &Table) -> Result<Vec<u8>, ScrubError> {
    if table.len() + 1 > MAX_ROWS {
        return Err(ScrubError::export(format!(
            "{} rows exceed the xlsx limit of {}",
            table.len(),
            MAX_ROWS - 1
        )));
    }
    if table.columns.len() > MAX_COLS {
        return Err(ScrubError::export(format!(
            "{} columns exceed the xlsx limit of {MAX_COLS}",
            table.columns.len()
        )));
    }

    let mut workbook = XlsxWorkbook::new();
    let worksheet = workbook
        .add_worksheet()
        .set_name(EXPORT_SHEET_NAME)
        .map_err(|e| ScrubError::export(format!("Failed to create sheet: {e}")))?;

    let header_format = Format::new().set_bold();
    for (col, name) in table.columns.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, name, &header_format)
            .map_err(|e| ScrubError::export(format!("Failed to write header '{name}': {e}")))?;
    }

    for (i, record) in table.rows.iter().enumerate() {
        let row = (i + 1) as u32;
        for col in 0..table.columns.len() {
            let col16 = col as u16;
            let written = match record.cell(col) {
                Cell::Empty => continue,
                Cell::Text(s) => worksheet.write_string(row, col16, s).map(|_| ()),
                Cell::Int(n) => worksheet.write_number(row, col16, *n as f64).map(|_| ()),
                Cell::Float(n) => worksheet.write_number(row, col16, n.into_inner()).map(|_| ()),
                Cell::Bool(b) => worksheet.write_boolean(row, col16, *b).map(|_| ()),
            };
            written.map_err(|e| {
                ScrubError::export(format!("Failed to write row {} column {col}: {e}", record.id))
            })?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ScrubError::export(format!("Failed to serialize workbook: {e}")))
}
