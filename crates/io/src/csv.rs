// CSV/TSV import, CSV export

use std::io::Read;
use std::path::Path;

use scrubgrid_engine::table::{Cell, Table};
use scrubgrid_engine::ScrubError;

pub fn import(path: &Path) -> Result<Table, ScrubError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    import_from_string(&content, delimiter)
}

pub fn import_tsv(path: &Path) -> Result<Table, ScrubError> {
    let content = read_file_as_utf8(path)?;
    import_from_string(&content, b'\t')
}

/// Parse CSV bytes already in memory (e.g. a fetched blacklist).
pub fn import_bytes(bytes: Vec<u8>) -> Result<Table, ScrubError> {
    let content = decode_utf8_or_1252(bytes);
    let delimiter = sniff_delimiter(&content);
    import_from_string(&content, delimiter)
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // Must produce >1 field on the header line to be viable
        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, ScrubError> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| ScrubError::io(format!("cannot open {}: {e}", path.display())))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| ScrubError::io(format!("cannot read {}: {e}", path.display())))?;
    Ok(decode_utf8_or_1252(bytes))
}

fn decode_utf8_or_1252(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(s),
        Err(e) => {
            log::warn!("input is not UTF-8, decoding as Windows-1252");
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    }
}

/// First record is the header row; every later record becomes a data row.
fn import_from_string(content: &str, delimiter: u8) -> Result<Table, ScrubError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let columns: Vec<String> = match records.next() {
        Some(header) => header
            .map_err(|e| ScrubError::io(format!("malformed CSV header: {e}")))?
            .iter()
            .map(|h| h.to_string())
            .collect(),
        None => return Ok(Table::default()),
    };

    let mut rows = Vec::new();
    for (i, result) in records.enumerate() {
        let record = result.map_err(|e| ScrubError::io(format!("malformed CSV at data row {i}: {e}")))?;
        // Skip fully blank lines
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        rows.push(record.iter().map(Cell::from).collect());
    }

    log::debug!("csv: {} columns, {} rows", columns.len(), rows.len());
    Ok(Table::from_rows(columns, rows))
}

pub fn export(table: &Table) -> Result<Vec<u8>, ScrubError> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    writer
        .write_record(&table.columns)
        .map_err(|e| ScrubError::export(e.to_string()))?;

    for row in &table.rows {
        let record: Vec<String> = (0..table.columns.len())
            .map(|i| row.cell(i).to_string())
            .collect();
        writer
            .write_record(&record)
            .map_err(|e| ScrubError::export(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| ScrubError::export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    use scrubgrid_engine::table::{Record, RowId};

    #[test]
    fn test_sniff_semicolon_delimiter() {
        let content = "Company Name;Email;City\nAcme;a@a.com;Paris\nBeta;b@b.com;London\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_sniff_comma_delimiter() {
        let content = "Company Name,Email\nAcme,a@a.com\n";
        assert_eq!(sniff_delimiter(content), b',');
    }

    #[test]
    fn test_sniff_semicolon_with_commas_in_values() {
        let content = "Company Name;Email;City\n\"Doe, Jane Inc\";\"j@d.com\";Paris\nBob;\"b@b.com\";London\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_import_assigns_row_ids_and_pads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contacts.csv");
        fs::write(&path, "Company Name,Email,Title\nAcme,a@a.com,CEO\n\nBeta,b@b.com\n").unwrap();

        let table = import(&path).unwrap();
        assert_eq!(table.columns, vec!["Company Name", "Email", "Title"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].id, RowId(0));
        assert_eq!(table.rows[1].id, RowId(1));
        assert_eq!(table.rows[1].cell(0), &Cell::text("Beta"));
        assert_eq!(table.rows[1].cell(2), &Cell::Empty);
    }

    #[test]
    fn test_import_windows_1252() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin.csv");
        // "Société" with é as 0xE9
        let mut bytes = b"Company Name,Email\nSoci".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"t\xE9,s@s.fr\n");
        fs::write(&path, bytes).unwrap();

        let table = import(&path).unwrap();
        assert_eq!(table.rows[0].cell(0), &Cell::text("Société"));
    }

    #[test]
    fn test_import_strips_bom() {
        let table = import_bytes("\u{feff}Company Name,Email\nAcme,a@a.com\n".as_bytes().to_vec()).unwrap();
        assert_eq!(table.columns[0], "Company Name");
    }

    #[test]
    fn test_import_empty_file() {
        let table = import_bytes(Vec::new()).unwrap();
        assert!(table.columns.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn test_tsv_import() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contacts.tsv");
        fs::write(&path, "Company Name\tEmail\nAcme, Inc\ta@a.com\n").unwrap();
        let table = import_tsv(&path).unwrap();
        assert_eq!(table.rows[0].cell(0), &Cell::text("Acme, Inc"));
    }

    #[test]
    fn test_export_writes_header_and_rows_in_order() {
        let table = Table::new(
            vec!["Company Name".into(), "Email".into(), "Score".into()],
            vec![
                Record::new(RowId(4), vec![Cell::text("Beta, LLC"), Cell::text("b@b.com"), Cell::Int(3)]),
                Record::new(RowId(1), vec![Cell::text("Acme"), Cell::Empty, Cell::float(2.0)]),
            ],
        );
        let bytes = export(&table).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "Company Name,Email,Score\n\"Beta, LLC\",b@b.com,3\nAcme,,2.0\n"
        );
    }
}
