//! CSV-backed workbook source.
//!
//! Each logical table lives in `<dir>/<Table_Name>.csv`. The primary decode
//! path is strict UTF-8 (BOM-aware); when a table fails structurally, one
//! retry runs the bytes through a detected-encoding decode before giving up.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use chardetng::EncodingDetector;
use csv::ReaderBuilder;
use log::{debug, warn};

use super::{TableData, WorkbookSource};
use crate::errors::{Result, SourceError};

/// Workbook stored as a directory of CSV tables.
pub struct CsvWorkbook {
    dir: PathBuf,
}

impl CsvWorkbook {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn table_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", name))
    }
}

impl WorkbookSource for CsvWorkbook {
    fn table(&self, name: &str) -> Result<TableData> {
        if !self.dir.is_dir() {
            return Err(SourceError::WorkbookNotFound(self.dir.display().to_string()).into());
        }

        let path = self.table_path(name);
        let bytes = fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SourceError::TableNotFound(name.to_string()),
            _ => SourceError::TableUnreadable {
                table: name.to_string(),
                message: e.to_string(),
            },
        })?;

        match decode_utf8_strict(&bytes).and_then(|text| parse_table(&text)) {
            Ok(table) => {
                debug!("Loaded table '{}' ({} rows)", name, table.row_count());
                Ok(table)
            }
            Err(primary_err) => {
                // Secondary engine: detect the encoding and parse once more.
                let (text, encoding) = decode_detected(&bytes);
                warn!(
                    "Primary parse of table '{}' failed ({}), retrying as {}",
                    name, primary_err, encoding
                );
                parse_table(&text).map_err(|retry_err| {
                    SourceError::TableUnreadable {
                        table: name.to_string(),
                        message: format!("{} ({} retry: {})", primary_err, encoding, retry_err),
                    }
                    .into()
                })
            }
        }
    }

    fn describe(&self) -> String {
        format!("CSV workbook at {}", self.dir.display())
    }
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes)
}

fn decode_utf8_strict(bytes: &[u8]) -> std::result::Result<String, String> {
    std::str::from_utf8(strip_bom(bytes))
        .map(|s| s.to_string())
        .map_err(|e| format!("invalid UTF-8 at byte {}", e.valid_up_to()))
}

fn decode_detected(bytes: &[u8]) -> (String, &'static str) {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    let (text, _, _) = encoding.decode(bytes);
    (text.into_owned(), encoding.name())
}

fn parse_table(content: &str) -> std::result::Result<TableData, String> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err("table has no header row".to_string());
    }

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| format!("row {}: {}", idx + 2, e))?;
        let row: Vec<String> = record.iter().map(|c| c.to_string()).collect();
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        rows.push(row);
    }

    Ok(TableData::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn workbook_with(name: &str, content: &[u8]) -> (tempfile::TempDir, CsvWorkbook) {
        let dir = tempfile::tempdir().unwrap();
        let mut file = fs::File::create(dir.path().join(format!("{}.csv", name))).unwrap();
        file.write_all(content).unwrap();
        let workbook = CsvWorkbook::new(dir.path().to_path_buf());
        (dir, workbook)
    }

    #[test]
    fn reads_a_simple_table() {
        let (_dir, wb) = workbook_with("Holdings", b"Symbol,Quantity\nINFY,10\nTCS,5\n");
        let table = wb.table("Holdings").unwrap();
        assert_eq!(table.headers(), ["Symbol", "Quantity"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn strips_utf8_bom_from_first_header() {
        let (_dir, wb) = workbook_with("Holdings", b"\xEF\xBB\xBFSymbol,Quantity\nINFY,10\n");
        let table = wb.table("Holdings").unwrap();
        assert_eq!(table.headers()[0], "Symbol");
    }

    #[test]
    fn missing_table_is_an_error() {
        let (_dir, wb) = workbook_with("Holdings", b"Symbol\nINFY\n");
        let err = wb.table("Summary").unwrap_err();
        assert!(matches!(
            err,
            crate::errors::Error::Source(SourceError::TableNotFound(_))
        ));
    }

    #[test]
    fn missing_workbook_dir_is_an_error() {
        let wb = CsvWorkbook::new("/nonexistent/workbook-dir");
        let err = wb.table("Holdings").unwrap_err();
        assert!(matches!(
            err,
            crate::errors::Error::Source(SourceError::WorkbookNotFound(_))
        ));
    }

    #[test]
    fn non_utf8_table_parses_via_detected_encoding() {
        // "Müller" in Latin-1; invalid as UTF-8.
        let (_dir, wb) =
            workbook_with("Holdings", b"Symbol,Name\nMUE,M\xFCller\n");
        let table = wb.table("Holdings").unwrap();
        let record = table.records().next().unwrap();
        assert_eq!(record.get("Symbol"), Some("MUE"));
        assert!(record.get("Name").unwrap().contains("ller"));
    }

    #[test]
    fn empty_file_is_unreadable() {
        let (_dir, wb) = workbook_with("Holdings", b"");
        let err = wb.table("Holdings").unwrap_err();
        assert!(matches!(
            err,
            crate::errors::Error::Source(SourceError::TableUnreadable { .. })
        ));
    }

    #[test]
    fn header_only_table_is_empty_not_an_error() {
        let (_dir, wb) = workbook_with("Summary", b"Metric,Value\n");
        let table = wb.table("Summary").unwrap();
        assert!(table.is_empty());
    }
}
