//! CSV/TSVの読み込み（ファイル名をシート名とする1シート扱い）

use super::{build_sheet, cell::text_to_value, LoadOptions, LoadedWorkbook, SheetFailure};
use crate::error::{LookupError, Result};
use sheet_lookup_common::Cell;
use std::path::Path;

pub fn load_delimited(path: &Path, options: &LoadOptions) -> Result<LoadedWorkbook> {
    let delimiter = detect_delimiter(path);
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Sheet1".to_string());

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| LookupError::Workbook {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for record in reader.records() {
        match record {
            Ok(record) => rows.push(record.iter().map(text_to_value).collect()),
            Err(e) => {
                tracing::warn!(sheet = %name, error = %e, "skipping unreadable file");
                return Ok(LoadedWorkbook {
                    sheets: Vec::new(),
                    failures: vec![SheetFailure {
                        sheet: name,
                        reason: e.to_string(),
                    }],
                });
            }
        }
    }

    let sheet = build_sheet(&name, rows.into_iter(), options.skip_rows, 0);
    tracing::debug!(sheet = %name, rows = sheet.row_count(), "loaded delimited file");

    Ok(LoadedWorkbook {
        sheets: vec![sheet],
        failures: Vec::new(),
    })
}

/// 区切り文字を判定（.tsv はタブ、それ以外はカンマ）
fn detect_delimiter(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter(Path::new("a.tsv")), b'\t');
        assert_eq!(detect_delimiter(Path::new("a.TSV")), b'\t');
        assert_eq!(detect_delimiter(Path::new("a.csv")), b',');
    }

    #[test]
    fn test_load_csv() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("customers.csv");
        std::fs::write(&path, "Name,Phone\nAn,0987654321\n,\nBinh,\"+84 912,345,678\"\n").unwrap();

        let loaded = load_delimited(&path, &LoadOptions::default()).unwrap();
        assert!(loaded.failures.is_empty());
        assert_eq!(loaded.sheets.len(), 1);

        let sheet = &loaded.sheets[0];
        assert_eq!(sheet.name, "customers");
        assert_eq!(sheet.columns, vec!["Name", "Phone"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[1][1].as_deref(), Some("+84 912,345,678"));
    }

    #[test]
    fn test_load_tsv_with_skip_rows() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("export.tsv");
        std::fs::write(&path, "exported 2024\nCode\tName\nKH1\tAn\n").unwrap();

        let options = LoadOptions { skip_rows: 1, ..Default::default() };
        let loaded = load_delimited(&path, &options).unwrap();
        let sheet = &loaded.sheets[0];
        assert_eq!(sheet.columns, vec!["Code", "Name"]);
        assert_eq!(sheet.rows[0][0].as_deref(), Some("KH1"));
    }
}
