//! CSV/Excel/JSON出力の統合テスト

mod fixtures;

use fixtures::customer_workbook;
use sheet_lookup::export::{export_results, ExportFormat};
use sheet_lookup::session::SearchSession;
use sheet_lookup::workbook::{load_workbook, LoadOptions};
use sheet_lookup_common::{Matcher, Normalizer, ResultTable, Strategy};
use tempfile::tempdir;

fn search_result(dir: &std::path::Path) -> ResultTable {
    let path = customer_workbook(dir);
    let session = SearchSession::open(&path, &LoadOptions::default(), "Sheet").expect("セッション作成失敗");
    let matcher = Matcher::new(Normalizer::new(Strategy::PhoneSuffix));
    let queries = vec!["0987654321".to_string(), "nothing".to_string()];
    session.search("Phone", &queries, &matcher).expect("検索失敗")
}

#[test]
fn test_csv_export() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = search_result(dir.path());
    let out_dir = dir.path().join("out");

    let written = export_results(&result, &ExportFormat::Csv, &out_dir, "lookup-results").expect("CSV出力失敗");
    assert_eq!(written, vec![out_dir.join("lookup-results.csv")]);

    let content = std::fs::read_to_string(&written[0]).expect("CSV読み込み失敗");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Query,Normalized key,Name,Phone,Email,Sheet,Note");
    assert_eq!(lines[1], "0987654321,87654321,An (moved),+84 987 654 321,,2024,HCMC");
    assert_eq!(lines[2], "nothing,,,,,,");
}

#[test]
fn test_excel_export_can_be_read_back() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = search_result(dir.path());
    let output = dir.path().join("result.xlsx");

    let written = export_results(&result, &ExportFormat::Excel, &output, "lookup-results").expect("Excel出力失敗");
    assert_eq!(written, vec![output.clone()]);

    // 出力したExcelをもう一度読み込めること
    let loaded = load_workbook(&output, &LoadOptions::default()).expect("再読み込み失敗");
    let sheet = &loaded.sheets[0];
    assert_eq!(sheet.name, "lookup-results");
    assert_eq!(sheet.columns[0], "Query");
    assert_eq!(sheet.rows.len(), 2);
    assert_eq!(sheet.rows[0][2].as_deref(), Some("An (moved)"));
}

#[test]
fn test_json_export_keeps_column_order() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = search_result(dir.path());

    let written = export_results(&result, &ExportFormat::Json, dir.path(), "lookup-results").expect("JSON出力失敗");
    let content = std::fs::read_to_string(&written[0]).expect("JSON読み込み失敗");

    let query_pos = content.find("\"Query\"").unwrap();
    let name_pos = content.find("\"Name\"").unwrap();
    let note_pos = content.find("\"Note\"").unwrap();
    assert!(query_pos < name_pos && name_pos < note_pos);

    let value: serde_json::Value = serde_json::from_str(&content).expect("JSONパース失敗");
    assert_eq!(value[0]["Sheet"], "2024");
    assert!(value[1]["Name"].is_null());
}

#[test]
fn test_export_all_formats() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = search_result(dir.path());
    let output = dir.path().join("report.csv");

    let written = export_results(&result, &ExportFormat::All, &output, "lookup-results").expect("出力失敗");
    assert_eq!(
        written,
        vec![
            dir.path().join("report.csv"),
            dir.path().join("report.xlsx"),
            dir.path().join("report.json"),
        ]
    );
    for path in &written {
        assert!(path.exists(), "ファイルが作成されていない: {}", path.display());
    }
}
