//! ブック読み込みから照合までの統合テスト

mod fixtures;

use fixtures::customer_workbook;
use sheet_lookup::error::LookupError;
use sheet_lookup::session::SearchSession;
use sheet_lookup::workbook::LoadOptions;
use sheet_lookup_common::{Matcher, Normalizer, Strategy};
use tempfile::tempdir;

fn queries(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn open_session(dir: &std::path::Path) -> SearchSession {
    let path = customer_workbook(dir);
    SearchSession::open(&path, &LoadOptions::default(), "Sheet").expect("セッション作成失敗")
}

#[test]
fn test_search_phone_suffix_across_sheets() {
    let dir = tempdir().expect("Failed to create temp dir");
    let session = open_session(dir.path());
    let matcher = Matcher::new(Normalizer::new(Strategy::PhoneSuffix));

    let input = queries(&["0987654321", "0000", "+84912345678", "0987654321"]);
    let result = session.search("Phone", &input, &matcher).expect("検索失敗");

    assert_eq!(
        result.headers(),
        vec!["Query", "Normalized key", "Name", "Phone", "Email", "Sheet", "Note"]
    );
    assert_eq!(result.len(), 4);
    assert_eq!(result.matched_count(), 3);

    let records: Vec<Vec<&str>> = result.records().collect();
    // 後のシート（2024）が優先される
    assert_eq!(
        records[0],
        vec!["0987654321", "87654321", "An (moved)", "+84 987 654 321", "", "2024", "HCMC"]
    );
    assert_eq!(records[1], vec!["0000", "", "", "", "", "", ""]);
    assert_eq!(
        records[2],
        vec!["+84912345678", "12345678", "Binh", "0912 345 678", "BINH@EXAMPLE.VN", "2023", ""]
    );
    assert_eq!(records[3], records[0]);
}

#[test]
fn test_search_email_ignores_case_and_spaces() {
    let dir = tempdir().expect("Failed to create temp dir");
    let session = open_session(dir.path());
    let matcher = Matcher::new(Normalizer::new(Strategy::Email));

    let result = session
        .search("Email", &queries(&["binh@example.vn", " Binh@Example.VN "]), &matcher)
        .expect("検索失敗");

    assert_eq!(result.matched_count(), 2);
    assert_eq!(result.rows()[0].values, result.rows()[1].values);
}

#[test]
fn test_search_selected_sheet_only() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = open_session(dir.path());
    session.select_sheets(&queries(&["2023"])).expect("シート選択失敗");

    let matcher = Matcher::new(Normalizer::new(Strategy::PhoneFull));
    let result = session
        .search("Phone", &queries(&["987654321"]), &matcher)
        .expect("検索失敗");

    let records: Vec<Vec<&str>> = result.records().collect();
    assert_eq!(records[0][2], "An");
    assert_eq!(records[0][5], "2023");
    // 2024シートを除外したので Note 列は無い
    assert!(!result.headers().contains(&"Note"));
}

#[test]
fn test_search_unknown_column() {
    let dir = tempdir().expect("Failed to create temp dir");
    let session = open_session(dir.path());
    let matcher = Matcher::default();

    let err = session
        .search("Mobile", &queries(&["0987654321"]), &matcher)
        .unwrap_err();
    assert!(matches!(
        err,
        LookupError::Common(sheet_lookup_common::Error::ColumnNotFound { .. })
    ));
}

#[test]
fn test_search_empty_queries() {
    let dir = tempdir().expect("Failed to create temp dir");
    let session = open_session(dir.path());

    let err = session.search("Phone", &[], &Matcher::default()).unwrap_err();
    assert!(matches!(
        err,
        LookupError::Common(sheet_lookup_common::Error::EmptyQueryList)
    ));
}
