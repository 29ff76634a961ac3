//! 対話式選択モジュール
//!
//! シート・検索対象列・検索値を端末から選択/入力する。

use crate::error::{LookupError, Result};
use dialoguer::{Input, MultiSelect, Select};
use sheet_lookup_common::{SheetData, Strategy};

/// シート選択肢の表示名（行数付き）
pub fn sheet_labels(sheets: &[SheetData]) -> Vec<String> {
    sheets
        .iter()
        .map(|s| format!("{} ({}行)", s.name, s.row_count()))
        .collect()
}

/// 列選択の初期位置
///
/// 指定された列があればその列、なければ電話番号・メールらしい列を優先
pub fn default_column_index(columns: &[String], sheet_column: &str, preferred: Option<&str>) -> usize {
    if let Some(index) = preferred.and_then(|p| columns.iter().position(|c| c == p)) {
        return index;
    }

    columns
        .iter()
        .position(|c| c != sheet_column && Strategy::infer_from_column(c).is_some())
        .unwrap_or(0)
}

/// 対話式でシートを選択（初期状態は全選択）
pub fn select_sheets_interactive(sheets: &[SheetData]) -> Result<Vec<String>> {
    let labels = sheet_labels(sheets);
    let defaults = vec![true; labels.len()];

    let chosen = MultiSelect::new()
        .with_prompt("使用するシートを選択 (Space:切替 Enter:決定)")
        .items(&labels)
        .defaults(&defaults)
        .interact()
        .map_err(|e| LookupError::Interactive(e.to_string()))?;

    if chosen.is_empty() {
        return Err(LookupError::NoSheetsSelected);
    }

    Ok(chosen.into_iter().map(|i| sheets[i].name.clone()).collect())
}

/// 対話式で検索対象列を選択
pub fn select_column_interactive(
    columns: &[String],
    sheet_column: &str,
    preferred: Option<&str>,
) -> Result<String> {
    if let Some(column) = preferred.filter(|p| !columns.iter().any(|c| c == p)) {
        println!("⚠ 列が見つかりません: {}", column);
    }

    let index = Select::new()
        .with_prompt("検索対象の列を選択 (電話番号 / メール / 顧客コード...)")
        .items(columns)
        .default(default_column_index(columns, sheet_column, preferred))
        .interact()
        .map_err(|e| LookupError::Interactive(e.to_string()))?;

    Ok(columns[index].clone())
}

/// 対話式で検索値を入力（空行で終了）
pub fn input_queries_interactive() -> Result<Vec<String>> {
    println!("検索値を1行に1つずつ入力してください（空行で終了）");

    let mut queries = Vec::new();
    loop {
        let line: String = Input::new()
            .with_prompt(format!("[{}]", queries.len() + 1))
            .allow_empty(true)
            .interact_text()
            .map_err(|e| LookupError::Interactive(e.to_string()))?;

        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }
        queries.push(trimmed.to_string());
    }

    Ok(queries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_labels() {
        let sheets = vec![
            SheetData::new("Hà Nội", vec!["A".into()], vec![vec![None], vec![None]]),
            SheetData::new("Empty", vec![], vec![]),
        ];
        assert_eq!(sheet_labels(&sheets), vec!["Hà Nội (2行)", "Empty (0行)"]);
    }

    #[test]
    fn test_default_column_index() {
        let columns: Vec<String> = ["Tên", "Mã KH", "SĐT", "Email", "Sheet"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(default_column_index(&columns, "Sheet", None), 2);

        let plain: Vec<String> = vec!["Code".into(), "Sheet".into()];
        assert_eq!(default_column_index(&plain, "Sheet", None), 0);
    }

    #[test]
    fn test_default_column_index_prefers_given_column() {
        let columns: Vec<String> = ["Tên", "Mã KH", "SĐT", "Email"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(default_column_index(&columns, "Sheet", Some("Mã KH")), 1);
        // 存在しない列は無視して推定に戻る
        assert_eq!(default_column_index(&columns, "Sheet", Some("Mobile")), 2);
    }
}
