//! Excel生成（共通ライブラリ）
//!
//! 検索結果の表を1シートのExcelに変換する

use crate::matcher::ResultTable;
use rust_xlsxwriter::*;

/// Excelのシート名の最大長
const MAX_SHEET_NAME_LEN: usize = 31;
/// 列幅の上限（文字数換算）
const MAX_COLUMN_WIDTH: usize = 60;

/// Excelをバッファに生成
///
/// # Arguments
/// * `table` - 検索結果
/// * `sheet_name` - シート名（使用できない文字は `_` に置換）
pub fn generate_excel_buffer(table: &ResultTable, sheet_name: &str) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    // 一致しなかった行は薄いグレーで表示
    let missing_format = Format::new().set_font_color(Color::RGB(0x999999));

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sanitize_sheet_name(sheet_name))
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    let headers = table.headers();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
    }

    for (i, (record, row)) in table.records().zip(table.rows()).enumerate() {
        let excel_row = (i + 1) as u32;
        for (col, value) in record.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            widths[col] = widths[col].max(value.chars().count());

            let written = if row.is_match() {
                worksheet.write_string(excel_row, col as u16, *value)
            } else {
                worksheet.write_string_with_format(excel_row, col as u16, *value, &missing_format)
            };
            written.map_err(|e| format!("値書き込みエラー: {}", e))?;
        }
    }

    for (col, width) in widths.iter().enumerate() {
        let width = (*width).clamp(8, MAX_COLUMN_WIDTH) as f64 + 2.0;
        worksheet
            .set_column_width(col as u16, width)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
    }

    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;

    if !table.is_empty() {
        worksheet
            .autofilter(0, 0, table.len() as u32, (headers.len() - 1) as u16)
            .map_err(|e| format!("フィルタ設定エラー: {}", e))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}

/// Excelで使えるシート名に変換
fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            _ => c,
        })
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    let cleaned = cleaned.trim_matches('\'').to_string();

    if cleaned.trim().is_empty() {
        "Results".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::Strategy;
    use crate::table::Table;

    #[test]
    fn test_sanitize_sheet_name() {
        assert_eq!(sanitize_sheet_name("kết quả"), "kết quả");
        assert_eq!(sanitize_sheet_name("a/b:c"), "a_b_c");
        assert_eq!(sanitize_sheet_name("''"), "Results");
        assert_eq!(sanitize_sheet_name(&"x".repeat(40)).len(), MAX_SHEET_NAME_LEN);
    }

    #[test]
    fn test_generate_excel_buffer() {
        let table = Table::new(
            vec!["Phone".into()],
            vec![vec![Some("0987654321".into())]],
        )
        .unwrap();
        let result = crate::matcher::search(
            &table,
            "Phone",
            &["0987654321".to_string(), "none".to_string()],
            Strategy::PhoneSuffix,
        )
        .unwrap();

        let buffer = generate_excel_buffer(&result, "Results").unwrap();
        // xlsxはZIP形式
        assert!(buffer.starts_with(b"PK"));
    }
}
