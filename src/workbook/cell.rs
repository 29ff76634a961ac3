//! セル値の文字列変換

use calamine::Data;
use sheet_lookup_common::Cell;

/// 整数として表示する浮動小数の上限（これ以上は精度が保証されない）
const MAX_EXACT_FLOAT: f64 = 1e15;

/// calamineのセルを表のセル値に変換
///
/// 空セル・エラーセル（#N/Aなど）は欠損値として扱う
pub fn cell_to_value(cell: &Data) -> Cell {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => text_to_value(s),
        Data::Float(f) => Some(format_float(*f)),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        other => text_to_value(&other.to_string()),
    }
}

/// 空文字列は欠損値
pub fn text_to_value(text: &str) -> Cell {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// 数値で保存された電話番号などを桁落ちなしで文字列化
///
/// 整数値は小数点なしで出力する（`987654321.0` → `987654321`）
pub fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < MAX_EXACT_FLOAT {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
