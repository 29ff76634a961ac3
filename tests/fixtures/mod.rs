#![allow(dead_code)]

//! テスト用ブックの生成

use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

/// セル値（文字列 or 数値）
pub enum Value {
    Text(&'static str),
    Number(f64),
    Blank,
}

pub use Value::{Blank, Number, Text};

/// シート定義（先頭行がヘッダー）
pub struct SheetSpec {
    pub name: &'static str,
    pub rows: Vec<Vec<Value>>,
}

pub fn write_workbook(path: &Path, sheets: &[SheetSpec]) {
    let mut workbook = Workbook::new();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name).expect("シート名設定失敗");

        for (r, row) in sheet.rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                match value {
                    Text(s) => {
                        worksheet.write_string(r as u32, c as u16, *s).expect("書き込み失敗");
                    }
                    Number(n) => {
                        worksheet.write_number(r as u32, c as u16, *n).expect("書き込み失敗");
                    }
                    Blank => {}
                }
            }
        }
    }

    workbook.save(path).expect("ブック保存失敗");
}

/// 2シート構成の顧客ブック
///
/// - 2023: 電話番号を数値で保存した行を含む
/// - 2024: 同じ番号を国番号付きで保存（後のシートが優先される）
pub fn customer_workbook(dir: &Path) -> PathBuf {
    let path = dir.join("customers.xlsx");
    write_workbook(
        &path,
        &[
            SheetSpec {
                name: "2023",
                rows: vec![
                    vec![Text("Name"), Text("Phone"), Text("Email")],
                    vec![Text("An"), Number(987654321.0), Text("an@example.vn")],
                    vec![Text("Binh"), Text("0912 345 678"), Text("BINH@EXAMPLE.VN")],
                    vec![Text("Chi"), Blank, Text("chi@example.vn")],
                ],
            },
            SheetSpec {
                name: "2024",
                rows: vec![
                    vec![Text("Name"), Text("Phone"), Text("Note")],
                    vec![Text("An (moved)"), Text("+84 987 654 321"), Text("HCMC")],
                ],
            },
        ],
    );
    path
}
