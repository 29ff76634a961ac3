//! 表データモジュール
//!
//! 複数シートを連結した検索対象の表を管理する。
//! 列集合は構築時に確定し、以降は変更しない。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// セル値（`None`は欠損値）
pub type Cell = Option<String>;

/// 読み込んだ1シート分のデータ
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetData {
    /// シート名
    pub name: String,
    /// ヘッダー行の列名
    pub columns: Vec<String>,
    /// データ行（列数に満たない行は欠損として扱う）
    pub rows: Vec<Vec<Cell>>,
}

impl SheetData {
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// データ行数
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// 検索対象の表（行順序付き、全行で列集合を共有）
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    column_index: HashMap<String, usize>,
    rows: Vec<Vec<Cell>>,
    sheet_column: Option<usize>,
}

impl Table {
    /// 列名と行から表を構築
    ///
    /// 列名の重複と行の列数不一致はエラー
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        let column_index = build_column_index(&columns)?;

        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(Error::RowWidth {
                    row: i,
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
        }

        Ok(Self {
            columns,
            column_index,
            rows,
            sheet_column: None,
        })
    }

    /// 複数シートを連結して表を構築
    ///
    /// 各シートの行には `sheet_column` 列としてシート名が付与される。
    /// 列集合は各シートの列の和集合（初出順）で、シートに無い列は欠損値になる。
    ///
    /// # Arguments
    /// * `sheets` - 連結するシート（この順序が行順序になる）
    /// * `sheet_column` - シート名を記録する列名
    pub fn from_sheets(sheets: &[SheetData], sheet_column: &str) -> Result<Self> {
        let mut columns: Vec<String> = Vec::new();
        let mut column_index: HashMap<String, usize> = HashMap::new();

        for sheet in sheets {
            // シート内の重複列は読み込み側で解消されている前提
            build_column_index(&sheet.columns)?;

            let names = sheet
                .columns
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(sheet_column));
            for name in names {
                if !column_index.contains_key(name) {
                    column_index.insert(name.to_string(), columns.len());
                    columns.push(name.to_string());
                }
            }
        }

        if columns.is_empty() {
            columns.push(sheet_column.to_string());
            column_index.insert(sheet_column.to_string(), 0);
        }
        let sheet_idx = column_index[sheet_column];

        let total_rows = sheets.iter().map(SheetData::row_count).sum();
        let mut rows = Vec::with_capacity(total_rows);

        for sheet in sheets {
            // シート内の列位置 -> 表の列位置
            let positions: Vec<usize> = sheet
                .columns
                .iter()
                .map(|name| column_index[name.as_str()])
                .collect();

            for source in &sheet.rows {
                let mut row: Vec<Cell> = vec![None; columns.len()];
                for (value, &pos) in source.iter().zip(positions.iter()) {
                    row[pos] = value.clone();
                }
                row[sheet_idx] = Some(sheet.name.clone());
                rows.push(row);
            }
        }

        Ok(Self {
            columns,
            column_index,
            rows,
            sheet_column: Some(sheet_idx),
        })
    }

    /// 列名一覧（表の列順）
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// 列名から列位置を取得
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_index.get(name).copied()
    }

    /// 列名から列位置を取得（存在しなければ `ColumnNotFound`）
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| Error::ColumnNotFound {
            column: name.to_string(),
            available: self.columns.clone(),
        })
    }

    /// 全行を取得
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// セル値を取得（欠損値は `None`）
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(|c| c.as_deref())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 行に含まれるシート名一覧（出現順、重複除去）
    pub fn sheet_names(&self) -> Vec<&str> {
        let Some(idx) = self.sheet_column else {
            return Vec::new();
        };

        let mut names: Vec<&str> = Vec::new();
        for row in &self.rows {
            if let Some(name) = row[idx].as_deref() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }
}

fn build_column_index(columns: &[String]) -> Result<HashMap<String, usize>> {
    let mut index = HashMap::with_capacity(columns.len());
    for (i, name) in columns.iter().enumerate() {
        if index.insert(name.clone(), i).is_some() {
            return Err(Error::DuplicateColumn(name.clone()));
        }
    }
    Ok(index)
}
