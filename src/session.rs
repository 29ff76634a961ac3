//! 検索セッション
//!
//! 読み込んだブックを不変のスナップショットとして保持し、
//! シート選択・照合を繰り返し実行できるようにする。

use crate::error::{LookupError, Result};
use crate::workbook::{self, LoadOptions, LoadedWorkbook, SheetFailure};
use sheet_lookup_common::{Matcher, ResultTable, SheetData, Table};
use std::path::{Path, PathBuf};

pub struct SearchSession {
    path: PathBuf,
    workbook: LoadedWorkbook,
    sheet_column: String,
    selected: Vec<String>,
    table: Table,
}

impl SearchSession {
    /// ブックを読み込んでセッションを開始（全シート選択状態）
    pub fn open(path: &Path, options: &LoadOptions, sheet_column: &str) -> Result<Self> {
        let workbook = workbook::load_workbook(path, options)?;
        Self::from_workbook(path, workbook, sheet_column)
    }

    /// 読み込み済みのブックからセッションを作成
    pub fn from_workbook(path: &Path, workbook: LoadedWorkbook, sheet_column: &str) -> Result<Self> {
        if workbook.sheets.is_empty() {
            return Err(LookupError::NoSheetsLoaded(path.display().to_string()));
        }

        let selected: Vec<String> = workbook.sheets.iter().map(|s| s.name.clone()).collect();
        let table = Table::from_sheets(&workbook.sheets, sheet_column)?;

        Ok(Self {
            path: path.to_path_buf(),
            workbook,
            sheet_column: sheet_column.to_string(),
            selected,
            table,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 読み込めたシート
    pub fn sheets(&self) -> &[SheetData] {
        &self.workbook.sheets
    }

    /// 読み込めなかったシート
    pub fn failures(&self) -> &[SheetFailure] {
        &self.workbook.failures
    }

    pub fn selected_sheets(&self) -> &[String] {
        &self.selected
    }

    /// 検索対象のシートを選び直す（ブック内の順序を維持）
    pub fn select_sheets(&mut self, names: &[String]) -> Result<()> {
        if names.is_empty() {
            return Err(LookupError::NoSheetsSelected);
        }
        if let Some(unknown) = names
            .iter()
            .find(|n| !self.workbook.sheets.iter().any(|s| &s.name == *n))
        {
            return Err(LookupError::SheetNotFound(unknown.clone()));
        }

        let chosen: Vec<SheetData> = self
            .workbook
            .sheets
            .iter()
            .filter(|s| names.contains(&s.name))
            .cloned()
            .collect();

        self.table = Table::from_sheets(&chosen, &self.sheet_column)?;
        self.selected = chosen.into_iter().map(|s| s.name).collect();
        tracing::debug!(sheets = ?self.selected, rows = self.table.len(), "selected sheets");
        Ok(())
    }

    /// 選択中のシートを連結した表
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// 照合を実行
    pub fn search(&self, column: &str, queries: &[String], matcher: &Matcher) -> Result<ResultTable> {
        let normalizer = matcher.normalizer();
        tracing::debug!(
            column,
            strategy = %normalizer.strategy(),
            suffix_len = normalizer.suffix_len(),
            queries = queries.len(),
            rows = self.table.len(),
            "searching"
        );

        let result = matcher.search(&self.table, column, queries)?;
        tracing::info!(matched = result.matched_count(), total = result.len(), "search finished");
        Ok(result)
    }
}
