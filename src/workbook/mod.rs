//! ブック読み込みモジュール
//!
//! Excel（xlsx/xlsm/xlsb/xls/ods）とCSV/TSVを読み込み、シートごとの表データに変換する。
//! 読み込めないシートは記録してスキップし、他のシートは利用可能なままにする。

mod cell;
mod delimited;

pub use cell::{cell_to_value, format_float};

use crate::error::{LookupError, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use indicatif::{ProgressBar, ProgressStyle};
use sheet_lookup_common::{Cell, SheetData};
use std::path::Path;

/// ヘッダー前に読み飛ばせる最大行数
pub const MAX_SKIP_ROWS: usize = 20;

const DELIMITED_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];

/// 読み込みオプション
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// ヘッダー行の前に読み飛ばす行数（シート先頭から数える）
    pub skip_rows: usize,
    /// 進捗バーを表示する
    pub show_progress: bool,
}

/// 読み込みに失敗したシート
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetFailure {
    pub sheet: String,
    pub reason: String,
}

/// 読み込み結果
#[derive(Debug, Clone, Default)]
pub struct LoadedWorkbook {
    /// 読み込めたシート（ブック内の順序）
    pub sheets: Vec<SheetData>,
    /// 読み込めなかったシート
    pub failures: Vec<SheetFailure>,
}

impl LoadedWorkbook {
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// 全シートの合計行数
    pub fn total_rows(&self) -> usize {
        self.sheets.iter().map(SheetData::row_count).sum()
    }
}

/// ブックを読み込む
///
/// # Arguments
/// * `path` - ブックのパス（拡張子で形式を判定）
/// * `options` - 読み込みオプション
///
/// # Returns
/// * `Ok(LoadedWorkbook)` - 個別シートの失敗は `failures` に記録
/// * `Err` - ファイル自体が開けない場合
pub fn load_workbook(path: &Path, options: &LoadOptions) -> Result<LoadedWorkbook> {
    if !path.exists() {
        return Err(LookupError::FileNotFound(path.display().to_string()));
    }
    if options.skip_rows > MAX_SKIP_ROWS {
        return Err(LookupError::InvalidSkipRows(options.skip_rows));
    }

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if DELIMITED_EXTENSIONS.contains(&extension.as_str()) {
        return delimited::load_delimited(path, options);
    }

    let mut workbook = open_workbook_auto(path).map_err(|e| LookupError::Workbook {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let sheet_names = workbook.sheet_names();
    tracing::debug!(path = %path.display(), sheets = sheet_names.len(), "opened workbook");

    let progress = sheet_progress(sheet_names.len() as u64, options.show_progress);
    let mut loaded = LoadedWorkbook::default();

    for name in sheet_names {
        progress.set_message(name.clone());

        match workbook.worksheet_range(&name) {
            Ok(range) => {
                let sheet = sheet_from_range(&name, &range, options.skip_rows);
                tracing::debug!(sheet = %name, rows = sheet.row_count(), "loaded sheet");
                loaded.sheets.push(sheet);
            }
            Err(e) => {
                tracing::warn!(sheet = %name, error = %e, "skipping unreadable sheet");
                loaded.failures.push(SheetFailure {
                    sheet: name,
                    reason: e.to_string(),
                });
            }
        }

        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok(loaded)
}

fn sheet_progress(len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let style = ProgressStyle::with_template("  [{bar:30}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    ProgressBar::new(len).with_style(style)
}

/// calamineのセル範囲をシートに変換
fn sheet_from_range(name: &str, range: &Range<Data>, skip_rows: usize) -> SheetData {
    // 範囲は最初の非空セルから始まるため、シート先頭からの位置に換算する
    let (first_row, first_col) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_value).collect::<Vec<Cell>>());

    build_sheet(name, rows, skip_rows.saturating_sub(first_row), first_col)
}

/// 行の並びからシートを組み立てる
///
/// 1. `skip_rows` 行を読み飛ばす
/// 2. 空行を除いた最初の行をヘッダーにする
/// 3. 残りの空でない行をデータ行にする
///
/// `first_col` は列名が空のときの `Unnamed: N` の番号に使う
pub(crate) fn build_sheet(
    name: &str,
    rows: impl Iterator<Item = Vec<Cell>>,
    skip_rows: usize,
    first_col: usize,
) -> SheetData {
    let mut rows = rows.skip(skip_rows).filter(|row| row.iter().any(Option::is_some));

    let Some(header) = rows.next() else {
        return SheetData::new(name, Vec::new(), Vec::new());
    };
    let mut data: Vec<Vec<Cell>> = rows.collect();

    let width = data
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0);

    let columns = header_names(&header, width, first_col);
    for row in &mut data {
        row.resize(width, None);
    }

    SheetData::new(name, columns, data)
}

/// ヘッダー行から一意な列名を生成
///
/// - 空（空白のみを含む）の列名 → `Unnamed: N`
/// - それ以外の列名は前後の空白も含めてそのまま使う
/// - 重複した列名 → `名前.1`, `名前.2`, ...
pub(crate) fn header_names(header: &[Cell], width: usize, first_col: usize) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(width);

    for i in 0..width {
        let base = header
            .get(i)
            .and_then(|c| c.as_deref())
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Unnamed: {}", first_col + i));

        let mut candidate = base.clone();
        let mut suffix = 1;
        while names.contains(&candidate) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        names.push(candidate);
    }

    names
}
