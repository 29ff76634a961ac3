use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("ブックを読み込めません: {path}: {reason}")]
    Workbook { path: String, reason: String },

    #[error("読み込めたシートがありません: {0}")]
    NoSheetsLoaded(String),

    #[error("シートが見つかりません: {0}")]
    SheetNotFound(String),

    #[error("シートが選択されていません")]
    NoSheetsSelected,

    #[error("スキップ行数が不正です: {0}（0〜{max}）", max = crate::workbook::MAX_SKIP_ROWS)]
    InvalidSkipRows(usize),

    #[error("CSVエラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("入力エラー: {0}")]
    Interactive(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] sheet_lookup_common::Error),
}

pub type Result<T> = std::result::Result<T, LookupError>;
