//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Column not found: {column} (available: {})", available.join(", "))]
    ColumnNotFound { column: String, available: Vec<String> },

    #[error("Query list is empty")]
    EmptyQueryList,

    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("Row {row} has {actual} cells, expected {expected}")]
    RowWidth { row: usize, expected: usize, actual: usize },

    #[error("Unknown strategy: {0}. Use auto, phone_suffix, phone_full, email, or verbatim_ci")]
    UnknownStrategy(String),

    #[error("Invalid suffix length: {0}")]
    InvalidSuffixLength(usize),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
