//! Sheet Lookup Common Library
//!
//! 識別子の正規化と照合エンジン（CLIから利用される純粋な処理のみ）

pub mod error;
pub mod table;
pub mod normalizer;
pub mod matcher;
pub mod export;

pub use error::{Error, Result};
pub use table::{Cell, SheetData, Table};
pub use normalizer::{normalize, NormalizedKey, Normalizer, Strategy, StrategyChoice, DEFAULT_SUFFIX_LEN};
pub use matcher::{parse_queries, search, MatchIndex, Matcher, ResultLabels, ResultRow, ResultTable};
