pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod selector;
pub mod session;
pub mod workbook;

pub use sheet_lookup_common as common;
