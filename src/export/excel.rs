//! Excel生成（CLI版）

use crate::error::{LookupError, Result};
use sheet_lookup_common::export::excel_core::generate_excel_buffer;
use sheet_lookup_common::ResultTable;
use std::path::Path;

pub fn generate_excel(table: &ResultTable, output_path: &Path, sheet_name: &str) -> Result<()> {
    let buffer = generate_excel_buffer(table, sheet_name).map_err(LookupError::ExcelGeneration)?;
    std::fs::write(output_path, buffer)?;
    Ok(())
}
