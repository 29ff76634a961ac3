//! CSV出力

use crate::error::Result;
use sheet_lookup_common::ResultTable;
use std::io::Write;
use std::path::Path;

pub fn write_csv(table: &ResultTable, output_path: &Path) -> Result<()> {
    let file = std::fs::File::create(output_path)?;
    write_csv_to(table, file)
}

/// ヘッダー行＋検索値ごとに1行（不一致の行は空セル）
pub fn write_csv_to<W: Write>(table: &ResultTable, writer: W) -> Result<()> {
    let mut writer = ::csv::Writer::from_writer(writer);
    writer.write_record(table.headers())?;
    for record in table.records() {
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
