pub mod csv;
pub mod excel;

use crate::error::Result;
use sheet_lookup_common::ResultTable;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Excel,
    Json,
    All,
}

impl ExportFormat {
    fn extensions(&self) -> &'static [&'static str] {
        match self {
            ExportFormat::Csv => &["csv"],
            ExportFormat::Excel => &["xlsx"],
            ExportFormat::Json => &["json"],
            ExportFormat::All => &["csv", "xlsx", "json"],
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "json" => Ok(ExportFormat::Json),
            "all" => Ok(ExportFormat::All),
            _ => Err(format!("Unknown format: {}. Use csv, excel, json, or all", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Excel => write!(f, "excel"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::All => write!(f, "all"),
        }
    }
}

/// 出力先パスを決定
///
/// ディレクトリまたは拡張子なしのパスなら `{name}.{ext}` を付ける。
/// 複数形式の出力ではファイル名の拡張子を形式ごとに差し替える。
pub fn output_path_for_format(output: &Path, name: &str, extension: &str, multiple: bool) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", name, extension))
    } else if multiple {
        output.with_extension(extension)
    } else {
        output.to_path_buf()
    }
}

/// 検索結果をファイルに出力
///
/// # Returns
/// 書き出したファイルのパス
pub fn export_results(
    table: &ResultTable,
    format: &ExportFormat,
    output: &Path,
    name: &str,
) -> Result<Vec<PathBuf>> {
    let extensions = format.extensions();
    let multiple = extensions.len() > 1;
    let mut written = Vec::with_capacity(extensions.len());

    for extension in extensions {
        let path = output_path_for_format(output, name, extension, multiple);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        match *extension {
            "csv" => csv::write_csv(table, &path)?,
            "xlsx" => excel::generate_excel(table, &path, name)?,
            _ => write_json(table, &path)?,
        }

        tracing::debug!(path = %path.display(), rows = table.len(), "exported results");
        written.push(path);
    }

    Ok(written)
}

pub fn write_json(table: &ResultTable, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(table)?;
    std::fs::write(path, json)?;
    Ok(())
}
