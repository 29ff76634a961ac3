use crate::export::ExportFormat;
use clap::{Parser, Subcommand};
use sheet_lookup_common::StrategyChoice;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sheet-lookup", version)]
#[command(about = "複数シートのExcelから電話番号・メール・顧客コードを一括検索", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ブックのシート一覧を表示
    Sheets {
        /// ブック（xlsx/xls/ods/csv）
        #[arg(required = true)]
        workbook: PathBuf,

        /// ヘッダー前に読み飛ばす行数（0〜20）
        #[arg(long, value_parser = parse_skip_rows)]
        skip_rows: Option<usize>,
    },

    /// 検索値リストをブックから一括検索
    Search {
        /// ブック（xlsx/xls/ods/csv）
        #[arg(required = true)]
        workbook: PathBuf,

        /// 検索対象の列名（省略時は対話選択）
        #[arg(short, long)]
        column: Option<String>,

        /// 検索値（複数指定可）
        #[arg(short, long = "query")]
        queries: Vec<String>,

        /// 検索値ファイル（1行1件、`-` で標準入力）
        #[arg(short = 'f', long)]
        queries_file: Option<PathBuf>,

        /// 使用するシート（複数指定可、省略時は全シート）
        #[arg(short, long = "sheet")]
        sheets: Vec<String>,

        /// ヘッダー前に読み飛ばす行数（0〜20）
        #[arg(long, value_parser = parse_skip_rows)]
        skip_rows: Option<usize>,

        /// 正規化方式 (auto/phone_suffix/phone_full/email/verbatim_ci)
        #[arg(long)]
        strategy: Option<StrategyChoice>,

        /// phone_suffix の比較桁数
        #[arg(long)]
        suffix_len: Option<usize>,

        /// 正規化を無効化（大文字小文字のみ無視）
        #[arg(long, conflicts_with = "strategy")]
        no_normalize: bool,

        /// 出力形式 (csv/excel/json/all)
        #[arg(long, default_value = "csv")]
        format: ExportFormat,

        /// 出力ファイル/ディレクトリ（デフォルト: カレント）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// シート・列・検索値を対話的に選択
        #[arg(short, long)]
        interactive: bool,

        /// 端末に表示する結果の行数
        #[arg(long, default_value = "10")]
        preview: usize,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 既定の正規化方式
        #[arg(long)]
        strategy: Option<StrategyChoice>,

        /// phone_suffix の比較桁数
        #[arg(long)]
        suffix_len: Option<usize>,

        /// ヘッダー前に読み飛ばす行数（0〜20）
        #[arg(long, value_parser = parse_skip_rows)]
        skip_rows: Option<usize>,

        /// シート名を記録する列名
        #[arg(long)]
        sheet_column: Option<String>,

        /// 既定値に戻す
        #[arg(long)]
        reset: bool,
    },
}

/// スキップ行数（0〜20）
fn parse_skip_rows(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("数値を指定してください: {}", s))?;
    if value > crate::workbook::MAX_SKIP_ROWS {
        return Err(format!(
            "0〜{}の範囲で指定してください: {}",
            crate::workbook::MAX_SKIP_ROWS,
            value
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use sheet_lookup_common::Strategy;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_skip_rows() {
        assert_eq!(parse_skip_rows("3"), Ok(3));
        assert!(parse_skip_rows("21").is_err());
        assert!(parse_skip_rows("x").is_err());
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::parse_from([
            "sheet-lookup", "search", "book.xlsx", "-c", "Phone", "-q", "0987654321", "-q",
            "0911222333", "--strategy", "phone_full", "--format", "all",
        ]);

        match cli.command {
            Commands::Search { column, queries, strategy, format, .. } => {
                assert_eq!(column.as_deref(), Some("Phone"));
                assert_eq!(queries, vec!["0987654321", "0911222333"]);
                assert_eq!(strategy, Some(StrategyChoice::Fixed(Strategy::PhoneFull)));
                assert_eq!(format, ExportFormat::All);
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_no_normalize_conflicts_with_strategy() {
        let result = Cli::try_parse_from([
            "sheet-lookup", "search", "book.xlsx", "--strategy", "email", "--no-normalize",
        ]);
        assert!(result.is_err());
    }
}
