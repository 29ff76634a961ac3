use clap::Parser;
use sheet_lookup::{cli, config, error, export, selector, session, workbook};
use cli::{Cli, Commands};
use config::Config;
use error::{LookupError, Result};
use session::SearchSession;
use sheet_lookup_common::{parse_queries, Matcher, ResultTable, Strategy, StrategyChoice};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// プレビュー表示時のセル幅上限
const PREVIEW_CELL_WIDTH: usize = 24;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // --reset では既存の設定ファイルを読まない
    let config = match &cli.command {
        Commands::Config { reset: true, .. } => Config::default(),
        _ => Config::load()?,
    };

    match cli.command {
        Commands::Sheets { workbook, skip_rows } => {
            println!("📁 sheet-lookup - シート一覧\n");

            let options = workbook::LoadOptions {
                skip_rows: skip_rows.unwrap_or(config.skip_rows),
                show_progress: true,
            };
            let loaded = workbook::load_workbook(&workbook, &options)?;

            for sheet in &loaded.sheets {
                println!("✔ {} ({}行)", sheet.name, sheet.row_count());
                if !sheet.columns.is_empty() {
                    println!("    列: {}", sheet.columns.join(", "));
                }
            }
            for failure in &loaded.failures {
                println!("⚠ シートをスキップ: {} – {}", failure.sheet, failure.reason);
            }

            println!(
                "\n合計 {}行 / {}シート",
                loaded.total_rows(),
                loaded.sheets.len()
            );
        }

        Commands::Search {
            workbook,
            column,
            queries,
            queries_file,
            sheets,
            skip_rows,
            strategy,
            suffix_len,
            no_normalize,
            format,
            output,
            interactive,
            preview,
        } => {
            println!("🔍 sheet-lookup - 検索\n");

            let mut config = config;
            if let Some(n) = skip_rows {
                config.skip_rows = n;
            }
            if let Some(n) = suffix_len {
                config.suffix_len = n;
            }
            if no_normalize {
                config.strategy = StrategyChoice::Fixed(Strategy::VerbatimCi);
            } else if let Some(choice) = strategy {
                config.strategy = choice;
            }
            config.validate()?;

            // 1. ブック読み込み
            println!("[1/3] ブックを読み込み中...");
            let options = workbook::LoadOptions {
                skip_rows: config.skip_rows,
                show_progress: true,
            };
            let mut session = SearchSession::open(&workbook, &options, &config.sheet_column)?;
            for failure in session.failures() {
                println!("⚠ シートをスキップ: {} – {}", failure.sheet, failure.reason);
            }

            // シート選択
            if !sheets.is_empty() {
                session.select_sheets(&sheets)?;
            } else if interactive {
                let chosen = selector::select_sheets_interactive(session.sheets())?;
                session.select_sheets(&chosen)?;
            }
            println!(
                "✔ {}行を読み込み ({}シート: {})\n",
                session.table().len(),
                session.selected_sheets().len(),
                session.selected_sheets().join(", ")
            );

            // 2. 列・検索値の決定
            // -i 指定時は -c の列を初期選択にして確認する
            let column = match column {
                Some(column) if !interactive => column,
                preferred => selector::select_column_interactive(
                    session.table().columns(),
                    &config.sheet_column,
                    preferred.as_deref(),
                )?,
            };

            let mut query_list = collect_queries(&queries, queries_file.as_deref())?;
            if query_list.is_empty() && (interactive || queries_file.is_none()) {
                query_list = selector::input_queries_interactive()?;
            }

            let normalizer = config.normalizer_for(&column)?;
            println!("[2/3] 検索中... (列: {}, 正規化: {})", column, normalizer.strategy());

            let matcher = Matcher::new(normalizer).with_labels(config.labels());
            let result = match session.search(&column, &query_list, &matcher) {
                Ok(result) => result,
                Err(LookupError::Common(sheet_lookup_common::Error::EmptyQueryList)) => {
                    println!("⚠ 検索値が入力されていません");
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

            println!("📊 一致: {} / {}件\n", result.matched_count(), result.len());
            print_preview(&result, preview);

            // 3. 出力
            println!("[3/3] 結果を出力中...");
            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            let written = export::export_results(&result, &format, &output_dir, &config.output_name)?;
            for path in written {
                println!("✔ 出力: {}", path.display());
            }

            println!("\n✅ 検索完了");
        }

        Commands::Config {
            show,
            strategy,
            suffix_len,
            skip_rows,
            sheet_column,
            reset,
        } => {
            let mut config = config;
            let changed = reset
                || strategy.is_some()
                || suffix_len.is_some()
                || skip_rows.is_some()
                || sheet_column.is_some();

            if let Some(choice) = strategy {
                config.strategy = choice;
            }
            if let Some(n) = suffix_len {
                config.suffix_len = n;
            }
            if let Some(n) = skip_rows {
                config.skip_rows = n;
            }
            if let Some(name) = sheet_column {
                config.sheet_column = name;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("設定:");
                println!("  正規化方式: {}", config.strategy);
                println!("  末尾桁数: {}", config.suffix_len);
                println!("  スキップ行数: {}", config.skip_rows);
                println!("  シート名列: {}", config.sheet_column);
                println!("  検索値列: {}", config.query_column);
                println!("  正規化キー列: {}", config.key_column);
                println!("  出力ファイル名: {}", config.output_name);
            }
        }
    }

    Ok(())
}

/// コマンドライン・ファイル・標準入力から検索値を集める
fn collect_queries(inline: &[String], file: Option<&Path>) -> Result<Vec<String>> {
    let mut text = inline.join("\n");

    if let Some(path) = file {
        let content = if path == Path::new("-") {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        } else {
            if !path.exists() {
                return Err(LookupError::FileNotFound(path.display().to_string()));
            }
            std::fs::read_to_string(path)?
        };
        text.push('\n');
        text.push_str(&content);
    }

    Ok(parse_queries(&text))
}

/// 結果の先頭を端末に表示
fn print_preview(result: &ResultTable, limit: usize) {
    if limit == 0 || result.is_empty() {
        return;
    }

    let headers = result.headers();
    let records: Vec<Vec<&str>> = result.records().take(limit).collect();

    let widths: Vec<usize> = (0..headers.len())
        .map(|col| {
            records
                .iter()
                .map(|r| r[col].chars().count())
                .chain(std::iter::once(headers[col].chars().count()))
                .max()
                .unwrap_or(0)
                .min(PREVIEW_CELL_WIDTH)
        })
        .collect();

    let format_line = |cells: &[&str]| -> String {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, &width)| {
                let text: String = cell.chars().take(width).collect();
                let pad = width - text.chars().count();
                format!("{}{}", text, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join(" | ")
    };

    println!("{}", format_line(&headers));
    println!("{}", widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-"));
    for record in &records {
        println!("{}", format_line(record));
    }
    if result.len() > limit {
        println!("... 他 {}件", result.len() - limit);
    }
    println!();
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
