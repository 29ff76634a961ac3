use crate::error::{LookupError, Result};
use crate::workbook::MAX_SKIP_ROWS;
use serde::{Deserialize, Serialize};
use sheet_lookup_common::{Normalizer, ResultLabels, Strategy, StrategyChoice, DEFAULT_SUFFIX_LEN};
use std::path::PathBuf;

/// 設定ファイルのパスを上書きする環境変数
pub const CONFIG_ENV: &str = "SHEET_LOOKUP_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 正規化方式（auto: 列名から推定）
    pub strategy: StrategyChoice,
    /// phone_suffix の比較桁数
    pub suffix_len: usize,
    /// ヘッダー行の前に読み飛ばす行数
    pub skip_rows: usize,
    /// シート名を記録する列名
    pub sheet_column: String,
    /// 結果表の検索値列名
    pub query_column: String,
    /// 結果表の正規化キー列名
    pub key_column: String,
    /// 出力ファイル名（拡張子なし）
    pub output_name: String,
}

impl Default for Config {
    fn default() -> Self {
        let labels = ResultLabels::default();
        Self {
            strategy: StrategyChoice::Auto,
            suffix_len: DEFAULT_SUFFIX_LEN,
            skip_rows: 0,
            sheet_column: "Sheet".into(),
            query_column: labels.query_column,
            key_column: labels.key_column,
            output_name: "lookup-results".into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.validate()?;
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        // 環境変数を優先
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }

        let home = dirs::home_dir()
            .ok_or_else(|| LookupError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("sheet-lookup").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.skip_rows > MAX_SKIP_ROWS {
            return Err(LookupError::InvalidSkipRows(self.skip_rows));
        }
        if self.suffix_len == 0 {
            return Err(LookupError::Config("suffix_len は1以上を指定してください".into()));
        }

        let labels = [
            ("sheet_column", &self.sheet_column),
            ("query_column", &self.query_column),
            ("key_column", &self.key_column),
            ("output_name", &self.output_name),
        ];
        for (field, value) in labels {
            if value.trim().is_empty() {
                return Err(LookupError::Config(format!("{} が空です", field)));
            }
        }
        let synthetic = [
            ("query_column", "key_column", &self.query_column, &self.key_column),
            ("sheet_column", "query_column", &self.sheet_column, &self.query_column),
            ("sheet_column", "key_column", &self.sheet_column, &self.key_column),
        ];
        for (left, right, a, b) in synthetic {
            if a == b {
                return Err(LookupError::Config(format!(
                    "{} と {} に同じ名前は使えません: {}",
                    left, right, a
                )));
            }
        }
        Ok(())
    }

    /// 結果表の合成列名
    pub fn labels(&self) -> ResultLabels {
        ResultLabels {
            query_column: self.query_column.clone(),
            key_column: self.key_column.clone(),
        }
    }

    /// 対象列に対する正規化器を構築
    pub fn normalizer_for(&self, column: &str) -> Result<Normalizer> {
        let strategy: Strategy = self.strategy.resolve(column);
        Ok(Normalizer::new(strategy).with_suffix_len(self.suffix_len)?)
    }
}
