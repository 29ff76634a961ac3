//! 識別子の正規化
//!
//! 電話番号・メールアドレス・顧客コードなどの表記揺れを吸収し、
//! 照合用の正規化キーに変換する。
//!
//! ## 方式
//! - `phone_suffix`: 数字のみ抽出し末尾N桁（既定8桁）
//! - `phone_full`: 数字のみ抽出し国番号 `84` を国内プレフィックス `0` に置換
//! - `email`: 前後空白除去＋小文字化
//! - `verbatim_ci`: 前後空白除去＋小文字化（汎用）
//!
//! 欠損値や空文字列はキーなし（`None`）とし、空文字列同士が一致しないようにする。

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// 電話番号末尾の比較桁数（既定値）
pub const DEFAULT_SUFFIX_LEN: usize = 8;

const INTERNATIONAL_PREFIX: &str = "84";
const TRUNK_PREFIX: &str = "0";
/// 国番号付きとみなす最小桁数
const MIN_INTERNATIONAL_DIGITS: usize = 9;

/// 正規化キー
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 正規化方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// 数字の末尾N桁
    PhoneSuffix,
    /// 全桁（国番号84 → 0）
    PhoneFull,
    /// メールアドレス
    Email,
    /// 大文字小文字を無視した完全一致
    #[default]
    VerbatimCi,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::PhoneSuffix,
        Strategy::PhoneFull,
        Strategy::Email,
        Strategy::VerbatimCi,
    ];

    /// 列名から正規化方式を推定
    ///
    /// 電話番号・メール関連の語を含む列名のみ判定し、それ以外は `None`
    pub fn infer_from_column(column: &str) -> Option<Self> {
        lazy_static::lazy_static! {
            static ref EMAIL_RE: Regex = Regex::new(r"(?i)mail").unwrap();
            static ref PHONE_RE: Regex = Regex::new(
                r"(?i)(phone|mobile|tel|sđt|sdt|điện\s*thoại|dien\s*thoai|電話|携帯)"
            ).unwrap();
        }

        if EMAIL_RE.is_match(column) {
            Some(Strategy::Email)
        } else if PHONE_RE.is_match(column) {
            Some(Strategy::PhoneSuffix)
        } else {
            None
        }
    }
}

impl std::str::FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "phone_suffix" | "suffix" | "phone" => Ok(Strategy::PhoneSuffix),
            "phone_full" | "full" => Ok(Strategy::PhoneFull),
            "email" | "mail" => Ok(Strategy::Email),
            "verbatim_ci" | "verbatim" | "ci" => Ok(Strategy::VerbatimCi),
            _ => Err(Error::UnknownStrategy(s.to_string())),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::PhoneSuffix => write!(f, "phone_suffix"),
            Strategy::PhoneFull => write!(f, "phone_full"),
            Strategy::Email => write!(f, "email"),
            Strategy::VerbatimCi => write!(f, "verbatim_ci"),
        }
    }
}

/// 正規化方式の指定（自動推定 or 明示指定）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StrategyChoice {
    /// 列名から推定（推定できなければ `verbatim_ci`）
    #[default]
    Auto,
    Fixed(Strategy),
}

impl StrategyChoice {
    /// 対象列に対して実際に使う方式を決定
    pub fn resolve(&self, column: &str) -> Strategy {
        match self {
            StrategyChoice::Auto => Strategy::infer_from_column(column).unwrap_or_default(),
            StrategyChoice::Fixed(strategy) => *strategy,
        }
    }
}

impl std::str::FromStr for StrategyChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(StrategyChoice::Auto);
        }
        s.parse().map(StrategyChoice::Fixed)
    }
}

impl std::fmt::Display for StrategyChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyChoice::Auto => write!(f, "auto"),
            StrategyChoice::Fixed(strategy) => write!(f, "{}", strategy),
        }
    }
}

impl TryFrom<String> for StrategyChoice {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<StrategyChoice> for String {
    fn from(choice: StrategyChoice) -> Self {
        choice.to_string()
    }
}

/// 正規化器（方式＋末尾桁数）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    strategy: Strategy,
    suffix_len: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(Strategy::default())
    }
}

impl Normalizer {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            suffix_len: DEFAULT_SUFFIX_LEN,
        }
    }

    /// `phone_suffix` の比較桁数を変更（0は不可）
    pub fn with_suffix_len(mut self, suffix_len: usize) -> Result<Self> {
        if suffix_len == 0 {
            return Err(Error::InvalidSuffixLength(suffix_len));
        }
        self.suffix_len = suffix_len;
        Ok(self)
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn suffix_len(&self) -> usize {
        self.suffix_len
    }

    /// 生の値を正規化キーに変換
    ///
    /// # Returns
    /// * `Some(key)` - 照合に使えるキー
    /// * `None` - 欠損値、または方式に対して不十分な値
    pub fn normalize(&self, raw: Option<&str>) -> Option<NormalizedKey> {
        let raw = raw?;
        let key = match self.strategy {
            Strategy::PhoneSuffix => {
                let digits = extract_digits(raw);
                if digits.len() < self.suffix_len {
                    return None;
                }
                digits[digits.len() - self.suffix_len..].to_string()
            }
            Strategy::PhoneFull => {
                let digits = extract_digits(raw);
                if digits.len() >= MIN_INTERNATIONAL_DIGITS
                    && digits.starts_with(INTERNATIONAL_PREFIX)
                {
                    format!("{}{}", TRUNK_PREFIX, &digits[INTERNATIONAL_PREFIX.len()..])
                } else {
                    digits
                }
            }
            Strategy::Email | Strategy::VerbatimCi => raw.trim().to_lowercase(),
        };

        if key.is_empty() {
            None
        } else {
            Some(NormalizedKey(key))
        }
    }
}

/// 既定の桁数で正規化
pub fn normalize(raw: Option<&str>, strategy: Strategy) -> Option<NormalizedKey> {
    Normalizer::new(strategy).normalize(raw)
}

/// 数字のみを抽出（全角数字は半角に変換）
fn extract_digits(raw: &str) -> String {
    raw.chars()
        .filter_map(|c| match c {
            '0'..='9' => Some(c),
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32),
            _ => None,
        })
        .collect()
}
