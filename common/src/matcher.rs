//! 照合モジュール
//!
//! 検索値リストを表の対象列と照合し、検索値ごとに1行の結果を返す。
//!
//! ## 処理フロー
//! 1. 対象列の存在確認
//! 2. 対象列の全行を正規化して照合インデックスを構築（1回のみ）
//! 3. 検索値ごとにインデックスを引き、最後に出現した行を採用
//!
//! 同じキーが複数行にある場合は表順で最後の行（後のシートほど新しい）を優先する。

use crate::error::{Error, Result};
use crate::normalizer::{NormalizedKey, Normalizer, Strategy};
use crate::table::{Cell, Table};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// 正規化キー → 行位置リスト（表順）
#[derive(Debug, Clone, Default)]
pub struct MatchIndex {
    entries: HashMap<NormalizedKey, Vec<usize>>,
    skipped_rows: usize,
}

impl MatchIndex {
    /// 対象列から照合インデックスを構築
    ///
    /// キーにならない行はインデックスから除外するだけでエラーにはしない
    pub fn build(table: &Table, column: usize, normalizer: &Normalizer) -> Self {
        let mut entries: HashMap<NormalizedKey, Vec<usize>> = HashMap::new();
        let mut skipped_rows = 0;

        for row in 0..table.len() {
            match normalizer.normalize(table.get(row, column)) {
                Some(key) => entries.entry(key).or_default().push(row),
                None => skipped_rows += 1,
            }
        }

        Self {
            entries,
            skipped_rows,
        }
    }

    /// キーに一致する行位置（表順）
    pub fn get(&self, key: &NormalizedKey) -> Option<&[usize]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// キーに一致する最後の行位置
    pub fn last(&self, key: &NormalizedKey) -> Option<usize> {
        self.entries.get(key).and_then(|rows| rows.last().copied())
    }

    /// 異なるキーの数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// キーにならず除外された行数
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }
}

/// 結果表の合成列名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLabels {
    /// 検索値の列名
    pub query_column: String,
    /// 正規化キーの列名
    pub key_column: String,
}

impl Default for ResultLabels {
    fn default() -> Self {
        Self {
            query_column: "Query".into(),
            key_column: "Normalized key".into(),
        }
    }
}

/// 検索値1件分の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    /// 入力された検索値
    pub query: String,
    /// 検索値の正規化キー
    pub key: Option<NormalizedKey>,
    /// 一致した表の行位置
    pub matched_row: Option<usize>,
    /// 結果表のデータ列に対応する値（不一致なら全て欠損）
    pub values: Vec<Cell>,
}

impl ResultRow {
    pub fn is_match(&self) -> bool {
        self.matched_row.is_some()
    }
}

/// 検索結果の表
#[derive(Debug, Clone)]
pub struct ResultTable {
    labels: ResultLabels,
    data_columns: Vec<String>,
    rows: Vec<ResultRow>,
}

impl ResultTable {
    /// ヘッダー（合成列が先頭）
    pub fn headers(&self) -> Vec<&str> {
        [self.labels.query_column.as_str(), self.labels.key_column.as_str()]
            .into_iter()
            .chain(self.data_columns.iter().map(String::as_str))
            .collect()
    }

    /// 合成列を除いたデータ列名
    pub fn data_columns(&self) -> &[String] {
        &self.data_columns
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    /// 出力用の行（欠損は空文字列）
    pub fn records(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        self.rows.iter().map(|row| {
            let mut record = Vec::with_capacity(self.data_columns.len() + 2);
            record.push(row.query.as_str());
            record.push(row.key.as_ref().map(NormalizedKey::as_str).unwrap_or(""));
            record.extend(row.values.iter().map(|v| v.as_deref().unwrap_or("")));
            record
        })
    }

    /// 一致した検索値の数
    pub fn matched_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_match()).count()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// JSON出力: 列順を保ったオブジェクトの配列
impl Serialize for ResultTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let headers = self.headers();
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&JsonRecord { headers: &headers, row })?;
        }
        seq.end()
    }
}

struct JsonRecord<'a> {
    headers: &'a [&'a str],
    row: &'a ResultRow,
}

impl Serialize for JsonRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.headers.len()))?;
        map.serialize_entry(self.headers[0], &self.row.query)?;
        map.serialize_entry(self.headers[1], &self.row.key)?;
        for (name, value) in self.headers[2..].iter().zip(self.row.values.iter()) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// 照合器
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    normalizer: Normalizer,
    labels: ResultLabels,
}

impl Matcher {
    pub fn new(normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            labels: ResultLabels::default(),
        }
    }

    pub fn with_labels(mut self, labels: ResultLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// 検索値リストを表の対象列と照合
    ///
    /// # Arguments
    /// * `table` - 検索対象の表（変更しない）
    /// * `column` - 対象列名
    /// * `queries` - 検索値（入力順・重複も含めてそのまま結果になる）
    ///
    /// # Returns
    /// 検索値と同数・同順の結果行を持つ表
    pub fn search(&self, table: &Table, column: &str, queries: &[String]) -> Result<ResultTable> {
        let column_idx = table.require_column(column)?;
        if queries.is_empty() {
            return Err(Error::EmptyQueryList);
        }

        let index = MatchIndex::build(table, column_idx, &self.normalizer);

        // 合成列と同名の列は結果から除く
        let kept: Vec<usize> = table
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, name)| {
                **name != self.labels.query_column && **name != self.labels.key_column
            })
            .map(|(i, _)| i)
            .collect();
        let data_columns = kept.iter().map(|&i| table.columns()[i].clone()).collect();

        // 同じ検索値は一度だけ正規化・照合する
        let mut resolved: HashMap<&str, (Option<NormalizedKey>, Option<usize>)> = HashMap::new();
        let mut rows = Vec::with_capacity(queries.len());

        for query in queries {
            let (key, matched_row) = resolved
                .entry(query.as_str())
                .or_insert_with(|| {
                    let key = self.normalizer.normalize(Some(query.as_str()));
                    let matched = key.as_ref().and_then(|k| index.last(k));
                    (key, matched)
                })
                .clone();

            let values = match matched_row.and_then(|r| table.row(r)) {
                Some(source) => kept.iter().map(|&i| source[i].clone()).collect(),
                None => vec![None; kept.len()],
            };

            rows.push(ResultRow {
                query: query.clone(),
                key,
                matched_row,
                values,
            });
        }

        Ok(ResultTable {
            labels: self.labels.clone(),
            data_columns,
            rows,
        })
    }
}

/// 既定の設定で照合
pub fn search(table: &Table, column: &str, queries: &[String], strategy: Strategy) -> Result<ResultTable> {
    Matcher::new(Normalizer::new(strategy)).search(table, column, queries)
}

/// 入力テキストを検索値リストに分割（前後空白除去、空行除外）
pub fn parse_queries(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
