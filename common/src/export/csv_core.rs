//! 区切りテキスト（CSV）生成
//!
//! 値のクォート・エスケープは行わない。値にカンマや改行が含まれると列がずれる。

use crate::filter::MarkerFilter;
use crate::types::{DailyStat, InspectionRecord};
use chrono::NaiveDate;
use serde_json::Value;
use std::borrow::Cow;

const DELIMITER: &str = ",";
const LINE_SEPARATOR: &str = "\n";

/// 日別集計CSVのヘッダー
pub const DAILY_STATS_HEADER: &str = "Date,Total,Passed,Failed,Failure Rate";

/// ダウンロード用の出力ファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// 推奨ファイル名
    pub file_name: String,
    pub content: String,
}

/// レコード列をCSVに変換
///
/// 1行目は先頭レコードのフィールド名（ログ上の順序）。
/// 2件目以降はそのヘッダーに合わせて並べ、欠けた列は空欄、余分な列は捨てる。
pub fn to_delimited_text<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a InspectionRecord>,
{
    let records: Vec<&InspectionRecord> = records.into_iter().collect();
    let Some(first) = records.first() else {
        return String::new();
    };

    let header = first.field_names();
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(header.join(DELIMITER));

    let mut mismatched = 0usize;
    for record in &records {
        if record.field_names() != header {
            mismatched += 1;
        }
        let row: Vec<Cow<'_, str>> = header
            .iter()
            .map(|key| record.field(key).map(cell).unwrap_or(Cow::Borrowed("")))
            .collect();
        lines.push(row.join(DELIMITER));
    }

    if mismatched > 0 {
        tracing::warn!(
            mismatched,
            "フィールド構成が先頭レコードと異なるレコードがあります（ヘッダーに合わせて出力）"
        );
    }

    lines.join(LINE_SEPARATOR)
}

/// 日別集計をCSVに変換
///
/// 面別内訳は出力しない
pub fn daily_stats_to_delimited_text(stats: &[DailyStat]) -> String {
    let mut lines = Vec::with_capacity(stats.len() + 1);
    lines.push(DAILY_STATS_HEADER.to_string());
    for stat in stats {
        lines.push(format!(
            "{},{},{},{},{}%",
            stat.date,
            stat.total,
            stat.passed,
            stat.failed,
            rate_cell(stat.total, stat.failure_rate)
        ));
    }
    lines.join(LINE_SEPARATOR)
}

/// 不良率の表記。レコードのない日は小数なしの "0"
fn rate_cell(total: usize, rate: f64) -> Cow<'static, str> {
    if total == 0 {
        Cow::Borrowed("0")
    } else {
        Cow::Owned(format!("{:.2}", rate))
    }
}

/// レコードCSVの推奨ファイル名（`surface_data_<marker>_<YYYY-MM-DD>.csv`）
pub fn records_file_name(filter: &MarkerFilter, date: NaiveDate) -> String {
    format!("surface_data_{}_{}.csv", file_name_safe(filter.as_str()), date)
}

/// 日別集計CSVの推奨ファイル名（`daily_production_stats_<YYYY-MM-DD>.csv`）
pub fn daily_stats_file_name(date: NaiveDate) -> String {
    format!("daily_production_stats_{}.csv", date)
}

/// 表示中レコードの出力ファイル。レコードがなければ `None`
pub fn records_export<'a, I>(records: I, filter: &MarkerFilter, date: NaiveDate) -> Option<ExportFile>
where
    I: IntoIterator<Item = &'a InspectionRecord>,
{
    let records: Vec<&InspectionRecord> = records.into_iter().collect();
    if records.is_empty() {
        return None;
    }
    Some(ExportFile {
        file_name: records_file_name(filter, date),
        content: to_delimited_text(records),
    })
}

/// 日別集計の出力ファイル。集計がなければ `None`
pub fn daily_stats_export(stats: &[DailyStat], date: NaiveDate) -> Option<ExportFile> {
    if stats.is_empty() {
        return None;
    }
    Some(ExportFile {
        file_name: daily_stats_file_name(date),
        content: daily_stats_to_delimited_text(stats),
    })
}

/// セル値の文字列化（null は空欄、配列・オブジェクトはJSON）
fn cell(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed(""),
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Bool(b) => Cow::Owned(b.to_string()),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Array(_) | Value::Object(_) => Cow::Owned(value.to_string()),
    }
}

/// ファイル名に使えない文字を `_` に置換
fn file_name_safe(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
