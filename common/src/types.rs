//! 検査ログの型定義
//!
//! - InspectionRecord: ログに埋め込まれた1件の検査結果
//! - FileMetadata: ファイル名から取り出した日付・時刻・面
//! - LoadedFile: 読み込み済みファイル
//! - Summary / DailyStat / SurfaceStat: 集計結果（保存しない派生データ）

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// ログ上のフィールド名
pub mod field {
    pub const MARKER: &str = "Marker";
    pub const PART_INDEX: &str = "ParcaSirasi";
    pub const HOLE_INDEX: &str = "holeindex";
    pub const SET_HOLE: &str = "SetHole";
    pub const RESULT_HOLE: &str = "ResultHole";
    pub const SET_X: &str = "SetX";
    pub const RESULT_X: &str = "ResultX";
    pub const SET_Y: &str = "SetY";
    pub const RESULT_Y: &str = "ResultY";
    pub const RESULT_HOLE_OK: &str = "ResultHole_OK";
    pub const RESULT_X_OK: &str = "ResultX_OK";
    pub const RESULT_Y_OK: &str = "ResultY_OK";
}

/// 検査レコード
///
/// 配列要素をそのまま保持する（スキーマ検証なし）。
/// 欠けているフィールドはアクセサで `None` / `false` になる。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InspectionRecord(Value);

impl InspectionRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// 任意フィールド（オブジェクト以外は常に `None`）
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// フィールド名一覧（ログ上の順序）
    pub fn field_names(&self) -> Vec<&str> {
        match &self.0 {
            Value::Object(map) => map.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// マーカー
    ///
    /// 文字列はそのまま、数値・真偽値は文字列化する。null/欠落は `None`
    pub fn marker(&self) -> Option<Cow<'_, str>> {
        match self.field(field::MARKER)? {
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            _ => None,
        }
    }

    pub fn part_index(&self) -> Option<&Value> {
        self.field(field::PART_INDEX)
    }

    pub fn hole_index(&self) -> Option<&Value> {
        self.field(field::HOLE_INDEX)
    }

    pub fn set_hole(&self) -> Option<&Value> {
        self.field(field::SET_HOLE)
    }

    pub fn result_hole(&self) -> Option<&Value> {
        self.field(field::RESULT_HOLE)
    }

    pub fn set_x(&self) -> Option<&Value> {
        self.field(field::SET_X)
    }

    pub fn result_x(&self) -> Option<&Value> {
        self.field(field::RESULT_X)
    }

    pub fn set_y(&self) -> Option<&Value> {
        self.field(field::SET_Y)
    }

    pub fn result_y(&self) -> Option<&Value> {
        self.field(field::RESULT_Y)
    }

    pub fn result_hole_ok(&self) -> bool {
        is_truthy(self.field(field::RESULT_HOLE_OK))
    }

    pub fn result_x_ok(&self) -> bool {
        is_truthy(self.field(field::RESULT_X_OK))
    }

    pub fn result_y_ok(&self) -> bool {
        is_truthy(self.field(field::RESULT_Y_OK))
    }

    /// 穴・X・Yの3判定がすべてOKなら合格
    pub fn passed(&self) -> bool {
        self.result_hole_ok() && self.result_x_ok() && self.result_y_ok()
    }
}

/// 検査装置の出力する判定値の真偽
///
/// `true`・0以外の数値・空でない文字列・配列・オブジェクトを真とする
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// ファイル名から取り出したメタデータ
///
/// 取り出せない場合はすべて空文字
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// DD.MM.YYYY
    pub date: String,
    /// HH:MM
    pub time: String,
    /// 2文字の面コード
    pub surface: String,
}

impl FileMetadata {
    /// 日付が取れていれば日別集計の対象
    pub fn is_available(&self) -> bool {
        !self.date.is_empty()
    }

    /// ヘッダー表示用ラベル（"06.05.2025 08:05 - DA"）
    pub fn label(&self) -> String {
        if self.date.is_empty() || self.time.is_empty() || self.surface.is_empty() {
            return String::new();
        }
        format!("{} {} - {}", self.date, self.time, self.surface)
    }
}

/// "DD.MM.YYYY" を暦日に変換（暦にない日付は `None`）
pub fn calendar_key(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%d.%m.%Y").ok()
}

/// 読み込み済みファイル
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub name: String,
    pub records: Vec<InspectionRecord>,
    pub metadata: FileMetadata,
    pub loaded_at: DateTime<Local>,
}

impl LoadedFile {
    /// ファイル一覧での表示名
    ///
    /// 日付があれば "日付 - 面"、なければファイル名の先頭15文字
    pub fn list_label(&self) -> String {
        if self.metadata.is_available() {
            return format!("{} - {}", self.metadata.date, self.metadata.surface);
        }
        let head: String = self.name.chars().take(15).collect();
        if self.name.chars().count() > 15 {
            format!("{}...", head)
        } else {
            head
        }
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

/// 合否集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// 不良率（%、小数2桁）
    pub failure_rate: f64,
}

impl Summary {
    /// `passed` は `total` で頭打ち
    pub fn from_counts(total: usize, passed: usize) -> Self {
        let passed = passed.min(total);
        let failed = total - passed;
        Self {
            total,
            passed,
            failed,
            failure_rate: failure_rate(total, failed),
        }
    }
}

/// 面ごとの集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SurfaceStat {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

/// 日別集計
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStat {
    pub date: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub failure_rate: f64,
    pub surfaces: BTreeMap<String, SurfaceStat>,
}

/// 不良率を小数2桁で丸める。total=0なら0
pub fn failure_rate(total: usize, failed: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let rate = failed as f64 / total as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}
