//! 集計結果のテキスト表示とJSON出力

use ina_vision_common::{DailyStat, FileStore, InspectionRecord, Summary};
use serde::Serialize;
use serde_json::Value;

/// 読み込み済みファイル一覧
pub fn render_file_list(store: &FileStore) -> String {
    let active = store.active_index();
    store
        .files()
        .iter()
        .enumerate()
        .map(|(i, file)| {
            let mark = if Some(i) == active { "▶" } else { " " };
            format!("{} {:<24} {:>6} record  ({})", mark, file.list_label(), file.record_count(), file.name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// 合否集計
pub fn render_summary(title: &str, summary: &Summary) -> String {
    format!(
        "{}\n  総数: {}\n  合格: {}\n  不合格: {}\n  不良率: %{:.2}",
        title, summary.total, summary.passed, summary.failed, summary.failure_rate
    )
}

/// 日別生産統計の表（面別内訳つき）
pub fn render_daily_table(stats: &[DailyStat]) -> String {
    let mut lines = vec![format!(
        "{:<12} {:>8} {:>8} {:>8} {:>9}  {}",
        "日付", "総数", "合格", "不合格", "不良率", "面"
    )];
    for stat in stats {
        let surfaces = stat
            .surfaces
            .iter()
            .map(|(surface, s)| format!("{}: {} pcs", surface, s.total))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!(
            "{:<12} {:>8} {:>8} {:>8} {:>8.2}%  {}",
            stat.date, stat.total, stat.passed, stat.failed, stat.failure_rate, surfaces
        ));
    }
    lines.join("\n")
}

/// レコード表（主要列のみ）
pub fn render_records(records: &[&InspectionRecord]) -> String {
    let mut lines = vec![format!(
        "{:<8} {:>6} {:>6} {:>9} {:>9} {:<6} {:>9} {:>9} {:>9} {:>9}",
        "Marker", "Part", "Hole", "SetHole", "ResHole", "判定", "SetX", "ResX", "SetY", "ResY"
    )];
    for r in records {
        lines.push(format!(
            "{:<8} {:>6} {:>6} {:>9} {:>9} {:<6} {:>9} {:>9} {:>9} {:>9}",
            r.marker().unwrap_or_default(),
            cell(r.part_index()),
            cell(r.hole_index()),
            cell(r.set_hole()),
            flagged(r.result_hole(), r.result_hole_ok()),
            if r.passed() { "OK" } else { "NG" },
            cell(r.set_x()),
            flagged(r.result_x(), r.result_x_ok()),
            cell(r.set_y()),
            flagged(r.result_y(), r.result_y_ok()),
        ));
    }
    lines.join("\n")
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(v) => v.to_string(),
    }
}

/// NGの測定値には * を付ける
fn flagged(value: Option<&Value>, ok: bool) -> String {
    if ok {
        cell(value)
    } else {
        format!("*{}", cell(value))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileEntry<'a> {
    name: &'a str,
    label: String,
    date: &'a str,
    time: &'a str,
    surface: &'a str,
    records: usize,
    loaded_at: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoreSnapshot<'a> {
    files: Vec<FileEntry<'a>>,
    active: Option<&'a str>,
    marker: &'a str,
    markers: &'a [String],
    stats: &'a Summary,
    filtered_count: usize,
    corpus: Summary,
    daily_stats: &'a [DailyStat],
}

/// ストアの状態をJSONに
pub fn store_to_json(store: &FileStore) -> serde_json::Result<String> {
    let snapshot = StoreSnapshot {
        files: store
            .files()
            .iter()
            .map(|f| FileEntry {
                name: &f.name,
                label: f.metadata.label(),
                date: &f.metadata.date,
                time: &f.metadata.time,
                surface: &f.metadata.surface,
                records: f.record_count(),
                loaded_at: f.loaded_at.to_rfc3339(),
            })
            .collect(),
        active: store.active().map(|f| f.name.as_str()),
        marker: store.marker_filter().as_str(),
        markers: store.markers(),
        stats: store.stats(),
        filtered_count: store.filtered_records().len(),
        corpus: store.corpus_summary(),
        daily_stats: store.daily_stats(),
    };
    serde_json::to_string_pretty(&snapshot)
}
