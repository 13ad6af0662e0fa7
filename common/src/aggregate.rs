//! 集計ロジック
//!
//! レコード列の合否集計と、ファイル横断の日別・面別集計。
//! 結果は常にファイル集合全体から作り直す（差分更新しない）。

use crate::types::{calendar_key, DailyStat, InspectionRecord, LoadedFile, Summary, SurfaceStat};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

/// レコード列の合否を集計
///
/// # Examples
/// ```
/// use ina_vision_common::{summarize, InspectionRecord};
///
/// let summary = summarize(&[] as &[InspectionRecord]);
/// assert_eq!(summary.total, 0);
/// assert_eq!(summary.failure_rate, 0.0);
/// ```
pub fn summarize<'a, I>(records: I) -> Summary
where
    I: IntoIterator<Item = &'a InspectionRecord>,
{
    let (total, passed) = count(records);
    Summary::from_counts(total, passed)
}

fn count<'a, I>(records: I) -> (usize, usize)
where
    I: IntoIterator<Item = &'a InspectionRecord>,
{
    records.into_iter().fold((0, 0), |(total, passed), r| {
        (total + 1, passed + usize::from(r.passed()))
    })
}

/// ファイル横断の日別集計
///
/// - 日付のないファイルは日別集計から除外（"不明"の日は作らない）
/// - 面コードのないファイルは面別内訳から除外するが、日の合計には含める
/// - 日付の新しい順（暦順）に並べる
pub fn daily_stats(files: &[LoadedFile]) -> Vec<DailyStat> {
    let mut by_date: HashMap<&str, Vec<&LoadedFile>> = HashMap::new();
    for file in files.iter().filter(|f| f.metadata.is_available()) {
        by_date.entry(file.metadata.date.as_str()).or_default().push(file);
    }

    let mut stats: Vec<DailyStat> = by_date
        .into_iter()
        .map(|(date, date_files)| daily_stat(date, &date_files))
        .collect();

    stats.sort_by(|a, b| {
        Reverse(calendar_key(&a.date))
            .cmp(&Reverse(calendar_key(&b.date)))
            .then_with(|| b.date.cmp(&a.date))
    });
    stats
}

fn daily_stat(date: &str, files: &[&LoadedFile]) -> DailyStat {
    let (total, passed) = count(files.iter().flat_map(|f| f.records.iter()));
    let summary = Summary::from_counts(total, passed);

    let mut surfaces: BTreeMap<String, SurfaceStat> = BTreeMap::new();
    for file in files.iter().filter(|f| !f.metadata.surface.is_empty()) {
        let (file_total, file_passed) = count(&file.records);
        let entry = surfaces.entry(file.metadata.surface.clone()).or_default();
        entry.total += file_total;
        entry.passed += file_passed;
        entry.failed = entry.total - entry.passed;
    }

    DailyStat {
        date: date.to_string(),
        total: summary.total,
        passed: summary.passed,
        failed: summary.failed,
        failure_rate: summary.failure_rate,
        surfaces,
    }
}
