//! 読み込み済みファイルのストア
//!
//! ファイル集合・表示中ファイル・マーカーフィルタと、そこから導出する集計を
//! 1つのオブジェクトで持つ。変更操作のたびに集計をファイル集合全体から作り直すため、
//! 集計がファイル一覧とずれることはない。

use crate::aggregate::{daily_stats, summarize};
use crate::error::{LoadError, Result};
use crate::filename::FilenameInfoExtractor;
use crate::filter::{apply_filter, distinct_markers, MarkerFilter};
use crate::parser::parse_records;
use crate::types::{DailyStat, InspectionRecord, LoadedFile, Summary};
use chrono::Local;

/// 導出データ（保存しない）
#[derive(Debug, Clone, Default)]
struct Derived {
    /// 表示中ファイルの集計
    stats: Summary,
    daily_stats: Vec<DailyStat>,
    /// 表示中ファイルのマーカー一覧
    markers: Vec<String>,
}

/// 一括読み込みの結果
#[derive(Debug, Default)]
pub struct BatchReport {
    /// 読み込めたファイル名（読み込み順）
    pub loaded: Vec<String>,
    /// 読み込めなかったファイルとその理由
    pub failed: Vec<LoadError>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// 読み込み済みファイルのストア
#[derive(Debug, Default)]
pub struct FileStore {
    files: Vec<LoadedFile>,
    active: Option<usize>,
    marker_filter: MarkerFilter,
    extractor: FilenameInfoExtractor,
    derived: Derived,
}

impl FileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 命名規則を差し替えたストア
    pub fn with_extractor(extractor: FilenameInfoExtractor) -> Self {
        Self {
            extractor,
            ..Self::default()
        }
    }

    pub fn extractor(&self) -> &FilenameInfoExtractor {
        &self.extractor
    }

    /// ログ本文からLoadedFileを組み立てる（ストアには追加しない）
    ///
    /// ストアを変更しないので、複数ファイルを並列に準備してから
    /// [`FileStore::insert`] で順に追加できる。
    pub fn build_file(extractor: &FilenameInfoExtractor, name: &str, raw_text: &str) -> Result<LoadedFile> {
        let records = parse_records(raw_text).map_err(|e| LoadError::from_parse(name, e))?;
        let metadata = extractor.extract(name);
        if !metadata.is_available() {
            tracing::debug!(file = name, "ファイル名が命名規則に一致しません（日別集計の対象外）");
        }
        Ok(LoadedFile {
            name: name.to_string(),
            records,
            metadata,
            loaded_at: Local::now(),
        })
    }

    /// ファイルを読み込んで追加
    ///
    /// # Errors
    /// * `DuplicateFile` - 同名ファイルが読み込み済み
    /// * `NoEmbeddedArray` / `MalformedArray` - 本文のパース失敗
    pub fn add(&mut self, name: &str, raw_text: &str) -> Result<&LoadedFile> {
        if self.contains(name) {
            return Err(self.reject(LoadError::DuplicateFile { name: name.to_string() }));
        }
        let file = match Self::build_file(&self.extractor, name, raw_text) {
            Ok(file) => file,
            Err(e) => return Err(self.reject(e)),
        };
        self.insert(file)
    }

    /// 組み立て済みのファイルを追加
    ///
    /// 空のストアに最初に追加されたファイルが表示中になる
    pub fn insert(&mut self, file: LoadedFile) -> Result<&LoadedFile> {
        if self.contains(&file.name) {
            return Err(self.reject(LoadError::DuplicateFile { name: file.name }));
        }

        tracing::debug!(
            file = %file.name,
            records = file.records.len(),
            date = %file.metadata.date,
            surface = %file.metadata.surface,
            "ファイルを追加"
        );

        self.files.push(file);
        let index = self.files.len() - 1;
        if self.active.is_none() {
            self.active = Some(index);
            self.marker_filter = MarkerFilter::All;
        }
        self.refresh();
        Ok(&self.files[index])
    }

    /// 複数ファイルを順に追加
    ///
    /// 失敗したファイルは記録して続行する
    pub fn add_batch<I, N, T>(&mut self, inputs: I) -> BatchReport
    where
        I: IntoIterator<Item = (N, T)>,
        N: AsRef<str>,
        T: AsRef<str>,
    {
        let mut report = BatchReport::default();
        for (name, text) in inputs {
            match self.add(name.as_ref(), text.as_ref()) {
                Ok(file) => report.loaded.push(file.name.clone()),
                Err(e) => report.failed.push(e),
            }
        }
        report
    }

    /// ファイルを削除
    ///
    /// - 表示中ファイルを削除したら残りの先頭を表示中にする
    /// - 表示中より前のファイルを削除したら同じファイルを選び直す（マーカーフィルタは "all" に戻る）
    /// - 空になったら表示中・フィルタ・集計をすべて初期化する
    ///
    /// 読み込まれていない名前は何もしない
    pub fn remove(&mut self, name: &str) -> Option<LoadedFile> {
        let index = self.position(name)?;
        let removed = self.files.remove(index);

        if self.files.is_empty() {
            self.active = None;
            self.marker_filter = MarkerFilter::All;
        } else {
            match self.active {
                Some(active) if active == index => {
                    self.active = Some(0);
                    self.marker_filter = MarkerFilter::All;
                }
                Some(active) if active > index => {
                    self.active = Some(active - 1);
                    self.marker_filter = MarkerFilter::All;
                }
                _ => {}
            }
        }

        tracing::debug!(file = name, remaining = self.files.len(), "ファイルを削除");
        self.refresh();
        Some(removed)
    }

    /// 表示中のファイルを切り替える（マーカーフィルタは "all" に戻る）
    pub fn select_active(&mut self, name: &str) -> Result<&LoadedFile> {
        let index = self
            .position(name)
            .ok_or_else(|| LoadError::NotFound { name: name.to_string() })?;
        self.active = Some(index);
        self.marker_filter = MarkerFilter::All;
        self.refresh();
        tracing::debug!(file = name, "表示中ファイルを変更");
        Ok(&self.files[index])
    }

    /// マーカーフィルタを設定
    pub fn set_marker_filter(&mut self, filter: impl Into<MarkerFilter>) {
        self.marker_filter = filter.into();
    }

    pub fn marker_filter(&self) -> &MarkerFilter {
        &self.marker_filter
    }

    /// すべてのファイルと導出データを破棄
    pub fn clear(&mut self) {
        self.files.clear();
        self.active = None;
        self.marker_filter = MarkerFilter::All;
        self.refresh();
    }

    pub fn files(&self) -> &[LoadedFile] {
        &self.files
    }

    pub fn get(&self, name: &str) -> Option<&LoadedFile> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// 表示中のファイル
    pub fn active(&self) -> Option<&LoadedFile> {
        self.active.and_then(|i| self.files.get(i))
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// 全ファイルのレコード（追加順 → レコード順）
    pub fn merged_records(&self) -> impl Iterator<Item = &InspectionRecord> + '_ {
        self.files.iter().flat_map(|f| f.records.iter())
    }

    /// 全ファイル合計の集計
    pub fn corpus_summary(&self) -> Summary {
        summarize(self.merged_records())
    }

    /// 表示中ファイルの集計
    pub fn stats(&self) -> &Summary {
        &self.derived.stats
    }

    /// 日別集計（新しい日付順）
    pub fn daily_stats(&self) -> &[DailyStat] {
        &self.derived.daily_stats
    }

    /// 表示中ファイルのマーカー一覧
    pub fn markers(&self) -> &[String] {
        &self.derived.markers
    }

    /// 表示中ファイルのレコードをマーカーフィルタで絞り込んだもの
    pub fn filtered_records(&self) -> Vec<&InspectionRecord> {
        match self.active() {
            Some(file) => apply_filter(&file.records, &self.marker_filter),
            None => Vec::new(),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.files.iter().position(|f| f.name == name)
    }

    fn reject(&self, err: LoadError) -> LoadError {
        tracing::warn!(file = err.file_name(), "読み込みをスキップ: {}", err);
        err
    }

    /// 導出データを現在のファイル集合から作り直す
    fn refresh(&mut self) {
        let active_records: &[InspectionRecord] = match self.active() {
            Some(file) => &file.records,
            None => &[],
        };
        self.derived = Derived {
            stats: summarize(active_records),
            daily_stats: daily_stats(&self.files),
            markers: distinct_markers(active_records),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filename::FilenameMatcher;
    use crate::types::FileMetadata;

    const TWO_RECORDS: &str = r#"LOG [
        {"Marker": "M1", "ResultHole_OK": true, "ResultX_OK": true, "ResultY_OK": true},
        {"Marker": "M1", "ResultHole_OK": false, "ResultX_OK": true, "ResultY_OK": true}
    ]"#;

    const MIXED_MARKERS: &str = r#"[
        {"Marker": "M1", "ResultHole_OK": true, "ResultX_OK": true, "ResultY_OK": true},
        {"Marker": "M2", "ResultHole_OK": true, "ResultX_OK": false, "ResultY_OK": true},
        {"Marker": "M2", "ResultHole_OK": true, "ResultX_OK": true, "ResultY_OK": true}
    ]"#;

    fn names(store: &FileStore) -> Vec<&str> {
        store.files().iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_add_first_file_becomes_active() {
        let mut store = FileStore::new();
        let file = store.add("060520250805DA_All.log", TWO_RECORDS).unwrap();
        assert_eq!(file.metadata.surface, "DA");
        assert_eq!(file.records.len(), 2);

        assert_eq!(store.active().map(|f| f.name.as_str()), Some("060520250805DA_All.log"));
        let stats = store.stats();
        assert_eq!((stats.total, stats.passed, stats.failed), (2, 1, 1));
        assert_eq!(stats.failure_rate, 50.0);
        assert_eq!(store.markers(), ["M1".to_string()]);
        assert_eq!(store.daily_stats().len(), 1);
    }

    #[test]
    fn test_second_add_keeps_active() {
        let mut store = FileStore::new();
        store.add("a.log", TWO_RECORDS).unwrap();
        store.add("b.log", MIXED_MARKERS).unwrap();
        assert_eq!(store.active().unwrap().name, "a.log");
        assert_eq!(store.stats().total, 2);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut store = FileStore::new();
        store.add("a.log", TWO_RECORDS).unwrap();
        let err = store.add("a.log", MIXED_MARKERS).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateFile { ref name } if name == "a.log"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a.log").unwrap().records.len(), 2);
    }

    #[test]
    fn test_parse_errors_carry_name() {
        let mut store = FileStore::new();
        let err = store.add("empty.log", "no data").unwrap_err();
        assert!(matches!(err, LoadError::NoEmbeddedArray { .. }));
        assert_eq!(err.file_name(), "empty.log");

        let err = store.add("broken.log", "[{oops}]").unwrap_err();
        assert!(matches!(err, LoadError::MalformedArray { .. }));
        assert!(store.is_empty());
        assert!(store.active().is_none());
    }

    #[test]
    fn test_unrecognized_name_still_loads() {
        let mut store = FileStore::new();
        store.add("060520250805DA_All.log", TWO_RECORDS).unwrap();
        store.add("manual_export.txt", MIXED_MARKERS).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.corpus_summary().total, 5);
        assert_eq!(store.daily_stats().len(), 1);
        assert_eq!(store.daily_stats()[0].total, 2);
    }

    #[test]
    fn test_merged_records_order() {
        let mut store = FileStore::new();
        store.add("b.log", MIXED_MARKERS).unwrap();
        store.add("a.log", TWO_RECORDS).unwrap();
        let markers: Vec<String> = store
            .merged_records()
            .filter_map(|r| r.marker().map(|m| m.into_owned()))
            .collect();
        assert_eq!(markers, vec!["M1", "M2", "M2", "M1", "M1"]);
    }

    #[test]
    fn test_add_batch_isolates_failures() {
        let mut store = FileStore::new();
        let report = store.add_batch(vec![
            ("a.log", TWO_RECORDS),
            ("bad.log", "nothing"),
            ("a.log", TWO_RECORDS),
            ("c.log", MIXED_MARKERS),
        ]);
        assert_eq!(report.loaded, vec!["a.log", "c.log"]);
        assert_eq!(report.failed.len(), 2);
        assert_eq!(report.failed[0].file_name(), "bad.log");
        assert!(matches!(report.failed[1], LoadError::DuplicateFile { .. }));
        assert!(!report.is_clean());
        assert_eq!(names(&store), vec!["a.log", "c.log"]);
    }

    #[test]
    fn test_select_active_resets_marker() {
        let mut store = FileStore::new();
        store.add("a.log", TWO_RECORDS).unwrap();
        store.add("b.log", MIXED_MARKERS).unwrap();

        store.set_marker_filter("M1");
        assert_eq!(store.filtered_records().len(), 2);

        store.select_active("b.log").unwrap();
        assert_eq!(store.marker_filter(), &MarkerFilter::All);
        assert_eq!(store.filtered_records().len(), 3);
        assert_eq!(store.stats().total, 3);
        assert_eq!(store.markers(), ["M1".to_string(), "M2".to_string()]);

        store.set_marker_filter("M2");
        assert_eq!(store.filtered_records().len(), 2);
    }

    #[test]
    fn test_select_unknown() {
        let mut store = FileStore::new();
        store.add("a.log", TWO_RECORDS).unwrap();
        let err = store.select_active("zzz.log").unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
        assert_eq!(store.active().unwrap().name, "a.log");
    }

    #[test]
    fn test_remove_only_file_resets_everything() {
        let mut store = FileStore::new();
        store.add("060520250805DA_All.log", TWO_RECORDS).unwrap();
        store.set_marker_filter("M1");

        let removed = store.remove("060520250805DA_All.log").unwrap();
        assert_eq!(removed.name, "060520250805DA_All.log");

        assert!(store.is_empty());
        assert!(store.active().is_none());
        assert_eq!(store.stats(), &Summary::default());
        assert!(store.daily_stats().is_empty());
        assert!(store.filtered_records().is_empty());
        assert!(store.markers().is_empty());
        assert_eq!(store.marker_filter(), &MarkerFilter::All);
    }

    #[test]
    fn test_remove_active_selects_first() {
        let mut store = FileStore::new();
        store.add_batch(vec![("a.log", TWO_RECORDS), ("b.log", MIXED_MARKERS), ("c.log", TWO_RECORDS)]);
        store.select_active("b.log").unwrap();
        store.set_marker_filter("M2");

        store.remove("b.log");
        assert_eq!(store.active().unwrap().name, "a.log");
        assert_eq!(store.marker_filter(), &MarkerFilter::All);
        assert_eq!(store.stats().total, 2);
    }

    #[test]
    fn test_remove_before_active_shifts_index() {
        let mut store = FileStore::new();
        store.add_batch(vec![("a.log", TWO_RECORDS), ("b.log", TWO_RECORDS), ("c.log", MIXED_MARKERS)]);
        store.select_active("c.log").unwrap();
        store.set_marker_filter("M2");

        store.remove("a.log");
        assert_eq!(store.active_index(), Some(1));
        assert_eq!(store.active().unwrap().name, "c.log");
        // 選び直しなので絞り込みは解除
        assert_eq!(store.marker_filter(), &MarkerFilter::All);
        assert_eq!(store.filtered_records().len(), 3);
    }

    #[test]
    fn test_remove_after_active_keeps_selection() {
        let mut store = FileStore::new();
        store.add_batch(vec![("a.log", TWO_RECORDS), ("b.log", MIXED_MARKERS)]);
        store.set_marker_filter("M1");
        store.remove("b.log");
        assert_eq!(store.marker_filter(), &MarkerFilter::Marker("M1".into()));
        assert_eq!(store.active().unwrap().name, "a.log");
        assert_eq!(store.corpus_summary().total, 2);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut store = FileStore::new();
        store.add("a.log", TWO_RECORDS).unwrap();
        assert!(store.remove("b.log").is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_daily_stats_follow_mutations() {
        let mut store = FileStore::new();
        store.add("060520250805DA_All.log", TWO_RECORDS).unwrap();
        store.add("070520250900KB_All.log", MIXED_MARKERS).unwrap();
        store.add("060520251400KB_All.log", MIXED_MARKERS).unwrap();

        let dates: Vec<&str> = store.daily_stats().iter().map(|s| s.date.as_str()).collect();
        assert_eq!(dates, vec!["07.05.2025", "06.05.2025"]);
        assert_eq!(store.daily_stats()[1].total, 5);

        store.remove("060520251400KB_All.log");
        assert_eq!(store.daily_stats()[1].total, 2);
        assert!(!store.daily_stats()[1].surfaces.contains_key("KB"));
    }

    #[test]
    fn test_clear() {
        let mut store = FileStore::new();
        store.add("060520250805DA_All.log", TWO_RECORDS).unwrap();
        store.clear();
        assert!(store.is_empty());
        assert!(store.daily_stats().is_empty());
        assert_eq!(store.stats().total, 0);
    }

    /// "LINE<面>_<YYYYMMDD>.log" 形式（時刻なし）
    struct LineMatcher;

    impl FilenameMatcher for LineMatcher {
        fn extract(&self, filename: &str) -> Option<FileMetadata> {
            let rest = filename.strip_prefix("LINE")?;
            let surface = rest.get(..2)?;
            let ymd = rest.get(3..11)?;
            Some(FileMetadata {
                date: format!("{}.{}.{}", ymd.get(6..8)?, ymd.get(4..6)?, ymd.get(..4)?),
                time: String::new(),
                surface: surface.to_string(),
            })
        }
    }

    #[test]
    fn test_custom_extractor_groups_daily_stats() {
        let extractor = FilenameInfoExtractor::default().with_matcher(LineMatcher);
        let mut store = FileStore::with_extractor(extractor);

        store.add("LINEDA_20250506.log", TWO_RECORDS).unwrap();
        store.add("060520251400KB_All.log", MIXED_MARKERS).unwrap();
        store.add("LINEKB_20250507.log", TWO_RECORDS).unwrap();
        store.add("unknown.log", TWO_RECORDS).unwrap();

        assert_eq!(store.get("LINEDA_20250506.log").unwrap().metadata.date, "06.05.2025");

        let daily = store.daily_stats();
        let dates: Vec<&str> = daily.iter().map(|s| s.date.as_str()).collect();
        assert_eq!(dates, vec!["07.05.2025", "06.05.2025"]);
        assert_eq!(daily[1].total, 5);
        assert_eq!(daily[1].surfaces["DA"].total, 2);
        assert_eq!(daily[1].surfaces["KB"].total, 3);

        // 標準の抽出器では日別集計に入らない
        let mut plain = FileStore::new();
        plain.add("LINEDA_20250506.log", TWO_RECORDS).unwrap();
        assert!(plain.daily_stats().is_empty());
    }

    #[test]
    fn test_build_then_insert() {
        let store_extractor = FilenameInfoExtractor::default();
        let file = FileStore::build_file(&store_extractor, "060520250805DA_All.log", TWO_RECORDS).unwrap();
        assert_eq!(file.metadata.date, "06.05.2025");

        let mut store = FileStore::new();
        store.insert(file.clone()).unwrap();
        assert!(matches!(store.insert(file), Err(LoadError::DuplicateFile { .. })));
    }
}
