//! マーカーによる絞り込み

use crate::types::InspectionRecord;
use std::collections::HashSet;

/// 「すべて」を表すマーカー値
pub const ALL_MARKERS: &str = "all";

/// マーカーフィルタ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MarkerFilter {
    #[default]
    All,
    Marker(String),
}

impl MarkerFilter {
    pub fn matches(&self, record: &InspectionRecord) -> bool {
        match self {
            MarkerFilter::All => true,
            MarkerFilter::Marker(marker) => record.marker().is_some_and(|m| m == marker.as_str()),
        }
    }

    /// 出力ファイル名などに使う値（"all" またはマーカー）
    pub fn as_str(&self) -> &str {
        match self {
            MarkerFilter::All => ALL_MARKERS,
            MarkerFilter::Marker(marker) => marker,
        }
    }
}

impl From<&str> for MarkerFilter {
    fn from(value: &str) -> Self {
        if value == ALL_MARKERS {
            MarkerFilter::All
        } else {
            MarkerFilter::Marker(value.to_string())
        }
    }
}

impl std::str::FromStr for MarkerFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(MarkerFilter::from(s))
    }
}

impl std::fmt::Display for MarkerFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// マーカーでレコードを絞り込む
///
/// `"all"` なら入力をそのまま（同じ参照・同じ順序で）返す。
/// それ以外は大文字小文字を区別した完全一致。
pub fn filter_by_marker<'a>(records: &'a [InspectionRecord], marker: &str) -> Vec<&'a InspectionRecord> {
    apply_filter(records, &MarkerFilter::from(marker))
}

pub fn apply_filter<'a>(records: &'a [InspectionRecord], filter: &MarkerFilter) -> Vec<&'a InspectionRecord> {
    records.iter().filter(|r| filter.matches(r)).collect()
}

/// レコード中のマーカー一覧（重複除去、初出順）
///
/// マーカーのないレコードは含めない
pub fn distinct_markers(records: &[InspectionRecord]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    records
        .iter()
        .filter_map(|r| r.marker())
        .filter_map(|m| {
            if seen.contains(&*m) {
                None
            } else {
                let m = m.into_owned();
                seen.insert(m.clone());
                Some(m)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records() -> Vec<InspectionRecord> {
        vec![
            InspectionRecord::new(json!({"Marker": "M1", "holeindex": 1})),
            InspectionRecord::new(json!({"Marker": "M2", "holeindex": 2})),
            InspectionRecord::new(json!({"Marker": "m1", "holeindex": 3})),
            InspectionRecord::new(json!({"Marker": "M1", "holeindex": 4})),
            InspectionRecord::new(json!({"holeindex": 5})),
        ]
    }

    #[test]
    fn test_filter_all_is_identity() {
        let records = records();
        let filtered = filter_by_marker(&records, "all");
        assert_eq!(filtered.len(), records.len());
        for (f, r) in filtered.iter().zip(records.iter()) {
            assert!(std::ptr::eq(*f, r));
        }
    }

    #[test]
    fn test_filter_exact_match() {
        let records = records();
        let filtered = filter_by_marker(&records, "M1");
        let holes: Vec<_> = filtered.iter().map(|r| r.hole_index().cloned()).collect();
        assert_eq!(holes, vec![Some(json!(1)), Some(json!(4))]);
    }

    #[test]
    fn test_filter_case_sensitive() {
        let records = records();
        assert_eq!(filter_by_marker(&records, "m1").len(), 1);
        assert!(filter_by_marker(&records, "ALL").is_empty());
    }

    #[test]
    fn test_filter_unknown_marker() {
        assert!(filter_by_marker(&records(), "M9").is_empty());
    }

    #[test]
    fn test_distinct_markers() {
        let markers = distinct_markers(&records());
        assert_eq!(markers, vec!["M1", "M2", "m1"]);
    }

    #[test]
    fn test_distinct_markers_empty() {
        assert!(distinct_markers(&[]).is_empty());
    }

    #[test]
    fn test_marker_filter_parse() {
        assert_eq!("all".parse::<MarkerFilter>().unwrap(), MarkerFilter::All);
        assert_eq!(
            "M1".parse::<MarkerFilter>().unwrap(),
            MarkerFilter::Marker("M1".to_string())
        );
        assert_eq!(MarkerFilter::All.to_string(), "all");
    }
}
