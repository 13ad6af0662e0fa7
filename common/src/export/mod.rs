//! エクスポート（CLI/ホスト共通）
//!
//! 表示中のレコードと日別集計を区切りテキストに変換する。
//! ファイル書き込みは呼び出し側で行う。

pub mod csv_core;

pub use csv_core::{
    daily_stats_export, daily_stats_file_name, daily_stats_to_delimited_text, records_export,
    records_file_name, to_delimited_text, ExportFile, DAILY_STATS_HEADER,
};
