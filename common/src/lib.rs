//! Ina-Vision Common Library
//!
//! 検査ログの読み込み・集計エンジン（CLIとホストで共有）。
//! ファイルシステムには触れず、(ファイル名, 本文) の組だけを受け取る。

pub mod types;
pub mod error;
pub mod filename;
pub mod parser;
pub mod store;
pub mod aggregate;
pub mod filter;
pub mod export;

pub use types::{DailyStat, FileMetadata, InspectionRecord, LoadedFile, Summary, SurfaceStat};
pub use error::{LoadError, ParseError, Result};
pub use filename::{extract_file_info, FilenameInfoExtractor, FilenameMatcher, FixedWidthMatcher};
pub use parser::{extract_record_array, parse_records};
pub use store::{BatchReport, FileStore};
pub use aggregate::{daily_stats, summarize};
pub use filter::{distinct_markers, filter_by_marker, MarkerFilter, ALL_MARKERS};
pub use export::{
    daily_stats_export, daily_stats_file_name, daily_stats_to_delimited_text, records_export, records_file_name,
    to_delimited_text, ExportFile,
};
