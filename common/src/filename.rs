//! ファイル名からのメタデータ抽出
//!
//! 検査装置のログは `DDMMYYYYHHMM` + 面コード2文字 で始まる名前で出力される
//! （例: `060520250805DA_All.log`）。
//! 命名規則は [`FilenameMatcher`] として差し替え・追加できる。

use crate::types::FileMetadata;
use regex::Regex;

/// ファイル名の命名規則1つ分
pub trait FilenameMatcher: Send + Sync {
    /// 一致すればメタデータを返す
    fn extract(&self, filename: &str) -> Option<FileMetadata>;
}

/// 固定幅の日時 + 面コード形式
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedWidthMatcher;

impl FilenameMatcher for FixedWidthMatcher {
    fn extract(&self, filename: &str) -> Option<FileMetadata> {
        lazy_static::lazy_static! {
            static ref PATTERN: Regex = Regex::new(
                r"^([0-9]{2})([0-9]{2})([0-9]{4})([0-9]{2})([0-9]{2})([A-Z]{2}).*$"
            ).unwrap();
        }

        let caps = PATTERN.captures(filename)?;
        Some(FileMetadata {
            date: format!("{}.{}.{}", &caps[1], &caps[2], &caps[3]),
            time: format!("{}:{}", &caps[4], &caps[5]),
            surface: caps[6].to_string(),
        })
    }
}

/// ファイル名メタデータ抽出器
///
/// 登録順に命名規則を試し、最初に一致したものを採用する。
/// どれにも一致しなければ空のメタデータ（エラーではない）。
pub struct FilenameInfoExtractor {
    matchers: Vec<Box<dyn FilenameMatcher>>,
}

impl FilenameInfoExtractor {
    /// 命名規則なしの抽出器
    pub fn empty() -> Self {
        Self { matchers: Vec::new() }
    }

    /// 命名規則を追加
    pub fn with_matcher<M: FilenameMatcher + 'static>(mut self, matcher: M) -> Self {
        self.matchers.push(Box::new(matcher));
        self
    }

    pub fn extract(&self, filename: &str) -> FileMetadata {
        self.matchers
            .iter()
            .find_map(|m| m.extract(filename))
            .unwrap_or_default()
    }
}

impl Default for FilenameInfoExtractor {
    fn default() -> Self {
        Self::empty().with_matcher(FixedWidthMatcher)
    }
}

impl std::fmt::Debug for FilenameInfoExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilenameInfoExtractor")
            .field("matchers", &self.matchers.len())
            .finish()
    }
}

/// 標準の命名規則でメタデータを抽出
///
/// # Examples
/// ```
/// use ina_vision_common::extract_file_info;
///
/// let info = extract_file_info("060520250805DA_All.log");
/// assert_eq!(info.date, "06.05.2025");
/// assert_eq!(info.time, "08:05");
/// assert_eq!(info.surface, "DA");
/// ```
pub fn extract_file_info(filename: &str) -> FileMetadata {
    FixedWidthMatcher.extract(filename).unwrap_or_default()
}
