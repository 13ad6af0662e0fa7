use crate::config::Config;
use crate::error::{InaVisionError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 読み込み対象のログファイル
#[derive(Debug, Clone)]
pub struct LogSource {
    pub path: PathBuf,
    pub file_name: String,
}

impl LogSource {
    fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            path: path.to_path_buf(),
            file_name,
        }
    }
}

/// 指定されたファイル・フォルダからログファイルを集める
///
/// - フォルダは直下のみ（`recursive` ならサブフォルダも）
/// - 対象外の拡張子はスキップ
/// - 1件も見つからなければエラー
pub fn collect_log_files(inputs: &[PathBuf], config: &Config, recursive: bool) -> Result<Vec<LogSource>> {
    let mut sources = Vec::new();

    for input in inputs {
        if !input.exists() {
            return Err(InaVisionError::PathNotFound(input.display().to_string()));
        }

        if input.is_dir() {
            sources.extend(scan_folder(input, config, recursive));
        } else if config.accepts(input) {
            sources.push(LogSource::from_path(input));
        } else {
            tracing::warn!(path = %input.display(), "対象外の拡張子のためスキップ");
        }
    }

    if sources.is_empty() {
        let joined = inputs
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(InaVisionError::NoValidFiles(joined));
    }

    Ok(sources)
}

fn scan_folder(folder: &Path, config: &Config, recursive: bool) -> Vec<LogSource> {
    let max_depth = if recursive { usize::MAX } else { 1 };

    let mut sources: Vec<LogSource> = WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| config.accepts(e.path()))
        .map(|e| LogSource::from_path(e.path()))
        .collect();

    // ファイル名でソート
    sources.sort_by(|a, b| a.file_name.cmp(&b.file_name).then_with(|| a.path.cmp(&b.path)));

    tracing::debug!(folder = %folder.display(), found = sources.len(), "フォルダをスキャン");
    sources
}
