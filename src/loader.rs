//! ログファイルの一括読み込み
//!
//! 読み込みとパースはrayonで並列に行い、ストアへの追加は入力順に1スレッドで行う。
//! 1ファイルの失敗は記録して残りの読み込みを続ける。

use crate::error::{InaVisionError, Result};
use crate::scanner::LogSource;
use indicatif::{ProgressBar, ProgressStyle};
use ina_vision_common::{FileStore, LoadError, LoadedFile};
use rayon::prelude::*;

/// 一括読み込みの結果
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<String>,
    pub failed: Vec<InaVisionError>,
}

/// ログファイルを読み込んでストアに追加
pub fn load_sources(store: &mut FileStore, sources: &[LogSource], show_progress: bool) -> LoadReport {
    let progress = if show_progress && sources.len() > 1 {
        let bar = ProgressBar::new(sources.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let prepared: Vec<Result<LoadedFile>> = {
        let store_ref: &FileStore = store;
        sources
            .par_iter()
            .map(|source| {
                progress.set_message(source.file_name.clone());
                let result = prepare(store_ref, source);
                progress.inc(1);
                result
            })
            .collect()
    };
    progress.finish_and_clear();

    let mut report = LoadReport::default();
    for result in prepared {
        match result.and_then(|file| Ok(store.insert(file)?.name.clone())) {
            Ok(name) => report.loaded.push(name),
            Err(e) => report.failed.push(e),
        }
    }

    tracing::info!(
        loaded = report.loaded.len(),
        failed = report.failed.len(),
        "ログファイルの読み込み完了"
    );
    report
}

fn prepare(store: &FileStore, source: &LogSource) -> Result<LoadedFile> {
    // 読み込み済みなら本文を読まずに弾く
    if store.contains(&source.file_name) {
        return Err(LoadError::DuplicateFile { name: source.file_name.clone() }.into());
    }

    let bytes = std::fs::read(&source.path).map_err(|e| InaVisionError::ReadFile {
        name: source.file_name.clone(),
        source: e,
    })?;
    let text = String::from_utf8_lossy(&bytes);

    let file = FileStore::build_file(store.extractor(), &source.file_name, &text).map_err(|e| {
        tracing::warn!(file = %source.file_name, "読み込みをスキップ: {}", e);
        e
    })?;
    Ok(file)
}
