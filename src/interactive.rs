//! 対話式閲覧モジュール
//!
//! 読み込んだファイルの切り替え・マーカー絞り込み・ファイル削除を
//! メニューから繰り返し行う。

use crate::error::{InaVisionError, Result};
use crate::report;
use dialoguer::{Confirm, Select};
use ina_vision_common::{FileStore, ALL_MARKERS};

/// メニュー操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseAction {
    /// 表示するファイルを切り替え
    SelectFile,
    /// マーカーで絞り込み
    FilterMarker,
    /// レコードを表示
    ShowRecords,
    /// 日別生産統計を表示
    ShowDaily,
    /// ファイルを一覧から外す
    RemoveFile,
    /// 終了
    Quit,
}

impl BrowseAction {
    pub const ALL: [BrowseAction; 6] = [
        BrowseAction::SelectFile,
        BrowseAction::FilterMarker,
        BrowseAction::ShowRecords,
        BrowseAction::ShowDaily,
        BrowseAction::RemoveFile,
        BrowseAction::Quit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BrowseAction::SelectFile => "ファイルを切り替え",
            BrowseAction::FilterMarker => "マーカーで絞り込み",
            BrowseAction::ShowRecords => "レコードを表示",
            BrowseAction::ShowDaily => "日別生産統計",
            BrowseAction::RemoveFile => "ファイルを外す",
            BrowseAction::Quit => "終了",
        }
    }
}

/// マーカー選択肢（先頭は全件）
pub fn marker_choices(store: &FileStore) -> Vec<String> {
    std::iter::once(ALL_MARKERS.to_string())
        .chain(store.markers().iter().cloned())
        .collect()
}

/// 現在の表示状態を1行で
pub fn status_line(store: &FileStore) -> String {
    match store.active() {
        Some(file) => format!(
            "表示中: {} / マーカー: {} / {}件中 {}件",
            if file.metadata.is_available() { file.metadata.label() } else { file.name.clone() },
            store.marker_filter(),
            file.record_count(),
            store.filtered_records().len()
        ),
        None => "読み込まれたファイルがありません".to_string(),
    }
}

/// メニューを表示して閲覧を続ける
pub fn run_browse(store: &mut FileStore) -> Result<()> {
    loop {
        if store.is_empty() {
            println!("読み込まれたファイルがなくなりました");
            return Ok(());
        }

        println!("\n{}", status_line(store));
        println!("{}", report::render_summary("表示中ファイルの集計", store.stats()));

        let labels: Vec<&str> = BrowseAction::ALL.iter().map(|a| a.label()).collect();
        let choice = Select::new()
            .with_prompt("操作")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(cli_error)?;

        match BrowseAction::ALL[choice] {
            BrowseAction::SelectFile => {
                let names: Vec<String> = store.files().iter().map(|f| f.list_label()).collect();
                let index = Select::new()
                    .with_prompt("ファイル")
                    .items(&names)
                    .default(store.active_index().unwrap_or(0))
                    .interact()
                    .map_err(cli_error)?;
                let name = store.files()[index].name.clone();
                store.select_active(&name)?;
            }
            BrowseAction::FilterMarker => {
                let choices = marker_choices(store);
                let current = choices
                    .iter()
                    .position(|m| m == store.marker_filter().as_str())
                    .unwrap_or(0);
                let index = Select::new()
                    .with_prompt("マーカー")
                    .items(&choices)
                    .default(current)
                    .interact()
                    .map_err(cli_error)?;
                store.set_marker_filter(choices[index].as_str());
            }
            BrowseAction::ShowRecords => {
                println!("{}", report::render_records(&store.filtered_records()));
            }
            BrowseAction::ShowDaily => {
                println!("{}", report::render_daily_table(store.daily_stats()));
            }
            BrowseAction::RemoveFile => {
                let names: Vec<String> = store.files().iter().map(|f| f.list_label()).collect();
                let index = Select::new()
                    .with_prompt("外すファイル")
                    .items(&names)
                    .default(0)
                    .interact()
                    .map_err(cli_error)?;
                let name = store.files()[index].name.clone();
                let confirmed = Confirm::new()
                    .with_prompt(format!("{} を一覧から外しますか？", name))
                    .default(false)
                    .interact()
                    .map_err(cli_error)?;
                if confirmed && store.remove(&name).is_some() {
                    println!("  → {} を外しました", name);
                }
            }
            BrowseAction::Quit => return Ok(()),
        }
    }
}

fn cli_error(e: dialoguer::Error) -> InaVisionError {
    InaVisionError::CliExecution(e.to_string())
}
