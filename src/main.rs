use clap::Parser;
use ina_vision_common::{daily_stats_export, records_export, ExportFile, FileStore};
use ina_vision_rust::{cli, config, error, interactive, loader, logging, report, scanner};
use cli::{Cli, Commands, LoadArgs};
use config::Config;
use error::{InaVisionError, Result};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    logging::init_logging(&config.effective_log_filter(), cli.verbose)?;

    match cli.command {
        Commands::Summary { load, marker, json } => {
            let mut store = open_store(&load, &config, !json)?;
            store.set_marker_filter(marker.as_str());

            if json {
                println!("{}", report::store_to_json(&store)?);
                return Ok(());
            }

            println!("📊 ina-vision - 集計\n");
            println!("{}\n", report::render_file_list(&store));
            println!("{}\n", report::render_summary("全ファイル", &store.corpus_summary()));
            if let Some(active) = store.active() {
                let title = format!("{} (マーカー: {})", active.list_label(), store.marker_filter());
                println!("{}", report::render_summary(&title, store.stats()));
                println!("  表示件数: {}\n", store.filtered_records().len());
            }
            println!("{}", report::render_daily_table(store.daily_stats()));
        }

        Commands::Markers { load } => {
            let store = open_store(&load, &config, true)?;
            if let Some(active) = store.active() {
                println!("🏷 {} のマーカー ({}種類)", active.list_label(), store.markers().len());
            }
            for marker in store.markers() {
                println!("  {}", marker);
            }
        }

        Commands::Export { load, marker, output } => {
            println!("📄 ina-vision - レコード出力\n");
            let mut store = open_store(&load, &config, true)?;
            store.set_marker_filter(marker.as_str());

            let file = records_export(store.filtered_records(), store.marker_filter(), export_date())
                .ok_or_else(|| InaVisionError::NothingToExport(format!("マーカー {}", store.marker_filter())))?;
            let path = write_export(&file, &output_dir(output, &config))?;
            println!("✔ {}件を出力: {}", store.filtered_records().len(), path.display());
        }

        Commands::Daily { load, output } => {
            println!("📅 ina-vision - 日別生産統計\n");
            let store = open_store(&load, &config, true)?;

            println!("{}\n", report::render_daily_table(store.daily_stats()));
            let file = daily_stats_export(store.daily_stats(), export_date())
                .ok_or_else(|| InaVisionError::NothingToExport("日付を含むファイル名のログがありません".into()))?;
            let path = write_export(&file, &output_dir(output, &config))?;
            println!("✔ {}日分を出力: {}", store.daily_stats().len(), path.display());
        }

        Commands::Browse { load } => {
            println!("🔍 ina-vision - 閲覧\n");
            let mut store = open_store(&load, &config, true)?;
            interactive::run_browse(&mut store)?;
        }

        Commands::Config { set_output_dir, set_extensions, show } => {
            let mut config = config;

            if let Some(dir) = set_output_dir {
                config.set_output_dir(dir)?;
                println!("✔ 出力先を設定しました");
            }

            if let Some(extensions) = set_extensions {
                config.set_extensions(extensions)?;
                println!("✔ 拡張子を設定しました");
            }

            if show {
                println!("設定:");
                println!("  拡張子: {}", config.extensions.join(", "));
                println!(
                    "  出力先: {}",
                    config.output_dir.as_ref().map(|d| d.display().to_string()).unwrap_or_else(|| "未設定".into())
                );
                println!("  再帰スキャン: {}", if config.recursive { "有効" } else { "無効" });
                println!("  ログ: {}", config.effective_log_filter());
            }
        }
    }

    Ok(())
}

/// ログを集めてストアを作る
fn open_store(load: &LoadArgs, config: &Config, verbose_output: bool) -> Result<FileStore> {
    let sources = scanner::collect_log_files(&load.inputs, config, load.recursive || config.recursive)?;

    let mut store = FileStore::new();
    let report = loader::load_sources(&mut store, &sources, verbose_output);

    if verbose_output {
        println!("✔ {}件のファイルを読み込み", report.loaded.len());
    }
    for error in &report.failed {
        eprintln!("⚠ {}", error);
    }
    if store.is_empty() {
        return Err(InaVisionError::NothingLoaded);
    }

    if let Some(name) = &load.active {
        store.select_active(name)?;
    }
    Ok(store)
}

fn output_dir(output: Option<PathBuf>, config: &Config) -> PathBuf {
    output
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// 出力ファイル名の日付はUTC
fn export_date() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}

fn write_export(file: &ExportFile, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(&file.file_name);
    std::fs::write(&path, &file.content)?;
    tracing::debug!(path = %path.display(), bytes = file.content.len(), "CSVを書き込み");
    Ok(path)
}
