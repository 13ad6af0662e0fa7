use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ina-vision")]
#[command(about = "画像検査ログの集計・日別生産統計ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// ログファイルの読み込み指定（各コマンド共通）
#[derive(Args, Debug, Clone)]
pub struct LoadArgs {
    /// ログファイルまたはフォルダ（複数可）
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// サブフォルダも再帰的にスキャン
    #[arg(short = 'r', long)]
    pub recursive: bool,

    /// 表示するファイル名（省略時は最初に読み込んだファイル）
    #[arg(short, long)]
    pub active: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 読み込んだログの集計を表示
    Summary {
        #[command(flatten)]
        load: LoadArgs,

        /// マーカーで絞り込み（"all" で全件）
        #[arg(short, long, default_value = "all")]
        marker: String,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 表示中ファイルのマーカー一覧
    Markers {
        #[command(flatten)]
        load: LoadArgs,
    },

    /// 表示中ファイルのレコードをCSV出力
    Export {
        #[command(flatten)]
        load: LoadArgs,

        /// マーカーで絞り込み（"all" で全件）
        #[arg(short, long, default_value = "all")]
        marker: String,

        /// 出力ディレクトリ（省略時は設定値またはカレント）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 日別生産統計をCSV出力
    Daily {
        #[command(flatten)]
        load: LoadArgs,

        /// 出力ディレクトリ（省略時は設定値またはカレント）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 対話的にファイル・マーカーを切り替えて閲覧
    Browse {
        #[command(flatten)]
        load: LoadArgs,
    },

    /// 設定を表示/編集
    Config {
        /// CSVの出力先を設定
        #[arg(long)]
        set_output_dir: Option<PathBuf>,

        /// 読み込み対象の拡張子を設定（カンマ区切り）
        #[arg(long, value_delimiter = ',')]
        set_extensions: Option<Vec<String>>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
