use ina_vision_common::LoadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InaVisionError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("パスが見つかりません: {0}")]
    PathNotFound(String),

    #[error(".log または .txt のファイルを指定してください: {0}")]
    NoValidFiles(String),

    #[error("{name} を読み込めません: {source}")]
    ReadFile {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("ファイル読み込みエラー: {0}")]
    Load(#[from] LoadError),

    #[error("読み込まれたファイルがありません")]
    NothingLoaded,

    #[error("出力するデータがありません: {0}")]
    NothingToExport(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("CLI実行エラー: {0}")]
    CliExecution(String),
}

pub type Result<T> = std::result::Result<T, InaVisionError>;
