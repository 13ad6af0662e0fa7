//! エラー型定義

use thiserror::Error;

/// レコードパーサーのエラー
///
/// ファイル名を知らない層のエラー。FileStoreで [`LoadError`] に変換される。
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("レコード配列が見つかりません")]
    NoEmbeddedArray,

    #[error("レコード配列が不正です: {0}")]
    MalformedArray(#[from] serde_json::Error),
}

/// ファイル読み込みエラー
///
/// どのバリアントも対象ファイル名を保持する
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("{name} は既に読み込まれています")]
    DuplicateFile { name: String },

    #[error("{name} にレコード配列が見つかりません")]
    NoEmbeddedArray { name: String },

    #[error("{name} のレコード配列が不正です: {source}")]
    MalformedArray {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{name} は読み込まれていません")]
    NotFound { name: String },
}

impl LoadError {
    /// パーサーエラーにファイル名を付与
    pub fn from_parse(name: &str, err: ParseError) -> Self {
        match err {
            ParseError::NoEmbeddedArray => LoadError::NoEmbeddedArray { name: name.to_string() },
            ParseError::MalformedArray(source) => LoadError::MalformedArray {
                name: name.to_string(),
                source,
            },
        }
    }

    /// 対象ファイル名
    pub fn file_name(&self) -> &str {
        match self {
            LoadError::DuplicateFile { name }
            | LoadError::NoEmbeddedArray { name }
            | LoadError::MalformedArray { name, .. }
            | LoadError::NotFound { name } => name,
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, LoadError>;
