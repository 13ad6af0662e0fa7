//! tracingの初期化

use crate::error::{InaVisionError, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// stderrへのログ出力を初期化
///
/// `verbose` なら debug、それ以外は設定（または `INA_VISION_LOG`）のフィルタを使う
pub fn init_logging(filter: &str, verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| InaVisionError::Config(format!("ログ初期化エラー: {}", e)))
}
