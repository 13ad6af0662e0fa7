use crate::error::{InaVisionError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// ログフィルタを上書きする環境変数
pub const LOG_ENV: &str = "INA_VISION_LOG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 読み込み対象の拡張子
    pub extensions: Vec<String>,
    /// CSVの出力先（未設定ならカレント）
    pub output_dir: Option<PathBuf>,
    /// フォルダ指定時にサブフォルダも読む
    pub recursive: bool,
    /// tracingのフィルタ（例: "info", "ina_vision=debug"）
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| InaVisionError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("ina-vision").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            extensions: vec!["log".into(), "txt".into()],
            output_dir: None,
            recursive: false,
            log_filter: "info".into(),
        }
    }

    /// 環境変数を優先したログフィルタ
    pub fn effective_log_filter(&self) -> String {
        std::env::var(LOG_ENV).unwrap_or_else(|_| self.log_filter.clone())
    }

    /// 読み込み対象の拡張子か（大文字小文字は区別しない）
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)))
    }

    pub fn set_output_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.output_dir = Some(dir);
        self.save()
    }

    pub fn set_extensions(&mut self, extensions: Vec<String>) -> Result<()> {
        let extensions: Vec<String> = extensions
            .into_iter()
            .map(|e| e.trim().trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .collect();
        if extensions.is_empty() {
            return Err(InaVisionError::Config("拡張子を1つ以上指定してください".into()));
        }
        self.extensions = extensions;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_extensions() {
        let config = Config::default();
        assert!(config.accepts(Path::new("060520250805DA_All.log")));
        assert!(config.accepts(Path::new("export.TXT")));
        assert!(!config.accepts(Path::new("photo.jpg")));
        assert!(!config.accepts(Path::new("no_extension")));
    }

    #[test]
    fn test_load_missing_returns_default() {
        let dir = tempdir().expect("Failed to create temp dir");
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.extensions, vec!["log", "txt"]);
        assert!(!config.recursive);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            extensions: vec!["log".into()],
            output_dir: Some(PathBuf::from("/tmp/out")),
            recursive: true,
            log_filter: "debug".into(),
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.extensions, vec!["log"]);
        assert_eq!(loaded.output_dir, Some(PathBuf::from("/tmp/out")));
        assert!(loaded.recursive);
        assert_eq!(loaded.log_filter, "debug");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"recursive": true}"#).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(loaded.recursive);
        assert_eq!(loaded.extensions, vec!["log", "txt"]);
        assert_eq!(loaded.log_filter, "info");
    }
}
