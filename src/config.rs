use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// 開発用のデフォルトバックエンド
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// 認証バックエンド設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// APIベースURL（空の場合はデフォルト: http://localhost:3000）
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// 認証情報の保存先
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSONファイル
    #[default]
    File,
    /// OSのキーチェーン（利用できない場合はファイルにフォールバック）
    Keyring,
}

/// ストレージ設定
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// 保存先の種類（省略可、デフォルト: file）
    #[serde(default)]
    pub backend: StorageBackend,

    /// ファイルのパス（省略可、デフォルト: 設定ディレクトリ下の magic-link/storage.json）
    #[serde(default)]
    pub path: Option<String>,
}

/// ログ設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// ログレベル（省略可、デフォルト: info）
    #[serde(default = "default_log_level")]
    pub level: String,

    /// ログファイルのパス（省略時は標準エラー出力）
    #[serde(default)]
    pub file_path: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_path: None,
        }
    }
}

/// メイン設定構造体
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// 認証バックエンド設定
    #[serde(default)]
    pub backend: BackendConfig,

    /// ストレージ設定
    #[serde(default)]
    pub storage: StorageConfig,

    /// ログ設定
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parsed backend base URL. An empty setting falls back to the local development server.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let raw = self.backend.base_url.trim();
        let raw = if raw.is_empty() { DEFAULT_BASE_URL } else { raw };

        let url = Url::parse(raw).map_err(|e| ConfigError::ValidationError {
            reason: format!("invalid backend.base_url {:?}: {}", raw, e),
        })?;

        if url.cannot_be_a_base() {
            return Err(ConfigError::ValidationError {
                reason: format!("backend.base_url {:?} cannot carry a path", raw),
            });
        }

        Ok(url)
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage.backend
    }

    pub fn storage_path(&self) -> Option<&str> {
        self.storage.path.as_deref()
    }

    pub fn log_level(&self) -> &str {
        &self.logging.level
    }

    pub fn log_file_path(&self) -> &Option<String> {
        &self.logging.file_path
    }
}

/// 設定ファイルのパスを取得
pub fn config_file_path() -> PathBuf {
    let mut path = dirs::config_dir()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    path.push("magic-link");
    path.push("config.toml");
    path
}

/// 設定ファイルを読み込む
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_file_path())
}

/// 指定パスの設定ファイルを読み込む（存在しない場合はデフォルト設定）
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let contents = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    Ok(config)
}

/// 設定ファイルを保存する
pub fn save_config(config: &Config) -> Result<(), ConfigError> {
    save_config_to(config, &config_file_path())
}

pub fn save_config_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    // 設定ディレクトリが存在しない場合は作成
    if let Some(parent_dir) = path.parent()
        && !parent_dir.as_os_str().is_empty()
        && !parent_dir.exists()
    {
        fs::create_dir_all(parent_dir).map_err(|e| ConfigError::WriteError { source: e })?;
    }

    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents).map_err(|e| ConfigError::WriteError { source: e })?;
    Ok(())
}
