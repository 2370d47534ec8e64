use keyring;
use thiserror::Error;

/// アプリケーション全体のエラー型
#[derive(Error, Debug)]
pub enum AppError {
    /// 認証関連エラー
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// ストレージ関連エラー
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// 設定関連エラー
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP通信関連エラー
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// 汎用エラー
    #[error("{message}")]
    Generic { message: String },
}

/// 認証関連エラー
///
/// Display yields the bare message so callers can surface the backend's
/// `error` field verbatim.
#[derive(Error, Debug)]
pub enum AuthError {
    /// マジックリンク送信要求の失敗
    #[error("{message}")]
    RequestFailed { message: String },

    /// マジックリンク検証の失敗
    #[error("{message}")]
    VerificationFailed { message: String },

    /// 有効な認証情報がない
    #[error("Not authenticated")]
    NotAuthenticated,

    /// レビュー同期の失敗
    #[error("{message}")]
    SyncFailed { message: String },

    /// ユーザーデータ取得の失敗
    #[error("{message}")]
    FetchFailed { message: String },

    /// 認証情報の永続化エラー
    #[error("Failed to persist credential: {source}")]
    Storage {
        #[source]
        source: StorageError,
    },
}

/// ストレージ関連エラー
#[derive(Error, Debug)]
pub enum StorageError {
    /// ファイル入出力エラー
    #[error("Storage I/O error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },

    /// JSONパースエラー
    #[error("Storage JSON error: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },

    /// Keyring操作エラー
    #[error("Keyring error: {source}")]
    Keyring {
        #[source]
        source: keyring::Error,
    },

    /// ロック取得エラー
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// HTTP通信関連エラー
#[derive(Error, Debug)]
pub enum TransportError {
    /// HTTPリクエストエラー
    #[error("HTTP request failed: {source}")]
    RequestError {
        #[source]
        source: reqwest::Error,
    },

    /// バックエンドに接続できない
    #[error("Backend unreachable: {reason}")]
    Unreachable { reason: String },

    /// URL組み立てエラー
    #[error("Invalid endpoint URL: {source}")]
    InvalidUrl {
        #[source]
        source: url::ParseError,
    },

    /// クライアント初期化エラー
    #[error("Failed to create HTTP client: {reason}")]
    ClientInit { reason: String },
}

/// 設定関連エラー
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 設定ファイル読み込みエラー
    #[error("Failed to load config file: {source}")]
    LoadError {
        #[source]
        source: std::io::Error,
    },

    /// 設定ファイルパースエラー
    #[error("Failed to parse config file: {source}")]
    ParseError {
        #[source]
        source: toml::de::Error,
    },

    /// 設定ファイルシリアライズエラー
    #[error("Failed to serialize config: {source}")]
    SerializeError {
        #[source]
        source: toml::ser::Error,
    },

    /// 設定バリデーションエラー
    #[error("Configuration validation failed: {reason}")]
    ValidationError { reason: String },

    /// 設定ファイル書き込みエラー
    #[error("Failed to write config file: {source}")]
    WriteError {
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        StorageError::Io { source: error }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(error: serde_json::Error) -> Self {
        StorageError::Json { source: error }
    }
}

impl From<keyring::Error> for StorageError {
    fn from(error: keyring::Error) -> Self {
        StorageError::Keyring { source: error }
    }
}

impl From<StorageError> for AuthError {
    fn from(error: StorageError) -> Self {
        AuthError::Storage { source: error }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        TransportError::RequestError { source: error }
    }
}

impl From<url::ParseError> for TransportError {
    fn from(error: url::ParseError) -> Self {
        TransportError::InvalidUrl { source: error }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(error: std::io::Error) -> Self {
        ConfigError::LoadError { source: error }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(error: toml::de::Error) -> Self {
        ConfigError::ParseError { source: error }
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(error: toml::ser::Error) -> Self {
        ConfigError::SerializeError { source: error }
    }
}
