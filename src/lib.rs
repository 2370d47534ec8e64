pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod errors;
pub mod keyring_store;
pub mod logger;
pub mod models;
pub mod social_login;
pub mod storage;
pub mod traits;
pub mod transport;

pub use app::Application;
pub use auth::MagicLinkClient;
pub use cli::Cli;
pub use config::{Config, load_config};
pub use errors::{AppError, AuthError, ConfigError, StorageError, TransportError};
pub use models::{Credential, MockUser, TokenPayload};
pub use social_login::{Control, LoginView, Region, SocialLoginWidget};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use traits::{ConfigProvider, DefaultConfigProvider, DefaultMessageHandler, MessageHandler};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
