use crate::auth::MagicLinkClient;
use crate::cli::{Cli, Commands, handle_command};
use crate::config::{Config, config_file_path, save_config, save_config_to};
use crate::errors::{AppError, ConfigError};
use crate::storage::open_store;
use crate::traits::{ConfigProvider, DefaultConfigProvider, DefaultMessageHandler, MessageHandler};
use crate::transport::HttpTransport;
use std::path::Path;

/// Main application structure
pub struct Application;

impl Application {
    /// Run one CLI command with default implementations
    pub async fn run(cli: Cli) -> Result<(), AppError> {
        let config_provider = DefaultConfigProvider {
            path: cli.config.clone(),
        };
        Self::run_with_deps(cli, &config_provider, &DefaultMessageHandler).await
    }

    /// Run one CLI command with dependency injection
    pub async fn run_with_deps(
        cli: Cli,
        config_provider: &dyn ConfigProvider,
        message_handler: &dyn MessageHandler,
    ) -> Result<(), AppError> {
        let command = match cli.command {
            Commands::Init { force } => {
                return init_config(cli.config.as_deref(), force, message_handler);
            }
            command => command,
        };

        let mut config = config_provider.load_config()?;
        if let Some(level) = cli.log_level {
            config.logging.level = level;
        }

        // Set up logging first so we can log setup process
        let _guard = crate::logger::setup_logging(&config);

        let store = open_store(&config)?;
        let transport = HttpTransport::new(config.base_url()?)?;
        tracing::debug!("Using auth backend at {}", transport.base_url());
        let client = MagicLinkClient::new(transport, store);

        handle_command(command, &client, message_handler).await
    }
}

/// Writes the default configuration to `path`, or to the standard location
fn init_config(
    path: Option<&Path>,
    force: bool,
    message_handler: &dyn MessageHandler,
) -> Result<(), AppError> {
    let target = path.map(Path::to_path_buf).unwrap_or_else(config_file_path);
    if target.exists() && !force {
        return Err(ConfigError::ValidationError {
            reason: format!(
                "{} already exists, pass --force to overwrite it",
                target.display()
            ),
        }
        .into());
    }

    let config = Config::default();
    match path {
        Some(path) => save_config_to(&config, path)?,
        None => save_config(&config)?,
    }

    message_handler.print(&format!("Wrote default configuration to {}", target.display()));
    Ok(())
}
