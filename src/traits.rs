use crate::config::Config;
use crate::errors::ConfigError;
use std::path::PathBuf;

/// Trait for handling printing messages to console, allowing for testable output
pub trait MessageHandler: Send + Sync {
    fn print(&self, message: &str);
    fn eprint(&self, message: &str);
}

/// Default implementation that calls println!/eprintln!
pub struct DefaultMessageHandler;

impl MessageHandler for DefaultMessageHandler {
    fn print(&self, message: &str) {
        println!("{}", message);
    }

    fn eprint(&self, message: &str) {
        eprintln!("{}", message);
    }
}

/// Trait for configuration loading, allowing for testable configuration
pub trait ConfigProvider: Send + Sync {
    fn load_config(&self) -> Result<Config, ConfigError>;
}

/// Default implementation that loads from the config file, or an explicit path when given
#[derive(Default)]
pub struct DefaultConfigProvider {
    pub path: Option<PathBuf>,
}

impl ConfigProvider for DefaultConfigProvider {
    fn load_config(&self) -> Result<Config, ConfigError> {
        match &self.path {
            Some(path) => crate::config::load_config_from(path),
            None => crate::config::load_config(),
        }
    }
}
