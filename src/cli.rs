use crate::auth::{MagicLinkClient, decode_payload};
use crate::errors::AppError;
use crate::social_login::{Control, SocialLoginWidget, TerminalView};
use crate::storage::KeyValueStore;
use crate::traits::MessageHandler;
use crate::transport::Transport;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Magic Link - sign in by email link and sync with the review backend
#[derive(Parser)]
#[command(name = "magic-link")]
#[command(about = "A magic-link authentication client for the review backend", long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Logging level (overrides the config file)
    #[arg(short, long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Ask the backend to email a magic link
    Request {
        /// Email address to send the link to
        email: String,
    },

    /// Exchange a magic-link token for a session
    Verify {
        /// Token taken from the magic link
        token: String,
    },

    /// Show the current session
    Status,

    /// Forget the current session
    Logout,

    /// Upload reviews from a JSON file ("-" reads stdin)
    Sync {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Fetch the signed-in user's data
    Data,

    /// Mock GitHub login
    Github {
        #[command(subcommand)]
        action: GithubAction,
    },
}

#[derive(Subcommand, Clone, Copy)]
pub enum GithubAction {
    /// Log in with the placeholder GitHub user
    Login,
    /// Log out of the mock GitHub session
    Logout,
    /// Show the mock GitHub session
    Status,
}

pub async fn handle_command<T, S>(
    command: Commands,
    client: &MagicLinkClient<T, S>,
    messages: &dyn MessageHandler,
) -> Result<(), AppError>
where
    T: Transport,
    S: KeyValueStore,
{
    match command {
        Commands::Init { .. } => {
            return Err(AppError::Generic {
                message: "init runs before a session is opened".to_string(),
            });
        }
        Commands::Request { email } => {
            let response = client.request_magic_link(&email).await?;
            print_json(messages, &response);
            messages.print(&format!("Magic link sent to {}", email));
        }
        Commands::Verify { token } => {
            client.verify_magic_link(&token).await?;
            match client.get_auth() {
                Some(credential) => messages.print(&format!("Signed in as {}", credential.email)),
                None => messages.eprint(
                    "Backend accepted the link but returned a session token that is expired or unreadable",
                ),
            }
        }
        Commands::Status => handle_status_command(client, messages),
        Commands::Logout => {
            client.logout();
            messages.print("Signed out");
        }
        Commands::Sync { file } => {
            let reviews = read_reviews(&file)?;
            let response = client.sync_reviews(&reviews).await?;
            print_json(messages, &response);
        }
        Commands::Data => {
            let response = client.get_user_data().await?;
            print_json(messages, &response);
        }
        Commands::Github { action } => handle_github_command(action, client.store(), messages),
    }

    Ok(())
}

fn handle_status_command<T, S>(client: &MagicLinkClient<T, S>, messages: &dyn MessageHandler)
where
    T: Transport,
    S: KeyValueStore,
{
    let Some(credential) = client.get_auth() else {
        messages.print("Not signed in");
        return;
    };

    messages.print(&format!("Signed in as {}", credential.email));

    let expires_at = decode_payload(credential.token.expose_secret())
        .ok()
        .and_then(|payload| payload.exp)
        .and_then(|exp| DateTime::<Utc>::from_timestamp(exp as i64, 0));
    match expires_at {
        Some(expires_at) => messages.print(&format!("Session expires at {}", expires_at.to_rfc3339())),
        None => messages.print("Session has no expiry"),
    }
}

fn handle_github_command<S: KeyValueStore>(
    action: GithubAction,
    store: &S,
    messages: &dyn MessageHandler,
) {
    let mut widget = SocialLoginWidget::new(store, TerminalView::new(messages));
    match action {
        GithubAction::Login => {
            widget.handle(Control::Login);
        }
        GithubAction::Logout => {
            widget.handle(Control::Logout);
        }
        // construction already painted the current state
        GithubAction::Status => {}
    }
}

fn read_reviews(file: &Path) -> Result<Value, AppError> {
    let contents = if file.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| AppError::Generic {
                message: format!("Failed to read reviews from stdin: {}", e),
            })?;
        buffer
    } else {
        std::fs::read_to_string(file).map_err(|e| AppError::Generic {
            message: format!("Failed to read {}: {}", file.display(), e),
        })?
    };

    serde_json::from_str(&contents).map_err(|e| AppError::Generic {
        message: format!("Reviews are not valid JSON: {}", e),
    })
}

fn print_json(messages: &dyn MessageHandler, value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(pretty) => messages.print(&pretty),
        Err(_) => messages.print(&value.to_string()),
    }
}
