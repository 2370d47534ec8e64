use clap::Parser;
use magic_link_client::{Application, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = Application::run(cli).await {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
