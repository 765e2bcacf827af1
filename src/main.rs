use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use basic_reverse_proxy::config::load_config;
use basic_reverse_proxy::lifecycle::{startup, wait_for_signal, Shutdown, StartupError};
use basic_reverse_proxy::observability::logging;

#[derive(Parser)]
#[command(name = "basic-reverse-proxy")]
#[command(about = "Path-prefix reverse proxy with optional HTTP Basic auth", long_about = None)]
struct Cli {
    /// Configuration JSON file
    #[arg(long, default_value = "basic-reverse-proxy.json")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    match run(&cli).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(config = %cli.config.display(), error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<(), StartupError> {
    tracing::info!(config = %cli.config.display(), "basic-reverse-proxy v0.1.0 starting");
    let config = load_config(&cli.config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    startup::run(&config, server_shutdown).await
}
