use std::path::PathBuf;

use clap::Parser;

use request_logger::config::{load_config, AppConfig, LogFormat};
use request_logger::lifecycle::{self, Shutdown};
use request_logger::observability::logging;

#[derive(Parser)]
#[command(name = "request-logger", version)]
#[command(about = "HTTP request logger with rotating CSV storage", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address
    #[arg(long)]
    bind: Option<String>,

    /// Override log.log_dir
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Override log.max_lines
    #[arg(long)]
    max_lines: Option<usize>,

    /// Override observability.log_format
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

impl Cli {
    fn apply(self, config: &mut AppConfig) {
        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(dir) = self.log_dir {
            config.log.log_dir = dir;
        }
        if let Some(max_lines) = self.max_lines {
            config.log.max_lines = max_lines;
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    cli.apply(&mut config);

    logging::init(&config.observability)?;
    tracing::info!("request-logger v{} starting", env!("CARGO_PKG_VERSION"));

    let (server, listener) = lifecycle::start(config).await?;

    let shutdown = Shutdown::new();
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
