use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use pii_anonymizer::api::config::ApiConfig;
use pii_anonymizer::api::start_server;
use pii_anonymizer::utils::logger::init_logger;

/// Web form for detecting and anonymizing PII in files and text
#[derive(Debug, Parser)]
#[command(name = "pii_anonymizer", version, about)]
struct Args {
    /// Config file (TOML, JSON or YAML); defaults to ./pii_anonymizer.* if present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Write logs to a timestamped file in this directory
    #[arg(long)]
    log_dir: Option<String>,
}

#[actix_web::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Configure API
    let mut config = ApiConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.log_dir.is_some() {
        config.logging.dir = args.log_dir;
    }

    init_logger(&config.logging)?;

    // Start server
    start_server(config).await?;

    Ok(())
}
