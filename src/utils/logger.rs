use anyhow::Result;
use chrono::Local;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::api::config::LoggingConfig;

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_logger(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_target(false);

    match &config.dir {
        Some(log_dir) => {
            // Create log directory if it doesn't exist
            if !Path::new(log_dir).exists() {
                fs::create_dir_all(log_dir)?;
            }

            // Create log file with timestamp
            let timestamp = Local::now().format("%Y%m%d_%H%M%S");
            let log_file = format!("{}/pii_anonymizer_{}.log", log_dir, timestamp);

            let subscriber = builder
                .with_ansi(false)
                .with_writer(Mutex::new(fs::File::create(log_file)?))
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        None => tracing::subscriber::set_global_default(builder.finish())?,
    }

    info!("Logger initialized");
    Ok(())
}
