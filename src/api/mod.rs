pub mod config;
pub mod handlers;
pub mod models;
pub mod ui;

use actix_web::error::InternalError;
use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::Result;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::api::config::ApiConfig;
use crate::api::handlers::{
    anonymize_file, detect_file, health_check, index, quick_test, StartedAt,
};
use crate::api::models::ErrorResponse;
use crate::pii::PiiService;

/// Registers every route; shared by the server and the integration tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(index)))
        .service(web::resource("/api/detect-file").route(web::post().to(detect_file)))
        .service(web::resource("/api/anonymize-file").route(web::post().to(anonymize_file)))
        .service(web::resource("/api/quick-test").route(web::post().to(quick_test)))
        .service(web::resource("/health").route(web::get().to(health_check)));
}

/// JSON extractor settings: body limit and errors rendered as `ErrorResponse`
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            warn!("Rejected request body: {}", err);
            let response = HttpResponse::BadRequest().json(ErrorResponse::new(err.to_string()));
            InternalError::from_response(err, response).into()
        })
}

/// Starts the API server with the specified configuration
///
/// Loads the detection and anonymization engines once, then shares them
/// read-only with every worker.
#[instrument(skip(config))]
pub async fn start_server(config: ApiConfig) -> Result<()> {
    let host = config.server.host.clone();
    let port = config.server.port;
    info!("Starting PII anonymizer on {}:{}", host, port);

    let service = web::Data::new(PiiService::new(&config.analyzer, &config.anonymizer));
    debug!(
        "Engines ready with {} predefined recognizers",
        service.analyzer().recognizers().len()
    );
    let started_at = web::Data::new(StartedAt(Instant::now()));
    let json_limit = config.server.json_limit_bytes;

    let server_result = HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .app_data(started_at.clone())
            .app_data(json_config(json_limit))
            .configure(configure)
    })
    .bind((host.as_str(), port))
    .map_err(|e| {
        error!("Failed to bind to {}:{}: {}", host, port, e);
        e
    })?
    .run()
    .await;

    if let Err(e) = server_result {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
