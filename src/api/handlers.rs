use actix_web::{web, HttpResponse, Responder};
use sanitize_filename::sanitize;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::api::models::{
    AnonymizeFileResponse, Download, ErrorResponse, FileRequest, HealthStatus, ResultResponse,
    TextRequest,
};
use crate::api::ui::INDEX_HTML;
use crate::files::{process_file, FileOutcome, FileUpload, Mode};
use crate::pii::{PiiService, Whitelist};

/// When the server came up, for /health
#[derive(Debug, Clone, Copy)]
pub struct StartedAt(pub Instant);

/// Serves the three-tab form
pub async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

/// Decodes the upload and runs the file dispatcher on the blocking pool.
///
/// Transport problems (bad base64, a crashed worker) come back as an error
/// response; everything else, failures included, is display text.
async fn run_file_action(
    request: FileRequest,
    service: web::Data<PiiService>,
    mode: Mode,
) -> Result<FileOutcome, HttpResponse> {
    let upload: Option<FileUpload> = match request.file.as_ref().map(|f| f.decode()).transpose() {
        Ok(upload) => upload,
        Err(e) => {
            warn!("Rejected upload: {:#}", e);
            return Err(HttpResponse::BadRequest().json(ErrorResponse::new(format!("{:#}", e))));
        }
    };

    let FileRequest { custom_regex, whitelist, .. } = request;
    tokio::task::spawn_blocking(move || {
        process_file(
            &service,
            upload.as_ref(),
            custom_regex.as_deref(),
            whitelist.as_deref(),
            mode,
        )
    })
    .await
    .map_err(|e| {
        error!("File {} task failed: {}", mode, e);
        HttpResponse::InternalServerError().json(ErrorResponse::new("Internal error while processing file."))
    })
}

/// Detect PII in an uploaded file; returns only the display text
#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn detect_file(
    request: web::Json<FileRequest>,
    service: web::Data<PiiService>,
) -> impl Responder {
    info!("Received detect request for {:?}", request.file.as_ref().map(|f| &f.name));
    match run_file_action(request.into_inner(), service, Mode::Detect).await {
        Ok(outcome) => HttpResponse::Ok().json(ResultResponse { result: outcome.display }),
        Err(response) => response,
    }
}

/// Anonymize an uploaded file; the processed document is also offered as a download
#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn anonymize_file(
    request: web::Json<FileRequest>,
    service: web::Data<PiiService>,
) -> impl Responder {
    info!("Received anonymize request for {:?}", request.file.as_ref().map(|f| &f.name));
    let filename = request
        .file
        .as_ref()
        .map(|f| format!("anonymized_{}", sanitize(&f.name)));

    match run_file_action(request.into_inner(), service, Mode::Anonymize).await {
        Ok(outcome) => {
            let download = match (outcome.payload, filename) {
                (Some(content), Some(filename)) => Some(Download { filename, content }),
                _ => None,
            };
            debug!("Download attached: {}", download.is_some());
            HttpResponse::Ok().json(AnonymizeFileResponse {
                result: outcome.display,
                download,
            })
        }
        Err(response) => response,
    }
}

/// Anonymize typed text directly, without any file handling
#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn quick_test(
    request: web::Json<TextRequest>,
    service: web::Data<PiiService>,
) -> impl Responder {
    let TextRequest { text, custom_regex, whitelist } = request.into_inner();
    info!("Received quick test request ({} bytes)", text.len());

    let result = tokio::task::spawn_blocking(move || {
        let whitelist = Whitelist::parse(whitelist.as_deref());
        service.anonymize_text(&text, custom_regex.as_deref(), &whitelist)
    })
    .await;

    match result {
        Ok(result) => HttpResponse::Ok().json(ResultResponse { result }),
        Err(e) => {
            error!("Quick test task failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new("Internal error while anonymizing text."))
        }
    }
}

/// Health check endpoint for monitoring service status
#[instrument(skip_all)]
pub async fn health_check(started_at: web::Data<StartedAt>) -> impl Responder {
    let uptime_secs = started_at.0.elapsed().as_secs();
    debug!("Health check: uptime={}s", uptime_secs);
    HttpResponse::Ok().json(HealthStatus {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs,
    })
}
