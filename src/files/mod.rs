//! Upload handling: picks a format from the file extension, runs detection or
//! anonymization over every text field and rebuilds the original structure.

mod json_tree;
mod tabular;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::{info, warn};

use crate::pii::{PiiService, Whitelist};

pub const NO_FILE_MESSAGE: &str = "No file uploaded";
pub const UNSUPPORTED_MESSAGE: &str = "Unsupported file type";
pub const PDF_MESSAGE: &str = "PDF files are not supported: text cannot be extracted reliably.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Detect,
    Anonymize,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Detect => write!(f, "detect"),
            Mode::Anonymize => write!(f, "anonymize"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Json,
    Txt,
    Pdf,
    Unsupported,
}

impl FileKind {
    /// Case-insensitive match on the file name's suffix
    pub fn from_name(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.ends_with(".csv") {
            FileKind::Csv
        } else if name.ends_with(".json") {
            FileKind::Json
        } else if name.ends_with(".txt") {
            FileKind::Txt
        } else if name.ends_with(".pdf") {
            FileKind::Pdf
        } else {
            FileKind::Unsupported
        }
    }
}

/// An uploaded file, held only for the duration of one request
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Text to show plus, for processed files, the same text as a download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub display: String,
    pub payload: Option<String>,
}

impl FileOutcome {
    fn message(message: impl Into<String>) -> Self {
        Self {
            display: message.into(),
            payload: None,
        }
    }

    fn processed(output: String) -> Self {
        Self {
            display: output.clone(),
            payload: Some(output),
        }
    }
}

/// Per-request settings applied to every text field of a file
pub(crate) struct FieldProcessor<'a> {
    service: &'a PiiService,
    custom_regex: Option<&'a str>,
    whitelist: Whitelist,
    mode: Mode,
}

impl<'a> FieldProcessor<'a> {
    /// Detection results rendered as a compact JSON array, or the anonymized text
    pub(crate) fn render_text(&self, text: &str) -> Result<String> {
        match self.mode {
            Mode::Detect => serde_json::to_string(&self.service.detect_pii(text, self.custom_regex))
                .context("Failed to render detection results"),
            Mode::Anonymize => Ok(self
                .service
                .anonymize_text(text, self.custom_regex, &self.whitelist)),
        }
    }

    /// Detection results as a JSON array, or the anonymized text as a JSON string
    pub(crate) fn render_value(&self, text: &str) -> Result<Value> {
        match self.mode {
            Mode::Detect => serde_json::to_value(self.service.detect_pii(text, self.custom_regex))
                .context("Failed to render detection results"),
            Mode::Anonymize => Ok(Value::String(self.service.anonymize_text(
                text,
                self.custom_regex,
                &self.whitelist,
            ))),
        }
    }
}

/// Processes an uploaded file. Every failure is reported as display text
/// with no payload.
pub fn process_file(
    service: &PiiService,
    file: Option<&FileUpload>,
    custom_regex: Option<&str>,
    whitelist: Option<&str>,
    mode: Mode,
) -> FileOutcome {
    let Some(file) = file else {
        return FileOutcome::message(NO_FILE_MESSAGE);
    };

    let kind = FileKind::from_name(&file.name);
    info!("Processing {} ({:?}, {} bytes) in {} mode", file.name, kind, file.bytes.len(), mode);

    let processor = FieldProcessor {
        service,
        custom_regex,
        whitelist: Whitelist::parse(whitelist),
        mode,
    };

    let result = match kind {
        FileKind::Csv => decode(file).and_then(|text| tabular::process_csv(&processor, text)),
        FileKind::Json => decode(file).and_then(|text| json_tree::process_json(&processor, text)),
        FileKind::Txt => decode(file).and_then(|text| processor.render_text(text)),
        FileKind::Pdf => return FileOutcome::message(PDF_MESSAGE),
        FileKind::Unsupported => return FileOutcome::message(UNSUPPORTED_MESSAGE),
    };

    match result {
        Ok(output) => FileOutcome::processed(output),
        Err(e) => {
            warn!("Failed to process {}: {:#}", file.name, e);
            FileOutcome::message(format!("Error processing {}: {:#}", file.name, e))
        }
    }
}

fn decode(file: &FileUpload) -> Result<&str> {
    std::str::from_utf8(&file.bytes).context("file is not valid UTF-8")
}
