use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

use crate::files::FileUpload;

/// A file as posted by the browser: name plus base64 content
#[derive(Debug, Deserialize, Clone)]
pub struct UploadedFile {
    pub name: String,

    /// Base64 body; a `data:...;base64,` prefix is tolerated
    pub content: String,
}

impl UploadedFile {
    pub fn decode(&self) -> Result<FileUpload> {
        let encoded = match self.content.split_once("base64,") {
            Some((prefix, rest)) if prefix.starts_with("data:") => rest,
            _ => self.content.as_str(),
        };
        let bytes = BASE64
            .decode(encoded.trim())
            .with_context(|| format!("File {} is not valid base64", self.name))?;
        Ok(FileUpload::new(self.name.clone(), bytes))
    }
}

/// Body of the detect-file and anonymize-file actions
#[derive(Debug, Deserialize, Clone, Default)]
pub struct FileRequest {
    #[serde(default)]
    pub file: Option<UploadedFile>,

    #[serde(default)]
    pub custom_regex: Option<String>,

    /// Comma-separated literal values
    #[serde(default)]
    pub whitelist: Option<String>,
}

/// Body of the quick-test action
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TextRequest {
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub custom_regex: Option<String>,

    #[serde(default)]
    pub whitelist: Option<String>,
}

/// Text shown in the action's output box
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResultResponse {
    pub result: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Download {
    pub filename: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AnonymizeFileResponse {
    pub result: String,
    pub download: Option<Download>,
}

/// Health status response for the /health endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status indicator: error
    pub status: String,

    /// Error message details
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_base64() {
        let upload = UploadedFile {
            name: "a.txt".to_string(),
            content: BASE64.encode("hello"),
        };
        assert_eq!(upload.decode().unwrap().bytes, b"hello");
    }

    #[test]
    fn test_decode_data_url() {
        let upload = UploadedFile {
            name: "a.txt".to_string(),
            content: format!("data:text/plain;base64,{}", BASE64.encode("hi")),
        };
        assert_eq!(upload.decode().unwrap().bytes, b"hi");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let upload = UploadedFile {
            name: "a.txt".to_string(),
            content: "%%%".to_string(),
        };
        let err = upload.decode().unwrap_err();
        assert!(err.to_string().contains("a.txt"));
    }

    #[test]
    fn test_file_request_fields_optional() {
        let request: FileRequest = serde_json::from_str("{}").unwrap();
        assert!(request.file.is_none());
        assert!(request.custom_regex.is_none());
    }
}
