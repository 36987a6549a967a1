//! HTTP client for the remote stock-estimation service.
//!
//! One canonical endpoint is used for uploads:
//! `POST <base>/api/v1/estimate-stock-multiple` — all images in a single
//! multipart request with repeated `files` fields, product hints, and the
//! configured confidence threshold. The service's historical single-file and
//! batch endpoints accept the same payload shape and are deliberately not
//! exposed.
//!
//! Failures collapse into a three-way taxonomy ([`UploadError`]) at this
//! boundary; callers only ever see one of the three user-facing messages.
//! No retry is attempted — the user retries manually.

pub mod multipart;

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::analysis::AnalysisPayload;
use crate::config::schema::ApiConfig;

use multipart::MultipartForm;

// ---------------------------------------------------------------------------
// Upload input
// ---------------------------------------------------------------------------

/// One image file queued for upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Read an image from disk for a CLI-driven upload.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("failed to read image {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self { name, bytes })
    }
}

// ---------------------------------------------------------------------------
// Failure taxonomy
// ---------------------------------------------------------------------------

/// Upload failure classes surfaced to the user.
#[derive(Debug)]
pub enum UploadError {
    /// The request exceeded the configured timeout.
    Timeout,
    /// The service answered with HTTP 5xx.
    Server(u16),
    /// Anything else: connection refused, bad request, unparseable response.
    Failed(String),
}

impl UploadError {
    /// Short machine-readable tag, used by the web API and the journal.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Server(_) => "server",
            Self::Failed(_) => "failed",
        }
    }
}

impl std::fmt::Display for UploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(
                f,
                "The analysis is taking longer than expected. Please try again."
            ),
            Self::Server(code) => write!(
                f,
                "The analysis service ran into an internal error (HTTP {code}). Please try again later."
            ),
            Self::Failed(reason) => write!(f, "Upload failed: {reason}"),
        }
    }
}

impl std::error::Error for UploadError {}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Synchronous client for the estimation service.
///
/// Built from the resolved `[api]` config. One client per upload is fine —
/// there is never more than one request in flight.
#[derive(Debug)]
pub struct AnalysisClient {
    base_url: String,
    timeout: Duration,
    confidence_threshold: f64,
    products: Vec<String>,
}

impl AnalysisClient {
    /// Build a client from the resolved config.
    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
            confidence_threshold: config.confidence_threshold,
            products: config.products.clone(),
        }
    }

    /// The canonical upload endpoint.
    pub fn upload_url(&self) -> String {
        format!("{}/api/v1/estimate-stock-multiple", self.base_url)
    }

    /// Post all images in one multipart request and parse the response.
    ///
    /// Requires at least one file; the caller's submit control enforces this
    /// too, but the contract lives here.
    pub fn estimate_stock(&self, files: &[UploadFile]) -> Result<AnalysisPayload, UploadError> {
        if files.is_empty() {
            return Err(UploadError::Failed("no images selected".to_string()));
        }

        let mut form = MultipartForm::new();
        for file in files {
            form.add_file(
                "files",
                &file.name,
                multipart::content_type_for(&file.name),
                &file.bytes,
            );
        }
        form.add_text("products", &self.products.join(","));
        form.add_text(
            "confidence_threshold",
            &format!("{}", self.confidence_threshold),
        );
        let (content_type, body) = form.finish();

        // On Windows, "localhost" may try IPv6 (::1) first, causing delays
        // when the service only binds to IPv4. Use 127.0.0.1 directly.
        let url = self.upload_url().replace("://localhost", "://127.0.0.1");

        let response = ureq::post(&url)
            .timeout(self.timeout)
            .set("Content-Type", &content_type)
            .send_bytes(&body)
            .map_err(classify_error)?;

        response
            .into_json::<AnalysisPayload>()
            .map_err(|e| UploadError::Failed(format!("could not parse analysis response: {e}")))
    }

    /// Check whether the estimation service is reachable.
    ///
    /// Uses a short timeout so `shelfwatch health` and the dashboard badge
    /// don't stall when the service is down.
    pub fn is_healthy(&self) -> bool {
        let url = format!("{}/api/v1/health", self.base_url).replace("://localhost", "://127.0.0.1");
        matches!(
            ureq::get(&url).timeout(Duration::from_secs(5)).call(),
            Ok(resp) if resp.status() == 200
        )
    }
}

/// Map a transport-level error into the three-way taxonomy.
fn classify_error(err: ureq::Error) -> UploadError {
    match err {
        ureq::Error::Status(code, _) if code >= 500 => UploadError::Server(code),
        ureq::Error::Status(code, _) => {
            UploadError::Failed(format!("service rejected the request (HTTP {code})"))
        }
        ureq::Error::Transport(transport) => {
            let message = transport.to_string();
            let lowered = message.to_ascii_lowercase();
            if lowered.contains("timed out") || lowered.contains("timeout") {
                UploadError::Timeout
            } else {
                UploadError::Failed(message)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
