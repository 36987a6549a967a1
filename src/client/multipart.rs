//! Minimal multipart/form-data encoder.
//!
//! `ureq` ships no multipart support, so the upload request body is built by
//! hand: each part is framed by a boundary line, carries a
//! `Content-Disposition` header, and file parts add a `Content-Type`.
//! The encoder owns the boundary so the caller can't mismatch header and
//! body.

use std::io::Write;

// ---------------------------------------------------------------------------
// Form builder
// ---------------------------------------------------------------------------

/// An in-memory multipart/form-data request body.
#[derive(Debug)]
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    /// Create a form with a process-unique boundary.
    pub fn new() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0);
        Self::with_boundary(format!(
            "----shelfwatch-{:08x}{:08x}",
            std::process::id(),
            nanos
        ))
    }

    /// Create a form with a fixed boundary (tests).
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            body: Vec::new(),
        }
    }

    /// Append a plain text field.
    pub fn add_text(&mut self, name: &str, value: &str) {
        // Writing to a Vec<u8> cannot fail.
        let _ = write!(
            self.body,
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            self.boundary, name, value
        );
    }

    /// Append a binary file part under a (possibly repeated) field name.
    pub fn add_file(&mut self, name: &str, filename: &str, content_type: &str, bytes: &[u8]) {
        let _ = write!(
            self.body,
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
            self.boundary, name, filename, content_type
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
    }

    /// Close the form and return the `Content-Type` header value plus the
    /// finished body.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        let _ = write!(self.body, "--{}--\r\n", self.boundary);
        let content_type = format!("multipart/form-data; boundary={}", self.boundary);
        (content_type, self.body)
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

/// Guess a content type from a filename extension.
pub fn content_type_for(filename: &str) -> &'static str {
    let ext = filename.rsplit('.').next().unwrap_or("");
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
