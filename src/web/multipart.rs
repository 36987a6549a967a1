//! Incoming multipart/form-data parser for the upload endpoint.
//!
//! The dashboard's upload form posts image files straight to the local
//! server, which forwards them to the estimation service. `tiny_http` hands
//! us the raw body, so the part framing is parsed here: boundary lines,
//! per-part headers, binary data. Only what the upload form produces is
//! supported; nested multipart and transfer encodings are not.

use anyhow::{Context, Result, bail};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One decoded form part.
#[derive(Debug, Clone)]
pub struct Part {
    pub name: String,
    /// Present for file parts, absent for plain fields.
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl Part {
    /// Whether this part carries an uploaded file.
    pub fn is_file(&self) -> bool {
        self.filename.is_some()
    }

    /// The part data as text (plain fields).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Extract the boundary token from a `Content-Type` header value.
pub fn boundary_from_content_type(content_type: &str) -> Option<String> {
    if !content_type
        .to_ascii_lowercase()
        .starts_with("multipart/form-data")
    {
        return None;
    }
    content_type.split(';').find_map(|param| {
        let (key, value) = param.trim().split_once('=')?;
        if key.eq_ignore_ascii_case("boundary") {
            Some(value.trim_matches('"').to_string())
        } else {
            None
        }
    })
}

/// Parse a complete multipart body into its parts.
pub fn parse(body: &[u8], boundary: &str) -> Result<Vec<Part>> {
    let delimiter = format!("--{boundary}").into_bytes();
    let mut parts = Vec::new();

    let mut pos = find(body, &delimiter, 0).context("multipart body has no opening boundary")?
        + delimiter.len();

    loop {
        // A "--" after the delimiter closes the body.
        if body[pos..].starts_with(b"--") {
            break;
        }
        if body[pos..].starts_with(b"\r\n") {
            pos += 2;
        }

        let headers_end =
            find(body, b"\r\n\r\n", pos).context("multipart part is missing its header block")?;
        let headers = String::from_utf8_lossy(&body[pos..headers_end]);

        let data_start = headers_end + 4;
        let mut closing = b"\r\n".to_vec();
        closing.extend_from_slice(&delimiter);
        let data_end =
            find(body, &closing, data_start).context("multipart part is not terminated")?;

        parts.push(build_part(&headers, body[data_start..data_end].to_vec())?);
        pos = data_end + closing.len();
    }

    Ok(parts)
}

/// Assemble a part from its raw header block and data.
fn build_part(headers: &str, data: Vec<u8>) -> Result<Part> {
    let mut name = None;
    let mut filename = None;
    let mut content_type = None;

    for line in headers.lines() {
        let Some((header, value)) = line.split_once(':') else {
            continue;
        };
        if header.eq_ignore_ascii_case("content-disposition") {
            for param in value.split(';') {
                let param = param.trim();
                if let Some(v) = param.strip_prefix("name=") {
                    name = Some(v.trim_matches('"').to_string());
                } else if let Some(v) = param.strip_prefix("filename=") {
                    filename = Some(v.trim_matches('"').to_string());
                }
            }
        } else if header.eq_ignore_ascii_case("content-type") {
            content_type = Some(value.trim().to_string());
        }
    }

    let Some(name) = name else {
        bail!("multipart part has no field name");
    };

    Ok(Part {
        name,
        filename,
        content_type,
        data,
    })
}

/// First occurrence of `needle` in `haystack` at or after `from`.
fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|i| i + from)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_body(boundary: &str) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"shelf.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&[0xff, 0xd8, 0x0d, 0x0a, 0x01]);
        body.extend_from_slice(
            format!(
                "\r\n--{boundary}\r\nContent-Disposition: form-data; name=\"products\"\r\n\r\nbanana,broccoli\r\n--{boundary}--\r\n"
            )
            .as_bytes(),
        );
        body
    }

    #[test]
    fn boundary_extraction() {
        assert_eq!(
            boundary_from_content_type("multipart/form-data; boundary=----abc123"),
            Some("----abc123".to_string())
        );
        assert_eq!(
            boundary_from_content_type("multipart/form-data; boundary=\"quoted\""),
            Some("quoted".to_string())
        );
        assert_eq!(boundary_from_content_type("application/json"), None);
        assert_eq!(boundary_from_content_type("multipart/form-data"), None);
    }

    #[test]
    fn parses_file_and_text_parts() {
        let body = sample_body("B");
        let parts = parse(&body, "B").unwrap();
        assert_eq!(parts.len(), 2);

        assert_eq!(parts[0].name, "files");
        assert_eq!(parts[0].filename.as_deref(), Some("shelf.jpg"));
        assert_eq!(parts[0].content_type.as_deref(), Some("image/jpeg"));
        assert!(parts[0].is_file());
        // Binary data with embedded CRLF survives intact.
        assert_eq!(parts[0].data, vec![0xff, 0xd8, 0x0d, 0x0a, 0x01]);

        assert_eq!(parts[1].name, "products");
        assert!(!parts[1].is_file());
        assert_eq!(parts[1].text(), "banana,broccoli");
    }

    #[test]
    fn encoder_output_parses_back() {
        let mut form = crate::client::multipart::MultipartForm::with_boundary("ROUND");
        form.add_file("files", "a.png", "image/png", &[1, 2, 3]);
        form.add_text("confidence_threshold", "0.7");
        let (content_type, body) = form.finish();

        let boundary = boundary_from_content_type(&content_type).unwrap();
        let parts = parse(&body, &boundary).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].data, vec![1, 2, 3]);
        assert_eq!(parts[1].text(), "0.7");
    }

    #[test]
    fn truncated_body_is_an_error() {
        let body = sample_body("B");
        assert!(parse(&body[..body.len() - 10], "B").is_err());
        assert!(parse(b"no boundary here", "B").is_err());
    }

    #[test]
    fn empty_form_yields_no_parts() {
        let body = b"--B--\r\n";
        let parts = parse(body, "B").unwrap();
        assert!(parts.is_empty());
    }
}
