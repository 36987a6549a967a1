//! Embedded web dashboard for shelfwatch.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A single-page dashboard with upload, inventory, and alert views
//! - JSON API endpoints for projections, selections, history, and uploads
//!
//! Launched via `shelfwatch web` (default: `http://127.0.0.1:9748`).

mod api;
mod frontend;
pub mod multipart;

use std::io::{Cursor, Read};

use anyhow::Result;
use tiny_http::{Header, Method, Response, Server, StatusCode};

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the dashboard server on the given address.
///
/// Blocks the current thread. Handles requests sequentially (sufficient for
/// a local single-user dashboard). Gracefully handles errors per-request
/// without crashing the server.
pub fn serve(addr: &str, open: bool) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("shelfwatch dashboard running at http://{addr}");
    println!("Press Ctrl+C to stop.\n");

    if open {
        let url = format!("http://{addr}");
        let _ = open_browser(&url);
    }

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        // Read the body up-front for methods that carry one. Uploads are
        // binary, so this stays Vec<u8> end to end.
        let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
            let mut buf = Vec::new();
            let _ = request.as_reader().read_to_end(&mut buf);
            Some(buf)
        } else {
            None
        };
        let content_type = request
            .headers()
            .iter()
            .find(|h| h.field.equiv("Content-Type"))
            .map(|h| h.value.as_str().to_string());

        let result = dispatch(&method, &url, content_type.as_deref(), body.as_deref());

        match result {
            Ok(resp) => {
                let _ = request.respond(resp);
            }
            Err(e) => {
                let body = serde_json::json!({ "error": e.to_string() }).to_string();
                let resp = Response::from_data(body.into_bytes())
                    .with_header(content_type_json())
                    .with_status_code(StatusCode(500));
                let _ = request.respond(resp);
            }
        }

        // Brief access log
        println!(
            "{} {} {}",
            method,
            url,
            chrono::Local::now().format("%H:%M:%S")
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
fn dispatch(
    method: &Method,
    url: &str,
    content_type: Option<&str>,
    body: Option<&[u8]>,
) -> Result<Response<Cursor<Vec<u8>>>> {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        // Frontend — every routed page serves the same document; the page
        // reads its own path to decide which view to show.
        (&Method::Get, "/" | "/index.html" | "/upload" | "/dashboard" | "/alert") => {
            Ok(serve_frontend())
        }

        // API — projections
        (&Method::Get, "/api/dashboard") => api::get_dashboard(url),
        (&Method::Get, "/api/alerts") => api::get_alerts(url),
        (&Method::Get, "/api/history") => api::get_history(),

        // API — selections
        (&Method::Get, "/api/selection") => api::get_selection(),
        (&Method::Put, "/api/selection") => {
            let body = body.unwrap_or_default();
            api::put_selection(&String::from_utf8_lossy(body))
        }

        // API — uploads
        (&Method::Post, "/api/upload") => {
            api::post_upload(content_type, body.unwrap_or_default())
        }

        // API — health
        (&Method::Get, "/api/health") => api::get_health(),

        // 404
        _ => Ok(not_found()),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Serve the embedded single-page frontend.
fn serve_frontend() -> Response<Cursor<Vec<u8>>> {
    let html = frontend::INDEX_HTML;
    Response::from_data(html.as_bytes().to_vec())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200))
}

/// 404 response.
fn not_found() -> Response<Cursor<Vec<u8>>> {
    let body = r#"{"error": "not found"}"#;
    Response::from_data(body.as_bytes().to_vec())
        .with_header(content_type_json())
        .with_status_code(StatusCode(404))
}

/// JSON content type header.
pub(crate) fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8").unwrap()
}

/// HTML content type header.
fn content_type_html() -> Header {
    Header::from_bytes("Content-Type", "text/html; charset=utf-8").unwrap()
}

/// Open a URL in the default browser (best-effort).
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    let status = std::process::Command::new("open").arg(url).status()?;

    #[cfg(target_os = "linux")]
    let status = std::process::Command::new("xdg-open").arg(url).status()?;

    #[cfg(target_os = "windows")]
    let status = std::process::Command::new("cmd")
        .args(["/C", "start", url])
        .status()?;

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    let status = {
        let _ = url;
        return Ok(());
    };

    if !status.success() {
        anyhow::bail!("browser launcher exited with {status}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routed_pages_serve_the_frontend() {
        for path in ["/", "/index.html", "/upload", "/dashboard", "/alert"] {
            let resp = dispatch(&Method::Get, path, None, None).unwrap();
            assert_eq!(resp.status_code().0, 200, "{path}");
        }
    }

    #[test]
    fn unknown_path_is_404() {
        let resp = dispatch(&Method::Get, "/nope", None, None).unwrap();
        assert_eq!(resp.status_code().0, 404);
    }

    #[test]
    fn upload_without_multipart_content_type_is_rejected() {
        let resp = dispatch(
            &Method::Post,
            "/api/upload",
            Some("application/json"),
            Some(b"{}"),
        )
        .unwrap();
        assert_eq!(resp.status_code().0, 400);
    }
}
