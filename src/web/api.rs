//! JSON API handlers for the web dashboard.
//!
//! Each handler corresponds to an API endpoint and returns a
//! `Response<Cursor<Vec<u8>>>` with JSON content. State is loaded fresh per
//! request; every view projection is recomputed from the stored payload, so
//! two requests against the same data render identically.

use std::io::Cursor;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tiny_http::{Response, StatusCode};

use crate::analysis::normalize::{self, ProductViewRow, SectionScope};
use crate::analysis::projection::{self, BarPoint, LinePoint, Summary};
use crate::client::{AnalysisClient, UploadError, UploadFile};
use crate::config;
use crate::journal::{self, UploadLogEntry};
use crate::store;

use super::content_type_json;

// ---------------------------------------------------------------------------
// JSON response types
// ---------------------------------------------------------------------------

/// Dashboard API response — everything the dashboard page renders.
#[derive(Serialize)]
struct DashboardResponse {
    has_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    processing_time: Option<f64>,
    times: Vec<String>,
    selected_time: Option<String>,
    sections: Vec<String>,
    selected_section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    section_color: Option<String>,
    summary: Summary,
    rows: Vec<ProductViewRow>,
    bar: Vec<BarPoint>,
    line: Vec<LinePoint>,
    low_items: Vec<LowItemResponse>,
}

impl DashboardResponse {
    fn empty() -> Self {
        Self {
            has_data: false,
            timestamp: None,
            model_used: None,
            processing_time: None,
            times: Vec::new(),
            selected_time: None,
            sections: Vec::new(),
            selected_section: None,
            section_color: None,
            summary: Summary::default(),
            rows: Vec::new(),
            bar: Vec::new(),
            line: Vec::new(),
            low_items: Vec::new(),
        }
    }
}

/// One low-stock product in the alert view.
#[derive(Serialize)]
struct LowItemResponse {
    product: String,
    stock_percent: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    confidence_percent: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning: Option<String>,
}

/// Alerts API response.
#[derive(Serialize)]
struct AlertsResponse {
    has_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    times: Vec<String>,
    selected_time: Option<String>,
    items: Vec<LowItemResponse>,
}

/// History API response — the retained analysis ring plus the upload journal.
#[derive(Serialize)]
struct HistoryResponse {
    entries: Vec<HistoryEntryResponse>,
    uploads: Vec<UploadLogEntry>,
}

#[derive(Serialize)]
struct HistoryEntryResponse {
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_count: Option<u32>,
    product_count: usize,
    time_slots: usize,
}

/// Health API response.
#[derive(Serialize)]
struct HealthResponse {
    api_url: String,
    api_reachable: bool,
    config_exists: bool,
    state_dir: String,
    has_latest: bool,
    history_entries: usize,
    journal_exists: bool,
}

/// Selection API response — the two persisted UI selections.
#[derive(Serialize)]
struct SelectionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    section: Option<String>,
}

/// Selection update request. Absent fields are left untouched.
#[derive(serde::Deserialize)]
struct SelectionUpdateRequest {
    time: Option<String>,
    section: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON success response.
fn json_response<T: Serialize>(data: &T) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(200)))
}

/// Build a JSON error response with a machine tag and a user-facing message.
fn error_response(status: u16, kind: &str, message: &str) -> Response<Cursor<Vec<u8>>> {
    let body = serde_json::json!({ "error_kind": kind, "message": message }).to_string();
    Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(status))
}

/// Extract a query parameter from a URL.
fn query_param(url: &str, key: &str) -> Option<String> {
    url.split('?').nth(1)?.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        if k == key && !v.is_empty() {
            Some(v.to_string())
        } else {
            None
        }
    })
}

fn low_item(result: &crate::analysis::AnalysisResult) -> LowItemResponse {
    LowItemResponse {
        product: normalize::display_name(&result.product),
        stock_percent: (result.stock_percentage.clamp(0.0, 1.0) * 100.0).round() as u32,
        confidence_percent: result
            .confidence
            .map(|c| (c.clamp(0.0, 1.0) * 100.0).round() as u32),
        reasoning: result.reasoning.clone(),
    }
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `GET /api/dashboard?time=K&section=S` — full dashboard projection.
///
/// Query parameters override the persisted selections for this request only;
/// stale keys fall back to the first available option.
pub fn get_dashboard(url: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let cfg = config::load();
    let stock = store::open(&cfg.store);

    let Some(payload) = stock.latest() else {
        return json_response(&DashboardResponse::empty());
    };

    let times = normalize::available_times(&payload.results);
    let requested_time = query_param(url, "time").or_else(|| stock.selected_time());
    let selected_time = normalize::resolve_time(&times, requested_time.as_deref());

    let scope = match selected_time.as_deref() {
        Some(key) => SectionScope::SelectedTime(key),
        None => SectionScope::AllTimes,
    };
    let sections = normalize::sections(&payload.results, scope);
    let requested_section = query_param(url, "section").or_else(|| stock.selected_section());
    let selected_section = normalize::resolve_section(&sections, requested_section.as_deref());

    let rows = normalize::rows_for(&payload, selected_time.as_deref(), cfg.thresholds.low_stock);
    let low_items = normalize::low_stock(
        &payload.results,
        selected_time.as_deref(),
        cfg.thresholds.low_stock,
    )
    .into_iter()
    .map(low_item)
    .collect();

    let line = selected_section
        .as_deref()
        .map(|section| projection::line_series(&payload.results, section))
        .unwrap_or_default();

    let resp = DashboardResponse {
        has_data: true,
        timestamp: payload.timestamp.clone(),
        model_used: payload.model_used.clone(),
        processing_time: payload.processing_time,
        times,
        selected_time,
        section_color: selected_section
            .as_deref()
            .map(projection::color_for_section),
        sections,
        selected_section,
        summary: projection::summarize(&rows),
        bar: projection::bar_series(&rows),
        rows,
        line,
        low_items,
    };

    json_response(&resp)
}

/// `GET /api/alerts?time=K` — low-stock products for the alert page.
pub fn get_alerts(url: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let cfg = config::load();
    let stock = store::open(&cfg.store);

    let Some(payload) = stock.latest() else {
        return json_response(&AlertsResponse {
            has_data: false,
            timestamp: None,
            times: Vec::new(),
            selected_time: None,
            items: Vec::new(),
        });
    };

    let times = normalize::available_times(&payload.results);
    let requested_time = query_param(url, "time").or_else(|| stock.selected_time());
    let selected_time = normalize::resolve_time(&times, requested_time.as_deref());

    let items = normalize::low_stock(
        &payload.results,
        selected_time.as_deref(),
        cfg.thresholds.low_stock,
    )
    .into_iter()
    .map(low_item)
    .collect();

    json_response(&AlertsResponse {
        has_data: true,
        timestamp: payload.timestamp.clone(),
        times,
        selected_time,
        items,
    })
}

/// `GET /api/history` — retained history ring plus upload journal.
pub fn get_history() -> Result<Response<Cursor<Vec<u8>>>> {
    let cfg = config::load();
    let stock = store::open(&cfg.store);

    let entries = stock
        .history()
        .into_iter()
        .map(|entry| {
            let (product_count, time_slots) = match (&entry.grouped_results, &entry.results) {
                (Some(groups), _) => (groups.values().map(Vec::len).sum(), groups.len()),
                (None, Some(rows)) => (rows.len(), 0),
                (None, None) => (0, 0),
            };
            HistoryEntryResponse {
                timestamp: entry.timestamp,
                image_count: entry.image_count,
                product_count,
                time_slots,
            }
        })
        .collect();

    json_response(&HistoryResponse {
        entries,
        uploads: journal::read_all_entries(&cfg.logging),
    })
}

/// `GET /api/health` — service reachability and local state summary.
pub fn get_health() -> Result<Response<Cursor<Vec<u8>>>> {
    let cfg = config::load();
    let stock = store::open(&cfg.store);
    let client = AnalysisClient::from_config(&cfg.api);

    let resp = HealthResponse {
        api_url: cfg.api.base_url.clone(),
        api_reachable: client.is_healthy(),
        config_exists: config::global_config_file().is_some_and(|p| p.exists()),
        state_dir: config::expand_home(&cfg.store.dir).display().to_string(),
        has_latest: stock.latest().is_some(),
        history_entries: stock.history().len(),
        journal_exists: journal::journal_path(&cfg.logging).exists(),
    };

    json_response(&resp)
}

/// `GET /api/selection` — the persisted time and section selections.
pub fn get_selection() -> Result<Response<Cursor<Vec<u8>>>> {
    let cfg = config::load();
    let stock = store::open(&cfg.store);
    json_response(&SelectionResponse {
        time: stock.selected_time(),
        section: stock.selected_section(),
    })
}

/// `PUT /api/selection` — persist one or both UI selections.
///
/// Expects JSON body: `{ "time": "T1", "section": "banana" }` with either
/// field optional.
pub fn put_selection(body: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let req: SelectionUpdateRequest =
        serde_json::from_str(body).context("invalid JSON in selection update request")?;

    let cfg = config::load();
    let stock = store::open(&cfg.store);

    if let Some(time) = &req.time {
        stock.set_selected_time(time)?;
    }
    if let Some(section) = &req.section {
        stock.set_selected_section(section)?;
    }

    json_response(&SelectionResponse {
        time: stock.selected_time(),
        section: stock.selected_section(),
    })
}

/// `POST /api/upload` — forward uploaded images to the estimation service.
///
/// Accepts the browser's multipart form: repeated `files` parts, and
/// optional `products` / `confidence_threshold` fields overriding the
/// configured defaults. On success the stored state is updated and the raw
/// analysis payload is returned; failures map to the three-way error
/// taxonomy with a distinct status code per class.
pub fn post_upload(content_type: Option<&str>, body: &[u8]) -> Result<Response<Cursor<Vec<u8>>>> {
    let started = Instant::now();
    let cfg = config::load();

    let Some(boundary) = content_type.and_then(super::multipart::boundary_from_content_type) else {
        return Ok(error_response(
            400,
            "failed",
            "Upload failed: expected a multipart/form-data request",
        ));
    };

    let parts = match super::multipart::parse(body, &boundary) {
        Ok(parts) => parts,
        Err(e) => {
            return Ok(error_response(
                400,
                "failed",
                &format!("Upload failed: {e}"),
            ));
        }
    };

    let files: Vec<UploadFile> = parts
        .iter()
        .filter(|p| p.is_file() && !p.data.is_empty())
        .map(|p| UploadFile {
            name: p.filename.clone().unwrap_or_else(|| "image".to_string()),
            bytes: p.data.clone(),
        })
        .collect();

    if files.is_empty() {
        return Ok(error_response(
            400,
            "failed",
            "Upload failed: no images selected",
        ));
    }

    // Plain form fields may override the configured upload parameters.
    let mut api_cfg = cfg.api.clone();
    for part in parts.iter().filter(|p| !p.is_file()) {
        match part.name.as_str() {
            "products" => {
                let products: Vec<String> = part
                    .text()
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                if !products.is_empty() {
                    api_cfg.products = products;
                }
            }
            "confidence_threshold" => {
                if let Ok(value) = part.text().trim().parse::<f64>() {
                    api_cfg.confidence_threshold = value;
                }
            }
            _ => {}
        }
    }

    let client = AnalysisClient::from_config(&api_cfg);
    match client.estimate_stock(&files) {
        Ok(payload) => {
            let stock = store::open(&cfg.store);
            stock.record(&payload, files.len() as u32)?;

            let mut entry = UploadLogEntry::new(
                files.len(),
                "ok",
                started.elapsed().as_millis() as u64,
            );
            entry.result_count = Some(payload.results.len());
            entry.model_used = payload.model_used.clone();
            journal::log_upload(&cfg.logging, &entry);

            json_response(&payload)
        }
        Err(err) => {
            journal::log_upload(
                &cfg.logging,
                &UploadLogEntry::new(files.len(), err.kind(), started.elapsed().as_millis() as u64),
            );
            let status = match &err {
                UploadError::Timeout => 504,
                UploadError::Server(_) => 502,
                UploadError::Failed(_) => 400,
            };
            Ok(error_response(status, err.kind(), &err.to_string()))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
