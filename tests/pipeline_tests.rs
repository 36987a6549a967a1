//! End-to-end tests for the analysis pipeline: raw service JSON in,
//! dashboard projections out.

use shelfwatch::analysis::normalize::{self, SectionScope, StockBucket};
use shelfwatch::analysis::{self, projection};

const FLAT_PAYLOAD: &str = r#"{
    "success": true,
    "processing_time": 12.4,
    "timestamp": "2025-06-01T09:30:00Z",
    "model_used": "qwen-vl",
    "results": [
        { "product": "banana", "stock_percentage": 0.12, "stock_status": "low",
          "confidence": 0.95, "reasoning": "shelf mostly empty" },
        { "product": "broccoli", "stock_percentage": 0.55 },
        { "product": "tomato", "stock_percentage": 0.97, "stock_status": "overstocked" }
    ]
}"#;

const GROUPED_PAYLOAD: &str = r#"{
    "success": true,
    "timestamp": "2025-06-01T09:30:00Z",
    "results": {
        "T10": [
            { "product": "banana (T10)", "stock_percentage": 0.4 }
        ],
        "T2": [
            { "product": "banana (T2)", "stock_percentage": 0.7 },
            { "product": "avocado (T2)", "stock_percentage": 0.2 }
        ],
        "T1": [
            { "product": "banana (T1)", "stock_percentage": 0.9 }
        ]
    }
}"#;

#[test]
fn flat_payload_projects_to_dashboard() {
    let payload = analysis::parse_payload(FLAT_PAYLOAD).expect("payload parses");
    assert_eq!(payload.model_used.as_deref(), Some("qwen-vl"));

    // No time dimension for flat payloads.
    assert!(normalize::available_times(&payload.results).is_empty());

    let rows = normalize::rows_for(&payload, None, 0.3);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].product, "Banana");
    assert_eq!(rows[0].stock_percent, 12);
    assert_eq!(rows[0].status, StockBucket::Low);
    assert_eq!(rows[0].reasoning, "shelf mostly empty");
    assert_eq!(rows[0].updated_at, "Jun 01, 09:30");
    assert_eq!(rows[1].status, StockBucket::Medium);
    assert_eq!(rows[2].status, StockBucket::High);

    let summary = projection::summarize(&rows);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.low, 1);
    assert_eq!(summary.medium, 1);
    assert_eq!(summary.high, 1);

    // Bar chart follows the rows; the line chart needs time grouping.
    let bars = projection::bar_series(&rows);
    assert_eq!(bars.len(), 3);
    assert!(bars[0].color.starts_with("hsl("));
    assert!(projection::line_series(&payload.results, "banana").is_empty());
}

#[test]
fn rendering_twice_is_identical() {
    let payload = analysis::parse_payload(FLAT_PAYLOAD).unwrap();
    let first = normalize::rows_for(&payload, None, 0.3);
    let second = normalize::rows_for(&payload, None, 0.3);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn grouped_payload_orders_times_numerically() {
    let payload = analysis::parse_payload(GROUPED_PAYLOAD).unwrap();
    let times = normalize::available_times(&payload.results);
    assert_eq!(times, vec!["T1", "T2", "T10"]);

    // Sections span the time tags.
    let sections = normalize::sections(&payload.results, SectionScope::AllTimes);
    assert_eq!(sections, vec!["avocado", "banana"]);
    assert_eq!(
        normalize::sections(&payload.results, SectionScope::SelectedTime("T1")),
        vec!["banana"]
    );
}

#[test]
fn grouped_payload_line_series_has_gaps() {
    let payload = analysis::parse_payload(GROUPED_PAYLOAD).unwrap();

    let series = projection::line_series(&payload.results, "banana");
    assert_eq!(series.len(), 3);
    assert_eq!(series[0].stock, Some(90));
    assert_eq!(series[1].stock, Some(70));
    assert_eq!(series[2].stock, Some(40));

    // Avocado only appears at T2; other slots are gaps, not zeros.
    let series = projection::line_series(&payload.results, "avocado");
    assert_eq!(series[0].stock, None);
    assert_eq!(series[1].stock, Some(20));
    assert_eq!(series[2].stock, None);
}

#[test]
fn stale_selections_fall_back() {
    let payload = analysis::parse_payload(GROUPED_PAYLOAD).unwrap();
    let times = normalize::available_times(&payload.results);

    // A persisted key from an older payload no longer exists.
    assert_eq!(
        normalize::resolve_time(&times, Some("T99")),
        Some("T1".to_string())
    );

    let rows = normalize::rows_for(&payload, Some("T99"), 0.3);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].product, "Banana (T1)");
}

#[test]
fn low_stock_combines_status_and_threshold() {
    let payload = analysis::parse_payload(GROUPED_PAYLOAD).unwrap();
    let lows = normalize::low_stock(&payload.results, Some("T2"), 0.3);
    assert_eq!(lows.len(), 1);
    assert_eq!(lows[0].product, "avocado (T2)");

    let payload = analysis::parse_payload(FLAT_PAYLOAD).unwrap();
    let lows = normalize::low_stock(&payload.results, None, 0.3);
    assert_eq!(lows.len(), 1);
    assert_eq!(lows[0].product, "banana");
}

#[test]
fn malformed_and_empty_payloads_are_benign() {
    assert!(analysis::parse_payload("{ not json").is_none());
    assert!(analysis::parse_payload(r#"{"results": 42}"#).is_none());

    let payload = analysis::parse_payload(r#"{"success": true, "results": []}"#).unwrap();
    let rows = normalize::rows_for(&payload, None, 0.3);
    assert!(rows.is_empty());
    assert_eq!(projection::summarize(&rows), projection::Summary::default());
    assert!(normalize::sections(&payload.results, SectionScope::AllTimes).is_empty());
}

#[test]
fn section_colors_are_stable_across_payloads() {
    let flat = analysis::parse_payload(FLAT_PAYLOAD).unwrap();
    let grouped = analysis::parse_payload(GROUPED_PAYLOAD).unwrap();

    let flat_rows = normalize::rows_for(&flat, None, 0.3);
    let grouped_rows = normalize::rows_for(&grouped, Some("T1"), 0.3);

    let flat_banana = projection::bar_series(&flat_rows)
        .into_iter()
        .find(|b| b.name == "Banana")
        .unwrap();
    let grouped_banana = projection::bar_series(&grouped_rows)
        .into_iter()
        .find(|b| b.name.starts_with("Banana"))
        .unwrap();
    assert_eq!(flat_banana.color, grouped_banana.color);
}
