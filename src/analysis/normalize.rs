//! Result normalizer — canonical view rows, time keys, and sections.
//!
//! Converts a raw [`AnalysisPayload`] into the derived entities every view
//! consumes: display-ready product rows for the active time slot, the
//! ordered list of available time keys, the distinct shelf sections, and the
//! low-stock subset. Everything here is a pure function of its inputs and is
//! recomputed on every read — nothing derived is ever persisted.

use std::sync::LazyLock;

use chrono::DateTime;
use regex::Regex;
use serde::Serialize;

use super::{AnalysisPayload, AnalysisResult, ResultSet};

// ---------------------------------------------------------------------------
// View row
// ---------------------------------------------------------------------------

/// Qualitative stock bucket shown in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StockBucket {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for StockBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// A display-ready product row for the table and charts.
#[derive(Debug, Clone, Serialize)]
pub struct ProductViewRow {
    /// 1-based position within the active result set.
    pub id: usize,
    /// Display-cased product label, time tag included.
    pub product: String,
    /// Rounded stock level, 0–100.
    pub stock_percent: u32,
    pub status: StockBucket,
    /// Rounded confidence, 0–100. Absent when the service sent none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_percent: Option<u32>,
    pub reasoning: String,
    /// Human-readable analysis time, e.g. `"Jan 01, 14:45"`.
    pub updated_at: String,
}

// ---------------------------------------------------------------------------
// Time keys
// ---------------------------------------------------------------------------

/// Numeric sort key embedded in a time-slot label: `"T10"` → 10.
///
/// Labels with no digits sort as 0. Ties fall back to lexical order so the
/// result stays deterministic.
fn time_suffix(key: &str) -> u64 {
    let digits: String = key.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Ordered time-slot keys of a grouped result set.
///
/// Sorted by embedded numeric suffix, not lexically — `"T2"` comes before
/// `"T10"`. Flat payloads have no time dimension and yield an empty list.
pub fn available_times(results: &ResultSet) -> Vec<String> {
    match results {
        ResultSet::Flat(_) => Vec::new(),
        ResultSet::Grouped(groups) => {
            let mut keys: Vec<String> = groups.keys().cloned().collect();
            keys.sort_by(|a, b| time_suffix(a).cmp(&time_suffix(b)).then_with(|| a.cmp(b)));
            keys
        }
    }
}

/// Resolve a (possibly stale) persisted time key against the current data.
///
/// A saved key that no longer exists falls back to the first available key.
pub fn resolve_time(times: &[String], saved: Option<&str>) -> Option<String> {
    match saved {
        Some(key) if times.iter().any(|t| t == key) => Some(key.to_string()),
        _ => times.first().cloned(),
    }
}

/// The active result slice for a selected time slot.
///
/// Flat payloads ignore the selection; grouped payloads resolve the key with
/// the stale-selection fallback.
pub fn active_results<'a>(results: &'a ResultSet, time: Option<&str>) -> &'a [AnalysisResult] {
    match results {
        ResultSet::Flat(rows) => rows,
        ResultSet::Grouped(groups) => {
            let times = available_times(results);
            match resolve_time(&times, time) {
                Some(key) => groups.get(&key).map(Vec::as_slice).unwrap_or(&[]),
                None => &[],
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

static PAREN_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\([^)]*\)$").unwrap());
static INDEX_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+\d+$").unwrap());

/// Which time slots a section listing spans.
#[derive(Debug, Clone, Copy)]
pub enum SectionScope<'a> {
    /// Sections seen in any time slot (section-picker population).
    AllTimes,
    /// Sections present in one specific slot.
    SelectedTime(&'a str),
}

/// Normalize a product label into its shelf-section key.
///
/// Strips a trailing parenthetical time tag and a trailing numeric index,
/// then lower-cases: `"Broccoli (T2)"` and `"Broccoli 12"` both become
/// `"broccoli"`. The section is the stable key for cross-time comparison.
pub fn section_of(label: &str) -> String {
    let stripped = PAREN_SUFFIX.replace(label, "");
    let stripped = INDEX_SUFFIX.replace(&stripped, "");
    stripped.trim().to_lowercase()
}

/// Distinct sections within the given scope, sorted and deduplicated.
pub fn sections(results: &ResultSet, scope: SectionScope<'_>) -> Vec<String> {
    let mut names: Vec<String> = match (results, scope) {
        (ResultSet::Flat(rows), _) => rows.iter().map(|r| section_of(&r.product)).collect(),
        (ResultSet::Grouped(groups), SectionScope::AllTimes) => groups
            .values()
            .flatten()
            .map(|r| section_of(&r.product))
            .collect(),
        (ResultSet::Grouped(groups), SectionScope::SelectedTime(key)) => groups
            .get(key)
            .map(|rows| rows.iter().map(|r| section_of(&r.product)).collect())
            .unwrap_or_default(),
    };
    names.retain(|n| !n.is_empty());
    names.sort();
    names.dedup();
    names
}

/// Resolve a persisted section key, falling back to the first available.
pub fn resolve_section(sections: &[String], saved: Option<&str>) -> Option<String> {
    match saved {
        Some(key) if sections.iter().any(|s| s == key) => Some(key.to_string()),
        _ => sections.first().cloned(),
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// Display-case a product label: first character upper-cased, rest verbatim.
pub fn display_name(product: &str) -> String {
    let mut chars = product.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Map a result to its qualitative bucket.
///
/// Explicit statuses map `low → Low`, `normal → Medium`,
/// `overstocked → High`; anything unrecognized lands in Medium. An absent
/// status derives Low from the percentage threshold.
fn bucket_for(result: &AnalysisResult, low_threshold: f64) -> StockBucket {
    match result.stock_status.as_deref() {
        Some("low") => StockBucket::Low,
        Some("normal") => StockBucket::Medium,
        Some("overstocked") => StockBucket::High,
        Some(_) => StockBucket::Medium,
        None if result.stock_percentage < low_threshold => StockBucket::Low,
        None => StockBucket::Medium,
    }
}

/// Format the payload timestamp for the "Last updated" column.
///
/// Unparseable timestamps are shown verbatim rather than dropped.
fn format_updated_at(timestamp: Option<&str>) -> String {
    let Some(raw) = timestamp else {
        return String::new();
    };
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.format("%b %d, %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Round a `[0, 1]` fraction to a 0–100 integer percentage.
fn percent(fraction: f64) -> u32 {
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u32
}

/// Derive the active view rows for a selected time slot.
///
/// Flat payloads yield every result; grouped payloads yield the resolved
/// slot's results. Ordering follows the payload.
pub fn rows_for(
    payload: &AnalysisPayload,
    time: Option<&str>,
    low_threshold: f64,
) -> Vec<ProductViewRow> {
    let updated_at = format_updated_at(payload.timestamp.as_deref());
    active_results(&payload.results, time)
        .iter()
        .enumerate()
        .map(|(index, result)| ProductViewRow {
            id: index + 1,
            product: display_name(&result.product),
            stock_percent: percent(result.stock_percentage),
            status: bucket_for(result, low_threshold),
            confidence_percent: result.confidence.map(percent),
            reasoning: result
                .reasoning
                .clone()
                .unwrap_or_else(|| "AI analysis completed".to_string()),
            updated_at: updated_at.clone(),
        })
        .collect()
}

/// Low-stock results within the active time slot.
pub fn low_stock<'a>(
    results: &'a ResultSet,
    time: Option<&str>,
    threshold: f64,
) -> Vec<&'a AnalysisResult> {
    active_results(results, time)
        .iter()
        .filter(|r| r.is_low(threshold))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn result(product: &str, pct: f64, status: Option<&str>) -> AnalysisResult {
        AnalysisResult {
            product: product.to_string(),
            stock_percentage: pct,
            stock_status: status.map(String::from),
            confidence: Some(0.9),
            bounding_box: None,
            reasoning: None,
        }
    }

    fn grouped(groups: Vec<(&str, Vec<AnalysisResult>)>) -> ResultSet {
        ResultSet::Grouped(
            groups
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    #[test]
    fn times_sort_by_numeric_suffix() {
        let rs = grouped(vec![
            ("T10", vec![]),
            ("T2", vec![]),
            ("T1", vec![]),
        ]);
        assert_eq!(available_times(&rs), vec!["T1", "T2", "T10"]);
    }

    #[test]
    fn non_numeric_suffix_sorts_as_zero() {
        let rs = grouped(vec![("morning", vec![]), ("T1", vec![])]);
        // "morning" has no digits -> 0, so it sorts first.
        assert_eq!(available_times(&rs), vec!["morning", "T1"]);
    }

    #[test]
    fn flat_payload_has_no_times() {
        let rs = ResultSet::Flat(vec![result("banana", 0.5, None)]);
        assert!(available_times(&rs).is_empty());
    }

    #[test]
    fn stale_time_falls_back_to_first() {
        let times = vec!["T0".to_string(), "T1".to_string()];
        assert_eq!(resolve_time(&times, Some("T9")), Some("T0".to_string()));
        assert_eq!(resolve_time(&times, Some("T1")), Some("T1".to_string()));
        assert_eq!(resolve_time(&times, None), Some("T0".to_string()));
        assert_eq!(resolve_time(&[], Some("T0")), None);
    }

    #[test]
    fn section_strips_time_and_index_suffixes() {
        assert_eq!(section_of("Broccoli (T2)"), "broccoli");
        assert_eq!(section_of("Broccoli 12"), "broccoli");
        assert_eq!(section_of("banana"), "banana");
        assert_eq!(section_of("Red Onion (T0)"), "red onion");
        assert_eq!(section_of(""), "");
    }

    #[test]
    fn sections_span_all_times_or_one() {
        let rs = grouped(vec![
            ("T0", vec![result("banana (T0)", 0.5, None)]),
            ("T1", vec![result("avocado (T1)", 0.5, None)]),
        ]);
        assert_eq!(sections(&rs, SectionScope::AllTimes), vec!["avocado", "banana"]);
        assert_eq!(
            sections(&rs, SectionScope::SelectedTime("T1")),
            vec!["avocado"]
        );
        assert!(sections(&rs, SectionScope::SelectedTime("T9")).is_empty());
    }

    #[test]
    fn stale_section_falls_back_to_first() {
        let list = vec!["avocado".to_string(), "banana".to_string()];
        assert_eq!(
            resolve_section(&list, Some("kale")),
            Some("avocado".to_string())
        );
        assert_eq!(
            resolve_section(&list, Some("banana")),
            Some("banana".to_string())
        );
    }

    #[test]
    fn status_mapping_covers_all_buckets() {
        let threshold = 0.3;
        assert_eq!(
            bucket_for(&result("a", 0.9, Some("low")), threshold),
            StockBucket::Low
        );
        assert_eq!(
            bucket_for(&result("a", 0.9, Some("normal")), threshold),
            StockBucket::Medium
        );
        assert_eq!(
            bucket_for(&result("a", 0.1, Some("overstocked")), threshold),
            StockBucket::High
        );
        assert_eq!(
            bucket_for(&result("a", 0.9, Some("weird")), threshold),
            StockBucket::Medium
        );
        assert_eq!(bucket_for(&result("a", 0.1, None), threshold), StockBucket::Low);
        assert_eq!(bucket_for(&result("a", 0.5, None), threshold), StockBucket::Medium);
    }

    #[test]
    fn rows_for_grouped_selects_one_slot() {
        let payload = AnalysisPayload {
            timestamp: Some("2025-01-01T14:45:00Z".to_string()),
            results: grouped(vec![
                ("T0", vec![result("banana (T0)", 0.12, Some("low"))]),
                ("T1", vec![result("banana (T1)", 0.8, Some("normal"))]),
            ]),
            ..Default::default()
        };

        let rows = rows_for(&payload, Some("T1"), 0.3);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product, "Banana (T1)");
        assert_eq!(rows[0].stock_percent, 80);
        assert_eq!(rows[0].status, StockBucket::Medium);
        assert_eq!(rows[0].confidence_percent, Some(90));
        assert_eq!(rows[0].updated_at, "Jan 01, 14:45");

        // Stale selection falls back to T0.
        let rows = rows_for(&payload, Some("T7"), 0.3);
        assert_eq!(rows[0].product, "Banana (T0)");
        assert_eq!(rows[0].status, StockBucket::Low);
    }

    #[test]
    fn rows_default_reasoning() {
        let payload = AnalysisPayload {
            results: ResultSet::Flat(vec![result("tomato", 0.5, None)]),
            ..Default::default()
        };
        let rows = rows_for(&payload, None, 0.3);
        assert_eq!(rows[0].reasoning, "AI analysis completed");
        assert_eq!(rows[0].id, 1);
    }

    #[test]
    fn unparseable_timestamp_shown_verbatim() {
        assert_eq!(format_updated_at(Some("yesterday")), "yesterday");
        assert_eq!(format_updated_at(None), "");
    }

    #[test]
    fn low_stock_honors_status_then_threshold() {
        let rs = ResultSet::Flat(vec![
            result("banana", 0.12, Some("low")),
            result("avocado", 0.25, None),
            result("onion", 0.25, Some("normal")),
            result("tomato", 0.9, None),
        ]);
        let lows = low_stock(&rs, None, 0.3);
        let names: Vec<&str> = lows.iter().map(|r| r.product.as_str()).collect();
        assert_eq!(names, vec!["banana", "avocado"]);
    }

    #[test]
    fn display_name_capitalizes_first_char() {
        assert_eq!(display_name("banana"), "Banana");
        assert_eq!(display_name("red onion"), "Red onion");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn percent_rounds_and_clamps() {
        assert_eq!(percent(0.125), 13);
        assert_eq!(percent(1.4), 100);
        assert_eq!(percent(-0.1), 0);
    }
}
