//! Summary counts and chart series derived from normalized rows.
//!
//! All projections are recomputed from the stored payload on every read, so
//! rendering twice from the same data is guaranteed to produce identical
//! output.

use serde::Serialize;

use super::ResultSet;
use super::normalize::{self, ProductViewRow, StockBucket};

// ---------------------------------------------------------------------------
// Summary counts
// ---------------------------------------------------------------------------

/// Dashboard summary card counts for the active row set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

/// Tally row statuses into summary counts.
pub fn summarize(rows: &[ProductViewRow]) -> Summary {
    let mut summary = Summary {
        total: rows.len(),
        ..Summary::default()
    };
    for row in rows {
        match row.status {
            StockBucket::Low => summary.low += 1,
            StockBucket::Medium => summary.medium += 1,
            StockBucket::High => summary.high += 1,
        }
    }
    summary
}

// ---------------------------------------------------------------------------
// Chart series
// ---------------------------------------------------------------------------

/// One bar in the latest-snapshot bar chart.
#[derive(Debug, Clone, Serialize)]
pub struct BarPoint {
    pub name: String,
    pub stock: u32,
    /// Deterministic per-section fill color.
    pub color: String,
}

/// Bar series over the active row set, in encounter order.
pub fn bar_series(rows: &[ProductViewRow]) -> Vec<BarPoint> {
    rows.iter()
        .map(|row| BarPoint {
            name: row.product.clone(),
            stock: row.stock_percent,
            color: color_for_section(&normalize::section_of(&row.product)),
        })
        .collect()
}

/// One point in a per-section line chart.
///
/// `stock` is `None` when the section was not detected at that time — the
/// chart renders a gap, never a zero.
#[derive(Debug, Clone, Serialize)]
pub struct LinePoint {
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

/// Value-over-time series for one section across all time slots.
///
/// Flat payloads carry no time dimension; the series is empty.
pub fn line_series(results: &ResultSet, section: &str) -> Vec<LinePoint> {
    let ResultSet::Grouped(groups) = results else {
        return Vec::new();
    };

    normalize::available_times(results)
        .into_iter()
        .map(|time| {
            let stock = groups
                .get(&time)
                .and_then(|rows| {
                    rows.iter()
                        .find(|r| normalize::section_of(&r.product) == section)
                })
                .map(|r| (r.stock_percentage.clamp(0.0, 1.0) * 100.0).round() as u32);
            LinePoint { time, stock }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

/// Deterministic chart color for a section name.
///
/// djb2 hash mapped to an HSL hue, so the same section renders identically
/// across renders and restarts. Not insertion-order-based, not random.
pub fn color_for_section(section: &str) -> String {
    let key = if section.is_empty() { "unknown" } else { section };
    let mut hash: u32 = 5381;
    for byte in key.bytes() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_add(hash)
            .wrapping_add(u32::from(byte));
    }
    let hue = hash % 360;
    format!("hsl({hue}, 65%, 50%)")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisResult;
    use std::collections::BTreeMap;

    fn row(product: &str, pct: u32, status: StockBucket) -> ProductViewRow {
        ProductViewRow {
            id: 1,
            product: product.to_string(),
            stock_percent: pct,
            status,
            confidence_percent: None,
            reasoning: String::new(),
            updated_at: String::new(),
        }
    }

    fn result(product: &str, pct: f64) -> AnalysisResult {
        AnalysisResult {
            product: product.to_string(),
            stock_percentage: pct,
            stock_status: None,
            confidence: None,
            bounding_box: None,
            reasoning: None,
        }
    }

    #[test]
    fn summary_tallies_buckets() {
        let rows = vec![
            row("Banana", 12, StockBucket::Low),
            row("Avocado", 60, StockBucket::Medium),
            row("Tomato", 95, StockBucket::High),
            row("Onion", 45, StockBucket::Medium),
        ];
        let summary = summarize(&rows);
        assert_eq!(
            summary,
            Summary {
                total: 4,
                low: 1,
                medium: 2,
                high: 1
            }
        );
    }

    #[test]
    fn empty_rows_give_zero_summary() {
        assert_eq!(summarize(&[]), Summary::default());
    }

    #[test]
    fn bar_series_preserves_encounter_order() {
        let rows = vec![
            row("Tomato", 95, StockBucket::High),
            row("Banana", 12, StockBucket::Low),
        ];
        let bars = bar_series(&rows);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].name, "Tomato");
        assert_eq!(bars[0].stock, 95);
        assert_eq!(bars[1].name, "Banana");
    }

    #[test]
    fn bar_colors_ignore_time_tags() {
        let rows = vec![
            row("Banana (T0)", 50, StockBucket::Medium),
            row("Banana (T1)", 70, StockBucket::Medium),
        ];
        let bars = bar_series(&rows);
        // Same section -> same color regardless of the time tag.
        assert_eq!(bars[0].color, bars[1].color);
    }

    #[test]
    fn line_series_has_gaps_not_zeros() {
        let mut groups: BTreeMap<String, Vec<AnalysisResult>> = BTreeMap::new();
        groups.insert("T0".to_string(), vec![result("banana (T0)", 0.85)]);
        groups.insert("T1".to_string(), vec![result("avocado (T1)", 0.6)]);
        groups.insert("T2".to_string(), vec![result("banana (T2)", 0.4)]);
        let rs = ResultSet::Grouped(groups);

        let series = line_series(&rs, "banana");
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].stock, Some(85));
        assert_eq!(series[1].stock, None);
        assert_eq!(series[2].stock, Some(40));
    }

    #[test]
    fn line_series_empty_for_flat() {
        let rs = ResultSet::Flat(vec![result("banana", 0.5)]);
        assert!(line_series(&rs, "banana").is_empty());
    }

    #[test]
    fn color_is_pure_and_discriminating() {
        assert_eq!(color_for_section("banana"), color_for_section("banana"));
        assert_ne!(color_for_section("banana"), color_for_section("broccoli"));
        assert_eq!(color_for_section(""), color_for_section("unknown"));
        assert!(color_for_section("banana").starts_with("hsl("));
    }
}
