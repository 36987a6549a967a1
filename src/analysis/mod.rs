//! Analysis payload model and ingestion.
//!
//! The remote estimation service answers every upload with one JSON payload.
//! Two wire shapes exist: a flat array of per-product results (single-image
//! uploads and legacy responses) and a mapping from time-slot key (`"T0"`,
//! `"T1"`, …) to result arrays (multi-image uploads). The shape is decided
//! exactly once at ingestion via [`ResultSet`]; downstream code matches on
//! the variant instead of re-sniffing JSON types.

pub mod normalize;
pub mod projection;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// One detected product in one analyzed image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Free-form product label, lower-cased by convention. Multi-image
    /// responses may embed a trailing time tag, e.g. `"banana (T0)"`.
    pub product: String,
    /// Estimated fill level of the shelf section, in `[0, 1]`.
    pub stock_percentage: f64,
    /// Explicit classification from the service: `"low"`, `"normal"`, or
    /// `"overstocked"`. Absent or unrecognized values are tolerated — the
    /// normalizer derives a bucket from `stock_percentage` instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_status: Option<String>,
    /// Model confidence in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Detection bounding box. Carried through untouched, never interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<serde_json::Value>,
    /// Model's free-text explanation for the estimate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl AnalysisResult {
    /// Whether this result counts as a low-stock alert.
    ///
    /// An explicit status wins; only when the service sent none does the
    /// percentage threshold apply.
    pub fn is_low(&self, threshold: f64) -> bool {
        match self.stock_status.as_deref() {
            Some(status) => status == "low",
            None => self.stock_percentage < threshold,
        }
    }
}

/// The two wire shapes of `results`, decided once at ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultSet {
    /// A single ordered sequence of results.
    Flat(Vec<AnalysisResult>),
    /// Results grouped per time slot. `BTreeMap` keeps serialization
    /// deterministic; display order is numeric-suffix order, computed by
    /// [`normalize::available_times`].
    Grouped(BTreeMap<String, Vec<AnalysisResult>>),
}

impl ResultSet {
    /// True when there is not a single result in any shape.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Flat(rows) => rows.is_empty(),
            Self::Grouped(groups) => groups.values().all(Vec::is_empty),
        }
    }

    /// Total result count across all time slots.
    pub fn len(&self) -> usize {
        match self {
            Self::Flat(rows) => rows.len(),
            Self::Grouped(groups) => groups.values().map(Vec::len).sum(),
        }
    }
}

impl Default for ResultSet {
    fn default() -> Self {
        Self::Flat(Vec::new())
    }
}

/// One upload's full response from the estimation service.
///
/// Stored wholesale under the `latestAnalysis` key and fully superseded by
/// the next upload — never merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Server-side processing time in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,
    /// ISO datetime string set by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub results: ResultSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
    /// Opaque metadata about the processed image(s).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_metadata: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

/// Parse a stored or freshly received payload.
///
/// Malformed JSON is a recoverable condition: the dashboard renders its
/// empty state rather than failing, so this returns `None` instead of an
/// error.
pub fn parse_payload(raw: &str) -> Option<AnalysisPayload> {
    serde_json::from_str(raw).ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
