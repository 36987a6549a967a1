//! Typed façade over the state store.
//!
//! Wraps a [`StateStore`] with the four persisted slots the dashboard uses:
//! the latest analysis payload, the bounded history ring, and the two UI
//! selection keys. Key names and the history entry shape match the persisted
//! browser-state format of the original dashboard, so exported state stays
//! interchangeable.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::analysis::{self, AnalysisPayload, AnalysisResult, ResultSet};

use super::StateStore;

/// Persisted slot names.
pub const LATEST_KEY: &str = "latestAnalysis";
pub const HISTORY_KEY: &str = "historicalData";
pub const SELECTED_TIME_KEY: &str = "selectedTimeKey";
pub const SELECTED_SECTION_KEY: &str = "selectedSectionKey";

// ---------------------------------------------------------------------------
// History entry
// ---------------------------------------------------------------------------

/// One entry in the bounded upload history.
///
/// Exactly one of `grouped_results` / `results` is set, mirroring the two
/// payload shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalEntry {
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grouped_results: Option<BTreeMap<String, Vec<AnalysisResult>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<AnalysisResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_count: Option<u32>,
}

impl HistoricalEntry {
    /// Build an entry from a payload, preserving its shape.
    pub fn from_payload(payload: &AnalysisPayload, image_count: u32) -> Self {
        let (grouped_results, results) = match &payload.results {
            ResultSet::Grouped(groups) => (Some(groups.clone()), None),
            ResultSet::Flat(rows) => (None, Some(rows.clone())),
        };
        Self {
            timestamp: Utc::now().to_rfc3339(),
            grouped_results,
            results,
            image_count: Some(image_count),
        }
    }
}

// ---------------------------------------------------------------------------
// Façade
// ---------------------------------------------------------------------------

/// Typed access to the persisted dashboard state.
pub struct StockStore<S: StateStore> {
    store: S,
    history_capacity: usize,
}

impl<S: StateStore> StockStore<S> {
    pub fn new(store: S, history_capacity: usize) -> Self {
        Self {
            store,
            history_capacity,
        }
    }

    // -- latest analysis ---------------------------------------------------

    /// The latest analysis payload, or `None` when absent or malformed.
    pub fn latest(&self) -> Option<AnalysisPayload> {
        let raw = self.store.get(LATEST_KEY)?;
        analysis::parse_payload(&raw)
    }

    /// Overwrite the latest-analysis slot. Never merged with prior data.
    pub fn set_latest(&self, payload: &AnalysisPayload) -> Result<()> {
        let raw = serde_json::to_string(payload).context("failed to serialize payload")?;
        self.store.set(LATEST_KEY, &raw)
    }

    // -- history ring ------------------------------------------------------

    /// All retained history entries, oldest first. Malformed data reads as
    /// empty rather than failing.
    pub fn history(&self) -> Vec<HistoricalEntry> {
        self.store
            .get(HISTORY_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    /// Append a history entry, evicting the oldest beyond capacity.
    pub fn append_history(&self, entry: HistoricalEntry) -> Result<()> {
        let mut entries = self.history();
        entries.push(entry);
        if entries.len() > self.history_capacity {
            let excess = entries.len() - self.history_capacity;
            entries.drain(..excess);
        }
        let raw = serde_json::to_string(&entries).context("failed to serialize history")?;
        self.store.set(HISTORY_KEY, &raw)
    }

    /// Store a fresh upload response: overwrite the latest slot and append
    /// a history entry derived from it.
    pub fn record(&self, payload: &AnalysisPayload, image_count: u32) -> Result<()> {
        self.set_latest(payload)?;
        self.append_history(HistoricalEntry::from_payload(payload, image_count))
    }

    // -- UI selections -----------------------------------------------------

    pub fn selected_time(&self) -> Option<String> {
        self.store.get(SELECTED_TIME_KEY)
    }

    pub fn set_selected_time(&self, key: &str) -> Result<()> {
        self.store.set(SELECTED_TIME_KEY, key)
    }

    pub fn selected_section(&self) -> Option<String> {
        self.store.get(SELECTED_SECTION_KEY)
    }

    pub fn set_selected_section(&self, key: &str) -> Result<()> {
        self.store.set(SELECTED_SECTION_KEY, key)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;

    fn payload(products: &[(&str, f64)]) -> AnalysisPayload {
        AnalysisPayload {
            timestamp: Some("2025-01-01T00:00:00Z".to_string()),
            results: ResultSet::Flat(
                products
                    .iter()
                    .map(|(name, pct)| AnalysisResult {
                        product: (*name).to_string(),
                        stock_percentage: *pct,
                        stock_status: None,
                        confidence: None,
                        bounding_box: None,
                        reasoning: None,
                    })
                    .collect(),
            ),
            ..Default::default()
        }
    }

    #[test]
    fn latest_overwrites_wholesale() {
        let store = StockStore::new(MemStore::new(), 10);
        assert!(store.latest().is_none());

        store.set_latest(&payload(&[("banana", 0.8)])).unwrap();
        store.set_latest(&payload(&[("tomato", 0.4)])).unwrap();

        let latest = store.latest().unwrap();
        let ResultSet::Flat(rows) = latest.results else {
            panic!("expected flat shape");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product, "tomato");
    }

    #[test]
    fn malformed_latest_reads_as_absent() {
        let mem = MemStore::new();
        mem.set(LATEST_KEY, "{ not json").unwrap();
        let store = StockStore::new(mem, 10);
        assert!(store.latest().is_none());
    }

    #[test]
    fn history_evicts_oldest_beyond_capacity() {
        let store = StockStore::new(MemStore::new(), 3);
        for i in 0..5 {
            store
                .append_history(HistoricalEntry {
                    timestamp: format!("2025-01-0{}T00:00:00Z", i + 1),
                    grouped_results: None,
                    results: Some(Vec::new()),
                    image_count: Some(1),
                })
                .unwrap();
        }
        let entries = store.history();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].timestamp, "2025-01-03T00:00:00Z");
        assert_eq!(entries[2].timestamp, "2025-01-05T00:00:00Z");
    }

    #[test]
    fn record_sets_latest_and_appends_history() {
        let store = StockStore::new(MemStore::new(), 10);
        store.record(&payload(&[("banana", 0.12)]), 2).unwrap();
        assert!(store.latest().is_some());
        let history = store.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].image_count, Some(2));
        assert!(history[0].results.is_some());
        assert!(history[0].grouped_results.is_none());
    }

    #[test]
    fn history_entry_keeps_grouped_shape() {
        let mut groups = BTreeMap::new();
        groups.insert("T0".to_string(), Vec::new());
        let payload = AnalysisPayload {
            results: ResultSet::Grouped(groups),
            ..Default::default()
        };
        let entry = HistoricalEntry::from_payload(&payload, 1);
        assert!(entry.grouped_results.is_some());
        assert!(entry.results.is_none());

        // camelCase field names on the wire.
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"groupedResults\""));
        assert!(json.contains("\"imageCount\""));
    }

    #[test]
    fn selection_keys_round_trip() {
        let store = StockStore::new(MemStore::new(), 10);
        assert!(store.selected_time().is_none());
        store.set_selected_time("T1").unwrap();
        store.set_selected_section("banana").unwrap();
        assert_eq!(store.selected_time().as_deref(), Some("T1"));
        assert_eq!(store.selected_section().as_deref(), Some("banana"));
    }
}
