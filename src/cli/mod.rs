//! CLI command implementations.
//!
//! Everything the dashboard shows is also reachable from the terminal:
//! summaries, alerts, upload history, health, and config management. The
//! table renderers are for humans; `--format json|csv` feeds scripts.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use colored::Colorize;

use crate::analysis::normalize::{self, SectionScope};
use crate::analysis::projection;
use crate::client::{AnalysisClient, UploadFile};
use crate::config;
use crate::journal::{self, UploadLogEntry};
use crate::store;

/// Output format for reporting commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// shelfwatch upload
// ---------------------------------------------------------------------------

/// Upload shelf photos from disk and store the analysis.
pub fn run_upload(
    images: &[PathBuf],
    products: Option<&str>,
    confidence: Option<f64>,
) -> Result<()> {
    let cfg = config::load();

    let mut api_cfg = cfg.api.clone();
    if let Some(list) = products {
        let list: Vec<String> = list
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if !list.is_empty() {
            api_cfg.products = list;
        }
    }
    if let Some(value) = confidence {
        api_cfg.confidence_threshold = value;
    }

    let mut files = Vec::with_capacity(images.len());
    for path in images {
        files.push(UploadFile::from_path(path)?);
    }

    println!(
        "Uploading {} image(s) to {} ...",
        files.len(),
        api_cfg.base_url.cyan()
    );

    let client = AnalysisClient::from_config(&api_cfg);
    let started = Instant::now();
    match client.estimate_stock(&files) {
        Ok(payload) => {
            let elapsed = started.elapsed();
            let stock = store::open(&cfg.store);
            stock.record(&payload, files.len() as u32)?;

            let mut entry =
                UploadLogEntry::new(files.len(), "ok", elapsed.as_millis() as u64);
            entry.result_count = Some(payload.results.len());
            entry.model_used = payload.model_used.clone();
            journal::log_upload(&cfg.logging, &entry);

            println!(
                "{} {} product(s) analyzed in {:.1}s",
                "✓".green().bold(),
                payload.results.len(),
                elapsed.as_secs_f64()
            );
            if let Some(model) = &payload.model_used {
                println!("  {} {}", "Model:".bold(), model);
            }
            println!();
            run_summary(None, OutputFormat::Table)
        }
        Err(err) => {
            journal::log_upload(
                &cfg.logging,
                &UploadLogEntry::new(files.len(), err.kind(), started.elapsed().as_millis() as u64),
            );
            println!("{} {}", "✗".red().bold(), err);
            std::process::exit(1);
        }
    }
}

// ---------------------------------------------------------------------------
// shelfwatch summary
// ---------------------------------------------------------------------------

/// Show the latest analysis as summary counts plus the inventory table.
pub fn run_summary(time: Option<&str>, format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let stock = store::open(&cfg.store);

    let Some(payload) = stock.latest() else {
        println!(
            "{}",
            "No analysis stored yet. Run `shelfwatch upload <images>` first.".yellow()
        );
        return Ok(());
    };

    let times = normalize::available_times(&payload.results);
    let requested = time.map(str::to_string).or_else(|| stock.selected_time());
    let selected_time = normalize::resolve_time(&times, requested.as_deref());
    let rows = normalize::rows_for(&payload, selected_time.as_deref(), cfg.thresholds.low_stock);
    let summary = projection::summarize(&rows);

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "timestamp": payload.timestamp,
                "model_used": payload.model_used,
                "times": times,
                "selected_time": selected_time,
                "summary": summary,
                "rows": rows,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Csv => {
            println!("id,product,stock_percent,status,confidence_percent,updated_at");
            for row in &rows {
                println!(
                    "{},{},{},{},{},{}",
                    row.id,
                    row.product,
                    row.stock_percent,
                    row.status,
                    row.confidence_percent
                        .map(|c| c.to_string())
                        .unwrap_or_default(),
                    row.updated_at,
                );
            }
        }
        OutputFormat::Table => print_summary_table(&payload, &times, selected_time, &rows, summary),
    }

    Ok(())
}

fn print_summary_table(
    payload: &crate::analysis::AnalysisPayload,
    times: &[String],
    selected_time: Option<String>,
    rows: &[normalize::ProductViewRow],
    summary: projection::Summary,
) {
    println!("{}", "Shelf Stock Summary".bold().cyan());
    println!("{}", "=".repeat(60));
    if let Some(ts) = &payload.timestamp {
        println!("  {} {}", "Analyzed:".bold(), ts);
    }
    if let Some(model) = &payload.model_used {
        println!("  {} {}", "Model:   ".bold(), model);
    }
    if !times.is_empty() {
        let labels: Vec<String> = times
            .iter()
            .map(|t| {
                if Some(t.as_str()) == selected_time.as_deref() {
                    format!("[{t}]")
                } else {
                    t.clone()
                }
            })
            .collect();
        println!("  {} {}", "Slots:   ".bold(), labels.join(" "));
    }
    println!();
    println!(
        "  {} total   {} low   {} medium   {} high",
        summary.total.to_string().bold(),
        summary.low.to_string().red(),
        summary.medium.to_string().yellow(),
        summary.high.to_string().green(),
    );
    println!();

    if rows.is_empty() {
        println!("  {}", "(no products in this slot)".dimmed());
        return;
    }

    println!(
        "  {:<3} {:<22} {:>6}  {:<8} {:>6}  {}",
        "#".bold(),
        "Product".bold(),
        "Stock".bold(),
        "Status".bold(),
        "Conf".bold(),
        "Updated".bold(),
    );
    println!("  {}", "-".repeat(58));
    for row in rows {
        let status = match row.status {
            normalize::StockBucket::Low => "Low".red().to_string(),
            normalize::StockBucket::Medium => "Medium".yellow().to_string(),
            normalize::StockBucket::High => "High".green().to_string(),
        };
        let conf = row
            .confidence_percent
            .map(|c| format!("{c}%"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<3} {:<22} {:>5}%  {:<8} {:>6}  {}",
            row.id,
            row.product,
            row.stock_percent,
            status,
            conf,
            row.updated_at.dimmed(),
        );
    }
}

// ---------------------------------------------------------------------------
// shelfwatch alerts
// ---------------------------------------------------------------------------

/// List low-stock products from the latest analysis.
pub fn run_alerts(time: Option<&str>, format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let stock = store::open(&cfg.store);

    let Some(payload) = stock.latest() else {
        println!("{}", "No analysis stored yet.".yellow());
        return Ok(());
    };

    let times = normalize::available_times(&payload.results);
    let requested = time.map(str::to_string).or_else(|| stock.selected_time());
    let selected_time = normalize::resolve_time(&times, requested.as_deref());
    let lows = normalize::low_stock(
        &payload.results,
        selected_time.as_deref(),
        cfg.thresholds.low_stock,
    );

    match format {
        OutputFormat::Json => {
            let values: Vec<serde_json::Value> = lows
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "product": normalize::display_name(&r.product),
                        "stock_percentage": r.stock_percentage,
                        "reasoning": r.reasoning,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&values)?);
        }
        OutputFormat::Csv => {
            println!("product,stock_percentage,reasoning");
            for r in &lows {
                println!(
                    "{},{},{}",
                    normalize::display_name(&r.product),
                    r.stock_percentage,
                    r.reasoning.as_deref().unwrap_or_default(),
                );
            }
        }
        OutputFormat::Table => {
            println!("{}", "Low Stock Alerts".bold().cyan());
            println!("{}", "=".repeat(40));
            if lows.is_empty() {
                println!(
                    "  {} all monitored products sufficiently stocked",
                    "✓".green().bold()
                );
            } else {
                for r in &lows {
                    let pct = (r.stock_percentage.clamp(0.0, 1.0) * 100.0).round();
                    println!(
                        "  {} {:<22} {:>5}%  {}",
                        "!".red().bold(),
                        normalize::display_name(&r.product),
                        pct,
                        r.reasoning.as_deref().unwrap_or("").dimmed(),
                    );
                }
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// shelfwatch history
// ---------------------------------------------------------------------------

/// Show retained analyses and the upload journal.
pub fn run_history(format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let stock = store::open(&cfg.store);
    let entries = stock.history();
    let uploads = journal::read_all_entries(&cfg.logging);

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({ "entries": entries, "uploads": uploads });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Csv => {
            println!("timestamp,image_count,product_count");
            for e in &entries {
                let count: usize = match (&e.grouped_results, &e.results) {
                    (Some(groups), _) => groups.values().map(Vec::len).sum(),
                    (None, Some(rows)) => rows.len(),
                    (None, None) => 0,
                };
                println!(
                    "{},{},{}",
                    e.timestamp,
                    e.image_count.map(|c| c.to_string()).unwrap_or_default(),
                    count,
                );
            }
        }
        OutputFormat::Table => {
            println!("{}", "Analysis History".bold().cyan());
            println!("{}", "=".repeat(50));
            if entries.is_empty() {
                println!("  {}", "(empty)".dimmed());
            }
            for e in &entries {
                let (count, slots): (usize, usize) = match (&e.grouped_results, &e.results) {
                    (Some(groups), _) => (groups.values().map(Vec::len).sum(), groups.len()),
                    (None, Some(rows)) => (rows.len(), 0),
                    (None, None) => (0, 0),
                };
                let shape = if slots > 0 {
                    format!("{count} products over {slots} slots")
                } else {
                    format!("{count} products")
                };
                println!(
                    "  {}  {:<28} {}",
                    e.timestamp.dimmed(),
                    shape,
                    e.image_count
                        .map(|c| format!("{c} image(s)"))
                        .unwrap_or_default()
                        .dimmed(),
                );
            }

            if !uploads.is_empty() {
                println!();
                println!("{}", "Upload Journal".bold().cyan());
                println!("{}", "-".repeat(50));
                for u in uploads.iter().rev().take(10) {
                    let mark = if u.outcome == "ok" {
                        "✓".green().bold()
                    } else {
                        "✗".red().bold()
                    };
                    println!(
                        "  {} {}  {} image(s), {}ms, {}",
                        mark, u.timestamp, u.image_count, u.duration_ms, u.outcome
                    );
                }
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// shelfwatch health
// ---------------------------------------------------------------------------

/// Check system health: estimation service, config, stored state, journal.
pub fn run_health() -> Result<()> {
    println!("{}", "Shelfwatch Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = Path::new(".shelfwatch.toml").exists();
    let cfg = config::load();

    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.shelfwatch/config.toml found"
        } else {
            "not found (run `shelfwatch config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".shelfwatch.toml found"
        } else {
            "none (optional)"
        },
    );

    let client = AnalysisClient::from_config(&cfg.api);
    let api_ok = client.is_healthy();
    let api_detail = if api_ok {
        format!("reachable at {}", cfg.api.base_url)
    } else {
        format!("not reachable at {}", cfg.api.base_url)
    };
    print_health_item("Estimation service", api_ok, &api_detail);

    let stock = store::open(&cfg.store);
    let has_latest = stock.latest().is_some();
    print_health_item(
        "Stored analysis",
        has_latest,
        if has_latest {
            "latest payload present"
        } else {
            "none yet"
        },
    );
    let history_len = stock.history().len();
    print_health_item(
        "History",
        true,
        &format!("{history_len}/{} entries", cfg.store.history_capacity),
    );

    let journal_exists = journal::journal_path(&cfg.logging).exists();
    let journal_len = journal::read_all_entries(&cfg.logging).len();
    print_health_item(
        "Upload journal",
        journal_exists,
        &if journal_exists {
            format!("{journal_len} entries")
        } else {
            "no journal file yet".to_string()
        },
    );

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<22} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// shelfwatch sections
// ---------------------------------------------------------------------------

/// List the distinct shelf sections in the latest analysis.
pub fn run_sections() -> Result<()> {
    let cfg = config::load();
    let stock = store::open(&cfg.store);

    let Some(payload) = stock.latest() else {
        println!("{}", "No analysis stored yet.".yellow());
        return Ok(());
    };

    let sections = normalize::sections(&payload.results, SectionScope::AllTimes);
    println!("{}", "Shelf Sections".bold().cyan());
    println!("{}", "=".repeat(30));
    for section in &sections {
        println!("  {section}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// shelfwatch config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective Shelfwatch Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = Path::new(".shelfwatch.toml").exists();
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    if global_exists {
        println!("  {} {}", "✓".green(), "~/.shelfwatch/config.toml".dimmed());
    } else {
        println!(
            "  {} {}",
            "·".dimmed(),
            "~/.shelfwatch/config.toml (not found)".dimmed()
        );
    }
    if project_exists {
        println!("  {} {}", "✓".green(), ".shelfwatch.toml".dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), ".shelfwatch.toml (not found)".dimmed());
    }
    println!("  {} SHELFWATCH_* environment variables", "·".dimmed());
    Ok(())
}

/// Create a commented default config file.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} wrote default config to {}",
        "✓".green().bold(),
        path.display().to_string().cyan()
    );
    Ok(())
}

/// Set one config key in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset the global config file to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} reset {} to defaults",
        "✓".green().bold(),
        path.display().to_string().cyan()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_parses() {
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_opt(Some("csv")), OutputFormat::Csv);
        assert_eq!(
            OutputFormat::from_str_opt(Some("table")),
            OutputFormat::Table
        );
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
        assert_eq!(
            OutputFormat::from_str_opt(Some("bogus")),
            OutputFormat::Table
        );
    }
}
