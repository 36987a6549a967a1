use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use shelfwatch::{cli, config, web};

#[derive(Debug, Parser)]
#[command(name = "shelfwatch")]
#[command(about = "AI shelf-stock monitoring dashboard")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the web dashboard
    Web {
        /// Listen address, e.g. 127.0.0.1:9748 (defaults to config)
        #[arg(long)]
        addr: Option<String>,
        /// Do not open the dashboard in a browser
        #[arg(long)]
        no_open: bool,
    },
    /// Upload shelf photos and store the analysis
    Upload {
        /// Image files to analyze
        #[arg(required = true)]
        images: Vec<PathBuf>,
        /// Comma-separated product hints, overriding the configured list
        #[arg(long)]
        products: Option<String>,
        /// Confidence threshold override, 0.0 to 1.0
        #[arg(long)]
        confidence: Option<f64>,
    },
    /// Show the latest analysis summary and inventory table
    Summary {
        /// Time slot to show (grouped analyses only)
        #[arg(long)]
        time: Option<String>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// List low-stock products from the latest analysis
    Alerts {
        /// Time slot to check (grouped analyses only)
        #[arg(long)]
        time: Option<String>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show retained analyses and the upload journal
    History {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// List the distinct shelf sections in the latest analysis
    Sections,
    /// Check system health: estimation service, config, stored state
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective merged configuration
    Show,
    /// Write a commented default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Set one key in the global config file, e.g. api.base_url
    Set { key: String, value: String },
    /// Reset the global config file to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Web { addr, no_open } => {
            let cfg = config::load();
            let addr = addr.unwrap_or(cfg.web.addr);
            web::serve(&addr, cfg.web.open_browser && !no_open)
        }
        Commands::Upload {
            images,
            products,
            confidence,
        } => cli::run_upload(&images, products.as_deref(), confidence),
        Commands::Summary { time, format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_summary(time.as_deref(), fmt)
        }
        Commands::Alerts { time, format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_alerts(time.as_deref(), fmt)
        }
        Commands::History { format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_history(fmt)
        }
        Commands::Sections => cli::run_sections(),
        Commands::Health => cli::run_health(),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
