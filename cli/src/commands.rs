pub mod analytics;
pub mod complete;
pub mod predict;
pub mod records;
pub mod train;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDateTime;
use clap::{ArgAction, Args, Parser, Subcommand};
use etacast_common::config::{Config, DEFAULT_SNAPSHOT_PATH, DEFAULT_STORE_PATH};
use etacast_common::delivery::kind::ModelKind;
use etacast_common::store::RecordStore;
use etacast_core::registry::ModelRegistry;
use etacast_core::service::PredictionRequest;
use etacast_core::store::JsonLinesRecordStore;

#[derive(Parser)]
#[command(name = "etacast")]
#[command(version, about = "Delivery-time prediction and accuracy analytics.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// JSON-lines file holding delivery records
    #[arg(long, global = true, env = "ETACAST_STORE", default_value = DEFAULT_STORE_PATH)]
    pub store: PathBuf,

    /// Snapshot file for the simple regression
    #[arg(long, global = true, env = "ETACAST_SNAPSHOT", default_value = DEFAULT_SNAPSHOT_PATH)]
    pub snapshot: PathBuf,

    /// Never read or write the simple regression snapshot
    #[arg(long, global = true)]
    pub no_snapshot: bool,

    /// Reduce output (-q hides decorations, -qq prints results only)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fit every model and show its parameters
    #[command(alias = "t")]
    Train {
        /// Discard the snapshot and refit the simple regression
        #[arg(long)]
        retrain: bool,
    },
    /// Estimate the delivery time of a new order
    #[command(alias = "p")]
    Predict(PredictArgs),
    /// List stored delivery records
    #[command(alias = "r")]
    Records {
        /// Show only the most recent N records
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Mark a delivery as arrived
    #[command(alias = "c")]
    Complete {
        id: u64,
        /// Arrival time, e.g. 2015-02-06T22:24:17 (defaults to now)
        #[arg(long)]
        at: Option<NaiveDateTime>,
    },
    /// Compare model predictions with observed delivery times
    #[command(alias = "a")]
    Analytics {
        #[command(subcommand)]
        report: Report,
    },
}

#[derive(Subcommand, Clone, Copy)]
pub enum Report {
    /// Average predicted versus actual delivery time
    #[command(alias = "avg")]
    Average,
    /// Actual over predicted time, overall and per market
    #[command(alias = "tr")]
    Traffic,
}

#[derive(Args)]
pub struct PredictArgs {
    /// Model to use: simple, multiple or polynomial
    pub model: ModelKind,

    #[arg(long)]
    pub market: Option<i32>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub items: Option<u32>,

    #[arg(long)]
    pub subtotal: Option<f64>,

    /// Estimated driving duration in minutes
    #[arg(long)]
    pub duration: Option<f64>,

    /// Show the estimate without recording it
    #[arg(long)]
    pub dry_run: bool,
}

impl PredictArgs {
    pub fn request(&self) -> PredictionRequest {
        PredictionRequest {
            market_id: self.market,
            category: self.category.clone(),
            total_items: self.items,
            subtotal: self.subtotal,
            driving_duration: self.duration,
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> Config {
        Config {
            store_path: self.store.clone(),
            snapshot_path: (!self.no_snapshot).then(|| self.snapshot.clone()),
            quiet: self.quiet,
            json: self.json,
        }
    }
}

pub fn open_store(cfg: &Config) -> Arc<dyn RecordStore> {
    Arc::new(JsonLinesRecordStore::new(&cfg.store_path))
}

pub fn load_registry(store: &dyn RecordStore, cfg: &Config) -> anyhow::Result<Arc<ModelRegistry>> {
    let registry = ModelRegistry::initialize(store, cfg.snapshot_path.as_deref())
        .with_context(|| format!("could not initialize models from {}", cfg.store_path.display()))?;
    Ok(Arc::new(registry))
}
