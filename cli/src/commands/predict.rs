use anyhow::Context;
use colored::*;
use etacast_common::config::Config;
use etacast_common::success;
use etacast_core::service::PredictionService;
use serde_json::json;

use crate::commands::{PredictArgs, load_registry, open_store};
use crate::terminal::{format, print};

const KEY_WIDTH: usize = 8;

pub fn predict(args: PredictArgs, cfg: &Config) -> anyhow::Result<()> {
    let store = open_store(cfg);
    let registry = load_registry(store.as_ref(), cfg)?;
    let service = PredictionService::new(registry, store);
    let model = args.model;

    if args.dry_run {
        let minutes = service
            .preview(model, args.request())
            .with_context(|| format!("{model} could not score the order"))?;

        if cfg.json {
            print::print(&json!({ "model": model, "minutes": minutes }).to_string());
        } else {
            print::header("preview", cfg.quiet);
            print::aligned_line("Model", model.to_string(), KEY_WIDTH);
            print::aligned_line("Estimate", format::minutes(minutes), KEY_WIDTH);
        }
        return Ok(());
    }

    let estimate = service
        .estimate(model, args.request())
        .with_context(|| format!("{model} could not record the order"))?;

    if cfg.json {
        let out = json!({
            "model": estimate.kind,
            "minutes": estimate.minutes,
            "record": estimate.record,
        });
        print::print(&serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print::header("estimate", cfg.quiet);
    print::aligned_line("Model", estimate.kind.to_string(), KEY_WIDTH);
    print::aligned_line("Estimate", format::minutes(estimate.minutes), KEY_WIDTH);
    if let Some(at) = estimate.record.actual_delivery_time {
        print::aligned_line("Arrival", format::timestamp(at).bold(), KEY_WIDTH);
    }
    if let Some(id) = estimate.record.id {
        success!("Recorded as delivery {id}");
    }
    Ok(())
}
