use anyhow::Context;
use colored::*;
use etacast_common::config::Config;
use etacast_common::warn;
use etacast_core::analytics::{
    AnalyticsAggregator, AverageTimeReport, Scoped, TrafficImpact, TrafficImpactReport,
};

use crate::commands::{Report, load_registry, open_store};
use crate::etaprint;
use crate::terminal::{colors, format, print};

const KEY_WIDTH: usize = 13;

pub fn analytics(report: Report, cfg: &Config) -> anyhow::Result<()> {
    let store = open_store(cfg);
    let registry = load_registry(store.as_ref(), cfg)?;
    let aggregator = AnalyticsAggregator::new(registry, store);

    match report {
        Report::Average => {
            let report = aggregator
                .average_delivery_time_report()
                .context("average delivery time report failed")?;
            if cfg.json {
                print::print(&serde_json::to_string_pretty(&report)?);
            } else {
                print_average(&report, cfg);
            }
        }
        Report::Traffic => {
            let report = aggregator
                .traffic_impact_report()
                .context("traffic impact report failed")?;
            if cfg.json {
                print::print(&serde_json::to_string_pretty(&report)?);
            } else {
                print_traffic(&report, cfg);
            }
        }
    }
    Ok(())
}

fn print_average(report: &AverageTimeReport, cfg: &Config) {
    print::header("average delivery time", cfg.quiet);

    let summary = match &report.model_based_predictions {
        Scoped::Ready(summary) => summary,
        Scoped::Failed { error } => {
            warn!("{error}");
            print::no_results("predictions");
            return;
        }
    };

    print::aligned_line("Actual", format::minutes(summary.actual_average_time_minutes), KEY_WIDTH);
    print::aligned_line("Sample", format::sample(summary.sample_size, summary.skipped), KEY_WIDTH);
    print::aligned_line("Total records", report.total_records.to_string(), KEY_WIDTH);
    etaprint!();

    for (idx, (kind, accuracy)) in summary.models.iter().enumerate() {
        let name = if kind == summary.most_accurate_model {
            format!("{kind} (most accurate)")
        } else {
            kind.to_string()
        };
        print::tree_head(idx, &name);
        print::as_tree_one_level(format::accuracy_details(accuracy));
    }

    if cfg.quiet == 0 {
        print::fat_separator();
    }
}

fn print_traffic(report: &TrafficImpactReport, cfg: &Config) {
    print::header("traffic impact", cfg.quiet);
    let impact = &report.model_based_traffic_impact;

    print_scope("overall", &impact.overall);
    for (market, scope) in &impact.by_market {
        etaprint!();
        print_scope(&format!("market {market}"), scope);
    }

    if cfg.quiet == 0 {
        print::fat_separator();
        print::print_status(report.note.color(colors::MUTED).to_string());
    }
    print::aligned_line("Total records", report.total_records.to_string(), KEY_WIDTH);
}

fn print_scope(name: &str, scope: &Scoped<TrafficImpact>) {
    print::tree_head("~", name);
    match scope {
        Scoped::Ready(impact) => print::as_tree_one_level(format::impact_details(impact)),
        Scoped::Failed { error } => {
            print::as_tree_one_level(vec![("Error".to_string(), error.color(colors::BAD))]);
        }
    }
}
