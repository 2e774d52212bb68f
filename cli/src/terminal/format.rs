use chrono::NaiveDateTime;
use colored::*;
use etacast_common::delivery::kind::PerModel;
use etacast_common::delivery::record::DeliveryRecord;
use etacast_core::analytics::{ModelAccuracy, Ratio, TrafficImpact};
use etacast_core::registry::{ModelOrigin, ModelSummary};

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

pub fn minutes(value: f64) -> ColoredString {
    format!("{value:.2} min").color(colors::ACCENT)
}

pub fn difference(value: f64) -> ColoredString {
    format!("{value:+.2} min").color(colors::TEXT_DEFAULT)
}

/// Ratios above 1 mean the model under-predicted.
pub fn ratio(value: Ratio) -> ColoredString {
    match value {
        Ratio::Defined(v) if v > 1.0 => format!("{v:.3}").color(colors::BAD),
        Ratio::Defined(v) => format!("{v:.3}").color(colors::GOOD),
        Ratio::Undefined => "undefined".color(colors::MUTED).italic(),
    }
}

pub fn timestamp(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn sample(used: usize, skipped: usize) -> ColoredString {
    match skipped {
        0 => used.to_string().normal(),
        _ => format!("{used} ({skipped} skipped)").yellow(),
    }
}

pub fn accuracy_details(accuracy: &ModelAccuracy) -> Vec<Detail> {
    vec![
        ("Predicted".to_string(), minutes(accuracy.average_predicted_time_minutes)),
        ("Error".to_string(), difference(accuracy.difference_from_actual_minutes)),
        ("Ratio".to_string(), ratio(accuracy.ratio_to_actual)),
    ]
}

pub fn impact_details(impact: &TrafficImpact) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![(
        "Actual".to_string(),
        minutes(impact.average_actual_minutes),
    )];

    let per_model: PerModel<Detail> = impact.prediction_minutes.map(|kind, predicted| {
        let value = format!(
            "{} {} {}",
            minutes(*predicted),
            "x".color(colors::SEPARATOR),
            ratio(*impact.impact_ratio.get(kind))
        );
        (kind.as_str().to_string(), value.normal())
    });
    details.extend(per_model.iter().map(|(_, detail)| detail.clone()));

    details.push(("Sample".to_string(), sample(impact.sample_size, impact.skipped)));
    details
}

pub fn record_details(record: &DeliveryRecord) -> Vec<Detail> {
    let mut details: Vec<Detail> = Vec::new();

    if let Some(market) = record.market_id {
        details.push(("Market".to_string(), market.to_string().normal()));
    }
    if let Some(category) = &record.store_primary_category {
        details.push(("Category".to_string(), category.normal()));
    }
    details.push(("Created".to_string(), timestamp(record.created_at).normal()));

    let delivered: ColoredString = match record.actual_delivery_time {
        Some(at) => timestamp(at).color(colors::GOOD),
        None => "pending".color(colors::MUTED).italic(),
    };
    details.push(("Delivered".to_string(), delivered));

    if let Some(items) = record.total_items {
        details.push(("Items".to_string(), items.to_string().normal()));
    }
    if let Some(subtotal) = record.subtotal {
        details.push(("Subtotal".to_string(), format!("{subtotal:.2}").normal()));
    }
    if let Some(duration) = record.estimated_driving_duration {
        details.push(("Driving".to_string(), minutes(duration)));
    }
    details
}

pub fn summary_details(summary: &ModelSummary) -> Vec<Detail> {
    let origin: ColoredString = match summary.origin {
        ModelOrigin::Snapshot => "snapshot".color(colors::GOOD),
        ModelOrigin::Trained => "trained".color(colors::ACCENT),
        ModelOrigin::Constant => "fixed".color(colors::MUTED),
    };

    let mut details: Vec<Detail> = vec![("Origin".to_string(), origin)];
    details.extend(
        summary
            .parameters
            .iter()
            .map(|(name, value)| (name.to_string(), format!("{value:.6}").normal())),
    );
    if let Some(observations) = summary.observations {
        details.push(("Samples".to_string(), observations.to_string().normal()));
    }
    if let Some(r_squared) = summary.r_squared {
        details.push(("R-squared".to_string(), format!("{r_squared:.4}").normal()));
    }
    details
}
