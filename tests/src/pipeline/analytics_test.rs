use std::sync::Arc;

use approx::assert_relative_eq;
use chrono::Duration;
use etacast_common::delivery::kind::ModelKind;
use etacast_common::delivery::record::DeliveryRecord;
use etacast_core::analytics::{AnalyticsAggregator, Ratio};
use etacast_core::registry::ModelRegistry;
use etacast_core::store::MemoryRecordStore;

use super::util::{delivered, history, memory_store, opened, pending};

fn aggregator_over(records: Vec<DeliveryRecord>) -> AnalyticsAggregator {
    let store = memory_store(records);
    let registry = ModelRegistry::initialize(store.as_ref(), None).unwrap();
    AnalyticsAggregator::new(Arc::new(registry), store)
}

fn without_duration(market: i32, minutes: i64) -> DeliveryRecord {
    DeliveryRecord::builder(opened())
        .market_id(market)
        .total_items(2)
        .subtotal(1200.0)
        .delivered_at(opened() + Duration::minutes(minutes))
        .build()
        .unwrap()
}

fn zero_duration(market: i32, minutes: i64) -> DeliveryRecord {
    DeliveryRecord::builder(opened())
        .market_id(market)
        .total_items(1)
        .subtotal(900.0)
        .driving_duration(0.0)
        .delivered_at(opened() + Duration::minutes(minutes))
        .build()
        .unwrap()
}

/*************************************************************
                    Average time report
**************************************************************/

#[test]
fn average_report_is_capped_at_one_thousand() {
    let aggregator = aggregator_over(history(2000));
    let report = aggregator.average_delivery_time_report().unwrap();

    let summary = report.model_based_predictions.ready().unwrap();
    assert_eq!(summary.sample_size, 1000);
    assert_eq!(summary.skipped, 0);
    assert_eq!(report.total_records, 2000);
}

#[test]
fn average_report_ratios_follow_averages() {
    let aggregator = aggregator_over(history(60));
    let report = aggregator.average_delivery_time_report().unwrap();
    let summary = report.model_based_predictions.ready().unwrap();

    for (_, accuracy) in summary.models.iter() {
        let expected =
            summary.actual_average_time_minutes / accuracy.average_predicted_time_minutes;
        assert_relative_eq!(accuracy.ratio_to_actual.value().unwrap(), expected);
        assert_relative_eq!(
            accuracy.difference_from_actual_minutes,
            summary.actual_average_time_minutes - accuracy.average_predicted_time_minutes
        );
    }

    let best = summary.models.get(summary.most_accurate_model);
    for (_, accuracy) in summary.models.iter() {
        assert!(
            best.difference_from_actual_minutes.abs()
                <= accuracy.difference_from_actual_minutes.abs()
        );
    }
}

#[test]
fn fitted_models_beat_the_fixed_polynomial() {
    let aggregator = aggregator_over(history(90));
    let report = aggregator.average_delivery_time_report().unwrap();
    let summary = report.model_based_predictions.ready().unwrap();
    assert_ne!(summary.most_accurate_model, ModelKind::Polynomial);
}

#[test]
fn average_report_serializes_with_report_keys() {
    let aggregator = aggregator_over(history(30));
    let report = aggregator.average_delivery_time_report().unwrap();
    let json = serde_json::to_value(&report).unwrap();

    let predictions = &json["modelBasedPredictions"];
    assert_eq!(predictions["sampleSize"], 30);
    assert!(predictions["actualAverageTimeMinutes"].is_f64());
    assert!(predictions["multipleRegression"]["differenceFromActualMinutes"].is_f64());
    assert!(predictions["mostAccurateModel"].is_string());
    assert_eq!(json["totalRecords"], 30);
}

/*************************************************************
                   Traffic impact report
**************************************************************/

#[test]
fn market_sample_is_capped_at_five_hundred() {
    let mut records = history(30);
    records.extend((0..600).map(|i| delivered(i, Some(7))));
    let report = aggregator_over(records).traffic_impact_report().unwrap();
    let impact = &report.model_based_traffic_impact;

    assert_eq!(impact.by_market[&7].ready().unwrap().sample_size, 500);
    assert_eq!(impact.overall.ready().unwrap().sample_size, 630);
    assert_eq!(impact.by_market[&1].ready().unwrap().sample_size, 10);
}

#[test]
fn market_groups_cover_every_market_record_once() {
    let mut records = history(45);
    records.push(delivered(45, None));
    records.push(delivered(46, None));
    let report = aggregator_over(records).traffic_impact_report().unwrap();
    let impact = &report.model_based_traffic_impact;

    let per_market: usize = impact
        .by_market
        .values()
        .map(|scope| scope.ready().unwrap().sample_size)
        .sum();
    assert_eq!(per_market, 45);
    assert_eq!(impact.overall.ready().unwrap().sample_size, 47);
    assert_eq!(impact.by_market.keys().copied().collect::<Vec<_>>(), [1, 2, 3]);
}

#[test]
fn unusable_market_is_flagged_without_hiding_others() {
    let mut records = history(30);
    records.push(without_duration(5, 40));
    records.push(without_duration(5, 25));
    records.push(pending(6, 12.0));
    let report = aggregator_over(records).traffic_impact_report().unwrap();
    let impact = &report.model_based_traffic_impact;

    assert_eq!(
        impact.by_market[&5].error(),
        Some("no usable delivery records for market 5")
    );
    assert!(impact.by_market[&6].error().is_some());
    assert!(impact.by_market[&2].ready().is_some());

    let overall = impact.overall.ready().unwrap();
    assert_eq!(overall.sample_size, 30);
    assert_eq!(overall.skipped, 2);
}

#[test]
fn zero_polynomial_average_is_undefined_in_json() {
    let mut records = history(30);
    records.push(zero_duration(9, 14));
    records.push(zero_duration(9, 18));
    let report = aggregator_over(records).traffic_impact_report().unwrap();

    let market = report.model_based_traffic_impact.by_market[&9].ready().unwrap();
    assert_eq!(market.impact_ratio.polynomial, Ratio::Undefined);
    assert_relative_eq!(market.average_actual_minutes, 16.0);

    let json = serde_json::to_value(&report).unwrap();
    let ratio = &json["modelBasedTrafficImpact"]["byMarket"]["9"]["impactRatio"];
    assert_eq!(ratio["polynomialRegression"], "undefined");
    assert!(ratio["simpleRegression"].is_f64());
}

#[test]
fn traffic_total_counts_records_with_positive_duration() {
    let mut records = history(20);
    records.push(zero_duration(9, 14));
    records.push(without_duration(9, 14));
    records.push(pending(9, 8.0));
    let report = aggregator_over(records).traffic_impact_report().unwrap();

    assert_eq!(report.total_records, 21);
    assert!(report.note.starts_with("Traffic impact is the ratio"));
}

#[test]
fn empty_scope_after_filtering_is_reported() {
    let store = Arc::new(MemoryRecordStore::with_records(history(10)));
    let registry = ModelRegistry::initialize(store.as_ref(), None).unwrap();
    let aggregator = AnalyticsAggregator::new(
        Arc::new(registry),
        Arc::new(MemoryRecordStore::with_records([pending(1, 10.0)])),
    );

    let report = aggregator.average_delivery_time_report().unwrap();
    assert_eq!(report.total_records, 1);
    assert!(report.model_based_predictions.error().is_some());
}
