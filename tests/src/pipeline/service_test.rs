use std::sync::Arc;

use chrono::Duration;
use etacast_common::delivery::kind::ModelKind;
use etacast_common::error::{PredictionError, ServiceError};
use etacast_common::store::RecordStore;
use etacast_core::analytics::AnalyticsAggregator;
use etacast_core::registry::ModelRegistry;
use etacast_core::service::{self, PredictionRequest, PredictionService};
use etacast_core::store::JsonLinesRecordStore;

use super::util::{history, opened, pending};

fn seeded_store(dir: &tempfile::TempDir) -> Arc<JsonLinesRecordStore> {
    let store = Arc::new(JsonLinesRecordStore::new(dir.path().join("deliveries.jsonl")));
    for record in history(24) {
        store.save(record).unwrap();
    }
    store
}

fn request() -> PredictionRequest {
    PredictionRequest {
        market_id: Some(2),
        category: Some("pizza".to_string()),
        total_items: Some(3),
        subtotal: Some(2150.0),
        driving_duration: Some(11.0),
    }
}

/*************************************************************
                  Estimate and record flow
**************************************************************/

#[test]
fn estimates_are_persisted_with_delivery_time() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = seeded_store(&dir);
    let registry = Arc::new(ModelRegistry::initialize(store.as_ref(), None)?);
    let service = PredictionService::new(registry, store.clone());

    let estimate = service.estimate_at(ModelKind::Multiple, request(), opened())?;

    let reopened = JsonLinesRecordStore::new(store.path());
    let saved = reopened.find_by_id(estimate.record.id.unwrap_or_default())?;
    assert_eq!(saved.id, Some(25));
    assert_eq!(saved.store_primary_category.as_deref(), Some("pizza"));
    assert_eq!(
        saved.actual_delivery_time,
        Some(opened() + Duration::minutes(estimate.minutes.trunc() as i64))
    );
    assert_eq!(reopened.find_all()?.len(), 25);
    Ok(())
}

#[test]
fn every_model_scores_the_same_request() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = seeded_store(&dir);
    let registry = Arc::new(ModelRegistry::initialize(store.as_ref(), None)?);
    let service = PredictionService::new(registry, store.clone());

    for kind in ModelKind::ALL {
        let minutes = service.preview(kind, request())?;
        assert!(minutes.is_finite() && minutes > 0.0, "{kind} gave {minutes}");
    }
    assert_eq!(store.find_all()?.len(), 24);
    Ok(())
}

#[test]
fn incomplete_request_is_a_prediction_error() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = seeded_store(&dir);
    let registry = Arc::new(ModelRegistry::initialize(store.as_ref(), None)?);
    let service = PredictionService::new(registry, store.clone());

    let missing_items = PredictionRequest {
        total_items: None,
        ..request()
    };
    let result = service.estimate_at(ModelKind::Multiple, missing_items, opened());

    assert!(matches!(
        result,
        Err(ServiceError::Prediction(PredictionError::MissingField("totalItems")))
    ));
    assert_eq!(store.find_all()?.len(), 24);
    Ok(())
}

/*************************************************************
                    Completing deliveries
**************************************************************/

#[test]
fn completed_delivery_joins_the_analytics() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = seeded_store(&dir);
    let open = store.save(pending(8, 9.0))?;
    let id = open.id.unwrap_or_default();

    let registry = Arc::new(ModelRegistry::initialize(store.as_ref(), None)?);
    let aggregator = AnalyticsAggregator::new(registry, store.clone());

    let before = aggregator.traffic_impact_report()?;
    assert!(before.model_based_traffic_impact.by_market[&8].error().is_some());

    service::complete_delivery(store.as_ref(), id, opened() + Duration::minutes(29))?;

    let after = aggregator.traffic_impact_report()?;
    let market = after.model_based_traffic_impact.by_market[&8].ready().unwrap();
    assert_eq!(market.sample_size, 1);
    assert_eq!(market.average_actual_minutes, 29.0);
    Ok(())
}

#[test]
fn delivery_cannot_be_completed_twice() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = seeded_store(&dir);
    let id = store.save(pending(1, 6.0))?.id.unwrap_or_default();

    service::complete_delivery(store.as_ref(), id, opened() + Duration::minutes(20))?;
    let again = service::complete_delivery(store.as_ref(), id, opened() + Duration::minutes(25));

    assert!(matches!(again, Err(ServiceError::Record(_))));
    let stored = store.find_by_id(id)?;
    assert_eq!(stored.actual_minutes()?, 20.0);
    Ok(())
}
