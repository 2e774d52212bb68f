use approx::assert_relative_eq;
use etacast_common::delivery::kind::ModelKind;
use etacast_common::error::{RecordError, RegistryError, StoreError, TrainingError};
use etacast_common::store::RecordStore;
use etacast_core::registry::{ModelOrigin, ModelRegistry};
use etacast_core::store::{JsonLinesRecordStore, MemoryRecordStore};

use super::util::{delivered, history, memory_store, pending};

/*************************************************************
                 Snapshot restore and refit
**************************************************************/

#[test]
fn restart_restores_simple_model_from_snapshot() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let snapshot = dir.path().join("model").join("simple_regression.json");
    let store = JsonLinesRecordStore::new(dir.path().join("deliveries.jsonl"));
    for record in history(30) {
        store.save(record)?;
    }

    let first = ModelRegistry::initialize(&store, Some(&snapshot))?;
    assert_eq!(first.simple_origin(), ModelOrigin::Trained);
    assert!(snapshot.exists());

    // New data must not move a restored simple model.
    store.save(delivered(31, Some(2)))?;
    let second = ModelRegistry::initialize(&store, Some(&snapshot))?;
    assert_eq!(second.simple_origin(), ModelOrigin::Snapshot);

    let query = delivered(99, None);
    assert_eq!(
        first.predict(ModelKind::Simple, &query)?,
        second.predict(ModelKind::Simple, &query)?
    );
    Ok(())
}

#[test]
fn truncated_snapshot_is_replaced() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let snapshot = dir.path().join("simple_regression.json");
    std::fs::write(&snapshot, r#"{"format":"etacast/simple-regression","version":1,"inter"#)?;

    let registry = ModelRegistry::initialize(memory_store(history(20)).as_ref(), Some(&snapshot))?;

    assert_eq!(registry.simple_origin(), ModelOrigin::Trained);
    let restored = ModelRegistry::initialize(memory_store(history(20)).as_ref(), Some(&snapshot))?;
    assert_eq!(restored.simple_origin(), ModelOrigin::Snapshot);
    Ok(())
}

/*************************************************************
                     Training failures
**************************************************************/

#[test]
fn empty_store_aborts_initialization() {
    let store = MemoryRecordStore::new();
    let result = ModelRegistry::initialize(&store, None);
    assert!(matches!(
        result,
        Err(RegistryError::Training(TrainingError::InsufficientData { .. }))
    ));
}

#[test]
fn pending_orders_only_cannot_train() {
    let store = memory_store((0..10).map(|i| pending(1, 5.0 + i as f64)).collect());
    let result = ModelRegistry::initialize(store.as_ref(), None);
    assert!(matches!(
        result,
        Err(RegistryError::Training(TrainingError::InsufficientData { actual: 0, .. }))
    ));
}

#[test]
fn stored_delivery_before_creation_never_reaches_training() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("deliveries.jsonl");
    let store = JsonLinesRecordStore::new(&path);
    for record in history(5) {
        store.save(record)?;
    }

    let mut raw = std::fs::read_to_string(&path)?;
    raw.push_str(concat!(
        r#"{"id":6,"createdAt":"2015-02-14T19:00:00","#,
        r#""actualDeliveryTime":"2015-02-14T17:00:00","estimatedDrivingDuration":9.0}"#,
    ));
    raw.push('\n');
    std::fs::write(&path, raw)?;

    let result = ModelRegistry::initialize(&store, None);
    assert!(matches!(
        result,
        Err(RegistryError::Store(StoreError::Invalid {
            line: 6,
            source: RecordError::DeliveredBeforeCreated { .. },
            ..
        }))
    ));
    Ok(())
}

/*************************************************************
                  Training data selection
**************************************************************/

#[test]
fn pending_orders_are_left_out_of_training() -> anyhow::Result<()> {
    let mut records = history(25);
    records.push(pending(2, 400.0));
    records.push(pending(3, 0.0));

    let registry = ModelRegistry::initialize(memory_store(records).as_ref(), None)?;

    assert_eq!(registry.simple().observations(), 25);
    assert_eq!(registry.multiple().observations(), 25);
    Ok(())
}

#[test]
fn multiple_regression_is_reproducible() -> anyhow::Result<()> {
    let first = ModelRegistry::initialize(memory_store(history(50)).as_ref(), None)?;
    let second = ModelRegistry::initialize(memory_store(history(50)).as_ref(), None)?;

    for (a, b) in first
        .multiple()
        .coefficients()
        .iter()
        .zip(second.multiple().coefficients())
    {
        assert_relative_eq!(*a, *b, max_relative = 1e-12);
    }
    Ok(())
}

#[test]
fn simple_line_passes_through_mean_point() -> anyhow::Result<()> {
    let records = history(40);
    let registry = ModelRegistry::initialize(memory_store(records.clone()).as_ref(), None)?;

    let n = records.len() as f64;
    let mean_duration: f64 = records.iter().map(|r| r.driving_duration().unwrap()).sum::<f64>() / n;
    let mean_minutes: f64 = records.iter().map(|r| r.actual_minutes().unwrap()).sum::<f64>() / n;

    let at_mean = registry.simple().predict_duration(mean_duration)?;
    assert_relative_eq!(at_mean, mean_minutes, max_relative = 1e-9);
    Ok(())
}
