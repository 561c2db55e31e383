//! Per-partition MAE computations against the in-memory store.

mod common;

use common::{at, day, day_end, day_start, forecast, observation, seed_site, seeded_store};
use pvmetrics_core::forecast::HorizonBucket;
use pvmetrics_core::interval::DatetimeInterval;
use pvmetrics_core::mae::MaeResult;
use pvmetrics_core::metric::{
    MetricDefinition, MetricDefinitions, METRIC_LATEST_MAE, METRIC_LATEST_MAE_ALL_SITES,
    METRIC_REVISION_MAE,
};
use pvmetrics_core::observation::Regime;
use pvmetrics_engine::persistence::record_metric_value;
use pvmetrics_engine::views;
use pvmetrics_engine::{InMemoryStore, MetricCatalog, MetricsEngine, StoreError};

fn catalog() -> MetricCatalog {
    MetricCatalog::new(MetricDefinitions::standard())
}

// ---------------------------------------------------------------------------
// Latest forecast MAE
// ---------------------------------------------------------------------------

#[tokio::test]
async fn latest_mae_for_site_compares_latest_forecast_with_settled_truth() {
    let store = seeded_store(5);
    let catalog = catalog();
    let engine = MetricsEngine::new(&store, &catalog);

    let result = engine.latest_mae_for_site(&day(), 3).await.unwrap();
    assert_eq!(result.value, Some(1.5));
    assert_eq!(result.sample_count, 2);

    let recorded = store.metric_values_named(METRIC_LATEST_MAE);
    assert_eq!(recorded.len(), 1);
    let location = store.location(3).expect("site 3 resolved");
    assert_eq!(recorded[0].value.location_id, Some(location.id));
    assert_eq!(recorded[0].value.horizon_minutes, None);
    assert_eq!(recorded[0].value.value, Some(1.5));
    assert_eq!(recorded[0].value.sample_count, 2);
}

#[tokio::test]
async fn latest_mae_ignores_in_day_truth() {
    let store = InMemoryStore::new();
    store.add_observation(observation(1, at(0, 30), 9000.0, Regime::InDay));
    store.record_forecast(forecast(1, at(0, 30), 10, 1.0));

    let catalog = catalog();
    let engine = MetricsEngine::new(&store, &catalog);
    let result = engine.latest_mae_for_site(&day(), 1).await.unwrap();
    assert_eq!(result, MaeResult::empty());
}

#[tokio::test]
async fn latest_view_uses_newest_forecast() {
    let store = InMemoryStore::new();
    store.add_observation(observation(2, at(0, 30), 2000.0, Regime::DayAfter));
    store.record_forecast(forecast(2, at(0, 30), 60, 5.0));
    store.record_forecast(forecast(2, at(0, 30), 10, 2.5));
    store.record_forecast(forecast(2, at(0, 30), 90, 7.0));

    let catalog = catalog();
    let engine = MetricsEngine::new(&store, &catalog);
    let result = engine.latest_mae_for_site(&day(), 2).await.unwrap();
    assert_eq!(result.value, Some(0.5));
    assert_eq!(result.sample_count, 1);
}

#[tokio::test]
async fn latest_mae_all_sites_excludes_national() {
    let store = seeded_store(5);
    // Large national error that would move the mean if it were included.
    store.add_observation(observation(0, at(2, 0), 100_000.0, Regime::DayAfter));
    store.record_forecast(forecast(0, at(2, 0), 5, 0.0));

    let catalog = catalog();
    let engine = MetricsEngine::new(&store, &catalog);
    let result = engine.latest_mae_all_sites(&day()).await.unwrap();
    assert_eq!(result.value, Some(1.5));
    assert_eq!(result.sample_count, 10);

    let recorded = store.metric_values_named(METRIC_LATEST_MAE_ALL_SITES);
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].value.location_id, None);
    assert_eq!(recorded[0].value.horizon_minutes, None);
}

#[tokio::test]
async fn non_finite_truth_is_skipped_not_counted() {
    let store = InMemoryStore::new();
    seed_site(&store, 1);
    store.add_observation(observation(1, at(3, 0), f64::NAN, Regime::DayAfter));
    store.record_forecast(forecast(1, at(3, 0), 5, 2.0));
    store.add_observation(observation(1, at(3, 30), f64::INFINITY, Regime::DayAfter));
    store.record_forecast(forecast(1, at(3, 30), 5, 2.0));

    let catalog = catalog();
    let engine = MetricsEngine::new(&store, &catalog);
    let result = engine.latest_mae_for_site(&day(), 1).await.unwrap();
    assert_eq!(result.value, Some(1.5));
    assert_eq!(result.sample_count, 2);
}

#[tokio::test]
async fn interval_bounds_are_inclusive() {
    let store = InMemoryStore::new();
    for ts in [day_start(), day_end()] {
        store.add_observation(observation(4, ts, 1000.0, Regime::DayAfter));
        store.record_forecast(forecast(4, ts, 5, 3.0));
    }
    // Just outside the window on either side.
    for ts in [
        day_start() - chrono::Duration::minutes(30),
        day_end() + chrono::Duration::minutes(30),
    ] {
        store.add_observation(observation(4, ts, 1000.0, Regime::DayAfter));
        store.record_forecast(forecast(4, ts, 5, 100.0));
    }

    let catalog = catalog();
    let engine = MetricsEngine::new(&store, &catalog);
    let result = engine.latest_mae_for_site(&day(), 4).await.unwrap();
    assert_eq!(result.value, Some(2.0));
    assert_eq!(result.sample_count, 2);
}

// ---------------------------------------------------------------------------
// Horizon MAE
// ---------------------------------------------------------------------------

#[tokio::test]
async fn horizon_mae_picks_forecasts_made_that_far_ahead() {
    let store = seeded_store(0);
    let catalog = catalog();
    let engine = MetricsEngine::new(&store, &catalog);

    let h0 = engine.horizon_mae(&day(), 0, 0, 30).await.unwrap();
    assert_eq!(h0.value, Some(1.75));
    assert_eq!(h0.sample_count, 2);

    let h30 = engine.horizon_mae(&day(), 0, 30, 30).await.unwrap();
    assert_eq!(h30.value, Some(2.25));
    assert_eq!(h30.sample_count, 2);

    let h60 = engine.horizon_mae(&day(), 0, 60, 30).await.unwrap();
    assert_eq!(h60, MaeResult::empty());

    let recorded = store.metric_values_named(METRIC_LATEST_MAE);
    let horizons: Vec<_> = recorded.iter().map(|v| v.value.horizon_minutes).collect();
    assert_eq!(horizons, vec![Some(0), Some(30), Some(60)]);
    assert!(recorded.iter().all(|v| v.value.location_id.is_none()));
}

#[tokio::test]
async fn horizon_bucket_prefers_closest_horizon() {
    let store = InMemoryStore::new();
    store.add_observation(observation(0, at(1, 0), 1000.0, Regime::DayAfter));
    store.add_forecast(forecast(0, at(1, 0), 50, 9.0));
    store.add_forecast(forecast(0, at(1, 0), 35, 2.0));
    store.add_forecast(forecast(0, at(1, 0), 35, 7.0));

    let bucket = HorizonBucket::new(30, 30).unwrap();
    let readings = views::forecast_horizon_view(&store, &day(), 0, bucket)
        .await
        .unwrap();
    assert_eq!(readings.len(), 1);
    assert_eq!(readings[0].value_mw, 2.0);
}

#[tokio::test]
async fn horizon_mae_rejects_bad_step() {
    let store = seeded_store(0);
    let catalog = catalog();
    let engine = MetricsEngine::new(&store, &catalog);

    let err = engine.horizon_mae(&day(), 0, 0, 0).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
    assert!(store.metric_values().is_empty());
}

// ---------------------------------------------------------------------------
// Revision MAE
// ---------------------------------------------------------------------------

#[tokio::test]
async fn identical_revisions_give_zero() {
    let store = InMemoryStore::new();
    for (ts, kw) in [(at(0, 30), 1500.0), (at(1, 0), 2500.0), (at(1, 30), 0.0)] {
        store.add_observation(observation(2, ts, kw, Regime::InDay));
        store.add_observation(observation(2, ts, kw, Regime::DayAfter));
    }

    let catalog = catalog();
    let engine = MetricsEngine::new(&store, &catalog);
    let result = engine.revision_mae(&day(), 2).await.unwrap();
    assert_eq!(result.value, Some(0.0));
    assert_eq!(result.sample_count, 3);

    let recorded = store.metric_values_named(METRIC_REVISION_MAE);
    assert_eq!(recorded.len(), 1);
    assert!(recorded[0].value.location_id.is_some());
    assert_eq!(recorded[0].value.horizon_minutes, None);
}

#[tokio::test]
async fn revision_mae_is_in_mw() {
    let store = InMemoryStore::new();
    store.add_observation(observation(1, at(0, 30), 1000.0, Regime::InDay));
    store.add_observation(observation(1, at(0, 30), 3000.0, Regime::DayAfter));
    // Unmatched in-day reading.
    store.add_observation(observation(1, at(1, 0), 1000.0, Regime::InDay));

    let catalog = catalog();
    let engine = MetricsEngine::new(&store, &catalog);
    let result = engine.revision_mae(&day(), 1).await.unwrap();
    assert_eq!(result.value, Some(2.0));
    assert_eq!(result.sample_count, 1);
}

// ---------------------------------------------------------------------------
// Catalog and persistence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn catalog_get_or_create_is_idempotent() {
    let store = InMemoryStore::new();
    let catalog = catalog();

    let first = catalog.latest(&store).await.unwrap();
    let second = catalog.latest(&store).await.unwrap();
    assert_eq!(first, second);

    let custom = MetricDefinition::new(METRIC_LATEST_MAE, "another description");
    let third = catalog.get_or_create(&store, &custom).await.unwrap();
    assert_eq!(first.id, third.id);
    assert_eq!(store.metric_count(), 1);
}

#[tokio::test]
async fn ensure_all_creates_every_definition_once() {
    let store = InMemoryStore::new();
    let catalog = catalog();

    let refs = catalog.ensure_all(&store).await.unwrap();
    let names: Vec<_> = refs.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(
        names,
        vec![METRIC_LATEST_MAE, METRIC_LATEST_MAE_ALL_SITES, METRIC_REVISION_MAE]
    );

    let again = catalog.ensure_all(&store).await.unwrap();
    assert_eq!(refs, again);
    assert_eq!(store.metric_count(), 3);
}

#[tokio::test]
async fn empty_result_is_still_recorded() {
    let store = InMemoryStore::new();
    let catalog = catalog();
    let metric = catalog.revision(&store).await.unwrap();

    let id = record_metric_value(&store, MaeResult::empty(), &metric, &day(), Some(7), None)
        .await
        .unwrap();

    let recorded = store.metric_values();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].id, id);
    assert_eq!(recorded[0].value.value, None);
    assert_eq!(recorded[0].value.sample_count, 0);
    assert_eq!(
        recorded[0].value.location_id,
        store.location(7).map(|l| l.id)
    );
}

#[tokio::test]
async fn records_are_appended_and_share_the_interval() {
    let store = InMemoryStore::new();
    let catalog = catalog();
    let metric = catalog.latest(&store).await.unwrap();
    let result = MaeResult {
        value: Some(0.5),
        sample_count: 4,
    };

    let first = record_metric_value(&store, result, &metric, &day(), None, None)
        .await
        .unwrap();
    let second = record_metric_value(&store, result, &metric, &day(), None, None)
        .await
        .unwrap();
    assert_ne!(first, second);

    let recorded = store.metric_values();
    assert_eq!(recorded.len(), 2);
    assert_eq!(recorded[0].value.interval_id, recorded[1].value.interval_id);
    assert_eq!(store.interval_count(), 1);

    let other = DatetimeInterval::new(day_start(), at(12, 0)).unwrap();
    record_metric_value(&store, result, &metric, &other, None, None)
        .await
        .unwrap();
    assert_eq!(store.interval_count(), 2);
    assert!(store.location(0).is_none());
}
