mod config;

use anyhow::{bail, Context};
use pvmetrics_core::metric::MetricDefinitions;
use pvmetrics_engine::{MetricCatalog, PgMetricsStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::WorkerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pvmetrics_worker=debug,pvmetrics_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WorkerConfig::from_env()?;
    let run_config = config.run_config().context("invalid metric run configuration")?;

    let pool = pvmetrics_db::create_pool(&config.database_url, config.max_connections)
        .await
        .context("failed to connect to database")?;
    pvmetrics_db::health_check(&pool)
        .await
        .context("database health check failed")?;
    tracing::info!("Database connection established");

    pvmetrics_db::run_migrations(&pool)
        .await
        .context("failed to run migrations")?;
    tracing::info!("Migrations applied");

    let catalog = MetricCatalog::new(MetricDefinitions::standard());
    let store = PgMetricsStore::begin(&pool)
        .await
        .context("failed to open metric run transaction")?;

    let outcome = pvmetrics_engine::run(&store, &catalog, &run_config).await;
    let report = match outcome {
        Ok(report) => report,
        Err(e) => {
            store.rollback().await.ok();
            return Err(e).context("metric run could not start");
        }
    };

    // Recorded partitions are kept even when others failed.
    store
        .commit()
        .await
        .context("failed to commit metric values")?;

    tracing::info!(
        start = %run_config.interval.start(),
        end = %run_config.interval.end(),
        recorded = report.recorded.len(),
        failed = report.failures.len(),
        "Metric values committed"
    );

    pool.close().await;

    if !report.is_success() {
        for failure in &report.failures {
            tracing::warn!(
                partition = ?failure.partition,
                error = %failure.error,
                "Partition not recorded"
            );
        }
        bail!("{} metric partitions failed", report.failures.len());
    }

    Ok(())
}
