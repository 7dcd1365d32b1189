//! Invoice dashboard server
//!
//! ```text
//! invoice-dashboard [config.yaml]
//! ```
//!
//! The config path defaults to `$DASHBOARD_CONFIG`, then `dashboard.yaml`.
//! A missing file means the defaults: seeded in-memory storage on
//! 127.0.0.1:3000.

use anyhow::Result;
use dashboard::config::{DashboardConfig, StorageBackend};
use dashboard::server::ServerBuilder;
use dashboard::storage::InMemoryInvoiceStore;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("DASHBOARD_CONFIG").ok())
        .unwrap_or_else(|| "dashboard.yaml".to_string());
    let config = DashboardConfig::load(&path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        config = %path,
        backend = ?config.storage.backend,
        "Starting invoice dashboard"
    );

    let builder = match config.storage.backend {
        StorageBackend::InMemory => {
            let store = if config.storage.seed {
                InMemoryInvoiceStore::seeded()
            } else {
                InMemoryInvoiceStore::new()
            };
            ServerBuilder::new().with_store(store)
        }
        StorageBackend::Postgres => postgres_builder(&config).await?,
    };

    builder.serve(&config.server.bind).await
}

#[cfg(feature = "postgres")]
async fn postgres_builder(config: &DashboardConfig) -> Result<ServerBuilder> {
    use dashboard::storage::postgres;

    let url = config
        .storage
        .database_url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("storage.database_url is required for postgres"))?;

    let pool = postgres::connect(url, config.storage.max_connections).await?;
    postgres::ensure_schema(&pool).await?;
    if config.storage.seed {
        postgres::seed(&pool).await?;
    }

    Ok(ServerBuilder::new().with_store(postgres::PostgresInvoiceStore::new(pool)))
}

#[cfg(not(feature = "postgres"))]
async fn postgres_builder(_config: &DashboardConfig) -> Result<ServerBuilder> {
    anyhow::bail!("the postgres backend requires building with `--features postgres`")
}
