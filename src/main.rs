// src/main.rs
use dotenvy::dotenv;
use pennywise_backend::{backend, config::Settings, database};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env()?;

    let pool = database::db::connection::get_db_pool(&settings.database_url).await?;
    database::db::migrate::run_migrations(&pool).await?;

    // Populate the table from the dataset CSV exactly once; a missing or bad
    // CSV should not keep the API from serving what is already stored.
    if let Err(e) = database::db::seed::load_csv_if_empty(&pool, &settings.csv_path).await {
        warn!("dataset CSV import skipped: {e:#}");
    }

    backend::run_server(pool, settings).await
}
