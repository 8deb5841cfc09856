use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Migrations embedded at compile time from `apps/api/migrations/`.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("failed to connect to PostgreSQL")?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Applies any pending embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .context("failed to run database migrations")?;

    info!("Database migrations applied");
    Ok(())
}
