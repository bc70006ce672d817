//! Postgres container for store tests.

use anyhow::{Context, Result};
use bot_core::kernel::PostgresWordStore;
use sqlx::PgPool;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;

/// A migrated database in its own container
pub struct PostgresHarness {
    pub store: PostgresWordStore,
    _postgres: ContainerAsync<Postgres>,
}

impl PostgresHarness {
    pub async fn start() -> Result<Self> {
        super::init_tracing();

        let postgres = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            store: PostgresWordStore::new(pool),
            _postgres: postgres,
        })
    }
}
