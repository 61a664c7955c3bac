pub mod constants;
pub mod migrator;
pub mod models;
pub mod operations;
pub mod sql;

use anyhow::Result;
use sqlx::{AnyConnection, Connection};
use tracing::info;

pub use migrator::run_migrations;

/// The single store connection owned for the lifetime of a run.
///
/// Dropping a `Store` releases the connection; [`Store::close`] does the same
/// but waits for the backend to acknowledge.
pub struct Store {
    connection: AnyConnection,
}

impl Store {
    /// Open one connection to the store behind `url`
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        sqlx::any::install_default_drivers();

        let connection = AnyConnection::connect(url).await?;
        info!("Connected to {} store", connection.backend_name());

        Ok(Store { connection })
    }

    /// Create the entity tables if they are missing
    pub async fn bootstrap_schema(&mut self) -> Result<()> {
        run_migrations(&mut self.connection).await
    }

    /// Get a mutable handle to the database connection
    pub fn connection(&mut self) -> &mut AnyConnection {
        &mut self.connection
    }

    pub async fn close(self) -> Result<(), sqlx::Error> {
        self.connection.close().await
    }
}

#[cfg(test)]
pub(crate) async fn memory_store() -> Store {
    let mut store = Store::connect("sqlite::memory:").await.unwrap();
    store.bootstrap_schema().await.unwrap();
    store
}

#[cfg(test)]
pub(crate) async fn count_rows(store: &mut Store, table: &str) -> i64 {
    sqlx::query_scalar::<sqlx::Any, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(store.connection())
        .await
        .unwrap()
}
