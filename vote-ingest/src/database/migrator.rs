//! Optional schema bootstrap (SQLx)
//!
//! Production schemas are provisioned externally. This only creates what is
//! missing and never alters existing tables.

use anyhow::Result;
use sqlx::{Any, AnyConnection, Connection};
use tracing::info;

use super::constants::{CURRENT_SCHEMA_VERSION, MIGRATION_DESCRIPTIONS};
use super::sql::{
    CREATE_CANDIDATES_TABLE_SQL, CREATE_DB_INDEXES, CREATE_MIGRATIONS_TABLE_SQL,
    CREATE_POLLS_TABLE_SQL, CREATE_VOTES_TABLE_SQL,
};

/// Run all pending database migrations
pub async fn run_migrations(conn: &mut AnyConnection) -> Result<()> {
    info!("Running database migrations");

    create_migrations_table(conn).await?;

    if !is_applied(conn, 1).await? {
        apply_migration_v1(conn).await?;
    }

    info!(
        "All migrations completed (schema version {})",
        CURRENT_SCHEMA_VERSION
    );
    Ok(())
}

async fn create_migrations_table(conn: &mut AnyConnection) -> Result<()> {
    sqlx::query::<Any>(CREATE_MIGRATIONS_TABLE_SQL)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn is_applied(conn: &mut AnyConnection, version: i64) -> Result<bool> {
    let count: i64 =
        sqlx::query_scalar::<Any, i64>("SELECT COUNT(*) FROM schema_migrations WHERE version = $1")
            .bind(version)
            .fetch_one(&mut *conn)
            .await?;
    Ok(count > 0)
}

/// Apply migration version 1: entity tables and lookup indexes.
async fn apply_migration_v1(conn: &mut AnyConnection) -> Result<()> {
    info!("Applying migration v1: {}", MIGRATION_DESCRIPTIONS[0]);

    let mut tx = conn.begin().await?;

    for table_sql in [
        CREATE_POLLS_TABLE_SQL,
        CREATE_CANDIDATES_TABLE_SQL,
        CREATE_VOTES_TABLE_SQL,
    ] {
        sqlx::query::<Any>(table_sql).execute(&mut *tx).await?;
    }

    for index_sql in CREATE_DB_INDEXES {
        sqlx::query::<Any>(index_sql).execute(&mut *tx).await?;
    }

    sqlx::query::<Any>(
        "INSERT INTO schema_migrations (version, applied_at, description) VALUES ($1, $2, $3)",
    )
    .bind(1_i64)
    .bind(chrono::Utc::now().to_rfc3339())
    .bind(MIGRATION_DESCRIPTIONS[0].to_string())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    info!("Migration v1 completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Store;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let mut store = Store::connect("sqlite::memory:").await.unwrap();
        run_migrations(store.connection()).await.unwrap();
        run_migrations(store.connection()).await.unwrap();

        let applied: i64 = sqlx::query_scalar::<Any, i64>("SELECT COUNT(*) FROM schema_migrations")
            .fetch_one(store.connection())
            .await
            .unwrap();
        assert_eq!(applied, 1);

        for table in ["polls", "candidates", "votes"] {
            let rows: i64 = sqlx::query_scalar::<Any, i64>(&format!("SELECT COUNT(*) FROM {table}"))
                .fetch_one(store.connection())
                .await
                .unwrap();
            assert_eq!(rows, 0, "table {table} should exist and be empty");
        }
    }
}
