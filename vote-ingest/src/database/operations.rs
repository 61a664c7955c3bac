//! Generic insert-or-ignore keyed on a primary key column

use serde::de::DeserializeOwned;
use sqlx::{Any, AnyConnection, Connection};
use tracing::debug;

use crate::stats::{EntityTally, IngestStats};

/// Destination table: name, conflict key and insert column order
#[derive(Debug, Clone, Copy)]
pub struct Table {
    pub name: &'static str,
    pub key: &'static str,
    pub columns: &'static [&'static str],
}

impl Table {
    /// `INSERT ... ON CONFLICT (key) DO NOTHING` with `$n` placeholders,
    /// which PostgreSQL and SQLite both accept.
    pub fn insert_ignore_sql(&self) -> String {
        let placeholders = (1..=self.columns.len())
            .map(|i| format!("${i}"))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT ({}) DO NOTHING",
            self.name,
            self.columns.join(", "),
            placeholders,
            self.key
        )
    }
}

/// A column value ready to bind. `None` binds as NULL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Text(Option<String>),
    Integer(Option<i64>),
}

/// A write-once row mapped from one instruction element
pub trait Entity: Sized {
    /// Human-readable entity name used in diagnostics
    const NAME: &'static str;
    const TABLE: Table;

    /// The instruction shape this row is mapped from
    type Source: DeserializeOwned;

    fn from_source(source: Self::Source) -> Self;

    fn key(&self) -> Option<&str>;

    /// Short description for the success log line
    fn describe(&self) -> String;

    /// Values in `TABLE.columns` order
    fn values(&self) -> Vec<SqlValue>;

    /// Run counters for this entity
    fn tally(stats: &mut IngestStats) -> &mut EntityTally;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Inserted,
    /// A row with the same key already existed; nothing was written
    AlreadyPresent,
}

/// Insert `record` in its own transaction, ignoring a primary key conflict
pub async fn upsert<E: Entity>(
    conn: &mut AnyConnection,
    record: &E,
) -> Result<WriteOutcome, sqlx::Error> {
    debug!(
        "Inserting {} {}",
        E::NAME,
        record.key().unwrap_or("<missing key>")
    );

    let sql = E::TABLE.insert_ignore_sql();
    let mut query = sqlx::query::<Any>(&sql);
    for value in record.values() {
        query = match value {
            SqlValue::Text(v) => query.bind(v),
            SqlValue::Integer(v) => query.bind(v),
        };
    }

    let mut tx = conn.begin().await?;
    let result = query.execute(&mut *tx).await?;
    tx.commit().await?;

    if result.rows_affected() == 0 {
        Ok(WriteOutcome::AlreadyPresent)
    } else {
        Ok(WriteOutcome::Inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{CandidateRecord, PollRecord};
    use crate::database::{count_rows, memory_store};
    use crate::types::{AddCandidateInstruction, InitializePollInstruction};

    fn poll(id: Option<&str>, name: &str) -> PollRecord {
        PollRecord::from_source(InitializePollInstruction {
            acct_poll_account: id.map(str::to_string),
            name: Some(name.to_string()),
            block_number: Some(7),
            ..Default::default()
        })
    }

    #[test]
    fn test_insert_ignore_sql() {
        let table = Table {
            name: "things",
            key: "id",
            columns: &["id", "label", "size"],
        };
        assert_eq!(
            table.insert_ignore_sql(),
            "INSERT INTO things (id, label, size) VALUES ($1, $2, $3) ON CONFLICT (id) DO NOTHING"
        );
    }

    #[tokio::test]
    async fn test_upsert_ignores_duplicate_key() {
        let mut store = memory_store().await;

        let first = upsert(store.connection(), &poll(Some("P1"), "first")).await.unwrap();
        let second = upsert(store.connection(), &poll(Some("P1"), "renamed")).await.unwrap();

        assert_eq!(first, WriteOutcome::Inserted);
        assert_eq!(second, WriteOutcome::AlreadyPresent);
        assert_eq!(count_rows(&mut store, "polls").await, 1);

        // The first row is kept, not merged
        let name: Option<String> =
            sqlx::query_scalar::<Any, Option<String>>("SELECT name FROM polls WHERE id = $1")
                .bind("P1".to_string())
                .fetch_one(store.connection())
                .await
                .unwrap();
        assert_eq!(name.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_upsert_missing_key_fails_and_leaves_connection_usable() {
        let mut store = memory_store().await;

        assert!(upsert(store.connection(), &poll(None, "nameless")).await.is_err());

        let candidate = CandidateRecord::from_source(AddCandidateInstruction {
            acct_candidate_account: Some("C1".to_string()),
            ..Default::default()
        });
        let outcome = upsert(store.connection(), &candidate).await.unwrap();
        assert_eq!(outcome, WriteOutcome::Inserted);
        assert_eq!(count_rows(&mut store, "polls").await, 0);
        assert_eq!(count_rows(&mut store, "candidates").await, 1);
    }
}
