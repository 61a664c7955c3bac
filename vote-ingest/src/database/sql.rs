//! SQL statement constants for the schema bootstrap
//!
//! Types are limited to what both PostgreSQL and SQLite accept.

pub const CREATE_MIGRATIONS_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version BIGINT PRIMARY KEY NOT NULL,
    applied_at TEXT NOT NULL,
    description TEXT NOT NULL
)
"#;

pub const CREATE_POLLS_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS polls (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT,
    description TEXT,
    start_time BIGINT,
    end_time BIGINT,
    creator TEXT,
    poll_account TEXT,
    created_at BIGINT NOT NULL DEFAULT 0, -- block number, not wall clock
    block_number BIGINT NOT NULL DEFAULT 0,
    transaction_hash TEXT
)
"#;

pub const CREATE_CANDIDATES_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS candidates (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT,
    poll_id TEXT,
    created_at BIGINT NOT NULL DEFAULT 0,
    block_number BIGINT NOT NULL DEFAULT 0,
    transaction_hash TEXT
)
"#;

pub const CREATE_VOTES_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS votes (
    id TEXT PRIMARY KEY NOT NULL,
    voter TEXT,
    poll_id TEXT,
    candidate_id TEXT,
    created_at BIGINT NOT NULL DEFAULT 0,
    block_number BIGINT NOT NULL DEFAULT 0,
    transaction_hash TEXT
)
"#;

pub const CREATE_DB_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_candidates_poll_id ON candidates(poll_id)",
    "CREATE INDEX IF NOT EXISTS idx_votes_poll_id ON votes(poll_id)",
    "CREATE INDEX IF NOT EXISTS idx_votes_candidate_id ON votes(candidate_id)",
];
