//! Database constants and migration metadata

/// Current bootstrap schema version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Migration descriptions
pub const MIGRATION_DESCRIPTIONS: &[&str] = &["Polls, candidates and votes keyed by account address"];

pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_DB_NAME: &str = "voting_data";
pub const DEFAULT_DB_USER: &str = "postgres";
