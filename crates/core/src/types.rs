/// Surrogate keys for join tables are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Notes and users are keyed by UUID.
pub type EntityId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
