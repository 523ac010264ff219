/// Primary key of a submitted entity, as an opaque string.
pub type EntityKey = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
