/// Job identifiers are opaque strings assigned by the worker; the client
/// never mints its own.
pub type JobId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
