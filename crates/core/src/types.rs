/// Tenant identifiers are the platform's BIGSERIAL keys.
pub type TenantId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
