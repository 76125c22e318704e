//! Canonical schema constants for structured logging
//!
//! These constants keep field names consistent across the ingestion and
//! retention pipelines.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";

// Entity identifiers
pub const FIELD_SNAPSHOT_ID: &str = "snapshot_id";
pub const FIELD_DATE: &str = "date";
pub const FIELD_STAGE: &str = "stage";

// Collection sizes
pub const FIELD_ROW_COUNT: &str = "row_count";
pub const FIELD_BATCH_COUNT: &str = "batch_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_SKIP: &str = "skip";
