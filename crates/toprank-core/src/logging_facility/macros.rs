//! Canonical logging macros

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use toprank_core::log_op_start;
/// log_op_start!("ingest_snapshot");
/// log_op_start!("ingest_snapshot", date = "2023-10-17");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::toprank_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::toprank_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use toprank_core::log_op_end;
/// log_op_end!("ingest_snapshot", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::toprank_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::toprank_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation that ended without doing work (idempotent no-op)
///
/// # Example
///
/// ```
/// # use toprank_core::log_op_skip;
/// log_op_skip!("ingest_snapshot", snapshot_id = "ABC12");
/// ```
#[macro_export]
macro_rules! log_op_skip {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::toprank_core_types::schema::EVENT_SKIP,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::toprank_core_types::schema::EVENT_SKIP,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// # Example
///
/// ```
/// # use toprank_core::log_op_error;
/// # use toprank_core::errors::{RankError, RankErrorKind};
/// let err = RankError::new(RankErrorKind::SourceUnavailable);
/// log_op_error!("fetch_metadata", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let rank_err: &$crate::errors::RankError = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::toprank_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?rank_err.kind(),
            err_code = rank_err.code(),
            error = %rank_err,
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let rank_err: &$crate::errors::RankError = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::toprank_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?rank_err.kind(),
            err_code = rank_err.code(),
            error = %rank_err,
            $($field)*
        );
    }};
}
