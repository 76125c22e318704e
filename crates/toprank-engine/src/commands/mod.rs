//! Pipeline commands
//!
//! ## Logging Ownership
//!
//! Commands own lifecycle logging (`log_op_start!`, `log_op_end!`,
//! `log_op_error!`). The store and source layers only emit `debug!` details.

pub mod ingest;
pub mod retention;
