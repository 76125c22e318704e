//! Structured logging facility for toprank
//!
//! - Single initialization point via `init(profile)`, called once at the
//!   process boundary
//! - Structured logging macros (`log_op_start!`, `log_op_end!`,
//!   `log_op_skip!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! Library code never configures the subscriber. Orchestrators are handed an
//! explicit `tracing::Span` and emit everything inside it.
//!
//! # Usage
//!
//! ```rust
//! use toprank_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
