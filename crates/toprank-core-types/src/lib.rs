//! Core types shared across toprank facilities
//!
//! - **Correlation**: `RunId` identifying one ingestion or retention run
//! - **Schema constants**: canonical field keys and event names for logging

pub mod correlation;
pub mod schema;

pub use correlation::RunId;
