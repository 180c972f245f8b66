//! Entity-scoped database operations.
//!
//! One sub-module per table. All public functions are re-exported here.

mod appointment;
mod patient;
mod vital_sign;

// Re-export all public items from sub-modules
pub use appointment::*;
pub use patient::*;
pub use vital_sign::*;

/// Storage format for timestamps written by this crate.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
