// src/output/mod.rs
//! Output handling with clear separation of planning and execution.
//!
//! Callers build an [`OutputPlan`] of pure data and hand it to [`deliver`],
//! the only place file I/O happens.

mod paths;
mod types;
mod writer;

pub use paths::{entry_filename, sanitize_filename};
pub use types::{DeliveryTarget, OutputPlan, OutputReport};
pub use writer::deliver;
