//! Core domain types for the wind-turbine maintenance analytics toolkit.
//!
//! This crate defines the fault-type domain, the prepared record types the
//! optimizer consumes, and the unified error type shared across the
//! workspace. Heavier concerns (frame ingestion, feature derivation, the
//! scheduling model itself) live in the downstream crates.

mod error;
mod types;

pub use error::{WtmError, WtmResult};
pub use types::{FaultKind, FaultRecord, RevenueRecord};
