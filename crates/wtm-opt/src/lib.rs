//! Maintenance scheduling optimizer for wind-turbine fault analysis.
//!
//! Given a prepared fault table and revenue table, this crate builds a mixed
//! binary decision model over fault types and (fault type, day) pairs,
//! solves it, and reports the chosen maintenance mix with its cost
//! breakdown.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  MAINTENANCE SCHEDULING                                          │
//! │  ───────────────────────                                         │
//! │                                                                  │
//! │  Given:                                                          │
//! │    • Fault observations (fault type, day, month)                 │
//! │    • Realized revenue per day                                    │
//! │    • Fixed costs for internal / external / preventative repair   │
//! │    • The set of high-demand months                               │
//! │                                                                  │
//! │  Decide (binary, per non-sentinel fault type f and day d):       │
//! │    • internal[f]       flat-cost in-house repair                 │
//! │    • external[f,d]     contractor visit, priced by season        │
//! │    • preventative[f]   optional preventative service             │
//! │                                                                  │
//! │  Maximize:                                                       │
//! │    total_revenue − (internal + external + preventative costs     │
//! │                     + revenue lost on faulted days)              │
//! │                                                                  │
//! │  Subject to, for each observed (f, d) pair:                      │
//! │    internal[f] + external[f,d] >= 1      (coverage)              │
//! │    internal[f] + external[f,d] <= 1      (exclusivity)           │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The revenue terms are constants with respect to the decision variables,
//! so the solve effectively minimizes total maintenance cost; the constants
//! only shift the reported objective value. This matches the established
//! report format and is kept intentionally.
//!
//! The API is a pure pipeline rather than a mutable model object:
//! [`build_model`] produces an immutable [`MaintenanceModel`], [`solve`]
//! consumes it into a [`SolvedMaintenance`], and [`extract_results`] reads
//! the cost breakdown out of that. A failed solve never yields a value that
//! result extraction would accept.

mod costs;
mod error;
mod problem;
mod solution;
mod solver;

pub use costs::MaintenanceCosts;
pub use error::{MaintenanceError, MaintenanceResult};
pub use problem::{MaintenanceProblem, MaintenanceProblemBuilder};
pub use solution::{MaintenanceDecision, MaintenanceOutcome};
pub use solver::{build_model, extract_results, solve, MaintenanceModel, SolvedMaintenance};
