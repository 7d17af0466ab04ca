//! Optimization outcome data structures.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use wtm_core::FaultKind;

/// The chosen maintenance mix for one fault type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceDecision {
    /// Fault type this decision covers.
    pub fault: FaultKind,
    /// Whether internal maintenance was selected.
    pub internal: bool,
    /// Whether preventative maintenance was selected.
    pub preventative: bool,
    /// Days on which an external maintenance trip was selected.
    pub external_days: Vec<NaiveDate>,
}

impl MaintenanceDecision {
    /// Whether any reactive action covers this fault type.
    pub fn is_covered(&self) -> bool {
        self.internal || !self.external_days.is_empty()
    }
}

/// Cost breakdown and chosen maintenance mix from one solved run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceOutcome {
    /// Cost of all selected internal maintenance actions.
    pub optimized_internal_cost: f64,
    /// Cost of all selected external maintenance trips, seasonally rated.
    pub optimized_external_cost: f64,
    /// Cost of all selected preventative maintenance actions.
    pub optimized_preventative_cost: f64,
    /// Sum of the three cost components.
    pub total_cost: f64,
    /// Objective value plus total cost. This recovers observed revenue net
    /// of revenue lost to faulted days, not gross revenue; the field name
    /// is kept for report compatibility.
    pub total_revenue: f64,
    /// Realized objective value of the solve.
    pub objective_value: f64,
    /// Per-fault-type decision list.
    pub decisions: Vec<MaintenanceDecision>,
}

impl MaintenanceOutcome {
    /// Number of fault types handled internally.
    pub fn internal_count(&self) -> usize {
        self.decisions.iter().filter(|d| d.internal).count()
    }

    /// Total number of external maintenance trips.
    pub fn external_trip_count(&self) -> usize {
        self.decisions.iter().map(|d| d.external_days.len()).sum()
    }

    /// Number of fault types receiving preventative maintenance.
    pub fn preventative_count(&self) -> usize {
        self.decisions.iter().filter(|d| d.preventative).count()
    }

    /// Format a human-readable summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Maintenance Plan Summary\n{}\n", "=".repeat(40)));
        s.push_str(&format!("Total Cost: ${:.2}\n", self.total_cost));
        s.push_str(&format!(
            "  Internal: ${:.2} ({} fault types)\n",
            self.optimized_internal_cost,
            self.internal_count()
        ));
        s.push_str(&format!(
            "  External: ${:.2} ({} trips)\n",
            self.optimized_external_cost,
            self.external_trip_count()
        ));
        s.push_str(&format!(
            "  Preventative: ${:.2} ({} fault types)\n",
            self.optimized_preventative_cost,
            self.preventative_count()
        ));
        s.push_str(&format!(
            "Net Revenue (after fault losses): ${:.2}\n",
            self.total_revenue
        ));
        s.push_str(&format!("Objective Value: ${:.2}\n", self.objective_value));

        if !self.decisions.is_empty() {
            s.push_str("\nDecisions:\n");
            for decision in &self.decisions {
                let mode = if decision.internal {
                    "internal".to_string()
                } else if decision.external_days.is_empty() {
                    "none".to_string()
                } else {
                    format!("external x{}", decision.external_days.len())
                };
                let preventative = if decision.preventative {
                    " + preventative"
                } else {
                    ""
                };
                s.push_str(&format!("  {:<12} {}{}\n", decision.fault, mode, preventative));
            }
        }

        s
    }
}
