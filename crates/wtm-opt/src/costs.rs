//! Cost configuration for one optimization run.

use crate::error::{MaintenanceError, MaintenanceResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Fixed cost parameters and the high-demand month set.
///
/// All fields have defaults and are overridable at construction. An empty
/// `high_demand_months` set is legal and simply prices every day at the
/// normal external rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceCosts {
    /// Flat cost of choosing internal maintenance for a fault type,
    /// independent of day.
    pub internal_cost: f64,
    /// External maintenance cost on a non-high-demand day.
    pub external_cost_normal: f64,
    /// External maintenance cost on a high-demand day.
    pub external_cost_high_demand: f64,
    /// Flat cost of preventative maintenance for a fault type.
    pub preventative_cost: f64,
    /// Months (1-12) classified as high demand.
    pub high_demand_months: BTreeSet<u32>,
}

impl Default for MaintenanceCosts {
    fn default() -> Self {
        Self {
            internal_cost: 750_000.0,
            external_cost_normal: 50_000.0,
            external_cost_high_demand: 150_000.0,
            preventative_cost: 50_000.0,
            high_demand_months: [1, 2, 6, 7, 8].into_iter().collect(),
        }
    }
}

impl MaintenanceCosts {
    /// Build a validated cost configuration.
    pub fn new(
        internal_cost: f64,
        external_cost_normal: f64,
        external_cost_high_demand: f64,
        preventative_cost: f64,
        high_demand_months: BTreeSet<u32>,
    ) -> MaintenanceResult<Self> {
        let costs = Self {
            internal_cost,
            external_cost_normal,
            external_cost_high_demand,
            preventative_cost,
            high_demand_months,
        };
        costs.validate()?;
        Ok(costs)
    }

    /// Check cost parameters eagerly, before any model is built.
    pub fn validate(&self) -> MaintenanceResult<()> {
        let named = [
            ("internal_cost", self.internal_cost),
            ("external_cost_normal", self.external_cost_normal),
            ("external_cost_high_demand", self.external_cost_high_demand),
            ("preventative_cost", self.preventative_cost),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(MaintenanceError::Config(format!(
                    "{} must be a non-negative finite number, got {}",
                    name, value
                )));
            }
        }
        if let Some(month) = self
            .high_demand_months
            .iter()
            .find(|m| !(1..=12).contains(*m))
        {
            return Err(MaintenanceError::Config(format!(
                "high-demand month {} outside 1-12",
                month
            )));
        }
        Ok(())
    }

    /// Whether a month falls in the high-demand season.
    pub fn is_high_demand(&self, month: u32) -> bool {
        self.high_demand_months.contains(&month)
    }

    /// External maintenance rate for a day in the given month.
    pub fn external_rate(&self, month: u32) -> f64 {
        if self.is_high_demand(month) {
            self.external_cost_high_demand
        } else {
            self.external_cost_normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_standard_rates() {
        let costs = MaintenanceCosts::default();
        assert_eq!(costs.internal_cost, 750_000.0);
        assert_eq!(costs.external_cost_normal, 50_000.0);
        assert_eq!(costs.external_cost_high_demand, 150_000.0);
        assert_eq!(costs.preventative_cost, 50_000.0);
        let months: Vec<u32> = costs.high_demand_months.iter().copied().collect();
        assert_eq!(months, vec![1, 2, 6, 7, 8]);
        costs.validate().unwrap();
    }

    #[test]
    fn negative_costs_rejected() {
        let err = MaintenanceCosts::new(-1.0, 50_000.0, 150_000.0, 50_000.0, BTreeSet::new())
            .unwrap_err();
        assert!(matches!(err, MaintenanceError::Config(_)));
    }

    #[test]
    fn out_of_range_month_rejected() {
        let err = MaintenanceCosts::new(
            750_000.0,
            50_000.0,
            150_000.0,
            50_000.0,
            [0u32].into_iter().collect(),
        )
        .unwrap_err();
        assert!(matches!(err, MaintenanceError::Config(_)));
    }

    #[test]
    fn empty_month_set_means_always_normal_rate() {
        let costs =
            MaintenanceCosts::new(750_000.0, 50_000.0, 150_000.0, 50_000.0, BTreeSet::new())
                .unwrap();
        for month in 1..=12 {
            assert_eq!(costs.external_rate(month), 50_000.0);
        }
    }

    #[test]
    fn external_rate_tracks_season() {
        let costs = MaintenanceCosts::default();
        assert_eq!(costs.external_rate(1), 150_000.0);
        assert_eq!(costs.external_rate(4), 50_000.0);
        assert!(costs.is_high_demand(7));
        assert!(!costs.is_high_demand(12));
    }
}
