//! Problem definition: prepared input tables plus the decision domain.

use crate::costs::MaintenanceCosts;
use crate::error::{MaintenanceError, MaintenanceResult};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use wtm_core::{FaultKind, FaultRecord, RevenueRecord};

/// One maintenance scheduling problem: the read-only input tables and the
/// fault-type / day domains the variables are built over.
///
/// The tables are assumed to be time-aligned and consistent upstream; the
/// optimizer validates only what it needs for a well-defined model (unique
/// month per day, month classification for every domain day).
#[derive(Debug, Clone)]
pub struct MaintenanceProblem {
    /// Cost parameters for this run.
    pub costs: MaintenanceCosts,
    /// Fault observations (fault type, day, month).
    pub faults: Vec<FaultRecord>,
    /// Realized revenue observations per day.
    pub revenue: Vec<RevenueRecord>,
    /// Fault-type domain. The no-fault sentinel may appear here; it never
    /// produces variables.
    pub fault_types: Vec<FaultKind>,
    /// Day domain for external maintenance decisions.
    pub days: Vec<NaiveDate>,
}

impl MaintenanceProblem {
    /// Build a problem whose domains are the distinct fault types and days
    /// observed in the fault table.
    pub fn from_tables(
        costs: MaintenanceCosts,
        faults: Vec<FaultRecord>,
        revenue: Vec<RevenueRecord>,
    ) -> MaintenanceResult<Self> {
        costs.validate()?;
        let fault_types: Vec<FaultKind> = faults
            .iter()
            .map(|record| record.fault.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let days: Vec<NaiveDate> = faults
            .iter()
            .map(|record| record.day)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        Ok(Self {
            costs,
            faults,
            revenue,
            fault_types,
            days,
        })
    }

    /// Number of non-sentinel fault types in the domain.
    pub fn num_fault_types(&self) -> usize {
        self.fault_types.iter().filter(|f| f.is_fault()).count()
    }

    /// Number of days in the domain.
    pub fn num_days(&self) -> usize {
        self.days.len()
    }

    /// Derive the indexed view the model builder works from.
    pub(crate) fn index(&self) -> MaintenanceResult<ProblemIndex> {
        self.costs.validate()?;

        // Deterministic month classification: every day must map to exactly
        // one month across the fault table.
        let mut day_month: BTreeMap<NaiveDate, u32> = BTreeMap::new();
        for record in &self.faults {
            if !(1..=12).contains(&record.month) {
                return Err(MaintenanceError::ModelConstruction(format!(
                    "fault record on {} has month {} outside 1-12",
                    record.day, record.month
                )));
            }
            if let Some(existing) = day_month.insert(record.day, record.month) {
                if existing != record.month {
                    return Err(MaintenanceError::ModelConstruction(format!(
                        "day {} maps to both month {} and month {}",
                        record.day, existing, record.month
                    )));
                }
            }
        }

        let day_set: BTreeSet<NaiveDate> = self.days.iter().copied().collect();
        if let Some(day) = day_set.iter().find(|day| !day_month.contains_key(day)) {
            return Err(MaintenanceError::ModelConstruction(format!(
                "day {} has no month classification in the fault table",
                day
            )));
        }

        let active_faults: Vec<FaultKind> = self
            .fault_types
            .iter()
            .filter(|f| f.is_fault())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let fault_set: BTreeSet<&FaultKind> = active_faults.iter().collect();

        // Observed (fault type, day) pairs, restricted to the caller-supplied
        // domains and deduplicated.
        let pairs: Vec<(FaultKind, NaiveDate)> = self
            .faults
            .iter()
            .filter(|record| record.fault.is_fault())
            .filter(|record| fault_set.contains(&record.fault) && day_set.contains(&record.day))
            .map(|record| (record.fault.clone(), record.day))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut day_revenue: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for record in &self.revenue {
            if day_set.contains(&record.day) {
                *day_revenue.entry(record.day).or_insert(0.0) += record.revenue;
            }
        }

        let total_revenue: f64 = day_revenue.values().sum();
        // Each revenue row is forfeit exactly once: its day carries a fault
        // observation (the no-fault sentinel counts), and every domain day
        // is such a day per the check above. Net revenue is therefore zero;
        // only the cost terms respond to decisions.
        let lost_revenue: f64 = total_revenue;

        Ok(ProblemIndex {
            active_faults,
            day_month,
            pairs,
            day_revenue,
            total_revenue,
            lost_revenue,
        })
    }
}

/// Indexed, validated view of one problem, consumed by the model builder.
#[derive(Debug, Clone)]
pub(crate) struct ProblemIndex {
    /// Non-sentinel fault types, deduplicated and ordered.
    pub active_faults: Vec<FaultKind>,
    /// Unique month classification per day.
    pub day_month: BTreeMap<NaiveDate, u32>,
    /// Observed (fault type, day) pairs, ordered.
    pub pairs: Vec<(FaultKind, NaiveDate)>,
    /// Total revenue per day over the day domain.
    pub day_revenue: BTreeMap<NaiveDate, f64>,
    /// Revenue summed over the day domain (objective constant).
    pub total_revenue: f64,
    /// Revenue forfeited to fault days (objective constant). Equals
    /// `total_revenue`, since every domain day carries a fault observation.
    pub lost_revenue: f64,
}

/// Builder for maintenance problems, for callers assembling tables by hand.
pub struct MaintenanceProblemBuilder {
    costs: MaintenanceCosts,
    faults: Vec<FaultRecord>,
    revenue: Vec<RevenueRecord>,
    fault_types: Option<Vec<FaultKind>>,
    days: Option<Vec<NaiveDate>>,
}

impl MaintenanceProblemBuilder {
    /// Start building a problem with the given cost configuration.
    pub fn new(costs: MaintenanceCosts) -> Self {
        Self {
            costs,
            faults: Vec::new(),
            revenue: Vec::new(),
            fault_types: None,
            days: None,
        }
    }

    /// Add one fault observation.
    pub fn fault(mut self, fault: FaultKind, day: NaiveDate, month: u32) -> Self {
        self.faults.push(FaultRecord::new(fault, day, month));
        self
    }

    /// Add one revenue observation.
    pub fn revenue(mut self, day: NaiveDate, revenue: f64) -> Self {
        self.revenue.push(RevenueRecord::new(day, revenue));
        self
    }

    /// Override the fault-type domain (defaults to the distinct fault types
    /// observed in the fault table).
    pub fn fault_types(mut self, fault_types: Vec<FaultKind>) -> Self {
        self.fault_types = Some(fault_types);
        self
    }

    /// Override the day domain (defaults to the distinct days observed in
    /// the fault table).
    pub fn days(mut self, days: Vec<NaiveDate>) -> Self {
        self.days = Some(days);
        self
    }

    /// Finish building, validating the cost configuration.
    pub fn build(self) -> MaintenanceResult<MaintenanceProblem> {
        let mut problem =
            MaintenanceProblem::from_tables(self.costs, self.faults, self.revenue)?;
        if let Some(fault_types) = self.fault_types {
            problem.fault_types = fault_types;
        }
        if let Some(days) = self.days {
            problem.days = days;
        }
        Ok(problem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn from_tables_derives_domains() {
        let problem = MaintenanceProblem::from_tables(
            MaintenanceCosts::default(),
            vec![
                FaultRecord::new(FaultKind::parse("GF"), day(2024, 1, 1), 1),
                FaultRecord::new(FaultKind::parse("GF"), day(2024, 1, 2), 1),
                FaultRecord::new(FaultKind::parse("NF"), day(2024, 1, 2), 1),
                FaultRecord::new(FaultKind::parse("MF"), day(2024, 1, 1), 1),
            ],
            vec![RevenueRecord::new(day(2024, 1, 1), 100.0)],
        )
        .unwrap();

        assert_eq!(problem.fault_types.len(), 3); // NF still in the domain
        assert_eq!(problem.num_fault_types(), 2); // but not an active fault
        assert_eq!(problem.num_days(), 2);
    }

    #[test]
    fn index_rejects_conflicting_months() {
        let problem = MaintenanceProblemBuilder::new(MaintenanceCosts::default())
            .fault(FaultKind::parse("GF"), day(2024, 1, 1), 1)
            .fault(FaultKind::parse("MF"), day(2024, 1, 1), 2)
            .build()
            .unwrap();

        let err = problem.index().unwrap_err();
        assert!(matches!(err, MaintenanceError::ModelConstruction(_)));
        assert!(err.to_string().contains("2024-01-01"));
    }

    #[test]
    fn index_rejects_out_of_range_month() {
        let problem = MaintenanceProblemBuilder::new(MaintenanceCosts::default())
            .fault(FaultKind::parse("GF"), day(2024, 1, 1), 13)
            .build()
            .unwrap();
        assert!(problem.index().is_err());
    }

    #[test]
    fn index_rejects_day_without_month_classification() {
        let problem = MaintenanceProblemBuilder::new(MaintenanceCosts::default())
            .fault(FaultKind::parse("GF"), day(2024, 3, 1), 3)
            .revenue(day(2024, 6, 15), 500.0)
            .days(vec![day(2024, 3, 1), day(2024, 6, 15)])
            .build()
            .unwrap();

        let err = problem.index().unwrap_err();
        assert!(matches!(err, MaintenanceError::ModelConstruction(_)));
        assert!(err.to_string().contains("2024-06-15"));
    }

    #[test]
    fn lost_revenue_counts_each_revenue_row_once() {
        let d = day(2024, 1, 1);
        let problem = MaintenanceProblemBuilder::new(MaintenanceCosts::default())
            .fault(FaultKind::parse("GF"), d, 1)
            .fault(FaultKind::parse("GF"), d, 1) // duplicate observation
            .fault(FaultKind::parse("MF"), d, 1)
            .revenue(d, 1_000.0)
            .build()
            .unwrap();

        let index = problem.index().unwrap();
        assert_eq!(index.pairs.len(), 2);
        assert_eq!(index.total_revenue, 1_000.0);
        // Two fault types share the day; its revenue is forfeit once,
        // not once per fault type.
        assert_eq!(index.lost_revenue, 1_000.0);
    }

    #[test]
    fn no_fault_days_still_forfeit_revenue() {
        let problem = MaintenanceProblemBuilder::new(MaintenanceCosts::default())
            .fault(FaultKind::parse("GF"), day(2024, 1, 1), 1)
            .fault(FaultKind::parse("NF"), day(2024, 1, 2), 1)
            .revenue(day(2024, 1, 1), 100.0)
            .revenue(day(2024, 1, 2), 500.0)
            .build()
            .unwrap();

        let index = problem.index().unwrap();
        // The sentinel-only day produces no variables but its revenue is
        // still counted as lost.
        assert_eq!(index.pairs.len(), 1);
        assert_eq!(index.lost_revenue, 600.0);
    }

    #[test]
    fn index_ignores_revenue_outside_day_domain() {
        let problem = MaintenanceProblemBuilder::new(MaintenanceCosts::default())
            .fault(FaultKind::parse("GF"), day(2024, 1, 1), 1)
            .revenue(day(2024, 1, 1), 100.0)
            .revenue(day(2030, 1, 1), 999.0)
            .build()
            .unwrap();

        let index = problem.index().unwrap();
        assert_eq!(index.total_revenue, 100.0);
    }
}
