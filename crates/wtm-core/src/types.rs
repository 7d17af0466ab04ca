//! Fault and revenue record types shared by the pipeline and the optimizer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A fault-type classification for one observation.
///
/// Raw fault logs mark fault-free records with the label `"NF"`. That
/// sentinel is parsed into [`FaultKind::NoFault`] exactly once at ingestion;
/// everything downstream branches on the enum rather than comparing strings.
/// The no-fault case never receives maintenance decision variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FaultKind {
    /// No fault occurred for this record.
    NoFault,
    /// A named fault type (e.g. gearbox, generator heating).
    Fault(String),
}

impl FaultKind {
    /// Raw label used by the fault logs to mark fault-free records.
    pub const NO_FAULT_LABEL: &'static str = "NF";

    /// Parse a raw fault label, mapping the `"NF"` sentinel to [`FaultKind::NoFault`].
    pub fn parse(label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed == Self::NO_FAULT_LABEL {
            FaultKind::NoFault
        } else {
            FaultKind::Fault(trimmed.to_string())
        }
    }

    /// Whether this record carries an actual fault.
    pub fn is_fault(&self) -> bool {
        matches!(self, FaultKind::Fault(_))
    }

    /// The raw label, round-tripping `"NF"` for the no-fault case.
    pub fn label(&self) -> &str {
        match self {
            FaultKind::NoFault => Self::NO_FAULT_LABEL,
            FaultKind::Fault(name) => name.as_str(),
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One fault-type-tagged observation from the prepared fault table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultRecord {
    /// Fault classification for this record.
    pub fault: FaultKind,
    /// Calendar day the record is attributed to.
    pub day: NaiveDate,
    /// Month 1-12, used to classify high-demand season.
    pub month: u32,
}

impl FaultRecord {
    pub fn new(fault: FaultKind, day: NaiveDate, month: u32) -> Self {
        Self { fault, day, month }
    }
}

/// One time-aligned revenue observation from the prepared revenue table.
///
/// Revenue is computed upstream as production times price, unit-normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueRecord {
    /// Calendar day the record is attributed to.
    pub day: NaiveDate,
    /// Realized revenue for this record.
    pub revenue: f64,
}

impl RevenueRecord {
    pub fn new(day: NaiveDate, revenue: f64) -> Self {
        Self { day, revenue }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_maps_sentinel_to_no_fault() {
        assert_eq!(FaultKind::parse("NF"), FaultKind::NoFault);
        assert_eq!(FaultKind::parse(" NF "), FaultKind::NoFault);
        assert!(!FaultKind::parse("NF").is_fault());
    }

    #[test]
    fn parse_keeps_fault_labels() {
        let fault = FaultKind::parse("GF");
        assert_eq!(fault, FaultKind::Fault("GF".to_string()));
        assert!(fault.is_fault());
        assert_eq!(fault.label(), "GF");
    }

    #[test]
    fn label_round_trips() {
        for raw in ["NF", "GF", "MF", "FF"] {
            assert_eq!(FaultKind::parse(raw).label(), raw);
        }
    }

    #[test]
    fn fault_kind_orders_deterministically() {
        let mut kinds = vec![
            FaultKind::Fault("MF".into()),
            FaultKind::NoFault,
            FaultKind::Fault("GF".into()),
        ];
        kinds.sort();
        assert_eq!(kinds[0], FaultKind::NoFault);
        assert_eq!(kinds[1], FaultKind::Fault("GF".into()));
    }

    #[test]
    fn records_serialize() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let record = FaultRecord::new(FaultKind::parse("GF"), day, 1);
        let json = serde_json::to_string(&record).unwrap();
        let back: FaultRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
