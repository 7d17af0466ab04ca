//! Feature engineering over processed turbine frames.
//!
//! Derives the temporal, fault-history, and financial columns the analysis
//! and the downstream optimizer tables are built from. All functions take a
//! frame with a utf8 timestamp column (`%Y-%m-%d %H:%M:%S`), append derived
//! columns in place, and leave existing columns untouched.

use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::*;
use std::collections::{BTreeSet, HashMap};

/// Timestamp format of the processed dataset.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a utf8 timestamp column into per-row `NaiveDateTime`s.
///
/// Accepts full timestamps and bare `%Y-%m-%d` dates (midnight assumed).
/// Null rows stay null; unparsable values are errors.
pub fn parse_timestamps(df: &DataFrame, timestamp_col: &str) -> Result<Vec<Option<NaiveDateTime>>> {
    let series = df
        .column(timestamp_col)
        .with_context(|| format!("frame is missing timestamp column '{}'", timestamp_col))?;
    let chunked = series
        .utf8()
        .with_context(|| format!("timestamp column '{}' must be utf8", timestamp_col))?;

    chunked
        .into_iter()
        .enumerate()
        .map(|(row, opt)| match opt {
            None => Ok(None),
            Some(raw) => {
                let trimmed = raw.trim();
                NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT)
                    .or_else(|_| {
                        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                            .map(|date| date.and_time(NaiveTime::MIN))
                    })
                    .map(Some)
                    .with_context(|| format!("row {}: unparsable timestamp '{}'", row, raw))
            }
        })
        .collect()
}

/// Add temporal feature columns derived from the timestamp column:
///
/// - `day`: calendar day identifier (`%Y-%m-%d`)
/// - `month`: month 1-12
/// - `day_of_week`: 0 = Monday through 6 = Sunday
/// - `is_weekend`: 1 for Saturday/Sunday
/// - `is_high_demand_season`: 1 when the month is in `high_demand_months`
pub fn add_temporal_features(
    df: &mut DataFrame,
    timestamp_col: &str,
    high_demand_months: &BTreeSet<u32>,
) -> Result<()> {
    let timestamps = parse_timestamps(df, timestamp_col)?;

    let mut days: Vec<Option<String>> = Vec::with_capacity(timestamps.len());
    let mut months: Vec<Option<i64>> = Vec::with_capacity(timestamps.len());
    let mut weekdays: Vec<Option<i64>> = Vec::with_capacity(timestamps.len());
    let mut weekends: Vec<Option<i64>> = Vec::with_capacity(timestamps.len());
    let mut high_demand: Vec<Option<i64>> = Vec::with_capacity(timestamps.len());

    for ts in &timestamps {
        match ts {
            Some(ts) => {
                let weekday = ts.weekday().num_days_from_monday() as i64;
                days.push(Some(ts.date().format("%Y-%m-%d").to_string()));
                months.push(Some(ts.month() as i64));
                weekdays.push(Some(weekday));
                weekends.push(Some(i64::from(weekday >= 5)));
                high_demand.push(Some(i64::from(high_demand_months.contains(&ts.month()))));
            }
            None => {
                days.push(None);
                months.push(None);
                weekdays.push(None);
                weekends.push(None);
                high_demand.push(None);
            }
        }
    }

    df.with_column(Series::new("day", days))?;
    df.with_column(Series::new("month", months))?;
    df.with_column(Series::new("day_of_week", weekdays))?;
    df.with_column(Series::new("is_weekend", weekends))?;
    df.with_column(Series::new("is_high_demand_season", high_demand))?;
    Ok(())
}

/// Add fault-history features per fault type:
///
/// - `<fault_col>_count`: running occurrence count of the row's fault type
/// - `occurrences_remaining`: occurrences of the same fault type after this
///   row (reverse running count), a recurrence-interval feature
pub fn add_fault_frequency_features(df: &mut DataFrame, fault_col: &str) -> Result<()> {
    let series = df
        .column(fault_col)
        .with_context(|| format!("frame is missing fault column '{}'", fault_col))?;
    let chunked = series
        .utf8()
        .with_context(|| format!("fault column '{}' must be utf8", fault_col))?;
    let labels: Vec<Option<String>> = chunked
        .into_iter()
        .map(|opt| opt.map(|value| value.to_string()))
        .collect();

    let mut totals: HashMap<String, i64> = HashMap::new();
    for label in labels.iter().flatten() {
        *totals.entry(label.clone()).or_insert(0) += 1;
    }

    let mut running: HashMap<String, i64> = HashMap::new();
    let mut counts: Vec<Option<i64>> = Vec::with_capacity(labels.len());
    let mut remaining: Vec<Option<i64>> = Vec::with_capacity(labels.len());
    for label in &labels {
        match label {
            Some(label) => {
                let seen = running.entry(label.clone()).or_insert(0);
                *seen += 1;
                counts.push(Some(*seen));
                remaining.push(Some(totals[label] - *seen));
            }
            None => {
                counts.push(None);
                remaining.push(None);
            }
        }
    }

    df.with_column(Series::new(&format!("{}_count", fault_col), counts))?;
    df.with_column(Series::new("occurrences_remaining", remaining))?;
    Ok(())
}

/// Add a `revenue` column: production (kWh) converted to MWh times the
/// electricity price (currency/MWh).
pub fn add_revenue(df: &mut DataFrame, production_col: &str, price_col: &str) -> Result<()> {
    let production = numeric_column(df, production_col)?;
    let price = numeric_column(df, price_col)?;

    let revenue: Vec<Option<f64>> = production
        .into_iter()
        .zip(price)
        .map(|(p, c)| match (p, c) {
            (Some(p), Some(c)) => Some(p / 1_000.0 * c),
            _ => None,
        })
        .collect();

    df.with_column(Series::new("revenue", revenue))?;
    Ok(())
}

/// Add an `external_trip_cost` column: the cost of one external maintenance
/// trip on each record's day, priced by the `is_high_demand_season` flag.
pub fn add_external_trip_cost(df: &mut DataFrame, normal_rate: f64, high_rate: f64) -> Result<()> {
    let flags = df
        .column("is_high_demand_season")
        .context("run add_temporal_features first: 'is_high_demand_season' is missing")?
        .cast(&DataType::Int64)?;
    let costs: Vec<Option<f64>> = flags
        .i64()?
        .into_iter()
        .map(|opt| opt.map(|flag| if flag == 1 { high_rate } else { normal_rate }))
        .collect();
    df.with_column(Series::new("external_trip_cost", costs))?;
    Ok(())
}

/// Add a `pre_sold_production` column: the share of production already sold
/// forward (default commercial assumption is 80%).
pub fn add_pre_sold_production(
    df: &mut DataFrame,
    production_col: &str,
    fraction: f64,
) -> Result<()> {
    if !(0.0..=1.0).contains(&fraction) {
        return Err(anyhow!("pre-sold fraction {} outside 0-1", fraction));
    }
    let production = numeric_column(df, production_col)?;
    let pre_sold: Vec<Option<f64>> = production
        .into_iter()
        .map(|opt| opt.map(|value| value * fraction))
        .collect();
    df.with_column(Series::new("pre_sold_production", pre_sold))?;
    Ok(())
}

fn numeric_column(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>> {
    let series = df
        .column(column)
        .with_context(|| format!("frame is missing required column '{}'", column))?;
    let chunked = series
        .cast(&DataType::Float64)
        .with_context(|| format!("column '{}' must be numeric", column))?;
    Ok(chunked.f64()?.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_season() -> BTreeSet<u32> {
        [1, 2, 6, 7, 8].into_iter().collect()
    }

    #[test]
    fn temporal_features_cover_weekday_and_season() {
        // 2024-01-06 is a Saturday in a high-demand month, 2024-03-04 a
        // Monday in a normal month.
        let mut df = df![
            "DateTime" => &["2024-01-06 12:00:00", "2024-03-04 08:10:00"],
        ]
        .unwrap();
        add_temporal_features(&mut df, "DateTime", &default_season()).unwrap();

        let months = df.column("month").unwrap().i64().unwrap();
        assert_eq!(months.get(0), Some(1));
        assert_eq!(months.get(1), Some(3));

        let weekdays = df.column("day_of_week").unwrap().i64().unwrap();
        assert_eq!(weekdays.get(0), Some(5));
        assert_eq!(weekdays.get(1), Some(0));

        let weekends = df.column("is_weekend").unwrap().i64().unwrap();
        assert_eq!(weekends.get(0), Some(1));
        assert_eq!(weekends.get(1), Some(0));

        let season = df.column("is_high_demand_season").unwrap().i64().unwrap();
        assert_eq!(season.get(0), Some(1));
        assert_eq!(season.get(1), Some(0));

        let days = df.column("day").unwrap().utf8().unwrap();
        assert_eq!(days.get(0), Some("2024-01-06"));
    }

    #[test]
    fn temporal_features_accept_bare_dates_and_keep_nulls() {
        let timestamps: Vec<Option<String>> = vec![Some("2024-06-15".to_string()), None];
        let mut df = DataFrame::new(vec![Series::new("DateTime", timestamps)]).unwrap();
        add_temporal_features(&mut df, "DateTime", &default_season()).unwrap();
        let months = df.column("month").unwrap().i64().unwrap();
        assert_eq!(months.get(0), Some(6));
        assert_eq!(months.get(1), None);
    }

    #[test]
    fn temporal_features_reject_garbage_timestamps() {
        let mut df = df![
            "DateTime" => &["yesterday"],
        ]
        .unwrap();
        assert!(add_temporal_features(&mut df, "DateTime", &default_season()).is_err());
    }

    #[test]
    fn fault_frequency_counts_per_type() {
        let mut df = df![
            "fault" => &["GF", "NF", "GF", "MF", "GF"],
        ]
        .unwrap();
        add_fault_frequency_features(&mut df, "fault").unwrap();

        let counts = df.column("fault_count").unwrap().i64().unwrap();
        assert_eq!(counts.get(0), Some(1));
        assert_eq!(counts.get(2), Some(2));
        assert_eq!(counts.get(4), Some(3));

        let remaining = df.column("occurrences_remaining").unwrap().i64().unwrap();
        assert_eq!(remaining.get(0), Some(2));
        assert_eq!(remaining.get(2), Some(1));
        assert_eq!(remaining.get(4), Some(0));
    }

    #[test]
    fn revenue_converts_kwh_to_mwh() {
        let mut df = df![
            "power_kwh" => &[1_500.0f64, 0.0],
            "price_mwh" => &[40.0f64, 40.0],
        ]
        .unwrap();
        add_revenue(&mut df, "power_kwh", "price_mwh").unwrap();
        let revenue = df.column("revenue").unwrap().f64().unwrap();
        assert_eq!(revenue.get(0), Some(60.0));
        assert_eq!(revenue.get(1), Some(0.0));
    }

    #[test]
    fn external_trip_cost_follows_season_flag() {
        let mut df = df![
            "DateTime" => &["2024-01-06 12:00:00", "2024-03-04 08:10:00"],
        ]
        .unwrap();
        add_temporal_features(&mut df, "DateTime", &default_season()).unwrap();
        add_external_trip_cost(&mut df, 50_000.0, 150_000.0).unwrap();
        let costs = df.column("external_trip_cost").unwrap().f64().unwrap();
        assert_eq!(costs.get(0), Some(150_000.0));
        assert_eq!(costs.get(1), Some(50_000.0));
    }

    #[test]
    fn pre_sold_production_scales_by_fraction() {
        let mut df = df![
            "power_kwh" => &[1_000.0f64],
        ]
        .unwrap();
        add_pre_sold_production(&mut df, "power_kwh", 0.8).unwrap();
        let pre_sold = df.column("pre_sold_production").unwrap().f64().unwrap();
        assert_eq!(pre_sold.get(0), Some(800.0));

        assert!(add_pre_sold_production(&mut df, "power_kwh", 1.5).is_err());
    }
}
