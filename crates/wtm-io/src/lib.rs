//! Raw tabular ingestion for turbine analytics.
//!
//! Reads the raw fault/SCADA/status CSV exports into polars frames, joins
//! them on their shared timestamp column into one processed dataset, and
//! extracts the two prepared tables (fault table, revenue table) the
//! optimizer consumes. Extraction is fail-fast: missing columns, unparsable
//! days, and out-of-range months are errors, never silent defaults.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;
use wtm_core::{FaultKind, FaultRecord, RevenueRecord};

/// Column names of the prepared fault table.
pub const FAULT_COL: &str = "fault";
pub const DAY_COL: &str = "day";
pub const MONTH_COL: &str = "month";
/// Column name of the prepared revenue table's value column.
pub const REVENUE_COL: &str = "revenue";

/// Date format used for day identifiers throughout the pipeline.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Read a CSV file into a DataFrame, header row assumed.
pub fn read_csv_frame(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).with_context(|| format!("opening CSV '{}'", path.display()))?;
    CsvReader::new(file)
        .has_header(true)
        .finish()
        .with_context(|| format!("reading CSV '{}'", path.display()))
}

/// Persist a DataFrame as CSV, creating parent directories as needed.
pub fn write_csv_frame(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory '{}'", parent.display()))?;
    }
    let mut file =
        File::create(path).with_context(|| format!("creating CSV output '{}'", path.display()))?;
    CsvWriter::new(&mut file)
        .finish(df)
        .with_context(|| format!("writing CSV '{}'", path.display()))?;
    Ok(())
}

/// Outer-join the raw fault, SCADA, and status exports on their shared
/// timestamp column and persist the processed dataset.
///
/// Returns the processed frame for further feature derivation.
pub fn merge_raw_sources(
    fault_path: &Path,
    scada_path: &Path,
    status_path: &Path,
    timestamp_col: &str,
    out_path: &Path,
) -> Result<DataFrame> {
    let fault_df = read_csv_frame(fault_path)?;
    let scada_df = read_csv_frame(scada_path)?;
    let status_df = read_csv_frame(status_path)?;

    for (name, df) in [
        ("fault", &fault_df),
        ("scada", &scada_df),
        ("status", &status_df),
    ] {
        if df.column(timestamp_col).is_err() {
            return Err(anyhow!(
                "{} export has no '{}' column",
                name,
                timestamp_col
            ));
        }
    }

    let merged = fault_df
        .outer_join(&scada_df, &[timestamp_col], &[timestamp_col])
        .context("joining fault and SCADA exports")?;
    let mut merged = merged
        .outer_join(&status_df, &[timestamp_col], &[timestamp_col])
        .context("joining status export")?;

    write_csv_frame(&mut merged, out_path)?;
    Ok(merged)
}

/// Extract the prepared fault table from a frame with `fault`, `day`, and
/// `month` columns.
pub fn fault_table_from_frame(df: &DataFrame) -> Result<Vec<FaultRecord>> {
    let faults = column_str(df, FAULT_COL)?;
    let days = column_str(df, DAY_COL)?;
    let months = column_i64(df, MONTH_COL)?;

    let mut records = Vec::with_capacity(df.height());
    for (row, ((fault, day), month)) in faults
        .into_iter()
        .zip(days.into_iter())
        .zip(months.into_iter())
        .enumerate()
    {
        let fault = fault.ok_or_else(|| anyhow!("row {}: fault label is null", row))?;
        let day = parse_day(&day.ok_or_else(|| anyhow!("row {}: day is null", row))?)
            .with_context(|| format!("row {}", row))?;
        let month = month.ok_or_else(|| anyhow!("row {}: month is null", row))?;
        if !(1..=12).contains(&month) {
            return Err(anyhow!("row {}: month {} outside 1-12", row, month));
        }
        records.push(FaultRecord::new(FaultKind::parse(&fault), day, month as u32));
    }
    Ok(records)
}

/// Extract the prepared revenue table from a frame with `day` and `revenue`
/// columns.
pub fn revenue_table_from_frame(df: &DataFrame) -> Result<Vec<RevenueRecord>> {
    let days = column_str(df, DAY_COL)?;
    let revenues = column_f64(df, REVENUE_COL)?;

    let mut records = Vec::with_capacity(df.height());
    for (row, (day, revenue)) in days.into_iter().zip(revenues.into_iter()).enumerate() {
        let day = parse_day(&day.ok_or_else(|| anyhow!("row {}: day is null", row))?)
            .with_context(|| format!("row {}", row))?;
        let revenue = revenue.ok_or_else(|| anyhow!("row {}: revenue is null", row))?;
        records.push(RevenueRecord::new(day, revenue));
    }
    Ok(records)
}

/// Parse a day identifier in `%Y-%m-%d` form.
pub fn parse_day(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DAY_FORMAT)
        .with_context(|| format!("parsing day '{}'", raw))
}

fn column_str(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>> {
    let series = df
        .column(column)
        .with_context(|| format!("frame is missing required column '{}'", column))?;
    let chunked = series
        .utf8()
        .with_context(|| format!("column '{}' must be utf8", column))?;
    Ok(chunked
        .into_iter()
        .map(|opt| opt.map(|value| value.to_string()))
        .collect())
}

fn column_f64(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>> {
    let series = df
        .column(column)
        .with_context(|| format!("frame is missing required column '{}'", column))?;
    let chunked = series
        .cast(&DataType::Float64)
        .with_context(|| format!("column '{}' must be numeric", column))?;
    Ok(chunked.f64()?.into_iter().collect())
}

fn column_i64(df: &DataFrame, column: &str) -> Result<Vec<Option<i64>>> {
    let series = df
        .column(column)
        .with_context(|| format!("frame is missing required column '{}'", column))?;
    let chunked = series
        .cast(&DataType::Int64)
        .with_context(|| format!("column '{}' must be integer", column))?;
    Ok(chunked.i64()?.into_iter().collect())
}
