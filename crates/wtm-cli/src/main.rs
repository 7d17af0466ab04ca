use anyhow::{Context, Result};
use clap::Parser;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;
use tabwriter::TabWriter;
use tracing::info;
use tracing_subscriber::FmtSubscriber;
use wtm_core::{WtmError, WtmResult};
use wtm_opt::{
    build_model, extract_results, solve, MaintenanceCosts, MaintenanceOutcome, MaintenanceProblem,
};

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting global tracing subscriber")?;

    // Handlers surface everything as WtmError; library-specific errors
    // (optimizer, IO) are mapped at this boundary.
    match cli.command {
        Commands::Ingest {
            fault,
            scada,
            status,
            timestamp,
            out,
        } => ingest(&fault, &scada, &status, &timestamp, &out)?,
        Commands::Features {
            input,
            timestamp,
            fault,
            production,
            price,
            high_demand_months,
            external_cost_normal,
            external_cost_high_demand,
            pre_sold_fraction,
            out,
        } => features(
            &input,
            &timestamp,
            fault.as_deref(),
            production.as_deref(),
            price.as_deref(),
            &high_demand_months,
            external_cost_normal,
            external_cost_high_demand,
            pre_sold_fraction,
            &out,
        )?,
        Commands::Optimize {
            faults,
            revenue,
            internal_cost,
            external_cost_normal,
            external_cost_high_demand,
            preventative_cost,
            high_demand_months,
            json,
        } => {
            let costs = MaintenanceCosts::new(
                internal_cost,
                external_cost_normal,
                external_cost_high_demand,
                preventative_cost,
                parse_month_set(&high_demand_months)?,
            )
            .map_err(WtmError::from)?;
            optimize(&faults, &revenue, costs, json)?
        }
    }
    Ok(())
}

fn ingest(
    fault: &Path,
    scada: &Path,
    status: &Path,
    timestamp: &str,
    out: &Path,
) -> WtmResult<()> {
    let merged = wtm_io::merge_raw_sources(fault, scada, status, timestamp, out)?;
    info!(
        rows = merged.height(),
        columns = merged.width(),
        out = %out.display(),
        "processed dataset written"
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn features(
    input: &Path,
    timestamp: &str,
    fault: Option<&str>,
    production: Option<&str>,
    price: Option<&str>,
    high_demand_months: &str,
    external_cost_normal: f64,
    external_cost_high_demand: f64,
    pre_sold_fraction: f64,
    out: &Path,
) -> WtmResult<()> {
    if production.is_some() != price.is_some() {
        return Err(WtmError::Config(
            "--production and --price must be given together".to_string(),
        ));
    }
    let months = parse_month_set(high_demand_months)?;
    let mut df = wtm_io::read_csv_frame(input)?;

    wtm_ts::add_temporal_features(&mut df, timestamp, &months)?;
    if let Some(fault_col) = fault {
        wtm_ts::add_fault_frequency_features(&mut df, fault_col)?;
    }
    if let (Some(production_col), Some(price_col)) = (production, price) {
        wtm_ts::add_revenue(&mut df, production_col, price_col)?;
        wtm_ts::add_pre_sold_production(&mut df, production_col, pre_sold_fraction)?;
    }
    wtm_ts::add_external_trip_cost(&mut df, external_cost_normal, external_cost_high_demand)?;

    wtm_io::write_csv_frame(&mut df, out)?;
    info!(rows = df.height(), out = %out.display(), "feature dataset written");
    Ok(())
}

fn optimize(
    fault_path: &Path,
    revenue_path: &Path,
    costs: MaintenanceCosts,
    json: bool,
) -> WtmResult<()> {
    let faults = wtm_io::fault_table_from_frame(&wtm_io::read_csv_frame(fault_path)?)
        .with_context(|| format!("loading fault table '{}'", fault_path.display()))?;
    let revenue = wtm_io::revenue_table_from_frame(&wtm_io::read_csv_frame(revenue_path)?)
        .with_context(|| format!("loading revenue table '{}'", revenue_path.display()))?;

    let problem = MaintenanceProblem::from_tables(costs, faults, revenue)?;
    info!(
        fault_types = problem.num_fault_types(),
        days = problem.num_days(),
        "building maintenance model"
    );

    let model = build_model(&problem)?;
    let solved = solve(model)?;
    info!(solve_time = ?solved.solve_time(), "solve finished");
    let outcome = extract_results(&solved);

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", outcome.summary());
        print_decision_table(&outcome)?;
    }
    Ok(())
}

fn print_decision_table(outcome: &MaintenanceOutcome) -> WtmResult<()> {
    let mut tw = TabWriter::new(std::io::stdout());
    writeln!(tw, "fault\tinternal\tpreventative\texternal trips")?;
    for decision in &outcome.decisions {
        writeln!(
            tw,
            "{}\t{}\t{}\t{}",
            decision.fault,
            if decision.internal { "yes" } else { "no" },
            if decision.preventative { "yes" } else { "no" },
            decision.external_days.len()
        )?;
    }
    tw.flush()?;
    Ok(())
}

/// Parse a comma-separated month list; an empty string is the empty set.
fn parse_month_set(raw: &str) -> WtmResult<BTreeSet<u32>> {
    let mut months = BTreeSet::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let month: u32 = part
            .parse()
            .map_err(|_| WtmError::Parse(format!("invalid month '{}'", part)))?;
        months.insert(month);
    }
    Ok(months)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_set_parses_default_list() {
        let months = parse_month_set("1,2,6,7,8").unwrap();
        assert_eq!(months.len(), 5);
        assert!(months.contains(&6));
    }

    #[test]
    fn month_set_accepts_empty_and_spaces() {
        assert!(parse_month_set("").unwrap().is_empty());
        let months = parse_month_set(" 1 , 12 ").unwrap();
        assert!(months.contains(&1) && months.contains(&12));
    }

    #[test]
    fn month_set_rejects_garbage() {
        let err = parse_month_set("1,feb").unwrap_err();
        assert!(matches!(err, WtmError::Parse(_)));
    }

    #[test]
    fn features_rejects_production_without_price() {
        let err = features(
            Path::new("unused.csv"),
            "DateTime",
            None,
            Some("Production"),
            None,
            "1,2",
            50_000.0,
            150_000.0,
            0.8,
            Path::new("out.csv"),
        )
        .unwrap_err();
        assert!(matches!(err, WtmError::Config(_)));
    }

    #[test]
    fn optimize_surfaces_missing_tables_as_workspace_errors() {
        let missing = Path::new("/no/such/table.csv");
        let err = optimize(missing, missing, MaintenanceCosts::default(), false).unwrap_err();
        assert!(matches!(err, WtmError::Other(_)));
    }

    #[test]
    fn features_cost_flags_default_to_standard_rates() {
        let cli = Cli::try_parse_from(["wtm", "features", "data.csv", "--out", "out.csv"]).unwrap();
        match cli.command {
            Commands::Features {
                external_cost_normal,
                external_cost_high_demand,
                ..
            } => {
                assert_eq!(external_cost_normal, 50_000.0);
                assert_eq!(external_cost_high_demand, 150_000.0);
            }
            _ => panic!("expected the features subcommand"),
        }
    }
}
