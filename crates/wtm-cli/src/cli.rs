use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "wtm", author, version, about = "Wind-turbine maintenance analytics", long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge the raw fault, SCADA, and status CSV exports into one
    /// processed dataset
    Ingest {
        /// Path to the fault export
        #[arg(long)]
        fault: PathBuf,
        /// Path to the SCADA export
        #[arg(long)]
        scada: PathBuf,
        /// Path to the status export
        #[arg(long)]
        status: PathBuf,
        /// Shared timestamp column of the three exports
        #[arg(long, default_value = "DateTime")]
        timestamp: String,
        /// Output path for the processed dataset
        #[arg(long)]
        out: PathBuf,
    },
    /// Derive temporal, fault-history, and revenue features over a
    /// processed dataset
    Features {
        /// Path to the processed dataset
        input: PathBuf,
        /// Timestamp column
        #[arg(long, default_value = "DateTime")]
        timestamp: String,
        /// Fault label column (enables fault-history features)
        #[arg(long)]
        fault: Option<String>,
        /// Production column in kWh (with --price, enables the revenue column)
        #[arg(long)]
        production: Option<String>,
        /// Electricity price column in currency/MWh
        #[arg(long)]
        price: Option<String>,
        /// High-demand months as a comma-separated list
        #[arg(long, default_value = "1,2,6,7,8")]
        high_demand_months: String,
        /// External trip cost on a normal day
        #[arg(long, default_value_t = 50_000.0)]
        external_cost_normal: f64,
        /// External trip cost on a high-demand day
        #[arg(long, default_value_t = 150_000.0)]
        external_cost_high_demand: f64,
        /// Fraction of production sold forward
        #[arg(long, default_value_t = 0.8)]
        pre_sold_fraction: f64,
        /// Output path for the enriched dataset
        #[arg(long)]
        out: PathBuf,
    },
    /// Choose the net-revenue-maximizing maintenance mix for prepared
    /// fault and revenue tables
    Optimize {
        /// Prepared fault table CSV (fault, day, month)
        #[arg(long)]
        faults: PathBuf,
        /// Prepared revenue table CSV (day, revenue)
        #[arg(long)]
        revenue: PathBuf,
        /// Flat internal maintenance cost per fault type
        #[arg(long, default_value_t = 750_000.0)]
        internal_cost: f64,
        /// External trip cost on a normal day
        #[arg(long, default_value_t = 50_000.0)]
        external_cost_normal: f64,
        /// External trip cost on a high-demand day
        #[arg(long, default_value_t = 150_000.0)]
        external_cost_high_demand: f64,
        /// Flat preventative maintenance cost per fault type
        #[arg(long, default_value_t = 50_000.0)]
        preventative_cost: f64,
        /// High-demand months as a comma-separated list (empty for none)
        #[arg(long, default_value = "1,2,6,7,8")]
        high_demand_months: String,
        /// Emit the outcome as JSON instead of the summary table
        #[arg(long)]
        json: bool,
    },
}
