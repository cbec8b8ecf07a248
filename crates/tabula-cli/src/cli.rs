//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tabula::{Aggregation, ChartType};

/// Tabula: tabular analysis and widget aggregation engine
#[derive(Parser)]
#[command(name = "tabula")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Engine configuration file (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Profile a dataset against its template and suggest charts
    Analyze {
        /// Path to the data file (CSV/TSV/JSON)
        #[arg(value_name = "DATA")]
        data: PathBuf,

        /// Template file declaring column types
        #[arg(short, long, value_name = "FILE")]
        template: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Write the JSON profile to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compute the data for a single widget
    Widget {
        /// Path to the data file (CSV/TSV/JSON)
        #[arg(value_name = "DATA")]
        data: PathBuf,

        /// Chart type the widget is drawn as
        #[arg(long, default_value = "table")]
        chart: ChartType,

        /// Widget column, repeat for 2 or 3 columns
        #[arg(short, long = "column", value_name = "COL", required = true)]
        columns: Vec<String>,

        /// Aggregation (count, sum, avg, min, max)
        #[arg(short, long)]
        aggregation: Option<Aggregation>,

        /// Equality filter, repeatable
        #[arg(short, long = "filter", value_name = "COL=VALUE")]
        filters: Vec<String>,
    },

    /// Render every widget of a dashboard
    Render {
        /// Dashboard definition (JSON)
        #[arg(value_name = "DASHBOARD")]
        dashboard: PathBuf,

        /// Path to the data file (CSV/TSV/JSON)
        #[arg(value_name = "DATA")]
        data: PathBuf,
    },

    /// Check a dashboard's widgets against a dataset
    Validate {
        /// Dashboard definition (JSON)
        #[arg(value_name = "DASHBOARD")]
        dashboard: PathBuf,

        /// Template file declaring column types
        #[arg(short, long, value_name = "FILE")]
        template: PathBuf,

        /// Path to the data file (CSV/TSV/JSON)
        #[arg(value_name = "DATA")]
        data: PathBuf,
    },

    /// Write a blank CSV for a template
    Template {
        /// Template file (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path (default: <name>.csv next to the template)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
