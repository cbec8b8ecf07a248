//! Tabula CLI - profile datasets and aggregate dashboard widgets.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config;
    let result = match cli.command {
        Commands::Analyze {
            data,
            template,
            json,
            output,
        } => commands::analyze::run(data, template, json, output, config, cli.verbose),

        Commands::Widget {
            data,
            chart,
            columns,
            aggregation,
            filters,
        } => commands::widget::run(data, chart, columns, aggregation, filters, config),

        Commands::Render { dashboard, data } => commands::render::run(dashboard, data, config),

        Commands::Validate {
            dashboard,
            template,
            data,
        } => commands::validate::run(dashboard, template, data, config),

        Commands::Template { file, output } => commands::template::run(file, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
