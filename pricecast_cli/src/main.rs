mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pricecast_lib::{Config, PricingService};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "pricecast")]
#[command(about = "Historical prices and Monte Carlo price projections for equities")]
struct Cli {
    /// Output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show merged daily prices and dividends
    History(commands::history::HistoryArgs),
    /// Project the price forward with a Monte Carlo simulation
    Project(commands::project::ProjectArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pricecast=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.output)?;

    let config = Config::from_env();
    let service = PricingService::new(&config)?;

    match &cli.command {
        Commands::History(args) => commands::history::run(args, &service, &format).await?,
        Commands::Project(args) => commands::project::run(args, &service, &format).await?,
    }

    Ok(())
}
