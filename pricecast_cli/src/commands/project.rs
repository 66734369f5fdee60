use anyhow::Result;
use clap::Args;
use pricecast_lib::{PricingService, ProjectionSettings, TerminalSampling, DEFAULT_HORIZON_MONTHS};

use crate::output::{
    print_json, print_projection_csv, print_projection_markdown, print_projection_table,
    OutputFormat,
};

#[derive(Args)]
pub struct ProjectArgs {
    /// Ticker symbol (e.g. AAPL, BRK-B, ^GSPC)
    pub symbol: String,

    /// Projection horizon in months
    #[arg(long, default_value_t = DEFAULT_HORIZON_MONTHS)]
    pub months: u32,

    /// Master seed for reproducible runs (overrides PRICECAST_SEED)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of simulated paths (overrides PRICECAST_SIMULATIONS)
    #[arg(long)]
    pub simulations: Option<usize>,

    /// Rank every terminal price instead of only distinct ones
    #[arg(long)]
    pub all_terminals: bool,

    /// Run simulations on a single thread
    #[arg(long)]
    pub sequential: bool,
}

impl ProjectArgs {
    fn settings(&self, base: &ProjectionSettings) -> ProjectionSettings {
        ProjectionSettings {
            simulations: self.simulations.unwrap_or(base.simulations),
            seed: self.seed.or(base.seed),
            sampling: if self.all_terminals {
                TerminalSampling::All
            } else {
                base.sampling
            },
            parallel: base.parallel && !self.sequential,
        }
    }
}

pub async fn run(
    args: &ProjectArgs,
    service: &PricingService,
    format: &OutputFormat,
) -> Result<()> {
    let settings = args.settings(service.settings());
    let result = service
        .get_projection_with(&args.symbol, args.months, &settings)
        .await?;

    eprintln!(
        "{} months from last close {} (monthly volatility {:.4}, {} terminal values ranked)",
        args.months, result.last_close, result.monthly_volatility, result.ranked
    );

    match format {
        OutputFormat::Table => print_projection_table(&result),
        OutputFormat::Json => print_json(&result),
        OutputFormat::Csv => print_projection_csv(&result)?,
        OutputFormat::Markdown => print_projection_markdown(&result),
    }

    Ok(())
}
