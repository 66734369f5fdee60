use anyhow::Result;
use clap::Args;
use pricecast_lib::validation;
use pricecast_lib::{DateRange, PricingService};

use crate::output::{
    print_history_csv, print_history_markdown, print_history_table, print_json, OutputFormat,
};

#[derive(Args)]
pub struct HistoryArgs {
    /// Ticker symbol (e.g. AAPL, BRK-B, ^GSPC)
    pub symbol: String,

    /// First day of the window, YYYY-MM-DD (default: five years ago)
    #[arg(long)]
    pub start: Option<String>,

    /// Last day of the window, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub end: Option<String>,
}

pub async fn run(
    args: &HistoryArgs,
    service: &PricingService,
    format: &OutputFormat,
) -> Result<()> {
    let start = args
        .start
        .as_deref()
        .map(validation::validate_date)
        .transpose()?;
    let end = args
        .end
        .as_deref()
        .map(validation::validate_date)
        .transpose()?;
    let range = DateRange::resolve(start, end)?;

    let series = service.get_historical_series(&args.symbol, range).await?;

    eprintln!(
        "{} trading days for {} ({} to {})",
        series.len(),
        args.symbol.trim().to_uppercase(),
        range.start,
        range.end
    );

    match format {
        OutputFormat::Table => print_history_table(&series),
        OutputFormat::Json => print_json(&series),
        OutputFormat::Csv => print_history_csv(&series)?,
        OutputFormat::Markdown => print_history_markdown(&series),
    }

    Ok(())
}
