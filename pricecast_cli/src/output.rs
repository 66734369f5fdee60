use anyhow::Result;
use pricecast_lib::{MergedPricing, ProjectionResult};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    pub fn parse(input: &str) -> Result<Self> {
        match input.trim().to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "markdown" | "md" => Ok(Self::Markdown),
            _ => anyhow::bail!(
                "unknown output format '{}'. Valid values: table, json, csv, markdown",
                input
            ),
        }
    }
}

#[derive(Tabled, Serialize)]
struct HistoryRow {
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
    #[tabled(rename = "Open")]
    #[serde(rename = "Open")]
    open: String,
    #[tabled(rename = "High")]
    #[serde(rename = "High")]
    high: String,
    #[tabled(rename = "Low")]
    #[serde(rename = "Low")]
    low: String,
    #[tabled(rename = "Close")]
    #[serde(rename = "Close")]
    close: String,
    #[tabled(rename = "Dividend")]
    #[serde(rename = "Dividend")]
    dividend: String,
}

#[derive(Tabled, Serialize)]
struct ProjectionRow {
    #[tabled(rename = "Scenario")]
    #[serde(rename = "Scenario")]
    scenario: String,
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
    #[tabled(rename = "Close")]
    #[serde(rename = "Close")]
    close: String,
    #[tabled(rename = "Change")]
    #[serde(rename = "Change")]
    change: String,
}

// -- Row builders --

fn build_history_rows(series: &[MergedPricing]) -> Vec<HistoryRow> {
    series
        .iter()
        .map(|m| HistoryRow {
            date: m.date.to_string(),
            open: format_price(m.open),
            high: format_price(m.high),
            low: format_price(m.low),
            close: format_price(m.close),
            dividend: format_dividend(m.dividend),
        })
        .collect()
}

fn build_projection_rows(result: &ProjectionResult) -> Vec<ProjectionRow> {
    ["min", "median", "max"]
        .iter()
        .zip(result.points())
        .map(|(scenario, point)| ProjectionRow {
            scenario: scenario.to_string(),
            date: point.date.to_string(),
            close: format_price(point.close),
            change: format_change(result.last_close, point.close),
        })
        .collect()
}

// -- Table output --

pub fn print_history_table(series: &[MergedPricing]) {
    println!("{}", Table::new(build_history_rows(series)));
}

pub fn print_projection_table(result: &ProjectionResult) {
    println!("{}", Table::new(build_projection_rows(result)));
}

// -- Markdown output --

pub fn print_history_markdown(series: &[MergedPricing]) {
    let mut table = Table::new(build_history_rows(series));
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_projection_markdown(result: &ProjectionResult) {
    let mut table = Table::new(build_projection_rows(result));
    table.with(Style::markdown());
    println!("{}", table);
}

// -- CSV output --

pub fn print_history_csv(series: &[MergedPricing]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_history_rows(series) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_projection_csv(result: &ProjectionResult) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_projection_rows(result) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

fn format_price(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

fn format_dividend(value: Decimal) -> String {
    if value.is_zero() {
        "-".to_string()
    } else {
        format!(
            "{:.4}",
            value.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
        )
    }
}

/// Percentage change from `base` to `value`; `-` when `base` is zero.
fn format_change(base: Decimal, value: Decimal) -> String {
    match (value - base).checked_div(base) {
        Some(ratio) => {
            let pct = (ratio * Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
            if pct.is_sign_negative() && !pct.is_zero() {
                format!("{:.1}%", pct)
            } else {
                format!("+{:.1}%", pct.abs())
            }
        }
        None => "-".to_string(),
    }
}
