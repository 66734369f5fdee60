use chrono::NaiveDate;

use crate::error::PricecastError;

pub const MAX_SYMBOL_LENGTH: usize = 16;
/// Upper bound on a projection horizon (100 years).
pub const MAX_HORIZON_MONTHS: u32 = 1200;

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim whitespace,
/// and enforce a character-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, PricecastError> {
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(PricecastError::InvalidInput(
            "input is empty after sanitization".to_string(),
        ));
    }
    if sanitized.chars().count() > max_len {
        return Err(PricecastError::InvalidInput(format!(
            "input exceeds maximum length of {} characters",
            max_len
        )));
    }
    Ok(sanitized)
}

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '.' | '-' | '^' | '=')
}

/// Validate a ticker symbol: strip control chars, trim, uppercase, then allow
/// only `A-Z 0-9 . - ^ =`.
pub fn validate_symbol(input: &str) -> Result<String, PricecastError> {
    let symbol = sanitize_text(input, MAX_SYMBOL_LENGTH)?.to_uppercase();
    if let Some(bad) = symbol.chars().find(|c| !is_symbol_char(*c)) {
        return Err(PricecastError::InvalidInput(format!(
            "invalid character '{}' in symbol '{}'. Allowed: A-Z, 0-9, '.', '-', '^', '='",
            bad, symbol
        )));
    }
    Ok(symbol)
}

/// Validate a `YYYY-MM-DD` date.
pub fn validate_date(input: &str) -> Result<NaiveDate, PricecastError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        PricecastError::InvalidInput(format!(
            "invalid date '{}'. Expected format: YYYY-MM-DD (e.g., 2024-06-01)",
            trimmed
        ))
    })
}

/// Validate a projection horizon: must be 1..=1200 months.
pub fn validate_horizon(months: u32) -> Result<u32, PricecastError> {
    if !(1..=MAX_HORIZON_MONTHS).contains(&months) {
        return Err(PricecastError::InvalidInput(format!(
            "horizon must be between 1 and {} months, got {}",
            MAX_HORIZON_MONTHS, months
        )));
    }
    Ok(months)
}
