use std::fmt;

/// Money is carried as a plain floating-point value in currency units.
/// Shares are fractional (100 split three ways), so no rounding happens
/// until an amount is rendered.
pub type Amount = f64;

/// Amounts closer to zero than half a cent render as zero and count as zero.
pub const HALF_CENT: Amount = 0.005;

/// Format an amount as a two-decimal string.
/// Example: 50.0 -> "50.00", -12.345 -> "-12.35", -0.001 -> "0.00"
pub fn format_amount(amount: Amount) -> String {
    if amount.abs() < HALF_CENT {
        return "0.00".to_string();
    }
    format!("{:.2}", amount)
}

/// Format an amount with a currency symbol in front of the magnitude.
/// Example: ("₨", -50.0) -> "-₨50.00"
pub fn format_money(symbol: &str, amount: Amount) -> String {
    let formatted = format_amount(amount);
    match formatted.strip_prefix('-') {
        Some(magnitude) => format!("-{}{}", symbol, magnitude),
        None => format!("{}{}", symbol, formatted),
    }
}

/// Parse user input into a finite amount. Sign is not checked here.
/// Example: "50" -> 50.0, " 12.5 " -> 12.5, "-3" -> -3.0
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseAmountError::Missing);
    }

    let value: Amount = input
        .parse()
        .map_err(|_| ParseAmountError::InvalidFormat(input.to_string()))?;

    // `f64::from_str` happily accepts "inf" and "NaN".
    if !value.is_finite() {
        return Err(ParseAmountError::NotFinite(input.to_string()));
    }

    Ok(value)
}

/// Parse user input into a strictly positive finite amount.
pub fn parse_positive_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let value = parse_amount(input)?;
    if value <= 0.0 {
        return Err(ParseAmountError::NotPositive(input.trim().to_string()));
    }
    Ok(value)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    Missing,
    InvalidFormat(String),
    NotFinite(String),
    NotPositive(String),
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::Missing => write!(f, "amount is required"),
            ParseAmountError::InvalidFormat(input) => {
                write!(f, "'{}' is not a number", input)
            }
            ParseAmountError::NotFinite(input) => write!(f, "'{}' is not a finite amount", input),
            ParseAmountError::NotPositive(input) => {
                write!(f, "amount must be greater than zero, got '{}'", input)
            }
        }
    }
}

impl std::error::Error for ParseAmountError {}
