use std::fmt;

/// Money is represented as an integer count of minor currency units to
/// avoid floating-point precision issues. 500000 minor units = 5000.00
/// in the business's currency.
pub type Minor = i64;

/// Format a minor-unit amount as a human-readable decimal string.
/// Example: 500000 -> "5000.00", 1 -> "0.01"
pub fn format_minor(amount: Minor) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.abs();
    let units = abs / 100;
    let remainder = abs % 100;
    format!("{}{}.{:02}", sign, units, remainder)
}

/// Parse a decimal string into minor units.
/// Example: "5000.00" -> 500000, "12.5" -> 1250, "100" -> 10000
///
/// Prices and paid amounts are never negative; a leading minus sign is
/// rejected here rather than downstream.
pub fn parse_minor(input: &str) -> Result<Minor, ParseMinorError> {
    let input = input.trim();
    if input.starts_with('-') {
        return Err(ParseMinorError::Negative);
    }

    let parts: Vec<&str> = input.split('.').collect();
    match parts.len() {
        1 => {
            // No decimal point, treat as whole units
            let units: i64 = parts[0]
                .parse()
                .map_err(|_| ParseMinorError::InvalidFormat)?;
            Ok(units * 100)
        }
        2 => {
            let units: i64 = if parts[0].is_empty() {
                0
            } else {
                parts[0]
                    .parse()
                    .map_err(|_| ParseMinorError::InvalidFormat)?
            };

            // Pad or truncate the decimal part to 2 digits
            let decimal_str = parts[1];
            let decimal_minor: i64 = match decimal_str.len() {
                0 => 0,
                1 => {
                    decimal_str
                        .parse::<i64>()
                        .map_err(|_| ParseMinorError::InvalidFormat)?
                        * 10
                }
                2 => decimal_str
                    .parse()
                    .map_err(|_| ParseMinorError::InvalidFormat)?,
                _ => decimal_str[..2]
                    .parse()
                    .map_err(|_| ParseMinorError::InvalidFormat)?,
            };

            Ok(units * 100 + decimal_minor)
        }
        _ => Err(ParseMinorError::InvalidFormat),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseMinorError {
    InvalidFormat,
    Negative,
}

impl fmt::Display for ParseMinorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseMinorError::InvalidFormat => write!(f, "invalid money format"),
            ParseMinorError::Negative => write!(f, "amount cannot be negative"),
        }
    }
}

impl std::error::Error for ParseMinorError {}
