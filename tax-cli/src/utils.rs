//! Text parsing and display formatting for amounts and rates.

use rust_decimal::{Decimal, RoundingStrategy};
use tax_core::calculations::common::{percentage, round_half_up};
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Trims whitespace and removes commas (thousands separator).
pub fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`).
/// Logs at debug level when the input is rejected.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    normalize_decimal_input(s).parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Formats an amount as euros with comma thousands separators, e.g. `€50,000.00`.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use tax_cli::utils::format_currency;
///
/// assert_eq!(format_currency(dec!(1234567.891)), "€1,234,567.89");
/// assert_eq!(format_currency(dec!(0)), "€0.00");
/// assert_eq!(format_currency(dec!(-950.5)), "€-950.50");
/// ```
pub fn format_currency(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };

    let formatted = format!("{:.2}", rounded.abs());
    let (integer_part, decimal_part) = formatted.split_once('.').unwrap_or((&formatted, "00"));

    format!("€{sign}{}.{decimal_part}", group_thousands(integer_part))
}

/// Formats a whole euro amount without cents, e.g. `€10,000`.
pub fn format_currency_whole(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };

    format!("€{sign}{}", group_thousands(&rounded.abs().trunc().to_string()))
}

/// Inserts `,` between every group of three digits, counting from the right.
fn group_thousands(digits: &str) -> String {
    digits
        .chars()
        .rev()
        .enumerate()
        .flat_map(|(i, c)| {
            if i > 0 && i % 3 == 0 {
                vec![',', c]
            } else {
                vec![c]
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect()
}

/// Formats a fractional rate as a percentage with two decimals, e.g. `13.33%`.
pub fn format_percent(rate: Decimal) -> String {
    format!("{:.2}%", percentage(rate))
}

/// Formats a fractional rate as a whole percentage when it has no fraction
/// part (`24%`), otherwise with two decimals (`13.33%`).
pub fn format_rate(rate: Decimal) -> String {
    let percent = (rate * Decimal::ONE_HUNDRED).normalize();
    if percent.fract().is_zero() {
        format!("{percent}%")
    } else {
        format!("{:.2}%", round_half_up(percent))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // parse_decimal tests
    // =========================================================================

    #[test]
    fn parse_decimal_accepts_comma_thousands_separator() {
        assert_eq!(parse_decimal("1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal("1,234,567.89").unwrap(), dec!(1234567.89));
    }

    #[test]
    fn parse_decimal_trims_whitespace() {
        assert_eq!(parse_decimal("  123.45  ").unwrap(), dec!(123.45));
    }

    #[test]
    fn parse_decimal_rejects_empty_input() {
        assert!(parse_decimal("").is_err());
        assert!(parse_decimal("   ").is_err());
    }

    #[test]
    fn parse_decimal_rejects_text() {
        assert!(parse_decimal("abc").is_err());
        assert!(parse_decimal("12a").is_err());
    }

    #[test]
    fn parse_decimal_accepts_negative_values() {
        assert_eq!(parse_decimal("-500").unwrap(), dec!(-500));
    }

    // =========================================================================
    // format_currency tests
    // =========================================================================

    #[test]
    fn format_currency_groups_thousands() {
        assert_eq!(format_currency(dec!(50000)), "€50,000.00");
        assert_eq!(format_currency(dec!(10000000)), "€10,000,000.00");
    }

    #[test]
    fn format_currency_small_values_have_no_separator() {
        assert_eq!(format_currency(dec!(416.67)), "€416.67");
        assert_eq!(format_currency(dec!(0.5)), "€0.50");
    }

    #[test]
    fn format_currency_rounds_half_up() {
        assert_eq!(format_currency(dec!(416.665)), "€416.67");
    }

    #[test]
    fn format_currency_negative_sign_follows_symbol() {
        assert_eq!(format_currency(dec!(-1234.5)), "€-1,234.50");
    }

    #[test]
    fn format_currency_whole_drops_cents() {
        assert_eq!(format_currency_whole(dec!(10000000)), "€10,000,000");
        assert_eq!(format_currency_whole(dec!(40000.00)), "€40,000");
        assert_eq!(format_currency_whole(dec!(0)), "€0");
    }

    // =========================================================================
    // format_percent / format_rate tests
    // =========================================================================

    #[test]
    fn format_percent_uses_two_decimals() {
        assert_eq!(format_percent(dec!(0.1333)), "13.33%");
        assert_eq!(format_percent(dec!(0.24)), "24.00%");
        assert_eq!(format_percent(dec!(0.19666666)), "19.67%");
    }

    #[test]
    fn format_rate_drops_zero_fraction() {
        assert_eq!(format_rate(dec!(0.09)), "9%");
        assert_eq!(format_rate(dec!(0.20)), "20%");
        assert_eq!(format_rate(dec!(0.0667)), "6.67%");
    }
}
