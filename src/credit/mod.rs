//! Store-credit arithmetic.
//!
//! The balance lives in the customer record's freeform `note` field, so
//! everything here works on the string form of that field: parse it,
//! subtract the discount, clamp at zero, format it for the write-back.
//!
//! The discount amount is the sum of the `item_ids` query parameter's
//! comma-separated entries, each parsed as a number. The upstream checkout
//! integration sends prices in that parameter despite its name, and the
//! wire contract is kept as-is.

use rand::Rng;

/// Balance assigned to customers whose note holds no number.
pub const DEFAULT_BALANCE: f64 = 150.0;

/// Parses a store-credit balance out of a customer note.
///
/// A missing note or one that does not parse as a number yields
/// [`DEFAULT_BALANCE`].
///
/// # Example
///
/// ```rust
/// use storecredit::credit::parse_balance;
///
/// assert_eq!(parse_balance(Some("150")), 150.0);
/// assert_eq!(parse_balance(Some("12.5")), 12.5);
/// assert_eq!(parse_balance(Some("VIP customer")), 150.0);
/// assert_eq!(parse_balance(None), 150.0);
/// ```
#[must_use]
pub fn parse_balance(note: Option<&str>) -> f64 {
    note.and_then(|n| n.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .unwrap_or(DEFAULT_BALANCE)
}

/// Sums the comma-separated entries of an `item_ids` parameter.
///
/// Entries that do not parse as numbers contribute nothing. A missing or
/// empty parameter sums to zero.
#[must_use]
pub fn discount_amount(item_ids: Option<&str>) -> f64 {
    item_ids
        .map(|raw| {
            raw.split(',')
                .filter_map(|entry| entry.trim().parse::<f64>().ok())
                .sum()
        })
        .unwrap_or(0.0)
}

/// Subtracts a discount from a balance, clamping at zero.
///
/// The stored balance never goes negative; a discount larger than the
/// balance drains it to exactly `0`.
#[must_use]
pub fn apply_discount(balance: f64, amount: f64) -> f64 {
    let remaining = balance - amount;
    if remaining < 0.0 {
        0.0
    } else {
        remaining
    }
}

/// Generates a discount code: a random 6-digit integer.
#[must_use]
pub fn generate_discount_code() -> u32 {
    rand::thread_rng().gen_range(100_000..=999_999)
}

/// Formats a balance for the note write-back.
///
/// Whole values drop the fractional part (`100` rather than `100.0`) so
/// the note stays readable in the admin UI.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_balance(balance: f64) -> String {
    if balance.fract() == 0.0 && balance.abs() < 1e15 {
        format!("{}", balance as i64)
    } else {
        format!("{balance}")
    }
}

/// Renders a balance as a JSON number, integral when it is whole.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn balance_to_json(balance: f64) -> serde_json::Value {
    if balance.fract() == 0.0 && balance.abs() < 1e15 {
        serde_json::Value::from(balance as i64)
    } else {
        serde_json::Value::from(balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_balance_reads_numeric_notes() {
        assert_eq!(parse_balance(Some("150")), 150.0);
        assert_eq!(parse_balance(Some(" 99.5 ")), 99.5);
        assert_eq!(parse_balance(Some("0")), 0.0);
    }

    #[test]
    fn test_parse_balance_defaults_for_non_numeric() {
        assert_eq!(parse_balance(Some("prefers email")), DEFAULT_BALANCE);
        assert_eq!(parse_balance(Some("")), DEFAULT_BALANCE);
        assert_eq!(parse_balance(None), DEFAULT_BALANCE);
        assert_eq!(parse_balance(Some("NaN")), DEFAULT_BALANCE);
    }

    #[test]
    fn test_discount_amount_sums_entries() {
        assert_eq!(discount_amount(Some("24,26")), 50.0);
        assert_eq!(discount_amount(Some("10")), 10.0);
        assert_eq!(discount_amount(Some("1.5,2.5")), 4.0);
    }

    #[test]
    fn test_discount_amount_handles_missing_and_junk() {
        assert_eq!(discount_amount(None), 0.0);
        assert_eq!(discount_amount(Some("")), 0.0);
        assert_eq!(discount_amount(Some("abc,10")), 10.0);
    }

    #[test]
    fn test_apply_discount_subtracts() {
        assert_eq!(apply_discount(150.0, 50.0), 100.0);
    }

    #[test]
    fn test_apply_discount_clamps_at_zero() {
        assert_eq!(apply_discount(10.0, 30.0), 0.0);
        assert_eq!(apply_discount(0.0, 1.0), 0.0);
    }

    #[test]
    fn test_generate_discount_code_is_six_digits() {
        for _ in 0..100 {
            let code = generate_discount_code();
            assert!((100_000..=999_999).contains(&code));
        }
    }

    #[test]
    fn test_format_balance_drops_trailing_zero() {
        assert_eq!(format_balance(100.0), "100");
        assert_eq!(format_balance(0.0), "0");
        assert_eq!(format_balance(12.5), "12.5");
    }

    #[test]
    fn test_balance_to_json_is_integral_when_whole() {
        assert_eq!(balance_to_json(150.0), serde_json::json!(150));
        assert_eq!(balance_to_json(12.5), serde_json::json!(12.5));
    }
}
