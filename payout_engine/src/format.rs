//! Indian-Rupee display helpers.
//!
//! Amounts are rounded with the calculators' own [`round_to_two`] before
//! formatting so that what is displayed is exactly what was computed.
//! Digits are grouped the Indian way: the last three, then pairs
//! (`12,34,567.89`).  Non-finite inputs have no grouping and are shown
//! as `NaN` or `∞` after the symbol.

use crate::rates::round_to_two;

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (mut rest, last_three) = digits.split_at(digits.len() - 3);
    let mut groups = vec![last_three];
    while rest.len() > 2 {
        let (head, pair) = rest.split_at(rest.len() - 2);
        groups.push(pair);
        rest = head;
    }
    groups.push(rest);
    groups.reverse();
    groups.join(",")
}

fn format_grouped(amount: f64, symbol: &str) -> String {
    if amount.is_nan() {
        return format!("{symbol}NaN");
    }
    if amount.is_infinite() {
        let sign = if amount < 0.0 { "-" } else { "" };
        return format!("{sign}{symbol}∞");
    }
    let rounded = round_to_two(amount);
    let sign = if rounded < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", rounded.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{sign}{symbol}{}.{fraction}", group_indian(integer))
}

/// `₹1,23,456.78`
pub fn format_inr(amount: f64) -> String {
    format_grouped(amount, "₹")
}

/// `1,23,456.78`
pub fn format_indian_number(amount: f64) -> String {
    format_grouped(amount, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_lakhs_and_crores() {
        assert_eq!(format_indian_number(123_456.78), "1,23,456.78");
        assert_eq!(format_indian_number(1_234_567.891), "12,34,567.89");
        assert_eq!(format_indian_number(10_000_000.0), "1,00,00,000.00");
        assert_eq!(format_indian_number(999.0), "999.00");
        assert_eq!(format_indian_number(1_000.0), "1,000.00");
    }

    #[test]
    fn currency_prefix_and_sign() {
        assert_eq!(format_inr(50_550.0), "₹50,550.00");
        assert_eq!(format_inr(0.5), "₹0.50");
        assert_eq!(format_inr(-1_500.0), "-₹1,500.00");
        assert_eq!(format_inr(-0.001), "₹0.00");
    }

    #[test]
    fn display_matches_calculator_rounding() {
        assert_eq!(format_inr(1.005), "₹1.01");
    }

    #[test]
    fn non_finite_amounts_are_spelled_out() {
        assert_eq!(format_inr(f64::NAN), "₹NaN");
        assert_eq!(format_inr(f64::INFINITY), "₹∞");
        assert_eq!(format_inr(f64::NEG_INFINITY), "-₹∞");
        assert_eq!(format_indian_number(f64::NAN), "NaN");
        assert_eq!(format_indian_number(f64::NEG_INFINITY), "-∞");
    }
}
