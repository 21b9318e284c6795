//! Human-readable rendering of on-chain amounts. Pure string work; the
//! engine itself only ever deals in full-precision integers.

use crate::amount::Amount;
use crate::constants::DECIMAL_PLACES;

/// Renders an on-chain amount as whole DPR with two decimal places,
/// rounded half-up ("500000000000000000000000000" → "500000000.00").
pub fn format_balance(amount: &Amount) -> String {
    let cents = (amount * &Amount::from_u128(100))
        .div_round(&Amount::pow10(DECIMAL_PLACES))
        .unwrap_or_else(|_| Amount::zero());
    let cents = cents.as_biguint();
    let whole = cents / 100u32;
    let frac = cents % 100u32;
    format!("{whole}.{frac:02}")
}

/// `format_balance` with thousands separators ("500,000,000.00").
pub fn format_dpr(amount: &Amount) -> String {
    group_thousands(&format_balance(amount))
}

/// Inserts comma separators into the integer part of a number string,
/// leaving any fractional part untouched.
pub fn group_thousands(s: &str) -> String {
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s, None),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    match frac_part {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amt(s: &str) -> Amount {
        s.parse().expect("valid amount")
    }

    #[test]
    fn shifts_eighteen_decimals() {
        assert_eq!(
            format_balance(&amt("500000000000000000000000000")),
            "500000000.00"
        );
        assert_eq!(format_balance(&amt("12345670000000000000000")), "12345.67");
        assert_eq!(format_balance(&Amount::zero()), "0.00");
    }

    #[test]
    fn rounds_half_up_at_two_places() {
        // 1.005 DPR → 1.01, 1.004 DPR → 1.00
        assert_eq!(format_balance(&amt("1005000000000000000")), "1.01");
        assert_eq!(format_balance(&amt("1004999999999999999")), "1.00");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands("1234567.89"), "1,234,567.89");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("0.05"), "0.05");
        assert_eq!(
            format_dpr(&amt("500000000000000000000000000")),
            "500,000,000.00"
        );
    }
}
