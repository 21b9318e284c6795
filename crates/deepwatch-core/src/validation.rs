//! Trust-boundary checks applied to everything that crosses into the
//! engine: RPC responses before they are used, computed records before
//! they are cached.

use once_cell::sync::Lazy;

use crate::amount::Amount;
use crate::constants::BALANCE_LIMIT_EXP;
use crate::types::TimeLeft;

/// Upper bound for any balance the engine will accept. Total issuance is
/// in the 10^27 range; anything at 10^50 or above is corrupted data.
static BALANCE_LIMIT: Lazy<Amount> = Lazy::new(|| Amount::pow10(BALANCE_LIMIT_EXP));

/// True iff `balance` is a strict base-10 digit string below 10^50.
pub fn validate_balance(balance: &str) -> bool {
    match balance.parse::<Amount>() {
        Ok(amount) => amount < *BALANCE_LIMIT,
        Err(_) => false,
    }
}

/// True iff `number` can be a real block height. Takes a signed value so
/// window subtraction results can be checked before narrowing to `u64`.
pub fn validate_block_number(number: i128) -> bool {
    number >= 0
}

/// True iff every field sits inside its calendar range.
pub fn validate_time_left(t: &TimeLeft) -> bool {
    t.hours < 24 && t.minutes < 60 && t.seconds < 60
}

/// Strips everything but digits and the decimal point from user-facing
/// number strings.
pub fn sanitize_number(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_realistic_issuance() {
        assert!(validate_balance("0"));
        assert!(validate_balance("500000000000000000000000000"));
    }

    #[test]
    fn enforces_the_upper_bound() {
        let just_below = "9".repeat(50);
        let at_limit = format!("1{}", "0".repeat(50));
        assert!(validate_balance(&just_below));
        assert!(!validate_balance(&at_limit));
    }

    #[test]
    fn rejects_non_digit_strings() {
        assert!(!validate_balance(""));
        assert!(!validate_balance("-1"));
        assert!(!validate_balance("12.5"));
        assert!(!validate_balance("1e27"));
        assert!(!validate_balance("100 DPR"));
    }

    #[test]
    fn block_numbers_must_be_non_negative() {
        assert!(validate_block_number(0));
        assert!(validate_block_number(17_280));
        assert!(!validate_block_number(-1));
    }

    #[test]
    fn time_left_ranges() {
        let ok = TimeLeft {
            days: 400,
            hours: 23,
            minutes: 59,
            seconds: 59,
        };
        assert!(validate_time_left(&ok));
        assert!(!validate_time_left(&TimeLeft { hours: 24, ..ok }));
        assert!(!validate_time_left(&TimeLeft { minutes: 60, ..ok }));
        assert!(!validate_time_left(&TimeLeft { seconds: 60, ..ok }));
    }

    #[test]
    fn sanitize_keeps_digits_and_point() {
        assert_eq!(sanitize_number("1,234.56 DPR"), "1234.56");
        assert_eq!(sanitize_number("abc"), "");
        assert_eq!(sanitize_number("12 800"), "12800");
    }
}
