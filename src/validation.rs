//! Input validation for the redemption endpoints
//!
//! These rules run before anything touches the ledger or the gateway.
//! Amounts are validated as integers in the smallest token denomination;
//! floating point never enters the pipeline.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ADDRESS_REGEX: Regex = Regex::new(r"^0x[a-fA-F0-9]{40}$").unwrap();
    // Indonesian bank accounts are typically 10-16 digits
    static ref BANK_ACCOUNT_REGEX: Regex = Regex::new(r"^\d{10,16}$").unwrap();
    // Indonesian bank codes are 3 digits
    static ref BANK_CODE_REGEX: Regex = Regex::new(r"^\d{3}$").unwrap();
}

pub fn is_valid_address(address: &str) -> bool {
    ADDRESS_REGEX.is_match(address)
}

pub fn is_valid_bank_account(account_number: &str) -> bool {
    BANK_ACCOUNT_REGEX.is_match(account_number)
}

pub fn is_valid_bank_code(code: &str) -> bool {
    BANK_CODE_REGEX.is_match(code)
}

/// Validate an amount string: a positive integer, optionally capped.
pub fn is_valid_amount(amount: &str, max: Option<u128>) -> bool {
    match amount.parse::<u128>() {
        Ok(value) if value > 0 => max.map_or(true, |cap| value <= cap),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_validation() {
        assert!(is_valid_address(
            "0x1111111111111111111111111111111111111111"
        ));
        assert!(is_valid_address(
            "0xAbCdEf1234567890aBcDeF1234567890abcdef12"
        ));
        assert!(!is_valid_address("0x123"));
        assert!(!is_valid_address(
            "1111111111111111111111111111111111111111"
        ));
        assert!(!is_valid_address(
            "0xzzzz111111111111111111111111111111111111"
        ));
    }

    #[test]
    fn test_bank_account_validation() {
        assert!(is_valid_bank_account("1234567890"));
        assert!(is_valid_bank_account("1234567890123456"));
        assert!(!is_valid_bank_account("123456789")); // too short
        assert!(!is_valid_bank_account("12345678901234567")); // too long
        assert!(!is_valid_bank_account("12345abcde"));
    }

    #[test]
    fn test_bank_code_validation() {
        assert!(is_valid_bank_code("014"));
        assert!(!is_valid_bank_code("14"));
        assert!(!is_valid_bank_code("0141"));
        assert!(!is_valid_bank_code("a14"));
    }

    #[test]
    fn test_amount_validation() {
        assert!(is_valid_amount("100000", None));
        assert!(is_valid_amount("250000000", Some(250_000_000)));
        assert!(!is_valid_amount("250000001", Some(250_000_000)));
        assert!(!is_valid_amount("0", None));
        assert!(!is_valid_amount("-5", None));
        assert!(!is_valid_amount("1.5", None));
        assert!(!is_valid_amount("abc", None));
        // Larger than u64 but still a valid token amount
        assert!(is_valid_amount("100000000000000000000", None));
    }
}
