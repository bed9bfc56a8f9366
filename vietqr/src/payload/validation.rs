//! Field checks applied before a payload is built

use thiserror::Error;

/// Number of digits in a NAPAS bank identification number
pub const BANK_BIN_LENGTH: usize = 6;

/// Longest amount accepted, in digits
pub const MAX_AMOUNT_LENGTH: usize = 13;

/// A field value outside its expected domain
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Bank BIN must be 6 decimal digits, got {0:?}")]
    InvalidBankBin(String),

    #[error("Account identifier must be non-empty printable ASCII without spaces, got {0:?}")]
    InvalidAccount(String),

    #[error("Amount must be at most 13 decimal digits, got {0:?}")]
    InvalidAmount(String),
}

/// Check a bank BIN such as `970418`
pub fn validate_bank_bin(bank_bin: &str) -> Result<(), ValidationError> {
    if bank_bin.len() == BANK_BIN_LENGTH && bank_bin.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidBankBin(bank_bin.to_string()))
    }
}

/// Check an account number or alias
///
/// Aliases may carry punctuation such as `NGUYEN.VAN-A`. Whitespace, control
/// characters and non-ASCII text are rejected.
pub fn validate_account_id(account_id: &str) -> Result<(), ValidationError> {
    if !account_id.is_empty() && account_id.bytes().all(|b| b.is_ascii_graphic()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidAccount(account_id.to_string()))
    }
}

/// Normalize an optional amount
///
/// Empty and all-zero amounts become `None`, which makes the payload static.
pub fn normalize_amount(amount: Option<&str>) -> Result<Option<&str>, ValidationError> {
    let amount = match amount {
        Some(a) if !a.is_empty() => a,
        _ => return Ok(None),
    };

    if amount.len() > MAX_AMOUNT_LENGTH || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidAmount(amount.to_string()));
    }

    if amount.bytes().all(|b| b == b'0') {
        Ok(None)
    } else {
        Ok(Some(amount))
    }
}
