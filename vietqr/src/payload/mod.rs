//! VietQR payload handling
//!
//! Builds and reads the NAPAS VietQR transfer payload: a fixed sequence of
//! EMVCo TLV units, with the beneficiary bank and account nested two levels
//! deep in tag 38, and a CRC16 as the final unit.
//!
//! # Example
//! ```
//! use vietqr::payload::{decode, TransferRequest};
//!
//! let payload = TransferRequest::new("PHAMDUYTRUNG", "970418")
//!     .with_note("CHUYEN TIEN")
//!     .with_amount("50000")
//!     .encode()
//!     .unwrap();
//!
//! let fields = decode(&payload).unwrap();
//! assert_eq!(fields.account, "PHAMDUYTRUNG");
//! assert_eq!(fields.amount, "50000");
//! ```

mod decoder;
mod encoder;
mod validation;

pub use decoder::{decode, decode_with, DecodeOptions, DecodedPayload};
pub use encoder::{encode, TransferRequest};
pub use validation::{
    normalize_amount, validate_account_id, validate_bank_bin, ValidationError, BANK_BIN_LENGTH,
    MAX_AMOUNT_LENGTH,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tlv::TLVError;

/// Errors returned by payload encoding and decoding
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Field cannot be encoded: {0}")]
    Encoding(#[source] TLVError),

    #[error("Malformed payload: {0}")]
    Malformed(#[source] TLVError),

    #[error("Checksum mismatch: payload carries {found}, computed {expected}")]
    ChecksumMismatch { expected: String, found: String },

    #[error("Payload does not end with a CRC field")]
    MissingChecksum,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Point of Initiation Method (tag 01)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitiationMethod {
    /// Reusable code without an amount (11)
    Static,
    /// Single-use code bound to an amount (12)
    Dynamic,
}

impl InitiationMethod {
    /// Value written to tag 01
    pub fn code(self) -> &'static str {
        match self {
            Self::Static => "11",
            Self::Dynamic => "12",
        }
    }

    /// Try to convert from the tag 01 value
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "11" => Some(Self::Static),
            "12" => Some(Self::Dynamic),
            _ => None,
        }
    }
}

/// Fixed values of the NAPAS transfer scheme
pub mod napas {
    pub const PAYLOAD_FORMAT_INDICATOR: &str = "01";
    /// Application identifier of the NAPAS VietQR transfer scheme
    pub const GUID: &str = "A000000727";
    /// Fast transfer to account
    pub const SERVICE_CODE: &str = "QRIBFTTA";
    pub const MERCHANT_CATEGORY_CODE: &str = "0000";
    /// ISO 4217 numeric code for VND
    pub const CURRENCY_VND: &str = "704";
    pub const COUNTRY_CODE: &str = "VN";
}
