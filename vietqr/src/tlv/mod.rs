//! TLV (Tag-Length-Value) encoding and decoding
//!
//! This module implements the text TLV format of EMVCo merchant-presented
//! QR codes. Every unit is a 2-digit tag, a 2-digit decimal length and the
//! value itself, so a value can hold at most 99 characters.
//!
//! # Example
//! ```
//! use vietqr::tlv::{TLVEncoder, TLVParser, tags};
//!
//! let unit = TLVEncoder::encode(tags::COUNTRY_CODE, "VN").unwrap();
//! assert_eq!(unit, "5802VN");
//!
//! let map = TLVParser::parse(&unit).unwrap();
//! assert_eq!(map.get(tags::COUNTRY_CODE), Some("VN"));
//! ```

mod encoder;
mod parser;

pub use encoder::{TLVBuilder, TLVEncoder, MAX_VALUE_LENGTH};
pub use parser::{ParseMode, TLVError, TLVParser, TagMap, TLV};

/// Parse TLV text into a list of units, duplicates included
pub fn read_list(data: &str, mode: ParseMode) -> Result<Vec<TLV>, TLVError> {
    parser::read_list(data, mode)
}

/// Parse a single TLV from text
///
/// Returns the unit and the unparsed remainder.
pub fn read_single(data: &str) -> Result<(TLV, &str), TLVError> {
    parser::read_single(data)
}

/// Split `s` after `n` characters, `None` if it is shorter
pub(crate) fn take_chars(s: &str, n: usize) -> Option<(&str, &str)> {
    s.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(s.len()))
        .nth(n)
        .map(|idx| s.split_at(idx))
}

/// VietQR tag constants
pub mod tags {
    // Root level
    pub const PAYLOAD_FORMAT_INDICATOR: &str = "00";
    pub const POINT_OF_INITIATION: &str = "01";
    pub const MERCHANT_ACCOUNT_INFO: &str = "38";
    pub const MERCHANT_CATEGORY_CODE: &str = "52";
    pub const TRANSACTION_CURRENCY: &str = "53";
    pub const TRANSACTION_AMOUNT: &str = "54";
    pub const COUNTRY_CODE: &str = "58";
    pub const ADDITIONAL_DATA: &str = "62";
    pub const CRC: &str = "63";

    // Within merchant account information (38)
    pub const GUID: &str = "00";
    pub const BENEFICIARY_ORGANIZATION: &str = "01";
    pub const SERVICE_CODE: &str = "02";

    // Within beneficiary organization (38 / 01)
    pub const ACQUIRER_ID: &str = "00";
    pub const MERCHANT_ID: &str = "01";

    // Within additional data (62)
    pub const PURPOSE_OF_TRANSACTION: &str = "08";
}
