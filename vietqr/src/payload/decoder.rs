//! Payload decoder
//!
//! Input is treated as untrusted text from a QR scanner. Tags the decoder
//! does not use are parsed for structure and otherwise ignored.

use log::{debug, warn};
use serde::Serialize;

use super::{InitiationMethod, PayloadError};
use crate::crc;
use crate::tlv::{self, tags, ParseMode, TagMap, TLV};

/// Controls how strictly a payload is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Parse mode used at every nesting level
    pub mode: ParseMode,
    /// Recompute the CRC and compare it with the embedded value
    pub verify_checksum: bool,
}

impl DecodeOptions {
    /// Reject trailing characters and bad or missing checksums
    pub fn strict() -> Self {
        Self {
            mode: ParseMode::Strict,
            verify_checksum: true,
        }
    }

    /// Drop trailing characters and skip checksum verification
    pub fn lenient() -> Self {
        Self {
            mode: ParseMode::Lenient,
            verify_checksum: false,
        }
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::strict()
    }
}

/// Fields extracted from a payload
///
/// Absent fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecodedPayload {
    /// Account number or alias (38 / 01 / 01)
    pub account: String,
    /// Bank identification number (38 / 01 / 00)
    pub bank_bin: String,
    /// Transfer purpose (62 / 08)
    pub note: String,
    /// Amount as written in tag 54
    pub amount: String,
    /// Static or dynamic, when tag 01 holds a known code
    pub initiation_method: Option<InitiationMethod>,
    /// Embedded CRC value (tag 63)
    pub checksum: Option<String>,
}

/// Decode with [`DecodeOptions::strict`]
pub fn decode(payload: &str) -> Result<DecodedPayload, PayloadError> {
    decode_with(payload, &DecodeOptions::default())
}

/// Decode a payload into its fields
pub fn decode_with(payload: &str, options: &DecodeOptions) -> Result<DecodedPayload, PayloadError> {
    let units = tlv::read_list(payload, options.mode).map_err(PayloadError::Malformed)?;

    if options.verify_checksum {
        verify_checksum(payload, &units)?;
    }
    let fields: TagMap = units.into_iter().collect();

    let mut decoded = DecodedPayload {
        initiation_method: fields
            .get(tags::POINT_OF_INITIATION)
            .and_then(InitiationMethod::from_code),
        checksum: fields.get(tags::CRC).map(str::to_string),
        ..Default::default()
    };

    if let Some(merchant) = nested(&fields, tags::MERCHANT_ACCOUNT_INFO, options.mode)? {
        if let Some(beneficiary) = nested(&merchant, tags::BENEFICIARY_ORGANIZATION, options.mode)? {
            decoded.bank_bin = value_of(&beneficiary, tags::ACQUIRER_ID);
            decoded.account = value_of(&beneficiary, tags::MERCHANT_ID);
        }
    }

    if let Some(additional) = nested(&fields, tags::ADDITIONAL_DATA, options.mode)? {
        decoded.note = value_of(&additional, tags::PURPOSE_OF_TRANSACTION);
    }

    decoded.amount = value_of(&fields, tags::TRANSACTION_AMOUNT);

    debug!(
        "Decoded payload: {} top-level tags, BIN {:?}, amount {:?}",
        fields.len(),
        decoded.bank_bin,
        decoded.amount
    );
    Ok(decoded)
}

fn nested(map: &TagMap, tag: &str, mode: ParseMode) -> Result<Option<TagMap>, PayloadError> {
    map.nested(tag, mode).map_err(PayloadError::Malformed)
}

fn value_of(map: &TagMap, tag: &str) -> String {
    map.get(tag).unwrap_or_default().to_string()
}

fn verify_checksum(payload: &str, units: &[TLV]) -> Result<(), PayloadError> {
    let (prefix, embedded) = crc::split_checksum(payload).ok_or(PayloadError::MissingChecksum)?;

    // The CRC unit has to be the last unit parsed and end exactly at the end of the payload
    let last = units.last().ok_or(PayloadError::MissingChecksum)?;
    let consumed: usize = units.iter().map(|u| 4 + u.value.len()).sum();
    if last.tag != tags::CRC || last.value != embedded || consumed != payload.len() {
        return Err(PayloadError::MissingChecksum);
    }

    let expected = crc::checksum(prefix);
    if !expected.eq_ignore_ascii_case(embedded) {
        warn!("CRC mismatch: payload carries {}, computed {}", embedded, expected);
        return Err(PayloadError::ChecksumMismatch {
            expected,
            found: embedded.to_string(),
        });
    }
    Ok(())
}
