//! Payload encoder
//!
//! Emits the units in a fixed order: 00, 01, 38, 52, 53, [54], 58, 62, 63.

use log::debug;

use super::validation::{normalize_amount, validate_account_id, validate_bank_bin};
use super::{napas, InitiationMethod, PayloadError};
use crate::crc;
use crate::tlv::{tags, TLVBuilder};

/// Fields needed to build a transfer payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferRequest {
    /// Account number or alias of the beneficiary
    pub account_id: String,
    /// 6-digit bank identification number, e.g. `970418`
    pub bank_bin: String,
    /// Free-text transfer purpose
    pub note: String,
    /// Decimal digit amount in VND, `None` for a static code
    pub amount: Option<String>,
}

impl TransferRequest {
    /// Create a request with no note and no amount
    pub fn new(account_id: impl Into<String>, bank_bin: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            bank_bin: bank_bin.into(),
            note: String::new(),
            amount: None,
        }
    }

    /// Set the transfer purpose
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Set the amount
    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    /// Build the payload string
    pub fn encode(&self) -> Result<String, PayloadError> {
        encode(
            &self.account_id,
            &self.bank_bin,
            &self.note,
            self.amount.as_deref(),
        )
    }
}

/// Build a VietQR transfer payload
///
/// Fields are validated before any unit is built. The result always ends in
/// `6304` and four uppercase hex digits.
pub fn encode(
    account_id: &str,
    bank_bin: &str,
    note: &str,
    amount: Option<&str>,
) -> Result<String, PayloadError> {
    validate_bank_bin(bank_bin)?;
    validate_account_id(account_id)?;
    let amount = normalize_amount(amount)?;

    let initiation = if amount.is_some() {
        InitiationMethod::Dynamic
    } else {
        InitiationMethod::Static
    };

    let beneficiary = TLVBuilder::new()
        .add(tags::ACQUIRER_ID, bank_bin)
        .add(tags::MERCHANT_ID, account_id)
        .wrap(tags::BENEFICIARY_ORGANIZATION)
        .build()
        .map_err(PayloadError::Encoding)?;

    let merchant_account = TLVBuilder::new()
        .add(tags::GUID, napas::GUID)
        .add_raw(&beneficiary)
        .add(tags::SERVICE_CODE, napas::SERVICE_CODE)
        .wrap(tags::MERCHANT_ACCOUNT_INFO)
        .build()
        .map_err(PayloadError::Encoding)?;

    let additional_data = TLVBuilder::new()
        .add(tags::PURPOSE_OF_TRANSACTION, note)
        .wrap(tags::ADDITIONAL_DATA)
        .build()
        .map_err(PayloadError::Encoding)?;

    let mut payload = TLVBuilder::new()
        .add(tags::PAYLOAD_FORMAT_INDICATOR, napas::PAYLOAD_FORMAT_INDICATOR)
        .add(tags::POINT_OF_INITIATION, initiation.code())
        .add_raw(&merchant_account)
        .add(tags::MERCHANT_CATEGORY_CODE, napas::MERCHANT_CATEGORY_CODE)
        .add(tags::TRANSACTION_CURRENCY, napas::CURRENCY_VND)
        .add_opt(tags::TRANSACTION_AMOUNT, amount)
        .add(tags::COUNTRY_CODE, napas::COUNTRY_CODE)
        .add_raw(&additional_data)
        .build()
        .map_err(PayloadError::Encoding)?;

    payload.push_str(crc::CRC_HEADER);
    let checksum = crc::checksum(&payload);
    payload.push_str(&checksum);

    debug!(
        "Encoded {:?} payload for BIN {} ({} characters, CRC {})",
        initiation,
        bank_bin,
        payload.chars().count(),
        checksum
    );
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::ValidationError;
    use crate::tlv::{ParseMode, TLVError, TLVParser};

    const STATIC_SAMPLE: &str = "00020101021138560010A000000727012600069704180112PHAMDUYTRUNG\
0208QRIBFTTA5204000053037045802VN62150811CHUYEN TIEN63042253";

    const DYNAMIC_SAMPLE: &str = "00020101021238560010A000000727012600069704180112PHAMDUYTRUNG\
0208QRIBFTTA5204000053037045405500005802VN62320828CHUYEN TIEN NHO RUT TIEN MAT63046276";

    #[test]
    fn test_encode_static() {
        let payload = encode("PHAMDUYTRUNG", "970418", "CHUYEN TIEN", None).unwrap();
        assert_eq!(payload, STATIC_SAMPLE);
    }

    #[test]
    fn test_encode_dynamic() {
        let payload = encode(
            "PHAMDUYTRUNG",
            "970418",
            "CHUYEN TIEN NHO RUT TIEN MAT",
            Some("50000"),
        )
        .unwrap();
        assert_eq!(payload, DYNAMIC_SAMPLE);
    }

    #[test]
    fn test_request_builder_matches_function() {
        let payload = TransferRequest::new("PHAMDUYTRUNG", "970418")
            .with_note("CHUYEN TIEN")
            .encode()
            .unwrap();
        assert_eq!(payload, STATIC_SAMPLE);
    }

    #[test]
    fn test_amount_toggles_initiation() {
        let dynamic = encode("PHAMDUYTRUNG", "970418", "", Some("50000")).unwrap();
        let map = TLVParser::parse(&dynamic).unwrap();
        assert_eq!(map.get(tags::POINT_OF_INITIATION), Some("12"));
        assert_eq!(map.get(tags::TRANSACTION_AMOUNT), Some("50000"));

        let static_ = encode("PHAMDUYTRUNG", "970418", "", Some("")).unwrap();
        let map = TLVParser::parse(&static_).unwrap();
        assert_eq!(map.get(tags::POINT_OF_INITIATION), Some("11"));
        assert!(!map.contains(tags::TRANSACTION_AMOUNT));
    }

    #[test]
    fn test_zero_amount_is_static() {
        let payload = encode("PHAMDUYTRUNG", "970418", "", Some("0")).unwrap();
        assert_eq!(payload, encode("PHAMDUYTRUNG", "970418", "", None).unwrap());
    }

    #[test]
    fn test_tag_order() {
        let payload = encode("0011001932418", "970436", "", Some("1000")).unwrap();
        let order: Vec<String> = crate::tlv::read_list(&payload, ParseMode::Strict)
            .unwrap()
            .into_iter()
            .map(|t| t.tag)
            .collect();
        assert_eq!(order, ["00", "01", "38", "52", "53", "54", "58", "62", "63"]);
    }

    #[test]
    fn test_nested_merchant_account() {
        let payload = encode("0011001932418", "970436", "", None).unwrap();
        let map = TLVParser::parse(&payload).unwrap();
        let merchant = map.nested(tags::MERCHANT_ACCOUNT_INFO, ParseMode::Strict).unwrap().unwrap();
        assert_eq!(merchant.get(tags::GUID), Some("A000000727"));
        assert_eq!(merchant.get(tags::SERVICE_CODE), Some("QRIBFTTA"));
        let beneficiary = merchant
            .nested(tags::BENEFICIARY_ORGANIZATION, ParseMode::Strict)
            .unwrap()
            .unwrap();
        assert_eq!(beneficiary.get(tags::ACQUIRER_ID), Some("970436"));
        assert_eq!(beneficiary.get(tags::MERCHANT_ID), Some("0011001932418"));
        // Empty note still produces the additional data template
        assert_eq!(map.get(tags::ADDITIONAL_DATA), Some("0800"));
    }

    #[test]
    fn test_checksum_trailer() {
        let payload = encode("PHAMDUYTRUNG", "970418", "CHUYEN TIEN", None).unwrap();
        let (prefix, value) = payload.split_at(payload.len() - 4);
        assert!(prefix.ends_with("6304"));
        assert_eq!(crc::checksum(prefix), value);
        assert!(value.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    #[test]
    fn test_invalid_bank_bin() {
        assert_eq!(
            encode("PHAMDUYTRUNG", "BIDV", "", None),
            Err(PayloadError::Validation(ValidationError::InvalidBankBin(
                "BIDV".to_string()
            )))
        );
    }

    #[test]
    fn test_alias_with_punctuation() {
        let payload = encode("NGUYEN.VAN-A", "970418", "", None).unwrap();
        let decoded = crate::payload::decode(&payload).unwrap();
        assert_eq!(decoded.account, "NGUYEN.VAN-A");

        assert!(matches!(
            encode("NGUYEN VAN A", "970418", "", None),
            Err(PayloadError::Validation(ValidationError::InvalidAccount(_)))
        ));
    }

    #[test]
    fn test_invalid_amount() {
        assert!(matches!(
            encode("PHAMDUYTRUNG", "970418", "", Some("50.000")),
            Err(PayloadError::Validation(ValidationError::InvalidAmount(_)))
        ));
    }

    #[test]
    fn test_note_too_long() {
        let note = "N".repeat(100);
        assert!(matches!(
            encode("PHAMDUYTRUNG", "970418", &note, None),
            Err(PayloadError::Encoding(TLVError::ValueTooLong { length: 100, .. }))
        ));
    }

    #[test]
    fn test_note_overflows_template() {
        // 96 characters fit tag 08 but not the enclosing tag 62
        let note = "N".repeat(96);
        assert!(matches!(
            encode("PHAMDUYTRUNG", "970418", &note, None),
            Err(PayloadError::Encoding(TLVError::ValueTooLong { length: 100, .. }))
        ));
    }

    #[test]
    fn test_account_too_long() {
        let account = "9".repeat(100);
        assert!(matches!(
            encode(&account, "970418", "", None),
            Err(PayloadError::Encoding(TLVError::ValueTooLong { .. }))
        ));
    }
}
