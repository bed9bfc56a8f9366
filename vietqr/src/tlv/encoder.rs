//! EMVCo TLV Encoder
//!
//! Formats text TLV units for QR payloads.

use super::parser::is_two_digits;
use super::TLVError;

/// Largest value the 2-digit length field can describe
pub const MAX_VALUE_LENGTH: usize = 99;

/// TLV Encoder for building EMVCo text units
pub struct TLVEncoder;

impl TLVEncoder {
    /// Encode a tag-value pair as `tag ++ LL ++ value`
    pub fn encode(tag: &str, value: &str) -> Result<String, TLVError> {
        let tag = Self::encode_tag(tag)?;
        let length = value.chars().count();
        let length_field = Self::encode_length(length).ok_or_else(|| TLVError::ValueTooLong {
            tag: tag.to_string(),
            length,
        })?;

        let mut result = String::with_capacity(4 + value.len());
        result.push_str(tag);
        result.push_str(&length_field);
        result.push_str(value);
        Ok(result)
    }

    /// Check that a tag is two decimal digits
    pub fn encode_tag(tag: &str) -> Result<&str, TLVError> {
        if is_two_digits(tag) {
            Ok(tag)
        } else {
            Err(TLVError::InvalidTag(tag.to_string()))
        }
    }

    /// Encode a length as two zero-padded decimal digits
    ///
    /// Returns `None` past [`MAX_VALUE_LENGTH`].
    pub fn encode_length(length: usize) -> Option<String> {
        if length > MAX_VALUE_LENGTH {
            None
        } else {
            Some(format!("{:02}", length))
        }
    }
}

/// Builder for constructing TLV sequences
///
/// The first failing step is remembered and returned from [`TLVBuilder::build`].
pub struct TLVBuilder {
    data: String,
    error: Option<TLVError>,
}

impl TLVBuilder {
    /// Create a new TLV builder
    pub fn new() -> Self {
        Self {
            data: String::new(),
            error: None,
        }
    }

    /// Add a primitive TLV
    pub fn add(mut self, tag: &str, value: &str) -> Self {
        if self.error.is_none() {
            match TLVEncoder::encode(tag, value) {
                Ok(unit) => self.data.push_str(&unit),
                Err(e) => self.error = Some(e),
            }
        }
        self
    }

    /// Add an optional TLV, skipped when `value` is `None`
    pub fn add_opt(self, tag: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.add(tag, value),
            None => self,
        }
    }

    /// Add raw text (pre-encoded TLV)
    pub fn add_raw(mut self, data: &str) -> Self {
        if self.error.is_none() {
            self.data.push_str(data);
        }
        self
    }

    /// Wrap current content in a template tag
    pub fn wrap(self, tag: &str) -> Self {
        if self.error.is_some() {
            return self;
        }
        Self::new().add(tag, &self.data)
    }

    /// Build the final string
    pub fn build(self) -> Result<String, TLVError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.data),
        }
    }
}

impl Default for TLVBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tlv::{ParseMode, TLVParser};

    #[test]
    fn test_encode_simple() {
        assert_eq!(TLVEncoder::encode("00", "01").unwrap(), "000201");
        assert_eq!(TLVEncoder::encode("58", "VN").unwrap(), "5802VN");
    }

    #[test]
    fn test_encode_empty_value() {
        assert_eq!(TLVEncoder::encode("08", "").unwrap(), "0800");
    }

    #[test]
    fn test_encode_length() {
        assert_eq!(TLVEncoder::encode_length(0).as_deref(), Some("00"));
        assert_eq!(TLVEncoder::encode_length(7).as_deref(), Some("07"));
        assert_eq!(TLVEncoder::encode_length(99).as_deref(), Some("99"));
        assert_eq!(TLVEncoder::encode_length(100), None);
    }

    #[test]
    fn test_encode_max_length() {
        let value = "9".repeat(99);
        let encoded = TLVEncoder::encode("01", &value).unwrap();
        assert_eq!(&encoded[..4], "0199");
        assert_eq!(encoded.len(), 103);
    }

    #[test]
    fn test_encode_overflow() {
        let value = "A".repeat(100);
        assert_eq!(
            TLVEncoder::encode("01", &value),
            Err(TLVError::ValueTooLong {
                tag: "01".to_string(),
                length: 100,
            })
        );
    }

    #[test]
    fn test_encode_invalid_tag() {
        assert!(matches!(TLVEncoder::encode("1", "x"), Err(TLVError::InvalidTag(_))));
        assert!(matches!(TLVEncoder::encode("A1", "x"), Err(TLVError::InvalidTag(_))));
        assert!(matches!(TLVEncoder::encode("123", "x"), Err(TLVError::InvalidTag(_))));
    }

    #[test]
    fn test_encode_counts_characters() {
        assert_eq!(TLVEncoder::encode("08", "Tiền").unwrap(), "0804Tiền");
    }

    #[test]
    fn test_format_parse_inverse() {
        for (tag, value) in [("00", ""), ("08", "CHUYEN TIEN"), ("99", "x"), ("54", "50000")] {
            let encoded = TLVEncoder::encode(tag, value).unwrap();
            let map = TLVParser::parse(&encoded).unwrap();
            assert_eq!(map.len(), 1);
            assert_eq!(map.get(tag), Some(value));
        }
    }

    #[test]
    fn test_builder() {
        let data = TLVBuilder::new()
            .add("00", "970418")
            .add("01", "PHAMDUYTRUNG")
            .wrap("01")
            .build()
            .unwrap();

        assert_eq!(data, "012600069704180112PHAMDUYTRUNG");
        let outer = TLVParser::parse(&data).unwrap();
        let inner = outer.nested("01", ParseMode::Strict).unwrap().unwrap();
        assert_eq!(inner.get("00"), Some("970418"));
        assert_eq!(inner.get("01"), Some("PHAMDUYTRUNG"));
    }

    #[test]
    fn test_builder_optional() {
        let with = TLVBuilder::new().add_opt("54", Some("50000")).build().unwrap();
        let without = TLVBuilder::new().add_opt("54", None).build().unwrap();
        assert_eq!(with, "540550000");
        assert!(without.is_empty());
    }

    #[test]
    fn test_builder_error_sticks() {
        let result = TLVBuilder::new()
            .add("00", "01")
            .add("01", &"X".repeat(120))
            .add("58", "VN")
            .build();
        assert!(matches!(result, Err(TLVError::ValueTooLong { length: 120, .. })));
    }

    #[test]
    fn test_wrap_overflow() {
        let result = TLVBuilder::new()
            .add("00", &"1".repeat(60))
            .add("01", &"2".repeat(60))
            .wrap("38")
            .build();
        assert!(matches!(result, Err(TLVError::ValueTooLong { length: 128, .. })));
    }

    #[test]
    fn test_builder_raw() {
        let inner = TLVEncoder::encode("08", "NOTE").unwrap();
        let data = TLVBuilder::new().add_raw(&inner).wrap("62").build().unwrap();
        assert_eq!(data, "62080804NOTE");
    }
}
