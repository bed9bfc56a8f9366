//! CRC16 checksum for QR payloads
//!
//! CRC-16/CCITT-FALSE: polynomial 0x1021, initial value 0xFFFF, no reflection,
//! no final XOR. The payload checksum covers everything up to and including
//! the `6304` header of the CRC field itself.

/// Tag and length of the CRC field, the last header of every payload
pub const CRC_HEADER: &str = "6304";

/// Number of hex digits in the CRC value
pub const CRC_DIGITS: usize = 4;

/// Compute CRC-16/CCITT-FALSE over raw bytes
pub fn crc16_ccitt_false(bytes: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for &b in bytes {
        crc ^= (b as u16) << 8;
        for _ in 0..8 {
            if (crc & 0x8000) != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

/// Checksum of the UTF-8 encoding of `data` as 4 uppercase hex digits
pub fn checksum(data: &str) -> String {
    hex::encode_upper(crc16_ccitt_false(data.as_bytes()).to_be_bytes())
}

/// Split a payload into the checksummed prefix and its trailing CRC value
///
/// The prefix ends with [`CRC_HEADER`]. Returns `None` when the payload does
/// not end in `6304` followed by four hex digits.
pub fn split_checksum(payload: &str) -> Option<(&str, &str)> {
    let split = payload.len().checked_sub(CRC_DIGITS)?;
    if !payload.is_char_boundary(split) {
        return None;
    }
    let (prefix, value) = payload.split_at(split);
    if !prefix.ends_with(CRC_HEADER) || hex::decode(value).is_err() {
        return None;
    }
    Some((prefix, value))
}

/// Check a complete payload against its embedded CRC
///
/// Hex digits are compared case-insensitively.
pub fn verify(payload: &str) -> bool {
    match split_checksum(payload) {
        Some((prefix, value)) => checksum(prefix).eq_ignore_ascii_case(value),
        None => false,
    }
}
