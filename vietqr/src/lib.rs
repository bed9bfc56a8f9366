//! VietQR payload encoder and decoder
//!
//! Builds and parses the text carried inside NAPAS VietQR transfer codes:
//! an EMVCo TLV sequence with the beneficiary bank and account nested in
//! tag 38, a transfer purpose nested in tag 62, and a CRC16-CCITT checksum
//! as the final unit.
//!
//! Rendering the QR symbol and scanning it back are left to other tools;
//! this crate only turns fields into a payload string and back.
//!
//! # Example
//! ```
//! use vietqr::{decode, encode};
//!
//! let payload = encode("PHAMDUYTRUNG", "970418", "CHUYEN TIEN", None).unwrap();
//! assert!(payload.ends_with("63042253"));
//!
//! let fields = decode(&payload).unwrap();
//! assert_eq!(fields.bank_bin, "970418");
//! assert_eq!(fields.note, "CHUYEN TIEN");
//! ```

pub mod crc;
pub mod payload;
pub mod session;
pub mod tlv;

pub use payload::{
    decode, decode_with, encode, DecodeOptions, DecodedPayload, InitiationMethod, PayloadError,
    TransferRequest, ValidationError,
};
pub use tlv::{ParseMode, TLVError};
