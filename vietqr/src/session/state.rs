//! Session state data structures
//!
//! Last-submitted form values, kept between encode invocations.

use serde::{Deserialize, Serialize};

use crate::payload::TransferRequest;

/// Values entered in the most recent encode request
///
/// `account_name` and `store_name` are only shown by the image renderer
/// and never enter the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub account_name: String,
    pub account_id: String,
    pub bank_bin: String,
    pub amount: String,
    pub note: String,
    pub store_name: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            account_name: "Pham Duy Long".to_string(),
            account_id: "PHAMDUYTRUNG".to_string(),
            // BIDV
            bank_bin: "970418".to_string(),
            amount: "50000".to_string(),
            note: "CHUYEN TIEN NHO RUT TIEN MAT".to_string(),
            store_name: "Cửa hàng Duy Long".to_string(),
        }
    }
}

impl SessionState {
    /// Build an encode request from the stored values
    pub fn to_request(&self) -> TransferRequest {
        TransferRequest {
            account_id: self.account_id.clone(),
            bank_bin: self.bank_bin.clone(),
            note: self.note.clone(),
            amount: if self.amount.is_empty() {
                None
            } else {
                Some(self.amount.clone())
            },
        }
    }

    /// Record the payload fields of a submitted request
    pub fn remember(&mut self, request: &TransferRequest) {
        self.account_id = request.account_id.clone();
        self.bank_bin = request.bank_bin.clone();
        self.note = request.note.clone();
        self.amount = request.amount.clone().unwrap_or_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request() {
        let request = SessionState::default().to_request();
        assert_eq!(request.account_id, "PHAMDUYTRUNG");
        assert_eq!(request.bank_bin, "970418");
        assert_eq!(request.amount.as_deref(), Some("50000"));
        assert!(request.encode().is_ok());
    }

    #[test]
    fn test_empty_amount_is_none() {
        let state = SessionState {
            amount: String::new(),
            ..Default::default()
        };
        assert_eq!(state.to_request().amount, None);
    }

    #[test]
    fn test_remember() {
        let mut state = SessionState::default();
        let request = TransferRequest::new("0011001932418", "970436").with_note("HOC PHI");
        state.remember(&request);
        assert_eq!(state.account_id, "0011001932418");
        assert_eq!(state.bank_bin, "970436");
        assert_eq!(state.note, "HOC PHI");
        assert_eq!(state.amount, "");
        // Display-only fields are untouched
        assert_eq!(state.account_name, "Pham Duy Long");
        assert_eq!(state.to_request(), request);
    }

    #[test]
    fn test_serialization() {
        let state = SessionState::default();
        let json = serde_json::to_string(&state).unwrap();
        let parsed: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let parsed: SessionState = serde_json::from_str(r#"{"bank_bin": "970436"}"#).unwrap();
        assert_eq!(parsed.bank_bin, "970436");
        assert_eq!(parsed.account_id, "PHAMDUYTRUNG");
    }
}
