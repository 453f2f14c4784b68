//! Exit-pass payload and textual codec
//!
//! The exit pass is a signed token proving a transaction was finalized.
//! Its textual form is compact JSON with a fixed field order:
//!
//! ```json
//! {"v":1,"tx":123,"uid":45,"amt":19.98,"ts":1735689600,
//!  "nonce":"a1b2c3d4e5f60708","sig":"<hex hmac-sha256>",
//!  "sig_fields":"v|tx|uid|amt|ts|nonce"}
//! ```
//!
//! The payload carries its own signed-field list (`sig_fields`) so a
//! verifier does not need to guess which fields the MAC covers. Signing
//! itself lives in the server (it needs the secret); this module only
//! defines the canonical shape and the signing base string.

use serde::{Deserialize, Serialize};

/// Current payload format version
pub const PAYLOAD_VERSION: u32 = 1;

/// Fields covered by the signature, in signing order
pub const SIGNED_FIELDS: &str = "v|tx|uid|amt|ts|nonce";

/// The signed exit-pass message. Field order matches the wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitPassPayload {
    /// Format version
    pub v: u32,
    /// Transaction ID
    pub tx: i64,
    /// Owning user ID
    pub uid: i64,
    /// Transaction total (2-decimal monetary value)
    pub amt: f64,
    /// Issuance timestamp (unix seconds)
    pub ts: i64,
    /// Per-issuance random value (hex)
    pub nonce: String,
    /// HMAC-SHA256 over the signing base (hex)
    pub sig: String,
    /// Self-describing list of signed field names
    pub sig_fields: String,
}

impl ExitPassPayload {
    /// The string the MAC is computed over: signed fields joined by `|`,
    /// in the order named by [`SIGNED_FIELDS`].
    pub fn signing_base(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}",
            self.v, self.tx, self.uid, self.amt, self.ts, self.nonce
        )
    }

    /// Serialize to the compact textual wire form.
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse the textual wire form back into a payload.
    ///
    /// Fails on anything that is not a complete payload; callers that want
    /// to accept legacy unsigned shapes should fall back to a generic JSON
    /// parse themselves.
    pub fn decode(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ExitPassPayload {
        ExitPassPayload {
            v: PAYLOAD_VERSION,
            tx: 7_205_759_403_792,
            uid: 42,
            amt: 19.98,
            ts: 1_735_689_600,
            nonce: "a1b2c3d4e5f60708".to_string(),
            sig: "00".repeat(32),
            sig_fields: SIGNED_FIELDS.to_string(),
        }
    }

    #[test]
    fn signing_base_joins_fields_in_wire_order() {
        let p = sample();
        assert_eq!(
            p.signing_base(),
            format!("1|{}|42|19.98|1735689600|a1b2c3d4e5f60708", p.tx)
        );
    }

    #[test]
    fn encode_is_compact_and_ordered() {
        let text = sample().encode().unwrap();
        assert!(text.starts_with(r#"{"v":1,"tx":"#));
        assert!(!text.contains(' '));
        let sig_pos = text.find(r#""sig""#).unwrap();
        let fields_pos = text.find(r#""sig_fields""#).unwrap();
        assert!(sig_pos < fields_pos);
    }

    #[test]
    fn encode_decode_round_trips_losslessly() {
        let p = sample();
        let decoded = ExitPassPayload::decode(&p.encode().unwrap()).unwrap();
        assert_eq!(decoded, p);
    }

    #[test]
    fn decode_rejects_incomplete_payloads() {
        assert!(ExitPassPayload::decode(r#"{"transaction_id":5}"#).is_err());
        assert!(ExitPassPayload::decode("not json").is_err());
    }
}
