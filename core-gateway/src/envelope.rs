//! Response envelope
//!
//! Both backends wrap every payload as `{ "code": …, "message": …, "data": … }`.

use core_runtime::config::PayloadPolicy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub code: i64,

    #[serde(default, alias = "msg")]
    pub message: Option<String>,

    #[serde(default)]
    pub data: Option<Value>,
}

impl Envelope {
    /// Parse a response body, `None` when it is not an envelope.
    pub fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }

    /// Server message unless it is missing or blank.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.message.as_deref() {
            Some(message) if !message.trim().is_empty() => message,
            _ => fallback,
        }
    }

    /// Value a successful call resolves to.
    pub fn into_payload(self, policy: PayloadPolicy) -> Value {
        match policy {
            PayloadPolicy::Data => self.data.unwrap_or(Value::Null),
            PayloadPolicy::DataOrEnvelope => match self.data {
                Some(data) => data,
                None => self.into_value(),
            },
            PayloadPolicy::Envelope => self.into_value(),
        }
    }

    fn into_value(self) -> Value {
        json!({
            "code": self.code,
            "message": self.message,
            "data": self.data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_envelope() {
        let envelope = Envelope::parse(br#"{"code":200,"message":"ok","data":{"orders":[]}}"#).unwrap();
        assert_eq!(envelope.code, 200);
        assert_eq!(envelope.message.as_deref(), Some("ok"));
        assert_eq!(envelope.data, Some(json!({"orders": []})));
    }

    #[test]
    fn test_parse_accepts_msg_alias_and_missing_fields() {
        let envelope = Envelope::parse(br#"{"code":0,"msg":"done"}"#).unwrap();
        assert_eq!(envelope.message.as_deref(), Some("done"));
        assert_eq!(envelope.data, None);

        let bare = Envelope::parse(br#"{"code":401}"#).unwrap();
        assert_eq!(bare.message_or("fallback"), "fallback");
    }

    #[test]
    fn test_parse_rejects_non_envelopes() {
        assert!(Envelope::parse(b"<html>Bad Gateway</html>").is_none());
        assert!(Envelope::parse(br#"{"message":"no code"}"#).is_none());
        assert!(Envelope::parse(b"").is_none());
    }

    #[test]
    fn test_blank_message_uses_fallback() {
        let envelope = Envelope::parse(br#"{"code":400,"message":"  "}"#).unwrap();
        assert_eq!(envelope.message_or("Invalid request parameters"), "Invalid request parameters");
    }

    #[test]
    fn test_payload_policies() {
        let with_data = || Envelope::parse(br#"{"code":200,"message":"ok","data":[1,2]}"#).unwrap();
        let without_data = || Envelope::parse(br#"{"code":200,"message":"deleted"}"#).unwrap();

        assert_eq!(with_data().into_payload(PayloadPolicy::Data), json!([1, 2]));
        assert_eq!(without_data().into_payload(PayloadPolicy::Data), Value::Null);

        assert_eq!(with_data().into_payload(PayloadPolicy::DataOrEnvelope), json!([1, 2]));
        assert_eq!(
            without_data().into_payload(PayloadPolicy::DataOrEnvelope),
            json!({"code": 200, "message": "deleted", "data": null})
        );

        assert_eq!(
            with_data().into_payload(PayloadPolicy::Envelope),
            json!({"code": 200, "message": "ok", "data": [1, 2]})
        );
    }
}
