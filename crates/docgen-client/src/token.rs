//! Best-effort inspection of bearer tokens.
//!
//! Tokens are opaque to the client. When one happens to be a JWT its `exp`
//! claim is read so the console can show when the session lapses; nothing
//! here verifies signatures.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};

/// Decoded JWT payload, if the token is a JWT.
pub fn claims(token: &str) -> Option<serde_json::Value> {
    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Expiry from the `exp` claim.
pub fn expiry(token: &str) -> Option<DateTime<Utc>> {
    let exp = claims(token)?.get("exp")?.as_i64()?;
    DateTime::from_timestamp(exp, 0)
}

/// True only when the token is a JWT whose `exp` lies before `now`.
pub fn is_expired_at(token: &str, now: DateTime<Utc>) -> bool {
    expiry(token).map(|exp| exp <= now).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt(payload: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload).unwrap());
        format!("{}.{}.signature", header, body)
    }

    #[test]
    fn test_expiry_from_jwt() {
        let token = jwt(serde_json::json!({"sub": "u1", "exp": 1_700_000_000}));
        let exp = expiry(&token).unwrap();
        assert_eq!(exp.timestamp(), 1_700_000_000);
        assert!(is_expired_at(&token, DateTime::from_timestamp(1_700_000_001, 0).unwrap()));
        assert!(!is_expired_at(&token, DateTime::from_timestamp(1_600_000_000, 0).unwrap()));
    }

    #[test]
    fn test_opaque_tokens_have_no_expiry() {
        assert_eq!(expiry("t1"), None);
        assert_eq!(expiry("a.b"), None);
        assert_eq!(expiry("a.!!!.c"), None);
        assert!(!is_expired_at("t1", Utc::now()));
    }
}
