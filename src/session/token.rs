//! Session tokens issued by the identity provider.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};

use crate::traits::Headers;

/// Name of the header carrying the id token on API requests.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Tokens for a signed-in user.
///
/// Owned by the identity provider adapter and its store. The rest of the
/// shell only ever borrows a session for the duration of one request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    /// JWT identifying the user; sent to the API gateway.
    pub id_token: String,
    /// JWT for user-pool self-service calls.
    pub access_token: String,
    /// Long-lived token used to renew the other two.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Expiry as Unix timestamp (seconds since epoch).
    pub expires_at: i64,
}

impl Session {
    /// Check whether the session has expired at `now` (Unix seconds).
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.expires_at
    }

    /// Check whether the session has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(chrono::Utc::now().timestamp())
    }

    /// True when the session expires within `skew_secs` of `now`.
    pub fn expires_within(&self, skew_secs: i64, now: i64) -> bool {
        now + skew_secs >= self.expires_at
    }

    /// Header map carrying the id token.
    pub fn authorization_header(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert(AUTHORIZATION_HEADER.to_string(), self.id_token.clone());
        headers
    }
}

#[derive(Deserialize)]
struct JwtClaims {
    exp: i64,
}

/// Read the `exp` claim from a JWT without verifying it.
///
/// Returns `None` if the token is not a well-formed JWT.
pub fn jwt_expiry(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: JwtClaims = serde_json::from_slice(&bytes).ok()?;
    Some(claims.exp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_at: i64) -> Session {
        Session {
            id_token: "id".to_string(),
            access_token: "access".to_string(),
            refresh_token: None,
            expires_at,
        }
    }

    fn jwt(claims: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256"}"#),
            URL_SAFE_NO_PAD.encode(claims)
        )
    }

    #[test]
    fn test_is_expired_at() {
        let s = session(1_000);
        assert!(!s.is_expired_at(999));
        assert!(s.is_expired_at(1_000));
        assert!(s.is_expired_at(1_001));
    }

    #[test]
    fn test_is_expired_uses_clock() {
        assert!(session(0).is_expired());
        assert!(!session(chrono::Utc::now().timestamp() + 3600).is_expired());
    }

    #[test]
    fn test_expires_within() {
        let s = session(1_000);
        assert!(s.expires_within(60, 950));
        assert!(!s.expires_within(60, 900));
    }

    #[test]
    fn test_authorization_header() {
        let headers = session(0).authorization_header();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("Authorization"), Some(&"id".to_string()));
    }

    #[test]
    fn test_jwt_expiry() {
        assert_eq!(jwt_expiry(&jwt(r#"{"exp":1700000000,"sub":"u"}"#)), Some(1_700_000_000));
        assert_eq!(jwt_expiry(&jwt(r#"{"sub":"u"}"#)), None);
        assert_eq!(jwt_expiry("not-a-jwt"), None);
        assert_eq!(jwt_expiry("a.!!!.c"), None);
    }

    #[test]
    fn test_session_serde_skips_missing_refresh() {
        let json = serde_json::to_string(&session(5)).unwrap();
        assert!(!json.contains("refresh_token"));
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session(5));
    }
}
