//! Token pair and its redirect encoding

use anyhow::{anyhow, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Access/refresh token bundle issued by Google.
///
/// Field names match the JSON the client stores and the callback redirect
/// carries, so absent optionals are omitted rather than written as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// OAuth access token (short-lived, ~1 hour)
    pub access_token: String,

    /// Only issued when the user went through the consent prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Expiry as Unix epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<i64>,
}

impl TokenPair {
    /// Naive expiry check; a pair without an expiry never expires
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        matches!(self.expiry_date, Some(expiry) if expiry <= now_ms)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp_millis())
    }

    /// Base64 of the JSON encoding, as carried in the `tokens` parameter
    pub fn to_redirect_param(&self) -> Result<String> {
        let json = serde_json::to_vec(self)?;
        Ok(STANDARD.encode(json))
    }

    /// Reverses [`TokenPair::to_redirect_param`]
    pub fn from_redirect_param(encoded: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| anyhow!("Token payload is not valid base64: {}", e))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| anyhow!("Token payload is not a valid token pair: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(expiry_date: Option<i64>) -> TokenPair {
        TokenPair {
            access_token: "access".into(),
            refresh_token: Some("refresh".into()),
            expiry_date,
        }
    }

    #[test]
    fn test_token_expiry() {
        let now = Utc::now().timestamp_millis();
        assert!(pair(Some(now - 1_000)).is_expired_at(now));
        assert!(pair(Some(now)).is_expired_at(now));
        assert!(!pair(Some(now + 3_600_000)).is_expired_at(now));
        assert!(!pair(None).is_expired());
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let token = TokenPair {
            access_token: "access".into(),
            refresh_token: None,
            expiry_date: None,
        };
        assert_eq!(
            serde_json::to_string(&token).unwrap(),
            r#"{"access_token":"access"}"#
        );
    }

    #[test]
    fn test_redirect_param_decodes_to_json() {
        let token = pair(Some(1_700_000_000_000));
        let encoded = token.to_redirect_param().unwrap();

        let raw = STANDARD.decode(&encoded).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(json["access_token"], "access");
        assert_eq!(json["expiry_date"], 1_700_000_000_000_i64);

        assert_eq!(TokenPair::from_redirect_param(&encoded).unwrap(), token);
    }

    #[test]
    fn test_rejects_garbage_payload() {
        assert!(TokenPair::from_redirect_param("%%%").is_err());
        let not_a_pair = STANDARD.encode(br#"{"refresh_token":"x"}"#);
        assert!(TokenPair::from_redirect_param(&not_a_pair).is_err());
    }
}
