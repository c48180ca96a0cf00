use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::user::User;

/// Body of the token exchange request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRequest {
    /// Label describing what the token will be used for.
    pub usage: String,

    /// Requested lifetime in seconds, the server default applies when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

impl TokenRequest {
    pub fn new(usage: impl Into<String>) -> Self {
        Self {
            usage: usage.into(),
            ttl: None,
        }
    }

    pub fn with_ttl(mut self, ttl: u64) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

/// Response structure for a successful token exchange.
///
/// On the wire the token attributes sit at the top level, next to `user`:
///
/// ```json
/// {"user": {"id": 1}, "api_token": "abc123", "expires": 1700000000}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The authenticated principal.
    #[serde(default)]
    pub user: Option<User>,

    #[serde(flatten)]
    pub token: Token,
}

/// The issued token. `api_token` is what subsequent API calls must attach.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// A missing key decodes as empty, which the client rejects afterwards.
    #[serde(default)]
    pub api_token: String,

    /// Every other token attribute returned by the server.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Token {
    pub fn is_usable(&self) -> bool {
        !self.api_token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_request_omits_ttl() {
        let req = TokenRequest::new("ci pipeline");
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, json!({"usage": "ci pipeline"}));

        let req = req.with_ttl(3600);
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, json!({"usage": "ci pipeline", "ttl": 3600}));
    }

    #[test]
    fn test_response_decode() {
        let data = r#"{"user": {"id": 1, "name": "alice"}, "api_token": "abc123", "expires": 1700000000}"#;
        let resp: TokenResponse = serde_json::from_str(data).unwrap();

        assert_eq!(resp.token.api_token, "abc123");
        assert!(resp.token.is_usable());
        assert_eq!(resp.token.attributes.get("expires"), Some(&json!(1700000000)));
        assert!(!resp.token.attributes.contains_key("user"));

        let user = resp.user.unwrap();
        assert_eq!(user.get("id"), Some(&json!(1)));
        assert_eq!(user.get("name"), Some(&json!("alice")));
    }

    #[test]
    fn test_response_missing_fields() {
        let resp: TokenResponse = serde_json::from_str(r#"{"user": null}"#).unwrap();
        assert!(resp.user.is_none());
        assert!(!resp.token.is_usable());

        let resp: TokenResponse = serde_json::from_str(r#"{"api_token": "t"}"#).unwrap();
        assert!(resp.user.is_none());
        assert_eq!(resp.token.api_token, "t");
    }

    #[test]
    fn test_response_incompatible() {
        assert!(serde_json::from_str::<TokenResponse>(r#"[1, 2, 3]"#).is_err());
        assert!(serde_json::from_str::<TokenResponse>(r#"{"api_token": 42}"#).is_err());
        assert!(serde_json::from_str::<TokenResponse>(r#"{"user": "alice"}"#).is_err());
    }

    #[test]
    fn test_response_encode_flat() {
        let data = r#"{"user":{"id":7},"api_token":"xyz","scope":"read"}"#;
        let resp: TokenResponse = serde_json::from_str(data).unwrap();
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            value,
            json!({"user": {"id": 7}, "api_token": "xyz", "scope": "read"})
        );
    }
}
