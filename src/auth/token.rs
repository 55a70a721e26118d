use serde::{Deserialize, Serialize};

/// Body returned by the token endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub expires_in: Option<u64>,
    pub scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Access token with metadata
#[derive(Clone)]
pub struct AccessToken {
    pub token: String,
    pub token_type: String,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub scopes: Vec<String>,
}

impl AccessToken {
    pub fn new(token: String, token_type: String) -> Self {
        Self {
            token,
            token_type,
            expires_at: None,
            scopes: Vec::new(),
        }
    }

    pub fn from_response(response: &TokenResponse) -> Self {
        let expires_at = response
            .expires_in
            .map(|seconds| chrono::Utc::now() + chrono::Duration::seconds(seconds as i64));

        let scopes = response
            .scope
            .as_ref()
            .map(|s| s.split_whitespace().map(|scope| scope.to_string()).collect())
            .unwrap_or_default();

        Self {
            token: response.access_token.clone(),
            token_type: response.token_type.clone(),
            expires_at,
            scopes,
        }
    }

    pub fn is_expired(&self) -> bool {
        if let Some(expires_at) = self.expires_at {
            chrono::Utc::now() > expires_at
        } else {
            false
        }
    }

    pub fn needs_refresh(&self, buffer_minutes: i64) -> bool {
        if let Some(expires_at) = self.expires_at {
            let now = chrono::Utc::now();
            let buffer = chrono::Duration::minutes(buffer_minutes);
            now + buffer > expires_at
        } else {
            false
        }
    }

    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.token)
    }
}

// Keep the bearer secret out of logs.
impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("scopes", &self.scopes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response() {
        let response: TokenResponse = serde_json::from_str(
            r#"{"access_token":"ya29.abc","expires_in":3599,"token_type":"Bearer"}"#,
        )
        .unwrap();
        let token = AccessToken::from_response(&response);

        assert_eq!(token.token, "ya29.abc");
        assert_eq!(token.authorization_header(), "Bearer ya29.abc");
        assert!(!token.is_expired());
        assert!(!token.needs_refresh(5));
        assert!(token.scopes.is_empty());
    }

    #[test]
    fn test_token_type_defaults_to_bearer() {
        let response: TokenResponse =
            serde_json::from_str(r#"{"access_token":"ya29.abc"}"#).unwrap();
        assert_eq!(response.token_type, "Bearer");
    }

    #[test]
    fn test_refresh_window() {
        let mut token = AccessToken::new("ya29.abc".to_string(), "Bearer".to_string());
        assert!(!token.needs_refresh(5));

        token.expires_at = Some(chrono::Utc::now() + chrono::Duration::minutes(3));
        assert!(!token.is_expired());
        assert!(token.needs_refresh(5));

        token.expires_at = Some(chrono::Utc::now() - chrono::Duration::minutes(1));
        assert!(token.is_expired());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let token = AccessToken::new("ya29.secret".to_string(), "Bearer".to_string());
        let printed = format!("{:?}", token);
        assert!(!printed.contains("ya29.secret"));
    }
}
