use crate::auth::{AccessToken, ReportingScope, TokenResponse};
use crate::error::{RemoteError, ReportingResult, SetupError};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client as HttpClient;
use ring::signature::RsaKeyPair;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Service account key file format (downloaded from the Cloud console)
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: Option<String>,
    pub project_id: Option<String>,
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    pub client_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_json(input: &str) -> ReportingResult<Self> {
        let key: Self = serde_json::from_str(input)
            .map_err(|e| SetupError::InvalidKeyFile(e.to_string()))?;

        match key.key_type.as_deref() {
            None | Some("service_account") => Ok(key),
            Some(other) => Err(SetupError::InvalidKeyFile(format!(
                "expected a service_account key, found {}",
                other
            ))
            .into()),
        }
    }
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct JwtHeader<'a> {
    alg: &'static str,
    typ: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    kid: Option<&'a str>,
}

#[derive(Serialize)]
struct JwtClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    exp: i64,
    iat: i64,
}

/// Credential that trades a signed assertion for short-lived access tokens
pub struct ServiceAccountCredential {
    client_email: String,
    private_key_id: Option<String>,
    token_uri: String,
    scopes: Vec<ReportingScope>,
    key_pair: RsaKeyPair,
}

impl ServiceAccountCredential {
    /// Load a key file and bind it to the given scopes. Makes no network calls.
    pub fn from_file(path: &Path, scopes: Vec<ReportingScope>) -> ReportingResult<Self> {
        tracing::info!("Loading service account key from {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|source| SetupError::KeyFileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let key = ServiceAccountKey::from_json(&content)?;
        Self::from_key(&key, scopes)
    }

    pub fn from_key(key: &ServiceAccountKey, scopes: Vec<ReportingScope>) -> ReportingResult<Self> {
        let key_pair = parse_rsa_key(&key.private_key)?;

        tracing::debug!(
            "Service account {} scoped to {}",
            key.client_email,
            ReportingScope::join(&scopes)
        );

        Ok(Self {
            client_email: key.client_email.clone(),
            private_key_id: key.private_key_id.clone(),
            token_uri: key.token_uri.clone(),
            scopes,
            key_pair,
        })
    }

    /// RS256 JWT assertion valid for one hour from `now`
    pub fn signed_assertion(&self, now: DateTime<Utc>) -> ReportingResult<String> {
        let scope = ReportingScope::join(&self.scopes);
        let claims = JwtClaims {
            iss: &self.client_email,
            scope: &scope,
            aud: &self.token_uri,
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };
        let header = JwtHeader {
            alg: "RS256",
            typ: "JWT",
            kid: self.private_key_id.as_deref(),
        };

        let header_json = serde_json::to_vec(&header).map_err(|_| SetupError::Signing)?;
        let claims_json = serde_json::to_vec(&claims).map_err(|_| SetupError::Signing)?;
        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header_json),
            URL_SAFE_NO_PAD.encode(claims_json)
        );

        let mut signature = vec![0; self.key_pair.public().modulus_len()];
        self.key_pair
            .sign(
                &ring::signature::RSA_PKCS1_SHA256,
                &ring::rand::SystemRandom::new(),
                signing_input.as_bytes(),
                &mut signature,
            )
            .map_err(|_| SetupError::Signing)?;

        Ok(format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(&signature)))
    }

    /// Exchange a fresh assertion for an access token
    pub async fn fetch_access_token(&self, http_client: &HttpClient) -> ReportingResult<AccessToken> {
        let assertion = self.signed_assertion(Utc::now())?;
        let params = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())];

        tracing::debug!("Requesting access token from {}", self.token_uri);

        let response = http_client
            .post(&self.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(RemoteError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RemoteError::TokenExchange {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let body = response.text().await.map_err(RemoteError::Network)?;
        let token_response: TokenResponse =
            serde_json::from_str(&body).map_err(RemoteError::InvalidResponse)?;

        tracing::info!("Obtained access token for {}", self.client_email);
        Ok(AccessToken::from_response(&token_response))
    }
}

impl std::fmt::Debug for ServiceAccountCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountCredential")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}

fn parse_rsa_key(pem: &str) -> ReportingResult<RsaKeyPair> {
    let mut reader = std::io::Cursor::new(pem.as_bytes());

    loop {
        let item = rustls_pemfile::read_one(&mut reader)
            .map_err(|e| SetupError::InvalidPrivateKey(e.to_string()))?;

        match item {
            Some(rustls_pemfile::Item::Pkcs8Key(der)) => {
                return RsaKeyPair::from_pkcs8(der.secret_pkcs8_der())
                    .map_err(|e| SetupError::InvalidPrivateKey(e.to_string()).into());
            }
            Some(rustls_pemfile::Item::Pkcs1Key(der)) => {
                return RsaKeyPair::from_der(der.secret_pkcs1_der())
                    .map_err(|e| SetupError::InvalidPrivateKey(e.to_string()).into());
            }
            Some(_) => continue,
            None => {
                return Err(
                    SetupError::InvalidPrivateKey("no RSA private key found".to_string()).into(),
                )
            }
        }
    }
}
