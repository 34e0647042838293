//! Credentials for the ingestion session.
//!
//! The ingestion API authenticates with a bearer token minted from a
//! service-account credential. Minting (JWT signing and the token exchange)
//! belongs to the host's auth transport, so the client only depends on the
//! [`TokenSource`] capability. The key itself is still parsed here so a broken
//! credential is rejected at configuration time instead of on the first batch.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Subset of a service-account key file that the ingestion session relies on.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".into()
}

impl ServiceAccountKey {
    /// Parses the JSON key blob stored in the plugin configuration.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let key: ServiceAccountKey = serde_json::from_str(raw.trim())
            .map_err(|e| ConfigError::InvalidServiceAccountKey(e.to_string()))?;
        if key.key_type != "service_account" {
            return Err(ConfigError::InvalidServiceAccountKey(format!(
                "expected key type `service_account`, got `{}`",
                key.key_type
            )));
        }
        if key.client_email.trim().is_empty() || key.private_key.trim().is_empty() {
            return Err(ConfigError::InvalidServiceAccountKey(
                "client_email and private_key must be non-empty".into(),
            ));
        }
        Ok(key)
    }
}

// The private key never reaches logs through Debug.
impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("key_type", &self.key_type)
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"<redacted>")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// Supplies bearer tokens for ingestion requests.
///
/// Implementations are expected to cache and refresh tokens themselves; the
/// client asks for a token once per request.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Returns a token to send as `Authorization: Bearer <token>`.
    async fn token(&self) -> Result<String, String>;
}

/// A fixed, pre-minted token.
#[derive(Clone)]
pub struct StaticTokenSource {
    token: String,
}

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for StaticTokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticTokenSource(<redacted>)")
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn token(&self) -> Result<String, String> {
        if self.token.trim().is_empty() {
            return Err("static token is empty".into());
        }
        Ok(self.token.clone())
    }
}
