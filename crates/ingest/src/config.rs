//! Configuration for the ingestion client.
//!
//! [`IngestConfig`] mirrors the plugin configuration page: customer ID, region
//! selection, service-account key and a few transport knobs. It deserializes
//! from JSON, TOML or YAML and should be validated once at start-up.
//!
//! ```rust
//! use ingest::IngestConfig;
//!
//! let config = IngestConfig {
//!     customer_id: " 0f1e2d3c-customer ".into(),
//!     region: Some("europe".into()),
//!     ..Default::default()
//! };
//! assert_eq!(config.trimmed_customer_id(), "0f1e2d3c-customer");
//! assert!(config.base_url().starts_with("https://europe-"));
//! ```
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::ServiceAccountKey;
use crate::region::{resolve_base_url, CUSTOM_REGION};

/// Default ceiling for a single batch request body, in bytes.
pub const DEFAULT_MAX_BATCH_BYTES: usize = 1024 * 1024;

/// Runtime configuration for [`IngestClient`](crate::IngestClient).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IngestConfig {
    /// Customer (instance) identifier sent with every batch. Trimmed on use.
    pub customer_id: String,

    /// Named region, `custom`, or `None` for the baseline region.
    pub region: Option<String>,

    /// Base URL used when `region` is `custom`.
    pub custom_region: Option<String>,

    /// Raw JSON of the service-account key.
    ///
    /// Only checked for shape here; token minting is delegated to the
    /// [`TokenSource`](crate::TokenSource) handed to the client.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub service_account_key: String,

    /// Display name used in log and error messages.
    pub plugin_name: String,

    /// Overall request timeout.
    ///
    /// Default: `60`
    pub timeout_secs: u64,

    /// TCP connect timeout.
    ///
    /// Default: `10`
    pub connect_timeout_secs: u64,

    /// Upper bound for one request body when paging with
    /// [`chunk_events`](crate::chunk_events).
    ///
    /// Default: [`DEFAULT_MAX_BATCH_BYTES`]
    pub max_batch_bytes: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            customer_id: String::new(),
            region: None,
            custom_region: None,
            service_account_key: String::new(),
            plugin_name: "Chronicle".into(),
            timeout_secs: 60,
            connect_timeout_secs: 10,
            max_batch_bytes: DEFAULT_MAX_BATCH_BYTES,
        }
    }
}

/// Errors raised while validating an [`IngestConfig`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("customer_id must not be empty")]
    MissingCustomerId,

    #[error("region `custom` requires a non-empty custom_region URL")]
    MissingCustomUrl,

    #[error("custom_region must be an http(s) URL, got `{0}`")]
    InvalidCustomUrl(String),

    #[error("invalid service account key: {0}")]
    InvalidServiceAccountKey(String),

    #[error("{field} must be greater than zero")]
    ZeroLimit { field: &'static str },
}

impl IngestConfig {
    /// Customer ID as it goes on the wire.
    pub fn trimmed_customer_id(&self) -> &str {
        self.customer_id.trim()
    }

    /// Base URL derived from the region selection.
    pub fn base_url(&self) -> String {
        resolve_base_url(self.region.as_deref(), self.custom_region.as_deref())
    }

    /// Parsed service-account key.
    pub fn service_account(&self) -> Result<ServiceAccountKey, ConfigError> {
        ServiceAccountKey::from_json(&self.service_account_key)
    }

    /// Checks the configuration before a client is built from it.
    ///
    /// An empty `service_account_key` is accepted so callers that inject a
    /// ready-made [`TokenSource`](crate::TokenSource) need not carry one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trimmed_customer_id().is_empty() {
            return Err(ConfigError::MissingCustomerId);
        }

        if self.region.as_deref().map(str::trim) == Some(CUSTOM_REGION) {
            let url = self.custom_region.as_deref().unwrap_or_default().trim();
            if url.is_empty() {
                return Err(ConfigError::MissingCustomUrl);
            }
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidCustomUrl(url.to_string()));
            }
        }

        if !self.service_account_key.trim().is_empty() {
            self.service_account()?;
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "timeout_secs",
            });
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "connect_timeout_secs",
            });
        }
        if self.max_batch_bytes == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "max_batch_bytes",
            });
        }

        Ok(())
    }
}
