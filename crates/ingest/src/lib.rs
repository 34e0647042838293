//! UDM batch ingestion client
//!
//! Forwards already-normalized security events to the log-analysis platform's
//! batch event-creation API. The crate does not transform events; the caller
//! hands over UDM JSON objects and we take care of the request, the bearer
//! token and the odd response contract.
//!
//! ## What the endpoint does
//!
//! - `200 {}` means the whole batch landed.
//! - `200 {"error": {...}}` is a failure, even with a 200. The envelope status
//!   tells us whether the customer ID or an event was at fault.
//! - Anything that is not a 200 is treated as a soft failure for that page:
//!   logged, returned as [`IngestOutcome::Rejected`], never raised.
//!
//! ## Main entry point
//!
//! Build an [`IngestClient`] from an [`IngestConfig`] and a [`TokenSource`],
//! then call [`IngestClient::ingest`] once per page. Use [`chunk_events`] (or
//! [`IngestClient::ingest_pages`]) when the caller has more events than fit
//! in one request.
//!
//! ```no_run
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use ingest::{BatchContext, IngestClient, IngestConfig, StaticTokenSource};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), ingest::IngestError> {
//! let config = IngestConfig {
//!     customer_id: "0f1e2d3c-4b5a-6978-8796-a5b4c3d2e1f0".into(),
//!     region: Some("europe".into()),
//!     ..Default::default()
//! };
//! let client = IngestClient::new(config, Arc::new(StaticTokenSource::new("ya29.token")))?;
//!
//! let events = vec![json!({"metadata": {"event_type": "GENERIC_EVENT"}})];
//! let outcome = client
//!     .ingest(&events, &HashMap::new(), &BatchContext::page(1))
//!     .await?;
//! assert!(outcome.is_accepted());
//! # Ok(())
//! # }
//! ```

mod auth;
mod batch;
mod client;
mod config;
mod error;
mod region;
mod response;
mod types;

pub use crate::auth::{ServiceAccountKey, StaticTokenSource, TokenSource};
pub use crate::batch::chunk_events;
pub use crate::client::IngestClient;
pub use crate::config::{ConfigError, IngestConfig, DEFAULT_MAX_BATCH_BYTES};
pub use crate::error::{IngestError, IngestErrorKind};
pub use crate::region::{
    known_regions, region_url, resolve_base_url, BASELINE_REGION, BATCH_CREATE_PATH,
    CUSTOM_REGION, INGESTION_SCOPE,
};
pub use crate::response::{envelope_error, interpret_response};
pub use crate::types::{
    BatchContext, EnvelopeStatus, IngestOutcome, IngestionErrorEnvelope, IngestionRequest,
};
