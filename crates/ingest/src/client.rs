use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, info, warn, Instrument, Level};

use crate::auth::TokenSource;
use crate::batch::chunk_events;
use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::region::BATCH_CREATE_PATH;
use crate::response::interpret_response;
use crate::types::{BatchContext, IngestOutcome, IngestionRequest};

/// Authenticated session against the batch ingestion endpoint.
///
/// One client owns one HTTP connection pool and is safe to share between
/// concurrent callers. Each [`ingest`](Self::ingest) call makes exactly one
/// request; there is no retry at this layer.
pub struct IngestClient {
    config: IngestConfig,
    http: Client,
    tokens: Arc<dyn TokenSource>,
    endpoint: String,
}

impl IngestClient {
    /// Validates `config` and builds a client with its own HTTP pool.
    pub fn new(config: IngestConfig, tokens: Arc<dyn TokenSource>) -> Result<Self, IngestError> {
        config.validate()?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| IngestError::Unexpected(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::assemble(config, http, tokens))
    }

    /// Builds a client on top of a caller-provided `reqwest::Client`, e.g. one
    /// configured with the host's proxy.
    pub fn with_http_client(
        config: IngestConfig,
        http: Client,
        tokens: Arc<dyn TokenSource>,
    ) -> Result<Self, IngestError> {
        config.validate()?;
        Ok(Self::assemble(config, http, tokens))
    }

    fn assemble(config: IngestConfig, http: Client, tokens: Arc<dyn TokenSource>) -> Self {
        let endpoint = format!("{}{}", config.base_url(), BATCH_CREATE_PATH);
        info!(
            plugin = %config.plugin_name,
            region = config.region.as_deref().unwrap_or("default"),
            endpoint = %endpoint,
            "ingest_client_ready"
        );
        Self {
            config,
            http,
            tokens,
            endpoint,
        }
    }

    /// Full URL batches are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Posts one batch of already-transformed UDM events.
    ///
    /// Returns [`IngestOutcome::Accepted`] for `200 {}` and
    /// [`IngestOutcome::Rejected`] for any non-200 status. Everything else is
    /// an [`IngestError`], logged before it is returned.
    pub async fn ingest(
        &self,
        events: &[Value],
        headers: &HashMap<String, String>,
        ctx: &BatchContext,
    ) -> Result<IngestOutcome, IngestError> {
        let span = tracing::span!(
            Level::INFO,
            "ingest.batch",
            page = ctx.page,
            data_type = ctx.data_type.as_deref().unwrap_or("-"),
            subtype = ctx.subtype.as_deref().unwrap_or("-"),
        );
        let start = Instant::now();
        let result = self
            .send(events, headers, ctx)
            .instrument(span.clone())
            .await;
        let _guard = span.enter();

        match result {
            Ok(outcome) => {
                let elapsed_micros = start.elapsed().as_micros();
                match &outcome {
                    IngestOutcome::Accepted => info!(
                        plugin = %self.config.plugin_name,
                        events = events.len(),
                        elapsed_micros,
                        "ingest_success"
                    ),
                    IngestOutcome::Rejected { status, body } => error!(
                        plugin = %self.config.plugin_name,
                        status,
                        response = %body,
                        elapsed_micros,
                        "unable to send the logs for page {}",
                        ctx.page
                    ),
                }
                Ok(outcome)
            }
            Err(err) => {
                error!(
                    plugin = %self.config.plugin_name,
                    kind = err.kind().as_str(),
                    error = %err,
                    details = ?err,
                    elapsed_micros = start.elapsed().as_micros(),
                    "ingest_failure"
                );
                Err(err)
            }
        }
    }

    /// Validation-mode ingest: `true` when the endpoint accepted the batch,
    /// `false` on a soft failure.
    pub async fn validate(
        &self,
        events: &[Value],
        headers: &HashMap<String, String>,
    ) -> Result<bool, IngestError> {
        let outcome = self.ingest(events, headers, &BatchContext::default()).await?;
        Ok(outcome.is_accepted())
    }

    /// Pages `events` with [`chunk_events`] and ingests each page in order.
    ///
    /// Stops at the first hard error. Soft failures are collected in the
    /// returned list, one outcome per page.
    pub async fn ingest_pages(
        &self,
        events: Vec<Value>,
        headers: &HashMap<String, String>,
        data_type: Option<&str>,
        subtype: Option<&str>,
    ) -> Result<Vec<IngestOutcome>, IngestError> {
        let pages = chunk_events(
            events,
            self.config.max_batch_bytes,
            self.config.trimmed_customer_id(),
        );
        let mut outcomes = Vec::with_capacity(pages.len());
        for (index, page) in pages.iter().enumerate() {
            let ctx = BatchContext {
                page: index + 1,
                data_type: data_type.map(str::to_string),
                subtype: subtype.map(str::to_string),
            };
            outcomes.push(self.ingest(page, headers, &ctx).await?);
        }
        let rejected = outcomes.iter().filter(|o| !o.is_accepted()).count();
        if rejected > 0 {
            warn!(pages = outcomes.len(), rejected, "some pages were rejected");
        }
        Ok(outcomes)
    }

    async fn send(
        &self,
        events: &[Value],
        headers: &HashMap<String, String>,
        ctx: &BatchContext,
    ) -> Result<IngestOutcome, IngestError> {
        let payload = IngestionRequest {
            customer_id: self.config.trimmed_customer_id(),
            events,
        };
        let body = serde_json::to_vec(&payload)
            .map_err(|e| IngestError::Unexpected(format!("failed to serialize batch: {e}")))?;
        debug!(
            events = events.len(),
            payload_bytes = body.len(),
            "ingesting logs for page {} to {}",
            ctx.page,
            self.config.plugin_name
        );

        let token = self.tokens.token().await.map_err(IngestError::Auth)?;

        let mut request = self
            .http
            .post(&self.endpoint)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .body(body)
            .send()
            .await
            .map_err(|e| IngestError::from_transport(&e, &self.config.plugin_name))?;
        let status = response.status().as_u16();
        debug!(status, "received API response for page {}", ctx.page);

        let text = response
            .text()
            .await
            .map_err(|e| IngestError::from_transport(&e, &self.config.plugin_name))?;

        interpret_response(status, &text)
    }
}
