//! Wire and outcome types for batch ingestion.
//!
//! ```text
//! IngestionRequest ── POST /v2/udmevents:batchCreate ──► endpoint
//!                                                          │
//!            200 {}                 ◄──────────────────────┤ IngestOutcome::Accepted
//!            200 {"error": {...}}   ◄──────────────────────┤ IngestionErrorEnvelope → IngestError
//!            non-200                ◄──────────────────────┘ IngestOutcome::Rejected
//! ```
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Body of one batch-create call. Built fresh per call.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IngestionRequest<'a> {
    pub customer_id: &'a str,
    pub events: &'a [Value],
}

/// Status field of the endpoint's error envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeStatus {
    FailedPrecondition,
    PermissionDenied,
    InvalidArgument,
    Other(String),
}

impl EnvelopeStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "FAILED_PRECONDITION" => EnvelopeStatus::FailedPrecondition,
            "PERMISSION_DENIED" => EnvelopeStatus::PermissionDenied,
            "INVALID_ARGUMENT" => EnvelopeStatus::InvalidArgument,
            other => EnvelopeStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EnvelopeStatus::FailedPrecondition => "FAILED_PRECONDITION",
            EnvelopeStatus::PermissionDenied => "PERMISSION_DENIED",
            EnvelopeStatus::InvalidArgument => "INVALID_ARGUMENT",
            EnvelopeStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for EnvelopeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EnvelopeStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EnvelopeStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(EnvelopeStatus::parse(raw.as_deref().unwrap_or_default()))
    }
}

/// Error payload the endpoint embeds in a 200 response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestionErrorEnvelope {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default = "missing_status")]
    pub status: EnvelopeStatus,
}

fn missing_status() -> EnvelopeStatus {
    EnvelopeStatus::Other(String::new())
}

/// Result of a call that did not fail hard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// 200 with an empty object: every event in the batch was accepted.
    Accepted,
    /// Non-200 status. Logged by the client; the caller decides whether the
    /// page is retried or dropped.
    Rejected { status: u16, body: String },
}

impl IngestOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, IngestOutcome::Accepted)
    }
}

/// Caller-supplied metadata about the batch, used for logging only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchContext {
    pub page: usize,
    pub data_type: Option<String>,
    pub subtype: Option<String>,
}

impl BatchContext {
    pub fn page(page: usize) -> Self {
        Self {
            page,
            ..Default::default()
        }
    }

    pub fn with_types(mut self, data_type: impl Into<String>, subtype: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self.subtype = Some(subtype.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_to_wire_shape() {
        let events = vec![json!({"metadata": {"event_type": "NETWORK_HTTP"}})];
        let req = IngestionRequest {
            customer_id: "cust",
            events: &events,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"customer_id": "cust", "events": [{"metadata": {"event_type": "NETWORK_HTTP"}}]})
        );
    }

    #[test]
    fn envelope_status_parses_known_and_other() {
        let env: IngestionErrorEnvelope = serde_json::from_value(json!({
            "code": 400, "message": "bad", "status": "INVALID_ARGUMENT"
        }))
        .unwrap();
        assert_eq!(env.status, EnvelopeStatus::InvalidArgument);

        let env: IngestionErrorEnvelope = serde_json::from_value(json!({
            "code": 503, "message": "later", "status": "UNAVAILABLE"
        }))
        .unwrap();
        assert_eq!(env.status, EnvelopeStatus::Other("UNAVAILABLE".into()));
        assert_eq!(env.status.to_string(), "UNAVAILABLE");
    }

    #[test]
    fn envelope_tolerates_missing_fields() {
        let env: IngestionErrorEnvelope = serde_json::from_value(json!({})).unwrap();
        assert_eq!(env.code, 0);
        assert_eq!(env.status, EnvelopeStatus::Other(String::new()));
    }

    #[test]
    fn batch_context_builder() {
        let ctx = BatchContext::page(3).with_types("alerts", "dlp");
        assert_eq!(ctx.page, 3);
        assert_eq!(ctx.data_type.as_deref(), Some("alerts"));
        assert_eq!(ctx.subtype.as_deref(), Some("dlp"));
    }
}
