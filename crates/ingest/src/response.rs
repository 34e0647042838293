//! Interpretation of batch-create responses.
//!
//! Kept free of I/O so the status/body decision table can be tested directly.
use serde_json::Value;

use crate::error::IngestError;
use crate::types::{EnvelopeStatus, IngestOutcome, IngestionErrorEnvelope};

/// Maps a status code and raw body onto an outcome or a hard error.
pub fn interpret_response(status: u16, body: &str) -> Result<IngestOutcome, IngestError> {
    if status != 200 {
        return Ok(IngestOutcome::Rejected {
            status,
            body: body.to_string(),
        });
    }

    let value: Value =
        serde_json::from_str(body).map_err(|e| IngestError::InvalidResponse(e.to_string()))?;

    match value {
        Value::Object(ref map) if map.is_empty() => Ok(IngestOutcome::Accepted),
        Value::Object(mut map) => match map.remove("error") {
            Some(raw @ Value::Object(_)) => {
                let envelope: IngestionErrorEnvelope = serde_json::from_value(raw)
                    .map_err(|e| IngestError::Unexpected(format!("malformed error envelope: {e}")))?;
                Err(envelope_error(envelope))
            }
            _ => Err(IngestError::Unexpected(format!(
                "response is neither empty nor an error envelope: {body}"
            ))),
        },
        other => Err(IngestError::Unexpected(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

/// Classifies an error envelope.
pub fn envelope_error(envelope: IngestionErrorEnvelope) -> IngestError {
    let IngestionErrorEnvelope {
        code,
        message,
        status,
    } = envelope;
    match status {
        EnvelopeStatus::FailedPrecondition | EnvelopeStatus::PermissionDenied => {
            IngestError::InvalidCustomerId(message)
        }
        EnvelopeStatus::InvalidArgument => IngestError::InvalidEvent(message),
        EnvelopeStatus::Other(status) => IngestError::Unknown {
            code,
            message,
            status,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngestErrorKind;

    fn envelope(code: i64, status: &str) -> String {
        format!(r#"{{"error": {{"code": {code}, "message": "details here", "status": "{status}"}}}}"#)
    }

    #[test]
    fn empty_object_is_accepted() {
        assert_eq!(interpret_response(200, "{}"), Ok(IngestOutcome::Accepted));
        assert_eq!(interpret_response(200, " { } \n"), Ok(IngestOutcome::Accepted));
    }

    #[test]
    fn non_200_is_soft_failure() {
        for status in [201, 204, 400, 403, 500, 503] {
            let outcome = interpret_response(status, "nope").unwrap();
            assert_eq!(
                outcome,
                IngestOutcome::Rejected {
                    status,
                    body: "nope".into()
                }
            );
            assert!(!outcome.is_accepted());
        }
    }

    #[test]
    fn invalid_json_is_invalid_response() {
        let err = interpret_response(200, "<html>oops</html>").unwrap_err();
        assert_eq!(err.kind(), IngestErrorKind::InvalidResponse);
        let err = interpret_response(200, "").unwrap_err();
        assert_eq!(err.kind(), IngestErrorKind::InvalidResponse);
    }

    #[test]
    fn customer_id_statuses() {
        for status in ["FAILED_PRECONDITION", "PERMISSION_DENIED"] {
            let err = interpret_response(200, &envelope(403, status)).unwrap_err();
            assert_eq!(err, IngestError::InvalidCustomerId("details here".into()));
        }
    }

    #[test]
    fn invalid_argument_is_invalid_event() {
        let err = interpret_response(200, &envelope(400, "INVALID_ARGUMENT")).unwrap_err();
        assert_eq!(err, IngestError::InvalidEvent("details here".into()));
    }

    #[test]
    fn other_statuses_are_unknown_verbatim() {
        let err = interpret_response(200, &envelope(429, "RESOURCE_EXHAUSTED")).unwrap_err();
        assert_eq!(
            err,
            IngestError::Unknown {
                code: 429,
                message: "details here".into(),
                status: "RESOURCE_EXHAUSTED".into(),
            }
        );
    }

    #[test]
    fn non_empty_without_error_key_is_never_success() {
        let err = interpret_response(200, r#"{"result": "ok"}"#).unwrap_err();
        assert_eq!(err.kind(), IngestErrorKind::Unexpected);

        let err = interpret_response(200, r#"{"error": "flat string"}"#).unwrap_err();
        assert_eq!(err.kind(), IngestErrorKind::Unexpected);

        let err = interpret_response(200, "[]").unwrap_err();
        assert_eq!(err.kind(), IngestErrorKind::Unexpected);
    }
}
