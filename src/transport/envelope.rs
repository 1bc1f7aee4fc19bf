use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TransportError;

/// Error codes that are logged but never shown to the user.
///
/// The backend reports these when it falls back to degraded data, and the
/// views render that data without an alert.
pub const SILENT_ERROR_CODES: &[&str] = &["NEO4J_CONN", "STATS_FAILED"];

/// Standard response wrapper used by the backend.
///
/// Older endpoints and the mock layer report `success` instead of `ok`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(alias = "success")]
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The `error` member of a failed envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Envelope {
    /// Successful envelope carrying `data`.
    pub fn success(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    /// Failed envelope with a code and message.
    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(ErrorBody {
                code: Some(code.into()),
                message: Some(message.into()),
            }),
            message: None,
        }
    }
}

/// An `ok: false` envelope, ready to be surfaced.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiFailure {
    pub code: Option<String>,
    pub message: String,
}

impl ApiFailure {
    /// Whether the code is on the suppression allow-list.
    pub fn is_silent(&self) -> bool {
        self.code
            .as_deref()
            .map(|c| SILENT_ERROR_CODES.contains(&c))
            .unwrap_or(false)
    }
}

impl From<ApiFailure> for TransportError {
    fn from(failure: ApiFailure) -> Self {
        TransportError::Api {
            code: failure.code,
            message: failure.message,
        }
    }
}

/// Extract the payload from a 2xx response body.
///
/// Envelopes yield their `data` (or the whole body when `data` is absent);
/// anything that is not an envelope passes through unchanged.
pub fn unwrap_envelope(body: Value) -> Result<Value, ApiFailure> {
    let flag = body
        .as_object()
        .and_then(|obj| obj.get("ok").or_else(|| obj.get("success")))
        .and_then(Value::as_bool);

    match flag {
        Some(false) => {
            let error = body.get("error");
            let message = error
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .or_else(|| body.get("message").and_then(Value::as_str))
                .unwrap_or("API Error")
                .to_string();
            let code = error
                .and_then(|e| e.get("code"))
                .and_then(Value::as_str)
                .map(str::to_string);
            Err(ApiFailure { code, message })
        }
        Some(true) => match body {
            Value::Object(mut obj) => Ok(obj.remove("data").unwrap_or(Value::Object(obj))),
            other => Ok(other),
        },
        None => Ok(body),
    }
}

/// User-facing message for a non-2xx response.
///
/// A message supplied by the body wins over the status table.
pub fn http_error_message(status: u16, body: Option<&Value>) -> String {
    let supplied = body.and_then(|b| {
        b.get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .or_else(|| b.get("detail").and_then(Value::as_str))
    });

    if let Some(message) = supplied {
        return message.to_string();
    }

    match status {
        401 => "Unauthorized - Please check your credentials".to_string(),
        403 => "Forbidden - Access denied".to_string(),
        404 => "API endpoint not found".to_string(),
        500 => "Internal server error".to_string(),
        503 => "Service unavailable - Please try again later".to_string(),
        other => format!("HTTP {} Error", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_unwrap_ok_envelope_returns_data() {
        let body = json!({"ok": true, "data": {"total_nodes": 3}});
        assert_eq!(unwrap_envelope(body).unwrap(), json!({"total_nodes": 3}));
    }

    #[test]
    fn test_unwrap_success_envelope_without_data_returns_body() {
        let body = json!({"success": true, "status": "healthy"});
        assert_eq!(
            unwrap_envelope(body).unwrap(),
            json!({"success": true, "status": "healthy"})
        );
    }

    #[test]
    fn test_unwrap_plain_body_passes_through() {
        let body = json!({"status": "healthy", "neo4j": "connected"});
        assert_eq!(unwrap_envelope(body.clone()).unwrap(), body);
        assert_eq!(unwrap_envelope(json!([1, 2])).unwrap(), json!([1, 2]));
    }

    #[test]
    fn test_unwrap_failed_envelope() {
        let body = json!({"ok": false, "error": {"code": "NEO4J_CONN", "message": "m"}});
        let failure = unwrap_envelope(body).unwrap_err();
        assert_eq!(failure.code.as_deref(), Some("NEO4J_CONN"));
        assert_eq!(failure.message, "m");
        assert!(failure.is_silent());
    }

    #[test]
    fn test_unwrap_failed_envelope_defaults() {
        let failure = unwrap_envelope(json!({"ok": false})).unwrap_err();
        assert_eq!(failure.code, None);
        assert_eq!(failure.message, "API Error");
        assert!(!failure.is_silent());
    }

    #[test]
    fn test_silent_codes() {
        for code in ["NEO4J_CONN", "STATS_FAILED"] {
            let failure = ApiFailure {
                code: Some(code.to_string()),
                message: String::new(),
            };
            assert!(failure.is_silent());
        }
        let failure = ApiFailure {
            code: Some("OTHER".to_string()),
            message: String::new(),
        };
        assert!(!failure.is_silent());
    }

    #[test]
    fn test_http_error_message_table() {
        assert_eq!(
            http_error_message(401, None),
            "Unauthorized - Please check your credentials"
        );
        assert_eq!(http_error_message(403, None), "Forbidden - Access denied");
        assert_eq!(http_error_message(404, None), "API endpoint not found");
        assert_eq!(http_error_message(500, None), "Internal server error");
        assert_eq!(
            http_error_message(503, None),
            "Service unavailable - Please try again later"
        );
        assert_eq!(http_error_message(418, None), "HTTP 418 Error");
    }

    #[test]
    fn test_http_error_message_prefers_body() {
        let body = json!({"error": {"message": "file too large"}});
        assert_eq!(http_error_message(413, Some(&body)), "file too large");

        let body = json!({"detail": "Neo4j数据库连接失败"});
        assert_eq!(http_error_message(500, Some(&body)), "Neo4j数据库连接失败");

        let body = json!({"error": "not an object"});
        assert_eq!(http_error_message(404, Some(&body)), "API endpoint not found");
    }

    #[test]
    fn test_envelope_serde_accepts_success_alias() {
        let envelope: Envelope =
            serde_json::from_value(json!({"success": true, "data": [1]})).unwrap();
        assert_eq!(envelope, Envelope::success(json!([1])));

        let failure = Envelope::failure("OTHER", "boom");
        let value = serde_json::to_value(&failure).unwrap();
        assert_eq!(
            value,
            json!({"ok": false, "error": {"code": "OTHER", "message": "boom"}})
        );
    }
}
