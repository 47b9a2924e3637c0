//! Tool handlers, grouped by subject area.
//!
//! Every handler returns the same flat envelope: `status: "success"` plus
//! domain fields, or `{status: "error", message}` on any failure. Handlers
//! build their success payload as a JSON object and hand it to [`respond`],
//! which merges the status marker and stringifies.

pub mod compute;
pub mod core;
pub mod dashboards;
pub mod governance;
pub mod mlflow;
pub mod security;
pub mod workspace;

use serde_json::{json, Value};
use tracing::warn;

/// Render a handler outcome as the response envelope.
pub(crate) fn respond(result: dbx_core::Result<Value>) -> String {
    match result {
        Ok(Value::Object(mut fields)) => {
            fields.insert("status".into(), json!("success"));
            Value::Object(fields).to_string()
        }
        Ok(other) => json!({ "status": "success", "result": other }).to_string(),
        Err(e) => {
            warn!("tool error: {e}");
            error_envelope(&e.to_string())
        }
    }
}

/// The error envelope: exactly `status` and `message`.
pub(crate) fn error_envelope(message: &str) -> String {
    json!({ "status": "error", "message": message }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbx_core::Error;

    #[test]
    fn success_envelope_merges_status_and_fields() {
        let out = respond(Ok(json!({ "count": 2, "clusters": [] })));
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["status"], "success");
        assert_eq!(v["count"], 2);
        assert!(v["clusters"].is_array());
    }

    #[test]
    fn error_envelope_has_exactly_two_fields() {
        let out = respond(Err(Error::InvalidArgument("bad date".into())));
        let v: Value = serde_json::from_str(&out).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(v["status"], "error");
        assert!(v["message"].as_str().unwrap().contains("bad date"));
    }

    #[test]
    fn error_message_is_never_empty() {
        let out = error_envelope("something failed");
        let v: Value = serde_json::from_str(&out).unwrap();
        assert!(!v["message"].as_str().unwrap().is_empty());
    }
}
