//! Probe responses shared by both services.

use axum::Json;
use axum::http::StatusCode;
use serde_json::{Value, json};

/// Identity reported by health endpoints.
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub pod_name: String,
    pub node_name: String,
}

impl ServiceInfo {
    pub fn new(service: &'static str, pod_name: String, node_name: String) -> Self {
        Self {
            service,
            pod_name,
            node_name,
        }
    }

    /// 200 when the store answered its ping, 503 otherwise. `store` names
    /// the JSON field carrying the store status.
    pub fn health(&self, store: &str, reachable: bool) -> (StatusCode, Json<Value>) {
        let (code, status, store_status) = if reachable {
            (StatusCode::OK, "healthy", "healthy")
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", "unhealthy")
        };
        let mut body = json!({
            "status": status,
            "service": self.service,
            "pod_name": self.pod_name,
            "node_name": self.node_name,
        });
        body[store] = json!(store_status);
        (code, Json(body))
    }

    /// Process liveness. Never consults a store.
    pub fn live(&self) -> (StatusCode, Json<Value>) {
        (
            StatusCode::OK,
            Json(json!({
                "status": "alive",
                "service": self.service,
            })),
        )
    }
}

/// Body for failed requests.
pub fn error_body(error: &str, details: Option<String>) -> Json<Value> {
    match details {
        Some(details) => Json(json!({ "error": error, "details": details })),
        None => Json(json!({ "error": error })),
    }
}
