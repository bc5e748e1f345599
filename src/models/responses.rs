//! Response DTOs for the admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

/// Response body for GET /raw/{key}
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: Value,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for PUT /raw
#[derive(Debug, Clone, Serialize)]
pub struct StoreResponse {
    /// Success message
    pub message: String,
    /// The key that was stored
    pub key: String,
}

impl StoreResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' stored successfully", key),
            key,
        }
    }
}

/// Response body for DELETE /raw/{key}
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub key: String,
    /// Whether the key existed
    pub removed: bool,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>, removed: bool) -> Self {
        Self {
            key: key.into(),
            removed,
        }
    }
}

/// Response body for GET /buckets/{name}/count
#[derive(Debug, Clone, Serialize)]
pub struct CountResponse {
    pub bucket: String,
    pub count: u64,
}

/// Response body for GET /buckets/{name}/keys
#[derive(Debug, Clone, Serialize)]
pub struct KeysResponse {
    pub bucket: String,
    pub keys: Vec<String>,
}

/// Response body for DELETE /buckets/{name}
#[derive(Debug, Clone, Serialize)]
pub struct BucketClearedResponse {
    pub bucket: String,
    /// Number of members deleted
    pub removed: usize,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status, "healthy" or "degraded"
    pub status: String,
    /// Backend name, e.g. "memory" or "redis"
    pub backend: String,
    /// Storage layout in use
    pub strategy: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn new(reachable: bool, backend: &str, strategy: &str) -> Self {
        Self {
            status: if reachable { "healthy" } else { "degraded" }.to_string(),
            backend: backend.to_string(),
            strategy: strategy.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_response_serialize() {
        let resp = GetResponse::new("motd", json!({"text": "hi"}));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["key"], "motd");
        assert_eq!(json["value"]["text"], "hi");
    }

    #[test]
    fn test_store_response_serialize() {
        let resp = StoreResponse::new("my_key");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("my_key"));
        assert!(json.contains("successfully"));
    }

    #[test]
    fn test_health_response() {
        let resp = HealthResponse::new(true, "memory", "grouped-hash");
        assert_eq!(resp.status, "healthy");
        assert!(!resp.timestamp.is_empty());

        let resp = HealthResponse::new(false, "redis", "keyed-string");
        assert_eq!(resp.status, "degraded");
    }
}
