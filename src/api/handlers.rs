//! API Handlers
//!
//! HTTP request handlers for each admin endpoint.

use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::warn;

use crate::cache::Cache;
use crate::error::ApiError;
use crate::models::{
    BucketClearedResponse, CountResponse, DeleteResponse, GetResponse, HealthResponse,
    KeysResponse, StoreRawRequest, StoreResponse,
};

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Application state shared across all handlers.
///
/// `Cache` is cheap to clone; clones share one backend connection.
#[derive(Clone)]
pub struct AppState {
    pub cache: Cache,
}

impl AppState {
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }
}

/// Handler for PUT /raw
///
/// Stores a JSON value under a verbatim key with optional TTL.
pub async fn store_raw_handler(
    State(state): State<AppState>,
    Json(req): Json<StoreRawRequest>,
) -> ApiResult<Json<StoreResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl.map(Duration::from_secs);
    state.cache.store_raw(&req.key, &req.value, ttl).await?;

    Ok(Json(StoreResponse::new(req.key)))
}

/// Handler for GET /raw/:key
pub async fn get_raw_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<GetResponse>> {
    match state.cache.fetch_raw::<Value>(&key).await? {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(ApiError::NotFound(key)),
    }
}

/// Handler for DELETE /raw/:key
///
/// Deleting a missing key succeeds with `removed: false`.
pub async fn delete_raw_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let removed = state.cache.remove_raw(&key).await?;
    Ok(Json(DeleteResponse::new(key, removed)))
}

/// Handler for GET /buckets/:name/count
pub async fn count_handler(
    State(state): State<AppState>,
    Path(bucket): Path<String>,
) -> ApiResult<Json<CountResponse>> {
    let count = state.cache.count_bucket(&bucket).await?;
    Ok(Json(CountResponse { bucket, count }))
}

/// Handler for GET /buckets/:name/keys
pub async fn keys_handler(
    State(state): State<AppState>,
    Path(bucket): Path<String>,
) -> ApiResult<Json<KeysResponse>> {
    let mut keys = state.cache.list_keys(&bucket).await?;
    keys.sort();
    Ok(Json(KeysResponse { bucket, keys }))
}

/// Handler for DELETE /buckets/:name
pub async fn clear_bucket_handler(
    State(state): State<AppState>,
    Path(bucket): Path<String>,
) -> ApiResult<Json<BucketClearedResponse>> {
    let removed = state.cache.remove_bucket(&bucket).await?;
    Ok(Json(BucketClearedResponse { bucket, removed }))
}

/// Handler for GET /health
///
/// Pings the backend; answers 503 when it does not respond.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let reachable = match state.cache.ping().await {
        Ok(()) => true,
        Err(err) => {
            warn!("Health check failed: {}", err);
            false
        }
    };
    let status = if reachable {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse::new(
            reachable,
            state.cache.backend_name(),
            state.cache.strategy_kind().as_str(),
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::cache::{CacheOptions, StrategyKind};
    use serde_json::json;
    use std::sync::Arc;

    fn state(strategy: StrategyKind) -> AppState {
        let options = CacheOptions {
            strategy,
            ..CacheOptions::default()
        };
        AppState::new(Cache::new(Arc::new(MemoryBackend::new()), options))
    }

    #[tokio::test]
    async fn test_store_and_get_handler() {
        let state = state(StrategyKind::GroupedHash);

        let req = StoreRawRequest {
            key: "test_key".to_string(),
            value: json!({"n": 1}),
            ttl: None,
        };
        let result = store_raw_handler(State(state.clone()), Json(req)).await;
        assert!(result.is_ok());

        let response = get_raw_handler(State(state), Path("test_key".to_string()))
            .await
            .unwrap();
        assert_eq!(response.value, json!({"n": 1}));
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let state = state(StrategyKind::GroupedHash);

        let result = get_raw_handler(State(state), Path("nonexistent".to_string())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = state(StrategyKind::GroupedHash);
        state.cache.store_raw("to_delete", "v", None).await.unwrap();

        let response = delete_raw_handler(State(state.clone()), Path("to_delete".to_string()))
            .await
            .unwrap();
        assert!(response.removed);

        let response = delete_raw_handler(State(state), Path("to_delete".to_string()))
            .await
            .unwrap();
        assert!(!response.removed);
    }

    #[tokio::test]
    async fn test_count_unsupported_on_keyed_string() {
        let state = state(StrategyKind::KeyedString);

        let result = count_handler(State(state), Path("person".to_string())).await;
        assert!(matches!(result, Err(ApiError::Cache(_))));
    }

    #[tokio::test]
    async fn test_health_handler() {
        let (status, response) = health_handler(State(state(StrategyKind::GroupedHash))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response.status, "healthy");
        assert_eq!(response.backend, "memory");
        assert_eq!(response.strategy, "grouped-hash");
    }

    #[tokio::test]
    async fn test_store_invalid_request() {
        let state = state(StrategyKind::GroupedHash);

        let req = StoreRawRequest {
            key: "".to_string(),
            value: json!(null),
            ttl: None,
        };
        let result = store_raw_handler(State(state), Json(req)).await;
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }
}
