//! HTTP surface of `product-service`.

use crate::config::request_timeout;
use crate::health::{ServiceInfo, error_body};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use polyshop_catalog::{CatalogError, ProductRepository};
use serde::Deserialize;
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

#[derive(Debug, Default, Deserialize)]
pub struct ProductFilter {
    pub category: Option<String>,
}

struct ProductApi<R> {
    repository: Arc<R>,
    info: Arc<ServiceInfo>,
    call_timeout: Duration,
}

impl<R> Clone for ProductApi<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            info: Arc::clone(&self.info),
            call_timeout: self.call_timeout,
        }
    }
}

impl<R> ProductApi<R> {
    /// Bounds one repository call. Running out of time reports the database
    /// as unavailable.
    async fn call<T>(
        &self,
        fut: impl Future<Output = Result<T, CatalogError>>,
    ) -> Result<T, CatalogError> {
        match tokio::time::timeout(self.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                let timeout_ms = self.call_timeout.as_millis() as u64;
                tracing::warn!(timeout_ms, "catalog call timed out");
                Err(CatalogError::Unavailable(format!("no answer within {timeout_ms}ms")))
            }
        }
    }
}

/// Catalog routes plus `/healthz`, `/ready` and `/live`. Every repository
/// call is bounded by `call_timeout`.
pub fn router<R: ProductRepository>(
    repository: Arc<R>,
    info: ServiceInfo,
    call_timeout: Duration,
) -> Router {
    Router::new()
        .route("/products", get(list_products::<R>))
        .route("/products/:id", get(product_by_id::<R>))
        .route("/healthz", get(healthz::<R>))
        .route("/ready", get(ready::<R>))
        .route("/live", get(live::<R>))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout(call_timeout)))
        .with_state(ProductApi {
            repository,
            info: Arc::new(info),
            call_timeout,
        })
}

async fn list_products<R: ProductRepository>(
    State(api): State<ProductApi<R>>,
    Query(filter): Query<ProductFilter>,
) -> Response {
    let result = match filter.category.as_deref() {
        Some(category) if !category.is_empty() => {
            api.call(api.repository.products_by_category(category)).await
        }
        _ => api.call(api.repository.list_products()).await,
    };

    match result {
        Ok(products) => Json(products).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to retrieve products");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("Failed to retrieve products", Some(e.to_string())),
            )
                .into_response()
        }
    }
}

async fn product_by_id<R: ProductRepository>(
    State(api): State<ProductApi<R>>,
    Path(id): Path<String>,
) -> Response {
    let Ok(id) = id.parse::<i32>() else {
        return (StatusCode::BAD_REQUEST, error_body("Invalid product ID", None)).into_response();
    };

    match api.call(api.repository.product_by_id(id)).await {
        Ok(product) => Json(product).into_response(),
        Err(CatalogError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, error_body("Product not found", None)).into_response()
        }
        Err(e) => {
            tracing::error!(product_id = id, error = %e, "failed to retrieve product");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("Failed to retrieve product", Some(e.to_string())),
            )
                .into_response()
        }
    }
}

async fn healthz<R: ProductRepository>(State(api): State<ProductApi<R>>) -> impl IntoResponse {
    let reachable = match api.call(api.repository.ping()).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "health check failed: database unreachable");
            false
        }
    };
    api.info.health("database", reachable)
}

async fn ready<R: ProductRepository>(State(api): State<ProductApi<R>>) -> impl IntoResponse {
    match api.call(api.repository.ping()).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ready", "service": api.info.service })),
        ),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "not ready", "service": api.info.service })),
        ),
    }
}

async fn live<R: ProductRepository>(State(api): State<ProductApi<R>>) -> impl IntoResponse {
    api.info.live()
}
