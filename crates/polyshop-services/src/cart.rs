//! HTTP surface of `cart-service`.

use crate::config::request_timeout;
use crate::health::{ServiceInfo, error_body};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use polyshop_cart::{CartAccumulator, CartError, HashStore};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartItem {
    pub product_id: String,
    pub quantity: u64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartResponse {
    pub user_id: String,
    pub items: Vec<CartItem>,
    /// Distinct products, not summed quantities.
    pub total_items: usize,
}

impl CartResponse {
    fn new(user_id: String, cart: HashMap<String, u64>) -> Self {
        let mut items: Vec<_> = cart
            .into_iter()
            .map(|(product_id, quantity)| CartItem {
                product_id,
                quantity,
            })
            .collect();
        items.sort_by(|a, b| a.product_id.cmp(&b.product_id));
        Self {
            user_id,
            total_items: items.len(),
            items,
        }
    }
}

struct CartApi<S> {
    cart: Arc<CartAccumulator<S>>,
    info: Arc<ServiceInfo>,
}

impl<S> Clone for CartApi<S> {
    fn clone(&self) -> Self {
        Self {
            cart: Arc::clone(&self.cart),
            info: Arc::clone(&self.info),
        }
    }
}

/// Cart routes plus `/healthz` and `/live`.
pub fn router<S: HashStore>(cart: Arc<CartAccumulator<S>>, info: ServiceInfo) -> Router {
    let timeout = request_timeout(cart.config().call_timeout());
    Router::new()
        .route(
            "/v1/cart/:user_id",
            get(get_cart::<S>).post(add_item::<S>).delete(clear_cart::<S>),
        )
        .route("/healthz", get(healthz::<S>))
        .route("/live", get(live::<S>))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .with_state(CartApi {
            cart,
            info: Arc::new(info),
        })
}

async fn add_item<S: HashStore>(
    State(api): State<CartApi<S>>,
    Path(user_id): Path<String>,
    body: Result<Json<AddItemRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                error_body("Invalid request body", Some(rejection.body_text())),
            )
                .into_response();
        }
    };
    if req.product_id.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            error_body("product_id is required", None),
        )
            .into_response();
    }

    if let Err(e) = api.cart.increment(&user_id, &req.product_id, req.quantity).await {
        tracing::error!(
            user_id,
            product_id = %req.product_id,
            quantity = req.quantity,
            error = %e,
            "failed to add item to cart"
        );
        return cart_error(e, "Failed to add item to cart");
    }

    match api.cart.get_cart(&user_id).await {
        Ok(cart) => Json(CartResponse::new(user_id, cart)).into_response(),
        Err(e) => {
            tracing::warn!(user_id, error = %e, "item added but cart re-read failed");
            (
                StatusCode::OK,
                Json(json!({
                    "message": "Item added successfully",
                    "warning": "Failed to retrieve updated cart",
                })),
            )
                .into_response()
        }
    }
}

async fn get_cart<S: HashStore>(
    State(api): State<CartApi<S>>,
    Path(user_id): Path<String>,
) -> Response {
    match api.cart.get_cart(&user_id).await {
        Ok(cart) => Json(CartResponse::new(user_id, cart)).into_response(),
        Err(e) => {
            tracing::error!(user_id, error = %e, "failed to get cart");
            cart_error(e, "Failed to retrieve cart")
        }
    }
}

async fn clear_cart<S: HashStore>(
    State(api): State<CartApi<S>>,
    Path(user_id): Path<String>,
) -> Response {
    match api.cart.clear_cart(&user_id).await {
        Ok(()) => Json(json!({
            "message": "Cart cleared successfully",
            "user_id": user_id,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(user_id, error = %e, "failed to clear cart");
            cart_error(e, "Failed to clear cart")
        }
    }
}

async fn healthz<S: HashStore>(State(api): State<CartApi<S>>) -> impl IntoResponse {
    let reachable = match api.cart.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "health check failed: redis unreachable");
            false
        }
    };
    api.info.health("redis", reachable)
}

async fn live<S: HashStore>(State(api): State<CartApi<S>>) -> impl IntoResponse {
    api.info.live()
}

fn cart_error(e: CartError, message: &str) -> Response {
    if e.is_client_error() {
        (StatusCode::BAD_REQUEST, error_body(&e.to_string(), None)).into_response()
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, error_body(message, None)).into_response()
    }
}
