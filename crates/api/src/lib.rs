//! HTTP API for storefront shopping carts.
//!
//! Each buyer session owns one `ShoppingCart`, addressed by a UUID. Every cart
//! operation is exposed as a JSON endpoint, with structured logging (tracing)
//! and Prometheus metrics.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::carts::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::ops::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::ops::health))
        .route("/carts", post(routes::carts::create))
        .route(
            "/carts/{id}",
            get(routes::carts::get)
                .put(routes::carts::replace)
                .delete(routes::carts::delete),
        )
        .route(
            "/carts/{id}/items",
            post(routes::carts::add_item).patch(routes::carts::update_item),
        )
        .route(
            "/carts/{id}/items/{seller_id}/{product_id}",
            axum::routing::delete(routes::carts::remove_item),
        )
        .route("/carts/{id}/shipping", put(routes::carts::set_shipping))
        .route(
            "/carts/{id}/shipping-quotes",
            put(routes::carts::set_shipping_quotes),
        )
        .route(
            "/carts/{id}/shipping-method",
            put(routes::carts::set_shipping_method),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state with no open carts.
pub fn create_default_state() -> Arc<AppState> {
    Arc::new(AppState::new())
}
