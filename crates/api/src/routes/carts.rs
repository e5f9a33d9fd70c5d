//! Cart endpoints. One `ShoppingCart` per buyer session, keyed by UUID.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::de;
use domain::{
    CartSnapshot, LineItem, Money, SellerId, ShippingAddress, ShippingMethod, ShippingQuote,
    ShoppingCart,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::JsonBody;

/// Shared application state accessible from all handlers.
#[derive(Debug, Default)]
pub struct AppState {
    carts: RwLock<HashMap<Uuid, ShoppingCart>>,
}

impl AppState {
    /// Creates state with no open carts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open carts.
    pub async fn cart_count(&self) -> usize {
        self.carts.read().await.len()
    }

    /// Opens a cart from a snapshot and returns its id with the normalized cart.
    pub async fn open(&self, snapshot: CartSnapshot) -> CartResponse {
        let id = Uuid::new_v4();
        let cart = ShoppingCart::from_snapshot(snapshot);

        // Stays registered until the cart is cleared.
        let _audit = cart.subscribe(move |snapshot| {
            tracing::info!(
                cart_id = %id,
                sellers = snapshot.groups.len(),
                products = snapshot.products_count(),
                total = %snapshot.total(),
                "cart updated"
            );
        });

        let response = CartResponse::new(id, &cart);
        let mut carts = self.carts.write().await;
        carts.insert(id, cart);
        metrics::gauge!("carts_open").set(carts.len() as f64);
        response
    }

    /// Clears and forgets a cart. Returns false if it did not exist.
    pub async fn close(&self, id: Uuid) -> bool {
        let mut carts = self.carts.write().await;
        let Some(mut cart) = carts.remove(&id) else {
            return false;
        };
        cart.clear();
        metrics::gauge!("carts_open").set(carts.len() as f64);
        true
    }

    async fn read<T>(&self, id: Uuid, f: impl FnOnce(&ShoppingCart) -> T) -> Result<T, ApiError> {
        let carts = self.carts.read().await;
        let cart = carts.get(&id).ok_or_else(|| not_found(id))?;
        Ok(f(cart))
    }

    async fn write<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut ShoppingCart) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let mut carts = self.carts.write().await;
        let cart = carts.get_mut(&id).ok_or_else(|| not_found(id))?;
        f(cart)
    }
}

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    #[serde(default)]
    pub item: LineItem,
    #[serde(default, deserialize_with = "de::integer")]
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct ShippingQuotesRequest {
    #[serde(default)]
    pub quotes: Option<Vec<ShippingQuote>>,
}

#[derive(Debug, Deserialize)]
pub struct ShippingMethodRequest {
    #[serde(default)]
    pub users_id: Option<SellerId>,
    #[serde(default)]
    pub method: Option<ShippingMethod>,
}

// -- Response types --

#[derive(Debug, Serialize)]
pub struct Totals {
    pub subtotal: Money,
    pub shipping_cost: Money,
    pub total: Money,
    pub products_count: u64,
}

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub id: String,
    pub cart: CartSnapshot,
    pub totals: Totals,
}

impl CartResponse {
    fn new(id: Uuid, cart: &ShoppingCart) -> Self {
        Self {
            id: id.to_string(),
            cart: cart.cart().clone(),
            totals: Totals {
                subtotal: cart.subtotal(),
                shipping_cost: cart.shipping_cost(),
                total: cart.total(),
                products_count: cart.products_count(),
            },
        }
    }
}

// -- Handlers --

/// POST /carts — open a cart, optionally seeded with a snapshot body.
#[tracing::instrument(skip(state, body))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<CartResponse>), ApiError> {
    let snapshot = if body.iter().all(u8::is_ascii_whitespace) {
        CartSnapshot::default()
    } else {
        CartSnapshot::from_slice(&body)?
    };

    let response = state.open(snapshot).await;
    tracing::info!(cart_id = %response.id, "cart opened");

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /carts/{id} — current cart with totals.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let id = parse_cart_id(&id)?;
    let response = state.read(id, |cart| CartResponse::new(id, cart)).await?;
    Ok(Json(response))
}

/// PUT /carts/{id} — replace the cart with an authoritative snapshot.
#[tracing::instrument(skip(state, snapshot))]
pub async fn replace(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(snapshot): JsonBody<CartSnapshot>,
) -> Result<Json<CartResponse>, ApiError> {
    let id = parse_cart_id(&id)?;
    let response = state
        .write(id, |cart| {
            cart.set_cart(snapshot);
            Ok(CartResponse::new(id, cart))
        })
        .await?;
    Ok(Json(response))
}

/// DELETE /carts/{id} — clear the cart and close the session.
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_cart_id(&id)?;
    if state.close(id).await {
        tracing::info!(cart_id = %id, "cart closed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// POST /carts/{id}/items — add a product or replace its quantity.
#[tracing::instrument(skip(state, item))]
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(item): JsonBody<LineItem>,
) -> Result<Json<CartResponse>, ApiError> {
    let id = parse_cart_id(&id)?;
    let response = state
        .write(id, |cart| {
            cart.add_to_cart(item);
            Ok(CartResponse::new(id, cart))
        })
        .await?;
    Ok(Json(response))
}

/// PATCH /carts/{id}/items — set a quantity within a seller group.
#[tracing::instrument(skip(state, req))]
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateQuantityRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let id = parse_cart_id(&id)?;
    let response = state
        .write(id, |cart| {
            cart.update_product_quantity(&req.item, req.quantity);
            Ok(CartResponse::new(id, cart))
        })
        .await?;
    Ok(Json(response))
}

/// DELETE /carts/{id}/items/{seller_id}/{product_id} — remove a product.
#[tracing::instrument(skip(state))]
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    Path((id, seller_id, product_id)): Path<(String, u64, u64)>,
) -> Result<Json<CartResponse>, ApiError> {
    let id = parse_cart_id(&id)?;
    let reference = LineItem::reference(seller_id, product_id);
    let response = state
        .write(id, |cart| {
            cart.remove_product_from_cart(&reference);
            Ok(CartResponse::new(id, cart))
        })
        .await?;
    Ok(Json(response))
}

/// PUT /carts/{id}/shipping — validate and store the shipping address.
#[tracing::instrument(skip(state, address))]
pub async fn set_shipping(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(address): JsonBody<ShippingAddress>,
) -> Result<Json<ShippingAddress>, ApiError> {
    let id = parse_cart_id(&id)?;
    let stored = state
        .write(id, |cart| Ok(cart.set_shipping(address)?.clone()))
        .await?;
    Ok(Json(stored))
}

/// PUT /carts/{id}/shipping-quotes — attach quotes and preselect the cheapest offers.
#[tracing::instrument(skip(state, req))]
pub async fn set_shipping_quotes(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<ShippingQuotesRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let id = parse_cart_id(&id)?;
    let response = state
        .write(id, |cart| {
            cart.set_shipping_quotes(req.quotes)?;
            Ok(CartResponse::new(id, cart))
        })
        .await?;
    Ok(Json(response))
}

/// PUT /carts/{id}/shipping-method — select a delivery offer for a seller.
#[tracing::instrument(skip(state, req))]
pub async fn set_shipping_method(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<ShippingMethodRequest>,
) -> Result<Json<ShippingMethod>, ApiError> {
    let id = parse_cart_id(&id)?;
    let method = state
        .write(id, |cart| {
            cart.set_shipping_method(req.users_id, req.method)
                .map_err(ApiError::from)
        })
        .await?;
    Ok(Json(method))
}

fn parse_cart_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|e| ApiError::BadRequest(format!("Invalid cart ID format: {e}")))
}

fn not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Cart {id} not found"))
}
