//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{CartError, DomainError};

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Domain logic error.
    Domain(DomainError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Domain(err) => domain_error_to_response(err),
        };

        if status.is_client_error() {
            tracing::debug!(%status, error = %message, "request rejected");
        }

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, String) {
    match &err {
        DomainError::Cart(CartError::ShopNotFound { .. }) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        DomainError::Cart(
            CartError::InvalidShippingInformation { .. }
            | CartError::InvalidShippingQuotes
            | CartError::InvalidShopOrMethod,
        )
        | DomainError::Serialization(_) => (StatusCode::BAD_REQUEST, err.to_string()),
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        ApiError::Domain(DomainError::Cart(err))
    }
}

#[cfg(test)]
mod tests {
    use domain::SellerId;

    use super::*;

    #[test]
    fn shop_not_found_maps_to_404() {
        let err = ApiError::from(CartError::ShopNotFound {
            seller_id: SellerId::new(3),
        });
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_errors_map_to_400() {
        for err in [
            CartError::InvalidShippingInformation {
                missing: vec!["email"],
            },
            CartError::InvalidShippingQuotes,
            CartError::InvalidShopOrMethod,
        ] {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn serialization_errors_map_to_400() {
        let err = domain::CartSnapshot::from_json("not json").unwrap_err();
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
