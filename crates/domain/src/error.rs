//! Domain error types.

use thiserror::Error;

use crate::cart::CartError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A cart operation was rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// A snapshot could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cart_errors_convert_and_display() {
        let err: DomainError = CartError::InvalidShippingInformation {
            missing: vec!["zipcode", "phone"],
        }
        .into();

        assert_eq!(
            err.to_string(),
            "Cart error: Invalid shipping information: missing zipcode, phone"
        );
    }

    #[test]
    fn shop_not_found_names_the_seller() {
        let err = CartError::ShopNotFound {
            seller_id: common::SellerId::new(12),
        };
        assert_eq!(err.to_string(), "Shop not found: 12");
    }
}
