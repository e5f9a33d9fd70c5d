//! Domain layer for the storefront cart.
//!
//! This crate provides:
//! - The `ShoppingCart` aggregate, which groups line items per seller and
//!   tracks the buyer's shipping address
//! - The snapshot shape exchanged with the storefront API
//! - Merge rules for reconciling snapshots that repeat sellers or products
//! - Change subscribers notified after every mutation

pub mod cart;
pub mod error;

pub use cart::{
    CartError, CartSnapshot, LineItem, MAX_QUANTITY, Parcel, SellerGroup, ShippingAddress,
    ShippingMethod, ShippingQuote, ShoppingCart, SubscriberRegistry, Subscription,
};
pub use common::{Money, ProductId, SellerId, ShopId};
pub use error::DomainError;
