//! Shopping cart aggregate and related types.

mod aggregate;
pub mod merge;
mod shipping;
mod snapshot;
mod subscribers;
mod value_objects;

pub use aggregate::ShoppingCart;
pub use shipping::{Parcel, ShippingAddress, ShippingMethod, ShippingQuote};
pub use snapshot::CartSnapshot;
pub use subscribers::{SubscriberRegistry, Subscription};
pub use value_objects::{LineItem, SellerGroup};

use common::SellerId;
use thiserror::Error;

/// Largest quantity a single line item can be set to by the buyer.
pub const MAX_QUANTITY: u32 = 10;

/// Errors raised by cart operations.
///
/// Only shipping operations fail. Adding, updating and removing products are
/// lenient: unknown sellers are ignored and quantities are clamped.
#[derive(Debug, Error)]
pub enum CartError {
    /// A required shipping address field is empty or zero.
    #[error("Invalid shipping information: missing {}", missing.join(", "))]
    InvalidShippingInformation { missing: Vec<&'static str> },

    /// No quote list was supplied.
    #[error("Invalid shipping quotes: no quotes supplied")]
    InvalidShippingQuotes,

    /// The seller id or the shipping method was not supplied.
    #[error("Invalid shop or shipping method")]
    InvalidShopOrMethod,

    /// No seller group exists for the seller.
    #[error("Shop not found: {seller_id}")]
    ShopNotFound { seller_id: SellerId },
}
