//! Shared types for the storefront cart.
//!
//! Identifier newtypes, the cent-based [`Money`] amount and the lenient
//! decoders in [`de`] that turn loosely typed network payloads into strict
//! Rust values.

pub mod de;
mod money;
mod types;

pub use money::Money;
pub use types::{ProductId, SellerId, ShopId};
