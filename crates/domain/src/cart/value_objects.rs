//! Line items and seller groups.

use chrono::{DateTime, Utc};
use common::{Money, ProductId, SellerId, ShopId, de};
use serde::{Deserialize, Serialize};

use super::shipping::{ShippingMethod, ShippingQuote};

/// A product and its quantity inside a seller group.
///
/// Deserialization is the normalization step: unknown fields are dropped,
/// missing ones take their zero value and numeric fields are coerced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// The product identifier. Unique within its seller group.
    #[serde(default)]
    pub id: ProductId,

    /// Display name.
    #[serde(default, deserialize_with = "de::text")]
    pub name: String,

    /// Image reference.
    #[serde(default, deserialize_with = "de::text")]
    pub image: String,

    /// The seller that owns the product.
    #[serde(default)]
    pub users_id: SellerId,

    /// Unit price.
    #[serde(default)]
    pub price: Money,

    /// Whether the discount applies.
    #[serde(rename = "activateDiscount", default, deserialize_with = "de::flag")]
    pub activate_discount: bool,

    /// Discount percentage.
    #[serde(default, deserialize_with = "de::integer")]
    pub discount: u32,

    /// Whether the product ships for free.
    #[serde(rename = "hasFreeShipping", default, deserialize_with = "de::flag")]
    pub has_free_shipping: bool,

    /// Brand label.
    #[serde(default, deserialize_with = "de::text")]
    pub brand: String,

    /// Variant identifier, if the product has variants.
    #[serde(default, deserialize_with = "de::optional_text")]
    pub modelo: Option<String>,

    /// Delivery lead time as shown to the buyer.
    #[serde(default, deserialize_with = "de::text")]
    pub delivery_time: String,

    /// Quantity in the cart.
    #[serde(default, deserialize_with = "de::integer")]
    pub quantity: u32,
}

impl LineItem {
    /// Creates a line item with the fields that drive cart arithmetic.
    pub fn new(
        id: impl Into<ProductId>,
        users_id: impl Into<SellerId>,
        price: Money,
        quantity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            users_id: users_id.into(),
            price,
            quantity,
            ..Self::default()
        }
    }

    /// A bare reference to a product of a seller, as used by removal and
    /// quantity updates.
    pub fn reference(users_id: impl Into<SellerId>, id: impl Into<ProductId>) -> Self {
        Self {
            id: id.into(),
            users_id: users_id.into(),
            ..Self::default()
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns `price * quantity`, unrounded.
    pub fn subtotal(&self) -> Money {
        self.price.multiply(self.quantity)
    }
}

/// Everything in the cart that belongs to one seller ("shop").
///
/// Shipping is quoted and paid per seller, so quotes and the selected method
/// live here rather than on the cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SellerGroup {
    /// The shop record identifier.
    #[serde(default)]
    pub id: ShopId,

    /// Shop display name.
    #[serde(default, deserialize_with = "de::text")]
    pub name: String,

    /// The seller. Groups are keyed by this field.
    #[serde(default)]
    pub users_id: SellerId,

    /// Shop image reference.
    #[serde(default, deserialize_with = "de::text")]
    pub image: String,

    /// Shop location label.
    #[serde(default, deserialize_with = "de::text")]
    pub location: String,

    /// When the group was last touched by a cart mutation.
    #[serde(
        default,
        serialize_with = "chrono::serde::ts_milliseconds::serialize",
        deserialize_with = "de::timestamp_millis"
    )]
    pub timestamp: DateTime<Utc>,

    /// Orderable items.
    #[serde(default, deserialize_with = "de::list")]
    pub products: Vec<LineItem>,

    /// Items that are in the cart but can no longer be ordered.
    #[serde(
        rename = "unavailableProducts",
        default,
        deserialize_with = "de::list"
    )]
    pub unavailable_products: Vec<LineItem>,

    /// Shipping quotes obtained for this seller.
    #[serde(rename = "shippingQuotes", default, deserialize_with = "de::list")]
    pub shipping_quotes: Vec<ShippingQuote>,

    /// The delivery offer the buyer picked, if any.
    #[serde(rename = "selectedShippingMethod", default)]
    pub selected_shipping_method: Option<ShippingMethod>,
}

impl SellerGroup {
    /// Starts a new group for a seller holding a single item.
    pub fn for_item(item: LineItem) -> Self {
        Self {
            users_id: item.users_id,
            timestamp: Utc::now(),
            products: vec![item],
            ..Self::default()
        }
    }

    /// Sum of the item subtotals, unrounded.
    pub fn subtotal(&self) -> Money {
        self.products.iter().map(LineItem::subtotal).sum()
    }

    /// Price of the selected shipping method, zero if none is selected.
    pub fn shipping_cost(&self) -> Money {
        self.selected_shipping_method
            .as_ref()
            .map(|method| method.amount)
            .unwrap_or_default()
    }

    /// Sum of item quantities.
    pub fn products_count(&self) -> u64 {
        self.products.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Returns the item for a product, if present.
    pub fn product(&self, id: ProductId) -> Option<&LineItem> {
        self.products.iter().find(|item| item.id == id)
    }
}
