//! The cart snapshot exchanged with the storefront API and handed to subscribers.

use common::{Money, SellerId, de};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

use super::merge::merge_groups;
use super::{SellerGroup, ShippingAddress};

/// Seller groups plus the shipping address.
///
/// This is the unit the storefront API persists and the unit broadcast to
/// subscribers. Treat it as read-only outside the aggregate: every change goes
/// through [`ShoppingCart`](super::ShoppingCart).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Seller groups, in cart order.
    #[serde(rename = "cart", default, deserialize_with = "de::list")]
    pub groups: Vec<SellerGroup>,

    /// Delivery details.
    #[serde(default)]
    pub shipping: ShippingAddress,
}

impl CartSnapshot {
    /// Creates a snapshot from its parts without normalizing it.
    pub fn new(groups: Vec<SellerGroup>, shipping: ShippingAddress) -> Self {
        Self { groups, shipping }
    }

    /// Parses a snapshot from JSON text.
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a snapshot from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DomainError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Returns the snapshot with duplicate sellers and products merged.
    pub fn normalized(self) -> Self {
        Self {
            groups: merge_groups(self.groups),
            shipping: self.shipping,
        }
    }

    /// Returns the group for a seller.
    pub fn group(&self, users_id: SellerId) -> Option<&SellerGroup> {
        self.groups.iter().find(|group| group.users_id == users_id)
    }

    /// Sum of `price * quantity` across every group, rounded to cents once
    /// the whole sum is known.
    pub fn subtotal(&self) -> Money {
        self.groups
            .iter()
            .map(SellerGroup::subtotal)
            .sum::<Money>()
            .rounded()
    }

    /// Sum of the selected shipping methods' prices, rounded to cents.
    pub fn shipping_cost(&self) -> Money {
        self.groups
            .iter()
            .map(SellerGroup::shipping_cost)
            .sum::<Money>()
            .rounded()
    }

    /// Subtotal plus shipping cost.
    pub fn total(&self) -> Money {
        self.subtotal() + self.shipping_cost()
    }

    /// Sum of every item quantity.
    pub fn products_count(&self) -> u64 {
        self.groups.iter().map(SellerGroup::products_count).sum()
    }

    /// Returns true if no group holds any product.
    pub fn is_empty(&self) -> bool {
        self.products_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::cart::{LineItem, ShippingMethod};

    #[test]
    fn parses_wire_shape() {
        let snapshot = CartSnapshot::from_json(
            &json!({
                "cart": [{
                    "id": 1,
                    "users_id": 7,
                    "name": "Acme",
                    "products": [{ "id": 3, "users_id": 7, "price": 100, "quantity": 2 }],
                    "selectedShippingMethod": { "courier_name": "DHL", "amount": 99.5 }
                }],
                "shipping": { "street": "Main", "town_id": "3" }
            })
            .to_string(),
        )
        .unwrap();

        assert_eq!(snapshot.groups.len(), 1);
        assert_eq!(snapshot.shipping.town_id, 3);
        assert_eq!(snapshot.subtotal().cents(), 20000);
        assert_eq!(snapshot.shipping_cost().cents(), 9950);
        assert_eq!(snapshot.total().cents(), 29950);
        assert_eq!(snapshot.products_count(), 2);
    }

    #[test]
    fn totals_round_once_across_groups() {
        let snapshot = CartSnapshot::new(
            vec![
                SellerGroup::for_item(LineItem::new(1, 1, Money::from_decimal(0.005), 1)),
                SellerGroup::for_item(LineItem::new(2, 2, Money::from_decimal(0.005), 1)),
            ],
            ShippingAddress::default(),
        );

        assert_eq!(snapshot.groups[0].subtotal().cents(), 1);
        assert_eq!(snapshot.subtotal(), Money::from_cents(1));
    }

    #[test]
    fn empty_object_is_an_empty_cart() {
        let snapshot = CartSnapshot::from_json("{}").unwrap();
        assert_eq!(snapshot, CartSnapshot::default());
        assert!(snapshot.is_empty());
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let result = CartSnapshot::from_json("{\"cart\": 5");
        assert!(matches!(result, Err(DomainError::Serialization(_))));
    }

    #[test]
    fn serializes_groups_under_cart_key() {
        let snapshot = CartSnapshot::new(
            vec![SellerGroup::for_item(LineItem::new(1, 2, Money::from_cents(100), 1))],
            ShippingAddress::default(),
        );
        let value = serde_json::to_value(&snapshot).unwrap();

        assert!(value["cart"].is_array());
        assert!(value["shipping"].is_object());
        assert_eq!(value["cart"][0]["selectedShippingMethod"], json!(null));
    }

    #[test]
    fn shipping_cost_ignores_groups_without_selection() {
        let mut with_method = SellerGroup::for_item(LineItem::new(1, 1, Money::zero(), 1));
        with_method.selected_shipping_method =
            Some(ShippingMethod::new("DHL", Money::from_cents(12345)));
        let without_method = SellerGroup::for_item(LineItem::new(2, 2, Money::zero(), 1));

        let snapshot =
            CartSnapshot::new(vec![with_method, without_method], ShippingAddress::default());
        assert_eq!(snapshot.shipping_cost().cents(), 12345);
    }
}
