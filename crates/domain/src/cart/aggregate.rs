//! Shopping cart aggregate implementation.

use chrono::Utc;
use common::{Money, SellerId};

use super::{
    CartError, CartSnapshot, LineItem, MAX_QUANTITY, SellerGroup, ShippingAddress,
    ShippingMethod, ShippingQuote, SubscriberRegistry, Subscription, merge::merge_items,
};

/// Mutations reported to logs and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Reload,
    AddToCart,
    UpdateQuantity,
    RemoveProduct,
    SetShipping,
    SetShippingQuotes,
    SetShippingMethod,
}

impl Operation {
    fn as_str(&self) -> &'static str {
        match self {
            Operation::Reload => "reload",
            Operation::AddToCart => "add_to_cart",
            Operation::UpdateQuantity => "update_quantity",
            Operation::RemoveProduct => "remove_product",
            Operation::SetShipping => "set_shipping",
            Operation::SetShippingQuotes => "set_shipping_quotes",
            Operation::SetShippingMethod => "set_shipping_method",
        }
    }
}

/// Cart aggregate root.
///
/// Holds one buyer's seller groups and shipping address, and notifies
/// subscribers after every successful mutation. All state changes go through
/// these methods; returned slices and references are read-only views.
///
/// Mutations run to completion, notification included, before returning. The
/// aggregate does no I/O.
#[derive(Debug, Default)]
pub struct ShoppingCart {
    state: CartSnapshot,
    subscribers: SubscriberRegistry,
}

impl ShoppingCart {
    /// Creates an empty cart with a blank shipping address.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a cart from a persisted snapshot, merging duplicate sellers
    /// and products.
    pub fn from_snapshot(snapshot: CartSnapshot) -> Self {
        Self {
            state: snapshot.normalized(),
            subscribers: SubscriberRegistry::new(),
        }
    }

    /// Registers a callback invoked with the cart after every mutation.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&CartSnapshot) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Resets groups and shipping, and drops every subscriber.
    ///
    /// Nobody is notified of the reset itself.
    pub fn clear(&mut self) {
        self.state = CartSnapshot::default();
        self.subscribers.clear();
        tracing::debug!("cart cleared");
    }
}

// Query methods
impl ShoppingCart {
    /// Returns the current snapshot.
    pub fn cart(&self) -> &CartSnapshot {
        &self.state
    }

    /// Returns the seller groups in cart order.
    pub fn groups(&self) -> &[SellerGroup] {
        &self.state.groups
    }

    /// Returns the shipping address, blank until one has been set.
    pub fn shipping(&self) -> &ShippingAddress {
        &self.state.shipping
    }

    /// Sum of `price * quantity` across every group.
    pub fn subtotal(&self) -> Money {
        self.state.subtotal()
    }

    /// Sum of the selected shipping methods' prices.
    pub fn shipping_cost(&self) -> Money {
        self.state.shipping_cost()
    }

    /// Subtotal plus shipping cost.
    pub fn total(&self) -> Money {
        self.state.total()
    }

    /// Sum of every item quantity.
    pub fn products_count(&self) -> u64 {
        self.state.products_count()
    }
}

// Command methods
impl ShoppingCart {
    /// Replaces the whole cart with an authoritative snapshot.
    ///
    /// Duplicate sellers are merged and duplicate products within a seller
    /// have their quantities summed.
    pub fn set_cart(&mut self, snapshot: CartSnapshot) -> &CartSnapshot {
        self.state = snapshot.normalized();
        self.notify(Operation::Reload);
        &self.state
    }

    /// Adds a product, or sets the quantity of a product already in the cart.
    ///
    /// The quantity is clamped to [`MAX_QUANTITY`]. An existing item has its
    /// quantity replaced, not increased. A seller without a group gets a new
    /// one.
    pub fn add_to_cart(&mut self, item: LineItem) -> &[SellerGroup] {
        let mut item = item;
        item.quantity = clamp_quantity(u64::from(item.quantity));

        match self
            .state
            .groups
            .iter_mut()
            .find(|group| group.users_id == item.users_id)
        {
            None => self.state.groups.push(SellerGroup::for_item(item)),
            Some(group) => {
                match group.products.iter_mut().find(|p| p.id == item.id) {
                    Some(existing) => existing.quantity = item.quantity,
                    None => group.products.push(item),
                }
                group.timestamp = Utc::now();
            }
        }

        self.notify(Operation::AddToCart);
        &self.state.groups
    }

    /// Sets a quantity within the seller group of `item`.
    ///
    /// Only the seller id of `item` is used. The group's items are merged and
    /// the quantity is applied to the first of them. A quantity of zero or
    /// less removes that item, and a group left without items is removed.
    /// Unknown sellers are ignored.
    pub fn update_product_quantity(&mut self, item: &LineItem, quantity: i64) -> &[SellerGroup] {
        let Some(index) = self.group_index(item.users_id) else {
            return &self.state.groups;
        };

        let mut emptied = false;
        if let Some(group) = self.state.groups.get_mut(index) {
            let mut products = merge_items(std::mem::take(&mut group.products));

            if quantity <= 0 {
                if !products.is_empty() {
                    products.remove(0);
                }
            } else if let Some(first) = products.first_mut() {
                first.quantity = clamp_quantity(quantity.unsigned_abs());
            }

            group.products = products;
            group.timestamp = Utc::now();
            emptied = group.products.is_empty();
        }

        if emptied {
            self.state.groups.remove(index);
        }

        self.notify(Operation::UpdateQuantity);
        &self.state.groups
    }

    /// Removes a product from its seller group.
    ///
    /// The group stays in the cart even when this empties it. Unknown sellers
    /// are ignored.
    pub fn remove_product_from_cart(&mut self, item: &LineItem) -> &[SellerGroup] {
        let Some(index) = self.group_index(item.users_id) else {
            return &self.state.groups;
        };

        if let Some(group) = self.state.groups.get_mut(index) {
            group.products.retain(|product| product.id != item.id);
        }

        self.notify(Operation::RemoveProduct);
        &self.state.groups
    }

    /// Validates and stores the buyer's shipping address.
    pub fn set_shipping(
        &mut self,
        address: ShippingAddress,
    ) -> Result<&ShippingAddress, CartError> {
        let missing = address.missing_fields();
        if !missing.is_empty() {
            return Err(CartError::InvalidShippingInformation { missing });
        }

        self.state.shipping = address;
        self.notify(Operation::SetShipping);
        Ok(&self.state.shipping)
    }

    /// Attaches shipping quotes to the matching seller groups.
    ///
    /// Each quote's offers are sorted by price. A matching group keeps only
    /// that quote and selects its cheapest offer, or nothing if the quote has
    /// no offers. Groups without a quote are left alone.
    pub fn set_shipping_quotes(
        &mut self,
        quotes: Option<Vec<ShippingQuote>>,
    ) -> Result<&[SellerGroup], CartError> {
        let mut quotes = quotes.ok_or(CartError::InvalidShippingQuotes)?;
        for quote in &mut quotes {
            quote.sort_rates();
        }

        for group in &mut self.state.groups {
            if let Some(quote) = quotes.iter().find(|q| q.users_id == group.users_id) {
                group.selected_shipping_method = quote.cheapest().cloned();
                group.shipping_quotes = vec![quote.clone()];
            }
        }

        self.notify(Operation::SetShippingQuotes);
        Ok(&self.state.groups)
    }

    /// Selects a shipping method for a seller group.
    ///
    /// The touched group moves to the end of the cart.
    pub fn set_shipping_method(
        &mut self,
        users_id: Option<SellerId>,
        method: Option<ShippingMethod>,
    ) -> Result<ShippingMethod, CartError> {
        let (Some(users_id), Some(method)) = (users_id, method) else {
            return Err(CartError::InvalidShopOrMethod);
        };
        let index = self
            .group_index(users_id)
            .ok_or(CartError::ShopNotFound { seller_id: users_id })?;

        let mut group = self.state.groups.remove(index);
        group.selected_shipping_method = Some(method.clone());
        self.state.groups.push(group);

        self.notify(Operation::SetShippingMethod);
        Ok(method)
    }
}

impl ShoppingCart {
    fn group_index(&self, users_id: SellerId) -> Option<usize> {
        self.state
            .groups
            .iter()
            .position(|group| group.users_id == users_id)
    }

    fn notify(&self, operation: Operation) {
        metrics::counter!("cart_mutations_total", "operation" => operation.as_str()).increment(1);
        tracing::debug!(
            operation = operation.as_str(),
            groups = self.state.groups.len(),
            products = self.state.products_count(),
            "cart mutated"
        );

        let notified = self.subscribers.notify(&self.state);
        metrics::counter!("cart_subscriber_notifications_total").increment(notified as u64);
    }
}

fn clamp_quantity(requested: u64) -> u32 {
    if requested > u64::from(MAX_QUANTITY) {
        tracing::warn!(
            requested,
            max = MAX_QUANTITY,
            "requested quantity exceeds the per-item maximum, clamping"
        );
        metrics::counter!("cart_quantity_clamped_total").increment(1);
        MAX_QUANTITY
    } else {
        // Lossless: requested <= MAX_QUANTITY.
        requested as u32
    }
}
