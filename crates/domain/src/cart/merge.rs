//! Reconciliation of seller groups and line items.
//!
//! Snapshots coming from the storefront API may repeat a seller or a product.
//! Merging collapses the repeats so that a cart never holds two groups for the
//! same seller or two items for the same product within a group.

use std::collections::HashMap;

use common::{ProductId, SellerId};

use super::{LineItem, SellerGroup};

/// Collapses items sharing a product id by summing their quantities.
///
/// The first occurrence supplies every other field and fixes the position of
/// the merged item. Sums are not capped.
pub fn merge_items(items: Vec<LineItem>) -> Vec<LineItem> {
    let mut positions: HashMap<ProductId, usize> = HashMap::with_capacity(items.len());
    let mut merged: Vec<LineItem> = Vec::with_capacity(items.len());

    for item in items {
        match positions.get(&item.id).and_then(|&i| merged.get_mut(i)) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            }
            None => {
                positions.insert(item.id, merged.len());
                merged.push(item);
            }
        }
    }

    merged
}

/// Collapses groups sharing a seller id.
///
/// Product lists are concatenated in input order and then passed through
/// [`merge_items`]. All other group fields come from the first occurrence.
pub fn merge_groups(groups: Vec<SellerGroup>) -> Vec<SellerGroup> {
    let mut positions: HashMap<SellerId, usize> = HashMap::with_capacity(groups.len());
    let mut merged: Vec<SellerGroup> = Vec::with_capacity(groups.len());

    for group in groups {
        match positions.get(&group.users_id).and_then(|&i| merged.get_mut(i)) {
            Some(existing) => existing.products.extend(group.products),
            None => {
                positions.insert(group.users_id, merged.len());
                merged.push(group);
            }
        }
    }

    for group in &mut merged {
        group.products = merge_items(std::mem::take(&mut group.products));
    }

    merged
}
