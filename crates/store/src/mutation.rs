//! Named state transitions.
//!
//! A [`Mutation`] is plain data; [`StoreState::apply`] is the single place
//! the state changes. Applying is deterministic: anything time-dependent
//! (history entries, cancellation) carries its timestamp in the variant.

use chrono::{DateTime, Utc};

use heritage_mall_core::{
    AddressId, AddressInput, CartItem, Favorite, HistoryEntry, ItemId, Order, OrderId,
    OrderStatus, OrderTimestamp, Product,
};

use crate::error::{Result, StoreError};
use crate::state::StoreState;

/// Every operation that can change the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Insert unless an entry with the same id exists.
    AddFavorite(Favorite),
    RemoveFavorite(ItemId),

    /// Add one unit, creating a selected row if needed.
    AddToCart(Product),
    /// Fails with [`StoreError::InvalidQuantity`] for zero.
    UpdateCartItemQuantity { id: ItemId, quantity: u32 },
    RemoveCartItem(ItemId),
    ClearCart,
    UpdateCartItemSelected { id: ItemId, selected: bool },
    ToggleAllCartItemsSelected(bool),
    RemoveSelectedCartItems,

    /// Assigns the next id; a default address becomes the selected one.
    AddAddress(AddressInput),
    UpdateAddress { id: AddressId, address: AddressInput },
    DeleteAddress(AddressId),
    /// Fails with [`StoreError::NotFound`] for an unknown id.
    SetDefaultAddress(AddressId),
    /// Fails with [`StoreError::NotFound`] for an unknown id.
    SelectAddress(AddressId),

    /// Move the item to the front of the history, viewed at `time`.
    AddToHistory {
        entry: HistoryEntry,
        time: DateTime<Utc>,
    },
    RemoveFromHistory(ItemId),
    ClearHistory,

    AddOrder(Order),
    UpdateOrderStatus {
        order_id: OrderId,
        status: OrderStatus,
        stamp: Option<(OrderTimestamp, DateTime<Utc>)>,
    },
    CancelOrder {
        order_id: OrderId,
        reason: String,
        at: DateTime<Utc>,
    },
    DeleteOrder(OrderId),
}

impl Mutation {
    /// Stable operation name, used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddFavorite(_) => "addFavorite",
            Self::RemoveFavorite(_) => "removeFavorite",
            Self::AddToCart(_) => "addToCart",
            Self::UpdateCartItemQuantity { .. } => "updateCartItemQuantity",
            Self::RemoveCartItem(_) => "removeCartItem",
            Self::ClearCart => "clearCart",
            Self::UpdateCartItemSelected { .. } => "updateCartItemSelected",
            Self::ToggleAllCartItemsSelected(_) => "toggleAllCartItemsSelected",
            Self::RemoveSelectedCartItems => "removeSelectedCartItems",
            Self::AddAddress(_) => "addAddress",
            Self::UpdateAddress { .. } => "updateAddress",
            Self::DeleteAddress(_) => "deleteAddress",
            Self::SetDefaultAddress(_) => "setDefaultAddress",
            Self::SelectAddress(_) => "selectAddress",
            Self::AddToHistory { .. } => "addToHistory",
            Self::RemoveFromHistory(_) => "removeFromHistory",
            Self::ClearHistory => "clearHistory",
            Self::AddOrder(_) => "addOrder",
            Self::UpdateOrderStatus { .. } => "updateOrderStatus",
            Self::CancelOrder { .. } => "cancelOrder",
            Self::DeleteOrder(_) => "deleteOrder",
        }
    }
}

impl StoreState {
    /// Apply `mutation`. On `Err` the state is unchanged.
    pub(crate) fn apply(&mut self, mutation: Mutation, history_limit: usize) -> Result<()> {
        match mutation {
            Mutation::AddFavorite(mut item) => {
                if !self.favorites.iter().any(|f| f.id == item.id) {
                    item.strip_owned_extras();
                    self.favorites.push(item);
                }
            }
            Mutation::RemoveFavorite(id) => self.favorites.retain(|f| f.id != id),

            Mutation::AddToCart(product) => {
                match self.cart_items.iter_mut().find(|item| item.id == product.id) {
                    Some(existing) => existing.quantity = existing.quantity.saturating_add(1),
                    None => self.cart_items.push(CartItem::from_product(product)),
                }
            }
            Mutation::UpdateCartItemQuantity { id, quantity } => {
                if quantity == 0 {
                    return Err(StoreError::InvalidQuantity { id });
                }
                if let Some(item) = self.cart_item_mut(id) {
                    item.quantity = quantity;
                }
            }
            Mutation::RemoveCartItem(id) => self.cart_items.retain(|item| item.id != id),
            Mutation::ClearCart => self.cart_items.clear(),
            Mutation::UpdateCartItemSelected { id, selected } => {
                if let Some(item) = self.cart_item_mut(id) {
                    item.selected = selected;
                }
            }
            Mutation::ToggleAllCartItemsSelected(selected) => {
                for item in &mut self.cart_items {
                    item.selected = selected;
                }
            }
            Mutation::RemoveSelectedCartItems => self.cart_items.retain(|item| !item.selected),

            Mutation::AddAddress(input) => {
                let id = self.next_address_id();
                let is_default = input.is_default;
                if is_default {
                    self.clear_default_addresses();
                }
                self.addresses.push(input.with_id(id));
                if is_default {
                    self.selected_address_id = Some(id);
                }
            }
            Mutation::UpdateAddress { id, address } => {
                if !self.has_address(id) {
                    return Ok(());
                }
                let is_default = address.is_default;
                if is_default {
                    self.clear_default_addresses();
                }
                if let Some(slot) = self.addresses.iter_mut().find(|a| a.id == id) {
                    *slot = address.with_id(id);
                }
                if is_default {
                    self.selected_address_id = Some(id);
                }
            }
            Mutation::DeleteAddress(id) => {
                self.addresses.retain(|a| a.id != id);
                if self.selected_address_id == Some(id) {
                    self.selected_address_id = self.fallback_address_id();
                }
            }
            Mutation::SetDefaultAddress(id) => {
                if !self.has_address(id) {
                    return Err(StoreError::address_not_found(id));
                }
                for address in &mut self.addresses {
                    address.is_default = address.id == id;
                }
                self.selected_address_id = Some(id);
            }
            Mutation::SelectAddress(id) => {
                if !self.has_address(id) {
                    return Err(StoreError::address_not_found(id));
                }
                self.selected_address_id = Some(id);
            }

            Mutation::AddToHistory { entry, time } => {
                let item = entry.into_item(time);
                self.browse_history.retain(|h| h.id != item.id);
                self.browse_history.insert(0, item);
                self.browse_history.truncate(history_limit);
            }
            Mutation::RemoveFromHistory(id) => self.browse_history.retain(|h| h.id != id),
            Mutation::ClearHistory => self.browse_history.clear(),

            Mutation::AddOrder(mut order) => {
                order.strip_owned_extras();
                self.orders.insert(0, order);
            }
            Mutation::UpdateOrderStatus {
                order_id,
                status,
                stamp,
            } => {
                if let Some(order) = self.order_mut(order_id) {
                    order.status = status;
                    if status != OrderStatus::Cancelled {
                        order.cancel_reason = None;
                    }
                    if let Some((field, at)) = stamp {
                        order.stamp(field, at);
                    }
                }
            }
            Mutation::CancelOrder {
                order_id,
                reason,
                at,
            } => {
                if let Some(order) = self.order_mut(order_id) {
                    order.status = OrderStatus::Cancelled;
                    order.cancel_reason = Some(reason);
                    order.stamp(OrderTimestamp::Cancelled, at);
                }
            }
            Mutation::DeleteOrder(order_id) => self.orders.retain(|o| o.id != order_id),
        }
        Ok(())
    }

    /// Id the next added address will receive: one past the largest, or 1.
    #[must_use]
    pub fn next_address_id(&self) -> AddressId {
        self.addresses
            .iter()
            .map(|a| a.id)
            .max()
            .map_or(AddressId::new(1), AddressId::next)
    }

    /// Selection used after the selected address disappears: the default,
    /// else the first address, else none.
    pub(crate) fn fallback_address_id(&self) -> Option<AddressId> {
        self.addresses
            .iter()
            .find(|a| a.is_default)
            .or_else(|| self.addresses.first())
            .map(|a| a.id)
    }

    pub(crate) fn has_address(&self, id: AddressId) -> bool {
        self.addresses.iter().any(|a| a.id == id)
    }

    fn clear_default_addresses(&mut self) {
        for address in &mut self.addresses {
            address.is_default = false;
        }
    }

    fn cart_item_mut(&mut self, id: ItemId) -> Option<&mut CartItem> {
        self.cart_items.iter_mut().find(|item| item.id == id)
    }

    fn order_mut(&mut self, id: OrderId) -> Option<&mut Order> {
        self.orders.iter_mut().find(|order| order.id == id)
    }
}
