//! Derived views over the store state.
//!
//! Every view is recomputed from the current state on each call; nothing is
//! cached, so a view can never be stale.

use rust_decimal::Decimal;

use heritage_mall_core::{
    Address, AddressId, CartItem, Favorite, HistoryItem, ItemId, ItemKind, Order, OrderId,
    OrderStatus,
};

use crate::state::StoreState;

impl StoreState {
    // =========================================================================
    // Favorites
    // =========================================================================

    #[must_use]
    pub fn all_favorites(&self) -> &[Favorite] {
        &self.favorites
    }

    /// Favorites of one catalog family, in insertion order.
    #[must_use]
    pub fn favorites_of_kind(&self, kind: ItemKind) -> Vec<&Favorite> {
        self.favorites.iter().filter(|f| f.kind == kind).collect()
    }

    #[must_use]
    pub fn intangible_favorites(&self) -> Vec<&Favorite> {
        self.favorites_of_kind(ItemKind::Intangible)
    }

    #[must_use]
    pub fn cultural_favorites(&self) -> Vec<&Favorite> {
        self.favorites_of_kind(ItemKind::Cultural)
    }

    #[must_use]
    pub fn is_favorite(&self, id: ItemId) -> bool {
        self.favorites.iter().any(|f| f.id == id)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    #[must_use]
    pub fn cart_items(&self) -> &[CartItem] {
        &self.cart_items
    }

    #[must_use]
    pub fn selected_cart_items(&self) -> Vec<&CartItem> {
        self.cart_items.iter().filter(|item| item.selected).collect()
    }

    /// Sum of `price * quantity` over the whole cart.
    #[must_use]
    pub fn cart_total_price(&self) -> Decimal {
        self.cart_items.iter().map(CartItem::line_total).sum()
    }

    /// Sum of `price * quantity` over selected rows.
    #[must_use]
    pub fn selected_cart_total_price(&self) -> Decimal {
        self.cart_items
            .iter()
            .filter(|item| item.selected)
            .map(CartItem::line_total)
            .sum()
    }

    /// Total units in the cart.
    #[must_use]
    pub fn cart_total_items(&self) -> u64 {
        self.cart_items
            .iter()
            .map(|item| u64::from(item.quantity))
            .sum()
    }

    /// Total units in selected rows.
    #[must_use]
    pub fn selected_cart_total_items(&self) -> u64 {
        self.cart_items
            .iter()
            .filter(|item| item.selected)
            .map(|item| u64::from(item.quantity))
            .sum()
    }

    /// Whether every row is selected. An empty cart is not "all selected".
    #[must_use]
    pub fn is_all_cart_items_selected(&self) -> bool {
        !self.cart_items.is_empty() && self.cart_items.iter().all(|item| item.selected)
    }

    // =========================================================================
    // Addresses
    // =========================================================================

    #[must_use]
    pub fn all_addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// The shipping address checkout should use.
    ///
    /// Resolved as: the default address, else the explicitly selected one,
    /// else the first saved address, else none.
    #[must_use]
    pub fn selected_address(&self) -> Option<&Address> {
        self.default_address()
            .or_else(|| {
                self.selected_address_id
                    .and_then(|id| self.addresses.iter().find(|a| a.id == id))
            })
            .or_else(|| self.addresses.first())
    }

    #[must_use]
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses.iter().find(|a| a.is_default)
    }

    /// The raw selection reference, before priority resolution.
    #[must_use]
    pub const fn selected_address_id(&self) -> Option<AddressId> {
        self.selected_address_id
    }

    // =========================================================================
    // History & orders
    // =========================================================================

    /// Browse history, newest first by viewing time.
    ///
    /// The sort is stable, so entries with equal times keep their stored
    /// (most-recently-added-first) order.
    #[must_use]
    pub fn browse_history(&self) -> Vec<&HistoryItem> {
        let mut history: Vec<&HistoryItem> = self.browse_history.iter().collect();
        history.sort_by(|a, b| b.time.cmp(&a.time));
        history
    }

    /// All orders, most recently added first.
    #[must_use]
    pub fn all_orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub fn orders_with_status(&self, status: OrderStatus) -> Vec<&Order> {
        self.orders.iter().filter(|o| o.status == status).collect()
    }

    #[must_use]
    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }
}
