//! In-memory state held by the store.

use heritage_mall_core::{Address, AddressId, CartItem, Favorite, HistoryItem, Order};

use crate::persistence::PersistedState;

/// The canonical in-memory state.
///
/// Fields are private: the only way to change them is a [`crate::Mutation`]
/// committed through [`crate::Store`]. Read access goes through the derived
/// views defined on this type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoreState {
    pub(crate) favorites: Vec<Favorite>,
    pub(crate) cart_items: Vec<CartItem>,
    pub(crate) addresses: Vec<Address>,
    pub(crate) selected_address_id: Option<AddressId>,
    pub(crate) browse_history: Vec<HistoryItem>,
    pub(crate) orders: Vec<Order>,
    /// Bumped on every committed mutation. Not persisted.
    pub(crate) version: u64,
}

impl StoreState {
    /// Copy out the persisted subset.
    #[must_use]
    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            favorites: self.favorites.clone(),
            cart_items: self.cart_items.clone(),
            addresses: self.addresses.clone(),
            selected_address_id: self.selected_address_id,
            browse_history: self.browse_history.clone(),
            orders: self.orders.clone(),
        }
    }

    /// Monotonic change counter, starting at 0 for a freshly built state.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }
}

impl From<PersistedState> for StoreState {
    /// Restored fields override the defaults; in-memory-only fields start fresh.
    fn from(persisted: PersistedState) -> Self {
        Self {
            favorites: persisted.favorites,
            cart_items: persisted.cart_items,
            addresses: persisted.addresses,
            selected_address_id: persisted.selected_address_id,
            browse_history: persisted.browse_history,
            orders: persisted.orders,
            ..Self::default()
        }
    }
}
