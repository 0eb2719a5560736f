//! The state container.

use chrono::{DateTime, Utc};
use tracing::{debug, instrument, warn};

use heritage_mall_core::{
    AddressId, AddressInput, Favorite, HistoryEntry, ItemId, Order, OrderId, OrderStatus,
    OrderTimestamp, Product,
};

use crate::config::StoreConfig;
use crate::error::Result;
use crate::mutation::Mutation;
use crate::persistence::{PersistedState, SnapshotSlot};
use crate::state::StoreState;
use crate::storage::KeyValueStore;

type Subscriber = Box<dyn FnMut(&Mutation, &StoreState)>;

/// Client-side state container.
///
/// Owns the state and the snapshot slot it persists into. Construct one per
/// session and pass it to whatever needs it; independent instances share
/// nothing unless they share a storage backend.
///
/// # Example
///
/// ```rust
/// use heritage_mall_core::{ItemId, Product};
/// use heritage_mall_store::{MemoryStore, Store, StoreConfig};
/// use rust_decimal::Decimal;
///
/// let mut store = Store::open(MemoryStore::new(), &StoreConfig::default());
/// let fan = Product::new(ItemId::new(7), "Silk fan", Decimal::TEN);
/// store.add_to_cart(fan.clone()).unwrap();
/// store.add_to_cart(fan).unwrap();
///
/// assert_eq!(store.state().selected_cart_total_price(), Decimal::from(20));
/// ```
pub struct Store<S: KeyValueStore> {
    state: StoreState,
    slot: SnapshotSlot<S>,
    history_limit: usize,
    subscribers: Vec<Subscriber>,
    persist_failures: u64,
}

impl<S: KeyValueStore> std::fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("key", &self.slot.key())
            .field("history_limit", &self.history_limit)
            .field("subscribers", &self.subscribers.len())
            .field("persist_failures", &self.persist_failures)
            .finish()
    }
}

impl<S: KeyValueStore> Store<S> {
    /// Open a store, restoring the snapshot found in `storage`.
    ///
    /// A missing, unreadable, or malformed snapshot is logged and replaced by
    /// the empty default state; opening never fails.
    pub fn open(storage: S, config: &StoreConfig) -> Self {
        let slot = SnapshotSlot::new(storage, config.storage_key.clone());
        let restored = slot.restore(config.history_limit);
        debug!(
            key = %slot.key(),
            favorites = restored.favorites.len(),
            cart_items = restored.cart_items.len(),
            addresses = restored.addresses.len(),
            history = restored.browse_history.len(),
            orders = restored.orders.len(),
            "store opened",
        );
        Self::assemble(slot, config, StoreState::from(restored))
    }

    /// Build a store from an explicit initial state, ignoring whatever is in
    /// `storage` until the first mutation overwrites it.
    pub fn with_state(storage: S, config: &StoreConfig, mut initial: PersistedState) -> Self {
        let repairs = initial.repair(config.history_limit);
        if !repairs.is_empty() {
            warn!(repairs = ?repairs, "initial state violated store invariants; repaired");
        }
        let slot = SnapshotSlot::new(storage, config.storage_key.clone());
        Self::assemble(slot, config, StoreState::from(initial))
    }

    fn assemble(slot: SnapshotSlot<S>, config: &StoreConfig, state: StoreState) -> Self {
        Self {
            state,
            slot,
            history_limit: config.history_limit.max(1),
            subscribers: Vec::new(),
            persist_failures: 0,
        }
    }

    /// Current state, for reading derived views.
    #[must_use]
    pub const fn state(&self) -> &StoreState {
        &self.state
    }

    /// Copy of the persisted subset as it would be written now.
    #[must_use]
    pub fn snapshot(&self) -> PersistedState {
        self.state.to_persisted()
    }

    /// The slot this store persists into.
    pub const fn slot(&self) -> &SnapshotSlot<S> {
        &self.slot
    }

    /// Number of snapshot writes that failed since the store was built.
    #[must_use]
    pub const fn persist_failures(&self) -> u64 {
        self.persist_failures
    }

    /// Register a listener called after every committed mutation, once the
    /// snapshot has been written.
    pub fn subscribe(&mut self, listener: impl FnMut(&Mutation, &StoreState) + 'static) {
        self.subscribers.push(Box::new(listener));
    }

    /// Apply a mutation, persist the new snapshot, and notify subscribers.
    ///
    /// Snapshot write failures are logged and counted, never returned: the
    /// in-memory state stays authoritative for the rest of the session.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the mutation is rejected; the state is then
    /// unchanged and nothing is written.
    #[instrument(skip_all, fields(mutation = mutation.name()))]
    pub fn commit(&mut self, mutation: Mutation) -> Result<()> {
        if let Err(error) = self.state.apply(mutation.clone(), self.history_limit) {
            debug!(error = %error, "mutation rejected");
            return Err(error);
        }
        self.state.version += 1;
        self.persist();

        for subscriber in &mut self.subscribers {
            subscriber(&mutation, &self.state);
        }
        Ok(())
    }

    fn persist(&mut self) {
        let snapshot = self.state.to_persisted();
        match self.slot.save(&snapshot) {
            Ok(()) => debug!(version = self.state.version, "snapshot saved"),
            Err(error) => {
                self.persist_failures += 1;
                warn!(
                    key = %self.slot.key(),
                    error = %error,
                    failures = self.persist_failures,
                    "failed to save snapshot; keeping in-memory state",
                );
            }
        }
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    /// Add a favorite unless one with the same id exists.
    ///
    /// # Errors
    ///
    /// Never fails; returns `Result` for uniformity with [`Store::commit`].
    pub fn add_favorite(&mut self, item: Favorite) -> Result<()> {
        self.commit(Mutation::AddFavorite(item))
    }

    /// # Errors
    ///
    /// Never fails.
    pub fn remove_favorite(&mut self, id: ItemId) -> Result<()> {
        self.commit(Mutation::RemoveFavorite(id))
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add one unit of `product`; a new row starts selected.
    ///
    /// # Errors
    ///
    /// Never fails.
    pub fn add_to_cart(&mut self, product: Product) -> Result<()> {
        self.commit(Mutation::AddToCart(product))
    }

    /// Set the quantity of a cart row. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidQuantity` if `quantity` is zero.
    pub fn update_cart_item_quantity(&mut self, id: ItemId, quantity: u32) -> Result<()> {
        self.commit(Mutation::UpdateCartItemQuantity { id, quantity })
    }

    /// # Errors
    ///
    /// Never fails.
    pub fn remove_cart_item(&mut self, id: ItemId) -> Result<()> {
        self.commit(Mutation::RemoveCartItem(id))
    }

    /// # Errors
    ///
    /// Never fails.
    pub fn clear_cart(&mut self) -> Result<()> {
        self.commit(Mutation::ClearCart)
    }

    /// # Errors
    ///
    /// Never fails.
    pub fn update_cart_item_selected(&mut self, id: ItemId, selected: bool) -> Result<()> {
        self.commit(Mutation::UpdateCartItemSelected { id, selected })
    }

    /// # Errors
    ///
    /// Never fails.
    pub fn toggle_all_cart_items_selected(&mut self, selected: bool) -> Result<()> {
        self.commit(Mutation::ToggleAllCartItemsSelected(selected))
    }

    /// # Errors
    ///
    /// Never fails.
    pub fn remove_selected_cart_items(&mut self) -> Result<()> {
        self.commit(Mutation::RemoveSelectedCartItems)
    }

    // =========================================================================
    // Addresses
    // =========================================================================

    /// Save a new address and return the id it was given.
    ///
    /// # Errors
    ///
    /// Never fails.
    pub fn add_address(&mut self, address: AddressInput) -> Result<AddressId> {
        let id = self.state.next_address_id();
        self.commit(Mutation::AddAddress(address))?;
        Ok(id)
    }

    /// Replace an address in place. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Never fails.
    pub fn update_address(&mut self, id: AddressId, address: AddressInput) -> Result<()> {
        self.commit(Mutation::UpdateAddress { id, address })
    }

    /// # Errors
    ///
    /// Never fails.
    pub fn delete_address(&mut self, id: AddressId) -> Result<()> {
        self.commit(Mutation::DeleteAddress(id))
    }

    /// Make `id` the only default address and select it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no address has this id.
    pub fn set_default_address(&mut self, id: AddressId) -> Result<()> {
        self.commit(Mutation::SetDefaultAddress(id))
    }

    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no address has this id.
    pub fn select_address(&mut self, id: AddressId) -> Result<()> {
        self.commit(Mutation::SelectAddress(id))
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Record a view of `entry` now.
    ///
    /// # Errors
    ///
    /// Never fails.
    pub fn add_to_history(&mut self, entry: HistoryEntry) -> Result<()> {
        self.add_to_history_at(entry, Utc::now())
    }

    /// Record a view of `entry` at `time`.
    ///
    /// # Errors
    ///
    /// Never fails.
    pub fn add_to_history_at(&mut self, entry: HistoryEntry, time: DateTime<Utc>) -> Result<()> {
        self.commit(Mutation::AddToHistory { entry, time })
    }

    /// # Errors
    ///
    /// Never fails.
    pub fn remove_from_history(&mut self, id: ItemId) -> Result<()> {
        self.commit(Mutation::RemoveFromHistory(id))
    }

    /// # Errors
    ///
    /// Never fails.
    pub fn clear_history(&mut self) -> Result<()> {
        self.commit(Mutation::ClearHistory)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// # Errors
    ///
    /// Never fails.
    pub fn add_order(&mut self, order: Order) -> Result<()> {
        self.commit(Mutation::AddOrder(order))
    }

    /// Move an order to `status`, optionally stamping a lifecycle field.
    ///
    /// # Errors
    ///
    /// Never fails.
    pub fn update_order_status(
        &mut self,
        order_id: OrderId,
        status: OrderStatus,
        stamp: Option<(OrderTimestamp, DateTime<Utc>)>,
    ) -> Result<()> {
        self.commit(Mutation::UpdateOrderStatus {
            order_id,
            status,
            stamp,
        })
    }

    /// Cancel an order with a reason. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Never fails.
    pub fn cancel_order(&mut self, order_id: OrderId, reason: impl Into<String>) -> Result<()> {
        self.commit(Mutation::CancelOrder {
            order_id,
            reason: reason.into(),
            at: Utc::now(),
        })
    }

    /// # Errors
    ///
    /// Never fails.
    pub fn delete_order(&mut self, order_id: OrderId) -> Result<()> {
        self.commit(Mutation::DeleteOrder(order_id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rust_decimal::Decimal;

    use heritage_mall_core::ItemKind;

    use super::*;
    use crate::error::StoreError;
    use crate::storage::MemoryStore;

    fn config() -> StoreConfig {
        StoreConfig::default()
    }

    fn address(name: &str, is_default: bool) -> AddressInput {
        AddressInput {
            name: name.to_string(),
            phone: "13600000000".to_string(),
            region: "Guangdong Foshan".to_string(),
            detail: "5 Ancestral Temple Rd".to_string(),
            is_default,
        }
    }

    #[test]
    fn test_every_commit_writes_snapshot() {
        let storage = MemoryStore::new();
        let mut store = Store::open(storage.clone(), &config());
        assert!(storage.is_empty());

        store
            .add_favorite(Favorite::new(ItemId::new(1), ItemKind::Intangible, "Guqin"))
            .unwrap();
        let raw = storage.get("mall_state").unwrap().unwrap();
        assert!(raw.contains("Guqin"));
        assert_eq!(store.state().version(), 1);
    }

    #[test]
    fn test_reopen_restores_persisted_subset() {
        let storage = MemoryStore::new();
        let mut store = Store::open(storage.clone(), &config());
        store
            .add_to_cart(Product::new(ItemId::new(7), "Tea brick", Decimal::TEN))
            .unwrap();
        let id = store.add_address(address("A", true)).unwrap();
        store.add_order(Order::new(OrderId::new(100))).unwrap();

        let reopened = Store::open(storage, &config());
        assert_eq!(reopened.snapshot(), store.snapshot());
        assert_eq!(reopened.state().selected_address_id(), Some(id));
        // In-memory-only fields start fresh.
        assert_eq!(reopened.state().version(), 0);
    }

    #[test]
    fn test_rejected_mutation_writes_nothing() {
        let storage = MemoryStore::new();
        let mut store = Store::open(storage.clone(), &config());

        let err = store.select_address(AddressId::new(1)).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert!(storage.is_empty());
        assert_eq!(store.state().version(), 0);
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let storage = MemoryStore::with_quota(8);
        let mut store = Store::open(storage.clone(), &config());

        store
            .add_to_cart(Product::new(ItemId::new(1), "Kite", Decimal::ONE))
            .unwrap();
        store
            .add_to_cart(Product::new(ItemId::new(1), "Kite", Decimal::ONE))
            .unwrap();

        assert_eq!(store.persist_failures(), 2);
        assert_eq!(store.state().cart_total_items(), 2);
        assert!(storage.is_empty());

        // Once space frees up the next commit persists everything.
        storage.set_quota(None);
        store.toggle_all_cart_items_selected(true).unwrap();
        let reopened = Store::open(storage, &config());
        assert_eq!(reopened.state().cart_total_items(), 2);
    }

    #[test]
    fn test_subscribers_see_committed_state() {
        let mut store = Store::open(MemoryStore::new(), &config());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.subscribe(move |mutation, state| {
            sink.borrow_mut()
                .push((mutation.name(), state.all_favorites().len()));
        });

        store
            .add_favorite(Favorite::new(ItemId::new(1), ItemKind::Cultural, "Mug"))
            .unwrap();
        store.remove_favorite(ItemId::new(1)).unwrap();
        let _ = store.select_address(AddressId::new(3));

        assert_eq!(
            *seen.borrow(),
            vec![("addFavorite", 1), ("removeFavorite", 0)]
        );
    }

    #[test]
    fn test_add_address_returns_assigned_id() {
        let mut store = Store::open(MemoryStore::new(), &config());
        assert_eq!(store.add_address(address("A", false)).unwrap(), AddressId::new(1));
        assert_eq!(store.add_address(address("B", false)).unwrap(), AddressId::new(2));
    }

    #[test]
    fn test_cancel_then_delete_order() {
        let mut store = Store::open(MemoryStore::new(), &config());
        store.add_order(Order::new(OrderId::new(42))).unwrap();

        store.cancel_order(OrderId::new(42), "out of stock").unwrap();
        let order = store.state().order(OrderId::new(42)).unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(order.cancel_reason.as_deref(), Some("out of stock"));
        assert!(order.cancelled_at.is_some());

        store.delete_order(OrderId::new(42)).unwrap();
        assert!(store.state().all_orders().is_empty());
    }

    #[test]
    fn test_with_state_injects_initial_state() {
        let storage = MemoryStore::new();
        storage.set("mall_state", "{\"favorites\":\"garbage\"}").unwrap();
        let initial = PersistedState {
            favorites: vec![Favorite::new(ItemId::new(5), ItemKind::Cultural, "Fan")],
            ..PersistedState::default()
        };

        let mut store = Store::with_state(storage.clone(), &config(), initial);
        assert!(store.state().is_favorite(ItemId::new(5)));

        store.remove_favorite(ItemId::new(9)).unwrap();
        let restored = Store::open(storage, &config());
        assert!(restored.state().is_favorite(ItemId::new(5)));
    }

    #[test]
    fn test_history_limit_from_config() {
        let config = StoreConfig::default().with_history_limit(3);
        let mut store = Store::open(MemoryStore::new(), &config);
        for id in 1..=5 {
            store
                .add_to_history(HistoryEntry {
                    id: ItemId::new(id),
                    ..HistoryEntry::default()
                })
                .unwrap();
        }
        let ids: Vec<i64> = store
            .state()
            .browse_history()
            .iter()
            .map(|h| h.id.get())
            .collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&5));
        assert!(!ids.contains(&1));
    }
}
