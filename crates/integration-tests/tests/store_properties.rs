//! Observable behavior of the mutation and view APIs over a real file backend.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;

use heritage_mall_core::{AddressId, Favorite, ItemId, ItemKind, Order, OrderId, OrderStatus};
use heritage_mall_integration_tests::{TestContext, address, at, product, viewed};
use heritage_mall_store::StoreError;

#[test]
fn test_favorite_is_idempotent() {
    let ctx = TestContext::new();
    let mut store = ctx.open();
    for name in ["first", "second", "third"] {
        store
            .add_favorite(Favorite::new(ItemId::new(11), ItemKind::Intangible, name))
            .unwrap();
    }

    let reopened = ctx.open();
    let favorites = reopened.state().all_favorites();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].name, "first");
}

#[test]
fn test_cart_quantity_and_selected_total() {
    let ctx = TestContext::new();
    let mut store = ctx.open();
    store.add_to_cart(product(7, 10)).unwrap();
    store.add_to_cart(product(7, 10)).unwrap();

    let state = store.state();
    assert_eq!(state.cart_items().len(), 1);
    assert_eq!(state.cart_items()[0].quantity, 2);
    assert_eq!(state.cart_items()[0].price, Decimal::TEN);
    assert_eq!(state.selected_cart_total_price(), Decimal::from(20));

    store
        .update_cart_item_selected(ItemId::new(7), false)
        .unwrap();
    assert_eq!(store.state().selected_cart_total_price(), Decimal::ZERO);
}

#[test]
fn test_zero_quantity_is_rejected_and_not_written() {
    let ctx = TestContext::new();
    let mut store = ctx.open();
    store.add_to_cart(product(7, 10)).unwrap();
    let before = std::fs::read_to_string(ctx.snapshot_path()).unwrap();

    let err = store
        .update_cart_item_quantity(ItemId::new(7), 0)
        .unwrap_err();
    assert_eq!(err, StoreError::InvalidQuantity { id: ItemId::new(7) });
    assert_eq!(std::fs::read_to_string(ctx.snapshot_path()).unwrap(), before);
    assert_eq!(store.state().cart_total_items(), 1);
}

#[test]
fn test_single_default_address() {
    let ctx = TestContext::new();
    let mut store = ctx.open();
    store.add_address(address("A", true)).unwrap();
    store.add_address(address("B", true)).unwrap();

    let state = store.state();
    let defaults: Vec<&str> = state
        .all_addresses()
        .iter()
        .filter(|a| a.is_default)
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(defaults, vec!["B"]);
    assert_eq!(state.selected_address().unwrap().name, "B");
}

#[test]
fn test_deleting_selected_address_rederives_selection() {
    let ctx = TestContext::new();
    let mut store = ctx.open();
    let a = store.add_address(address("A", false)).unwrap();
    let b = store.add_address(address("B", false)).unwrap();
    store.select_address(b).unwrap();

    store.delete_address(b).unwrap();
    assert_eq!(store.state().selected_address().unwrap().id, a);

    store.delete_address(a).unwrap();
    assert!(store.state().selected_address().is_none());
    assert_eq!(store.state().selected_address_id(), None);
}

#[test]
fn test_selecting_unknown_address_leaves_state_unchanged() {
    let ctx = TestContext::new();
    let mut store = ctx.open();
    let a = store.add_address(address("A", false)).unwrap();
    let before = store.snapshot();

    assert!(matches!(
        store.set_default_address(AddressId::new(42)),
        Err(StoreError::NotFound { .. })
    ));
    assert!(matches!(
        store.select_address(AddressId::new(42)),
        Err(StoreError::NotFound { .. })
    ));
    assert_eq!(store.snapshot(), before);
    assert_eq!(store.state().selected_address().unwrap().id, a);
}

#[test]
fn test_history_is_bounded_and_moves_repeats_to_front() {
    let ctx = TestContext::new();
    let mut store = ctx.open();
    for id in 1..=51 {
        store.add_to_history_at(viewed(id), at(id)).unwrap();
    }

    let ids: Vec<i64> = store
        .state()
        .browse_history()
        .iter()
        .map(|h| h.id.get())
        .collect();
    assert_eq!(ids.len(), 50);
    assert_eq!(ids.first(), Some(&51));
    assert_eq!(ids.last(), Some(&2));
    assert!(ids.windows(2).all(|w| w[0] > w[1]));

    store.add_to_history_at(viewed(10), at(100)).unwrap();
    let reopened = ctx.open();
    let history = reopened.state().browse_history();
    assert_eq!(history.len(), 50);
    assert_eq!(history[0].id, ItemId::new(10));
    assert_eq!(history.iter().filter(|h| h.id == ItemId::new(10)).count(), 1);
}

#[test]
fn test_cancel_then_delete_order() {
    let ctx = TestContext::new();
    let mut store = ctx.open();
    store.add_order(Order::new(OrderId::new(9))).unwrap();

    store.cancel_order(OrderId::new(9), "out of stock").unwrap();
    let order = store.state().order(OrderId::new(9)).unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);
    assert_eq!(order.cancel_reason.as_deref(), Some("out of stock"));

    store.delete_order(OrderId::new(9)).unwrap();
    assert!(ctx.open().state().all_orders().is_empty());
}

#[test]
fn test_history_limit_is_configurable() {
    let mut ctx = TestContext::new();
    ctx.config = ctx.config.clone().with_history_limit(2);
    let mut store = ctx.open();
    for id in 1..=4 {
        store.add_to_history_at(viewed(id), at(id)).unwrap();
    }
    assert_eq!(store.state().browse_history().len(), 2);
}
