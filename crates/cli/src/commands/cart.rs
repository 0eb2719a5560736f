//! `mall-cli cart ...`

use clap::Subcommand;
use rust_decimal::Decimal;
use serde_json::{Value, json};

use heritage_mall_core::{ItemId, Price, Product};
use heritage_mall_store::{KeyValueStore, Store, StoreState};

use super::CliError;

#[derive(Subcommand)]
pub enum CartAction {
    /// Add one unit of a product
    Add {
        #[arg(long)]
        id: ItemId,
        #[arg(long)]
        name: String,
        /// Unit price, e.g. 59.90
        #[arg(long)]
        price: Decimal,
        #[arg(long)]
        image: Option<String>,
    },
    /// Set the quantity of a row
    Quantity {
        #[arg(long)]
        id: ItemId,
        #[arg(long)]
        quantity: u32,
    },
    /// Select or deselect a row
    Select {
        #[arg(long)]
        id: ItemId,
        /// Deselect instead of select
        #[arg(long)]
        off: bool,
    },
    /// Select or deselect every row
    SelectAll {
        #[arg(long)]
        off: bool,
    },
    /// Remove a row
    Remove {
        #[arg(long)]
        id: ItemId,
    },
    /// Remove every selected row
    RemoveSelected,
    /// Empty the cart
    Clear,
    /// Show the cart and its totals
    Show,
}

pub fn run<S: KeyValueStore>(store: &mut Store<S>, action: CartAction) -> Result<Value, CliError> {
    match action {
        CartAction::Add {
            id,
            name,
            price,
            image,
        } => {
            let mut product = Product::new(id, name, price);
            product.image = image;
            store.add_to_cart(product)?;
        }
        CartAction::Quantity { id, quantity } => store.update_cart_item_quantity(id, quantity)?,
        CartAction::Select { id, off } => store.update_cart_item_selected(id, !off)?,
        CartAction::SelectAll { off } => store.toggle_all_cart_items_selected(!off)?,
        CartAction::Remove { id } => store.remove_cart_item(id)?,
        CartAction::RemoveSelected => store.remove_selected_cart_items()?,
        CartAction::Clear => store.clear_cart()?,
        CartAction::Show => {}
    }
    Ok(summary(store.state()))
}

fn summary(state: &StoreState) -> Value {
    json!({
        "items": state.cart_items(),
        "totalItems": state.cart_total_items(),
        "totalPrice": Price::from_amount(state.cart_total_price()).to_string(),
        "selectedItems": state.selected_cart_total_items(),
        "selectedPrice": Price::from_amount(state.selected_cart_total_price()).to_string(),
        "allSelected": state.is_all_cart_items_selected(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use heritage_mall_store::{MemoryStore, StoreConfig, StoreError};

    use super::*;

    fn add(store: &mut Store<MemoryStore>, id: i64, price: Decimal) -> Value {
        run(
            store,
            CartAction::Add {
                id: ItemId::new(id),
                name: format!("Item {id}"),
                price,
                image: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_totals_are_formatted() {
        let mut store = Store::open(MemoryStore::new(), &StoreConfig::default());
        add(&mut store, 1, Decimal::new(1990, 2));
        let out = add(&mut store, 1, Decimal::new(1990, 2));
        assert_eq!(out["totalItems"], 2);
        assert_eq!(out["totalPrice"], "¥39.80");
        assert_eq!(out["allSelected"], true);

        let out = run(
            &mut store,
            CartAction::Select {
                id: ItemId::new(1),
                off: true,
            },
        )
        .unwrap();
        assert_eq!(out["selectedPrice"], "¥0.00");
    }

    #[test]
    fn test_zero_quantity_is_an_error() {
        let mut store = Store::open(MemoryStore::new(), &StoreConfig::default());
        add(&mut store, 1, Decimal::ONE);
        let err = run(
            &mut store,
            CartAction::Quantity {
                id: ItemId::new(1),
                quantity: 0,
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CliError::Store(StoreError::InvalidQuantity { .. })
        ));
    }
}
