//! Shopping cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Extra, ItemId, Price, strip_owned_keys};

/// A product as handed to the cart by a product page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog item ID.
    pub id: ItemId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Unit price.
    pub price: Decimal,
    /// Remaining product fields.
    #[serde(flatten)]
    pub extra: Extra,
}

impl Product {
    /// Create a product with no extra fields.
    #[must_use]
    pub fn new(id: ItemId, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            image: None,
            price,
            extra: Extra::new(),
        }
    }
}

/// A row in the shopping cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Catalog item ID, unique within the cart.
    pub id: ItemId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Unit price.
    pub price: Decimal,
    /// Number of units, never zero.
    pub quantity: u32,
    /// Whether the row is included in checkout.
    pub selected: bool,
    /// Remaining product fields.
    #[serde(flatten)]
    pub extra: Extra,
}

impl CartItem {
    /// Wire names of the typed fields.
    pub const OWNED_KEYS: &'static [&'static str] =
        &["id", "name", "image", "price", "quantity", "selected"];

    /// A fresh cart row: one unit, selected.
    ///
    /// Product fields that a cart row owns (such as a catalog `quantity`
    /// meaning stock) are dropped from the carried extras.
    #[must_use]
    pub fn from_product(product: Product) -> Self {
        let mut item = Self {
            id: product.id,
            name: product.name,
            image: product.image,
            price: product.price,
            quantity: 1,
            selected: true,
            extra: product.extra,
        };
        item.strip_owned_extras();
        item
    }

    /// Remove extras that collide with typed fields. Returns whether any did.
    pub fn strip_owned_extras(&mut self) -> bool {
        strip_owned_keys(&mut self.extra, Self::OWNED_KEYS)
    }

    /// `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Line total as a displayable price.
    #[must_use]
    pub fn line_price(&self) -> Price {
        Price::from_amount(self.price).times(self.quantity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_product_starts_selected_with_one_unit() {
        let mut product = Product::new(ItemId::new(7), "Paper cut", Decimal::TEN);
        product
            .extra
            .insert("shop".to_string(), serde_json::json!("Foshan Studio"));

        let item = CartItem::from_product(product);
        assert_eq!(item.quantity, 1);
        assert!(item.selected);
        assert_eq!(item.extra.get("shop").unwrap(), "Foshan Studio");
    }

    #[test]
    fn test_from_product_drops_keys_the_row_owns() {
        let product: Product = serde_json::from_str(
            r#"{"id":7,"name":"Fan","price":10,"quantity":3,"selected":false,"stock":5}"#,
        )
        .unwrap();
        assert!(product.extra.contains_key("quantity"));

        let item = CartItem::from_product(product);
        assert_eq!(item.quantity, 1);
        assert!(item.selected);
        assert!(!item.extra.contains_key("quantity"));
        assert!(!item.extra.contains_key("selected"));
        assert_eq!(item.extra.get("stock").unwrap(), 5);

        let raw = serde_json::to_string(&item).unwrap();
        let back: CartItem = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_line_total() {
        let mut item = CartItem::from_product(Product::new(
            ItemId::new(1),
            "Tea set",
            Decimal::new(2550, 2),
        ));
        item.quantity = 3;
        assert_eq!(item.line_total(), Decimal::new(7650, 2));
        assert_eq!(item.line_price().to_string(), "¥76.50");
    }

    #[test]
    fn test_accepts_numeric_price() {
        let item: CartItem =
            serde_json::from_str(r#"{"id":7,"price":10,"quantity":2,"selected":true}"#).unwrap();
        assert_eq!(item.price, Decimal::TEN);
        assert_eq!(item.line_total(), Decimal::from(20));
    }
}
