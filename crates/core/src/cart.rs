//! Shopping cart line items and aggregation.
//!
//! A [`Cart`] is an ordered list of [`CartLine`]s, at most one per product.
//! All operations are total: they never fail on a well-formed cart, and a
//! line's quantity never drops below one (the line is removed instead).
//!
//! The cart holds a *snapshot* of each product (name, image, prices) taken when
//! it was added, so totals stay stable even if the menu changes while the
//! visitor is shopping.

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ExtraIngredient, ProductId, ProductSize};

/// Flat delivery fee added to every order.
pub const DELIVERY_FEE: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// The size chosen for a line, with the product's price for that size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeChoice {
    pub name: ProductSize,
    pub price: Decimal,
}

/// An extra ingredient chosen for a line, with the product's price for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraChoice {
    pub name: ExtraIngredient,
    pub price: Decimal,
}

/// A product snapshot as submitted by "add to cart".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub image_url: String,
    pub base_price: Decimal,
    pub size: Option<SizeChoice>,
    pub extras: Vec<ExtraChoice>,
}

/// One product in the cart, with the selected options and a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub image_url: String,
    pub base_price: Decimal,
    pub quantity: NonZeroU32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<SizeChoice>,
    #[serde(default)]
    pub extras: Vec<ExtraChoice>,
}

impl CartLine {
    fn new(item: CartItem) -> Self {
        Self {
            product_id: item.product_id,
            name: item.name,
            image_url: item.image_url,
            base_price: item.base_price,
            quantity: NonZeroU32::MIN,
            size: item.size,
            extras: item.extras,
        }
    }

    /// Price of a single unit: base price plus the size and every extra.
    /// A missing size contributes nothing.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        let size = self.size.as_ref().map_or(Decimal::ZERO, |s| s.price);
        let extras: Decimal = self.extras.iter().map(|e| e.price).sum();
        self.base_price + size + extras
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.quantity.get())
    }
}

/// A visitor's shopping cart.
///
/// Serializes as a bare JSON array of lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Quantity of the given product, or 0 if it is not in the cart.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.line(product_id).map_or(0, |line| line.quantity.get())
    }

    /// Sum of every line's quantity.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity.get()).sum()
    }

    /// Sum of every line's total, before delivery.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Subtotal plus [`DELIVERY_FEE`].
    ///
    /// The fee applies even to an empty cart; callers decide whether an empty
    /// cart can be checked out at all.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.subtotal() + DELIVERY_FEE
    }

    /// Add one unit of a product.
    ///
    /// If the product is already in the cart its quantity goes up by one and
    /// its size and extras are *replaced* by the ones in `item`. Selecting
    /// different options on a second add does not create a separate line.
    pub fn add(&mut self, item: CartItem) {
        if let Some(line) = self.line_mut(item.product_id) {
            line.quantity = line.quantity.saturating_add(1);
            line.size = item.size;
            line.extras = item.extras;
        } else {
            self.lines.push(CartLine::new(item));
        }
    }

    /// Remove one unit of a product, dropping the line when it reaches zero.
    /// Unknown products are ignored.
    pub fn decrement(&mut self, product_id: ProductId) {
        let Some(index) = self.position(product_id) else {
            return;
        };
        let Some(line) = self.lines.get_mut(index) else {
            return;
        };
        match NonZeroU32::new(line.quantity.get() - 1) {
            Some(quantity) => line.quantity = quantity,
            None => {
                self.lines.remove(index);
            }
        }
    }

    /// Remove a product regardless of its quantity.
    pub fn remove(&mut self, product_id: ProductId) {
        self.lines.retain(|line| line.product_id != product_id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.product_id == product_id)
    }

    fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    fn item(id: i32, base_price: i64) -> CartItem {
        CartItem {
            product_id: ProductId::new(id),
            name: format!("Pizza {id}"),
            image_url: format!("https://cdn.test/{id}.png"),
            base_price: dec(base_price),
            size: None,
            extras: Vec::new(),
        }
    }

    fn cheese() -> ExtraChoice {
        ExtraChoice {
            name: ExtraIngredient::Cheese,
            price: dec(2),
        }
    }

    fn onion() -> ExtraChoice {
        ExtraChoice {
            name: ExtraIngredient::Onion,
            price: dec(6),
        }
    }

    #[test]
    fn test_quantity_of_missing_product_is_zero() {
        let mut cart = Cart::new();
        assert_eq!(cart.quantity_of(ProductId::new(1)), 0);

        cart.add(item(1, 10));
        assert_eq!(cart.quantity_of(ProductId::new(2)), 0);
    }

    #[test]
    fn test_total_quantity_sums_lines() {
        let mut cart = Cart::new();
        cart.add(item(1, 10));
        cart.add(item(1, 10));
        cart.add(item(2, 7));
        cart.add(item(3, 4));
        cart.add(item(3, 4));
        cart.add(item(3, 4));

        let expected: u32 = cart.lines().iter().map(|l| l.quantity.get()).sum();
        assert_eq!(cart.total_quantity(), expected);
        assert_eq!(cart.total_quantity(), 6);
        assert_eq!(cart.quantity_of(ProductId::new(3)), 3);
    }

    #[test]
    fn test_add_then_decrement_leaves_empty_cart() {
        let mut cart = Cart::new();
        cart.add(item(1, 10));
        cart.decrement(ProductId::new(1));
        assert!(cart.is_empty());
        assert_eq!(cart, Cart::new());
    }

    #[test]
    fn test_decrement_reduces_quantity_above_one() {
        let mut cart = Cart::new();
        cart.add(item(1, 10));
        cart.add(item(1, 10));
        cart.decrement(ProductId::new(1));
        assert_eq!(cart.quantity_of(ProductId::new(1)), 1);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_decrement_unknown_product_is_noop() {
        let mut cart = Cart::new();
        cart.add(item(1, 10));
        let before = cart.clone();
        cart.decrement(ProductId::new(9));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_ignores_quantity() {
        let mut cart = Cart::new();
        for _ in 0..4 {
            cart.add(item(1, 10));
        }
        cart.add(item(2, 3));
        cart.remove(ProductId::new(1));
        assert_eq!(cart.quantity_of(ProductId::new(1)), 0);
        assert_eq!(cart.total_quantity(), 1);
    }

    #[test]
    fn test_subtotal_and_total_base_price_only() {
        let mut cart = Cart::new();
        cart.add(item(1, 10));
        cart.add(item(1, 10));
        assert_eq!(cart.subtotal(), dec(20));
        assert_eq!(cart.total(), dec(20) + DELIVERY_FEE);
        assert_eq!(cart.total(), dec(25));
    }

    #[test]
    fn test_subtotal_includes_size_and_extras() {
        let mut pizza = item(1, 10);
        pizza.size = Some(SizeChoice {
            name: ProductSize::Large,
            price: dec(4),
        });
        pizza.extras = vec![cheese(), onion()];

        let mut cart = Cart::new();
        cart.add(pizza.clone());
        cart.add(pizza);
        cart.add(item(2, 3));

        // (10 + 4 + 2 + 6) * 2 + 3
        assert_eq!(cart.subtotal(), dec(47));
        assert_eq!(cart.lines()[0].unit_price(), dec(22));
        assert_eq!(cart.lines()[0].line_total(), dec(44));
    }

    #[test]
    fn test_empty_cart_totals() {
        let cart = Cart::new();
        assert_eq!(cart.total_quantity(), 0);
        assert_eq!(cart.subtotal(), Decimal::ZERO);
        assert_eq!(cart.total(), DELIVERY_FEE);
    }

    #[test]
    fn test_repeat_add_replaces_options() {
        let mut first = item(1, 10);
        first.extras = vec![cheese()];
        first.size = Some(SizeChoice {
            name: ProductSize::Small,
            price: Decimal::ZERO,
        });

        let mut second = item(1, 10);
        second.extras = vec![onion()];

        let mut cart = Cart::new();
        cart.add(first);
        cart.add(second);

        assert_eq!(cart.lines().len(), 1);
        let line = &cart.lines()[0];
        assert_eq!(line.quantity.get(), 2);
        assert_eq!(line.extras, vec![onion()]);
        assert_eq!(line.size, None);
        // Both units are priced with the latest options.
        assert_eq!(cart.subtotal(), dec(32));
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut cart = Cart::new();
        cart.add(item(3, 1));
        cart.add(item(1, 1));
        cart.add(item(3, 1));
        let ids: Vec<i32> = cart.lines().iter().map(|l| l.product_id.as_i32()).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(item(1, 10));
        cart.add(item(2, 10));
        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_serializes_as_array() {
        let mut cart = Cart::new();
        cart.add(item(1, 10));
        let json = serde_json::to_value(&cart).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["productId"], 1);
        assert_eq!(json[0]["quantity"], 1);
        assert_eq!(json[0]["basePrice"], "10");

        let restored: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_zero_quantity_is_rejected_on_load() {
        let json = serde_json::json!([{
            "productId": 1,
            "name": "Pizza",
            "imageUrl": "x.png",
            "basePrice": "10",
            "quantity": 0
        }]);
        assert!(serde_json::from_value::<Cart>(json).is_err());
    }
}
