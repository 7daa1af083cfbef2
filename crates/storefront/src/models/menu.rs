//! Menu domain types.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use bistro_core::{
    CartItem, CategoryId, ExtraChoice, ExtraId, ExtraIngredient, ProductId, ProductSize, SizeChoice,
    SizeId,
};

/// A menu section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub sort_order: i32,
}

/// A size a product is offered in, with its surcharge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeOption {
    pub id: SizeId,
    pub name: ProductSize,
    pub price: Decimal,
}

/// An extra ingredient a product can carry, with its surcharge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtraOption {
    pub id: ExtraId,
    pub name: ExtraIngredient,
    pub price: Decimal,
}

/// A menu item with all of its options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub base_price: Decimal,
    pub sort_order: i32,
    pub category_id: CategoryId,
    pub sizes: Vec<SizeOption>,
    pub extras: Vec<ExtraOption>,
}

/// A category and its products, in menu order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryWithProducts {
    #[serde(flatten)]
    pub category: Category,
    pub products: Vec<Product>,
}

/// A selected option the product does not offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("size {0:?} is not offered for this product")]
    UnknownSize(ProductSize),
    #[error("extra {0:?} is not offered for this product")]
    UnknownExtra(ExtraIngredient),
}

impl Product {
    /// Snapshot this product with the chosen options, priced from the menu.
    ///
    /// Repeated extras are kept once.
    ///
    /// # Errors
    ///
    /// Returns `OptionError` if a size or extra is not offered by the product.
    pub fn cart_item(
        &self,
        size: Option<ProductSize>,
        extras: &[ExtraIngredient],
    ) -> Result<CartItem, OptionError> {
        let size = size
            .map(|name| {
                self.sizes
                    .iter()
                    .find(|s| s.name == name)
                    .map(|s| SizeChoice {
                        name,
                        price: s.price,
                    })
                    .ok_or(OptionError::UnknownSize(name))
            })
            .transpose()?;

        let mut chosen: Vec<ExtraChoice> = Vec::with_capacity(extras.len());
        for &name in extras {
            if chosen.iter().any(|e| e.name == name) {
                continue;
            }
            let option = self
                .extras
                .iter()
                .find(|e| e.name == name)
                .ok_or(OptionError::UnknownExtra(name))?;
            chosen.push(ExtraChoice {
                name,
                price: option.price,
            });
        }

        Ok(CartItem {
            product_id: self.id,
            name: self.name.clone(),
            image_url: self.image_url.clone(),
            base_price: self.base_price,
            size,
            extras: chosen,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pizza() -> Product {
        Product {
            id: ProductId::new(7),
            name: "Margherita".to_string(),
            description: "Tomato and mozzarella".to_string(),
            image_url: "/static/margherita.png".to_string(),
            base_price: Decimal::new(1000, 2),
            sort_order: 1,
            category_id: CategoryId::new(1),
            sizes: vec![
                SizeOption {
                    id: SizeId::new(1),
                    name: ProductSize::Small,
                    price: Decimal::ZERO,
                },
                SizeOption {
                    id: SizeId::new(2),
                    name: ProductSize::Large,
                    price: Decimal::new(400, 2),
                },
            ],
            extras: vec![ExtraOption {
                id: ExtraId::new(1),
                name: ExtraIngredient::Cheese,
                price: Decimal::new(150, 2),
            }],
        }
    }

    #[test]
    fn test_cart_item_uses_menu_prices() {
        let item = pizza()
            .cart_item(Some(ProductSize::Large), &[ExtraIngredient::Cheese])
            .unwrap();
        assert_eq!(item.product_id, ProductId::new(7));
        assert_eq!(item.size.unwrap().price, Decimal::new(400, 2));
        assert_eq!(item.extras.len(), 1);
        assert_eq!(item.extras[0].price, Decimal::new(150, 2));
    }

    #[test]
    fn test_cart_item_without_options() {
        let item = pizza().cart_item(None, &[]).unwrap();
        assert!(item.size.is_none());
        assert!(item.extras.is_empty());
    }

    #[test]
    fn test_cart_item_rejects_unknown_options() {
        assert_eq!(
            pizza().cart_item(Some(ProductSize::Medium), &[]),
            Err(OptionError::UnknownSize(ProductSize::Medium))
        );
        assert_eq!(
            pizza().cart_item(None, &[ExtraIngredient::Bacon]),
            Err(OptionError::UnknownExtra(ExtraIngredient::Bacon))
        );
    }

    #[test]
    fn test_cart_item_dedupes_extras() {
        let item = pizza()
            .cart_item(None, &[ExtraIngredient::Cheese, ExtraIngredient::Cheese])
            .unwrap();
        assert_eq!(item.extras.len(), 1);
    }
}
