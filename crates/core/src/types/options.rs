//! Product option names.
//!
//! Products are offered in a fixed set of sizes and may carry any of a fixed
//! set of extra ingredients. Each product stores its own price per option.

use serde::{Deserialize, Serialize};

/// A size a product can be ordered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "size_name", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductSize {
    Small,
    Medium,
    Large,
}

/// An extra ingredient that can be added to a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "extra_ingredient", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExtraIngredient {
    Cheese,
    Bacon,
    Tomato,
    Onion,
    Pepper,
}
