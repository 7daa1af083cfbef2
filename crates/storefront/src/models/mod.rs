//! Domain models for storefront.
//!
//! - `menu` - Categories, products and their options
//! - `session` - Types stored in the visitor session
//! - `user` - Registered accounts

pub mod menu;
pub mod session;
pub mod user;

pub use menu::{Category, CategoryWithProducts, ExtraOption, OptionError, Product, SizeOption};
pub use session::{CurrentUser, keys as session_keys};
pub use user::{ProfileUpdate, User};
