//! Business logic services for storefront.
//!
//! - `auth` - Email and password accounts
//! - `cart` - Cart operations over session-backed storage
//! - `menu_cache` - In-memory cache for menu queries

pub mod auth;
pub mod cart;
pub mod menu_cache;

pub use cart::{CartService, CartStorage, CartStorageError, MemoryCartStorage, SessionCartStorage};
pub use menu_cache::MenuCache;
