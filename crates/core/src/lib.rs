//! Bistro Core - Shared domain types library.
//!
//! This crate provides the types used across all Bistro components:
//! - `storefront` - Public menu, cart, auth and admin HTTP service
//! - `cli` - Command-line tools for migrations, seeding and user roles
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. This keeps the cart arithmetic testable in isolation and
//! usable anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, prices, locales and roles
//! - [`cart`] - Cart line items and the aggregation/mutation rules

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartItem, CartLine, DELIVERY_FEE, ExtraChoice, SizeChoice};
pub use types::*;
