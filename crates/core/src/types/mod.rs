//! Core types for Bistro.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod locale;
pub mod options;
pub mod price;
pub mod role;

pub use email::{Email, EmailError};
pub use id::*;
pub use locale::{Direction, Locale, LocaleError};
pub use options::{ExtraIngredient, ProductSize};
pub use price::{CurrencyCode, Price};
pub use role::UserRole;
