//! Bistro Storefront library.
//!
//! The storefront is a JSON API for a bilingual (Arabic/English) restaurant:
//! menu browsing, a session-held cart, email/password accounts, profiles and
//! a read-only admin view. Every page request passes through the
//! [`gateway`], which adds the locale prefix and enforces sign-in rules
//! before routing.
//!
//! Exposed as a library so the binary, the CLI and the integration tests
//! share one router and one set of repositories.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;
