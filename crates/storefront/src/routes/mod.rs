//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (database ping)
//!
//! GET  /{locale}                    - Home page (featured products)
//! GET  /{locale}/menu               - Full menu by category
//!
//! # Cart (JSON)
//! GET  /{locale}/cart               - Cart view with totals
//! GET  /{locale}/cart/count         - Total quantity
//! POST /{locale}/cart/add           - Add one of a product
//! POST /{locale}/cart/decrement     - Remove one of a product
//! POST /{locale}/cart/remove        - Remove a product line
//! POST /{locale}/cart/clear         - Empty the cart
//! GET  /{locale}/checkout           - Checkout summary
//!
//! # Auth
//! GET  /{locale}/auth/signin        - Sign-in form
//! POST /{locale}/auth/signin        - Sign in
//! GET  /{locale}/auth/signup        - Sign-up form
//! POST /{locale}/auth/signup        - Register
//! POST /{locale}/signout            - Sign out
//!
//! # Profile (requires auth)
//! GET  /{locale}/profile            - Current user
//! POST /{locale}/profile            - Update profile
//!
//! # Admin (requires ADMIN)
//! GET  /{locale}/admin              - Counts overview
//! GET  /{locale}/admin/users        - User list
//! ```
//!
//! Every route except `/health*` runs behind the request gateway, which
//! redirects unprefixed paths to a locale and gates auth, profile and admin
//! pages before a handler is reached.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod health;
pub mod home;
pub mod profile;

use axum::{
    Json, Router,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::gateway::gateway_middleware;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/decrement", post(cart::decrement))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signin", get(auth::signin_page).post(auth::signin))
        .route("/signup", get(auth::signup_page).post(auth::signup))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::overview))
        .route("/users", get(admin::users))
}

/// Routes that live under a `/{locale}` segment.
pub fn localized_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/menu", get(home::menu))
        .nest("/cart", cart_routes())
        .route("/checkout", get(cart::checkout))
        .nest("/auth", auth_routes())
        .route("/signout", post(auth::signout))
        .route("/profile", get(profile::show).post(profile::update))
        .nest("/admin", admin_routes())
}

/// Build the full storefront router.
///
/// The caller must wrap the result in a session layer; the gateway reads
/// the signed-in user from the session.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/{locale}", localized_routes())
        .fallback(not_found)
        .layer(from_fn_with_state(state.clone(), gateway_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
