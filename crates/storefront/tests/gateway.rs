//! HTTP-level tests for the request gateway.
//!
//! These drive the real router with `oneshot`, an in-memory session store and
//! a database pool that never connects. Every route exercised here is one the
//! gateway answers (or one that only reads the session), so no database is
//! needed.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
    middleware::from_fn_with_state,
    response::Response,
    routing::get,
};
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, Session};

use bistro_core::{Email, Locale, UserId, UserRole};
use bistro_storefront::{
    config::StorefrontConfig,
    gateway::{X_URL, gateway_middleware},
    middleware::{create_session_layer, session::SESSION_COOKIE_NAME},
    models::{CurrentUser, session_keys},
    routes,
    state::AppState,
};

const BASE_URL: &str = "http://bistro.test";

fn config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("postgres://nobody@127.0.0.1:1/none"),
        host: "127.0.0.1".parse().unwrap(),
        port: 3000,
        base_url: BASE_URL.to_string(),
        locales: vec![Locale::Arabic, Locale::English],
        default_locale: Locale::Arabic,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

fn state() -> AppState {
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(50))
        .connect_lazy("postgres://nobody@127.0.0.1:1/none")
        .unwrap();
    AppState::new(config(), pool)
}

fn app(store: &MemoryStore) -> Router {
    routes::router(state()).layer(create_session_layer(store.clone(), &config()))
}

/// Store a signed-in user and return the cookie that selects that session.
async fn sign_in_as(store: &MemoryStore, role: UserRole) -> String {
    let user = CurrentUser {
        id: UserId::new(1),
        name: "Sara".to_string(),
        email: Email::parse("sara@bistro.test").unwrap(),
        role,
        image_url: None,
        phone: None,
        street_address: None,
        postal_code: None,
        city: None,
        country: None,
    };
    let session = Session::new(None, Arc::new(store.clone()), None);
    session
        .insert(session_keys::CURRENT_USER, &user)
        .await
        .unwrap();
    session.save().await.unwrap();
    format!("{SESSION_COOKIE_NAME}={}", session.id().unwrap())
}

async fn send(app: Router, uri: &str, headers: &[(header::HeaderName, &str)]) -> Response {
    let mut request = Request::builder().uri(uri);
    for (name, value) in headers {
        request = request.header(name, *value);
    }
    app.oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

fn location(headers: &HeaderMap) -> &str {
    headers
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap()
}

async fn json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_missing_locale_uses_accept_language_and_keeps_query() {
    let store = MemoryStore::default();
    let response = send(
        app(&store),
        "/menu?category=pizza",
        &[(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9,ar;q=0.5")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response.headers()), "/en/menu?category=pizza");
}

#[tokio::test]
async fn test_root_redirects_to_default_locale() {
    let store = MemoryStore::default();
    let response = send(app(&store), "/", &[]).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response.headers()), "/ar");
}

#[tokio::test]
async fn test_anonymous_admin_request_is_sent_to_signin() {
    let store = MemoryStore::default();

    let response = send(app(&store), "/admin/x", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response.headers()), "/ar/admin/x");

    let response = send(app(&store), "/ar/admin/x", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response.headers()), "/ar/auth/signin");
}

#[tokio::test]
async fn test_signed_in_admin_skips_auth_pages() {
    let store = MemoryStore::default();
    let cookie = sign_in_as(&store, UserRole::Admin).await;

    let response = send(app(&store), "/en/auth/signin", &[(header::COOKIE, cookie.as_str())]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response.headers()), "/en/admin");
}

#[tokio::test]
async fn test_signed_in_user_is_kept_out_of_admin() {
    let store = MemoryStore::default();
    let cookie = sign_in_as(&store, UserRole::User).await;

    let response = send(app(&store), "/en/admin/users", &[(header::COOKIE, cookie.as_str())]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response.headers()), "/en/profile");
}

#[tokio::test]
async fn test_profile_passes_through_for_signed_in_user() {
    let store = MemoryStore::default();
    let cookie = sign_in_as(&store, UserRole::User).await;

    let response = send(app(&store), "/ar/profile", &[(header::COOKIE, cookie.as_str())]).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["email"], "sara@bistro.test");
    assert_eq!(body["role"], "USER");
}

#[tokio::test]
async fn test_pass_through_attaches_original_url() {
    let store = MemoryStore::default();
    let cookie = sign_in_as(&store, UserRole::User).await;

    let state = state();
    let echo = Router::new()
        .route(
            "/{locale}/profile",
            get(|headers: HeaderMap| async move {
                headers
                    .get(X_URL)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or_default()
                    .to_owned()
            }),
        )
        .layer(from_fn_with_state(state.clone(), gateway_middleware))
        .with_state(state)
        .layer(create_session_layer(store.clone(), &config()));

    let response = send(echo, "/en/profile?tab=address", &[(header::COOKIE, cookie.as_str())]).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], format!("{BASE_URL}/en/profile?tab=address").as_bytes());
}

#[tokio::test]
async fn test_health_is_exempt_from_locale_redirect() {
    let store = MemoryStore::default();
    let response = send(app(&store), "/health", &[]).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_empty_cart_checkout_returns_to_cart() {
    let store = MemoryStore::default();

    let response = send(app(&store), "/en/cart/count", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await["count"], 0);

    let response = send(app(&store), "/en/checkout", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response.headers()), "/en/cart");
}
