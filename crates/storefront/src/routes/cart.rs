//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Products are re-read from the
//! database on "add" so the stored snapshot carries current menu prices.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use bistro_core::{
    Cart, CartLine, DELIVERY_FEE, ExtraChoice, ExtraIngredient, Price, ProductId, ProductSize,
    SizeChoice,
};

use crate::db::MenuRepository;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::gateway::RequestLocale;
use crate::services::{CartService, SessionCartStorage};
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// An amount with its formatted currency string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Amount {
    pub amount: Decimal,
    pub display: String,
}

impl From<Decimal> for Amount {
    fn from(amount: Decimal) -> Self {
        Self {
            amount,
            display: Price::usd(amount).display(),
        }
    }
}

/// One cart line as shown to the visitor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub product_id: ProductId,
    pub name: String,
    pub image_url: String,
    pub quantity: u32,
    pub size: Option<SizeChoice>,
    pub extras: Vec<ExtraChoice>,
    pub unit_price: Amount,
    pub line_total: Amount,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            name: line.name.clone(),
            image_url: line.image_url.clone(),
            quantity: line.quantity.get(),
            size: line.size.clone(),
            extras: line.extras.clone(),
            unit_price: line.unit_price().into(),
            line_total: line.line_total().into(),
        }
    }
}

/// Cart totals without the lines.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub total_quantity: u32,
    pub subtotal: Amount,
    pub delivery_fee: Amount,
    pub total: Amount,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        Self {
            total_quantity: cart.total_quantity(),
            subtotal: cart.subtotal().into(),
            delivery_fee: DELIVERY_FEE.into(),
            total: cart.total().into(),
        }
    }
}

/// The full cart view.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    #[serde(flatten)]
    pub totals: CartTotals,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            totals: cart.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u32,
}

// =============================================================================
// Requests
// =============================================================================

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    pub product_id: ProductId,
    pub size: Option<ProductSize>,
    #[serde(default)]
    pub extras: Vec<ExtraIngredient>,
}

/// Request body naming a product already in the cart.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub product_id: ProductId,
}

fn cart_service(session: Session) -> CartService<SessionCartStorage> {
    CartService::new(SessionCartStorage::new(session))
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /{locale}/cart`
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let cart = cart_service(session).snapshot().await?;
    Ok(Json(CartView::from(&cart)))
}

/// `GET /{locale}/cart/count`
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<CartCount>> {
    let cart = cart_service(session).snapshot().await?;
    Ok(Json(CartCount {
        count: cart.total_quantity(),
    }))
}

/// `POST /{locale}/cart/add`
#[instrument(skip(state, session), fields(product_id = %request.product_id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddToCart>,
) -> Result<Json<CartView>> {
    let product = MenuRepository::new(state.pool())
        .product(request.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", request.product_id)))?;

    let item = product
        .cart_item(request.size, &request.extras)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let cart = cart_service(session).add(item).await?;
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", &request.product_id.to_string())]),
    );
    Ok(Json(CartView::from(&cart)))
}

/// `POST /{locale}/cart/decrement`
#[instrument(skip(session), fields(product_id = %request.product_id))]
pub async fn decrement(session: Session, Json(request): Json<ProductRef>) -> Result<Json<CartView>> {
    let cart = cart_service(session).decrement(request.product_id).await?;
    Ok(Json(CartView::from(&cart)))
}

/// `POST /{locale}/cart/remove`
#[instrument(skip(session), fields(product_id = %request.product_id))]
pub async fn remove(session: Session, Json(request): Json<ProductRef>) -> Result<Json<CartView>> {
    let cart = cart_service(session).remove(request.product_id).await?;
    Ok(Json(CartView::from(&cart)))
}

/// `POST /{locale}/cart/clear`
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartView>> {
    let cart = cart_service(session).clear().await?;
    Ok(Json(CartView::from(&cart)))
}

/// `GET /{locale}/checkout`
///
/// An empty cart cannot be checked out and is sent back to the cart page.
#[instrument(skip(session))]
pub async fn checkout(locale: RequestLocale, session: Session) -> Result<Response> {
    let cart = cart_service(session).snapshot().await?;
    if cart.is_empty() {
        return Ok(Redirect::to(&locale.path("/cart")).into_response());
    }
    Ok(Json(CartTotals::from(&cart)).into_response())
}
