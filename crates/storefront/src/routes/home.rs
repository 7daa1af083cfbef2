//! Home and menu page handlers.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use bistro_core::{Direction, Locale};

use crate::error::Result;
use crate::gateway::RequestLocale;
use crate::middleware::OptionalAuth;
use crate::models::{CategoryWithProducts, CurrentUser, Product};
use crate::services::menu_cache::FEATURED_LIMIT;
use crate::state::AppState;

/// Data every page needs to render its chrome.
#[derive(Debug, Serialize)]
pub struct PageContext {
    pub locale: Locale,
    pub direction: Direction,
    pub user: Option<CurrentUser>,
}

impl PageContext {
    fn new(locale: RequestLocale, user: Option<CurrentUser>) -> Self {
        Self {
            locale: locale.locale(),
            direction: locale.direction(),
            user,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HomePage {
    #[serde(flatten)]
    pub page: PageContext,
    pub featured: Arc<Vec<Product>>,
}

#[derive(Debug, Serialize)]
pub struct MenuPage {
    #[serde(flatten)]
    pub page: PageContext,
    pub categories: Arc<Vec<CategoryWithProducts>>,
}

/// `GET /{locale}`
#[instrument(skip_all, fields(locale = %locale.locale()))]
pub async fn home(
    State(state): State<AppState>,
    locale: RequestLocale,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<HomePage>> {
    let featured = state.menu().featured(state.pool(), FEATURED_LIMIT).await?;
    Ok(Json(HomePage {
        page: PageContext::new(locale, user),
        featured,
    }))
}

/// `GET /{locale}/menu`
#[instrument(skip_all, fields(locale = %locale.locale()))]
pub async fn menu(
    State(state): State<AppState>,
    locale: RequestLocale,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<MenuPage>> {
    let categories = state.menu().menu(state.pool()).await?;
    Ok(Json(MenuPage {
        page: PageContext::new(locale, user),
        categories,
    }))
}
