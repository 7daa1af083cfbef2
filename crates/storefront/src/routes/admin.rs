//! Read-only admin dashboard.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use bistro_core::{UserId, UserRole};

use crate::db::{MenuRepository, UserRepository};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::User;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Overview {
    pub categories: i64,
    pub products: i64,
    pub users: i64,
}

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email.into_inner(),
            role: user.role,
        }
    }
}

/// `GET /{locale}/admin`
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn overview(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<Overview>> {
    let counts = MenuRepository::new(state.pool()).counts().await?;
    let users = UserRepository::new(state.pool()).count().await?;

    Ok(Json(Overview {
        categories: counts.categories,
        products: counts.products,
        users,
    }))
}

/// `GET /{locale}/admin/users`
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn users(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<Vec<UserSummary>>> {
    let users = UserRepository::new(state.pool()).list_all().await?;
    Ok(Json(users.into_iter().map(UserSummary::from).collect()))
}
