//! Profile route handlers.

use axum::{Form, Json, extract::State};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::UserRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;
use crate::validation::ProfileForm;

/// `GET /{locale}/profile`
pub async fn show(RequireAuth(user): RequireAuth) -> Json<CurrentUser> {
    Json(user)
}

/// `POST /{locale}/profile`
///
/// Saves the profile and refreshes the copy held in the session.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Form(form): Form<ProfileForm>,
) -> Result<Json<CurrentUser>> {
    let update = form.validate()?;
    let updated = UserRepository::new(state.pool())
        .update_profile(user.id, &update)
        .await?;

    let current = CurrentUser::from(updated);
    session.insert(session_keys::CURRENT_USER, &current).await?;
    tracing::info!("Profile updated");
    Ok(Json(current))
}
