//! Authentication route handlers.
//!
//! Sign in, sign up and sign out with email/password accounts stored in
//! `PostgreSQL`.

use axum::{
    Form, Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use bistro_core::UserId;

use crate::error::{Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::gateway::RequestLocale;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::AuthService;
use crate::state::AppState;
use crate::validation::{PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, SignInForm, SignUpForm};

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for error/success display.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Page Types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl FormField {
    const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: "text",
            required: true,
            min_length: None,
            max_length: None,
        }
    }

    const fn email() -> Self {
        Self {
            name: "email",
            kind: "email",
            required: true,
            min_length: None,
            max_length: None,
        }
    }

    const fn password(name: &'static str) -> Self {
        Self {
            name,
            kind: "password",
            required: true,
            min_length: Some(PASSWORD_MIN_LENGTH),
            max_length: Some(PASSWORD_MAX_LENGTH),
        }
    }
}

/// Description of an auth form for the client to render.
#[derive(Debug, Serialize)]
pub struct AuthPage {
    pub action: String,
    pub fields: Vec<FormField>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Body returned after a successful sign up.
#[derive(Debug, Serialize)]
pub struct SignedUp {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

// =============================================================================
// Sign In
// =============================================================================

/// `GET /{locale}/auth/signin`
pub async fn signin_page(locale: RequestLocale, Query(query): Query<MessageQuery>) -> Json<AuthPage> {
    Json(AuthPage {
        action: locale.path("/auth/signin"),
        fields: vec![FormField::email(), FormField::password("password")],
        error: query.error,
        success: query.success,
    })
}

/// `POST /{locale}/auth/signin`
///
/// Admins land on the admin dashboard, everyone else on their profile.
#[instrument(skip_all, fields(locale = %locale.locale()))]
pub async fn signin(
    State(state): State<AppState>,
    locale: RequestLocale,
    session: Session,
    Form(form): Form<SignInForm>,
) -> Result<Response> {
    let sign_in = form.validate()?;
    let user = match AuthService::new(state.pool()).sign_in(&sign_in).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, "Sign in failed");
            return Err(e.into());
        }
    };

    let current = CurrentUser::from(user);
    set_current_user(&session, &current).await?;
    set_sentry_user(&current.id, Some(current.email.as_str()));
    add_breadcrumb("auth", "Signed in", None);
    tracing::info!(user_id = %current.id, role = %current.role, "User signed in");

    let target = if current.role.is_admin() {
        locale.path("/admin")
    } else {
        locale.path("/profile")
    };
    Ok(Redirect::to(&target).into_response())
}

// =============================================================================
// Sign Up
// =============================================================================

/// `GET /{locale}/auth/signup`
pub async fn signup_page(locale: RequestLocale, Query(query): Query<MessageQuery>) -> Json<AuthPage> {
    Json(AuthPage {
        action: locale.path("/auth/signup"),
        fields: vec![
            FormField::text("name"),
            FormField::email(),
            FormField::password("password"),
            FormField::password("confirmPassword"),
        ],
        error: query.error,
        success: query.success,
    })
}

/// `POST /{locale}/auth/signup`
///
/// Creates the account without signing it in.
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignUpForm>,
) -> Result<(StatusCode, Json<SignedUp>)> {
    let sign_up = form.validate()?;
    let user = AuthService::new(state.pool()).sign_up(&sign_up).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignedUp {
            id: user.id,
            name: user.name,
            email: user.email.into_inner(),
        }),
    ))
}

// =============================================================================
// Sign Out
// =============================================================================

/// `POST /{locale}/signout`
#[instrument(skip_all)]
pub async fn signout(locale: RequestLocale, session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to(&locale.path("/")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_password_field_carries_bounds() {
        let json = serde_json::to_value(FormField::password("password")).unwrap();
        assert_eq!(json["type"], "password");
        assert_eq!(json["minLength"], 6);
        assert_eq!(json["maxLength"], 40);

        let json = serde_json::to_value(FormField::email()).unwrap();
        assert!(json.get("minLength").is_none());
    }
}
