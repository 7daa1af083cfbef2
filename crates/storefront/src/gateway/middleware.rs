//! axum glue for the request gateway.

use axum::{
    extract::{Request, State},
    http::{HeaderValue, header::ACCEPT_LANGUAGE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use super::{Decision, GuardContext, LocaleResolution, is_exempt, run_guards};
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Internal header carrying the original request URL to handlers.
pub const X_URL: &str = "x-url";

/// Locale redirect, session lookup, and auth guards for every page request.
///
/// Must run inside the session layer so the [`Session`] extension is present.
pub async fn gateway_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    if is_exempt(&path) {
        return next.run(request).await;
    }

    let gateway = state.gateway();
    let accept_language = request
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok());

    let (locale, rest) = match gateway.resolve_locale(&path, request.uri().query(), accept_language)
    {
        LocaleResolution::Prefixed { locale, rest } => (locale, rest),
        LocaleResolution::Redirect(target) => {
            tracing::debug!(%path, %target, "locale redirect");
            return Redirect::to(&target).into_response();
        }
    };

    let session = request.extensions().get::<Session>().cloned();
    let user = current_user(session).await;
    let ctx = GuardContext {
        locale,
        rest,
        user: user.as_ref(),
    };
    if let Decision::Redirect(target) = run_guards(gateway, &ctx) {
        return Redirect::to(&target).into_response();
    }

    let path_and_query = request
        .uri()
        .path_and_query()
        .map_or(path.as_str(), |pq| pq.as_str());
    let original_url = format!("{}{path_and_query}", state.config().base_url);
    match HeaderValue::from_str(&original_url) {
        Ok(value) => {
            request.headers_mut().insert(X_URL, value);
        }
        Err(e) => {
            request.headers_mut().remove(X_URL);
            tracing::warn!(error = %e, "could not encode x-url header");
        }
    }

    next.run(request).await
}

/// Read the signed-in user from the session, treating any failure as anonymous.
async fn current_user(session: Option<Session>) -> Option<CurrentUser> {
    let session = session?;
    match session.get::<CurrentUser>(session_keys::CURRENT_USER).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, "unreadable session, continuing anonymously");
            None
        }
    }
}
