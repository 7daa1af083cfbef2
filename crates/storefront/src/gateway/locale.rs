//! Per-request locale extractor.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use url::Url;

use bistro_core::{Direction, Locale};

use super::X_URL;

/// The locale of the current request.
///
/// Read from the `x-url` header the gateway attaches, falling back to the
/// request path. Handlers take this instead of parsing the `{locale}` segment
/// themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLocale(pub Locale);

impl RequestLocale {
    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.0
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.0.direction()
    }

    /// Prefix an absolute path with this locale, e.g. `/menu` → `/en/menu`.
    #[must_use]
    pub fn path(&self, path: &str) -> String {
        if path == "/" || path.is_empty() {
            format!("/{}", self.0)
        } else {
            format!("/{}{path}", self.0)
        }
    }
}

impl<S> FromRequestParts<S> for RequestLocale
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let from_header = parts
            .headers
            .get(X_URL)
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| Url::parse(raw).ok())
            .and_then(|url| url.path_segments()?.next().and_then(parse_segment));

        from_header
            .or_else(|| locale_from_path(parts.uri.path()))
            .map(Self)
            .ok_or(StatusCode::NOT_FOUND)
    }
}

fn locale_from_path(path: &str) -> Option<Locale> {
    path.trim_start_matches('/')
        .split('/')
        .next()
        .and_then(parse_segment)
}

fn parse_segment(segment: &str) -> Option<Locale> {
    Locale::ALL
        .into_iter()
        .find(|locale| locale.code() == segment)
}
