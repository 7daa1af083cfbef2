//! Request gateway: locale routing and auth gating.
//!
//! Every page request passes through [`gateway_middleware`], which evaluates
//! these steps in order and stops at the first redirect:
//!
//! 1. Locale resolution. A path without a supported locale segment is
//!    redirected to the same path under the negotiated locale.
//! 2. Session lookup. A missing or unreadable session means "anonymous".
//! 3. Auth pages. Signed-in visitors are sent away from `/{locale}/auth`.
//! 4. Protected pages. Anonymous visitors are sent to the sign-in page.
//! 5. Admin pages. Non-admin visitors are sent to their profile.
//! 6. Otherwise the request is forwarded with an `x-url` header holding the
//!    original URL.
//!
//! The decision logic lives in plain functions over [`GuardContext`] so it
//! can be tested without a running server.

pub mod locale;
mod middleware;
mod negotiate;

pub use locale::RequestLocale;
pub use middleware::{X_URL, gateway_middleware};
pub use negotiate::negotiate;

use bistro_core::{Locale, UserRole};

use crate::models::CurrentUser;

/// Paths the gateway never touches.
const EXEMPT_PREFIXES: &[&str] = &["/health", "/static", "/api"];
const EXEMPT_FILES: &[&str] = &["/favicon.ico", "/robots.txt", "/sitemap.xml"];

/// Static routing rules for the gateway.
///
/// Prefixes are relative to the locale segment, e.g. `/admin` guards
/// `/ar/admin` and `/en/admin/users`.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub locales: Vec<Locale>,
    pub default_locale: Locale,
    pub auth_prefix: &'static str,
    pub protected_prefixes: Vec<&'static str>,
    pub admin_prefix: &'static str,
    pub profile_path: &'static str,
    pub signin_path: &'static str,
}

impl GatewayConfig {
    #[must_use]
    pub fn new(locales: Vec<Locale>, default_locale: Locale) -> Self {
        Self {
            locales,
            default_locale,
            auth_prefix: "/auth",
            protected_prefixes: vec!["/profile", "/admin"],
            admin_prefix: "/admin",
            profile_path: "/profile",
            signin_path: "/auth/signin",
        }
    }

    /// Split a path into its supported locale and the remainder.
    ///
    /// The remainder is empty or starts with `/`. Returns `None` when the
    /// first segment is not a supported locale code.
    #[must_use]
    pub fn split_locale<'a>(&self, path: &'a str) -> Option<(Locale, &'a str)> {
        let trimmed = path.strip_prefix('/')?;
        let (segment, rest) = match trimmed.find('/') {
            Some(idx) => trimmed.split_at(idx),
            None => (trimmed, ""),
        };
        self.locales
            .iter()
            .copied()
            .find(|locale| locale.code() == segment)
            .map(|locale| (locale, rest))
    }

    /// Step 1: either the locale already in the path, or the redirect target
    /// that adds one.
    #[must_use]
    pub fn resolve_locale<'a>(
        &self,
        path: &'a str,
        query: Option<&str>,
        accept_language: Option<&str>,
    ) -> LocaleResolution<'a> {
        if let Some((locale, rest)) = self.split_locale(path) {
            return LocaleResolution::Prefixed { locale, rest };
        }

        let locale = negotiate(accept_language, &self.locales, self.default_locale);
        let mut target = if path == "/" || path.is_empty() {
            format!("/{locale}")
        } else {
            format!("/{locale}{path}")
        };
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            target.push('?');
            target.push_str(query);
        }
        LocaleResolution::Redirect(target)
    }
}

/// Outcome of locale resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleResolution<'a> {
    /// The path already carries a locale; `rest` is the path after it.
    Prefixed { locale: Locale, rest: &'a str },
    /// Redirect to this path-and-query.
    Redirect(String),
}

/// What a guard decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Continue,
    Redirect(String),
}

/// Per-request inputs to the auth guards.
#[derive(Debug, Clone, Copy)]
pub struct GuardContext<'a> {
    pub locale: Locale,
    /// Path after the locale segment.
    pub rest: &'a str,
    pub user: Option<&'a CurrentUser>,
}

impl GuardContext<'_> {
    fn role(&self) -> Option<UserRole> {
        self.user.map(|user| user.role)
    }

    fn localized(&self, path: &str) -> String {
        format!("/{}{path}", self.locale)
    }
}

type Guard = fn(&GatewayConfig, &GuardContext<'_>) -> Decision;

/// Guards in evaluation order.
const GUARDS: [(&str, Guard); 3] = [
    ("auth_page", auth_page_guard),
    ("protected", protected_guard),
    ("admin_role", admin_role_guard),
];

/// Run steps 3 to 5; the first redirect wins.
#[must_use]
pub fn run_guards(config: &GatewayConfig, ctx: &GuardContext<'_>) -> Decision {
    for (name, guard) in GUARDS {
        if let Decision::Redirect(target) = guard(config, ctx) {
            tracing::debug!(guard = name, path = ctx.rest, %target, "gateway redirect");
            return Decision::Redirect(target);
        }
    }
    Decision::Continue
}

fn auth_page_guard(config: &GatewayConfig, ctx: &GuardContext<'_>) -> Decision {
    if !is_under(ctx.rest, config.auth_prefix) {
        return Decision::Continue;
    }
    match ctx.role() {
        Some(UserRole::Admin) => Decision::Redirect(ctx.localized(config.admin_prefix)),
        Some(UserRole::User) => Decision::Redirect(ctx.localized(config.profile_path)),
        None => Decision::Continue,
    }
}

fn protected_guard(config: &GatewayConfig, ctx: &GuardContext<'_>) -> Decision {
    let protected = config
        .protected_prefixes
        .iter()
        .any(|prefix| is_under(ctx.rest, prefix));
    if protected && ctx.user.is_none() {
        Decision::Redirect(ctx.localized(config.signin_path))
    } else {
        Decision::Continue
    }
}

fn admin_role_guard(config: &GatewayConfig, ctx: &GuardContext<'_>) -> Decision {
    if !is_under(ctx.rest, config.admin_prefix) {
        return Decision::Continue;
    }
    match ctx.role() {
        Some(role) if !role.is_admin() => Decision::Redirect(ctx.localized(config.profile_path)),
        _ => Decision::Continue,
    }
}

/// Whether `path` equals `prefix` or continues below it.
#[must_use]
pub fn is_under(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Whether the gateway should let a path through untouched.
#[must_use]
pub fn is_exempt(path: &str) -> bool {
    EXEMPT_FILES.contains(&path) || EXEMPT_PREFIXES.iter().any(|prefix| is_under(path, prefix))
}
