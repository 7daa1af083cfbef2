//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::gateway::GatewayConfig;
use crate::services::MenuCache;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    menu: MenuCache,
    gateway: GatewayConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let gateway = config.gateway();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                menu: MenuCache::new(),
                gateway,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the menu cache.
    #[must_use]
    pub fn menu(&self) -> &MenuCache {
        &self.inner.menu
    }

    /// Get a reference to the gateway routing rules.
    #[must_use]
    pub fn gateway(&self) -> &GatewayConfig {
        &self.inner.gateway
    }
}
