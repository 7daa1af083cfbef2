//! Cached menu queries.
//!
//! The menu changes rarely, so full-menu and featured-product reads are
//! served from a `moka` cache with a one hour TTL. Product lookups for "add to
//! cart" always hit the database so prices are current.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::{debug, instrument};

use crate::db::{MenuRepository, RepositoryError};
use crate::models::{CategoryWithProducts, Product};

const MENU_TTL: Duration = Duration::from_secs(3600);

/// Number of products shown on the home page.
pub const FEATURED_LIMIT: i64 = 6;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
enum CacheKey {
    Menu,
    Featured(i64),
}

#[derive(Debug, Clone)]
enum CacheValue {
    Menu(Arc<Vec<CategoryWithProducts>>),
    Products(Arc<Vec<Product>>),
}

/// Read-through cache in front of [`MenuRepository`].
#[derive(Clone)]
pub struct MenuCache {
    cache: Cache<CacheKey, CacheValue>,
}

impl Default for MenuCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuCache {
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(MENU_TTL)
    }

    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(100)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Every category with its products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the cache is cold and the query fails.
    #[instrument(skip_all)]
    pub async fn menu(
        &self,
        pool: &PgPool,
    ) -> Result<Arc<Vec<CategoryWithProducts>>, RepositoryError> {
        if let Some(CacheValue::Menu(menu)) = self.cache.get(&CacheKey::Menu).await {
            debug!("Cache hit for menu");
            return Ok(menu);
        }

        let menu = Arc::new(MenuRepository::new(pool).menu().await?);
        self.cache
            .insert(CacheKey::Menu, CacheValue::Menu(Arc::clone(&menu)))
            .await;
        Ok(menu)
    }

    /// The first `limit` products in menu order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the cache is cold and the query fails.
    #[instrument(skip(self, pool))]
    pub async fn featured(
        &self,
        pool: &PgPool,
        limit: i64,
    ) -> Result<Arc<Vec<Product>>, RepositoryError> {
        let key = CacheKey::Featured(limit);
        if let Some(CacheValue::Products(products)) = self.cache.get(&key).await {
            debug!("Cache hit for featured products");
            return Ok(products);
        }

        let products = Arc::new(MenuRepository::new(pool).featured(limit).await?);
        self.cache
            .insert(key, CacheValue::Products(Arc::clone(&products)))
            .await;
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cached_values_are_returned_without_database() {
        let cache = MenuCache::new();
        cache
            .cache
            .insert(CacheKey::Menu, CacheValue::Menu(Arc::new(Vec::new())))
            .await;

        // A lazily-connected pool that would fail on first use.
        let pool = sqlx::postgres::PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(50))
            .connect_lazy("postgres://nobody@127.0.0.1:1/none")
            .expect("lazy pool");

        let menu = cache.menu(&pool).await.expect("served from cache");
        assert!(menu.is_empty());
    }

    #[tokio::test]
    async fn test_expired_entries_fall_through_to_database() {
        let cache = MenuCache::with_ttl(Duration::from_millis(10));
        cache
            .cache
            .insert(CacheKey::Featured(6), CacheValue::Products(Arc::new(Vec::new())))
            .await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        let pool = sqlx::postgres::PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(50))
            .connect_lazy("postgres://nobody@127.0.0.1:1/none")
            .expect("lazy pool");

        assert!(cache.featured(&pool, 6).await.is_err());
    }
}
