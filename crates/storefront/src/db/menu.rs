//! Menu repository: categories, products and their options.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use bistro_core::{CategoryId, ExtraId, ExtraIngredient, ProductId, ProductSize, SizeId};

use super::RepositoryError;
use crate::models::{Category, CategoryWithProducts, ExtraOption, Product, SizeOption};

const PRODUCT_COLUMNS: &str =
    "id, name, description, image_url, base_price, sort_order, category_id";

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    sort_order: i32,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
            sort_order: row.sort_order,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: String,
    image_url: String,
    base_price: Decimal,
    sort_order: i32,
    category_id: i32,
}

#[derive(Debug, sqlx::FromRow)]
struct SizeRow {
    id: i32,
    product_id: i32,
    name: ProductSize,
    price: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct ExtraRow {
    id: i32,
    product_id: i32,
    name: ExtraIngredient,
    price: Decimal,
}

/// Row counts shown on the admin overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct MenuCounts {
    pub categories: i64,
    pub products: i64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for menu queries.
pub struct MenuRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MenuRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All categories in menu order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, sort_order FROM category ORDER BY sort_order, id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// The full menu: every category with its products, sizes and extras.
    ///
    /// Categories without products are included with an empty list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn menu(&self) -> Result<Vec<CategoryWithProducts>, RepositoryError> {
        let categories = self.categories().await?;
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product ORDER BY sort_order, id"
        ))
        .fetch_all(self.pool)
        .await?;
        let products = self.attach_options(rows).await?;

        let mut by_category: HashMap<CategoryId, Vec<Product>> = HashMap::new();
        for product in products {
            by_category
                .entry(product.category_id)
                .or_default()
                .push(product);
        }

        Ok(categories
            .into_iter()
            .map(|category| CategoryWithProducts {
                products: by_category.remove(&category.id).unwrap_or_default(),
                category,
            })
            .collect())
    }

    /// The first `limit` products in menu order, for the home page.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn featured(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product ORDER BY sort_order, id LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        self.attach_options(rows).await
    }

    /// A single product with its options.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(self.attach_options(vec![row]).await?.into_iter().next())
    }

    /// Category and product counts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn counts(&self) -> Result<MenuCounts, RepositoryError> {
        let counts = sqlx::query_as::<_, MenuCounts>(
            "SELECT (SELECT COUNT(*) FROM category) AS categories, \
                    (SELECT COUNT(*) FROM product) AS products",
        )
        .fetch_one(self.pool)
        .await?;
        Ok(counts)
    }

    /// Load sizes and extras for `rows` and build products, keeping row order.
    async fn attach_options(&self, rows: Vec<ProductRow>) -> Result<Vec<Product>, RepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();

        let size_rows = sqlx::query_as::<_, SizeRow>(
            "SELECT id, product_id, name, price FROM product_size \
             WHERE product_id = ANY($1) ORDER BY price, id",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let extra_rows = sqlx::query_as::<_, ExtraRow>(
            "SELECT id, product_id, name, price FROM product_extra \
             WHERE product_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut sizes: HashMap<i32, Vec<SizeOption>> = HashMap::new();
        for row in size_rows {
            sizes.entry(row.product_id).or_default().push(SizeOption {
                id: SizeId::new(row.id),
                name: row.name,
                price: row.price,
            });
        }

        let mut extras: HashMap<i32, Vec<ExtraOption>> = HashMap::new();
        for row in extra_rows {
            extras.entry(row.product_id).or_default().push(ExtraOption {
                id: ExtraId::new(row.id),
                name: row.name,
                price: row.price,
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| Product {
                id: ProductId::new(row.id),
                name: row.name,
                description: row.description,
                image_url: row.image_url,
                base_price: row.base_price,
                sort_order: row.sort_order,
                category_id: CategoryId::new(row.category_id),
                sizes: sizes.remove(&row.id).unwrap_or_default(),
                extras: extras.remove(&row.id).unwrap_or_default(),
            })
            .collect())
    }
}
