//! Seed the menu from a YAML file.
//!
//! Categories and products are matched by name, so running the same file
//! twice updates prices instead of duplicating rows. A product's sizes and
//! extras are replaced by what the file lists.
//!
//! ```yaml
//! categories:
//!   - name: Pizza
//!     sortOrder: 1
//!     products:
//!       - name: Margherita
//!         basePrice: "8.50"
//!         sizes:
//!           - { name: SMALL, price: "0" }
//!         extras:
//!           - { name: CHEESE, price: "1.00" }
//! ```

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{error, info};

use bistro_core::{ExtraIngredient, ProductSize};

use super::{CliError, connect};

#[derive(Debug, Deserialize)]
pub struct MenuSeed {
    pub categories: Vec<CategorySeed>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySeed {
    pub name: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub products: Vec<ProductSeed>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSeed {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    pub base_price: Decimal,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub sizes: Vec<OptionSeed<ProductSize>>,
    #[serde(default)]
    pub extras: Vec<OptionSeed<ExtraIngredient>>,
}

#[derive(Debug, Deserialize)]
pub struct OptionSeed<N> {
    pub name: N,
    pub price: Decimal,
}

/// Counts reported after seeding.
#[derive(Debug, Default)]
pub struct SeedSummary {
    pub categories: usize,
    pub products: usize,
    pub options: usize,
}

/// Problems that would make the seed rejected by the schema or confusing
/// on the menu.
#[must_use]
pub fn validate(seed: &MenuSeed) -> Vec<String> {
    let mut errors = Vec::new();
    let mut categories = HashSet::new();
    let mut products = HashSet::new();

    for category in &seed.categories {
        if category.name.trim().is_empty() {
            errors.push("category with empty name".to_string());
        } else if !categories.insert(category.name.as_str()) {
            errors.push(format!("duplicate category: {}", category.name));
        }

        for product in &category.products {
            let label = format!("{} / {}", category.name, product.name);
            if product.name.trim().is_empty() {
                errors.push(format!("{}: product with empty name", category.name));
            } else if !products.insert(product.name.as_str()) {
                errors.push(format!("duplicate product: {}", product.name));
            }
            if product.base_price.is_sign_negative() {
                errors.push(format!("{label}: negative base price"));
            }

            let mut sizes = HashSet::new();
            for size in &product.sizes {
                if !sizes.insert(size.name) {
                    errors.push(format!("{label}: duplicate size {:?}", size.name));
                }
                if size.price.is_sign_negative() {
                    errors.push(format!("{label}: negative price for size {:?}", size.name));
                }
            }

            let mut extras = HashSet::new();
            for extra in &product.extras {
                if !extras.insert(extra.name) {
                    errors.push(format!("{label}: duplicate extra {:?}", extra.name));
                }
                if extra.price.is_sign_negative() {
                    errors.push(format!("{label}: negative price for extra {:?}", extra.name));
                }
            }
        }
    }

    errors
}

/// Seed the menu from `path`.
///
/// The file is parsed and validated before connecting to the database, and
/// all writes happen in one transaction.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, fails validation,
/// or a database write fails.
pub async fn run(path: &Path) -> Result<(), CliError> {
    info!(path = %path.display(), "Loading menu from file");

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Io {
            path: path.display().to_string(),
            source,
        })?;
    let seed: MenuSeed = serde_yaml::from_str(&content)?;

    let errors = validate(&seed);
    if !errors.is_empty() {
        error!("Seed validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(CliError::InvalidSeed(errors.len()));
    }

    let pool = connect().await?;
    let summary = seed_menu(&pool, &seed).await?;

    info!("Seeding complete!");
    info!("  Categories: {}", summary.categories);
    info!("  Products: {}", summary.products);
    info!("  Sizes and extras: {}", summary.options);
    info!("Restart the storefront or wait an hour for the menu cache to refresh.");
    Ok(())
}

async fn seed_menu(pool: &PgPool, seed: &MenuSeed) -> Result<SeedSummary, CliError> {
    let mut tx = pool.begin().await?;
    let mut summary = SeedSummary::default();

    for category in &seed.categories {
        let category_id: i32 = sqlx::query_scalar(
            "INSERT INTO category (name, sort_order) VALUES ($1, $2) \
             ON CONFLICT (name) DO UPDATE \
             SET sort_order = EXCLUDED.sort_order, updated_at = NOW() \
             RETURNING id",
        )
        .bind(&category.name)
        .bind(category.sort_order)
        .fetch_one(&mut *tx)
        .await?;
        summary.categories += 1;

        for product in &category.products {
            summary.options += upsert_product(&mut tx, category_id, product).await?;
            summary.products += 1;
        }
    }

    tx.commit().await?;
    Ok(summary)
}

/// Insert or update one product and replace its options. Returns the number
/// of options written.
async fn upsert_product(
    tx: &mut Transaction<'_, Postgres>,
    category_id: i32,
    product: &ProductSeed,
) -> Result<usize, CliError> {
    let product_id: i32 = sqlx::query_scalar(
        "INSERT INTO product (category_id, name, description, image_url, base_price, sort_order) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         ON CONFLICT (name) DO UPDATE \
         SET category_id = EXCLUDED.category_id, description = EXCLUDED.description, \
             image_url = EXCLUDED.image_url, base_price = EXCLUDED.base_price, \
             sort_order = EXCLUDED.sort_order, updated_at = NOW() \
         RETURNING id",
    )
    .bind(category_id)
    .bind(&product.name)
    .bind(&product.description)
    .bind(&product.image_url)
    .bind(product.base_price)
    .bind(product.sort_order)
    .fetch_one(&mut **tx)
    .await?;

    sqlx::query("DELETE FROM product_size WHERE product_id = $1")
        .bind(product_id)
        .execute(&mut **tx)
        .await?;
    sqlx::query("DELETE FROM product_extra WHERE product_id = $1")
        .bind(product_id)
        .execute(&mut **tx)
        .await?;

    for size in &product.sizes {
        sqlx::query("INSERT INTO product_size (product_id, name, price) VALUES ($1, $2, $3)")
            .bind(product_id)
            .bind(size.name)
            .bind(size.price)
            .execute(&mut **tx)
            .await?;
    }
    for extra in &product.extras {
        sqlx::query("INSERT INTO product_extra (product_id, name, price) VALUES ($1, $2, $3)")
            .bind(product_id)
            .bind(extra.name)
            .bind(extra.price)
            .execute(&mut **tx)
            .await?;
    }

    Ok(product.sizes.len() + product.extras.len())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_menu_is_valid() {
        let seed: MenuSeed = serde_yaml::from_str(include_str!("../../seed/menu.yaml")).unwrap();
        assert!(!seed.categories.is_empty());
        assert_eq!(validate(&seed), Vec::<String>::new());
    }

    #[test]
    fn test_validate_reports_duplicates_and_negative_prices() {
        let seed: MenuSeed = serde_yaml::from_str(
            r#"
categories:
  - name: Pizza
    products:
      - name: Margherita
        basePrice: "-1"
        sizes:
          - { name: SMALL, price: "0" }
          - { name: SMALL, price: "2" }
  - name: Pizza
"#,
        )
        .unwrap();

        let errors = validate(&seed);
        assert!(errors.iter().any(|e| e.contains("duplicate category")));
        assert!(errors.iter().any(|e| e.contains("negative base price")));
        assert!(errors.iter().any(|e| e.contains("duplicate size Small")));
    }

    #[test]
    fn test_unknown_option_name_is_rejected() {
        let result: Result<MenuSeed, _> = serde_yaml::from_str(
            r#"
categories:
  - name: Pizza
    products:
      - name: Margherita
        basePrice: "8"
        extras:
          - { name: PINEAPPLE, price: "1" }
"#,
        );
        assert!(result.is_err());
    }
}
