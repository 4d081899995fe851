//! # Product Repository
//!
//! Lookup-only product access. Products enter the catalog out of band
//! (seeding or back-office tooling); the purchase path only reads them.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use vend_core::Product;

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Finds the first product with the given scan code.
    ///
    /// Codes are not unique; the lowest prd_id wins, matching the
    /// first-row semantics of the lookup endpoint.
    pub async fn find_by_code(&self, code: i64) -> DbResult<Option<Product>> {
        debug!(code, "looking up product by code");

        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT prd_id, code, name, price
            FROM products
            WHERE code = ?1
            ORDER BY prd_id
            LIMIT 1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a product and returns it with its generated id.
    pub async fn insert(&self, code: i64, name: &str, price: i64) -> DbResult<Product> {
        let result = sqlx::query(
            r#"
            INSERT INTO products (code, name, price)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(code)
        .bind(name)
        .bind(price)
        .execute(&self.pool)
        .await?;

        Ok(Product {
            prd_id: result.last_insert_rowid(),
            code,
            name: name.to_string(),
            price,
        })
    }
}
