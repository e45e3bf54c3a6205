// src/db/catalog_repo.rs

use sqlx::{Executor, Sqlite};

use crate::{
    common::error::{map_unique_violation, AppError},
    models::catalog::{Category, Product},
};

#[derive(Clone, Default)]
pub struct CatalogRepository;

impl CatalogRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  CATEGORIES
    // =========================================================================

    pub async fn create_category<'e, E>(&self, executor: E, name: &str) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Category>(
            "INSERT INTO product_categories (name) VALUES (?) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, || format!("Category '{}' already exists.", name)))
    }

    pub async fn list_categories<'e, E>(&self, executor: E) -> Result<Vec<Category>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name FROM product_categories ORDER BY name ASC",
        )
        .fetch_all(executor)
        .await?;

        Ok(categories)
    }

    /// Returns how many rows were removed (0 or 1). Associations cascade.
    pub async fn delete_category<'e, E>(&self, executor: E, category_id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM product_categories WHERE id = ?")
            .bind(category_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    // =========================================================================
    //  PRODUCTS
    // =========================================================================

    pub async fn list_products<'e, E>(&self, executor: E) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let products = sqlx::query_as::<_, Product>("SELECT id, name FROM products ORDER BY name ASC")
            .fetch_all(executor)
            .await?;

        Ok(products)
    }

    pub async fn find_product<'e, E>(&self, executor: E, product_id: i64) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT id, name FROM products WHERE id = ?")
            .bind(product_id)
            .fetch_optional(executor)
            .await?;

        Ok(product)
    }

    /// (product_id, category name) for every tag, optionally for a single product.
    pub async fn product_category_names<'e, E>(
        &self,
        executor: E,
        product_id: Option<i64>,
    ) -> Result<Vec<(i64, String)>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let pairs = sqlx::query_as::<_, (i64, String)>(
            r#"
            SELECT pca.product_id, c.name
            FROM product_category_association pca
            JOIN product_categories c ON c.id = pca.category_id
            WHERE (?1 IS NULL OR pca.product_id = ?1)
            ORDER BY c.name ASC
            "#,
        )
        .bind(product_id)
        .fetch_all(executor)
        .await?;

        Ok(pairs)
    }

    pub async fn clear_product_categories<'e, E>(&self, executor: E, product_id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query("DELETE FROM product_category_association WHERE product_id = ?")
            .bind(product_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Tags the product, silently skipping ids that name no category.
    /// Returns whether a row was written.
    pub async fn add_product_category<'e, E>(
        &self,
        executor: E,
        product_id: i64,
        category_id: i64,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO product_category_association (product_id, category_id)
            SELECT ?, id FROM product_categories WHERE id = ?
            "#,
        )
        .bind(product_id)
        .bind(category_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  SYNCHRONIZATION
    // =========================================================================

    /// Distinct non-empty product names seen in orders.content.
    pub async fn order_product_names<'e, E>(&self, executor: E) -> Result<Vec<String>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT content FROM orders WHERE content IS NOT NULL AND content <> ''",
        )
        .fetch_all(executor)
        .await?;

        Ok(names)
    }

    pub async fn product_names<'e, E>(&self, executor: E) -> Result<Vec<String>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let names = sqlx::query_scalar::<_, String>("SELECT name FROM products")
            .fetch_all(executor)
            .await?;

        Ok(names)
    }

    pub async fn insert_product<'e, E>(&self, executor: E, name: &str) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query("INSERT INTO products (name) VALUES (?)")
            .bind(name)
            .execute(executor)
            .await
            .map_err(|e| map_unique_violation(e, || format!("Product '{}' already exists.", name)))?;

        Ok(())
    }
}
