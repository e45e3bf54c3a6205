// src/services/catalog_service.rs

use std::collections::{BTreeSet, HashMap};

use sqlx::{Acquire, Executor, Sqlite};

use crate::{
    common::error::AppError,
    db::CatalogRepository,
    models::catalog::{Category, ProductWithCategories},
};

#[derive(Clone)]
pub struct CatalogService {
    repo: CatalogRepository,
}

impl CatalogService {
    pub fn new(repo: CatalogRepository) -> Self {
        Self { repo }
    }

    // =========================================================================
    //  1. CATEGORIES
    // =========================================================================

    pub async fn list_categories<'e, E>(&self, executor: E) -> Result<Vec<Category>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.repo.list_categories(executor).await
    }

    pub async fn create_category<'e, E>(&self, executor: E, name: &str) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let category = self.repo.create_category(executor, name.trim()).await?;
        tracing::info!(category_id = category.id, name = %category.name, "Category created");
        Ok(category)
    }

    pub async fn delete_category<'e, E>(&self, executor: E, category_id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if self.repo.delete_category(executor, category_id).await? == 0 {
            return Err(AppError::NotFound("Category"));
        }
        tracing::info!(category_id, "Category deleted");
        Ok(())
    }

    // =========================================================================
    //  2. PRODUCTS
    // =========================================================================

    pub async fn list_products<'e, E>(&self, executor: E) -> Result<Vec<ProductWithCategories>, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Acquire<'e, Database = Sqlite>,
    {
        let mut conn = executor.acquire().await?;

        let products = self.repo.list_products(&mut *conn).await?;
        let mut tags: HashMap<i64, Vec<String>> = HashMap::new();
        for (product_id, name) in self.repo.product_category_names(&mut *conn, None).await? {
            tags.entry(product_id).or_default().push(name);
        }

        Ok(products
            .into_iter()
            .map(|p| ProductWithCategories {
                categories: tags.remove(&p.id).unwrap_or_default(),
                id: p.id,
                name: p.name,
            })
            .collect())
    }

    pub async fn get_product<'e, E>(&self, executor: E, product_id: i64) -> Result<ProductWithCategories, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Acquire<'e, Database = Sqlite>,
    {
        let mut conn = executor.acquire().await?;

        let product = self
            .repo
            .find_product(&mut *conn, product_id)
            .await?
            .ok_or(AppError::NotFound("Product"))?;
        let categories = self
            .repo
            .product_category_names(&mut *conn, Some(product_id))
            .await?
            .into_iter()
            .map(|(_, name)| name)
            .collect();

        Ok(ProductWithCategories { id: product.id, name: product.name, categories })
    }

    /// Replaces the product's categories with `category_ids`. Unknown ids are skipped.
    pub async fn assign_categories<'e, E>(
        &self,
        executor: E,
        product_id: i64,
        category_ids: &[i64],
    ) -> Result<ProductWithCategories, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Acquire<'e, Database = Sqlite>,
    {
        let mut tx = executor.begin().await?;

        let product = self
            .repo
            .find_product(&mut *tx, product_id)
            .await?
            .ok_or(AppError::NotFound("Product"))?;

        self.repo.clear_product_categories(&mut *tx, product_id).await?;

        let requested: BTreeSet<i64> = category_ids.iter().copied().collect();
        let mut assigned = 0usize;
        for category_id in &requested {
            if self.repo.add_product_category(&mut *tx, product_id, *category_id).await? {
                assigned += 1;
            }
        }

        let categories = self
            .repo
            .product_category_names(&mut *tx, Some(product_id))
            .await?
            .into_iter()
            .map(|(_, name)| name)
            .collect();

        tx.commit().await?;

        tracing::info!(
            product_id,
            assigned,
            ignored = requested.len() - assigned,
            "Product categories replaced"
        );

        Ok(ProductWithCategories { id: product.id, name: product.name, categories })
    }

    // =========================================================================
    //  3. SYNCHRONIZATION
    // =========================================================================

    /// Inserts every product name seen in orders that is not yet a product.
    /// Never updates or deletes; returns how many were added.
    pub async fn sync_products<'e, E>(&self, executor: E) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Acquire<'e, Database = Sqlite>,
    {
        let mut tx = executor.begin().await?;

        let seen: BTreeSet<String> = self.repo.order_product_names(&mut *tx).await?.into_iter().collect();
        let known: BTreeSet<String> = self.repo.product_names(&mut *tx).await?.into_iter().collect();

        let mut added = 0u64;
        for name in seen.difference(&known) {
            self.repo.insert_product(&mut *tx, name).await?;
            added += 1;
        }

        tx.commit().await?;

        tracing::info!(added, "Products synchronized from orders");
        Ok(added)
    }
}
