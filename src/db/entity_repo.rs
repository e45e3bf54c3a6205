// src/db/entity_repo.rs

use sqlx::{Executor, Sqlite};

use crate::{
    common::error::AppError,
    models::entities::{Contact, Order},
};

#[derive(Clone, Default)]
pub struct EntityRepository;

impl EntityRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_order<'e, E>(&self, executor: E, order_id: &str) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?")
            .bind(order_id)
            .fetch_optional(executor)
            .await?;

        Ok(order)
    }

    pub async fn find_contact<'e, E>(&self, executor: E, contact_id: &str) -> Result<Option<Contact>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let contact = sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE id = ?")
            .bind(contact_id)
            .fetch_optional(executor)
            .await?;

        Ok(contact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{insert_contact, insert_order, setup_test_db, ts, TestOrder};

    #[tokio::test]
    async fn stored_rows_decode_into_entities() -> Result<(), AppError> {
        let pool = setup_test_db().await?;
        insert_order(&pool, TestOrder::new("A-1", "Курс", 12.5, "2024-03-01 10:00:00").with_source("777")).await?;
        insert_contact(&pool, "777", Some("Иван Петров")).await?;
        let repo = EntityRepository::new();

        let order = repo.find_order(&pool, "A-1").await?.expect("order");
        assert_eq!(order.content.as_deref(), Some("Курс"));
        assert_eq!(order.income, Some(12.5));
        assert_eq!(order.creation_date, Some(ts("2024-03-01 10:00:00")));
        assert_eq!(order.payment_date, None);

        let contact = repo.find_contact(&pool, "777").await?.expect("contact");
        assert_eq!(contact.full_name.as_deref(), Some("Иван Петров"));

        assert!(repo.find_order(&pool, "nope").await?.is_none());
        assert!(repo.find_contact(&pool, "nope").await?.is_none());
        Ok(())
    }
}
