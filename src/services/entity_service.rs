// src/services/entity_service.rs

use sqlx::{Executor, Sqlite};

use crate::{
    common::error::AppError,
    db::EntityRepository,
    models::entities::{Contact, Order},
};

/// Read access to imported orders and contacts.
#[derive(Clone)]
pub struct EntityService {
    repo: EntityRepository,
}

impl EntityService {
    pub fn new(repo: EntityRepository) -> Self {
        Self { repo }
    }

    pub async fn get_order<'e, E>(&self, executor: E, order_id: &str) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.repo
            .find_order(executor, order_id)
            .await?
            .ok_or(AppError::NotFound("Order"))
    }

    pub async fn get_contact<'e, E>(&self, executor: E, contact_id: &str) -> Result<Contact, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.repo
            .find_contact(executor, contact_id)
            .await?
            .ok_or(AppError::NotFound("Contact"))
    }
}
