// src/db/partner_repo.rs

use sqlx::{Executor, QueryBuilder, Sqlite};

use crate::{
    common::error::AppError,
    models::{
        partner::{PartnerRow, COMMON_SOURCE_LABEL},
        report::DateRange,
    },
};

#[derive(Clone, Default)]
pub struct PartnerRepository;

impl PartnerRepository {
    pub fn new() -> Self {
        Self
    }

    /// Order count and income per (partner, utm_source). An order's utm_source is
    /// matched against contact ids; unmatched sources fall under the common label.
    pub async fn partner_rollup<'e, E>(
        &self,
        executor: E,
        range: &DateRange,
        exclude_common: bool,
    ) -> Result<Vec<PartnerRow>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COALESCE(c.full_name, ");
        qb.push_bind(COMMON_SOURCE_LABEL);
        qb.push(
            r#") AS partner,
                o.utm_source AS utm_source,
                COUNT(o.id) AS order_count,
                TOTAL(o.income) AS total_income
            FROM orders o
            LEFT JOIN contacts c ON o.utm_source = c.id
            WHERE o.creation_date >= "#,
        );
        qb.push_bind(range.start);
        qb.push(" AND o.creation_date < ");
        qb.push_bind(range.end);

        if exclude_common {
            qb.push(" AND COALESCE(c.full_name, ");
            qb.push_bind(COMMON_SOURCE_LABEL);
            qb.push(") <> ");
            qb.push_bind(COMMON_SOURCE_LABEL);
        }

        qb.push(" GROUP BY partner, o.utm_source ORDER BY total_income DESC, partner ASC");

        let rows = qb.build_query_as::<PartnerRow>().fetch_all(executor).await?;
        Ok(rows)
    }
}
