// src/db/report_repo.rs

use sqlx::{Executor, QueryBuilder, Sqlite};

use crate::{
    common::error::AppError,
    models::report::{
        CategoryRevenue, DailyProductSales, DailyRevenue, DateRange, MonthlyCategorySales,
        MonthlyProductSales, MonthlySales, PaidProductRow, ProductSummaryRow, ReportFilter,
    },
};

// Aggregate queries behind the dashboard. "Paid" means income > 0 everywhere,
// the order status column is not consulted.
//
// Orders reach categories through products.name = orders.content (plain name
// equality); orders whose content matches no product never show up in
// category-filtered results.
#[derive(Clone, Default)]
pub struct ReportRepository;

const PAID_COUNT: &str = "COUNT(CASE WHEN o.income > 0 THEN 1 END)";

impl ReportRepository {
    pub fn new() -> Self {
        Self
    }

    // 1. Income per calendar day
    pub async fn daily_revenue<'e, E>(
        &self,
        executor: E,
        range: &DateRange,
        filter: &ReportFilter,
    ) -> Result<Vec<DailyRevenue>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT date(o.creation_date) AS day, TOTAL(o.income) AS total FROM orders o WHERE 1 = 1",
        );
        push_date_range(&mut qb, range);
        push_order_filter(&mut qb, filter);
        qb.push(" GROUP BY day ORDER BY day ASC");

        let rows = qb.build_query_as::<DailyRevenue>().fetch_all(executor).await?;
        Ok(rows)
    }

    /// Ungrouped income over the same filters as `daily_revenue`.
    pub async fn income_total<'e, E>(
        &self,
        executor: E,
        range: &DateRange,
        filter: &ReportFilter,
    ) -> Result<f64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT TOTAL(o.income) FROM orders o WHERE 1 = 1");
        push_date_range(&mut qb, range);
        push_order_filter(&mut qb, filter);

        let total: f64 = qb.build_query_scalar().fetch_one(executor).await?;
        Ok(total)
    }

    // 2. Per-day counts and income with a running total.
    // The window runs over the already grouped days, so the cumulative column
    // is the prefix sum of daily_income ordered by day.
    pub async fn product_daily_series<'e, E>(
        &self,
        executor: E,
        range: &DateRange,
        filter: &ReportFilter,
    ) -> Result<Vec<DailyProductSales>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut qb = QueryBuilder::<Sqlite>::new("WITH daily AS (SELECT date(o.creation_date) AS day, COUNT(o.id) AS total_orders, ");
        qb.push(PAID_COUNT);
        qb.push(" AS paid_orders, TOTAL(o.income) AS daily_income FROM orders o WHERE 1 = 1");
        push_date_range(&mut qb, range);
        push_order_filter(&mut qb, filter);
        qb.push(
            r#" GROUP BY day)
            SELECT day, total_orders, paid_orders, daily_income,
                   TOTAL(daily_income) OVER (ORDER BY day ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW) AS cumulative_income
            FROM daily
            ORDER BY day ASC"#,
        );

        let rows = qb.build_query_as::<DailyProductSales>().fetch_all(executor).await?;
        Ok(rows)
    }

    // 3. One row per product; the average check only looks at paid orders
    pub async fn product_summary<'e, E>(
        &self,
        executor: E,
        range: &DateRange,
        filter: &ReportFilter,
    ) -> Result<Vec<ProductSummaryRow>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT o.content AS product, COUNT(o.id) AS total_orders, ");
        qb.push(PAID_COUNT);
        qb.push(
            r#" AS paid_orders,
                TOTAL(o.income) AS total_income,
                COALESCE(ROUND(AVG(CASE WHEN o.income > 0 THEN o.income END), 2), 0.0) AS average_check
            FROM orders o
            WHERE o.content IS NOT NULL"#,
        );
        push_date_range(&mut qb, range);
        push_order_filter(&mut qb, filter);
        qb.push(" GROUP BY o.content ORDER BY o.content ASC");

        let rows = qb.build_query_as::<ProductSummaryRow>().fetch_all(executor).await?;
        Ok(rows)
    }

    // 4. Products with at least one paid order in the period
    pub async fn paid_products<'e, E>(
        &self,
        executor: E,
        range: &DateRange,
        filter: &ReportFilter,
    ) -> Result<Vec<PaidProductRow>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT o.content AS product, COUNT(o.id) AS total_orders, ");
        qb.push(PAID_COUNT);
        qb.push(" AS paid_orders, TOTAL(o.income) AS total_income FROM orders o WHERE o.content IS NOT NULL");
        push_date_range(&mut qb, range);
        push_order_filter(&mut qb, filter);
        qb.push(" GROUP BY o.content HAVING paid_orders > 0 ORDER BY total_income DESC, product ASC");

        let rows = qb.build_query_as::<PaidProductRow>().fetch_all(executor).await?;
        Ok(rows)
    }

    // 5. Paid income per category. Include narrows first, exclude then removes.
    pub async fn category_revenue<'e, E>(
        &self,
        executor: E,
        range: Option<&DateRange>,
        include: &[i64],
        exclude: &[i64],
    ) -> Result<Vec<CategoryRevenue>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut qb = QueryBuilder::<Sqlite>::new(
            r#"SELECT c.id AS category_id, c.name AS category, TOTAL(o.income) AS revenue
            FROM orders o
            JOIN products p ON p.name = o.content
            JOIN product_category_association pca ON pca.product_id = p.id
            JOIN product_categories c ON c.id = pca.category_id
            WHERE o.income > 0"#,
        );
        if let Some(range) = range {
            push_date_range(&mut qb, range);
        }
        if !include.is_empty() {
            qb.push(" AND c.id IN ");
            push_id_list(&mut qb, include);
        }
        if !exclude.is_empty() {
            qb.push(" AND c.id NOT IN ");
            push_id_list(&mut qb, exclude);
        }
        qb.push(" GROUP BY c.id, c.name ORDER BY revenue DESC, category ASC");

        let rows = qb.build_query_as::<CategoryRevenue>().fetch_all(executor).await?;
        Ok(rows)
    }

    // 6. Monthly rollups, paid orders only
    pub async fn monthly_overall<'e, E>(
        &self,
        executor: E,
        range: &DateRange,
        filter: &ReportFilter,
    ) -> Result<Vec<MonthlySales>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT strftime('%Y-%m', o.creation_date) AS month, COUNT(o.id) AS total_orders, ");
        qb.push(PAID_COUNT);
        qb.push(" AS paid_orders, TOTAL(o.income) AS total_income FROM orders o WHERE o.income > 0");
        push_date_range(&mut qb, range);
        push_order_filter(&mut qb, filter);
        qb.push(" GROUP BY month ORDER BY month ASC");

        let rows = qb.build_query_as::<MonthlySales>().fetch_all(executor).await?;
        Ok(rows)
    }

    pub async fn monthly_by_product<'e, E>(
        &self,
        executor: E,
        range: &DateRange,
        filter: &ReportFilter,
    ) -> Result<Vec<MonthlyProductSales>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT strftime('%Y-%m', o.creation_date) AS month, o.content AS product, COUNT(o.id) AS total_orders, ",
        );
        qb.push(PAID_COUNT);
        qb.push(" AS paid_orders, TOTAL(o.income) AS total_income FROM orders o WHERE o.income > 0 AND o.content IS NOT NULL");
        push_date_range(&mut qb, range);
        push_order_filter(&mut qb, filter);
        qb.push(" GROUP BY month, o.content ORDER BY month ASC, total_income DESC");

        let rows = qb.build_query_as::<MonthlyProductSales>().fetch_all(executor).await?;
        Ok(rows)
    }

    /// An order tagged with several categories counts once in each of them.
    pub async fn monthly_by_category<'e, E>(
        &self,
        executor: E,
        range: &DateRange,
        filter: &ReportFilter,
    ) -> Result<Vec<MonthlyCategorySales>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT strftime('%Y-%m', o.creation_date) AS month, c.name AS category, COUNT(o.id) AS total_orders, ",
        );
        qb.push(PAID_COUNT);
        qb.push(
            r#" AS paid_orders, TOTAL(o.income) AS total_income
            FROM orders o
            JOIN products p ON p.name = o.content
            JOIN product_category_association pca ON pca.product_id = p.id
            JOIN product_categories c ON c.id = pca.category_id
            WHERE o.income > 0"#,
        );
        push_date_range(&mut qb, range);
        push_product_names(&mut qb, &filter.products);
        if !filter.category_ids.is_empty() {
            qb.push(" AND c.id IN ");
            push_id_list(&mut qb, &filter.category_ids);
        }
        qb.push(" GROUP BY month, c.id, c.name ORDER BY month ASC, total_income DESC");

        let rows = qb.build_query_as::<MonthlyCategorySales>().fetch_all(executor).await?;
        Ok(rows)
    }

    // 7. Filter options
    /// Distinct product names from orders, optionally only those tagged with `category_id`.
    pub async fn distinct_products<'e, E>(
        &self,
        executor: E,
        category_id: Option<i64>,
    ) -> Result<Vec<String>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT DISTINCT o.content FROM orders o WHERE o.content IS NOT NULL AND o.content <> ''",
        );
        if let Some(category_id) = category_id {
            push_category_membership(&mut qb, &[category_id]);
        }
        qb.push(" ORDER BY o.content ASC");

        let names = qb.build_query_scalar::<String>().fetch_all(executor).await?;
        Ok(names)
    }
}

// Clause helpers
fn push_date_range(qb: &mut QueryBuilder<'_, Sqlite>, range: &DateRange) {
    qb.push(" AND o.creation_date >= ")
        .push_bind(range.start)
        .push(" AND o.creation_date < ")
        .push_bind(range.end);
}

fn push_order_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &ReportFilter) {
    push_product_names(qb, &filter.products);
    push_category_membership(qb, &filter.category_ids);
}

fn push_product_names(qb: &mut QueryBuilder<'_, Sqlite>, products: &[String]) {
    if products.is_empty() {
        return;
    }
    qb.push(" AND o.content IN (");
    let mut separated = qb.separated(", ");
    for product in products {
        separated.push_bind(product.clone());
    }
    separated.push_unseparated(")");
}

// Subquery rather than a join so an order is counted once even when its
// product carries several of the requested categories.
fn push_category_membership(qb: &mut QueryBuilder<'_, Sqlite>, category_ids: &[i64]) {
    if category_ids.is_empty() {
        return;
    }
    qb.push(
        " AND o.content IN (SELECT p.name FROM products p \
         JOIN product_category_association pca ON pca.product_id = p.id \
         WHERE pca.category_id IN ",
    );
    push_id_list(qb, category_ids);
    qb.push(")");
}

fn push_id_list(qb: &mut QueryBuilder<'_, Sqlite>, ids: &[i64]) {
    qb.push("(");
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{
        init_test_tracing, insert_category, insert_order, insert_product, setup_test_db,
        tag_product, TestOrder,
    };
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn march() -> DateRange {
        DateRange::inclusive(day(2024, 3, 1), day(2024, 3, 31))
    }

    #[tokio::test]
    async fn daily_totals_add_up_to_the_ungrouped_sum() -> Result<(), AppError> {
        init_test_tracing();
        let pool = setup_test_db().await?;
        insert_order(&pool, TestOrder::new("1", "Курс", 100.0, "2024-03-01 09:00:00")).await?;
        insert_order(&pool, TestOrder::new("2", "Курс", 50.5, "2024-03-01 18:30:00")).await?;
        insert_order(&pool, TestOrder::new("3", "Вебинар", -20.0, "2024-03-02 10:00:00")).await?;
        insert_order(&pool, TestOrder::new("4", "Вебинар", 70.0, "2024-03-31 23:59:59")).await?;
        // outside the range on both ends
        insert_order(&pool, TestOrder::new("5", "Курс", 999.0, "2024-02-29 23:59:59")).await?;
        insert_order(&pool, TestOrder::new("6", "Курс", 999.0, "2024-04-01 00:00:00")).await?;

        let repo = ReportRepository::new();
        let filter = ReportFilter::default();
        let rows = repo.daily_revenue(&pool, &march(), &filter).await?;

        let days: Vec<&str> = rows.iter().map(|r| r.day.as_str()).collect();
        assert_eq!(days, vec!["2024-03-01", "2024-03-02", "2024-03-31"]);
        assert_eq!(rows[0].total, 150.5);

        let grouped: f64 = rows.iter().map(|r| r.total).sum();
        let total = repo.income_total(&pool, &march(), &filter).await?;
        assert!((grouped - total).abs() < 1e-9);
        assert!((total - 200.5).abs() < 1e-9);
        Ok(())
    }

    #[tokio::test]
    async fn running_total_is_the_prefix_sum_of_days() -> Result<(), AppError> {
        init_test_tracing();
        let pool = setup_test_db().await?;
        insert_order(&pool, TestOrder::new("1", "Курс", 100.0, "2024-03-01 10:00:00")).await?;
        insert_order(&pool, TestOrder::new("2", "Курс", 0.0, "2024-03-02 10:00:00")).await?;
        insert_order(&pool, TestOrder::new("3", "Курс", 50.0, "2024-03-03 10:00:00")).await?;
        insert_order(&pool, TestOrder::new("4", "Другое", 500.0, "2024-03-02 10:00:00")).await?;

        let rows = ReportRepository::new()
            .product_daily_series(&pool, &march(), &ReportFilter::products(vec!["Курс".into()]))
            .await?;

        let daily: Vec<f64> = rows.iter().map(|r| r.daily_income).collect();
        let cumulative: Vec<f64> = rows.iter().map(|r| r.cumulative_income).collect();
        assert_eq!(daily, vec![100.0, 0.0, 50.0]);
        assert_eq!(cumulative, vec![100.0, 100.0, 150.0]);
        assert_eq!(rows[1].total_orders, 1);
        assert_eq!(rows[1].paid_orders, 0);
        Ok(())
    }

    #[tokio::test]
    async fn refunds_make_the_running_total_dip() -> Result<(), AppError> {
        let pool = setup_test_db().await?;
        insert_order(&pool, TestOrder::new("1", "Курс", 100.0, "2024-03-01 10:00:00")).await?;
        insert_order(&pool, TestOrder::new("2", "Курс", -30.0, "2024-03-02 10:00:00")).await?;

        let rows = ReportRepository::new()
            .product_daily_series(&pool, &march(), &ReportFilter::default())
            .await?;
        let cumulative: Vec<f64> = rows.iter().map(|r| r.cumulative_income).collect();
        assert_eq!(cumulative, vec![100.0, 70.0]);
        Ok(())
    }

    #[tokio::test]
    async fn average_check_ignores_non_positive_income() -> Result<(), AppError> {
        init_test_tracing();
        let pool = setup_test_db().await?;
        for (id, income) in [("1", 0.0), ("2", 200.0), ("3", -50.0), ("4", 300.0)] {
            insert_order(&pool, TestOrder::new(id, "Курс", income, "2024-03-05 12:00:00")).await?;
        }

        let rows = ReportRepository::new()
            .product_summary(&pool, &march(), &ReportFilter::products(vec!["Курс".into()]))
            .await?;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product, "Курс");
        assert_eq!(rows[0].total_orders, 4);
        assert_eq!(rows[0].paid_orders, 2);
        assert_eq!(rows[0].total_income, 450.0);
        assert_eq!(rows[0].average_check, 250.0);
        Ok(())
    }

    #[tokio::test]
    async fn paid_products_drop_products_without_payments() -> Result<(), AppError> {
        let pool = setup_test_db().await?;
        insert_order(&pool, TestOrder::new("1", "Курс", 0.0, "2024-03-05 12:00:00")).await?;
        insert_order(&pool, TestOrder::new("2", "Вебинар", 10.0, "2024-03-05 12:00:00")).await?;
        insert_order(&pool, TestOrder::new("3", "Вебинар", 0.0, "2024-03-06 12:00:00")).await?;

        let rows = ReportRepository::new()
            .paid_products(&pool, &march(), &ReportFilter::default())
            .await?;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product, "Вебинар");
        assert_eq!(rows[0].total_orders, 2);
        assert_eq!(rows[0].paid_orders, 1);
        Ok(())
    }

    #[tokio::test]
    async fn category_filter_goes_through_product_names() -> Result<(), AppError> {
        let pool = setup_test_db().await?;
        let course = insert_product(&pool, "Курс").await?;
        let webinar = insert_product(&pool, "Вебинар").await?;
        let education = insert_category(&pool, "Обучение").await?;
        let online = insert_category(&pool, "Онлайн").await?;
        tag_product(&pool, course, education).await?;
        tag_product(&pool, course, online).await?;
        tag_product(&pool, webinar, online).await?;

        insert_order(&pool, TestOrder::new("1", "Курс", 100.0, "2024-03-05 12:00:00")).await?;
        insert_order(&pool, TestOrder::new("2", "Вебинар", 40.0, "2024-03-05 13:00:00")).await?;
        // name drift: no product called "курс " exists, so no category sees it
        insert_order(&pool, TestOrder::new("3", "курс ", 1000.0, "2024-03-05 14:00:00")).await?;

        let repo = ReportRepository::new();
        let education_only = repo.daily_revenue(&pool, &march(), &ReportFilter::category(education)).await?;
        assert_eq!(education_only[0].total, 100.0);

        // a product in two requested categories is still counted once
        let both = ReportFilter { category_ids: vec![education, online], ..Default::default() };
        assert_eq!(repo.income_total(&pool, &march(), &both).await?, 140.0);

        let names = repo.distinct_products(&pool, Some(online)).await?;
        assert_eq!(names, vec!["Вебинар".to_string(), "Курс".to_string()]);
        let all = repo.distinct_products(&pool, None).await?;
        assert_eq!(all.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn category_revenue_applies_include_then_exclude() -> Result<(), AppError> {
        init_test_tracing();
        let pool = setup_test_db().await?;
        let course = insert_product(&pool, "Курс").await?;
        let webinar = insert_product(&pool, "Вебинар").await?;
        let retreat = insert_product(&pool, "Ретрит").await?;
        let education = insert_category(&pool, "Обучение").await?;
        let online = insert_category(&pool, "Онлайн").await?;
        let offline = insert_category(&pool, "Оффлайн").await?;
        tag_product(&pool, course, education).await?;
        tag_product(&pool, webinar, online).await?;
        tag_product(&pool, retreat, offline).await?;

        insert_order(&pool, TestOrder::new("1", "Курс", 300.0, "2024-03-05 12:00:00")).await?;
        insert_order(&pool, TestOrder::new("2", "Вебинар", 100.0, "2024-03-05 12:00:00")).await?;
        insert_order(&pool, TestOrder::new("3", "Ретрит", 200.0, "2024-03-05 12:00:00")).await?;
        insert_order(&pool, TestOrder::new("4", "Ретрит", -500.0, "2024-03-05 12:00:00")).await?;

        let repo = ReportRepository::new();

        let all = repo.category_revenue(&pool, None, &[], &[]).await?;
        let names: Vec<&str> = all.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(names, vec!["Обучение", "Оффлайн", "Онлайн"]);
        assert_eq!(all[1].revenue, 200.0);

        let without_online = repo.category_revenue(&pool, None, &[], &[online]).await?;
        assert!(without_online.iter().all(|r| r.category_id != online));
        let total: f64 = without_online.iter().map(|r| r.revenue).sum();
        assert_eq!(total, 500.0);

        let narrowed = repo
            .category_revenue(&pool, Some(&march()), &[education, online], &[education])
            .await?;
        assert_eq!(narrowed.len(), 1);
        assert_eq!(narrowed[0].category_id, online);

        let april = DateRange::inclusive(day(2024, 4, 1), day(2024, 4, 30));
        assert!(repo.category_revenue(&pool, Some(&april), &[], &[]).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn monthly_rollups_bucket_by_year_month() -> Result<(), AppError> {
        let pool = setup_test_db().await?;
        let course = insert_product(&pool, "Курс").await?;
        let education = insert_category(&pool, "Обучение").await?;
        tag_product(&pool, course, education).await?;

        insert_order(&pool, TestOrder::new("1", "Курс", 100.0, "2024-01-10 12:00:00")).await?;
        insert_order(&pool, TestOrder::new("2", "Курс", 0.0, "2024-01-11 12:00:00")).await?;
        insert_order(&pool, TestOrder::new("3", "Вебинар", 30.0, "2024-01-12 12:00:00")).await?;
        insert_order(&pool, TestOrder::new("4", "Курс", 20.0, "2024-02-01 12:00:00")).await?;

        let repo = ReportRepository::new();
        let range = DateRange::inclusive(day(2024, 1, 1), day(2024, 2, 29));
        let filter = ReportFilter::default();

        let overall = repo.monthly_overall(&pool, &range, &filter).await?;
        assert_eq!(overall.len(), 2);
        assert_eq!(overall[0].month, "2024-01");
        assert_eq!(overall[0].total_orders, 2);
        assert_eq!(overall[0].total_income, 130.0);

        let by_product = repo.monthly_by_product(&pool, &range, &filter).await?;
        assert_eq!(by_product.len(), 3);
        assert_eq!(by_product[0].product, "Курс");

        let by_category = repo.monthly_by_category(&pool, &range, &filter).await?;
        assert_eq!(by_category.len(), 2);
        assert!(by_category.iter().all(|r| r.category == "Обучение"));

        let only_course = repo
            .monthly_overall(&pool, &range, &ReportFilter::category(education))
            .await?;
        assert_eq!(only_course[0].total_income, 100.0);
        Ok(())
    }

    #[tokio::test]
    async fn empty_filters_return_empty_results() -> Result<(), AppError> {
        let pool = setup_test_db().await?;
        insert_order(&pool, TestOrder::new("1", "Курс", 100.0, "2024-03-05 12:00:00")).await?;

        let repo = ReportRepository::new();
        let unknown = ReportFilter::products(vec!["Нет такого".into()]);
        assert!(repo.daily_revenue(&pool, &march(), &unknown).await?.is_empty());
        assert!(repo.product_summary(&pool, &march(), &unknown).await?.is_empty());
        assert!(repo.product_daily_series(&pool, &march(), &ReportFilter::category(42)).await?.is_empty());
        assert_eq!(repo.income_total(&pool, &march(), &unknown).await?, 0.0);
        Ok(())
    }
}
