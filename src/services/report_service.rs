// src/services/report_service.rs

use chrono::NaiveDate;
use sqlx::{Acquire, Executor, Sqlite};

use crate::{
    common::error::AppError,
    db::ReportRepository,
    models::report::{
        percent, CategoryRevenue, Conversion, DailyProductSales, DailyRevenue, DateRange,
        MonthlyReport, PaidProductRow, ProductSalesReport, ProductSummaryRow, ReportFilter,
    },
};

/// Dates handed to this service are inclusive on both ends, as picked on the dashboard.
#[derive(Clone)]
pub struct ReportService {
    repo: ReportRepository,
}

impl ReportService {
    pub fn new(repo: ReportRepository) -> Self {
        Self { repo }
    }

    pub async fn daily_revenue<'e, E>(
        &self,
        executor: E,
        start: NaiveDate,
        end: NaiveDate,
        filter: &ReportFilter,
    ) -> Result<Vec<DailyRevenue>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.repo
            .daily_revenue(executor, &DateRange::inclusive(start, end), filter)
            .await
    }

    /// Daily series with running totals, the per-product summary with its total
    /// row and the conversion. With a positive `reference_income` each day also
    /// carries its share of that income.
    pub async fn product_sales<'e, E>(
        &self,
        executor: E,
        start: NaiveDate,
        end: NaiveDate,
        filter: &ReportFilter,
        reference_income: Option<f64>,
    ) -> Result<ProductSalesReport, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Acquire<'e, Database = Sqlite>,
    {
        let range = DateRange::inclusive(start, end);
        let mut conn = executor.acquire().await?;

        let mut series = self.repo.product_daily_series(&mut *conn, &range, filter).await?;
        let summary = self.repo.product_summary(&mut *conn, &range, filter).await?;

        if let Some(reference) = reference_income.filter(|r| *r > 0.0) {
            apply_shares(&mut series, reference);
        }

        let (total, conversion) = if summary.is_empty() {
            (None, None)
        } else {
            let total = ProductSummaryRow::total(&summary);
            let conversion = Conversion::new(total.total_orders, total.paid_orders);
            (Some(total), Some(conversion))
        };

        Ok(ProductSalesReport { series, summary, total, conversion })
    }

    pub async fn paid_products<'e, E>(
        &self,
        executor: E,
        start: NaiveDate,
        end: NaiveDate,
        filter: &ReportFilter,
    ) -> Result<Vec<PaidProductRow>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.repo
            .paid_products(executor, &DateRange::inclusive(start, end), filter)
            .await
    }

    /// Both dates are needed to restrict the period; otherwise all time is used.
    pub async fn category_revenue<'e, E>(
        &self,
        executor: E,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        include: &[i64],
        exclude: &[i64],
    ) -> Result<Vec<CategoryRevenue>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let range = match (start, end) {
            (Some(start), Some(end)) => Some(DateRange::inclusive(start, end)),
            _ => None,
        };
        self.repo
            .category_revenue(executor, range.as_ref(), include, exclude)
            .await
    }

    pub async fn monthly<'e, E>(
        &self,
        executor: E,
        start: NaiveDate,
        end: NaiveDate,
        filter: &ReportFilter,
    ) -> Result<MonthlyReport, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Acquire<'e, Database = Sqlite>,
    {
        let range = DateRange::inclusive(start, end);
        let mut conn = executor.acquire().await?;

        let overall = self.repo.monthly_overall(&mut *conn, &range, filter).await?;
        let by_product = self.repo.monthly_by_product(&mut *conn, &range, filter).await?;
        let by_category = self.repo.monthly_by_category(&mut *conn, &range, filter).await?;

        Ok(MonthlyReport { overall, by_product, by_category })
    }

    pub async fn product_names<'e, E>(
        &self,
        executor: E,
        category_id: Option<i64>,
    ) -> Result<Vec<String>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.repo.distinct_products(executor, category_id).await
    }
}

fn apply_shares(series: &mut [DailyProductSales], reference: f64) {
    for day in series.iter_mut() {
        day.daily_share = Some(percent(day.daily_income, reference));
        day.cumulative_share = Some(percent(day.cumulative_income, reference));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{
        init_test_tracing, insert_category, insert_order, insert_product, setup_test_db,
        tag_product, TestOrder,
    };

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[tokio::test]
    async fn end_date_is_inclusive() -> Result<(), AppError> {
        init_test_tracing();
        let pool = setup_test_db().await?;
        insert_order(&pool, TestOrder::new("1", "Курс", 10.0, "2024-03-10 23:59:59")).await?;
        insert_order(&pool, TestOrder::new("2", "Курс", 20.0, "2024-03-11 00:00:00")).await?;

        let svc = ReportService::new(ReportRepository::new());
        let rows = svc.daily_revenue(&pool, day(1), day(10), &ReportFilter::default()).await?;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].day, "2024-03-10");
        assert_eq!(rows[0].total, 10.0);
        Ok(())
    }

    #[tokio::test]
    async fn product_sales_carry_total_conversion_and_shares() -> Result<(), AppError> {
        let pool = setup_test_db().await?;
        insert_order(&pool, TestOrder::new("1", "Курс", 100.0, "2024-03-01 10:00:00")).await?;
        insert_order(&pool, TestOrder::new("2", "Курс", 0.0, "2024-03-01 11:00:00")).await?;
        insert_order(&pool, TestOrder::new("3", "Вебинар", 300.0, "2024-03-02 10:00:00")).await?;
        insert_order(&pool, TestOrder::new("4", "Вебинар", 0.0, "2024-03-02 12:00:00")).await?;

        let svc = ReportService::new(ReportRepository::new());
        let report = svc
            .product_sales(&pool, day(1), day(31), &ReportFilter::default(), Some(800.0))
            .await?;

        assert_eq!(report.series.len(), 2);
        assert_eq!(report.series[0].daily_share, Some(12.5));
        assert_eq!(report.series[1].cumulative_share, Some(50.0));

        let total = report.total.expect("total row");
        assert_eq!(total.total_orders, 4);
        assert_eq!(total.paid_orders, 2);
        assert_eq!(total.average_check, 200.0);

        let conversion = report.conversion.expect("conversion");
        assert_eq!(conversion.conversion_rate, 50.0);
        Ok(())
    }

    #[tokio::test]
    async fn empty_period_yields_empty_report() -> Result<(), AppError> {
        let pool = setup_test_db().await?;
        let svc = ReportService::new(ReportRepository::new());

        let report = svc
            .product_sales(&pool, day(1), day(31), &ReportFilter::default(), None)
            .await?;
        assert!(report.series.is_empty());
        assert!(report.summary.is_empty());
        assert_eq!(report.total, None);
        assert_eq!(report.conversion, None);

        let monthly = svc.monthly(&pool, day(1), day(31), &ReportFilter::default()).await?;
        assert!(monthly.overall.is_empty() && monthly.by_product.is_empty() && monthly.by_category.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn category_revenue_needs_both_dates_to_restrict() -> Result<(), AppError> {
        let pool = setup_test_db().await?;
        let product = insert_product(&pool, "Курс").await?;
        let category = insert_category(&pool, "Обучение").await?;
        tag_product(&pool, product, category).await?;
        insert_order(&pool, TestOrder::new("1", "Курс", 10.0, "2023-01-15 10:00:00")).await?;
        insert_order(&pool, TestOrder::new("2", "Курс", 20.0, "2024-03-05 10:00:00")).await?;

        let svc = ReportService::new(ReportRepository::new());

        let march = svc.category_revenue(&pool, Some(day(1)), Some(day(31)), &[], &[]).await?;
        assert_eq!(march[0].revenue, 20.0);

        let all_time = svc.category_revenue(&pool, Some(day(1)), None, &[], &[]).await?;
        assert_eq!(all_time[0].revenue, 30.0);
        Ok(())
    }

    #[test]
    fn shares_are_percentages_of_the_reference() {
        let mut series = vec![DailyProductSales {
            day: "2024-03-01".into(),
            total_orders: 1,
            paid_orders: 1,
            daily_income: 30.0,
            cumulative_income: 30.0,
            daily_share: None,
            cumulative_share: None,
        }];
        apply_shares(&mut series, 90.0);
        assert_eq!(series[0].daily_share, Some(33.33));
    }
}
