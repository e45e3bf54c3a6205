// src/models/report.rs

use chrono::{Days, NaiveDate};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

pub const TOTAL_ROW_LABEL: &str = "Итого";

/// Half-open interval of calendar days: `start <= day < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Both bounds inclusive, the way users pick them; `end` is pushed one day forward.
    pub fn inclusive(start: NaiveDate, end: NaiveDate) -> Self {
        let end = end.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }
}

/// Optional restrictions shared by the per-order reports. Empty means "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub products: Vec<String>,
    pub category_ids: Vec<i64>,
}

#[cfg(test)]
impl ReportFilter {
    pub fn products(products: Vec<String>) -> Self {
        Self { products, ..Default::default() }
    }

    pub fn category(category_id: i64) -> Self {
        Self { category_ids: vec![category_id], ..Default::default() }
    }
}

// =========================================================================
//  DAILY
// =========================================================================

#[derive(Debug, Clone, Serialize, FromRow, ToSchema, PartialEq)]
pub struct DailyRevenue {
    #[schema(example = "2024-03-01")]
    pub day: String,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema, PartialEq)]
pub struct DailyProductSales {
    pub day: String,
    pub total_orders: i64,
    pub paid_orders: i64,
    pub daily_income: f64,
    pub cumulative_income: f64,
    /// Daily income as % of the reference income, when one was given.
    #[sqlx(skip)]
    pub daily_share: Option<f64>,
    #[sqlx(skip)]
    pub cumulative_share: Option<f64>,
}

// =========================================================================
//  PRODUCT SUMMARY
// =========================================================================

#[derive(Debug, Clone, Serialize, FromRow, ToSchema, PartialEq)]
pub struct ProductSummaryRow {
    pub product: String,
    pub total_orders: i64,
    pub paid_orders: i64,
    pub total_income: f64,
    /// Mean income over paid orders only.
    pub average_check: f64,
}

impl ProductSummaryRow {
    /// Sums the per-product rows. The average is total income over paid orders,
    /// not an average of the per-product averages.
    pub fn total(rows: &[ProductSummaryRow]) -> ProductSummaryRow {
        let total_orders = rows.iter().map(|r| r.total_orders).sum();
        let paid_orders: i64 = rows.iter().map(|r| r.paid_orders).sum();
        let total_income: f64 = rows.iter().map(|r| r.total_income).sum();
        let average_check = if paid_orders > 0 {
            total_income / paid_orders as f64
        } else {
            0.0
        };

        ProductSummaryRow {
            product: TOTAL_ROW_LABEL.to_string(),
            total_orders,
            paid_orders,
            total_income: round2(total_income),
            average_check: round2(average_check),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
pub struct Conversion {
    pub total_orders: i64,
    pub paid_orders: i64,
    /// paid / total × 100, two decimals, 0 when there are no orders.
    pub conversion_rate: f64,
}

impl Conversion {
    pub fn new(total_orders: i64, paid_orders: i64) -> Self {
        Self {
            total_orders,
            paid_orders,
            conversion_rate: percent(paid_orders as f64, total_orders as f64),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
pub struct ProductSalesReport {
    pub series: Vec<DailyProductSales>,
    pub summary: Vec<ProductSummaryRow>,
    pub total: Option<ProductSummaryRow>,
    pub conversion: Option<Conversion>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema, PartialEq)]
pub struct PaidProductRow {
    pub product: String,
    pub total_orders: i64,
    pub paid_orders: i64,
    pub total_income: f64,
}

// =========================================================================
//  CATEGORIES
// =========================================================================

#[derive(Debug, Clone, Serialize, FromRow, ToSchema, PartialEq)]
pub struct CategoryRevenue {
    pub category_id: i64,
    pub category: String,
    pub revenue: f64,
}

// =========================================================================
//  MONTHLY
// =========================================================================

#[derive(Debug, Clone, Serialize, FromRow, ToSchema, PartialEq)]
pub struct MonthlySales {
    #[schema(example = "2024-03")]
    pub month: String,
    pub total_orders: i64,
    pub paid_orders: i64,
    pub total_income: f64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema, PartialEq)]
pub struct MonthlyProductSales {
    pub month: String,
    pub product: String,
    pub total_orders: i64,
    pub paid_orders: i64,
    pub total_income: f64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema, PartialEq)]
pub struct MonthlyCategorySales {
    pub month: String,
    pub category: String,
    pub total_orders: i64,
    pub paid_orders: i64,
    pub total_income: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
pub struct MonthlyReport {
    pub overall: Vec<MonthlySales>,
    pub by_product: Vec<MonthlyProductSales>,
    pub by_category: Vec<MonthlyCategorySales>,
}

// =========================================================================
//  HELPERS
// =========================================================================

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole × 100` rounded to two decimals; 0 when `whole` is 0.
pub fn percent(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    round2(part / whole * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(product: &str, total: i64, paid: i64, income: f64, avg: f64) -> ProductSummaryRow {
        ProductSummaryRow {
            product: product.into(),
            total_orders: total,
            paid_orders: paid,
            total_income: income,
            average_check: avg,
        }
    }

    #[test]
    fn inclusive_range_pushes_end_forward() {
        let range = DateRange::inclusive(
            NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
        );
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn total_row_is_not_an_average_of_averages() {
        let rows = vec![row("A", 4, 1, 100.0, 100.0), row("B", 2, 3, 500.0, 166.67)];
        let total = ProductSummaryRow::total(&rows);
        assert_eq!(total.product, TOTAL_ROW_LABEL);
        assert_eq!(total.total_orders, 6);
        assert_eq!(total.paid_orders, 4);
        assert_eq!(total.total_income, 600.0);
        assert_eq!(total.average_check, 150.0);
    }

    #[test]
    fn total_row_without_paid_orders_has_zero_average() {
        let total = ProductSummaryRow::total(&[row("A", 3, 0, 0.0, 0.0)]);
        assert_eq!(total.average_check, 0.0);
    }

    #[test]
    fn conversion_guards_division_by_zero() {
        assert_eq!(Conversion::new(0, 0).conversion_rate, 0.0);
        assert_eq!(Conversion::new(3, 1).conversion_rate, 33.33);
        assert_eq!(Conversion::new(8, 2).conversion_rate, 25.0);
    }
}
