// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "Sales Insight API", description = "Spreadsheet ingestion and sales reporting"),
    paths(
        // --- Health ---
        handlers::pages::health,

        // --- Auth ---
        handlers::auth::status,
        handlers::auth::login,
        handlers::auth::user_status,

        // --- Import ---
        handlers::imports::upload_orders,
        handlers::imports::upload_contacts,
        handlers::entities::get_order,
        handlers::entities::get_contact,

        // --- Product grouping ---
        handlers::catalog::list_categories,
        handlers::catalog::create_category,
        handlers::catalog::delete_category,
        handlers::catalog::list_products,
        handlers::catalog::get_product,
        handlers::catalog::assign_categories,
        handlers::catalog::sync_products,

        // --- Reports ---
        handlers::reports::daily_revenue,
        handlers::reports::product_sales,
        handlers::reports::paid_products,
        handlers::reports::category_revenue,
        handlers::reports::monthly,
        handlers::reports::product_names,
        handlers::reports::categories,

        // --- Partners ---
        handlers::partners::partner_rollup,
        handlers::partners::export_partner_rollup,

        // --- Export ---
        handlers::export::export_all,
    ),
    components(
        schemas(
            // --- Import ---
            models::import::ImportSummary,
            models::entities::Order,
            models::entities::Contact,
            handlers::imports::UploadForm,

            // --- Auth ---
            models::auth::LoginPayload,
            models::auth::ServiceStatus,
            models::auth::UserStatus,

            // --- Product grouping ---
            models::catalog::Category,
            models::catalog::ProductWithCategories,
            models::catalog::CreateCategoryPayload,
            models::catalog::AssignCategoriesPayload,
            models::catalog::SyncResult,
            models::catalog::MessageResponse,

            // --- Reports ---
            models::report::DailyRevenue,
            models::report::DailyProductSales,
            models::report::ProductSummaryRow,
            models::report::Conversion,
            models::report::ProductSalesReport,
            models::report::PaidProductRow,
            models::report::CategoryRevenue,
            models::report::MonthlySales,
            models::report::MonthlyProductSales,
            models::report::MonthlyCategorySales,
            models::report::MonthlyReport,

            // --- Partners ---
            models::partner::PartnerRow,
        )
    ),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Auth", description = "Placeholder authentication"),
        (name = "Import", description = "Orders and contacts uploads"),
        (name = "Product grouping", description = "Products, categories and tagging"),
        (name = "Reports", description = "Revenue, conversion and monthly rollups"),
        (name = "Partners", description = "Partner attribution by utm_source"),
        (name = "Export", description = "Full database dump")
    )
)]
pub struct ApiDoc;
