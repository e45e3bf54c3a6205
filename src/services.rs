pub mod auth_service;
pub use auth_service::AuthService;
pub mod catalog_service;
pub use catalog_service::CatalogService;
pub mod entity_service;
pub use entity_service::EntityService;
pub mod export_service;
pub use export_service::ExportService;
pub mod import_service;
pub use import_service::ImportService;
pub mod partner_service;
pub use partner_service::PartnerService;
pub mod report_service;
pub use report_service::ReportService;
