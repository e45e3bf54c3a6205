// src/config.rs

use std::{env, net::SocketAddr, str::FromStr};

use anyhow::Context;
use sqlx::SqlitePool;

use crate::{
    db::{
        CatalogRepository, EntityRepository, ExportRepository, ImportRepository,
        PartnerRepository, ReportRepository,
    },
    models::import::HeaderPolicy,
    services::{
        AuthService, CatalogService, EntityService, ExportService, ImportService, PartnerService,
        ReportService,
    },
};

const DEFAULT_DATABASE_URL: &str = "sqlite://analytics.db";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8050";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub header_policy: HeaderPolicy,
    pub max_upload_bytes: usize,
    pub db_max_connections: u32,
}

impl Config {
    /// Reads `.env` (when present) and the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address such as 0.0.0.0:8050")?;

        let header_policy = match lookup("IMPORT_HEADER_POLICY") {
            Some(raw) => HeaderPolicy::from_str(&raw).map_err(anyhow::Error::msg)?,
            None => HeaderPolicy::default(),
        };

        let max_upload_bytes = parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;
        let db_max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?;
        if db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }

        Ok(Self {
            database_url,
            bind_addr,
            header_policy,
            max_upload_bytes,
            db_max_connections,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Config,
    pub auth_service: AuthService,
    pub import_service: ImportService,
    pub entity_service: EntityService,
    pub catalog_service: CatalogService,
    pub report_service: ReportService,
    pub partner_service: PartnerService,
    pub export_service: ExportService,
}

impl AppState {
    /// Wires repositories into services around an already connected pool.
    pub fn new(db_pool: SqlitePool, config: Config) -> Self {
        Self {
            auth_service: AuthService::new(),
            import_service: ImportService::new(ImportRepository::new(), config.header_policy),
            entity_service: EntityService::new(EntityRepository::new()),
            catalog_service: CatalogService::new(CatalogRepository::new()),
            report_service: ReportService::new(ReportRepository::new()),
            partner_service: PartnerService::new(PartnerRepository::new()),
            export_service: ExportService::new(ExportRepository::new()),
            db_pool,
            config,
        }
    }
}
