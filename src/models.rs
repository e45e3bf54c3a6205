pub mod auth;
pub mod catalog;
pub mod entities;
pub mod import;
pub mod partner;
pub mod report;
