pub mod auth;
pub mod catalog;
pub mod entities;
pub mod export;
pub mod imports;
pub mod pages;
pub mod partners;
pub mod reports;
