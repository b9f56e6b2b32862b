//! Application services: content projection, page composition and export.

pub mod ads;
pub mod analytics;
pub mod blog;
pub mod chrome;
pub mod dictionary;
pub mod error;
pub mod locale;
pub mod page;
pub mod site;
pub mod sitemap;
