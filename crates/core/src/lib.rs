pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;

pub use catalog::{CatalogStore, ProductFilter, ProductPage, SortOrder};
pub use domain::price::{PriceQuote, PriceRequest};
pub use domain::product::{Product, ProductDraft, ProductId};
pub use errors::CatalogError;
