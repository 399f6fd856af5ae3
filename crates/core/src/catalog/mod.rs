pub mod fixtures;
pub mod pricing;
pub mod query;
pub mod store;

pub use pricing::calculate_price;
pub use query::{
    filter_products, has_category, paginate, ListQuery, Pagination, ProductFilter, ProductPage,
    SortOrder,
};
pub use store::CatalogStore;
