pub mod number;
pub mod price;
pub mod product;
