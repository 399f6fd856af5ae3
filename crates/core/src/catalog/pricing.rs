use rust_decimal::Decimal;

use crate::domain::price::PriceQuote;
use crate::domain::product::Product;
use crate::errors::CatalogError;

/// `price * quantity`. Quantity is not validated, so zero and negative
/// quantities produce zero and negative totals.
pub fn calculate_price(product: &Product, quantity: i64) -> Result<PriceQuote, CatalogError> {
    let total_price = product
        .price
        .checked_mul(Decimal::from(quantity))
        .ok_or_else(|| CatalogError::invalid("total price is out of range"))?;

    Ok(PriceQuote { name: product.name.clone(), quantity, total_price })
}
