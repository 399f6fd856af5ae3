use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PriceRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PriceQuote {
    pub name: String,
    pub quantity: i64,
    #[serde(with = "crate::domain::number")]
    pub total_price: Decimal,
}
