use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProductId {
    type Err = std::num::ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.parse::<i64>().map(Self)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(with = "crate::domain::number")]
    pub price: Decimal,
    pub name: String,
    pub description: String,
    pub category: String,
}

/// Body of a create or update request. Missing fields fall back to zero values
/// and any `id` sent by the client is ignored; the store owns identifiers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProductDraft {
    #[serde(with = "crate::domain::number")]
    pub price: Decimal,
    pub name: String,
    pub description: String,
    pub category: String,
}

impl ProductDraft {
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            price: self.price,
            name: self.name,
            description: self.description,
            category: self.category,
        }
    }
}
