//! Filtering, ordering and paging over a snapshot of the catalog.

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::Product;
use crate::errors::CatalogError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Insertion,
    LowToHigh,
    HighToLow,
}

impl SortOrder {
    pub const LOW_TO_HIGH: &'static str = "LnH";
    pub const HIGH_TO_LOW: &'static str = "HnL";

    /// Accepts the wire tokens `LnH` and `HnL`; an empty token keeps insertion order.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "" => Some(Self::Insertion),
            Self::LOW_TO_HIGH => Some(Self::LowToHigh),
            Self::HIGH_TO_LOW => Some(Self::HighToLow),
            _ => None,
        }
    }
}

/// Zero prices and empty strings disable their clause.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub name: String,
    pub category: String,
    pub sort: SortOrder,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        let above_min = self.min_price <= Decimal::ZERO || product.price >= self.min_price;
        let below_max = self.max_price <= Decimal::ZERO || product.price <= self.max_price;
        let name = self.name.is_empty()
            || product.name.to_lowercase().contains(&self.name.to_lowercase());
        let category = self.category.is_empty()
            || product.category.to_lowercase() == self.category.to_lowercase();

        above_min && below_max && name && category
    }
}

/// Case-insensitive exact match against any product's category.
pub fn has_category(products: &[Product], category: &str) -> bool {
    let wanted = category.to_lowercase();
    products.iter().any(|product| product.category.to_lowercase() == wanted)
}

pub fn filter_products(products: &[Product], filter: &ProductFilter) -> Vec<Product> {
    let mut filtered: Vec<Product> =
        products.iter().filter(|product| filter.matches(product)).cloned().collect();

    // `sort_by` is stable, so equal prices keep their collection order.
    match filter.sort {
        SortOrder::Insertion => {}
        SortOrder::LowToHigh => filtered.sort_by(|a, b| a.price.cmp(&b.price)),
        SortOrder::HighToLow => filtered.sort_by(|a, b| b.price.cmp(&a.price)),
    }

    filtered
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProductPage {
    pub data: Vec<Product>,
    pub pagination: Pagination,
}

/// Slices `[offset, offset + limit)` out of the filtered set. Metadata is
/// computed from the full filtered count; an offset past the end yields an
/// empty page. A zero `limit` is paged as one.
pub fn paginate(filtered: Vec<Product>, limit: usize, offset: usize) -> ProductPage {
    let limit = limit.max(1);
    let total_items = filtered.len();
    let start = offset.min(total_items);
    let end = offset.saturating_add(limit).min(total_items);
    let data = filtered.into_iter().skip(start).take(end - start).collect();

    ProductPage {
        data,
        pagination: Pagination {
            current_page: offset / limit + 1,
            total_pages: total_items.div_ceil(limit),
            total_items,
            limit,
            offset,
        },
    }
}

/// Raw `GET /products` query string. Empty values count as absent.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub name: Option<String>,
    pub sort_by: Option<String>,
    pub category: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedListQuery {
    pub limit: usize,
    pub offset: usize,
    pub filter: ProductFilter,
}

impl ListQuery {
    /// Checks parameters in a fixed order and reports the first failure.
    /// Whether `category` exists is left to the caller, which owns the catalog.
    pub fn validate(&self) -> Result<ValidatedListQuery, CatalogError> {
        let limit = parse_count(self.limit.as_deref(), 1)
            .ok_or_else(|| CatalogError::invalid("invalid limit value"))?;
        let offset = parse_count(self.offset.as_deref(), 0)
            .ok_or_else(|| CatalogError::invalid("invalid offset value"))?;

        let min_price = parse_price(self.min_price.as_deref())
            .ok_or_else(|| CatalogError::invalid("invalid minimum price value"))?;
        let max_price = parse_price(self.max_price.as_deref())
            .ok_or_else(|| CatalogError::invalid("invalid maximum price value"))?;

        // An unset (zero) maximum never conflicts with a minimum.
        if min_price > Decimal::ZERO && max_price > Decimal::ZERO && max_price < min_price {
            return Err(CatalogError::invalid(
                "maximum price cannot be less than minimum price",
            ));
        }

        let sort = SortOrder::parse(non_empty(self.sort_by.as_deref()).unwrap_or_default())
            .ok_or_else(|| CatalogError::invalid("invalid sort_by value"))?;

        Ok(ValidatedListQuery {
            limit,
            offset,
            filter: ProductFilter {
                min_price,
                max_price,
                name: non_empty(self.name.as_deref()).unwrap_or_default().to_string(),
                category: non_empty(self.category.as_deref()).unwrap_or_default().to_string(),
                sort,
            },
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

fn parse_count(value: Option<&str>, minimum: i64) -> Option<usize> {
    let parsed = non_empty(value)?.parse::<i64>().ok()?;
    if parsed < minimum {
        return None;
    }
    usize::try_from(parsed).ok()
}

/// Absent means zero. Present values must be non-negative numbers; magnitudes
/// outside the decimal range saturate instead of being rejected.
fn parse_price(value: Option<&str>) -> Option<Decimal> {
    let Some(raw) = non_empty(value) else {
        return Some(Decimal::ZERO);
    };
    if let Ok(parsed) = Decimal::from_str(raw).or_else(|_| Decimal::from_scientific(raw)) {
        return (parsed >= Decimal::ZERO).then_some(parsed);
    }

    let float = raw.parse::<f64>().ok()?;
    if float.is_nan() || float < 0.0 {
        return None;
    }
    match Decimal::from_f64(float) {
        Some(parsed) => Some(parsed),
        None if float > 1.0 => Some(Decimal::MAX),
        None => Some(Decimal::ZERO),
    }
}
