use rust_decimal::Decimal;

use crate::domain::product::{Product, ProductId};

/// The catalog every fresh process starts with.
pub fn sample_products() -> Vec<Product> {
    vec![
        sample(1, 50, "kaas", "een lekker stuk kaas", "zuivel"),
        sample(2, 10, "t-shirt", "een simpel wit t-shirt", "shirts"),
        sample(3, 35, "nike air max", "mooie stijlvolle schoenen", "schoenen"),
    ]
}

fn sample(id: i64, price: i64, name: &str, description: &str, category: &str) -> Product {
    Product {
        id: ProductId(id),
        price: Decimal::from(price),
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
    }
}
