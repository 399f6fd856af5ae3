use tokio::sync::RwLock;

use crate::catalog::fixtures::sample_products;
use crate::catalog::query::has_category;
use crate::domain::product::{Product, ProductDraft, ProductId};
use crate::errors::CatalogError;

/// Process-local product collection. Insertion order is significant: listings
/// without a sort order return products in the order they are held here.
#[derive(Default)]
pub struct CatalogStore {
    products: RwLock<Vec<Product>>,
}

impl CatalogStore {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products: RwLock::new(products) }
    }

    pub fn seeded() -> Self {
        Self::new(sample_products())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> Vec<Product> {
        self.products.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }

    pub async fn find(&self, id: ProductId) -> Option<Product> {
        let products = self.products.read().await;
        products.iter().find(|product| product.id == id).cloned()
    }

    /// Exact, case-sensitive lookup; the first product with the name wins.
    pub async fn find_by_name(&self, name: &str) -> Option<Product> {
        let products = self.products.read().await;
        products.iter().find(|product| product.name == name).cloned()
    }

    pub async fn has_category(&self, category: &str) -> bool {
        let products = self.products.read().await;
        has_category(&products, category)
    }

    pub async fn insert(&self, draft: ProductDraft) -> Product {
        let mut products = self.products.write().await;
        let id = next_id(&products);
        let product = draft.into_product(id);
        products.push(product.clone());
        product
    }

    /// Replaces the product with `id`. The replacement moves to the end of the
    /// collection rather than keeping the old position.
    pub async fn replace(&self, id: ProductId, draft: ProductDraft) -> Result<Product, CatalogError> {
        let mut products = self.products.write().await;
        let index = position(&products, id).ok_or_else(|| CatalogError::product_not_found(id))?;
        products.remove(index);

        let product = draft.into_product(id);
        products.push(product.clone());
        Ok(product)
    }

    pub async fn remove(&self, id: ProductId) -> Result<Product, CatalogError> {
        let mut products = self.products.write().await;
        let index = position(&products, id).ok_or_else(|| CatalogError::product_not_found(id))?;
        Ok(products.remove(index))
    }
}

fn next_id(products: &[Product]) -> ProductId {
    let max = products.iter().map(|product| product.id.0).max().unwrap_or(0);
    ProductId(max + 1)
}

fn position(products: &[Product], id: ProductId) -> Option<usize> {
    products.iter().position(|product| product.id == id)
}
