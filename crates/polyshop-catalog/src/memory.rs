use crate::error::CatalogError;
use crate::product::Product;
use crate::repository::ProductRepository;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Fixed, in-process catalog.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<Vec<Product>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryProductRepository {
    /// Serves `products` in catalog order.
    pub fn new(mut products: Vec<Product>) -> Self {
        products.sort_by(|a, b| (&a.category, &a.name).cmp(&(&b.category, &b.name)));
        Self {
            products: Arc::new(products),
            unavailable: Arc::default(),
        }
    }

    /// While set, `ping` fails and queries report the database as unavailable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), CatalogError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CatalogError::Unavailable("database offline".to_string()));
        }
        Ok(())
    }
}

impl ProductRepository for InMemoryProductRepository {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        self.check()?;
        Ok(self.products.to_vec())
    }

    async fn product_by_id(&self, id: i32) -> Result<Product, CatalogError> {
        self.check()?;
        self.products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }

    async fn products_by_category(&self, category: &str) -> Result<Vec<Product>, CatalogError> {
        self.check()?;
        // Already sorted by (category, name), so name order holds within a category.
        Ok(self
            .products
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), CatalogError> {
        self.check()
    }
}
