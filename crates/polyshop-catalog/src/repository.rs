use crate::error::CatalogError;
use crate::product::Product;
use polyshop_reconnect::connectors::PgConnector;
use polyshop_reconnect::{Handle, PingError};
use std::future::Future;

/// Read access to the product catalog.
pub trait ProductRepository: Send + Sync + 'static {
    /// Every product, ordered by category then name.
    fn list_products(&self) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;

    /// One product, or [`CatalogError::NotFound`].
    fn product_by_id(&self, id: i32) -> impl Future<Output = Result<Product, CatalogError>> + Send;

    /// Products in `category`, ordered by name.
    fn products_by_category(
        &self,
        category: &str,
    ) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;

    /// Liveness of the backing database.
    fn ping(&self) -> impl Future<Output = Result<(), CatalogError>> + Send;
}

const SELECT_PRODUCT: &str = "SELECT id, name, description, price::float8 AS price, stock, \
     category, image_url, created_at::timestamptz AS created_at, \
     updated_at::timestamptz AS updated_at FROM products";

/// [`ProductRepository`] over the `products` table.
#[derive(Debug, Clone)]
pub struct PgProductRepository {
    handle: Handle<PgConnector>,
}

impl PgProductRepository {
    /// Queries run on the pool behind `handle`.
    pub fn new(handle: Handle<PgConnector>) -> Self {
        Self { handle }
    }

    /// The pool handle, for closing on shutdown.
    pub fn handle(&self) -> &Handle<PgConnector> {
        &self.handle
    }
}

impl ProductRepository for PgProductRepository {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        let query = format!("{SELECT_PRODUCT} ORDER BY category, name");
        let products = sqlx::query_as::<_, Product>(&query)
            .fetch_all(self.handle.connection())
            .await?;
        tracing::debug!(count = products.len(), "listed products");
        Ok(products)
    }

    async fn product_by_id(&self, id: i32) -> Result<Product, CatalogError> {
        let query = format!("{SELECT_PRODUCT} WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(self.handle.connection())
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    async fn products_by_category(&self, category: &str) -> Result<Vec<Product>, CatalogError> {
        let query = format!("{SELECT_PRODUCT} WHERE category = $1 ORDER BY name");
        let products = sqlx::query_as::<_, Product>(&query)
            .bind(category)
            .fetch_all(self.handle.connection())
            .await?;
        tracing::debug!(category, count = products.len(), "listed products by category");
        Ok(products)
    }

    async fn ping(&self) -> Result<(), CatalogError> {
        self.handle.ping().await.map_err(|e| match e {
            PingError::Store(e) => CatalogError::Database(e),
            other => CatalogError::Unavailable(other.to_string()),
        })
    }
}
