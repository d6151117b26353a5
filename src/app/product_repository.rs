//! The Product Repository.
//!
//! This module sits between the HTTP handlers and the record store. It is
//! responsible for:
//! 1.  Assigning ids from the shared `index` counter on first save.
//! 2.  Writing each product as a JSON map under its decimal id.
//! 3.  Answering category/name/availability queries by scanning every key.
//!
//! There are no secondary indexes: every query is a full scan.

use crate::domain::{Product, ValidationError};
use crate::storage::{RecordStore, StoreError};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use thiserror::Error;

/// Reserved key holding the id sequence. Never a product.
pub const COUNTER_KEY: &str = "index";

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stored value could not be decoded back into a product.
    #[error("Stored record '{key}' is corrupt: {reason}")]
    Corrupt { key: String, reason: String },
}

/// Result of [`ProductRepository::sell_one`].
#[derive(Debug, Clone, PartialEq)]
pub enum SellOutcome {
    Sold(Product),
    OutOfStock(Product),
    NotFound,
}

/// Repository over an injected [`RecordStore`]. Cheap to clone; clones share
/// the same store handle.
#[derive(Clone)]
pub struct ProductRepository {
    store: Arc<dyn RecordStore>,
}

impl ProductRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Persists `product`, assigning a fresh id when it has none.
    ///
    /// A product that already has an id fully replaces whatever is stored
    /// under that id.
    pub async fn save(&self, mut product: Product) -> RepositoryResult<Product> {
        product.validate()?;
        if !product.is_persisted() {
            product.id = self.store.increment(COUNTER_KEY).await?;
            tracing::debug!(id = product.id, "assigned product id");
        }
        let bytes = serde_json::to_vec(&JsonValue::Object(product.serialize())).map_err(|e| {
            RepositoryError::Corrupt {
                key: product.id.to_string(),
                reason: e.to_string(),
            }
        })?;
        self.store.set(&product.id.to_string(), bytes).await?;
        Ok(product)
    }

    /// Looks up a product by id. Absence is `Ok(None)`, not an error.
    pub async fn find(&self, id: u64) -> RepositoryResult<Option<Product>> {
        if id == 0 {
            return Ok(None);
        }
        self.load(&id.to_string()).await
    }

    pub async fn delete(&self, product: &Product) -> RepositoryResult<()> {
        self.delete_by_id(product.id).await
    }

    /// Removes the record for `id`. Deleting a missing id is a no-op.
    pub async fn delete_by_id(&self, id: u64) -> RepositoryResult<()> {
        if id == 0 {
            return Ok(());
        }
        self.store.delete(&id.to_string()).await?;
        Ok(())
    }

    /// Every stored product, in store enumeration order.
    pub async fn all(&self) -> RepositoryResult<Vec<Product>> {
        let keys = self.store.keys().await?;
        let mut products = Vec::with_capacity(keys.len());
        for key in keys.iter().filter(|k| k.as_str() != COUNTER_KEY) {
            // A key removed between the scan and the read is simply skipped.
            if let Some(product) = self.load(key).await? {
                products.push(product);
            }
        }
        Ok(products)
    }

    /// Products with at least one unit on hand.
    pub async fn available(&self) -> RepositoryResult<Vec<Product>> {
        self.scan(Product::is_available).await
    }

    /// Case-insensitive match on `category`.
    pub async fn find_by_category(&self, category: &str) -> RepositoryResult<Vec<Product>> {
        let wanted = category.to_lowercase();
        self.scan(|p| p.category.to_lowercase() == wanted).await
    }

    /// Case-insensitive match on `name`.
    pub async fn find_by_name(&self, name: &str) -> RepositoryResult<Vec<Product>> {
        let wanted = name.to_lowercase();
        self.scan(|p| p.name.to_lowercase() == wanted).await
    }

    /// Clears the store, counter included, so the next new product gets id 1.
    pub async fn remove_all(&self) -> RepositoryResult<()> {
        self.store.flush_all().await?;
        tracing::warn!("record store flushed");
        Ok(())
    }

    /// Adds one unit of stock.
    pub async fn add_unit(&self, id: u64) -> RepositoryResult<Option<Product>> {
        let Some(mut product) = self.find(id).await? else {
            return Ok(None);
        };
        product.count = product.count.saturating_add(1);
        Ok(Some(self.save(product).await?))
    }

    /// Removes one unit of stock unless the product is already out of stock.
    pub async fn sell_one(&self, id: u64) -> RepositoryResult<SellOutcome> {
        let Some(mut product) = self.find(id).await? else {
            return Ok(SellOutcome::NotFound);
        };
        if !product.is_available() {
            return Ok(SellOutcome::OutOfStock(product));
        }
        product.count -= 1;
        Ok(SellOutcome::Sold(self.save(product).await?))
    }

    /// Resets the store and saves the three reference products.
    pub async fn load_sample_data(&self) -> RepositoryResult<Vec<Product>> {
        self.remove_all().await?;
        let samples = [
            Product::new("Asus2500", "Laptop", 234.0, "Working Condition", "Black", 23),
            Product::new("GE4509", "Microwave", 45.0, "Open Box", "Black", 12),
            Product::new("Hp", "Microwave", 960.0, "Brand New", "Blue", 0),
        ];
        let mut saved = Vec::with_capacity(samples.len());
        for product in samples {
            saved.push(self.save(product).await?);
        }
        tracing::info!(count = saved.len(), "sample products loaded");
        Ok(saved)
    }

    async fn scan<F>(&self, predicate: F) -> RepositoryResult<Vec<Product>>
    where
        F: Fn(&Product) -> bool,
    {
        let mut products = self.all().await?;
        products.retain(|p| predicate(p));
        Ok(products)
    }

    async fn load(&self, key: &str) -> RepositoryResult<Option<Product>> {
        let Some(bytes) = self.store.get(key).await? else {
            return Ok(None);
        };
        let corrupt = |reason: String| RepositoryError::Corrupt {
            key: key.to_string(),
            reason,
        };
        let value: JsonValue = serde_json::from_slice(&bytes).map_err(|e| corrupt(e.to_string()))?;
        let product = Product::deserialize(&value).map_err(|e| corrupt(e.to_string()))?;
        Ok(Some(product))
    }
}
