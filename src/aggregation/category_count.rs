use crate::errors::ServiceError;
use crate::stores::{CategoryStore, ProductStore};
use tracing::instrument;
use uuid::Uuid;

/// Recomputes a category's denormalized product count from the products
/// currently assigned to it.
#[derive(Clone)]
pub struct CategoryCountAggregator {
    products: ProductStore,
    categories: CategoryStore,
}

impl CategoryCountAggregator {
    pub fn new(products: ProductStore, categories: CategoryStore) -> Self {
        Self {
            products,
            categories,
        }
    }

    /// Counts the products referencing the category and writes the count
    /// onto the category row. Writing to a category that no longer exists
    /// is a no-op, so the recompute tolerates a concurrent delete.
    #[instrument(skip(self))]
    pub async fn recompute_category_count(&self, category_id: Uuid) -> Result<u64, ServiceError> {
        let count = self.products.count_by_category(category_id).await?;
        self.categories
            .set_product_count(category_id, count as i32)
            .await?;
        Ok(count)
    }
}
