use crate::entities::CategoryModel;
use crate::errors::ServiceError;
use crate::stores::{CategoryStore, ProductStore};
use tracing::instrument;

/// Name of the dynamic best-sellers category.
pub const BEST_SELLERS_NAME: &str = "Más Vendidos";
/// Name of the dynamic lowest-price category.
pub const LOWEST_PRICE_NAME: &str = "Precios Más Bajos";
/// Maximum member count of a dynamic category.
pub const DYNAMIC_MEMBER_LIMIT: u64 = 10;

const BEST_SELLERS_DESCRIPTION: &str = "Los productos más vendidos de la tienda";
const LOWEST_PRICE_DESCRIPTION: &str = "Los productos con los precios más bajos";

/// Maintains the two curated categories whose membership is a ranking over
/// the product table rather than a `category_id` assignment.
#[derive(Clone)]
pub struct DynamicCategoryCurator {
    products: ProductStore,
    categories: CategoryStore,
}

impl DynamicCategoryCurator {
    pub fn new(products: ProductStore, categories: CategoryStore) -> Self {
        Self {
            products,
            categories,
        }
    }

    /// Rebuilds the best-sellers category from the current sales ranking,
    /// creating it on first refresh.
    #[instrument(skip(self))]
    pub async fn refresh_best_sellers(&self) -> Result<CategoryModel, ServiceError> {
        let ranked = self.products.top_by_sales(DYNAMIC_MEMBER_LIMIT).await?;
        let member_ids: Vec<_> = ranked.iter().map(|p| p.id).collect();

        self.categories
            .upsert_dynamic(BEST_SELLERS_NAME, BEST_SELLERS_DESCRIPTION, &member_ids)
            .await
    }

    /// Rebuilds the lowest-price category from the current price ranking,
    /// creating it on first refresh.
    #[instrument(skip(self))]
    pub async fn refresh_lowest_price(&self) -> Result<CategoryModel, ServiceError> {
        let ranked = self.products.top_by_price(DYNAMIC_MEMBER_LIMIT).await?;
        let member_ids: Vec<_> = ranked.iter().map(|p| p.id).collect();

        self.categories
            .upsert_dynamic(LOWEST_PRICE_NAME, LOWEST_PRICE_DESCRIPTION, &member_ids)
            .await
    }
}
