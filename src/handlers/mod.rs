pub mod categories;
pub mod common;
pub mod products;
pub mod reviews;

use crate::db::DbPool;
use crate::events::EventSender;
use crate::services::{CategoryCatalogService, ProductCatalogService, ReviewService};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

pub use categories::categories_routes;
pub use products::products_routes;
pub use reviews::reviews_routes;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub product_catalog: Arc<ProductCatalogService>,
    pub category_catalog: Arc<CategoryCatalogService>,
    pub reviews: Arc<ReviewService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            product_catalog: Arc::new(ProductCatalogService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            category_catalog: Arc::new(CategoryCatalogService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            reviews: Arc::new(ReviewService::new(db_pool, event_sender)),
        }
    }
}
