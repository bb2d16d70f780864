use crate::errors::ServiceError;
use crate::stores::{ProductStore, ReviewStore};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::instrument;
use uuid::Uuid;

/// The derived rating fields stored on a product row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingSummary {
    pub average_rating: Decimal,
    pub review_count: i32,
}

impl RatingSummary {
    pub fn empty() -> Self {
        Self {
            average_rating: Decimal::ZERO,
            review_count: 0,
        }
    }
}

/// Recomputes a product's rating summary from its active reviews.
#[derive(Clone)]
pub struct RatingAggregator {
    products: ProductStore,
    reviews: ReviewStore,
}

impl RatingAggregator {
    pub fn new(products: ProductStore, reviews: ReviewStore) -> Self {
        Self { products, reviews }
    }

    /// Reads every active rating for the product, reduces them to a summary
    /// and writes both derived columns back. Returns the written summary.
    #[instrument(skip(self))]
    pub async fn recompute_product_rating(
        &self,
        product_id: Uuid,
    ) -> Result<RatingSummary, ServiceError> {
        if self.products.find_by_id(product_id).await?.is_none() {
            return Err(ServiceError::NotFound(format!(
                "Product {} not found",
                product_id
            )));
        }

        let ratings = self.reviews.active_ratings(product_id).await?;
        let summary = summarize(&ratings);

        self.products
            .set_rating(product_id, summary.average_rating, summary.review_count)
            .await?;

        Ok(summary)
    }
}

/// Mean of the ratings rounded half-away-from-zero to one decimal place.
/// No ratings yields the zero summary, not an error.
fn summarize(ratings: &[i32]) -> RatingSummary {
    if ratings.is_empty() {
        return RatingSummary::empty();
    }

    let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
    let average = (Decimal::from(sum) / Decimal::from(ratings.len() as i64))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);

    RatingSummary {
        average_rating: average,
        review_count: ratings.len() as i32,
    }
}
