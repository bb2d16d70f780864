use crate::aggregation::RatingAggregator;
use crate::entities::{review, ProductModel, ReviewModel};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::stores::{ProductStore, ReviewStore};
use sea_orm::{ActiveValue::Set, DatabaseConnection};
use std::sync::Arc;
use tracing::{instrument, warn};
use uuid::Uuid;

/// Input for creating a review.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub user_id: Uuid,
    pub content: String,
    pub rating: i32,
}

/// Partial update for a review. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateReview {
    pub content: Option<String>,
    pub rating: Option<i32>,
    pub is_active: Option<bool>,
}

/// Review CRUD plus the rating recompute every review mutation triggers.
#[derive(Clone)]
pub struct ReviewService {
    reviews: ReviewStore,
    products: ProductStore,
    rating_aggregator: RatingAggregator,
    event_sender: Arc<EventSender>,
}

impl ReviewService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        let reviews = ReviewStore::new(db.clone());
        let products = ProductStore::new(db);
        let rating_aggregator = RatingAggregator::new(products.clone(), reviews.clone());
        Self {
            reviews,
            products,
            rating_aggregator,
            event_sender,
        }
    }

    /// Creates a review for an existing product and returns the product with
    /// its freshly recomputed rating fields.
    #[instrument(skip(self, input), fields(user_id = %input.user_id))]
    pub async fn create_review(
        &self,
        product_id: Uuid,
        input: NewReview,
    ) -> Result<ProductModel, ServiceError> {
        self.products
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))?;

        let active = review::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(product_id),
            user_id: Set(input.user_id),
            content: Set(input.content),
            rating: Set(input.rating),
            ..Default::default()
        };

        let created = self.reviews.insert(active).await?;

        self.recompute_rating_or_warn(product_id).await;

        self.event_sender
            .send_or_log(Event::ReviewCreated {
                review_id: created.id,
                product_id,
            })
            .await;

        self.products
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))
    }

    #[instrument(skip(self, input))]
    pub async fn update_review(
        &self,
        id: Uuid,
        input: UpdateReview,
    ) -> Result<ReviewModel, ServiceError> {
        let existing = self
            .reviews
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Review {} not found", id)))?;

        let product_id = existing.product_id;
        let mut active: review::ActiveModel = existing.into();

        if let Some(content) = input.content {
            active.content = Set(content);
        }
        if let Some(rating) = input.rating {
            active.rating = Set(rating);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }

        let updated = self.reviews.update(active).await?;

        self.recompute_rating_or_warn(product_id).await;

        self.event_sender
            .send_or_log(Event::ReviewUpdated {
                review_id: updated.id,
                product_id,
            })
            .await;

        Ok(updated)
    }

    /// Removes the review row entirely and recomputes the product's rating
    /// from the remaining reviews.
    #[instrument(skip(self))]
    pub async fn delete_review(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self
            .reviews
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Review {} not found", id)))?;

        let product_id = existing.product_id;
        self.reviews.delete_by_id(id).await?;

        self.recompute_rating_or_warn(product_id).await;

        self.event_sender
            .send_or_log(Event::ReviewDeleted {
                review_id: id,
                product_id,
            })
            .await;

        Ok(())
    }

    /// Reviews for a product, newest first. The product itself is not
    /// required to exist; orphaned reviews remain listable.
    #[instrument(skip(self))]
    pub async fn list_for_product(
        &self,
        product_id: Uuid,
    ) -> Result<Vec<ReviewModel>, ServiceError> {
        self.reviews.find_by_product(product_id).await
    }

    /// Reviews authored by a user, newest first.
    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ReviewModel>, ServiceError> {
        self.reviews.find_by_user(user_id).await
    }

    /// The product's stored rating summary. Reads the precomputed columns
    /// rather than re-aggregating.
    #[instrument(skip(self))]
    pub async fn product_rating(&self, product_id: Uuid) -> Result<ProductModel, ServiceError> {
        self.products
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))
    }

    /// A failed recompute never rolls back the review mutation; stale
    /// derived fields are repaired by the next recompute.
    async fn recompute_rating_or_warn(&self, product_id: Uuid) {
        match self
            .rating_aggregator
            .recompute_product_rating(product_id)
            .await
        {
            Ok(summary) => {
                self.event_sender
                    .send_or_log(Event::ProductRatingRecomputed {
                        product_id,
                        average_rating: summary.average_rating,
                        review_count: summary.review_count,
                    })
                    .await;
            }
            Err(e) => {
                warn!(%product_id, error = %e, "Rating recompute failed");
            }
        }
    }
}
