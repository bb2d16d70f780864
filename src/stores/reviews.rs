use crate::entities::{review, Review, ReviewModel};
use crate::errors::ServiceError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use std::sync::Arc;
use uuid::Uuid;

/// Review collection access.
#[derive(Clone)]
pub struct ReviewStore {
    db: Arc<DatabaseConnection>,
}

impl ReviewStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn insert(&self, model: review::ActiveModel) -> Result<ReviewModel, ServiceError> {
        Ok(model.insert(&*self.db).await?)
    }

    pub async fn update(&self, model: review::ActiveModel) -> Result<ReviewModel, ServiceError> {
        Ok(model.update(&*self.db).await?)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ReviewModel>, ServiceError> {
        Review::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// Reviews for a product, newest first. Works for products that no
    /// longer exist; orphaned reviews are still listed.
    pub async fn find_by_product(
        &self,
        product_id: Uuid,
    ) -> Result<Vec<ReviewModel>, ServiceError> {
        Review::find()
            .filter(review::Column::ProductId.eq(product_id))
            .order_by_desc(review::Column::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// Reviews authored by a user, newest first.
    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<ReviewModel>, ServiceError> {
        Review::find()
            .filter(review::Column::UserId.eq(user_id))
            .order_by_desc(review::Column::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// Rating values of a product's active reviews, the aggregation input.
    pub async fn active_ratings(&self, product_id: Uuid) -> Result<Vec<i32>, ServiceError> {
        Review::find()
            .select_only()
            .column(review::Column::Rating)
            .filter(review::Column::ProductId.eq(product_id))
            .filter(review::Column::IsActive.eq(true))
            .into_tuple::<i32>()
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// Returns the number of rows deleted (0 when the id was absent).
    pub async fn delete_by_id(&self, id: Uuid) -> Result<u64, ServiceError> {
        let result = Review::delete_by_id(id).exec(&*self.db).await?;
        Ok(result.rows_affected)
    }
}
