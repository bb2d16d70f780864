use crate::entities::{product, Product, ProductModel};
use crate::errors::ServiceError;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use std::sync::Arc;
use uuid::Uuid;

/// Product collection access.
#[derive(Clone)]
pub struct ProductStore {
    db: Arc<DatabaseConnection>,
}

impl ProductStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn insert(&self, model: product::ActiveModel) -> Result<ProductModel, ServiceError> {
        Ok(model.insert(&*self.db).await?)
    }

    pub async fn update(&self, model: product::ActiveModel) -> Result<ProductModel, ServiceError> {
        Ok(model.update(&*self.db).await?)
    }

    pub async fn find_all(&self) -> Result<Vec<ProductModel>, ServiceError> {
        Product::find()
            .order_by_desc(product::Column::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ProductModel>, ServiceError> {
        Product::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<ProductModel>, ServiceError> {
        Product::find()
            .filter(product::Column::Name.eq(name))
            .one(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// Fetches the given products in unspecified order; missing ids are
    /// simply absent from the result.
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<ProductModel>, ServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Product::find()
            .filter(product::Column::Id.is_in(ids.iter().copied()))
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_category(
        &self,
        category_id: Uuid,
    ) -> Result<Vec<ProductModel>, ServiceError> {
        Product::find()
            .filter(product::Column::CategoryId.eq(category_id))
            .order_by_desc(product::Column::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    pub async fn count_by_category(&self, category_id: Uuid) -> Result<u64, ServiceError> {
        Product::find()
            .filter(product::Column::CategoryId.eq(category_id))
            .count(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// Top products by sales count, descending. Product id ascending breaks
    /// ties so repeated runs produce the same ranking.
    pub async fn top_by_sales(&self, limit: u64) -> Result<Vec<ProductModel>, ServiceError> {
        Product::find()
            .order_by_desc(product::Column::SalesCount)
            .order_by_asc(product::Column::Id)
            .limit(limit)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// Top products by price, ascending, tie-broken by product id.
    pub async fn top_by_price(&self, limit: u64) -> Result<Vec<ProductModel>, ServiceError> {
        Product::find()
            .order_by_asc(product::Column::Price)
            .order_by_asc(product::Column::Id)
            .limit(limit)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// Returns the number of rows deleted (0 when the id was absent).
    pub async fn delete_by_id(&self, id: Uuid) -> Result<u64, ServiceError> {
        let result = Product::delete_by_id(id).exec(&*self.db).await?;
        Ok(result.rows_affected)
    }

    /// Writes both rating fields onto the product row in a single UPDATE.
    /// A missing row is a silent no-op.
    pub async fn set_rating(
        &self,
        id: Uuid,
        average_rating: Decimal,
        review_count: i32,
    ) -> Result<(), ServiceError> {
        Product::update_many()
            .col_expr(product::Column::AverageRating, Expr::value(average_rating))
            .col_expr(product::Column::ReviewCount, Expr::value(review_count))
            .col_expr(product::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(product::Column::Id.eq(id))
            .exec(&*self.db)
            .await?;
        Ok(())
    }
}
