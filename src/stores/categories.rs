use crate::entities::{category, Category, CategoryModel};
use crate::errors::ServiceError;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use std::sync::Arc;
use uuid::Uuid;

/// Category collection access.
#[derive(Clone)]
pub struct CategoryStore {
    db: Arc<DatabaseConnection>,
}

impl CategoryStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn insert(
        &self,
        model: category::ActiveModel,
    ) -> Result<CategoryModel, ServiceError> {
        Ok(model.insert(&*self.db).await?)
    }

    pub async fn update(
        &self,
        model: category::ActiveModel,
    ) -> Result<CategoryModel, ServiceError> {
        Ok(model.update(&*self.db).await?)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CategoryModel>, ServiceError> {
        Category::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<CategoryModel>, ServiceError> {
        Category::find()
            .filter(category::Column::Name.eq(name))
            .one(&*self.db)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<CategoryModel>, ServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Category::find()
            .filter(category::Column::Id.is_in(ids.iter().copied()))
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// Active categories sorted by name, the public listing order.
    pub async fn find_active_sorted(&self) -> Result<Vec<CategoryModel>, ServiceError> {
        Category::find()
            .filter(category::Column::IsActive.eq(true))
            .order_by_asc(category::Column::Name)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// Returns the number of rows deleted (0 when the id was absent).
    pub async fn delete_by_id(&self, id: Uuid) -> Result<u64, ServiceError> {
        let result = Category::delete_by_id(id).exec(&*self.db).await?;
        Ok(result.rows_affected)
    }

    /// Writes the derived product count in a single UPDATE. A missing row is
    /// a silent no-op: the count aggregator does not guarantee the category
    /// still exists when it fires.
    pub async fn set_product_count(&self, id: Uuid, count: i32) -> Result<(), ServiceError> {
        Category::update_many()
            .col_expr(category::Column::ProductCount, Expr::value(count))
            .col_expr(category::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(category::Column::Id.eq(id))
            .exec(&*self.db)
            .await?;
        Ok(())
    }

    /// Creates or updates a dynamic category addressed by its unique name,
    /// replacing its member list and keeping `product_count` equal to the
    /// list length.
    pub async fn upsert_dynamic(
        &self,
        name: &str,
        description: &str,
        member_ids: &[Uuid],
    ) -> Result<CategoryModel, ServiceError> {
        let members_json = serde_json::json!(member_ids);
        let count = member_ids.len() as i32;

        match self.find_by_name(name).await? {
            Some(existing) => {
                let mut active: category::ActiveModel = existing.into();
                active.description = Set(Some(description.to_string()));
                active.member_ids = Set(members_json);
                active.product_count = Set(count);
                self.update(active).await
            }
            None => {
                let active = category::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    name: Set(name.to_string()),
                    description: Set(Some(description.to_string())),
                    image_url: Set(None),
                    is_active: Set(true),
                    product_count: Set(count),
                    member_ids: Set(members_json),
                    ..Default::default()
                };
                self.insert(active).await
            }
        }
    }
}
