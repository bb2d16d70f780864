use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Category entity
///
/// Two kinds of category share this table, distinguished by `member_ids`:
/// static categories leave it empty and derive membership from products'
/// `category_id` references; dynamic categories (best sellers, lowest price)
/// carry a curator-maintained explicit product id list.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate, ToSchema)]
#[schema(as = Category)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Primary key
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Category name (unique); dynamic categories are addressed by it
    #[validate(length(
        min = 3,
        max = 50,
        message = "Category name must be between 3 and 50 characters"
    ))]
    pub name: String,

    /// Category description
    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,

    /// URL to a category image
    pub image_url: Option<String>,

    /// Inactive categories are hidden from listings
    pub is_active: bool,

    /// Derived product count: referencing products for static categories,
    /// member list length for dynamic ones
    #[validate(range(min = 0, message = "Product count cannot be negative"))]
    pub product_count: i32,

    /// Ordered JSON array of member product ids; empty for static categories
    #[sea_orm(column_type = "Json")]
    pub member_ids: Json,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: Option<DateTime<Utc>>,
}

/// How a category's membership is determined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CategoryMembership {
    /// Curator-maintained explicit product list, in ranking order
    Explicit(Vec<Uuid>),
    /// Products referencing this category through their `category_id`
    ByReference,
}

impl Model {
    /// Classifies this category by its membership mode.
    pub fn membership(&self) -> CategoryMembership {
        let ids: Vec<Uuid> = serde_json::from_value(self.member_ids.clone()).unwrap_or_default();
        if ids.is_empty() {
            CategoryMembership::ByReference
        } else {
            CategoryMembership::Explicit(ids)
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;

        if insert {
            if let ActiveValue::NotSet = active_model.is_active {
                active_model.is_active = Set(true);
            }
            if let ActiveValue::NotSet = active_model.product_count {
                active_model.product_count = Set(0);
            }
            if let ActiveValue::NotSet = active_model.member_ids {
                active_model.member_ids = Set(serde_json::json!([]));
            }

            active_model.created_at = Set(Utc::now());
        }

        active_model.updated_at = Set(Some(Utc::now()));

        let model: Model = active_model.clone().try_into().map_err(|_| {
            DbErr::Custom("Failed to convert ActiveModel to Model for validation".to_string())
        })?;

        if let Err(err) = model.validate() {
            return Err(DbErr::Custom(format!("Validation error: {}", err)));
        }

        Ok(active_model)
    }
}
