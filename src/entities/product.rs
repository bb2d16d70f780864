use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Product entity
///
/// `average_rating` and `review_count` are derived fields maintained by the
/// rating aggregator; they always reflect the product's active reviews.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate, ToSchema)]
#[schema(as = Product)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Primary key
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Product name (unique)
    #[validate(length(
        min = 1,
        max = 255,
        message = "Product name must be between 1 and 255 characters"
    ))]
    pub name: String,

    /// Product description
    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,

    /// Product price
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub price: Decimal,

    /// Units in stock
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,

    /// Units sold, used for the best-sellers ranking
    #[validate(range(min = 0, message = "Sales count cannot be negative"))]
    pub sales_count: i32,

    /// Category reference; a product may be uncategorized.
    /// No referential integrity is enforced: a dangling reference behaves
    /// like an uncategorized product on read paths.
    pub category_id: Option<Uuid>,

    /// Arithmetic mean of active review ratings, rounded to one decimal
    #[sea_orm(column_type = "Decimal(Some((4, 1)))")]
    pub average_rating: Decimal,

    /// Number of active reviews
    #[validate(range(min = 0, message = "Review count cannot be negative"))]
    pub review_count: i32,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
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
            if let ActiveValue::NotSet = active_model.stock {
                active_model.stock = Set(0);
            }
            if let ActiveValue::NotSet = active_model.sales_count {
                active_model.sales_count = Set(0);
            }
            if let ActiveValue::NotSet = active_model.average_rating {
                active_model.average_rating = Set(Decimal::ZERO);
            }
            if let ActiveValue::NotSet = active_model.review_count {
                active_model.review_count = Set(0);
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
