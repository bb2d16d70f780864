use crate::aggregation::DynamicCategoryCurator;
use crate::entities::{category, CategoryMembership, CategoryModel, ProductModel};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::stores::{CategoryStore, ProductStore};
use sea_orm::{ActiveValue::Set, DatabaseConnection};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Input for creating a category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Partial update for a category. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

/// A category with its member products resolved.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct CategoryWithProducts {
    pub category: CategoryModel,
    pub products: Vec<ProductModel>,
    pub count: usize,
}

/// Category CRUD, membership resolution and dynamic category refreshes.
#[derive(Clone)]
pub struct CategoryCatalogService {
    categories: CategoryStore,
    products: ProductStore,
    curator: DynamicCategoryCurator,
    event_sender: Arc<EventSender>,
}

impl CategoryCatalogService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        let categories = CategoryStore::new(db.clone());
        let products = ProductStore::new(db);
        let curator = DynamicCategoryCurator::new(products.clone(), categories.clone());
        Self {
            categories,
            products,
            curator,
            event_sender,
        }
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_category(&self, input: NewCategory) -> Result<CategoryModel, ServiceError> {
        self.ensure_unique_name(&input.name, None).await?;

        let active = category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            description: Set(input.description),
            image_url: Set(input.image_url),
            ..Default::default()
        };

        let created = self.categories.insert(active).await?;

        self.event_sender
            .send_or_log(Event::CategoryCreated(created.id))
            .await;

        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update_category(
        &self,
        id: Uuid,
        input: UpdateCategory,
    ) -> Result<CategoryModel, ServiceError> {
        let existing = self
            .categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Category {} not found", id)))?;

        if let Some(ref name) = input.name {
            if *name != existing.name {
                self.ensure_unique_name(name, Some(id)).await?;
            }
        }

        let mut active: category::ActiveModel = existing.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(image_url) = input.image_url {
            active.image_url = Set(Some(image_url));
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }

        let updated = self.categories.update(active).await?;

        self.event_sender
            .send_or_log(Event::CategoryUpdated(updated.id))
            .await;

        Ok(updated)
    }

    /// Deletes a category. Refused while products still reference it, so a
    /// delete can never silently uncategorize inventory.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self
            .categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Category {} not found", id)))?;

        let referencing = self.products.count_by_category(id).await?;
        if referencing > 0 {
            return Err(ServiceError::Conflict(format!(
                "Category '{}' still has {} product(s) assigned",
                existing.name, referencing
            )));
        }

        self.categories.delete_by_id(id).await?;

        self.event_sender
            .send_or_log(Event::CategoryDeleted(id))
            .await;

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_category(&self, id: Uuid) -> Result<CategoryModel, ServiceError> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Category {} not found", id)))
    }

    /// Active categories sorted by name.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<CategoryModel>, ServiceError> {
        self.categories.find_active_sorted().await
    }

    /// Resolves a category by id or, when the selector is not a UUID, by
    /// name, then loads its member products according to its membership
    /// mode. Explicit member lists keep their curated order; ids whose
    /// product no longer exists are omitted.
    #[instrument(skip(self))]
    pub async fn get_category_with_products(
        &self,
        selector: &str,
    ) -> Result<CategoryWithProducts, ServiceError> {
        let category = match Uuid::parse_str(selector) {
            Ok(id) => self.categories.find_by_id(id).await?,
            Err(_) => self.categories.find_by_name(selector).await?,
        }
        .ok_or_else(|| ServiceError::NotFound(format!("Category '{}' not found", selector)))?;

        let products = match category.membership() {
            CategoryMembership::ByReference => {
                self.products.find_by_category(category.id).await?
            }
            CategoryMembership::Explicit(member_ids) => {
                let mut by_id: HashMap<Uuid, ProductModel> = self
                    .products
                    .find_by_ids(&member_ids)
                    .await?
                    .into_iter()
                    .map(|p| (p.id, p))
                    .collect();
                member_ids
                    .iter()
                    .filter_map(|id| by_id.remove(id))
                    .collect()
            }
        };

        let count = products.len();
        Ok(CategoryWithProducts {
            category,
            products,
            count,
        })
    }

    /// Rebuilds the best-sellers category from the current sales ranking.
    #[instrument(skip(self))]
    pub async fn refresh_best_sellers(&self) -> Result<CategoryModel, ServiceError> {
        let refreshed = self.curator.refresh_best_sellers().await?;
        self.notify_refresh(&refreshed).await;
        Ok(refreshed)
    }

    /// Rebuilds the lowest-price category from the current price ranking.
    #[instrument(skip(self))]
    pub async fn refresh_lowest_price(&self) -> Result<CategoryModel, ServiceError> {
        let refreshed = self.curator.refresh_lowest_price().await?;
        self.notify_refresh(&refreshed).await;
        Ok(refreshed)
    }

    async fn notify_refresh(&self, refreshed: &CategoryModel) {
        let member_count = match refreshed.membership() {
            CategoryMembership::Explicit(ids) => ids.len(),
            CategoryMembership::ByReference => 0,
        };
        self.event_sender
            .send_or_log(Event::DynamicCategoryRefreshed {
                category_id: refreshed.id,
                name: refreshed.name.clone(),
                member_count,
            })
            .await;
    }

    async fn ensure_unique_name(
        &self,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        if let Some(existing) = self.categories.find_by_name(name).await? {
            if Some(existing.id) != exclude {
                return Err(ServiceError::Conflict(format!(
                    "Category with name '{}' already exists",
                    name
                )));
            }
        }
        Ok(())
    }
}
