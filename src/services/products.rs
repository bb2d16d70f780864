use crate::aggregation::CategoryCountAggregator;
use crate::entities::{product, CategoryModel, ProductModel};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::stores::{CategoryStore, ProductStore};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue::Set, DatabaseConnection};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{instrument, warn};
use uuid::Uuid;

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub sales_count: i32,
    pub category_id: Option<Uuid>,
}

/// Partial update for a product. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub sales_count: Option<i32>,
    pub category_id: Option<Uuid>,
}

/// A product together with its resolved category, if any. A dangling
/// `category_id` resolves to `None`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ProductWithCategory {
    #[serde(flatten)]
    pub product: ProductModel,
    pub category: Option<CategoryModel>,
}

/// Product CRUD plus the category count bookkeeping that assignment
/// changes require.
#[derive(Clone)]
pub struct ProductCatalogService {
    products: ProductStore,
    categories: CategoryStore,
    count_aggregator: CategoryCountAggregator,
    event_sender: Arc<EventSender>,
}

impl ProductCatalogService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        let products = ProductStore::new(db.clone());
        let categories = CategoryStore::new(db);
        let count_aggregator = CategoryCountAggregator::new(products.clone(), categories.clone());
        Self {
            products,
            categories,
            count_aggregator,
            event_sender,
        }
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_product(&self, input: NewProduct) -> Result<ProductModel, ServiceError> {
        self.ensure_unique_name(&input.name, None).await?;

        if let Some(category_id) = input.category_id {
            self.ensure_category_exists(category_id).await?;
        }

        let active = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            stock: Set(input.stock),
            sales_count: Set(input.sales_count),
            category_id: Set(input.category_id),
            ..Default::default()
        };

        let created = self.products.insert(active).await?;

        if let Some(category_id) = created.category_id {
            self.recompute_count_or_warn(category_id).await;
        }

        self.event_sender
            .send_or_log(Event::ProductCreated(created.id))
            .await;

        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(
        &self,
        id: Uuid,
        input: UpdateProduct,
    ) -> Result<ProductModel, ServiceError> {
        let existing = self
            .products
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))?;

        if let Some(ref name) = input.name {
            if *name != existing.name {
                self.ensure_unique_name(name, Some(id)).await?;
            }
        }

        if let Some(category_id) = input.category_id {
            self.ensure_category_exists(category_id).await?;
        }

        let old_category = existing.category_id;
        let mut active: product::ActiveModel = existing.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(price) = input.price {
            active.price = Set(price);
        }
        if let Some(stock) = input.stock {
            active.stock = Set(stock);
        }
        if let Some(sales_count) = input.sales_count {
            active.sales_count = Set(sales_count);
        }
        if let Some(category_id) = input.category_id {
            active.category_id = Set(Some(category_id));
        }

        let updated = self.products.update(active).await?;

        // On reassignment both sides drift: the old category lost a member
        // and the new one gained one.
        if old_category != updated.category_id {
            if let Some(category_id) = old_category {
                self.recompute_count_or_warn(category_id).await;
            }
            if let Some(category_id) = updated.category_id {
                self.recompute_count_or_warn(category_id).await;
            }
        }

        self.event_sender
            .send_or_log(Event::ProductUpdated(updated.id))
            .await;

        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self
            .products
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))?;

        self.products.delete_by_id(id).await?;

        // Reviews and dynamic category member lists may now reference a
        // missing product; read paths tolerate that.
        if let Some(category_id) = existing.category_id {
            self.recompute_count_or_warn(category_id).await;
        }

        self.event_sender
            .send_or_log(Event::ProductDeleted(id))
            .await;

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> Result<ProductWithCategory, ServiceError> {
        let product = self
            .products
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))?;

        let category = match product.category_id {
            Some(category_id) => self.categories.find_by_id(category_id).await?,
            None => None,
        };

        Ok(ProductWithCategory { product, category })
    }

    /// All products, newest first, each with its category resolved in a
    /// single batched lookup.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<ProductWithCategory>, ServiceError> {
        let products = self.products.find_all().await?;

        let category_ids: Vec<Uuid> = {
            let mut ids: Vec<Uuid> = products.iter().filter_map(|p| p.category_id).collect();
            ids.sort_unstable();
            ids.dedup();
            ids
        };

        let categories: HashMap<Uuid, CategoryModel> = self
            .categories
            .find_by_ids(&category_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(products
            .into_iter()
            .map(|product| {
                let category = product
                    .category_id
                    .and_then(|id| categories.get(&id).cloned());
                ProductWithCategory { product, category }
            })
            .collect())
    }

    async fn ensure_unique_name(
        &self,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        if let Some(existing) = self.products.find_by_name(name).await? {
            if Some(existing.id) != exclude {
                return Err(ServiceError::Conflict(format!(
                    "Product with name '{}' already exists",
                    name
                )));
            }
        }
        Ok(())
    }

    async fn ensure_category_exists(&self, category_id: Uuid) -> Result<(), ServiceError> {
        if self.categories.find_by_id(category_id).await?.is_none() {
            return Err(ServiceError::InvalidInput(format!(
                "Category {} does not exist",
                category_id
            )));
        }
        Ok(())
    }

    async fn recompute_count_or_warn(&self, category_id: Uuid) {
        match self
            .count_aggregator
            .recompute_category_count(category_id)
            .await
        {
            Ok(product_count) => {
                self.event_sender
                    .send_or_log(Event::CategoryCountRecomputed {
                        category_id,
                        product_count,
                    })
                    .await;
            }
            Err(e) => {
                warn!(%category_id, error = %e, "Category count recompute failed");
            }
        }
    }
}
