use crate::handlers::common::{
    created_response, map_service_error, no_content_response, normalize_optional_string,
    normalize_string, success_response, validate_input,
};
use crate::services::{NewCategory, UpdateCategory};
use crate::{errors::ApiError, AppState};
use axum::{
    extract::{Json, Path, State},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Creates the router for category endpoints
pub fn categories_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/recompute/best-sellers", post(refresh_best_sellers))
        .route("/recompute/lowest-price", post(refresh_lowest_price))
        .route(
            "/:id",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .route("/:id/products", get(get_category_products))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Category name must be between 3 and 50 characters"
    ))]
    pub name: String,
    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Category name must be between 3 and 50 characters"
    ))]
    pub name: Option<String>,
    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

/// Create a new category
#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = crate::entities::CategoryModel),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 409, description = "Name already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let input = NewCategory {
        name: normalize_string(payload.name),
        description: normalize_optional_string(payload.description),
        image_url: normalize_optional_string(payload.image_url),
    };

    let category = state
        .services
        .category_catalog
        .create_category(input)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(category))
}

/// List active categories sorted by name
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses(
        (status = 200, description = "Categories retrieved", body = Vec<crate::entities::CategoryModel>)
    ),
    tag = "Categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let categories = state
        .services
        .category_catalog
        .list_categories()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(categories))
}

/// Get a category by ID
#[utoipa::path(
    get,
    path = "/api/v1/categories/:id",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category retrieved", body = crate::entities::CategoryModel),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let category = state
        .services
        .category_catalog
        .get_category(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(category))
}

/// Update a category
#[utoipa::path(
    put,
    path = "/api/v1/categories/:id",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = crate::entities::CategoryModel),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Name already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let input = UpdateCategory {
        name: payload.name.map(normalize_string),
        description: normalize_optional_string(payload.description),
        image_url: normalize_optional_string(payload.image_url),
        is_active: payload.is_active,
    };

    let category = state
        .services
        .category_catalog
        .update_category(id, input)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(category))
}

/// Delete a category with no assigned products
#[utoipa::path(
    delete,
    path = "/api/v1/categories/:id",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Products still assigned", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .category_catalog
        .delete_category(id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

/// Get a category (by ID or name) with its member products
#[utoipa::path(
    get,
    path = "/api/v1/categories/:id/products",
    params(("id" = String, Path, description = "Category ID or name")),
    responses(
        (status = 200, description = "Category with products", body = crate::services::CategoryWithProducts),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn get_category_products(
    State(state): State<AppState>,
    Path(selector): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let result = state
        .services
        .category_catalog
        .get_category_with_products(&selector)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(result))
}

/// Rebuild the best-sellers category from the sales ranking
#[utoipa::path(
    post,
    path = "/api/v1/categories/recompute/best-sellers",
    responses(
        (status = 200, description = "Best-sellers category refreshed", body = crate::entities::CategoryModel)
    ),
    tag = "Categories"
)]
pub async fn refresh_best_sellers(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let category = state
        .services
        .category_catalog
        .refresh_best_sellers()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(category))
}

/// Rebuild the lowest-price category from the price ranking
#[utoipa::path(
    post,
    path = "/api/v1/categories/recompute/lowest-price",
    responses(
        (status = 200, description = "Lowest-price category refreshed", body = crate::entities::CategoryModel)
    ),
    tag = "Categories"
)]
pub async fn refresh_lowest_price(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let category = state
        .services
        .category_catalog
        .refresh_lowest_price()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(category))
}
