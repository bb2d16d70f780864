use crate::handlers::common::{
    created_response, ensure_decimal_non_negative, map_service_error, no_content_response,
    normalize_optional_string, normalize_string, success_response, validate_input,
};
use crate::handlers::reviews::CreateReviewRequest;
use crate::services::{NewProduct, NewReview, UpdateProduct};
use crate::{errors::ApiError, AppState};
use axum::{
    extract::{Json, Path, State},
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Creates the router for product endpoints
pub fn products_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/:id/reviews", post(create_product_review))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Product name must be between 1 and 255 characters"
    ))]
    pub name: String,
    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "Sales count cannot be negative"))]
    pub sales_count: i32,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Product name must be between 1 and 255 characters"
    ))]
    pub name: Option<String>,
    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,
    pub price: Option<Decimal>,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: Option<i32>,
    #[validate(range(min = 0, message = "Sales count cannot be negative"))]
    pub sales_count: Option<i32>,
    pub category_id: Option<Uuid>,
}

/// Create a new product
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = crate::entities::ProductModel),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 409, description = "Name already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    ensure_decimal_non_negative(&payload.price, "Price")?;

    let name = normalize_string(payload.name);
    if name.is_empty() {
        return Err(ApiError::ValidationError(
            "Product name cannot be blank".to_string(),
        ));
    }

    let input = NewProduct {
        name,
        description: normalize_optional_string(payload.description),
        price: payload.price,
        stock: payload.stock,
        sales_count: payload.sales_count,
        category_id: payload.category_id,
    };

    let product = state
        .services
        .product_catalog
        .create_product(input)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(product))
}

/// List all products with their categories
#[utoipa::path(
    get,
    path = "/api/v1/products",
    responses(
        (status = 200, description = "Products retrieved", body = Vec<crate::services::ProductWithCategory>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let products = state
        .services
        .product_catalog
        .list_products()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(products))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/api/v1/products/:id",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product retrieved", body = crate::services::ProductWithCategory),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let product = state
        .services
        .product_catalog
        .get_product(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(product))
}

/// Update a product
#[utoipa::path(
    put,
    path = "/api/v1/products/:id",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = crate::entities::ProductModel),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Name already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    if let Some(ref price) = payload.price {
        ensure_decimal_non_negative(price, "Price")?;
    }

    let name = match payload.name {
        Some(name) => {
            let name = normalize_string(name);
            if name.is_empty() {
                return Err(ApiError::ValidationError(
                    "Product name cannot be blank".to_string(),
                ));
            }
            Some(name)
        }
        None => None,
    };

    let input = UpdateProduct {
        name,
        description: normalize_optional_string(payload.description),
        price: payload.price,
        stock: payload.stock,
        sales_count: payload.sales_count,
        category_id: payload.category_id,
    };

    let product = state
        .services
        .product_catalog
        .update_product(id, input)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(product))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/api/v1/products/:id",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .product_catalog
        .delete_product(id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

/// Add a review to a product and return the product with refreshed rating
#[utoipa::path(
    post,
    path = "/api/v1/products/:id/reviews",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = crate::entities::ProductModel),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn create_product_review(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let content = normalize_string(payload.content);
    if content.is_empty() {
        return Err(ApiError::ValidationError(
            "Review content cannot be blank".to_string(),
        ));
    }

    let input = NewReview {
        user_id: payload.user_id,
        content,
        rating: payload.rating,
    };

    let product = state
        .services
        .reviews
        .create_review(product_id, input)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(product))
}
