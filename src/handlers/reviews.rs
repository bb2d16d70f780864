use crate::handlers::common::{
    created_response, map_service_error, no_content_response, normalize_string, success_response,
    validate_input,
};
use crate::services::{NewReview, UpdateReview};
use crate::{errors::ApiError, AppState};
use axum::{
    extract::{Json, Path, State},
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Creates the router for review endpoints
pub fn reviews_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/:id",
            post(create_review).put(update_review).delete(delete_review),
        )
        .route("/product/:id", get(list_product_reviews))
        .route("/product/:id/rating", get(get_product_rating))
        .route("/user/:id", get(list_user_reviews))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReviewRequest {
    pub user_id: Uuid,
    #[validate(length(
        min = 1,
        max = 1000,
        message = "Review content must be between 1 and 1000 characters"
    ))]
    pub content: String,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateReviewRequest {
    #[validate(length(
        min = 1,
        max = 1000,
        message = "Review content must be between 1 and 1000 characters"
    ))]
    pub content: Option<String>,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i32>,
    pub is_active: Option<bool>,
}

/// Precomputed rating summary of a product.
#[derive(Debug, Serialize, ToSchema)]
pub struct RatingResponse {
    pub product_id: Uuid,
    pub average_rating: Decimal,
    pub review_count: i32,
}

/// Create a review for a product
#[utoipa::path(
    post,
    path = "/api/v1/reviews/:id",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = crate::entities::ProductModel),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Reviews"
)]
pub async fn create_review(
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

/// Update a review
#[utoipa::path(
    put,
    path = "/api/v1/reviews/:id",
    params(("id" = Uuid, Path, description = "Review ID")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = crate::entities::ReviewModel),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 404, description = "Review not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Reviews"
)]
pub async fn update_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReviewRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let content = match payload.content {
        Some(content) => {
            let content = normalize_string(content);
            if content.is_empty() {
                return Err(ApiError::ValidationError(
                    "Review content cannot be blank".to_string(),
                ));
            }
            Some(content)
        }
        None => None,
    };

    let input = UpdateReview {
        content,
        rating: payload.rating,
        is_active: payload.is_active,
    };

    let review = state
        .services
        .reviews
        .update_review(id, input)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(review))
}

/// Delete a review
#[utoipa::path(
    delete,
    path = "/api/v1/reviews/:id",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 404, description = "Review not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Reviews"
)]
pub async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .reviews
        .delete_review(id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

/// List reviews for a product, newest first
#[utoipa::path(
    get,
    path = "/api/v1/reviews/product/:id",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Reviews retrieved", body = Vec<crate::entities::ReviewModel>)
    ),
    tag = "Reviews"
)]
pub async fn list_product_reviews(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let reviews = state
        .services
        .reviews
        .list_for_product(product_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(reviews))
}

/// Get the precomputed rating summary of a product
#[utoipa::path(
    get,
    path = "/api/v1/reviews/product/:id/rating",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Rating retrieved", body = RatingResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Reviews"
)]
pub async fn get_product_rating(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let product = state
        .services
        .reviews
        .product_rating(product_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(RatingResponse {
        product_id: product.id,
        average_rating: product.average_rating,
        review_count: product.review_count,
    }))
}

/// List reviews written by a user, newest first
#[utoipa::path(
    get,
    path = "/api/v1/reviews/user/:id",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Reviews retrieved", body = Vec<crate::entities::ReviewModel>)
    ),
    tag = "Reviews"
)]
pub async fn list_user_reviews(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let reviews = state
        .services
        .reviews
        .list_for_user(user_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(reviews))
}
