use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "1.0.0",
        description = r#"
# Catalog API

Product, category and review management with maintained derived state:
per-product rating summaries, per-category product counts and two curated
dynamic categories (best sellers, lowest prices).
"#
    ),
    tags(
        (name = "Products", description = "Product management endpoints"),
        (name = "Categories", description = "Category management and dynamic category endpoints"),
        (name = "Reviews", description = "Review management and rating endpoints")
    ),
    paths(
        // Products
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::products::create_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
        crate::handlers::products::create_product_review,

        // Categories
        crate::handlers::categories::list_categories,
        crate::handlers::categories::get_category,
        crate::handlers::categories::create_category,
        crate::handlers::categories::update_category,
        crate::handlers::categories::delete_category,
        crate::handlers::categories::get_category_products,
        crate::handlers::categories::refresh_best_sellers,
        crate::handlers::categories::refresh_lowest_price,

        // Reviews
        crate::handlers::reviews::create_review,
        crate::handlers::reviews::update_review,
        crate::handlers::reviews::delete_review,
        crate::handlers::reviews::list_product_reviews,
        crate::handlers::reviews::get_product_rating,
        crate::handlers::reviews::list_user_reviews,
    ),
    components(
        schemas(
            crate::errors::ErrorResponse,

            crate::entities::ProductModel,
            crate::entities::CategoryModel,
            crate::entities::ReviewModel,

            crate::services::ProductWithCategory,
            crate::services::CategoryWithProducts,

            crate::handlers::products::CreateProductRequest,
            crate::handlers::products::UpdateProductRequest,
            crate::handlers::categories::CreateCategoryRequest,
            crate::handlers::categories::UpdateCategoryRequest,
            crate::handlers::reviews::CreateReviewRequest,
            crate::handlers::reviews::UpdateReviewRequest,
            crate::handlers::reviews::RatingResponse,
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
