mod common;

use axum::http::{Method, StatusCode};
use common::{decimal_field, read_json, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn full_catalog_flow() {
    let app = TestApp::new().await;

    // Create a category
    let (status, category) = read_json(
        app.request(
            Method::POST,
            "/api/v1/categories",
            Some(json!({ "name": "Widgets", "description": "All widgets" })),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = category["id"].as_str().expect("category id").to_string();

    // Create a product in it
    let (status, product) = read_json(
        app.request(
            Method::POST,
            "/api/v1/products",
            Some(json!({
                "name": "Widget",
                "description": "A fine widget",
                "price": "19.99",
                "stock": 5,
                "category_id": category_id
            })),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let product_id = product["id"].as_str().expect("product id").to_string();
    assert_eq!(decimal_field(&product, "price"), dec!(19.99));

    // Category count reflects the new product
    let (status, fetched) = read_json(
        app.request(
            Method::GET,
            &format!("/api/v1/categories/{}", category_id),
            None,
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["product_count"], 1);

    // Review it
    let (status, reviewed) = read_json(
        app.request(
            Method::POST,
            &format!("/api/v1/products/{}/reviews", product_id),
            Some(json!({
                "user_id": Uuid::new_v4(),
                "content": "Does what it says",
                "rating": 4
            })),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reviewed["review_count"], 1);
    assert_eq!(decimal_field(&reviewed, "average_rating"), dec!(4));

    // Product listing resolves the category
    let (status, listing) = read_json(app.request(Method::GET, "/api/v1/products", None).await).await;
    assert_eq!(status, StatusCode::OK);
    let items = listing.as_array().expect("product list");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["category"]["name"], "Widgets");

    // Delete the product, then the now-empty category
    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/products/{}", product_id),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/categories/{}", category_id),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn widget_rating_and_best_sellers_scenario() {
    let app = TestApp::new().await;
    let widget = app.seed_product("Widget", dec!(10.00), 0, None).await;

    for rating in [5, 3, 4] {
        app.seed_review(widget.id, rating).await;
    }

    let rating = app
        .state
        .services
        .reviews
        .product_rating(widget.id)
        .await
        .expect("product rating");
    assert_eq!(rating.average_rating, dec!(4.0));
    assert_eq!(rating.review_count, 3);

    // Drop the middling review; the remaining 5 and 4 average to 4.5
    let reviews = app
        .state
        .services
        .reviews
        .list_for_product(widget.id)
        .await
        .expect("list reviews");
    let middling = reviews
        .iter()
        .find(|r| r.rating == 3)
        .expect("rating-3 review present");
    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/reviews/{}", middling.id),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let rating = app
        .state
        .services
        .reviews
        .product_rating(widget.id)
        .await
        .expect("product rating");
    assert_eq!(rating.average_rating, dec!(4.5));
    assert_eq!(rating.review_count, 2);

    // With Widget as the only product, it is the sole best seller
    let (status, body) = read_json(
        app.request(
            Method::POST,
            "/api/v1/categories/recompute/best-sellers",
            None,
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product_count"], 1);
    assert_eq!(body["member_ids"], json!([widget.id]));
}

#[tokio::test]
async fn duplicate_product_names_are_rejected() {
    let app = TestApp::new().await;
    app.seed_product("Unique Gizmo", dec!(10.00), 0, None).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/products",
            Some(json!({ "name": "Unique Gizmo", "price": "12.00" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn duplicate_category_names_are_rejected() {
    let app = TestApp::new().await;
    app.seed_category("Hardware").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/categories",
            Some(json!({ "name": "Hardware" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn renaming_onto_an_existing_product_is_rejected() {
    let app = TestApp::new().await;
    app.seed_product("First", dec!(5.00), 0, None).await;
    let second = app.seed_product("Second", dec!(5.00), 0, None).await;

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/products/{}", second.id),
            Some(json!({ "name": "First" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_payloads_are_rejected_before_any_write() {
    let app = TestApp::new().await;
    let product = app.seed_product("Validated", dec!(10.00), 0, None).await;

    // Rating outside 1..5
    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/products/{}/reviews", product.id),
            Some(json!({
                "user_id": Uuid::new_v4(),
                "content": "Too good",
                "rating": 6
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Category name below minimum length
    let response = app
        .request(
            Method::POST,
            "/api/v1/categories",
            Some(json!({ "name": "ab" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Negative price
    let response = app
        .request(
            Method::POST,
            "/api/v1/products",
            Some(json!({ "name": "Cheapskate", "price": "-1.00" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Blank review content
    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/products/{}/reviews", product.id),
            Some(json!({
                "user_id": Uuid::new_v4(),
                "content": "   ",
                "rating": 3
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing slipped through
    let reviews = app
        .state
        .services
        .reviews
        .list_for_product(product.id)
        .await
        .expect("list reviews");
    assert!(reviews.is_empty());
}

#[tokio::test]
async fn error_responses_carry_the_standard_envelope() {
    let app = TestApp::new().await;

    let (status, body) = read_json(
        app.request(
            Method::GET,
            &format!("/api/v1/products/{}", Uuid::new_v4()),
            None,
        )
        .await,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    assert!(body["message"].as_str().expect("message").contains("not found"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn reviews_survive_product_deletion() {
    let app = TestApp::new().await;
    let user_id = Uuid::new_v4();
    let product = app.seed_product("Ephemeral", dec!(10.00), 0, None).await;

    app.state
        .services
        .reviews
        .create_review(
            product.id,
            catalog_api::services::NewReview {
                user_id,
                content: "Written before the product vanished".to_string(),
                rating: 5,
            },
        )
        .await
        .expect("create review");

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/products/{}", product.id),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Orphaned reviews are still listable by product and by user
    let (status, by_product) = read_json(
        app.request(
            Method::GET,
            &format!("/api/v1/reviews/product/{}", product.id),
            None,
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_product.as_array().expect("reviews").len(), 1);

    let (status, by_user) = read_json(
        app.request(Method::GET, &format!("/api/v1/reviews/user/{}", user_id), None)
            .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_user.as_array().expect("reviews").len(), 1);
}

#[tokio::test]
async fn partial_updates_leave_other_fields_untouched() {
    let app = TestApp::new().await;
    let product = app.seed_product("Partial", dec!(33.00), 4, None).await;

    let (status, body) = read_json(
        app.request(
            Method::PUT,
            &format!("/api/v1/products/{}", product.id),
            Some(json!({ "stock": 99 })),
        )
        .await,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stock"], 99);
    assert_eq!(body["name"], "Partial");
    assert_eq!(decimal_field(&body, "price"), dec!(33.00));
    assert_eq!(body["sales_count"], 4);
}

#[tokio::test]
async fn wide_prices_round_trip_through_sqlite() {
    // Table creation itself is part of the exercise: the price column must
    // render within SQLite's 16-digit decimal precision limit.
    let app = TestApp::new().await;
    let product = app
        .seed_product("Industrial Press", dec!(9999999999.99), 0, None)
        .await;

    let (status, body) = read_json(
        app.request(Method::GET, &format!("/api/v1/products/{}", product.id), None)
            .await,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal_field(&body, "price"), dec!(9999999999.99));
}

#[tokio::test]
async fn status_and_health_endpoints_respond() {
    let app = TestApp::new().await;

    let (status, body) = read_json(app.request(Method::GET, "/api/v1/status", None).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = read_json(app.request(Method::GET, "/api/v1/health", None).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["database"], "healthy");
}
