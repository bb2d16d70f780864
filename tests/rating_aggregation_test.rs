mod common;

use axum::http::{Method, StatusCode};
use common::{decimal_field, read_json, TestApp};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn new_product_starts_with_zero_rating() {
    let app = TestApp::new().await;
    let product = app.seed_product("Ceramic Mug", dec!(12.50), 0, None).await;

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/reviews/product/{}/rating", product.id),
            None,
        )
        .await;
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal_field(&body, "average_rating"), Decimal::ZERO);
    assert_eq!(body["review_count"], 0);
}

#[tokio::test]
async fn review_creation_returns_product_with_refreshed_rating() {
    let app = TestApp::new().await;
    let product = app.seed_product("Desk Lamp", dec!(45.00), 0, None).await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/products/{}/reviews", product.id),
            Some(json!({
                "user_id": Uuid::new_v4(),
                "content": "Bright and sturdy",
                "rating": 4
            })),
        )
        .await;
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(decimal_field(&body, "average_rating"), dec!(4));
    assert_eq!(body["review_count"], 1);
}

#[tokio::test]
async fn average_is_rounded_to_one_decimal() {
    let app = TestApp::new().await;
    let product = app.seed_product("Notebook", dec!(4.99), 0, None).await;

    app.seed_review(product.id, 4).await;
    app.seed_review(product.id, 5).await;
    let updated = app.seed_review(product.id, 5).await;

    // (4 + 5 + 5) / 3 = 4.666... rounds to 4.7
    assert_eq!(updated.average_rating, dec!(4.7));
    assert_eq!(updated.review_count, 3);
}

#[tokio::test]
async fn midpoint_averages_round_up() {
    let app = TestApp::new().await;
    let product = app.seed_product("Pencil Set", dec!(7.25), 0, None).await;

    app.seed_review(product.id, 1).await;
    app.seed_review(product.id, 2).await;
    app.seed_review(product.id, 2).await;
    let updated = app.seed_review(product.id, 4).await;

    // mean 2.25 rounds to 2.3
    assert_eq!(updated.average_rating, dec!(2.3));
}

#[tokio::test]
async fn deleting_a_review_recomputes_the_rating() {
    let app = TestApp::new().await;
    let product = app.seed_product("Backpack", dec!(60.00), 0, None).await;

    app.seed_review(product.id, 5).await;
    app.seed_review(product.id, 1).await;

    let reviews = app
        .state
        .services
        .reviews
        .list_for_product(product.id)
        .await
        .expect("list reviews");
    let low = reviews
        .iter()
        .find(|r| r.rating == 1)
        .expect("low rating review present");

    let response = app
        .request(Method::DELETE, &format!("/api/v1/reviews/{}", low.id), None)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/reviews/product/{}/rating", product.id),
            None,
        )
        .await;
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal_field(&body, "average_rating"), dec!(5));
    assert_eq!(body["review_count"], 1);
}

#[tokio::test]
async fn deleting_the_last_review_resets_to_zero() {
    let app = TestApp::new().await;
    let product = app.seed_product("Water Bottle", dec!(15.00), 0, None).await;
    app.seed_review(product.id, 3).await;

    let reviews = app
        .state
        .services
        .reviews
        .list_for_product(product.id)
        .await
        .expect("list reviews");

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/reviews/{}", reviews[0].id),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let rating = app
        .state
        .services
        .reviews
        .product_rating(product.id)
        .await
        .expect("product rating");
    assert_eq!(rating.average_rating, Decimal::ZERO);
    assert_eq!(rating.review_count, 0);
}

#[tokio::test]
async fn deactivated_reviews_are_excluded_from_the_average() {
    let app = TestApp::new().await;
    let product = app.seed_product("Headphones", dec!(89.99), 0, None).await;

    app.seed_review(product.id, 5).await;
    app.seed_review(product.id, 1).await;

    let reviews = app
        .state
        .services
        .reviews
        .list_for_product(product.id)
        .await
        .expect("list reviews");
    let low = reviews
        .iter()
        .find(|r| r.rating == 1)
        .expect("low rating review present");

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/reviews/{}", low.id),
            Some(json!({ "is_active": false })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let rating = app
        .state
        .services
        .reviews
        .product_rating(product.id)
        .await
        .expect("product rating");
    assert_eq!(rating.average_rating, dec!(5));
    assert_eq!(rating.review_count, 1);
}

#[tokio::test]
async fn updating_a_rating_recomputes_the_average() {
    let app = TestApp::new().await;
    let product = app.seed_product("Keyboard", dec!(120.00), 0, None).await;

    app.seed_review(product.id, 2).await;

    let reviews = app
        .state
        .services
        .reviews
        .list_for_product(product.id)
        .await
        .expect("list reviews");

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/reviews/{}", reviews[0].id),
            Some(json!({ "rating": 5 })),
        )
        .await;
    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rating"], 5);

    let rating = app
        .state
        .services
        .reviews
        .product_rating(product.id)
        .await
        .expect("product rating");
    assert_eq!(rating.average_rating, dec!(5));
}

#[tokio::test]
async fn reviews_are_listed_newest_first() {
    let app = TestApp::new().await;
    let product = app.seed_product("Monitor", dec!(250.00), 0, None).await;

    for rating in [2, 3, 4] {
        app.seed_review(product.id, rating).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/reviews/product/{}", product.id),
            None,
        )
        .await;
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::OK);
    let reviews = body.as_array().expect("review list");
    assert_eq!(reviews.len(), 3);
    assert_eq!(reviews[0]["rating"], 4);
    assert_eq!(reviews[2]["rating"], 2);
}

#[tokio::test]
async fn recompute_is_idempotent_for_a_fixed_review_set() {
    use catalog_api::aggregation::RatingAggregator;
    use catalog_api::stores::{ProductStore, ReviewStore};

    let app = TestApp::new().await;
    let product = app.seed_product("Speaker", dec!(75.00), 0, None).await;
    app.seed_review(product.id, 5).await;
    app.seed_review(product.id, 4).await;
    app.seed_review(product.id, 3).await;

    let aggregator = RatingAggregator::new(
        ProductStore::new(app.state.db.clone()),
        ReviewStore::new(app.state.db.clone()),
    );

    let first = aggregator
        .recompute_product_rating(product.id)
        .await
        .expect("recompute");
    let second = aggregator
        .recompute_product_rating(product.id)
        .await
        .expect("recompute");

    assert_eq!(first, second);
    assert_eq!(first.average_rating, dec!(4.0));
    assert_eq!(first.review_count, 3);
}

#[tokio::test]
async fn rating_endpoint_returns_404_for_unknown_product() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/reviews/product/{}/rating", Uuid::new_v4()),
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reviewing_an_unknown_product_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/reviews/{}", Uuid::new_v4()),
            Some(json!({
                "user_id": Uuid::new_v4(),
                "content": "Ghost review",
                "rating": 3
            })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
