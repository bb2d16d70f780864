use std::str::FromStr;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use catalog_api::{
    config::AppConfig,
    db,
    entities::{CategoryModel, ProductModel},
    events::{self, EventSender},
    handlers::AppServices,
    services::{NewCategory, NewProduct, NewReview},
    AppState,
};
use rust_decimal::Decimal;
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

/// Helper harness for spinning up an application state backed by an in-memory
/// SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            0,
            "test".to_string(),
        );
        // A single connection keeps every query on the same in-memory database.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(db_arc.clone(), Arc::new(event_sender.clone()));

        let state = AppState {
            db: db_arc,
            config: cfg.clone(),
            event_sender,
            services,
        };

        let router = Router::new()
            .nest("/api/v1", catalog_api::api_v1_routes())
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    /// Send a JSON request against the router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Seed a category through the service layer.
    #[allow(dead_code)]
    pub async fn seed_category(&self, name: &str) -> CategoryModel {
        self.state
            .services
            .category_catalog
            .create_category(NewCategory {
                name: name.to_string(),
                description: None,
                image_url: None,
            })
            .await
            .expect("seed category for tests")
    }

    /// Seed a product through the service layer.
    #[allow(dead_code)]
    pub async fn seed_product(
        &self,
        name: &str,
        price: Decimal,
        sales_count: i32,
        category_id: Option<Uuid>,
    ) -> ProductModel {
        self.state
            .services
            .product_catalog
            .create_product(NewProduct {
                name: name.to_string(),
                description: None,
                price,
                stock: 10,
                sales_count,
                category_id,
            })
            .await
            .expect("seed product for tests")
    }

    /// Seed a review through the service layer; returns the updated product.
    #[allow(dead_code)]
    pub async fn seed_review(&self, product_id: Uuid, rating: i32) -> ProductModel {
        self.state
            .services
            .reviews
            .create_review(
                product_id,
                NewReview {
                    user_id: Uuid::new_v4(),
                    content: format!("Rated {} stars", rating),
                    rating,
                },
            )
            .await
            .expect("seed review for tests")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}

/// Read a response body as JSON alongside its status code.
#[allow(dead_code)]
pub async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body was not valid JSON")
    };
    (status, value)
}

/// Parse a decimal JSON field that may arrive as a string or a number.
#[allow(dead_code)]
pub fn decimal_field(value: &Value, key: &str) -> Decimal {
    let field = value
        .get(key)
        .unwrap_or_else(|| panic!("missing field '{}' in {}", key, value));
    match field {
        Value::String(s) => Decimal::from_str(s)
            .unwrap_or_else(|_| panic!("field '{}' was not a decimal: {}", key, s)),
        Value::Number(n) => {
            let f = n.as_f64().expect("numeric field out of f64 range");
            Decimal::try_from(f).expect("numeric field not representable as decimal")
        }
        other => panic!("field '{}' was not a decimal: {}", key, other),
    }
}
