use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    response::Response,
    Router,
};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

use sku_api::services::code_generator::SkuCodeGenerator;
use sku_api::services::skus::SkuService;
use sku_api::{app, config::AppConfig, db, events, AppState};

/// Test harness backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a fresh application with its own empty database.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            0,
            "test".to_string(),
        );
        // One pooled connection so every query hits the same in-memory database
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations");
        let db_arc = Arc::new(pool);

        let (event_tx, event_rx) = mpsc::channel(64);
        let event_sender = events::EventSender::new(event_tx);
        tokio::spawn(events::process_events(event_rx));

        let code_generator = Arc::new(SkuCodeGenerator::new(cfg.retailer_prefix.clone()));
        let sku_service = Arc::new(SkuService::new(
            db_arc.clone(),
            code_generator,
            event_sender,
        ));

        let state = AppState {
            db: db_arc,
            config: cfg,
            sku_service,
        };
        let router = app(state.clone());

        Self { router, state }
    }

    pub async fn request(&self, method: Method, uri: &str, json: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match json {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("build request"),
            None => builder.body(Body::empty()).expect("build request"),
        };
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("send request")
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
