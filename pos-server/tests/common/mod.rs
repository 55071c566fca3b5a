//! 集成测试公共工具：内存数据库 + 完整路由 (含中间件)

#![allow(dead_code)]

use axum::body::Body;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use pos_server::{Config, DbService, ServerState};
use serde_json::Value;
use tempfile::TempDir;

/// Server state over an in-memory database; the work dir lives as long as the app
pub struct TestApp {
    pub state: ServerState,
    pub work_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let work_dir = tempfile::tempdir().unwrap();
        let config = Config::with_overrides(work_dir.path().to_string_lossy(), 0);
        let db = DbService::in_memory().await.unwrap();
        Self {
            state: ServerState::with_db(config, db),
            work_dir,
        }
    }

    /// Send a request through the full app; returns status and JSON body (`Null` when empty)
    pub async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.state.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::PUT, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Method::DELETE, uri, None).await
    }

    /// Ingredient + dish + recipe: one "Tacos" uses `per_dish` of "Tortilla"
    pub async fn stock_tacos(&self, tortillas: f64, per_dish: f64) -> i64 {
        let (status, body) = self
            .post(
                "/api/inventory",
                serde_json::json!({"name": "Tortilla", "quantity": tortillas, "unit": "pz"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        let ingredient_id = body["item"]["id"].as_i64().unwrap();

        let (status, body) = self
            .post(
                "/api/menu",
                serde_json::json!({"name": "Tacos", "price": 45.0, "kind": "Plato"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");

        let (status, body) = self
            .post(
                "/api/recipes",
                serde_json::json!({
                    "dish_name": "Tacos",
                    "description": null,
                    "instructions": null,
                    "ingredients": [
                        {"ingredient_id": ingredient_id, "quantity_needed": per_dish, "unit": "pz"}
                    ]
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        ingredient_id
    }

    pub async fn ingredient_quantity(&self, id: i64) -> f64 {
        let (status, body) = self.get(&format!("/api/inventory/{id}")).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["quantity"].as_f64().unwrap()
    }
}

pub fn tacos(n: usize) -> Vec<Value> {
    (0..n)
        .map(|_| serde_json::json!({"name": "Tacos", "price": 45.0, "kind": "Plato"}))
        .collect()
}
