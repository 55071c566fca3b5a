//! Report API 模块 (报表)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reports", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/sales", get(handler::sales))
        .route("/products", get(handler::products))
        .route("/hourly", get(handler::hourly))
        .route("/kitchen", get(handler::kitchen))
}
