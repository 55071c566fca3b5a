//! Recipe API 模块 (配方管理)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/recipes", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{dish}",
            get(handler::get_by_dish)
                .put(handler::update)
                .delete(handler::delete),
        )
}
