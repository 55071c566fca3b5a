//! Order API 模块 (订单管理)
//!
//! 创建、修改、删除订单时在同一事务内核对并扣减 / 归还库存。

mod handler;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/active", get(handler::list_active))
        .route("/delayed", get(handler::list_delayed))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/status", patch(handler::update_status))
        .route("/{id}/items/last", delete(handler::remove_last_item))
}
