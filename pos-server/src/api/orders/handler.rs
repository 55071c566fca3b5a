//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::repository::order;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    DelayedOrder, Order, OrderCreate, OrderItem, OrderStatusUpdate, OrderUpdate,
};
use shared::util::now_millis;

/// Query params for the delayed order list
#[derive(Debug, Deserialize)]
pub struct DelayedQuery {
    pub threshold_minutes: Option<i64>,
}

/// Response of `DELETE /api/orders/{id}/items/last`
#[derive(Debug, Serialize)]
pub struct RemovedItemResponse {
    pub order: Order,
    pub removed: OrderItem,
}

/// Response of `DELETE /api/orders/{id}`
#[derive(Debug, Serialize)]
pub struct OrderDeleted {
    pub id: i64,
    /// Ingredients went back to inventory
    pub restocked: bool,
}

fn validate_items(items: &[OrderItem]) -> AppResult<()> {
    for item in items {
        validate_required_text(&item.name, "item name", MAX_NAME_LEN)?;
        if item.kind.len() > MAX_SHORT_TEXT_LEN {
            return Err(AppError::validation(format!(
                "item kind is too long ({} chars, max {MAX_SHORT_TEXT_LEN})",
                item.kind.len()
            )));
        }
    }
    Ok(())
}

/// POST /api/orders - 创建订单 (核对并扣减库存)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    validate_items(&payload.items)?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    let table = payload.table_number;
    let created = order::create(state.pool(), payload, now_millis()).await;
    let order = match created {
        Ok(order) => order,
        Err(e) => {
            tracing::warn!(table, error = %e, "Order rejected");
            return Err(e.into());
        }
    };

    tracing::info!(
        order_id = order.id,
        table = order.table_number,
        app_number = ?order.app_number,
        items = order.items.len(),
        "Order created"
    );
    Ok(Json(order))
}

/// GET /api/orders/active - 厨房进行中的订单 (最新在前)
pub async fn list_active(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let orders = order::find_active(state.pool()).await?;
    Ok(Json(orders))
}

/// GET /api/orders/delayed?threshold_minutes= - 出餐延迟的订单
pub async fn list_delayed(
    State(state): State<ServerState>,
    Query(query): Query<DelayedQuery>,
) -> AppResult<Json<Vec<DelayedOrder>>> {
    let threshold = query
        .threshold_minutes
        .unwrap_or(state.config.delay_threshold_minutes);
    if threshold < 0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("threshold_minutes must not be negative, got {threshold}"),
        ));
    }
    let delayed = order::find_delayed(state.pool(), now_millis(), threshold).await?;
    Ok(Json(delayed))
}

/// GET /api/orders/:id - 获取单个订单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = order::find_by_id(state.pool(), id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::OrderNotFound, format!("Order {} not found", id))
    })?;
    Ok(Json(order))
}

/// PUT /api/orders/:id - 替换订单内容 (按差异调整库存)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<Order>> {
    validate_items(&payload.items)?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    let order = order::replace(state.pool(), id, payload, now_millis()).await?;
    tracing::info!(order_id = id, items = order.items.len(), status = %order.status, "Order updated");
    Ok(Json(order))
}

/// PATCH /api/orders/:id/status - 修改订单状态
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    let order = order::update_status(state.pool(), id, payload.status, now_millis()).await?;
    tracing::info!(
        order_id = id,
        status = %order.status,
        kitchen_minutes = ?order.kitchen_minutes,
        "Order status changed"
    );
    Ok(Json(order))
}

/// DELETE /api/orders/:id/items/last - 删除最后一个菜品
pub async fn remove_last_item(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RemovedItemResponse>> {
    let (order, removed) = order::remove_last_item(state.pool(), id, now_millis()).await?;
    tracing::info!(order_id = id, item = %removed.name, "Last item removed");
    Ok(Json(RemovedItemResponse { order, removed }))
}

/// DELETE /api/orders/:id - 删除订单
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDeleted>> {
    let restocked = order::delete(state.pool(), id, now_millis()).await?;
    tracing::info!(order_id = id, restocked, "Order deleted");
    Ok(Json(OrderDeleted { id, restocked }))
}
