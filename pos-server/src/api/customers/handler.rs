//! Customer API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::customer;
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use shared::models::{Customer, CustomerCreate};
use shared::util::now_millis;

/// GET /api/customers - 获取顾客列表 (按姓名)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Customer>>> {
    let customers = customer::find_all(state.pool()).await?;
    Ok(Json(customers))
}

/// POST /api/customers - 新增顾客
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CustomerCreate>,
) -> AppResult<Json<Customer>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;

    let created = customer::create(state.pool(), payload, now_millis()).await?;
    tracing::info!(id = created.id, name = %created.name, "Customer created");
    Ok(Json(created))
}

/// DELETE /api/customers/:id - 删除顾客 (无预订时)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    customer::delete(state.pool(), id).await?;
    tracing::info!(id, "Customer deleted");
    Ok(Json(true))
}
