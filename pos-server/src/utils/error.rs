//! 统一错误处理
//!
//! 错误类型统一来自 `shared::error`，handler 直接返回 [`AppResult`]：
//!
//! ```ignore
//! pub async fn get(Path(id): Path<i64>) -> AppResult<Json<Order>> {
//!     Err(AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found")))
//! }
//! ```
//!
//! 响应体格式见 [`ErrorBody`]：`{"code": 4001, "message": "...", "details": {...}}`

pub use shared::error::{AppError, AppResult, ErrorBody, ErrorCategory, ErrorCode};
