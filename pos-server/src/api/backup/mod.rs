//! Backup API - SQLite 在线备份
//!
//! - POST /api/backup → `VACUUM INTO {BACKUP_DIR}/backup_restaurant_db_YYYYMMDD_HHMMSS.db`
//!
//! [`create_backup`] 也可在进程内直接调用。

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;
use crate::utils::AppError;

pub use handler::BackupResponse;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/backup", post(handler::backup))
}

/// Write a consistent copy of the database into the backup directory
pub async fn create_backup(state: &ServerState) -> Result<BackupResponse, AppError> {
    handler::create_backup(state).await
}
