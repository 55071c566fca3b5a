//! Backup handlers

use std::path::PathBuf;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Backup result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupResponse {
    pub status: String,
    pub message: String,
    pub file_path: String,
}

fn backup_failed(message: impl Into<String>) -> AppError {
    AppError::with_message(ErrorCode::BackupFailed, message)
}

/// POST /api/backup - 创建数据库备份
pub async fn backup(State(state): State<ServerState>) -> AppResult<Json<BackupResponse>> {
    let response = create_backup(&state).await?;
    Ok(Json(response))
}

pub(super) async fn create_backup(state: &ServerState) -> AppResult<BackupResponse> {
    let dir = state.config.backup_dir();
    tokio::fs::create_dir_all(&dir).await.map_err(|e| {
        tracing::error!(dir = %dir.display(), error = %e, "Cannot create backup directory");
        backup_failed(format!("Cannot create backup directory: {e}"))
    })?;

    let path = backup_path(&dir, state.config.timezone);
    let file_path = path.to_string_lossy().to_string();
    tracing::warn!(path = %file_path, "Starting database backup");

    sqlx::query("VACUUM INTO ?")
        .bind(&file_path)
        .execute(state.pool())
        .await
        .map_err(|e| {
            tracing::error!(path = %file_path, error = %e, "Database backup failed");
            backup_failed(format!("Backup failed: {e}"))
        })?;

    let size = tokio::fs::metadata(&path).await.map(|m| m.len()).unwrap_or(0);
    tracing::info!(path = %file_path, bytes = size, "Database backup completed");

    Ok(BackupResponse {
        status: "ok".to_string(),
        message: "Backup created".to_string(),
        file_path,
    })
}

/// `{dir}/backup_restaurant_db_YYYYMMDD_HHMMSS.db`, stamped in the business timezone
fn backup_path(dir: &std::path::Path, tz: chrono_tz::Tz) -> PathBuf {
    let stamp = chrono::Utc::now().with_timezone(&tz).format("%Y%m%d_%H%M%S");
    dir.join(format!("backup_restaurant_db_{stamp}.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_file_name() {
        let path = backup_path(std::path::Path::new("/backups"), chrono_tz::UTC);
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("backup_restaurant_db_"));
        assert!(name.ends_with(".db"));
        // backup_restaurant_db_ + YYYYMMDD_HHMMSS + .db
        assert_eq!(name.len(), "backup_restaurant_db_".len() + 15 + 3);
        assert_eq!(path.parent(), Some(std::path::Path::new("/backups")));
    }
}
