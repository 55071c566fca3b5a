//! Repository Module
//!
//! CRUD operations over the SQLite pool. Every function is a free `async fn`
//! taking `&SqlitePool`; multi-statement writes open their own transaction
//! through [`begin_write`].

pub mod customer;
pub mod dining_table;
pub mod inventory;
pub mod menu;
pub mod order;
pub mod recipe;
pub mod report;
pub mod reservation;
pub mod stock;
pub mod stock_preset;

use shared::error::{AppError, ErrorCode};
use sqlx::{Sqlite, SqlitePool, Transaction};
use thiserror::Error;

use crate::orders::stock::StockShortage;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    /// Missing row; the code names what was missing
    #[error("{1}")]
    NotFound(ErrorCode, String),

    /// Write refused by a business rule (duplicates, references, order state)
    #[error("{1}")]
    Rejected(ErrorCode, String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    InsufficientStock(StockShortage),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return RepoError::Rejected(ErrorCode::AlreadyExists, db_err.message().to_string());
            }
            if db_err.is_foreign_key_violation() {
                return RepoError::Rejected(
                    ErrorCode::ReferenceConflict,
                    format!("Referenced by other records: {}", db_err.message()),
                );
            }
            if db_err.is_check_violation() {
                return RepoError::Validation(db_err.message().to_string());
            }
        }
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(code, msg) => AppError::with_message(code, msg),
            RepoError::Rejected(code, msg) => AppError::with_message(code, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::InsufficientStock(shortage) => {
                AppError::with_message(ErrorCode::InsufficientStock, shortage.to_string())
                    .with_detail("ingredient", shortage.ingredient)
                    .with_detail("dish", shortage.dish)
                    .with_detail("available", shortage.available)
                    .with_detail("required", shortage.required)
            }
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Repository database error");
                AppError::database(msg)
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Open a write transaction
///
/// `BEGIN IMMEDIATE` takes the write lock up front, so concurrent writers
/// queue on the busy timeout instead of failing when a read lock upgrades.
pub(crate) async fn begin_write(pool: &SqlitePool) -> RepoResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::db::DbService;
    use sqlx::SqlitePool;

    /// Fresh in-memory database with the full schema
    pub async fn test_pool() -> SqlitePool {
        DbService::in_memory().await.unwrap().pool
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::test_pool;
    use super::*;

    #[tokio::test]
    async fn test_foreign_key_violation_maps_to_reference_conflict() {
        let pool = test_pool().await;
        let err = sqlx::query(
            "INSERT INTO recipe_ingredient (recipe_id, ingredient_id, quantity_needed, unit) VALUES (999, 999, 1.0, 'kg')",
        )
        .execute(&pool)
        .await
        .map_err(RepoError::from)
        .unwrap_err();

        assert!(matches!(err, RepoError::Rejected(ErrorCode::ReferenceConflict, _)));
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::ReferenceConflict);
        assert_eq!(app.http_status(), http::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_begin_write_commits() {
        let pool = test_pool().await;
        let mut tx = begin_write(&pool).await.unwrap();
        sqlx::query("INSERT INTO customer (name, phone, created_at) VALUES ('Ana', '555', 0)")
            .execute(&mut *tx)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customer")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
