//! Customer Repository

use shared::error::ErrorCode;
use shared::models::{Customer, CustomerCreate};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Customer>> {
    let customers = sqlx::query_as::<_, Customer>(
        "SELECT id, name, address, phone, created_at FROM customer ORDER BY name, id",
    )
    .fetch_all(pool)
    .await?;
    Ok(customers)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Customer>> {
    let customer = sqlx::query_as::<_, Customer>(
        "SELECT id, name, address, phone, created_at FROM customer WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(customer)
}

/// Create a new customer
pub async fn create(pool: &SqlitePool, data: CustomerCreate, now: i64) -> RepoResult<Customer> {
    let address = data
        .address
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty());

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO customer (name, address, phone, created_at) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(data.name.trim())
    .bind(address)
    .bind(data.phone.trim())
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create customer".to_string()))
}

/// Delete a customer without reservations
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let reservations: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM reservation WHERE customer_id = ?")
            .bind(id)
            .fetch_one(pool)
            .await?;
    if reservations > 0 {
        return Err(RepoError::Rejected(
            ErrorCode::CustomerHasReservations,
            format!("Customer {} has {} reservation(s)", id, reservations),
        ));
    }

    let result = sqlx::query("DELETE FROM customer WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(
            ErrorCode::CustomerNotFound,
            format!("Customer {} not found", id),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    fn customer(name: &str) -> CustomerCreate {
        CustomerCreate {
            name: name.to_string(),
            address: Some("  ".to_string()),
            phone: "555-0101".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_by_name() {
        let pool = test_pool().await;
        create(&pool, customer("Zoe"), 1).await.unwrap();
        let ana = create(&pool, customer("Ana"), 2).await.unwrap();

        // Blank address is stored as absent
        assert_eq!(ana.address, None);
        assert_eq!(ana.created_at, 2);

        let names: Vec<String> = find_all(&pool).await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Ana", "Zoe"]);
    }

    #[tokio::test]
    async fn test_delete_refuses_customer_with_reservation() {
        let pool = test_pool().await;
        let ana = create(&pool, customer("Ana"), 1).await.unwrap();
        sqlx::query(
            "INSERT INTO reservation (table_number, customer_id, starts_at, ends_at) VALUES (1, ?, 0, 10)",
        )
        .bind(ana.id)
        .execute(&pool)
        .await
        .unwrap();

        let err = delete(&pool, ana.id).await.unwrap_err();
        assert!(matches!(err, RepoError::Rejected(ErrorCode::CustomerHasReservations, _)));

        let err = delete(&pool, 999).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(ErrorCode::CustomerNotFound, _)));
    }
}
