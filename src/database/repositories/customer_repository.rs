use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Customer;

const CUSTOMER_COLUMNS: &str = "id, name, email, created_at, updated_at";

pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, DatabaseError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {} FROM customers WHERE id = $1",
            CUSTOMER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Customer>, DatabaseError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {} FROM customers WHERE id = ANY($1)",
            CUSTOMER_COLUMNS
        ))
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    pub async fn list_all(&self) -> Result<Vec<Customer>, DatabaseError> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {} FROM customers ORDER BY created_at",
            CUSTOMER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    pub async fn insert(&self, customer: &Customer) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO customers (id, name, email, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(customer.id)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update(&self, customer: &Customer) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE customers SET name = $2, email = $3, updated_at = $4 WHERE id = $1")
            .bind(customer.id)
            .bind(&customer.name)
            .bind(&customer.email)
            .bind(customer.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Returns false when no row matched the id
    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of accounts still referencing the customer
    pub async fn count_accounts(&self, customer_id: Uuid) -> Result<i64, DatabaseError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM bank_accounts WHERE customer_id = $1")
                .bind(customer_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }
}
