use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{AccountOperation, OperationType};

const OPERATION_COLUMNS: &str =
    "id, operation_date, amount, operation_type, description, account_id";

pub struct OperationRepository {
    pool: PgPool,
}

impl OperationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Full history for an account, no ordering guarantee
    pub async fn find_by_account(
        &self,
        account_id: Uuid,
    ) -> Result<Vec<AccountOperation>, DatabaseError> {
        let operations = sqlx::query_as::<_, AccountOperation>(&format!(
            "SELECT {} FROM account_operations WHERE account_id = $1",
            OPERATION_COLUMNS
        ))
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(operations)
    }

    /// One page of history, newest first, plus the total row count
    pub async fn find_by_account_paged(
        &self,
        account_id: Uuid,
        page: i64,
        size: i64,
    ) -> Result<(Vec<AccountOperation>, i64), DatabaseError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM account_operations WHERE account_id = $1")
                .bind(account_id)
                .fetch_one(&self.pool)
                .await?;

        let operations = sqlx::query_as::<_, AccountOperation>(&format!(
            "SELECT {} FROM account_operations WHERE account_id = $1 \
             ORDER BY operation_date DESC, id DESC LIMIT $2 OFFSET $3",
            OPERATION_COLUMNS
        ))
        .bind(account_id)
        .bind(size)
        .bind(page * size)
        .fetch_all(&self.pool)
        .await?;

        Ok((operations, count.0))
    }

    /// Append one operation to the log inside the caller's transaction
    pub async fn append(
        tx: &mut Transaction<'_, Postgres>,
        account_id: Uuid,
        amount: f64,
        operation_type: OperationType,
        description: &str,
        operation_date: DateTime<Utc>,
    ) -> Result<i64, DatabaseError> {
        let row: (i64,) = sqlx::query_as(
            "INSERT INTO account_operations \
             (operation_date, amount, operation_type, description, account_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(operation_date)
        .bind(amount)
        .bind(operation_type)
        .bind(description)
        .bind(account_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(row.0)
    }
}
