use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::BankAccount;

const ACCOUNT_COLUMNS: &str =
    "id, account_type, balance, created_at, status, customer_id, overdraft, interest_rate";

pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<BankAccount>, DatabaseError> {
        let account = sqlx::query_as::<_, BankAccount>(&format!(
            "SELECT {} FROM bank_accounts WHERE id = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    pub async fn list_all(&self) -> Result<Vec<BankAccount>, DatabaseError> {
        let accounts = sqlx::query_as::<_, BankAccount>(&format!(
            "SELECT {} FROM bank_accounts ORDER BY created_at",
            ACCOUNT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }

    pub async fn insert(&self, account: &BankAccount) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO bank_accounts \
             (id, account_type, balance, created_at, status, customer_id, overdraft, interest_rate) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(account.id)
        .bind(account.kind.tag())
        .bind(account.balance)
        .bind(account.created_at)
        .bind(account.status)
        .bind(account.customer_id)
        .bind(account.kind.overdraft())
        .bind(account.kind.interest_rate())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fetch an account inside a transaction, taking a row lock so concurrent
    /// balance mutations against the same account serialize
    pub async fn lock_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Option<BankAccount>, DatabaseError> {
        let account = sqlx::query_as::<_, BankAccount>(&format!(
            "SELECT {} FROM bank_accounts WHERE id = $1 FOR UPDATE",
            ACCOUNT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(account)
    }

    /// Persist a new balance for a locked account row
    pub async fn apply_balance(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        new_balance: f64,
    ) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE bank_accounts SET balance = $2 WHERE id = $1")
            .bind(id)
            .bind(new_balance)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}
