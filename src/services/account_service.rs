use std::collections::HashMap;

use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::api::dto::{operation_to_dto, total_pages, AccountHistoryDto, OperationDto};
use crate::database::manager::DatabaseError;
use crate::database::models::{
    AccountKind, AccountStatus, BankAccount, Customer, OperationType,
};
use crate::database::repositories::{
    AccountRepository, CustomerRepository, OperationRepository,
};

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Account not found: {0}")]
    NotFound(Uuid),

    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    #[error("Insufficient balance: {requested} requested, {balance} available")]
    InsufficientBalance { balance: f64, requested: f64 },

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

pub struct AccountService {
    pool: PgPool,
}

impl AccountService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn accounts(&self) -> AccountRepository {
        AccountRepository::new(self.pool.clone())
    }

    fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.pool.clone())
    }

    fn operations(&self) -> OperationRepository {
        OperationRepository::new(self.pool.clone())
    }

    pub async fn create_current_account(
        &self,
        initial_balance: f64,
        overdraft: f64,
        customer_id: Uuid,
    ) -> Result<(BankAccount, Customer), AccountError> {
        self.create_account(initial_balance, customer_id, AccountKind::Current { overdraft })
            .await
    }

    pub async fn create_saving_account(
        &self,
        initial_balance: f64,
        interest_rate: f64,
        customer_id: Uuid,
    ) -> Result<(BankAccount, Customer), AccountError> {
        self.create_account(
            initial_balance,
            customer_id,
            AccountKind::Saving { interest_rate },
        )
        .await
    }

    async fn create_account(
        &self,
        initial_balance: f64,
        customer_id: Uuid,
        kind: AccountKind,
    ) -> Result<(BankAccount, Customer), AccountError> {
        let owner = self
            .customers()
            .find_by_id(customer_id)
            .await?
            .ok_or(AccountError::CustomerNotFound(customer_id))?;

        let account = BankAccount {
            id: Uuid::new_v4(),
            balance: initial_balance,
            created_at: Utc::now(),
            status: AccountStatus::Created,
            customer_id,
            kind,
        };

        self.accounts().insert(&account).await?;
        Ok((account, owner))
    }

    /// Resolve an account together with its owner
    pub async fn get_account(
        &self,
        account_id: Uuid,
    ) -> Result<(BankAccount, Customer), AccountError> {
        let account = self
            .accounts()
            .find_by_id(account_id)
            .await?
            .ok_or(AccountError::NotFound(account_id))?;

        let owner = self
            .customers()
            .find_by_id(account.customer_id)
            .await?
            .ok_or(AccountError::CustomerNotFound(account.customer_id))?;

        Ok((account, owner))
    }

    pub async fn list_accounts(&self) -> Result<Vec<(BankAccount, Customer)>, AccountError> {
        let accounts = self.accounts().list_all().await?;

        let mut customer_ids: Vec<Uuid> = accounts.iter().map(|a| a.customer_id).collect();
        customer_ids.sort_unstable();
        customer_ids.dedup();

        let owners: HashMap<Uuid, Customer> = self
            .customers()
            .find_by_ids(&customer_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let mut result = Vec::with_capacity(accounts.len());
        for account in accounts {
            let owner = owners
                .get(&account.customer_id)
                .cloned()
                .ok_or(AccountError::CustomerNotFound(account.customer_id))?;
            result.push((account, owner));
        }
        Ok(result)
    }

    /// Withdraw from an account. Fails when the balance is strictly below the
    /// requested amount; a debit of the exact balance drains it to zero.
    /// The overdraft limit stored on current accounts is not consulted.
    pub async fn debit(
        &self,
        account_id: Uuid,
        amount: f64,
        description: &str,
    ) -> Result<(), AccountError> {
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;
        Self::debit_tx(&mut tx, account_id, amount, description).await?;
        tx.commit().await.map_err(DatabaseError::from)?;
        Ok(())
    }

    /// Deposit into an account. No upper bound.
    pub async fn credit(
        &self,
        account_id: Uuid,
        amount: f64,
        description: &str,
    ) -> Result<(), AccountError> {
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;
        Self::credit_tx(&mut tx, account_id, amount, description).await?;
        tx.commit().await.map_err(DatabaseError::from)?;
        Ok(())
    }

    /// Move funds between two accounts. Both legs run in one transaction: if
    /// the credit leg fails the debit rolls back with it.
    pub async fn transfer(
        &self,
        source_id: Uuid,
        destination_id: Uuid,
        amount: f64,
    ) -> Result<(), AccountError> {
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;
        Self::debit_tx(
            &mut tx,
            source_id,
            amount,
            &format!("Transfer to {}", destination_id),
        )
        .await?;
        Self::credit_tx(
            &mut tx,
            destination_id,
            amount,
            &format!("Transfer from {}", source_id),
        )
        .await?;
        tx.commit().await.map_err(DatabaseError::from)?;
        Ok(())
    }

    async fn debit_tx(
        tx: &mut Transaction<'_, Postgres>,
        account_id: Uuid,
        amount: f64,
        description: &str,
    ) -> Result<(), AccountError> {
        let account = AccountRepository::lock_for_update(tx, account_id)
            .await?
            .ok_or(AccountError::NotFound(account_id))?;

        if account.balance < amount {
            return Err(AccountError::InsufficientBalance {
                balance: account.balance,
                requested: amount,
            });
        }

        OperationRepository::append(
            tx,
            account_id,
            amount,
            OperationType::Debit,
            description,
            Utc::now(),
        )
        .await?;
        AccountRepository::apply_balance(tx, account_id, account.balance - amount).await?;
        Ok(())
    }

    async fn credit_tx(
        tx: &mut Transaction<'_, Postgres>,
        account_id: Uuid,
        amount: f64,
        description: &str,
    ) -> Result<(), AccountError> {
        let account = AccountRepository::lock_for_update(tx, account_id)
            .await?
            .ok_or(AccountError::NotFound(account_id))?;

        OperationRepository::append(
            tx,
            account_id,
            amount,
            OperationType::Credit,
            description,
            Utc::now(),
        )
        .await?;
        AccountRepository::apply_balance(tx, account_id, account.balance + amount).await?;
        Ok(())
    }

    /// Full, unordered history. An unknown account yields an empty list
    /// rather than an error.
    pub async fn account_history(
        &self,
        account_id: Uuid,
    ) -> Result<Vec<OperationDto>, AccountError> {
        let operations = self.operations().find_by_account(account_id).await?;
        Ok(operations.iter().map(operation_to_dto).collect())
    }

    /// One page of history, newest operation first
    pub async fn account_history_paged(
        &self,
        account_id: Uuid,
        page: i64,
        size: i64,
    ) -> Result<AccountHistoryDto, AccountError> {
        let account = self
            .accounts()
            .find_by_id(account_id)
            .await?
            .ok_or(AccountError::NotFound(account_id))?;

        let (operations, total) = self
            .operations()
            .find_by_account_paged(account_id, page, size)
            .await?;

        Ok(AccountHistoryDto {
            account_id,
            balance: account.balance,
            current_page: page,
            total_pages: total_pages(total, size),
            page_size: size,
            operations: operations.iter().map(operation_to_dto).collect(),
        })
    }
}
