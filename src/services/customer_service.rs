use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Customer;
use crate::database::repositories::CustomerRepository;

#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    #[error("Customer not found: {0}")]
    NotFound(Uuid),

    #[error("Customer {0} still owns {1} account(s)")]
    HasAccounts(Uuid, i64),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

pub struct CustomerService {
    pool: PgPool,
}

impl CustomerService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn repository(&self) -> CustomerRepository {
        CustomerRepository::new(self.pool.clone())
    }

    /// Create a customer. Name and email are stored as given, with no format
    /// or uniqueness validation.
    pub async fn create_customer(
        &self,
        name: String,
        email: String,
    ) -> Result<Customer, CustomerError> {
        let now = Utc::now();
        let customer = Customer {
            id: Uuid::new_v4(),
            name,
            email,
            created_at: now,
            updated_at: now,
        };

        self.repository().insert(&customer).await?;
        Ok(customer)
    }

    /// Update an existing customer. Not an upsert: an unknown id fails with
    /// NotFound.
    pub async fn update_customer(
        &self,
        id: Uuid,
        name: String,
        email: String,
    ) -> Result<Customer, CustomerError> {
        let repository = self.repository();
        let mut customer = repository
            .find_by_id(id)
            .await?
            .ok_or(CustomerError::NotFound(id))?;

        customer.name = name;
        customer.email = email;
        customer.updated_at = Utc::now();

        repository.update(&customer).await?;
        Ok(customer)
    }

    /// Delete a customer. Refused while any account still references the
    /// customer; callers must close accounts first.
    pub async fn delete_customer(&self, id: Uuid) -> Result<(), CustomerError> {
        let repository = self.repository();

        if repository.find_by_id(id).await?.is_none() {
            return Err(CustomerError::NotFound(id));
        }

        let owned = repository.count_accounts(id).await?;
        if owned > 0 {
            return Err(CustomerError::HasAccounts(id, owned));
        }

        if !repository.delete(id).await? {
            return Err(CustomerError::NotFound(id));
        }
        Ok(())
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>, CustomerError> {
        Ok(self.repository().list_all().await?)
    }

    pub async fn get_customer(&self, id: Uuid) -> Result<Customer, CustomerError> {
        self.repository()
            .find_by_id(id)
            .await?
            .ok_or(CustomerError::NotFound(id))
    }
}
