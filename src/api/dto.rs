use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{
    AccountOperation, AccountStatus, BankAccount, Customer, OperationType,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Wire shape shared by both account variants. The `type` field is the
/// discriminator; the variant-foreign attribute is omitted from the JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankAccountDto {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub account_type: String,
    pub balance: f64,
    pub created_at: DateTime<Utc>,
    pub status: AccountStatus,
    pub customer: CustomerDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overdraft: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationDto {
    pub id: i64,
    pub operation_date: DateTime<Utc>,
    pub amount: f64,
    #[serde(rename = "type")]
    pub operation_type: OperationType,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountHistoryDto {
    pub account_id: Uuid,
    pub balance: f64,
    pub current_page: i64,
    pub total_pages: i64,
    pub page_size: i64,
    pub operations: Vec<OperationDto>,
}

pub fn customer_to_dto(customer: &Customer) -> CustomerDto {
    CustomerDto {
        id: customer.id,
        name: customer.name.clone(),
        email: customer.email.clone(),
    }
}

/// The owner is resolved together with the account by the service layer, so a
/// dangling customer reference can never reach this function.
pub fn account_to_dto(account: &BankAccount, owner: &Customer) -> BankAccountDto {
    BankAccountDto {
        id: account.id,
        account_type: account.kind.tag().to_string(),
        balance: account.balance,
        created_at: account.created_at,
        status: account.status,
        customer: customer_to_dto(owner),
        overdraft: account.kind.overdraft(),
        interest_rate: account.kind.interest_rate(),
    }
}

pub fn operation_to_dto(operation: &AccountOperation) -> OperationDto {
    OperationDto {
        id: operation.id,
        operation_date: operation.operation_date,
        amount: operation.amount,
        operation_type: operation.operation_type,
        description: operation.description.clone(),
    }
}

/// Page count for a history of `total` operations at `page_size` per page
pub fn total_pages(total: i64, page_size: i64) -> i64 {
    if page_size <= 0 {
        return 0;
    }
    (total + page_size - 1) / page_size
}
