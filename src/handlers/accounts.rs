use axum::extract::Path;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::dto::{account_to_dto, BankAccountDto};
use crate::database::manager::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::AccountService;

#[derive(Debug, Deserialize)]
pub struct CurrentAccountRequest {
    pub initial_balance: f64,
    pub overdraft: f64,
    pub customer_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SavingAccountRequest {
    pub initial_balance: f64,
    pub interest_rate: f64,
    pub customer_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OperationRequest {
    pub account_id: Uuid,
    pub amount: f64,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransferRequest {
    pub source_account_id: Uuid,
    pub destination_account_id: Uuid,
    pub amount: f64,
}

/// GET /accounts - list all accounts with their owners
pub async fn account_list() -> ApiResult<Vec<BankAccountDto>> {
    let service = AccountService::new(DatabaseManager::pool().await?);
    let accounts = service.list_accounts().await?;

    Ok(ApiResponse::success(
        accounts
            .iter()
            .map(|(account, owner)| account_to_dto(account, owner))
            .collect(),
    ))
}

/// GET /accounts/:id - fetch one account
pub async fn account_get(Path(id): Path<Uuid>) -> ApiResult<BankAccountDto> {
    let service = AccountService::new(DatabaseManager::pool().await?);
    let (account, owner) = service.get_account(id).await?;

    Ok(ApiResponse::success(account_to_dto(&account, &owner)))
}

/// POST /accounts/current - open a current account
pub async fn current_account_post(
    Json(request): Json<CurrentAccountRequest>,
) -> ApiResult<BankAccountDto> {
    let service = AccountService::new(DatabaseManager::pool().await?);
    let (account, owner) = service
        .create_current_account(request.initial_balance, request.overdraft, request.customer_id)
        .await?;

    Ok(ApiResponse::created(account_to_dto(&account, &owner)))
}

/// POST /accounts/saving - open a savings account
pub async fn saving_account_post(
    Json(request): Json<SavingAccountRequest>,
) -> ApiResult<BankAccountDto> {
    let service = AccountService::new(DatabaseManager::pool().await?);
    let (account, owner) = service
        .create_saving_account(
            request.initial_balance,
            request.interest_rate,
            request.customer_id,
        )
        .await?;

    Ok(ApiResponse::created(account_to_dto(&account, &owner)))
}

/// POST /accounts/debit - withdraw from an account
pub async fn debit_post(Json(request): Json<OperationRequest>) -> ApiResult<OperationRequest> {
    let service = AccountService::new(DatabaseManager::pool().await?);
    service
        .debit(request.account_id, request.amount, &request.description)
        .await?;

    Ok(ApiResponse::success(request))
}

/// POST /accounts/credit - deposit into an account
pub async fn credit_post(Json(request): Json<OperationRequest>) -> ApiResult<OperationRequest> {
    let service = AccountService::new(DatabaseManager::pool().await?);
    service
        .credit(request.account_id, request.amount, &request.description)
        .await?;

    Ok(ApiResponse::success(request))
}

/// POST /accounts/transfer - move funds between two accounts
pub async fn transfer_post(Json(request): Json<TransferRequest>) -> ApiResult<TransferRequest> {
    let service = AccountService::new(DatabaseManager::pool().await?);
    service
        .transfer(
            request.source_account_id,
            request.destination_account_id,
            request.amount,
        )
        .await?;

    Ok(ApiResponse::success(request))
}
