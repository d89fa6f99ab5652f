use axum::extract::Path;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::dto::{customer_to_dto, CustomerDto};
use crate::database::manager::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::CustomerService;

#[derive(Debug, Deserialize)]
pub struct CustomerRequest {
    pub name: String,
    pub email: String,
}

/// GET /customers - list all customers
pub async fn customer_list() -> ApiResult<Vec<CustomerDto>> {
    let service = CustomerService::new(DatabaseManager::pool().await?);
    let customers = service.list_customers().await?;

    Ok(ApiResponse::success(
        customers.iter().map(customer_to_dto).collect(),
    ))
}

/// GET /customers/:id - fetch one customer
pub async fn customer_get(Path(id): Path<Uuid>) -> ApiResult<CustomerDto> {
    let service = CustomerService::new(DatabaseManager::pool().await?);
    let customer = service.get_customer(id).await?;

    Ok(ApiResponse::success(customer_to_dto(&customer)))
}

/// POST /customers - create a customer
pub async fn customer_post(Json(request): Json<CustomerRequest>) -> ApiResult<CustomerDto> {
    let service = CustomerService::new(DatabaseManager::pool().await?);
    let customer = service.create_customer(request.name, request.email).await?;

    Ok(ApiResponse::created(customer_to_dto(&customer)))
}

/// PUT /customers/:id - update an existing customer
pub async fn customer_put(
    Path(id): Path<Uuid>,
    Json(request): Json<CustomerRequest>,
) -> ApiResult<CustomerDto> {
    let service = CustomerService::new(DatabaseManager::pool().await?);
    let customer = service
        .update_customer(id, request.name, request.email)
        .await?;

    Ok(ApiResponse::success(customer_to_dto(&customer)))
}

/// DELETE /customers/:id - delete a customer without accounts
pub async fn customer_delete(Path(id): Path<Uuid>) -> ApiResult<()> {
    let service = CustomerService::new(DatabaseManager::pool().await?);
    service.delete_customer(id).await?;

    Ok(ApiResponse::<()>::no_content())
}
