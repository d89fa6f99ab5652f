use axum::extract::{Path, Query};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::dto::{AccountHistoryDto, OperationDto};
use crate::database::manager::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::AccountService;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// GET /accounts/:id/operations - full history, unpaginated
pub async fn operations_get(Path(id): Path<Uuid>) -> ApiResult<Vec<OperationDto>> {
    let service = AccountService::new(DatabaseManager::pool().await?);
    let operations = service.account_history(id).await?;

    Ok(ApiResponse::success(operations))
}

/// GET /accounts/:id/pageOperations?page=&size= - paged history, newest first
pub async fn page_operations_get(
    Path(id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> ApiResult<AccountHistoryDto> {
    let config = crate::config::config();
    let page = query.page.unwrap_or(0).max(0);
    let size = query
        .size
        .unwrap_or(config.api.default_page_size)
        .clamp(1, config.api.max_page_size);

    let service = AccountService::new(DatabaseManager::pool().await?);
    let history = service.account_history_paged(id, page, size).await?;

    Ok(ApiResponse::success(history))
}
