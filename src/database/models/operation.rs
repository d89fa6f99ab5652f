use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Sign of the balance delta an operation applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "text", rename_all = "UPPERCASE")]
pub enum OperationType {
    Debit,
    Credit,
}

/// One entry in an account's append-only operation log
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AccountOperation {
    pub id: i64,
    pub operation_date: DateTime<Utc>,
    pub amount: f64,
    pub operation_type: OperationType,
    pub description: String,
    pub account_id: Uuid,
}
