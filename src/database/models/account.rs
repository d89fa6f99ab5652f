use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

/// Lifecycle status of an account. Informational only: no transition rules
/// are enforced anywhere in the service layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "text", rename_all = "UPPERCASE")]
pub enum AccountStatus {
    Created,
    Activated,
    Suspended,
}

/// Variant-specific payload of an account. The `account_type` column holds the
/// discriminator; both variants share one physical table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AccountKind {
    Current { overdraft: f64 },
    Saving { interest_rate: f64 },
}

impl AccountKind {
    /// Discriminator value stored in the `account_type` column
    pub fn tag(&self) -> &'static str {
        match self {
            AccountKind::Current { .. } => "CURRENT",
            AccountKind::Saving { .. } => "SAVING",
        }
    }

    pub fn overdraft(&self) -> Option<f64> {
        match self {
            AccountKind::Current { overdraft } => Some(*overdraft),
            AccountKind::Saving { .. } => None,
        }
    }

    pub fn interest_rate(&self) -> Option<f64> {
        match self {
            AccountKind::Current { .. } => None,
            AccountKind::Saving { interest_rate } => Some(*interest_rate),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BankAccount {
    pub id: Uuid,
    pub balance: f64,
    pub created_at: DateTime<Utc>,
    pub status: AccountStatus,
    pub customer_id: Uuid,
    pub kind: AccountKind,
}

impl<'r> FromRow<'r, PgRow> for BankAccount {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let tag: String = row.try_get("account_type")?;
        let kind = match tag.as_str() {
            "CURRENT" => AccountKind::Current {
                overdraft: row.try_get("overdraft")?,
            },
            "SAVING" => AccountKind::Saving {
                interest_rate: row.try_get("interest_rate")?,
            },
            other => {
                return Err(sqlx::Error::ColumnDecode {
                    index: "account_type".to_string(),
                    source: format!("unknown account type: {}", other).into(),
                })
            }
        };

        Ok(BankAccount {
            id: row.try_get("id")?,
            balance: row.try_get("balance")?,
            created_at: row.try_get("created_at")?,
            status: row.try_get("status")?,
            customer_id: row.try_get("customer_id")?,
            kind,
        })
    }
}
