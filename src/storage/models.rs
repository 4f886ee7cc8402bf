//! Database models for Account Hub.
//!
//! These are the row types returned by SQLx queries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::domain::{Account, AccountCredentials, Device};

/// Database row for the account table.
#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub number: i64,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            number: row.number,
            balance: row.balance,
            created_at: row.created_at,
        }
    }
}

/// Account row plus its password hash.
#[derive(Debug, Clone, FromRow)]
pub struct AccountCredentialsRow {
    #[sqlx(flatten)]
    pub account: AccountRow,
    pub password_hash: Option<String>,
}

impl From<AccountCredentialsRow> for AccountCredentials {
    fn from(row: AccountCredentialsRow) -> Self {
        AccountCredentials {
            account: row.account.into(),
            password_hash: row.password_hash,
        }
    }
}

/// Database row for the device table.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceRow {
    pub device_id: i32,
    pub name: String,
    pub status: String,
    pub user_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<DeviceRow> for Device {
    fn from(row: DeviceRow) -> Self {
        Device {
            device_id: row.device_id,
            name: row.name,
            status: row.status,
            user_id: row.user_id,
            created_at: row.created_at,
        }
    }
}
