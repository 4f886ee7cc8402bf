//! Postgres implementation of [`Storage`].

use async_trait::async_trait;
use sqlx::postgres::PgPool;

use crate::domain::{
    Account, AccountCredentials, AccountUpdate, Device, DeviceInput, NewAccount,
};
use crate::error::{AppError, AppResult};
use crate::storage::models::{AccountCredentialsRow, AccountRow, DeviceRow};
use crate::storage::Storage;

/// Statements run by [`PostgresStore::init_schema`], in order.
///
/// Everything after each `CREATE TABLE` brings tables created by earlier
/// deployments up to the current shape: nullable text and balance columns,
/// an `INTEGER` account number, `TIMESTAMP` without time zone, and the
/// missing `password_hash` and `user_id` columns. On current tables these
/// statements change nothing.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS account (
        id SERIAL PRIMARY KEY,
        first_name VARCHAR(50) NOT NULL,
        last_name VARCHAR(50) NOT NULL,
        number BIGSERIAL UNIQUE,
        balance NUMERIC(12, 2) NOT NULL DEFAULT 0,
        password_hash TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    "ALTER TABLE account ADD COLUMN IF NOT EXISTS password_hash TEXT",
    r#"
    UPDATE account SET
        first_name = COALESCE(first_name, ''),
        last_name = COALESCE(last_name, ''),
        balance = COALESCE(balance, 0),
        created_at = COALESCE(created_at, CURRENT_TIMESTAMP)
    WHERE first_name IS NULL OR last_name IS NULL OR balance IS NULL OR created_at IS NULL
    "#,
    r#"
    ALTER TABLE account
        ALTER COLUMN first_name SET NOT NULL,
        ALTER COLUMN last_name SET NOT NULL,
        ALTER COLUMN number TYPE BIGINT,
        ALTER COLUMN balance SET DEFAULT 0,
        ALTER COLUMN balance SET NOT NULL,
        ALTER COLUMN created_at TYPE TIMESTAMPTZ,
        ALTER COLUMN created_at SET NOT NULL
    "#,
    "ALTER SEQUENCE IF EXISTS account_number_seq AS BIGINT",
    "CREATE UNIQUE INDEX IF NOT EXISTS account_number_key ON account(number)",
    r#"
    CREATE TABLE IF NOT EXISTS device (
        device_id SERIAL PRIMARY KEY,
        name VARCHAR(50) NOT NULL,
        status VARCHAR(50) NOT NULL,
        user_id INTEGER REFERENCES account(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    "ALTER TABLE device ADD COLUMN IF NOT EXISTS user_id INTEGER REFERENCES account(id) ON DELETE CASCADE",
    r#"
    UPDATE device SET
        name = COALESCE(name, ''),
        status = COALESCE(status, ''),
        created_at = COALESCE(created_at, CURRENT_TIMESTAMP)
    WHERE name IS NULL OR status IS NULL OR created_at IS NULL
    "#,
    r#"
    ALTER TABLE device
        ALTER COLUMN name SET NOT NULL,
        ALTER COLUMN status SET NOT NULL,
        ALTER COLUMN created_at TYPE TIMESTAMPTZ,
        ALTER COLUMN created_at SET NOT NULL
    "#,
    "CREATE INDEX IF NOT EXISTS idx_device_user_id ON device(user_id)",
];

/// Store backed by a Postgres connection pool.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Storage for PostgresStore {
    async fn init_schema(&self) -> AppResult<()> {
        for statement in SCHEMA {
            sqlx::query(*statement).execute(&self.pool).await?;
        }

        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // ==================== Accounts ====================

    async fn create_account(&self, account: &NewAccount) -> AppResult<Account> {
        let row: AccountRow = sqlx::query_as(
            r#"
            INSERT INTO account (first_name, last_name, balance, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, first_name, last_name, number, balance, created_at
            "#,
        )
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.balance)
        .bind(&account.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_account(&self, id: i32) -> AppResult<Account> {
        let row: AccountRow = sqlx::query_as(
            "SELECT id, first_name, last_name, number, balance, created_at FROM account WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Account {} not found", id)))?;

        Ok(row.into())
    }

    async fn list_accounts(&self, limit: i64, offset: i64) -> AppResult<Vec<Account>> {
        let rows: Vec<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, first_name, last_name, number, balance, created_at
            FROM account
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Account::from).collect())
    }

    async fn update_account(&self, id: i32, update: &AccountUpdate) -> AppResult<Account> {
        let row: AccountRow = sqlx::query_as(
            r#"
            UPDATE account SET first_name = $1, last_name = $2, balance = $3
            WHERE id = $4
            RETURNING id, first_name, last_name, number, balance, created_at
            "#,
        )
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(update.balance)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Account {} not found", id)))?;

        Ok(row.into())
    }

    async fn delete_account(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM account WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Account {} not found", id)));
        }

        Ok(())
    }

    async fn get_account_credentials(&self, number: i64) -> AppResult<AccountCredentials> {
        let row: AccountCredentialsRow = sqlx::query_as(
            r#"
            SELECT id, first_name, last_name, number, balance, created_at, password_hash
            FROM account
            WHERE number = $1
            "#,
        )
        .bind(number)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Account number {} not found", number)))?;

        Ok(row.into())
    }

    // ==================== Devices ====================

    async fn create_device(&self, device: &DeviceInput) -> AppResult<Device> {
        let row: DeviceRow = sqlx::query_as(
            r#"
            INSERT INTO device (name, status, user_id)
            VALUES ($1, $2, $3)
            RETURNING device_id, name, status, user_id, created_at
            "#,
        )
        .bind(&device.name)
        .bind(&device.status)
        .bind(device.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_device(&self, device_id: i32) -> AppResult<Device> {
        let row: DeviceRow = sqlx::query_as(
            "SELECT device_id, name, status, user_id, created_at FROM device WHERE device_id = $1",
        )
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Device {} not found", device_id)))?;

        Ok(row.into())
    }

    async fn list_devices(
        &self,
        user_id: Option<i32>,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Device>> {
        let rows: Vec<DeviceRow> = sqlx::query_as(
            r#"
            SELECT device_id, name, status, user_id, created_at
            FROM device
            WHERE ($1::INTEGER IS NULL OR user_id = $1)
            ORDER BY device_id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Device::from).collect())
    }

    async fn update_device(&self, device_id: i32, device: &DeviceInput) -> AppResult<Device> {
        let row: DeviceRow = sqlx::query_as(
            r#"
            UPDATE device SET name = $1, status = $2, user_id = $3
            WHERE device_id = $4
            RETURNING device_id, name, status, user_id, created_at
            "#,
        )
        .bind(&device.name)
        .bind(&device.status)
        .bind(device.user_id)
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Device {} not found", device_id)))?;

        Ok(row.into())
    }

    async fn delete_device(&self, device_id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM device WHERE device_id = $1")
            .bind(device_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Device {} not found", device_id)));
        }

        Ok(())
    }
}
