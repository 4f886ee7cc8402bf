//! Storage layer for Account Hub.
//!
//! `Storage` wraps one parameterized SQL statement per operation. The
//! production implementation talks to Postgres via SQLx.

#[cfg(test)]
mod memory;
mod models;
mod postgres;

use async_trait::async_trait;

use crate::domain::{
    Account, AccountCredentials, AccountUpdate, Device, DeviceInput, NewAccount,
};
use crate::error::AppResult;

#[cfg(test)]
pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Persistence operations for accounts and devices.
///
/// Lookups, updates and deletes of a missing row fail with `NotFound`.
/// Lists are ordered by primary key.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Create tables and indexes if they don't exist.
    async fn init_schema(&self) -> AppResult<()>;

    /// Check the store is reachable.
    async fn ping(&self) -> AppResult<()>;

    // ==================== Accounts ====================

    async fn create_account(&self, account: &NewAccount) -> AppResult<Account>;

    async fn get_account(&self, id: i32) -> AppResult<Account>;

    async fn list_accounts(&self, limit: i64, offset: i64) -> AppResult<Vec<Account>>;

    async fn update_account(&self, id: i32, update: &AccountUpdate) -> AppResult<Account>;

    async fn delete_account(&self, id: i32) -> AppResult<()>;

    /// Look up an account and its password hash by account number.
    async fn get_account_credentials(&self, number: i64) -> AppResult<AccountCredentials>;

    // ==================== Devices ====================

    async fn create_device(&self, device: &DeviceInput) -> AppResult<Device>;

    async fn get_device(&self, device_id: i32) -> AppResult<Device>;

    /// List devices, optionally only those owned by `user_id`.
    async fn list_devices(
        &self,
        user_id: Option<i32>,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Device>>;

    async fn update_device(&self, device_id: i32, device: &DeviceInput) -> AppResult<Device>;

    async fn delete_device(&self, device_id: i32) -> AppResult<()>;
}
