//! In-memory [`Storage`] used by the router tests.
//!
//! Mirrors the Postgres schema's behaviour: serial keys, unknown device
//! owners are rejected, and deleting an account deletes its devices.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::{
    Account, AccountCredentials, AccountUpdate, Device, DeviceInput, NewAccount,
};
use crate::error::{AppError, AppResult};
use crate::storage::Storage;

#[derive(Default)]
struct Tables {
    accounts: BTreeMap<i32, AccountCredentials>,
    devices: BTreeMap<i32, Device>,
    next_account_id: i32,
    next_account_number: i64,
    next_device_id: i32,
}

impl Tables {
    fn check_owner(&self, user_id: Option<i32>) -> AppResult<()> {
        match user_id {
            Some(id) if !self.accounts.contains_key(&id) => Err(AppError::BadRequest(
                "Referenced account does not exist".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

fn page<T: Clone>(items: impl Iterator<Item = T>, limit: i64, offset: i64) -> Vec<T> {
    items
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    unreachable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `ping` fails, as if the database were down.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn init_schema(&self) -> AppResult<()> {
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        if self.unreachable {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    async fn create_account(&self, account: &NewAccount) -> AppResult<Account> {
        let mut tables = self.tables.write().await;
        tables.next_account_id += 1;
        tables.next_account_number += 1;

        let created = Account {
            id: tables.next_account_id,
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            number: tables.next_account_number,
            balance: account.balance,
            created_at: Utc::now(),
        };

        tables.accounts.insert(
            created.id,
            AccountCredentials {
                account: created.clone(),
                password_hash: account.password_hash.clone(),
            },
        );

        Ok(created)
    }

    async fn get_account(&self, id: i32) -> AppResult<Account> {
        self.tables
            .read()
            .await
            .accounts
            .get(&id)
            .map(|c| c.account.clone())
            .ok_or_else(|| AppError::NotFound(format!("Account {} not found", id)))
    }

    async fn list_accounts(&self, limit: i64, offset: i64) -> AppResult<Vec<Account>> {
        let tables = self.tables.read().await;
        Ok(page(
            tables.accounts.values().map(|c| c.account.clone()),
            limit,
            offset,
        ))
    }

    async fn update_account(&self, id: i32, update: &AccountUpdate) -> AppResult<Account> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .accounts
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Account {} not found", id)))?;

        stored.account.first_name = update.first_name.clone();
        stored.account.last_name = update.last_name.clone();
        stored.account.balance = update.balance;

        Ok(stored.account.clone())
    }

    async fn delete_account(&self, id: i32) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .accounts
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("Account {} not found", id)))?;

        // ON DELETE CASCADE
        tables.devices.retain(|_, d| d.user_id != Some(id));

        Ok(())
    }

    async fn get_account_credentials(&self, number: i64) -> AppResult<AccountCredentials> {
        self.tables
            .read()
            .await
            .accounts
            .values()
            .find(|c| c.account.number == number)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Account number {} not found", number)))
    }

    async fn create_device(&self, device: &DeviceInput) -> AppResult<Device> {
        let mut tables = self.tables.write().await;
        tables.check_owner(device.user_id)?;
        tables.next_device_id += 1;

        let created = Device {
            device_id: tables.next_device_id,
            name: device.name.clone(),
            status: device.status.clone(),
            user_id: device.user_id,
            created_at: Utc::now(),
        };
        tables.devices.insert(created.device_id, created.clone());

        Ok(created)
    }

    async fn get_device(&self, device_id: i32) -> AppResult<Device> {
        self.tables
            .read()
            .await
            .devices
            .get(&device_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Device {} not found", device_id)))
    }

    async fn list_devices(
        &self,
        user_id: Option<i32>,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Device>> {
        let tables = self.tables.read().await;
        let matching = tables
            .devices
            .values()
            .filter(|d| user_id.is_none() || d.user_id == user_id)
            .cloned();

        Ok(page(matching, limit, offset))
    }

    async fn update_device(&self, device_id: i32, device: &DeviceInput) -> AppResult<Device> {
        let mut tables = self.tables.write().await;
        tables.check_owner(device.user_id)?;

        let stored = tables
            .devices
            .get_mut(&device_id)
            .ok_or_else(|| AppError::NotFound(format!("Device {} not found", device_id)))?;

        stored.name = device.name.clone();
        stored.status = device.status.clone();
        stored.user_id = device.user_id;

        Ok(stored.clone())
    }

    async fn delete_device(&self, device_id: i32) -> AppResult<()> {
        self.tables
            .write()
            .await
            .devices
            .remove(&device_id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Device {} not found", device_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_cascade_and_owner_check() {
        let store = MemoryStore::new();
        let owner = store
            .create_account(&NewAccount::new("Ada", "Lovelace", Decimal::ZERO, None).unwrap())
            .await
            .unwrap();

        let orphan = DeviceInput::new("lamp", "active", Some(owner.id + 1)).unwrap();
        assert!(matches!(
            store.create_device(&orphan).await,
            Err(AppError::BadRequest(_))
        ));

        let owned = DeviceInput::new("lamp", "active", Some(owner.id)).unwrap();
        let device = store.create_device(&owned).await.unwrap();
        let unowned = DeviceInput::new("hub", "active", None).unwrap();
        store.create_device(&unowned).await.unwrap();

        assert_eq!(store.list_devices(Some(owner.id), 10, 0).await.unwrap().len(), 1);
        assert_eq!(store.list_devices(None, 10, 0).await.unwrap().len(), 2);
        assert_eq!(store.list_devices(None, 1, 1).await.unwrap().len(), 1);

        store.delete_account(owner.id).await.unwrap();
        assert!(store.get_device(device.device_id).await.is_err());
        assert_eq!(store.list_devices(None, 10, 0).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_rows() {
        let store = MemoryStore::new();

        let update = AccountUpdate::new("Ada", "Lovelace", Decimal::ZERO).unwrap();
        assert!(matches!(
            store.update_account(7, &update).await,
            Err(AppError::NotFound(_))
        ));

        let input = DeviceInput::new("lamp", "active", None).unwrap();
        assert!(matches!(
            store.update_device(7, &input).await,
            Err(AppError::NotFound(_))
        ));
    }
}
