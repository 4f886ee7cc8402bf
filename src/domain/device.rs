//! Device domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::validate;
use crate::error::AppResult;

/// A persisted device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Device {
    /// Primary key.
    pub device_id: i32,
    /// Device name.
    pub name: String,
    /// Free-form status label (e.g. "active").
    pub status: String,
    /// Owning account, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i32>,
    /// When the device was registered.
    pub created_at: DateTime<Utc>,
}

/// Validated device fields, used for both insert and update.
#[derive(Debug, Clone)]
pub struct DeviceInput {
    pub name: String,
    pub status: String,
    pub user_id: Option<i32>,
}

impl DeviceInput {
    pub fn new(name: &str, status: &str, user_id: Option<i32>) -> AppResult<Self> {
        Ok(Self {
            name: validate::required_text("name", name)?,
            status: validate::required_text("status", status)?,
            user_id,
        })
    }
}
