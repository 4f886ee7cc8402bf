//! API request and response types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Account, Device};

/// Upper bound for any page size.
pub const MAX_PAGE_SIZE: i64 = 100;

fn default_limit() -> i64 {
    20
}

// ==================== Accounts ====================

/// Request to open an account.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    /// Holder's first name.
    pub first_name: String,
    /// Holder's last name.
    pub last_name: String,
    /// Opening balance (defaults to 0).
    #[serde(default)]
    pub balance: Decimal,
    /// Password for logging in; accounts without one cannot log in.
    #[serde(default)]
    pub password: Option<String>,
}

/// Request to replace an account's editable fields.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAccountRequest {
    pub first_name: String,
    pub last_name: String,
    pub balance: Decimal,
}

/// Pagination parameters.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Maximum number of results.
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Offset for pagination.
    #[serde(default)]
    pub offset: i64,
}

/// Response for listing accounts.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListAccountsResponse {
    pub accounts: Vec<Account>,
    /// Limit used.
    pub limit: i64,
    /// Offset used.
    pub offset: i64,
}

// ==================== Devices ====================

/// Request body for creating or replacing a device.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DeviceRequest {
    pub name: String,
    pub status: String,
    /// Owning account.
    #[serde(default)]
    pub user_id: Option<i32>,
}

/// Query parameters for listing devices.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListDevicesQuery {
    /// Only devices owned by this account.
    #[serde(default)]
    pub user_id: Option<i32>,
    /// Maximum number of results.
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Offset for pagination.
    #[serde(default)]
    pub offset: i64,
}

/// Response for listing devices.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListDevicesResponse {
    pub devices: Vec<Device>,
    pub limit: i64,
    pub offset: i64,
}

// ==================== Health ====================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Database connectivity.
    pub database: String,
    /// Timestamp.
    pub timestamp: String,
}

// ==================== Authentication ====================

/// Login request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Account number.
    pub number: i64,
    /// Account password.
    pub password: String,
}

/// Login response.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// JWT token.
    pub token: String,
    /// The logged-in account.
    pub account: Account,
    /// Token expiration in seconds.
    pub expires_in: i64,
}
