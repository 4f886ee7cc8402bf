//! Account domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::validate;
use crate::error::AppResult;

/// A persisted account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Account {
    /// Primary key.
    pub id: i32,
    /// Holder's first name.
    pub first_name: String,
    /// Holder's last name.
    pub last_name: String,
    /// Account number, assigned by the store.
    pub number: i64,
    /// Current balance, two decimal places.
    pub balance: Decimal,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Validated input for inserting an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub balance: Decimal,
    /// bcrypt hash; `None` for accounts that cannot log in.
    pub password_hash: Option<String>,
}

impl NewAccount {
    /// Validate and normalize the fields of a new account.
    pub fn new(
        first_name: &str,
        last_name: &str,
        balance: Decimal,
        password_hash: Option<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            first_name: validate::required_text("first_name", first_name)?,
            last_name: validate::required_text("last_name", last_name)?,
            balance: validate::balance(balance)?,
            password_hash,
        })
    }
}

/// Validated replacement values for an existing account.
#[derive(Debug, Clone)]
pub struct AccountUpdate {
    pub first_name: String,
    pub last_name: String,
    pub balance: Decimal,
}

impl AccountUpdate {
    pub fn new(first_name: &str, last_name: &str, balance: Decimal) -> AppResult<Self> {
        Ok(Self {
            first_name: validate::required_text("first_name", first_name)?,
            last_name: validate::required_text("last_name", last_name)?,
            balance: validate::balance(balance)?,
        })
    }
}

/// An account together with its stored password hash, for login.
#[derive(Debug, Clone)]
pub struct AccountCredentials {
    pub account: Account,
    pub password_hash: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_new_account_normalizes() {
        let account = NewAccount::new(" Ada ", "Lovelace", Decimal::new(12_345, 3), None).unwrap();
        assert_eq!(account.first_name, "Ada");
        assert_eq!(account.balance, Decimal::new(1_234, 2));
        assert!(account.password_hash.is_none());
    }

    #[test]
    fn test_new_account_rejects_invalid_fields() {
        assert!(matches!(
            NewAccount::new("", "Lovelace", Decimal::ZERO, None),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            AccountUpdate::new("Ada", "Lovelace", Decimal::new(-500, 2)),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_account_serializes_balance_as_number() {
        let account = Account {
            id: 1,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            number: 100,
            balance: Decimal::new(100_050, 2),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["balance"], serde_json::json!(1000.5));
        assert_eq!(json["number"], 100);
        assert!(json.get("password_hash").is_none());
    }
}
