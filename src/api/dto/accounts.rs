/*
 * Responsibility
 * - Accounts の request/response DTO (JSON は camelCase)
 * - validation (形式チェック) 用の validate()
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::account_repo::Account;

// matches VARCHAR(50) on the account table
const NAME_MAX_CHARS: usize = 50;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub first_name: String,
    pub last_name: String,
}

impl CreateAccountRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.first_name.trim().is_empty() {
            return Err("firstName is required");
        }
        if self.last_name.trim().is_empty() {
            return Err("lastName is required");
        }
        if self.first_name.chars().count() > NAME_MAX_CHARS {
            return Err("firstName must be <= 50 chars");
        }
        if self.last_name.chars().count() > NAME_MAX_CHARS {
            return Err("lastName must be <= 50 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub number: i64,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            first_name: a.first_name,
            last_name: a.last_name,
            number: a.number,
            balance: a.balance,
            created_at: a.created_at,
        }
    }
}
