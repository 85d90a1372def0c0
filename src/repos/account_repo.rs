/*
 * Responsibility
 * - account テーブル向けのストレージ境界 (AccountStore trait)
 * - Postgres 実装 (PgAccountStore): PgPool を受け取り CRUD を提供
 * - 口座番号 (number) の採番はストレージ側の責務
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, postgres::PgPoolOptions};

use crate::repos::error::{RepoError, RepoResult};

// Account numbers are drawn from [100_000_000, 1_000_000_000).
const ACCOUNT_NUMBER_FLOOR: u64 = 100_000_000;
const ACCOUNT_NUMBER_SPAN: u64 = 900_000_000;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Account {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub number: i64,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied part of an account. id, number, balance and created_at
/// are filled in by the store.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create_account(&self, account: NewAccount) -> RepoResult<Account>;

    async fn delete_account(&self, id: i64) -> RepoResult<()>;

    /// Overwrites names and balance of an existing account.
    async fn update_account(&self, account: &Account) -> RepoResult<Account>;

    async fn get_account_by_id(&self, id: i64) -> RepoResult<Account>;

    async fn get_accounts(&self) -> RepoResult<Vec<Account>>;
}

pub fn generate_account_number() -> RepoResult<i64> {
    let mut bytes = [0u8; 8];
    getrandom::fill(&mut bytes).map_err(RepoError::Entropy)?;

    let n = ACCOUNT_NUMBER_FLOOR + u64::from_le_bytes(bytes) % ACCOUNT_NUMBER_SPAN;
    // always < 1e9, fits in i64
    Ok(n as i64)
}

#[derive(Clone, Debug)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> RepoResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create the account table if it does not exist yet.
    pub async fn init(&self) -> RepoResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS account (
                id          BIGSERIAL PRIMARY KEY,
                first_name  VARCHAR(50) NOT NULL,
                last_name   VARCHAR(50) NOT NULL,
                number      BIGINT NOT NULL UNIQUE,
                balance     BIGINT NOT NULL DEFAULT 0,
                created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn create_account(&self, account: NewAccount) -> RepoResult<Account> {
        let number = generate_account_number()?;

        let row = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO account (first_name, last_name, number, balance, created_at)
            VALUES ($1, $2, $3, 0, $4)
            RETURNING id, first_name, last_name, number, balance, created_at
            "#,
        )
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(number)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(id = row.id, number = row.number, "account created");
        Ok(row)
    }

    async fn delete_account(&self, id: i64) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM account
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound { id });
        }
        Ok(())
    }

    async fn update_account(&self, account: &Account) -> RepoResult<Account> {
        sqlx::query_as::<_, Account>(
            r#"
            UPDATE account
            SET
                first_name = $2,
                last_name = $3,
                balance = $4
            WHERE id = $1
            RETURNING id, first_name, last_name, number, balance, created_at
            "#,
        )
        .bind(account.id)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.balance)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepoError::NotFound { id: account.id })
    }

    async fn get_account_by_id(&self, id: i64) -> RepoResult<Account> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, first_name, last_name, number, balance, created_at
            FROM account
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepoError::NotFound { id })
    }

    async fn get_accounts(&self) -> RepoResult<Vec<Account>> {
        let rows = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, first_name, last_name, number, balance, created_at
            FROM account
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_numbers_stay_in_range() {
        for _ in 0..1_000 {
            let n = generate_account_number().unwrap();
            assert!((100_000_000..1_000_000_000).contains(&n), "out of range: {n}");
        }
    }
}
