//! In-memory `AccountStore` used by handler and middleware tests.
//!
//! Lookups are counted so tests can assert that a code path never reached storage.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use crate::repos::account_repo::{Account, AccountStore, NewAccount, generate_account_number};
use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    accounts: BTreeMap<i64, Account>,
}

#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    inner: Mutex<Inner>,
    lookups: AtomicUsize,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `get_account_by_id` calls so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Insert an account with a fixed id and number.
    pub fn insert(&self, id: i64, number: i64, first_name: &str, last_name: &str) -> Account {
        let account = Account {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            number,
            balance: 0,
            created_at: Utc::now(),
        };

        let mut inner = self.inner.lock().unwrap();
        inner.next_id = inner.next_id.max(id);
        inner.accounts.insert(id, account.clone());
        account
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create_account(&self, account: NewAccount) -> RepoResult<Account> {
        let mut inner = self.inner.lock().unwrap();

        let mut number = generate_account_number()?;
        while inner.accounts.values().any(|a| a.number == number) {
            number = generate_account_number()?;
        }

        inner.next_id += 1;
        let created = Account {
            id: inner.next_id,
            first_name: account.first_name,
            last_name: account.last_name,
            number,
            balance: 0,
            created_at: Utc::now(),
        };
        inner.accounts.insert(created.id, created.clone());
        Ok(created)
    }

    async fn delete_account(&self, id: i64) -> RepoResult<()> {
        self.inner
            .lock()
            .unwrap()
            .accounts
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound { id })
    }

    async fn update_account(&self, account: &Account) -> RepoResult<Account> {
        let mut inner = self.inner.lock().unwrap();
        let stored = inner
            .accounts
            .get_mut(&account.id)
            .ok_or(RepoError::NotFound { id: account.id })?;

        stored.first_name = account.first_name.clone();
        stored.last_name = account.last_name.clone();
        stored.balance = account.balance;
        Ok(stored.clone())
    }

    async fn get_account_by_id(&self, id: i64) -> RepoResult<Account> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner
            .lock()
            .unwrap()
            .accounts
            .get(&id)
            .cloned()
            .ok_or(RepoError::NotFound { id })
    }

    async fn get_accounts(&self) -> RepoResult<Vec<Account>> {
        Ok(self.inner.lock().unwrap().accounts.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account(first: &str, last: &str) -> NewAccount {
        NewAccount {
            first_name: first.to_string(),
            last_name: last.to_string(),
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_distinct_number() {
        let store = MemoryAccountStore::new();

        let a = store.create_account(new_account("Amier", "Eid")).await.unwrap();
        let b = store.create_account(new_account("Ada", "Lovelace")).await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_ne!(a.number, b.number);
        assert_ne!(a.number, a.id);
        assert_eq!(a.balance, 0);
    }

    #[tokio::test]
    async fn delete_then_lookup_is_not_found() {
        let store = MemoryAccountStore::new();
        let account = store.create_account(new_account("Amier", "Eid")).await.unwrap();

        store.delete_account(account.id).await.unwrap();

        let err = store.get_account_by_id(account.id).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound { id } if id == account.id));

        let err = store.delete_account(account.id).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_keeps_number_and_creation_time() {
        let store = MemoryAccountStore::new();
        let original = store.create_account(new_account("Amier", "Eid")).await.unwrap();

        let mut changed = original.clone();
        changed.last_name = "Eid-Smith".to_string();
        changed.balance = 250;
        changed.number = 1;

        let updated = store.update_account(&changed).await.unwrap();
        assert_eq!(updated.last_name, "Eid-Smith");
        assert_eq!(updated.balance, 250);
        assert_eq!(updated.number, original.number);
        assert_eq!(updated.created_at, original.created_at);
    }

    #[tokio::test]
    async fn list_returns_accounts_in_id_order() {
        let store = MemoryAccountStore::new();
        store.insert(7, 111_111_111, "Grace", "Hopper");
        store.insert(3, 222_222_222, "Alan", "Turing");

        let ids: Vec<i64> = store
            .get_accounts()
            .await
            .unwrap()
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![3, 7]);
    }
}
