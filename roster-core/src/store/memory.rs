//! In-memory implementation of the [`UserStore`] port.
//!
//! Backs the test suites and local development runs. Observable behavior
//! matches the PostgreSQL store, including store-assigned sequential
//! identifiers and lowest-id-wins mail lookups.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Result, UserError};
use crate::store::UserStore;
use crate::user::User;

#[derive(Debug, Default)]
struct Inner {
    users: BTreeMap<i64, User>,
    next_id: i64,
}

/// In-memory [`UserStore`] keyed by store-assigned sequential identifiers.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    inner: RwLock<Inner>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_all(&self) -> Result<Vec<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn find_by_mail(&self, mail: &str) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        // BTreeMap iterates in id order, so duplicates resolve to the
        // lowest id, same as the relational store.
        Ok(inner.users.values().find(|user| user.mail == mail).cloned())
    }

    async fn save(&self, user: User) -> Result<User> {
        let mut inner = self.inner.write().await;
        match user.id {
            None => {
                inner.next_id += 1;
                let id = inner.next_id;
                let stored = User {
                    id: Some(id),
                    ..user
                };
                inner.users.insert(id, stored.clone());
                Ok(stored)
            }
            Some(id) => {
                if !inner.users.contains_key(&id) {
                    return Err(UserError::NotFoundById(id));
                }
                inner.users.insert(id, user.clone());
                Ok(user)
            }
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.users.remove(&id).is_none() {
            return Err(UserError::NotFoundById(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(mail: &str) -> User {
        User {
            id: None,
            mail: mail.to_string(),
            first_name: "First".to_string(),
            last_name: "Last".to_string(),
            middle_name: String::new(),
            active: false,
        }
    }

    #[tokio::test]
    async fn save_assigns_sequential_ids_on_insert() {
        let store = MemoryUserStore::new();

        let first = store.save(user("a@example.com")).await.unwrap();
        let second = store.save(user("b@example.com")).await.unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
    }

    #[tokio::test]
    async fn save_with_id_replaces_the_named_row() {
        let store = MemoryUserStore::new();
        let saved = store.save(user("a@example.com")).await.unwrap();

        let updated = store
            .save(User {
                first_name: "Changed".to_string(),
                ..saved.clone()
            })
            .await
            .unwrap();

        assert_eq!(updated.id, saved.id);
        let fetched = store.find_by_id(saved.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(fetched.first_name, "Changed");
    }

    #[tokio::test]
    async fn save_with_unknown_id_fails() {
        let store = MemoryUserStore::new();
        let mut record = user("a@example.com");
        record.id = Some(42);

        let err = store.save(record).await.unwrap_err();
        assert!(matches!(err, UserError::NotFoundById(42)));
    }

    #[tokio::test]
    async fn duplicate_mail_resolves_to_lowest_id() {
        let store = MemoryUserStore::new();
        store.save(user("dup@example.com")).await.unwrap();
        let mut second = user("dup@example.com");
        second.first_name = "Second".to_string();
        store.save(second).await.unwrap();

        let found = store.find_by_mail("dup@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, Some(1));
        assert_eq!(found.first_name, "First");
    }

    #[tokio::test]
    async fn delete_of_unknown_id_fails() {
        let store = MemoryUserStore::new();
        let err = store.delete_by_id(9).await.unwrap_err();
        assert!(matches!(err, UserError::NotFoundById(9)));
    }
}
