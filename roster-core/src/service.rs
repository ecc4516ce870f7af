//! User lifecycle service.
//!
//! The one place where lifecycle rules live: users are created inactive,
//! profile updates are only permitted while a user is active, and
//! activate/deactivate re-persist the flag unconditionally, so repeating a
//! transition succeeds silently.

use std::{fmt, sync::Arc};

use tracing::{info, warn};

use crate::error::{Result, UserError};
use crate::store::UserStore;
use crate::user::{CreateUserRequest, UpdateUserRequest, User, UserDto};

/// Orchestrates lookups and state transitions over a [`UserStore`].
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl fmt::Debug for UserService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserService").finish_non_exhaustive()
    }
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// All users, in presentation shape.
    pub async fn list(&self) -> Result<Vec<UserDto>> {
        let users = self.store.find_all().await?;
        Ok(users.iter().map(UserDto::from).collect())
    }

    pub async fn get_by_mail(&self, mail: &str) -> Result<UserDto> {
        let user = self.find_by_mail(mail).await?;
        Ok(UserDto::from(&user))
    }

    /// Creates a user from the request fields.
    ///
    /// New users always start inactive, whatever the caller sent; no
    /// duplicate-mail check is performed.
    pub async fn create(&self, request: CreateUserRequest) -> Result<UserDto> {
        let user = User {
            id: None,
            mail: request.mail,
            first_name: request.first_name,
            last_name: request.last_name,
            middle_name: request.middle_name,
            active: false,
        };

        let saved = self.store.save(user).await?;
        info!(mail = %saved.mail, "user created");
        Ok(UserDto::from(&saved))
    }

    /// Overwrites the name fields of the user with the given mail.
    ///
    /// Rejected with [`UserError::NotActive`] while the user is
    /// deactivated; nothing reaches the store past the lookup in that
    /// case. The mail itself is never overwritten.
    pub async fn update(&self, mail: &str, request: UpdateUserRequest) -> Result<UserDto> {
        let mut user = self.find_by_mail(mail).await?;
        if !user.active {
            warn!(mail = %mail, "rejected update for inactive user");
            return Err(UserError::NotActive(mail.to_string()));
        }

        user.first_name = request.first_name;
        user.last_name = request.last_name;
        user.middle_name = request.middle_name;

        let saved = self.store.save(user).await?;
        Ok(UserDto::from(&saved))
    }

    pub async fn deactivate(&self, id: i64) -> Result<()> {
        let mut user = self.find_by_id(id).await?;
        user.active = false;
        self.store.save(user).await?;
        Ok(())
    }

    pub async fn activate(&self, id: i64) -> Result<()> {
        let mut user = self.find_by_id(id).await?;
        user.active = true;
        self.store.save(user).await?;
        Ok(())
    }

    /// Deletes the user with the given id.
    ///
    /// Existence is checked first; the looked-up record itself is
    /// discarded.
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.find_by_id(id).await?;
        self.store.delete_by_id(id).await?;
        info!(id, "user deleted");
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<User> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFoundById(id))
    }

    async fn find_by_mail(&self, mail: &str) -> Result<User> {
        self.store
            .find_by_mail(mail)
            .await?
            .ok_or_else(|| UserError::NotFoundByMail(mail.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::store::MemoryUserStore;

    /// Wraps the in-memory store and counts writes, so tests can assert
    /// that rejected operations never reach the store.
    struct RecordingStore {
        inner: MemoryUserStore,
        saves: AtomicUsize,
        deletes: AtomicUsize,
    }

    impl RecordingStore {
        fn new() -> Self {
            Self {
                inner: MemoryUserStore::new(),
                saves: AtomicUsize::new(0),
                deletes: AtomicUsize::new(0),
            }
        }

        fn save_count(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }

        fn delete_count(&self) -> usize {
            self.deletes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UserStore for RecordingStore {
        async fn find_all(&self) -> Result<Vec<User>> {
            self.inner.find_all().await
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_mail(&self, mail: &str) -> Result<Option<User>> {
            self.inner.find_by_mail(mail).await
        }

        async fn save(&self, user: User) -> Result<User> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save(user).await
        }

        async fn delete_by_id(&self, id: i64) -> Result<()> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.inner.delete_by_id(id).await
        }
    }

    fn service_with_store() -> (UserService, Arc<RecordingStore>) {
        let store = Arc::new(RecordingStore::new());
        (UserService::new(store.clone()), store)
    }

    fn create_request(mail: &str) -> CreateUserRequest {
        CreateUserRequest {
            mail: mail.to_string(),
            first_name: "First".to_string(),
            last_name: "Last".to_string(),
            middle_name: String::new(),
        }
    }

    fn update_request() -> UpdateUserRequest {
        UpdateUserRequest {
            first_name: "Changed".to_string(),
            last_name: "Name".to_string(),
            middle_name: "Middle".to_string(),
        }
    }

    /// Creates a user through the service and returns its store-assigned
    /// id.
    async fn create_user(service: &UserService, store: &RecordingStore, mail: &str) -> i64 {
        service.create(create_request(mail)).await.unwrap();
        store
            .inner
            .find_by_mail(mail)
            .await
            .unwrap()
            .unwrap()
            .id
            .unwrap()
    }

    #[tokio::test]
    async fn list_returns_all_users_in_presentation_shape() {
        let (service, _store) = service_with_store();
        service.create(create_request("a@example.com")).await.unwrap();
        service.create(create_request("b@example.com")).await.unwrap();

        let users = service.list().await.unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].mail, "a@example.com");
        assert_eq!(users[1].mail, "b@example.com");
    }

    #[tokio::test]
    async fn get_by_mail_returns_known_user() {
        let (service, _store) = service_with_store();
        service.create(create_request("a@example.com")).await.unwrap();

        let dto = service.get_by_mail("a@example.com").await.unwrap();

        assert_eq!(dto.mail, "a@example.com");
        assert_eq!(dto.first_name, "First");
    }

    #[tokio::test]
    async fn get_by_mail_fails_for_unknown_mail() {
        let (service, _store) = service_with_store();

        let err = service.get_by_mail("missing@example.com").await.unwrap_err();

        assert!(matches!(err, UserError::NotFoundByMail(mail) if mail == "missing@example.com"));
    }

    #[tokio::test]
    async fn create_forces_inactive_and_returns_presentation_shape() {
        let (service, store) = service_with_store();

        let dto = service.create(create_request("a@example.com")).await.unwrap();

        assert_eq!(
            dto,
            UserDto {
                mail: "a@example.com".to_string(),
                first_name: "First".to_string(),
                last_name: "Last".to_string(),
                middle_name: String::new(),
            }
        );
        let stored = store
            .inner
            .find_by_mail("a@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(!stored.active);
        assert!(stored.id.is_some());
    }

    #[tokio::test]
    async fn update_overwrites_names_for_active_user() {
        let (service, store) = service_with_store();
        let id = create_user(&service, &store, "a@example.com").await;
        service.activate(id).await.unwrap();

        let dto = service
            .update("a@example.com", update_request())
            .await
            .unwrap();

        assert_eq!(dto.mail, "a@example.com");
        assert_eq!(dto.first_name, "Changed");
        assert_eq!(dto.last_name, "Name");
        assert_eq!(dto.middle_name, "Middle");

        let stored = store.inner.find_by_id(id).await.unwrap().unwrap();
        assert!(stored.active, "active flag must survive an update");
        assert_eq!(stored.mail, "a@example.com");
    }

    #[tokio::test]
    async fn update_fails_for_unknown_mail_without_touching_the_store() {
        let (service, store) = service_with_store();

        let err = service
            .update("missing@example.com", update_request())
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::NotFoundByMail(_)));
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn update_is_rejected_while_user_is_inactive() {
        let (service, store) = service_with_store();
        create_user(&service, &store, "a@example.com").await;
        let saves_after_create = store.save_count();

        let err = service
            .update("a@example.com", update_request())
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::NotActive(mail) if mail == "a@example.com"));
        assert_eq!(
            store.save_count(),
            saves_after_create,
            "a rejected update must not write to the store"
        );
    }

    #[tokio::test]
    async fn activate_then_deactivate_leaves_user_inactive() {
        let (service, store) = service_with_store();
        let id = create_user(&service, &store, "a@example.com").await;

        service.activate(id).await.unwrap();
        service.deactivate(id).await.unwrap();

        let stored = store.inner.find_by_id(id).await.unwrap().unwrap();
        assert!(!stored.active);
    }

    #[tokio::test]
    async fn repeated_activation_succeeds_silently() {
        let (service, store) = service_with_store();
        let id = create_user(&service, &store, "a@example.com").await;

        service.activate(id).await.unwrap();
        service.activate(id).await.unwrap();

        let stored = store.inner.find_by_id(id).await.unwrap().unwrap();
        assert!(stored.active);
    }

    #[tokio::test]
    async fn activate_fails_for_unknown_id() {
        let (service, store) = service_with_store();

        let err = service.activate(99).await.unwrap_err();

        assert!(matches!(err, UserError::NotFoundById(99)));
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn deactivate_fails_for_unknown_id() {
        let (service, store) = service_with_store();

        let err = service.deactivate(99).await.unwrap_err();

        assert!(matches!(err, UserError::NotFoundById(99)));
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn delete_removes_the_user() {
        let (service, store) = service_with_store();
        let id = create_user(&service, &store, "a@example.com").await;

        service.delete(id).await.unwrap();

        assert!(store.inner.find_by_id(id).await.unwrap().is_none());
        assert_eq!(store.delete_count(), 1);
    }

    #[tokio::test]
    async fn delete_of_unknown_id_issues_no_delete_to_the_store() {
        let (service, store) = service_with_store();

        let err = service.delete(99).await.unwrap_err();

        assert!(matches!(err, UserError::NotFoundById(99)));
        assert_eq!(store.delete_count(), 0);
    }

    #[tokio::test]
    async fn freshly_created_user_cannot_be_updated_until_activated() {
        let (service, store) = service_with_store();
        let dto = service
            .create(CreateUserRequest {
                mail: "a@x.com".to_string(),
                first_name: "A".to_string(),
                last_name: "B".to_string(),
                middle_name: String::new(),
            })
            .await
            .unwrap();

        assert_eq!(dto.mail, "a@x.com");
        assert_eq!(dto.first_name, "A");
        assert_eq!(dto.last_name, "B");
        assert_eq!(dto.middle_name, "");

        let err = service.update("a@x.com", update_request()).await.unwrap_err();
        assert!(matches!(err, UserError::NotActive(_)));

        let id = store
            .inner
            .find_by_mail("a@x.com")
            .await
            .unwrap()
            .unwrap()
            .id
            .unwrap();
        service.activate(id).await.unwrap();
        service.update("a@x.com", update_request()).await.unwrap();
    }
}
