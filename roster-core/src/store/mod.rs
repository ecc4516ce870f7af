//! Store port for user records, plus the bundled implementations.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::Result;
use crate::user::User;

pub use memory::MemoryUserStore;
pub use postgres::PostgresUserStore;

/// Persistence port for user records.
///
/// `save` is an upsert keyed on the identifier: a record without one is
/// inserted and comes back carrying the store-assigned id, a record with
/// one replaces the row it names. Lookups that miss return `Ok(None)`;
/// only writes against vanished rows are errors.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<User>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Mail is not unique in the store; when duplicates exist, the record
    /// with the lowest id wins.
    async fn find_by_mail(&self, mail: &str) -> Result<Option<User>>;

    async fn save(&self, user: User) -> Result<User>;

    async fn delete_by_id(&self, id: i64) -> Result<()>;
}
