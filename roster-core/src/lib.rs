//! # Roster Core
//!
//! Core library for the Roster user directory service: the user record,
//! the lifecycle rules around it, and the store abstractions it persists
//! through.
//!
//! ## Overview
//!
//! Users are keyed two ways: by mail for reads and profile updates, and by
//! their store-assigned identifier for activation, deactivation, and
//! deletion. The only stateful rule in the system is the active flag -
//! users are created inactive, and profile updates are rejected until they
//! are activated.
//!
//! ## Architecture
//!
//! - [`user`]: the `User` record, request payloads, and the presentation
//!   shape exposed over the wire
//! - [`service`]: the lifecycle service enforcing the active/inactive rules
//! - [`store`]: the `UserStore` port with PostgreSQL and in-memory
//!   implementations
//! - [`error`]: the error taxonomy shared by all of the above
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use roster_core::{CreateUserRequest, MemoryUserStore, UserService};
//!
//! # async fn example() -> roster_core::Result<()> {
//! let service = UserService::new(Arc::new(MemoryUserStore::new()));
//!
//! let created = service
//!     .create(CreateUserRequest {
//!         mail: "alice@example.com".to_string(),
//!         first_name: "Alice".to_string(),
//!         last_name: "Archer".to_string(),
//!         middle_name: String::new(),
//!     })
//!     .await?;
//!
//! assert_eq!(created.mail, "alice@example.com");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod service;
pub mod store;
pub mod user;

pub use error::{Result, UserError};
pub use service::UserService;
pub use store::{MemoryUserStore, PostgresUserStore, UserStore};
pub use user::{CreateUserRequest, UpdateUserRequest, User, UserDto};

/// Embedded database migrations, applied by the server on boot.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
