//! User records and their externally visible presentation shape.

use serde::{Deserialize, Serialize};

/// A user record as held by the store.
///
/// The identifier is assigned by the store on first save and never changes
/// afterwards; a freshly built record carries `None`. Mail is treated as a
/// secondary natural key by convention only - nothing in this layer
/// enforces its uniqueness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Store-assigned identifier, `None` until the record is first saved.
    pub id: Option<i64>,
    /// Mail address, the external lookup key for reads and updates.
    pub mail: String,
    pub first_name: String,
    pub last_name: String,
    /// May be the empty string.
    pub middle_name: String,
    /// Gates profile updates; forced to `false` on creation.
    pub active: bool,
}

/// Payload for creating a user.
///
/// Unknown fields are ignored on deserialization, so an `active`-like field
/// in the request body has no effect - new users always start inactive.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub mail: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub middle_name: String,
}

/// Payload for overwriting a user's name fields. Mail is not updatable.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub middle_name: String,
}

/// Externally exposed subset of a user's fields.
///
/// The identifier and active flag are deliberately absent from this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub mail: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: String,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            mail: user.mail.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            middle_name: user.middle_name.clone(),
        }
    }
}
