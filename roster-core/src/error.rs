use thiserror::Error;

/// Failure taxonomy for user lookups and lifecycle transitions.
///
/// `NotFound` conditions name the key that missed so boundary layers can
/// surface a useful message without re-deriving it.
#[derive(Error, Debug)]
pub enum UserError {
    #[error("user could not be found by id: {0}")]
    NotFoundById(i64),

    #[error("user could not be found by mail: {0}")]
    NotFoundByMail(String),

    #[error("user with mail {0} is not active")]
    NotActive(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, UserError>;
