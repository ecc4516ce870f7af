//! PostgreSQL-backed implementation of the [`UserStore`] port.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::error::{Result, UserError};
use crate::store::UserStore;
use crate::user::User;

#[derive(Debug, Clone, sqlx::FromRow)]
struct UserRow {
    id: i64,
    mail: String,
    first_name: String,
    last_name: String,
    middle_name: String,
    active: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: Some(row.id),
            mail: row.mail,
            first_name: row.first_name,
            last_name: row.last_name,
            middle_name: row.middle_name,
            active: row.active,
        }
    }
}

/// PostgreSQL-backed [`UserStore`].
///
/// Identifiers come from the `users` table's BIGSERIAL column, assigned at
/// insert time. The mail column carries a non-unique index only.
#[derive(Clone, Debug)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find_all(&self) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, mail, first_name, last_name, middle_name, active
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, mail, first_name, last_name, middle_name, active
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_mail(&self, mail: &str) -> Result<Option<User>> {
        // Mail is not unique; duplicates resolve to the lowest id.
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, mail, first_name, last_name, middle_name, active
            FROM users
            WHERE mail = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(mail)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(User::from))
    }

    async fn save(&self, user: User) -> Result<User> {
        match user.id {
            None => {
                let row = sqlx::query_as::<_, UserRow>(
                    r#"
                    INSERT INTO users (mail, first_name, last_name, middle_name, active)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING id, mail, first_name, last_name, middle_name, active
                    "#,
                )
                .bind(&user.mail)
                .bind(&user.first_name)
                .bind(&user.last_name)
                .bind(&user.middle_name)
                .bind(user.active)
                .fetch_one(self.pool())
                .await?;

                info!("created user {} ({})", row.mail, row.id);
                Ok(User::from(row))
            }
            Some(id) => {
                let row = sqlx::query_as::<_, UserRow>(
                    r#"
                    UPDATE users
                    SET mail = $2, first_name = $3, last_name = $4,
                        middle_name = $5, active = $6, updated_at = now()
                    WHERE id = $1
                    RETURNING id, mail, first_name, last_name, middle_name, active
                    "#,
                )
                .bind(id)
                .bind(&user.mail)
                .bind(&user.first_name)
                .bind(&user.last_name)
                .bind(&user.middle_name)
                .bind(user.active)
                .fetch_optional(self.pool())
                .await?
                .ok_or(UserError::NotFoundById(id))?;

                info!("updated user {} ({})", row.mail, row.id);
                Ok(User::from(row))
            }
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFoundById(id));
        }

        info!("deleted user {}", id);
        Ok(())
    }
}
