//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use prime_drip_core::{Email, UserId};

use super::RepositoryError;
use crate::models::{Role, User};

/// Repository for user and role-assignment database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user with a hashed password and a default role, in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_role(
        &self,
        name: &str,
        email: &Email,
        phone: Option<&str>,
        password_hash: &str,
        active: bool,
        role: Role,
    ) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let user_id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO users (name, email, phone, password_hash, active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id
            ",
        )
        .bind(name)
        .bind(email.as_str())
        .bind(phone)
        .bind(password_hash)
        .bind(active)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        sqlx::query(
            "INSERT INTO user_roles (user_id, role_id)
             SELECT ?1, id FROM roles WHERE name = ?2",
        )
        .bind(user_id)
        .bind(role.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(User {
            id: UserId::new(user_id),
            name: name.to_owned(),
            email: email.clone(),
            phone: phone.map(str::to_owned),
            active,
            created_at: now,
        })
    }

    /// Get a user plus their password hash and roles by email.
    ///
    /// Returns `None` if no user with that email exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_auth_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String, Vec<Role>)>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, phone, password_hash, active, created_at
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user = map_user(&row)?;
        let password_hash: String = row.try_get("password_hash")?;
        let roles = self.get_roles(user.id).await?;

        Ok(Some((user, password_hash, roles)))
    }

    /// Get all roles assigned to a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` on an unknown role name.
    pub async fn get_roles(&self, user_id: UserId) -> Result<Vec<Role>, RepositoryError> {
        let names: Vec<String> = sqlx::query_scalar(
            r"
            SELECT r.name
            FROM user_roles ur
            JOIN roles r ON r.id = ur.role_id
            WHERE ur.user_id = ?1
            ORDER BY r.id ASC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        names
            .iter()
            .map(|name| {
                Role::from_str_opt(name).ok_or_else(|| {
                    RepositoryError::DataCorruption(format!("unknown role in database: {name}"))
                })
            })
            .collect()
    }
}

fn map_user(row: &sqlx::sqlite::SqliteRow) -> Result<User, RepositoryError> {
    let email_raw: String = row.try_get("email")?;
    let email = Email::parse(&email_raw)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid email in database: {e}")))?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email,
        phone: row.try_get("phone")?,
        active: row.try_get("active")?,
        created_at,
    })
}
