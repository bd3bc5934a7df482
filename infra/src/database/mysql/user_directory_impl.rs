//! MySQL implementation of the UserDirectory trait.
//!
//! Roles are stored as a comma-separated list of their kebab-case names.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use std::collections::BTreeSet;
use uuid::Uuid;

use ag_core::domain::entities::user::{Role, User};
use ag_core::errors::{AuthError, DomainError};
use ag_core::repositories::UserDirectory;

use super::{is_unique_violation, map_store_error};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id CHAR(36) NOT NULL PRIMARY KEY,
        username VARCHAR(50) NOT NULL,
        email VARCHAR(320) NOT NULL,
        password_hash VARCHAR(255) NOT NULL,
        roles VARCHAR(255) NOT NULL,
        active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at DATETIME NOT NULL,
        updated_at DATETIME NOT NULL,
        last_active DATETIME NULL,
        UNIQUE KEY uq_users_email (email),
        UNIQUE KEY uq_users_username (username)
    )
"#;

const SELECT_COLUMNS: &str = r#"
    SELECT id, username, email, password_hash, roles, active,
           created_at, updated_at, last_active
    FROM users
"#;

/// MySQL implementation of UserDirectory
pub struct MySqlUserDirectory {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserDirectory {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Create the `users` table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| map_store_error("create users", e))?;
        Ok(())
    }

    /// Convert database row to User entity
    fn row_to_user(row: &MySqlRow) -> Result<User, DomainError> {
        let id: String = column(row, "id")?;
        let roles: String = column(row, "roles")?;

        Ok(User {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid user UUID: {}", e),
            })?,
            username: column(row, "username")?,
            email: column(row, "email")?,
            password_hash: column(row, "password_hash")?,
            roles: decode_roles(&roles)?,
            active: column(row, "active")?,
            created_at: column::<DateTime<Utc>>(row, "created_at")?,
            updated_at: column::<DateTime<Utc>>(row, "updated_at")?,
            last_active: column(row, "last_active")?,
        })
    }

    async fn exists_where(&self, column_name: &str, value: &str) -> Result<bool, DomainError> {
        let query = format!("SELECT 1 FROM users WHERE {} = ? LIMIT 1", column_name);
        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_store_error("user lookup", e))?;
        Ok(row.is_some())
    }

    async fn id_exists(&self, id: Uuid) -> Result<bool, DomainError> {
        self.exists_where("id", &id.to_string()).await
    }

    fn duplicate_error(error: &sqlx::Error, user: &User) -> DomainError {
        let on_email = match error {
            sqlx::Error::Database(db) => db.message().contains("uq_users_email"),
            _ => false,
        };

        if on_email {
            AuthError::DuplicateEmail {
                email: user.email.clone(),
            }
            .into()
        } else {
            AuthError::DuplicateUsername {
                username: user.username.clone(),
            }
            .into()
        }
    }
}

fn column<T>(row: &MySqlRow, name: &str) -> Result<T, DomainError>
where
    T: for<'r> sqlx::Decode<'r, sqlx::MySql> + sqlx::Type<sqlx::MySql>,
{
    row.try_get(name).map_err(|e| DomainError::Internal {
        message: format!("Failed to get {}: {}", name, e),
    })
}

fn encode_roles(roles: &BTreeSet<Role>) -> String {
    roles.iter().map(Role::as_str).collect::<Vec<_>>().join(",")
}

fn decode_roles(raw: &str) -> Result<BTreeSet<Role>, DomainError> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            name.parse::<Role>()
                .map_err(|message| DomainError::Internal { message })
        })
        .collect()
}

#[async_trait]
impl UserDirectory for MySqlUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let query = format!("{} WHERE email = ? LIMIT 1", SELECT_COLUMNS);

        let result = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_store_error("find user by email", e))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        self.exists_where("email", email).await
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError> {
        self.exists_where("username", username).await
    }

    async fn save(&self, user: User) -> Result<User, DomainError> {
        let roles = encode_roles(&user.roles);

        let result = if self.id_exists(user.id).await? {
            let query = r#"
                UPDATE users SET
                    username = ?,
                    email = ?,
                    password_hash = ?,
                    roles = ?,
                    active = ?,
                    updated_at = ?,
                    last_active = ?
                WHERE id = ?
            "#;

            sqlx::query(query)
                .bind(&user.username)
                .bind(&user.email)
                .bind(&user.password_hash)
                .bind(&roles)
                .bind(user.active)
                .bind(user.updated_at)
                .bind(user.last_active)
                .bind(user.id.to_string())
                .execute(&self.pool)
                .await
        } else {
            let query = r#"
                INSERT INTO users (
                    id, username, email, password_hash, roles, active,
                    created_at, updated_at, last_active
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#;

            sqlx::query(query)
                .bind(user.id.to_string())
                .bind(&user.username)
                .bind(&user.email)
                .bind(&user.password_hash)
                .bind(&roles)
                .bind(user.active)
                .bind(user.created_at)
                .bind(user.updated_at)
                .bind(user.last_active)
                .execute(&self.pool)
                .await
        };

        match result {
            Ok(_) => Ok(user),
            Err(e) if is_unique_violation(&e) => Err(Self::duplicate_error(&e, &user)),
            Err(e) => Err(map_store_error("save user", e).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_column_round_trip() {
        let roles = BTreeSet::from([Role::ContentManager, Role::Administrator]);
        let encoded = encode_roles(&roles);
        assert_eq!(encoded, "administrator,content-manager");
        assert_eq!(decode_roles(&encoded).unwrap(), roles);
    }

    #[test]
    fn test_decode_roles_rejects_unknown_names() {
        assert!(decode_roles("editor, superuser").is_err());
        assert!(decode_roles("").unwrap().is_empty());
    }
}
