//! User model and database operations.
//!
//! Every user gets a unique, user-facing public handle derived from their
//! username at registration time: lowercased, whitespace removed, prefixed
//! with `@`, and suffixed with a counter when the handle is already taken
//! (`@janedoe`, `@janedoe1`, `@janedoe2`, ...).
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE users (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     email CITEXT NOT NULL UNIQUE,
//!     password_hash VARCHAR(255) NOT NULL,
//!     user_name VARCHAR(255) NOT NULL,
//!     public_name VARCHAR(255) NOT NULL UNIQUE,
//!     profile_image VARCHAR(512),
//!     phone VARCHAR(32),
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User account row.
///
/// Passwords are stored as Argon2id hashes; use [`User::sanitized`] before
/// returning a user over the wire.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user id (UUID v4)
    pub id: Uuid,

    /// Email address (case-insensitive via CITEXT, unique)
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Display username as entered at registration
    pub user_name: String,

    /// Derived unique public handle (e.g. "@janedoe")
    pub public_name: String,

    /// Optional profile image URL
    pub profile_image: Option<String>,

    /// Optional phone number
    pub phone: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Wire-safe view of a user: everything except the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub user_name: String,
    pub public_name: String,
    pub profile_image: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Strips the password hash for response payloads.
    pub fn sanitized(self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email,
            user_name: self.user_name,
            public_name: self.public_name,
            profile_image: self.profile_image,
            phone: self.phone,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,

    /// Argon2id password hash (never a plaintext password)
    pub password_hash: String,

    pub user_name: String,

    /// Already-resolved unique public handle
    pub public_name: String,

    pub profile_image: Option<String>,
}

/// Input for updating an existing user; only `Some` fields are written.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub user_name: Option<String>,
    pub public_name: Option<String>,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
}

/// Derives the base public handle for a username: lowercased, whitespace
/// stripped, `@`-prefixed. Collisions are resolved by
/// [`resolve_public_handle`].
pub fn derive_public_handle(user_name: &str) -> String {
    let stripped: String = user_name
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    format!("@{stripped}")
}

/// Resolves a unique public handle for `user_name`, appending a numeric
/// suffix while the candidate is taken.
pub async fn resolve_public_handle(pool: &PgPool, user_name: &str) -> Result<String, sqlx::Error> {
    let base = derive_public_handle(user_name);
    let mut candidate = base.clone();
    let mut counter = 1u32;

    while User::find_by_public_name(pool, &candidate).await?.is_some() {
        candidate = format!("{base}{counter}");
        counter += 1;
    }

    Ok(candidate)
}

impl User {
    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Fails with a unique-constraint violation if the email or public
    /// handle already exists.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, user_name, public_name, profile_image)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, password_hash, user_name, public_name, profile_image,
                      phone, created_at, updated_at
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.user_name)
        .bind(data.public_name)
        .bind(data.profile_image)
        .fetch_one(pool)
        .await
    }

    /// Finds a user by id.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, user_name, public_name, profile_image,
                   phone, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Finds a user by email (case-insensitive via CITEXT).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, user_name, public_name, profile_image,
                   phone, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// Finds a user by public handle.
    pub async fn find_by_public_name(
        pool: &PgPool,
        public_name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, user_name, public_name, profile_image,
                   phone, created_at, updated_at
            FROM users
            WHERE public_name = $1
            "#,
        )
        .bind(public_name)
        .fetch_optional(pool)
        .await
    }

    /// Checks whether `public_name` is held by any user other than
    /// `exclude_id`.
    pub async fn public_name_taken(
        pool: &PgPool,
        public_name: &str,
        exclude_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let (taken,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users WHERE public_name = $1 AND id <> $2
            )
            "#,
        )
        .bind(public_name)
        .bind(exclude_id)
        .fetch_one(pool)
        .await?;

        Ok(taken)
    }

    /// Lists all users except `exclude_id` (the caller), newest first.
    pub async fn list_except(pool: &PgPool, exclude_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, user_name, public_name, profile_image,
                   phone, created_at, updated_at
            FROM users
            WHERE id <> $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(exclude_id)
        .fetch_all(pool)
        .await
    }

    /// Updates a user; only the `Some` fields of `data` are written and
    /// `updated_at` is always refreshed.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE users SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.user_name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", user_name = ${bind_count}"));
        }
        if data.public_name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", public_name = ${bind_count}"));
        }
        if data.phone.is_some() {
            bind_count += 1;
            query.push_str(&format!(", phone = ${bind_count}"));
        }
        if data.profile_image.is_some() {
            bind_count += 1;
            query.push_str(&format!(", profile_image = ${bind_count}"));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, email, password_hash, user_name, public_name, \
             profile_image, phone, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        if let Some(user_name) = data.user_name {
            q = q.bind(user_name);
        }
        if let Some(public_name) = data.public_name {
            q = q.bind(public_name);
        }
        if let Some(phone) = data.phone {
            q = q.bind(phone);
        }
        if let Some(profile_image) = data.profile_image {
            q = q.bind(profile_image);
        }

        q.fetch_optional(pool).await
    }

    /// Deletes a user by id; returns whether a row was removed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_is_lowercased_stripped_and_prefixed() {
        assert_eq!(derive_public_handle("Jane Doe"), "@janedoe");
        assert_eq!(derive_public_handle("  Ada   Lovelace "), "@adalovelace");
        assert_eq!(derive_public_handle("UPPER"), "@upper");
    }

    #[test]
    fn handle_of_empty_name_is_just_the_prefix() {
        assert_eq!(derive_public_handle(""), "@");
    }

    #[test]
    fn sanitized_drops_the_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "jane@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            user_name: "Jane Doe".to_string(),
            public_name: "@janedoe".to_string(),
            profile_image: None,
            phone: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let public = user.sanitized();
        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["publicName"], "@janedoe");
    }

    // Handle collision resolution against a live database is covered by the
    // ignored integration tests in tests/model_tests.rs.
}
