use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::db::models::User;
use crate::error::AppError;

/// Everything needed to insert a user row.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub name: &'a str,
    pub title: Option<&'a str>,
    pub password_hash: &'a [u8; 32],
    pub password_salt: &'a [u8; 32],
}

pub struct UserRepository;

impl UserRepository {
    pub async fn create(
        pool: &Pool<Sqlite>,
        new_user: NewUser<'_>,
        created_at: i64,
    ) -> Result<User, AppError> {
        let id = Uuid::new_v4().to_string();

        let result = sqlx::query_as::<_, User>(
            r#"
INSERT INTO users (id, username, email, name, title, password_hash, password_salt, created_at)
VALUES (?, ?, ?, ?, ?, ?, ?, ?)
RETURNING *
            "#,
        )
        .bind(&id)
        .bind(new_user.username)
        .bind(new_user.email)
        .bind(new_user.name)
        .bind(new_user.title)
        .bind(new_user.password_hash.as_slice())
        .bind(new_user.password_salt.as_slice())
        .bind(created_at)
        .fetch_one(pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            // Lost a race with a concurrent signup for the same name or email
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Conflict(
                "username or email already exists".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn exists(
        pool: &Pool<Sqlite>,
        username: &str,
        email: &str,
    ) -> Result<bool, AppError> {
        let found: Option<(String,)> =
            sqlx::query_as("SELECT id FROM users WHERE username = ? OR email = ? LIMIT 1")
                .bind(username)
                .bind(email)
                .fetch_optional(pool)
                .await?;

        Ok(found.is_some())
    }

    pub async fn get_by_username(
        pool: &Pool<Sqlite>,
        username: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    pub async fn get_by_email(
        pool: &Pool<Sqlite>,
        email: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    pub async fn get_by_id(pool: &Pool<Sqlite>, id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }
}
