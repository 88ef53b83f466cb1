#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};

use ekin::clock::FixedClock;
use ekin::db::{self, NewUser, User, UserRepository};

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

/// Single-connection in-memory database with the schema applied. Every
/// pool gets its own empty database.
pub async fn setup(now: DateTime<Utc>) -> (Pool<Sqlite>, Arc<FixedClock>) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    db::MIGRATOR.run(&pool).await.expect("migrations");
    (pool, Arc::new(FixedClock::new(now)))
}

/// Inserts a user directly, skipping password hashing.
pub async fn create_user(pool: &Pool<Sqlite>, username: &str) -> User {
    let email = format!("{}@example.com", username);
    UserRepository::create(
        pool,
        NewUser {
            username,
            email: &email,
            name: username,
            title: Some("engineer"),
            password_hash: &[7u8; 32],
            password_salt: &[9u8; 32],
        },
        0,
    )
    .await
    .expect("create user")
}

pub async fn count_updates(pool: &Pool<Sqlite>, user_id: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM updates WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("count updates")
}
