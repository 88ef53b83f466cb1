use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::week::WeekStart;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub name: String,
    pub title: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Vec<u8>,
    #[serde(skip_serializing)]
    pub password_salt: Vec<u8>,
    pub created_at: i64,
}

/// Fields anyone may see on a profile.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PublicUser {
    pub id: String,
    pub username: String,
    pub name: String,
    pub title: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: i64,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            title: user.title,
            avatar_url: user.avatar_url,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub token: String,
    pub expires_at: i64,
    pub created_at: i64,
}

/// One user's update for one week. `published_at` is `None` while the
/// update is still a draft.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq, Eq)]
pub struct Update {
    pub id: String,
    pub user_id: String,
    pub week_start: WeekStart,
    pub content: String,
    pub published_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Update {
    pub fn is_published(&self) -> bool {
        self.published_at.is_some()
    }
}

/// Author fields attached to feed entries.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Author {
    pub id: String,
    pub username: String,
    pub name: String,
    pub title: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FeedEntry {
    #[serde(flatten)]
    pub update: Update,
    pub user: Author,
}
