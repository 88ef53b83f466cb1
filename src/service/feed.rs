use serde::Serialize;
use sqlx::{Pool, Sqlite};
use tracing::{debug, instrument};

use crate::db::{FeedEntry, PublicUser, Update, UpdateRepository, UserRepository};
use crate::error::AppError;
use crate::week::WeekStart;

/// A public profile with its published history.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub user: PublicUser,
    pub updates: Vec<Update>,
}

/// Read side: published updates only, never drafts.
#[derive(Clone)]
pub struct FeedQuery {
    db: Pool<Sqlite>,
}

impl FeedQuery {
    pub fn new(db: Pool<Sqlite>) -> Self {
        Self { db }
    }

    #[instrument(name = "feed.for_week", skip(self), fields(week = %week))]
    pub async fn feed_for_week(&self, week: WeekStart) -> Result<Vec<FeedEntry>, AppError> {
        let entries = UpdateRepository::feed_for_week(&self.db, week).await?;
        debug!(count = entries.len(), "loaded week feed");
        Ok(entries)
    }

    #[instrument(name = "feed.history_for_user", skip(self))]
    pub async fn history_for_user(&self, user_id: &str) -> Result<Vec<Update>, AppError> {
        UpdateRepository::history_for_user(&self.db, user_id).await
    }

    /// `None` when no user has that username.
    #[instrument(name = "feed.profile", skip(self))]
    pub async fn profile(&self, username: &str) -> Result<Option<Profile>, AppError> {
        let Some(user) = UserRepository::get_by_username(&self.db, username).await? else {
            return Ok(None);
        };

        let updates = self.history_for_user(&user.id).await?;
        Ok(Some(Profile {
            user: user.into(),
            updates,
        }))
    }
}
