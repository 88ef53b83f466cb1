use sqlx::{FromRow, Pool, Sqlite};
use uuid::Uuid;

use crate::db::models::{Author, FeedEntry, Update};
use crate::error::AppError;
use crate::week::WeekStart;

/// Flat row produced by the feed join.
#[derive(Debug, FromRow)]
struct FeedRow {
    id: String,
    user_id: String,
    week_start: WeekStart,
    content: String,
    published_at: Option<i64>,
    created_at: i64,
    updated_at: i64,
    username: String,
    name: String,
    title: Option<String>,
    avatar_url: Option<String>,
}

impl FeedRow {
    fn into_entry(self) -> FeedEntry {
        let user = Author {
            id: self.user_id.clone(),
            username: self.username,
            name: self.name,
            title: self.title,
            avatar_url: self.avatar_url,
        };
        FeedEntry {
            update: Update {
                id: self.id,
                user_id: self.user_id,
                week_start: self.week_start,
                content: self.content,
                published_at: self.published_at,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            user,
        }
    }
}

pub struct UpdateRepository;

impl UpdateRepository {
    /// Insert or overwrite the row for `(user_id, week)` in one statement.
    ///
    /// A `None` publish time never clears an existing one: a draft saved
    /// after publishing keeps the update visible.
    pub async fn upsert(
        pool: &Pool<Sqlite>,
        user_id: &str,
        week: WeekStart,
        content: &str,
        published_at: Option<i64>,
        now: i64,
    ) -> Result<Update, AppError> {
        let id = Uuid::new_v4().to_string();

        let update = sqlx::query_as::<_, Update>(
            r#"
INSERT INTO updates (id, user_id, week_start, content, published_at, created_at, updated_at)
VALUES (?, ?, ?, ?, ?, ?, ?)
ON CONFLICT (user_id, week_start) DO UPDATE SET
    content = excluded.content,
    published_at = COALESCE(excluded.published_at, updates.published_at),
    updated_at = excluded.updated_at
RETURNING *
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(week)
        .bind(content)
        .bind(published_at)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(update)
    }

    /// Drafts included.
    pub async fn get_for_week(
        pool: &Pool<Sqlite>,
        user_id: &str,
        week: WeekStart,
    ) -> Result<Option<Update>, AppError> {
        let update = sqlx::query_as::<_, Update>(
            "SELECT * FROM updates WHERE user_id = ? AND week_start = ?",
        )
        .bind(user_id)
        .bind(week)
        .fetch_optional(pool)
        .await?;

        Ok(update)
    }

    /// Published updates for one week, most recently published first.
    pub async fn feed_for_week(
        pool: &Pool<Sqlite>,
        week: WeekStart,
    ) -> Result<Vec<FeedEntry>, AppError> {
        let rows = sqlx::query_as::<_, FeedRow>(
            r#"
SELECT up.id, up.user_id, up.week_start, up.content, up.published_at,
       up.created_at, up.updated_at,
       u.username, u.name, u.title, u.avatar_url
FROM updates up
JOIN users u ON up.user_id = u.id
WHERE up.week_start = ? AND up.published_at IS NOT NULL
ORDER BY up.published_at DESC, up.updated_at DESC
            "#,
        )
        .bind(week)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(FeedRow::into_entry).collect())
    }

    /// Published updates of one user, newest week first.
    pub async fn history_for_user(
        pool: &Pool<Sqlite>,
        user_id: &str,
    ) -> Result<Vec<Update>, AppError> {
        let updates = sqlx::query_as::<_, Update>(
            r#"
SELECT * FROM updates
WHERE user_id = ? AND published_at IS NOT NULL
ORDER BY week_start DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(updates)
    }
}
