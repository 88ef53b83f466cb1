use std::sync::Arc;

use sqlx::{Pool, Sqlite};
use tracing::{debug, info, instrument};

use crate::clock::Clock;
use crate::db::{Update, UpdateRepository};
use crate::error::AppError;
use crate::week::{can_edit, week_start, WeekStart};

/// Longest update, in characters, after trimming.
pub const MAX_CONTENT_CHARS: usize = 280;

/// Trim `content` and check it is non-empty and within the length limit.
pub fn validate_content(content: &str) -> Result<&str, AppError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("content is required".to_string()));
    }
    if trimmed.chars().count() > MAX_CONTENT_CHARS {
        return Err(AppError::Validation(format!(
            "content must be {} characters or less",
            MAX_CONTENT_CHARS
        )));
    }
    Ok(trimmed)
}

/// Join several short items into one update body, one item per line.
/// Blank items are dropped; the length limit applies to the joined text.
pub fn compose<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .filter_map(|item| {
            let item = item.as_ref().trim();
            (!item.is_empty()).then(|| item.to_string())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writes and reads a user's own weekly update.
///
/// Writes always land in the current week; reads may look at any week.
#[derive(Clone)]
pub struct UpdateService {
    db: Pool<Sqlite>,
    clock: Arc<dyn Clock>,
}

impl UpdateService {
    pub fn new(db: Pool<Sqlite>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    pub fn current_week(&self) -> WeekStart {
        week_start(self.clock.today())
    }

    pub fn is_editable(&self, week: WeekStart) -> bool {
        can_edit(week, self.clock.today())
    }

    #[instrument(name = "updates.get_for_week", skip(self), fields(week = %week))]
    pub async fn get_for_week(
        &self,
        user_id: &str,
        week: WeekStart,
    ) -> Result<Option<Update>, AppError> {
        let update = UpdateRepository::get_for_week(&self.db, user_id, week).await?;
        debug!(found = update.is_some(), "looked up own update");
        Ok(update)
    }

    #[instrument(name = "updates.save", skip(self, content))]
    pub async fn save_draft_or_publish(
        &self,
        user_id: &str,
        content: &str,
        publish: bool,
    ) -> Result<Update, AppError> {
        let content = validate_content(content)?;

        let now = self.clock.now();
        let week = week_start(now.date_naive());
        let published_at = publish.then(|| now.timestamp());

        let update = UpdateRepository::upsert(
            &self.db,
            user_id,
            week,
            content,
            published_at,
            now.timestamp(),
        )
        .await?;

        if publish {
            info!(update_id = %update.id, week = %week, "published update");
        } else {
            debug!(update_id = %update.id, week = %week, "saved draft");
        }
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_content_limits() {
        assert_eq!(validate_content("  shipped it \n").unwrap(), "shipped it");
        assert!(validate_content(&"a".repeat(280)).is_ok());
        assert!(matches!(
            validate_content(&"a".repeat(281)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_content(" \t\n "),
            Err(AppError::Validation(_))
        ));
        // Surrounding whitespace does not count toward the limit
        assert!(validate_content(&format!("   {}   ", "a".repeat(280))).is_ok());
    }

    #[test]
    fn test_validate_counts_characters_not_bytes() {
        assert!(validate_content(&"é".repeat(280)).is_ok());
    }

    #[test]
    fn test_compose_joins_items_with_newlines() {
        assert_eq!(
            compose(["fixed auth bug", "  ", " deployed to prod "]),
            "fixed auth bug\ndeployed to prod"
        );
        assert_eq!(compose(Vec::<String>::new()), "");
        assert!(validate_content(&compose(vec!["a".repeat(140), "b".repeat(140)])).is_err());
    }
}
