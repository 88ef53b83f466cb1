use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::CurrentUser;
use crate::api::state::AppState;
use crate::db::{FeedEntry, Update};
use crate::error::AppError;
use crate::week::WeekStart;

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    pub week: Option<String>,
}

impl WeekQuery {
    /// The requested week, or the current one when absent.
    fn resolve(&self, state: &AppState) -> Result<WeekStart, AppError> {
        match self.week.as_deref().map(str::trim) {
            Some(week) if !week.is_empty() => WeekStart::parse(week),
            _ => Ok(state.updates.current_week()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SaveUpdateRequest {
    pub content: Option<String>,
    #[serde(default)]
    pub publish: bool,
}

#[derive(Debug, Serialize)]
pub struct WeekFeedResponse {
    pub week: WeekStart,
    pub label: String,
    pub previous: WeekStart,
    /// `None` for the current week: there is nothing to browse ahead of it.
    pub next: Option<WeekStart>,
    pub editable: bool,
    pub updates: Vec<FeedEntry>,
}

#[derive(Debug, Serialize)]
pub struct MyUpdateResponse {
    pub update: Option<Update>,
    pub editable: bool,
}

#[derive(Debug, Serialize)]
pub struct SaveUpdateResponse {
    pub update: Update,
}

/// GET /api/updates?week=YYYY-MM-DD (requires auth)
pub async fn week_feed(
    State(state): State<AppState>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeekFeedResponse>, AppError> {
    let week = query.resolve(&state)?;
    let current = state.updates.current_week();
    let updates = state.feed.feed_for_week(week).await?;

    Ok(Json(WeekFeedResponse {
        week,
        label: week.label(),
        previous: week.previous(),
        next: (week < current).then(|| week.next()),
        editable: state.updates.is_editable(week),
        updates,
    }))
}

/// GET /api/updates/me?week=YYYY-MM-DD (requires auth)
pub async fn my_update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<MyUpdateResponse>, AppError> {
    let week = query.resolve(&state)?;
    let update = state.updates.get_for_week(&current.user_id, week).await?;

    Ok(Json(MyUpdateResponse {
        update,
        editable: state.updates.is_editable(week),
    }))
}

/// POST /api/updates (requires auth). Always targets the current week.
pub async fn save(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    payload: Result<Json<SaveUpdateRequest>, JsonRejection>,
) -> Result<Json<SaveUpdateResponse>, AppError> {
    let Json(req) = payload?;
    let content = req.content.unwrap_or_default();
    let update = state
        .updates
        .save_draft_or_publish(&current.user_id, &content, req.publish)
        .await?;

    Ok(Json(SaveUpdateResponse { update }))
}
