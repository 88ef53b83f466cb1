use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::api::state::AppState;
use crate::db::{PublicUser, Update};
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub update: Update,
    pub week_label: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: PublicUser,
    pub updates: Vec<HistoryEntry>,
}

/// GET /api/users/{username}
pub async fn profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state
        .feed
        .profile(&username.to_lowercase())
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    let updates = profile
        .updates
        .into_iter()
        .map(|update| HistoryEntry {
            week_label: update.week_start.label(),
            update,
        })
        .collect();

    Ok(Json(ProfileResponse {
        user: profile.user,
        updates,
    }))
}
