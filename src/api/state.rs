use std::sync::Arc;

use sqlx::{Pool, Sqlite};

use crate::clock::Clock;
use crate::config::Config;
use crate::service::{FeedQuery, UpdateService};

#[derive(Clone)]
pub struct AppState {
    pub db: Pool<Sqlite>,
    pub config: Arc<Config>,
    pub clock: Arc<dyn Clock>,
    pub updates: UpdateService,
    pub feed: FeedQuery,
}

impl AppState {
    pub fn new(db: Pool<Sqlite>, config: Arc<Config>, clock: Arc<dyn Clock>) -> Self {
        Self {
            updates: UpdateService::new(db.clone(), clock.clone()),
            feed: FeedQuery::new(db.clone()),
            db,
            config,
            clock,
        }
    }
}
