//! Shared application state handed to every handler.

use ramen_db::Database;

use crate::config::ApiConfig;
use crate::events::EventHub;

/// Application state.
///
/// Cheap to clone: the database wraps a pooled connection and the hub wraps
/// a broadcast sender.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub events: EventHub,
    pub config: ApiConfig,
}

impl AppState {
    /// Creates the application state.
    pub fn new(db: Database, config: ApiConfig) -> Self {
        AppState {
            events: EventHub::new(config.event_channel_capacity),
            db,
            config,
        }
    }
}
