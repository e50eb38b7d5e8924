//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::listing::LocalCalendar;
use quill_core::ports::{PostRepository, TagRepository, UserRepository};
use quill_infra::InMemoryStore;

#[cfg(feature = "postgres")]
use quill_infra::{
    DatabaseConfig, PostgresPostRepository, PostgresTagRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub calendar: LocalCalendar,
    pub default_paginate_by: u64,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        if let Some(state) = Self::postgres(config.database.as_ref(), config).await {
            tracing::info!("Application state initialized (postgres)");
            return state;
        }

        #[cfg(not(feature = "postgres"))]
        tracing::info!("Running without postgres feature - using in-memory store");

        tracing::info!("Application state initialized (in-memory)");
        Self::in_memory(InMemoryStore::new(), config)
    }

    /// State backed by the given in-memory store.
    pub fn in_memory(store: InMemoryStore, config: &AppConfig) -> Self {
        Self {
            users: Arc::new(store.users()),
            posts: Arc::new(store.posts()),
            tags: Arc::new(store.tags()),
            calendar: config.calendar,
            default_paginate_by: config.default_paginate_by,
        }
    }

    #[cfg(feature = "postgres")]
    async fn postgres(db_config: Option<&DatabaseConfig>, config: &AppConfig) -> Option<Self> {
        let Some(db_config) = db_config else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return None;
        };

        match quill_infra::connect(db_config).await {
            Ok(conn) => Some(Self {
                users: Arc::new(PostgresUserRepository::new(conn.clone())),
                posts: Arc::new(PostgresPostRepository::new(conn.clone())),
                tags: Arc::new(PostgresTagRepository::new(conn)),
                calendar: config.calendar,
                default_paginate_by: config.default_paginate_by,
            }),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                None
            }
        }
    }
}
