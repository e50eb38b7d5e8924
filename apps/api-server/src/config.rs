//! Application configuration loaded from environment variables.

use std::env;

use quill_core::listing::{DEFAULT_PAGINATE_BY, LocalCalendar};

#[cfg(feature = "postgres")]
use quill_infra::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    /// Civil calendar used to stamp publish dates.
    pub calendar: LocalCalendar,
    /// Page size when a listing request names none.
    pub default_paginate_by: u64,
    /// Load demo content at startup.
    pub seed_demo_data: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        #[cfg(feature = "postgres")]
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(100),
            min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(10),
        });

        let calendar = match env::var("LOCAL_UTC_OFFSET") {
            Ok(value) => LocalCalendar::parse(&value).unwrap_or_else(|| {
                tracing::warn!(value = %value, "Invalid LOCAL_UTC_OFFSET, using UTC");
                LocalCalendar::utc()
            }),
            Err(_) => LocalCalendar::utc(),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            #[cfg(feature = "postgres")]
            database,
            calendar,
            default_paginate_by: parse_var::<u64>("DEFAULT_PAGINATE_BY")
                .filter(|&n| n > 0)
                .unwrap_or(DEFAULT_PAGINATE_BY),
            seed_demo_data: env::var("SEED_DEMO_DATA")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            #[cfg(feature = "postgres")]
            database: None,
            calendar: LocalCalendar::utc(),
            default_paginate_by: DEFAULT_PAGINATE_BY,
            seed_demo_data: false,
        }
    }
}
