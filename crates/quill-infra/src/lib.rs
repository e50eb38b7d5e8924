//! # Quill Infrastructure
//!
//! Concrete implementations of the repository ports defined in `quill-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory store only
//! - `postgres` - PostgreSQL database support via SeaORM

pub mod database;
pub mod memory;

// Re-exports - In-Memory
pub use memory::InMemoryStore;

// Re-exports - PostgreSQL
#[cfg(feature = "postgres")]
pub use database::{
    DatabaseConfig, PostgresPostRepository, PostgresTagRepository, PostgresUserRepository,
    connect,
};
