//! # Quill Core
//!
//! The domain layer of the Quill blog.
//! This crate contains the entities, the repository ports and the listing engine
//! (filtering, ordering, pagination and navigation windows) with zero infrastructure
//! dependencies.

pub mod domain;
pub mod error;
pub mod listing;
pub mod ports;

pub use error::DomainError;
