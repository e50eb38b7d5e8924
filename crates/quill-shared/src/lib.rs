//! # Quill Shared
//!
//! Wire types exchanged with API clients: request parameters, response bodies and
//! the RFC 7807 error body.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
