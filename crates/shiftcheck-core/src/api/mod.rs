//! REST API client module for the sample-tracking backend.
//!
//! This module provides the `ApiClient` for listing pending samples, shifts
//! and active users, and for creating and listing shift handovers.
//!
//! The API uses bearer token authentication; the token comes from the
//! `SessionManager` on every call.

pub mod client;
pub mod error;
pub mod json;

pub use client::{build_http_client, ApiClient};
pub use error::ApiError;
