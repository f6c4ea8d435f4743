//! Data models for the sample-tracking backend.
//!
//! This module contains the entities exchanged with the backend:
//!
//! - `Sample`: A lab sample, pending or completed
//! - `Shift`: A work shift definition
//! - `UserIdentity`: A technician account
//! - `HandoverRequest`, `HandoverRecord`: Shift handover payload and confirmation

pub mod handover;
pub mod sample;
pub mod shift;
pub mod user;

pub use handover::{HandoverRecord, HandoverRequest, PendingSampleEntry, PENDING_RELEASE_REASON};
pub use sample::Sample;
pub use shift::Shift;
pub use user::UserIdentity;
