//! Authentication module for managing the technician session.
//!
//! This module provides:
//! - `SessionManager`: login/logout and "who is logged in" queries
//! - `CredentialStore`: persistence of the bearer token and user identity,
//!   backed by the OS keychain (`KeyringStore`) or memory (`MemoryStore`)
//!
//! Tokens are opaque and never renewed client-side; a session lasts until logout.

pub mod credentials;
pub mod session;

pub use credentials::{CredentialStore, KeyringStore, MemoryStore, StoreError};
pub use session::{SessionError, SessionManager};
