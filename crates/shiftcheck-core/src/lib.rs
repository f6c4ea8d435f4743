//! Core library for shiftcheck.
//!
//! Session and data access for a laboratory sample-tracking backend:
//! authenticate a technician, list samples awaiting release, select some of
//! them, and submit a shift handover bundling the selection.
//!
//! Front ends wire the pieces together explicitly:
//!
//! ```no_run
//! use std::sync::Arc;
//! use shiftcheck_core::api::{build_http_client, ApiClient};
//! use shiftcheck_core::auth::{KeyringStore, SessionManager};
//! use shiftcheck_core::config::Config;
//! use shiftcheck_core::selection::SelectionCoordinator;
//! use shiftcheck_core::workflow::{HandoverWorkflow, PendingSamplesWorkflow};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::load_with_env();
//! let base_url = config.base_url()?;
//! let http = build_http_client(config.request_timeout())?;
//!
//! let session = Arc::new(SessionManager::new(Arc::new(KeyringStore::new()), http.clone(), &base_url));
//! let api = ApiClient::new(http, &base_url, session.clone());
//! let selection = Arc::new(SelectionCoordinator::new());
//!
//! let pending = PendingSamplesWorkflow::new(api.clone(), session.clone(), selection.clone());
//! let handover = HandoverWorkflow::new(api, session, selection);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod selection;
pub mod utils;
pub mod workflow;
