use std::sync::Arc;

use tracing::{error, info, warn};

use super::{ValidationError, WorkflowError};
use crate::api::{ApiClient, ApiError};
use crate::auth::SessionManager;
use crate::models::Sample;
use crate::selection::SelectionCoordinator;

/// Name shown when no user identity is available
const FALLBACK_USER_NAME: &str = "Usuario";

/// The pending-samples listing: the list as last loaded plus the shared
/// selection made from it.
pub struct PendingSamplesWorkflow {
    api: ApiClient,
    session: Arc<SessionManager>,
    selection: Arc<SelectionCoordinator>,
    samples: Vec<Sample>,
    current_user_name: String,
}

impl PendingSamplesWorkflow {
    pub fn new(
        api: ApiClient,
        session: Arc<SessionManager>,
        selection: Arc<SelectionCoordinator>,
    ) -> Self {
        Self {
            api,
            session,
            selection,
            samples: Vec::new(),
            current_user_name: String::new(),
        }
    }

    pub async fn initialize(&mut self) -> Result<(), ApiError> {
        self.load_user();
        self.load_samples().await.map(|_| ())
    }

    pub fn load_user(&mut self) {
        self.current_user_name = match self.session.current_user() {
            Some(user) => user.full_name,
            None => {
                warn!("No user information available, using default");
                FALLBACK_USER_NAME.to_string()
            }
        };
    }

    /// Reload the pending list. Selected samples that are no longer pending
    /// are dropped from the selection.
    ///
    /// When the backend cannot be reached the previous list and selection
    /// are kept and the transport error is returned. Any other failure
    /// counts as an empty list.
    pub async fn load_samples(&mut self) -> Result<&[Sample], ApiError> {
        self.samples = match self.api.try_list_pending_samples().await {
            Ok(samples) => samples,
            Err(e) if e.is_transport() => {
                warn!(error = %e, kept = self.samples.len(), "Reload failed, keeping previous list");
                return Err(e);
            }
            Err(e) => {
                error!(error = %e, "Failed to load pending samples");
                Vec::new()
            }
        };
        self.selection.retain_loaded(&self.samples);
        info!(count = self.samples.len(), "Loaded pending samples");
        Ok(&self.samples)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn current_user_name(&self) -> &str {
        &self.current_user_name
    }

    /// Toggle a sample of the loaded list by id.
    /// Returns whether it is selected afterwards.
    pub fn toggle(&self, sample_id: i64) -> Result<bool, WorkflowError> {
        let sample = self
            .samples
            .iter()
            .find(|s| s.id == sample_id)
            .ok_or(WorkflowError::UnknownSample(sample_id))?;
        Ok(self.selection.toggle(sample))
    }

    pub fn is_selected(&self, sample_id: i64) -> bool {
        self.selection.contains(sample_id)
    }

    pub fn selected_count(&self) -> usize {
        self.selection.count()
    }

    /// Gate for moving on to handover creation
    pub fn begin_handover(&self) -> Result<(), ValidationError> {
        if self.selection.is_empty() {
            warn!("Cannot create handover: no samples selected");
            return Err(ValidationError::NoSamplesSelected);
        }
        info!(count = self.selection.count(), "Starting handover creation");
        Ok(())
    }

    /// Forget the loaded list and the selection
    pub fn reset(&mut self) {
        self.samples.clear();
        self.selection.clear();
    }

    pub fn logout(&mut self) {
        info!("User logout initiated");
        self.session.logout();
        self.reset();
        self.current_user_name.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{CredentialStore, MemoryStore};
    use crate::auth::credentials::{FULL_NAME_KEY, TOKEN_KEY, USERNAME_KEY};
    use reqwest::Client;

    // Nothing listens on the discard port, so every request fails fast.
    const UNREACHABLE: &str = "http://127.0.0.1:9/api/";

    fn workflow(store: Arc<MemoryStore>) -> PendingSamplesWorkflow {
        let session = Arc::new(SessionManager::new(store, Client::new(), UNREACHABLE));
        let api = ApiClient::new(Client::new(), UNREACHABLE, session.clone());
        PendingSamplesWorkflow::new(api, session, Arc::new(SelectionCoordinator::new()))
    }

    #[test]
    fn test_user_name_fallback() {
        let store = Arc::new(MemoryStore::new());
        let mut wf = workflow(store.clone());
        wf.load_user();
        assert_eq!(wf.current_user_name(), FALLBACK_USER_NAME);

        store.set(USERNAME_KEY, "tech1").unwrap();
        store.set(FULL_NAME_KEY, "Jane Tech").unwrap();
        wf.load_user();
        assert_eq!(wf.current_user_name(), "Jane Tech");
    }

    #[test]
    fn test_begin_handover_requires_selection() {
        let wf = workflow(Arc::new(MemoryStore::new()));
        assert_eq!(wf.begin_handover(), Err(ValidationError::NoSamplesSelected));
    }

    #[test]
    fn test_toggle_unknown_sample() {
        let wf = workflow(Arc::new(MemoryStore::new()));
        assert_eq!(wf.toggle(5), Err(WorkflowError::UnknownSample(5)));
        assert_eq!(wf.selected_count(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_backend_reports_transport_error() {
        let mut wf = workflow(Arc::new(MemoryStore::new()));
        assert!(wf.load_samples().await.unwrap_err().is_transport());
        assert!(wf.samples().is_empty());
    }

    #[test]
    fn test_logout_clears_session() {
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "abc").unwrap();
        store.set(USERNAME_KEY, "tech1").unwrap();

        let mut wf = workflow(store.clone());
        wf.load_user();
        wf.logout();

        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(wf.current_user_name(), "");
        assert!(wf.samples().is_empty());
    }
}
