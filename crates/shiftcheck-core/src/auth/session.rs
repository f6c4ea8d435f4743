use std::sync::Arc;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::credentials::{
    CredentialStore, StoreError, FULL_NAME_KEY, ROLE_KEY, SESSION_KEYS, TOKEN_KEY, USERNAME_KEY,
    USER_ID_KEY,
};
use crate::api::json::from_str_ci;
use crate::config::endpoint;
use crate::models::UserIdentity;

/// Role assumed when none was persisted
const DEFAULT_ROLE: &str = "User";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Username and password required")]
    MissingCredentials,

    /// The login request never got an answer. The caller should show
    /// `message` and let the user retry.
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid login response: {0}")]
    InvalidResponse(String),

    #[error("Failed to save session: {0}")]
    Storage(#[from] StoreError),
}

impl SessionError {
    fn transport(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "Connection timed out. Please try again."
        } else {
            "Unable to connect to server. Check your internet connection."
        };
        SessionError::Transport {
            message: message.to_string(),
            source: err,
        }
    }
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(rename = "fullname", default)]
    full_name: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(alias = "userid", default)]
    id: Option<i64>,
}

/// Owns the authentication lifecycle: login, logout and the queries
/// downstream code uses to decide whether a session exists.
///
/// Everything except `login` degrades to "logged out" instead of failing.
pub struct SessionManager {
    store: Arc<dyn CredentialStore>,
    client: Client,
    base_url: String,
}

impl SessionManager {
    pub fn new(store: Arc<dyn CredentialStore>, client: Client, base_url: &str) -> Self {
        Self {
            store,
            client,
            base_url: base_url.to_string(),
        }
    }

    /// Authenticate against `POST auth/login`.
    ///
    /// Returns `Ok(None)` when the backend rejects the credentials; nothing
    /// is persisted in that case.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserIdentity>, SessionError> {
        if username.trim().is_empty() || password.trim().is_empty() {
            warn!("Login attempted with empty credentials");
            return Err(SessionError::MissingCredentials);
        }

        info!(username = username, "Starting login");
        let url = endpoint(&self.base_url, "auth/login");

        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(|e| {
                error!(username = username, error = %e, "Login request failed");
                SessionError::transport(e)
            })?;

        let status = response.status();
        info!(status = %status, "Login response received");

        if !status.is_success() {
            warn!(username = username, status = %status, "Login rejected");
            return Ok(None);
        }

        let body = response.text().await.map_err(SessionError::transport)?;
        debug!(length = body.len(), "Login response body received");

        let auth: LoginResponse =
            from_str_ci(&body).map_err(|e| SessionError::InvalidResponse(e.to_string()))?;

        let token = match auth.token.filter(|t| !t.is_empty()) {
            Some(token) => token,
            None => {
                warn!("Login response did not contain a token");
                return Ok(None);
            }
        };

        let username = auth
            .username
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| username.to_string());
        let user = UserIdentity {
            id: auth.id.unwrap_or(0),
            full_name: auth.full_name.clone().unwrap_or_else(|| username.clone()),
            username,
            email: String::new(),
            role: auth.role.clone().unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            is_active: true,
        };

        if let Err(e) =
            self.persist(&token, &user, auth.full_name.as_deref(), auth.role.as_deref(), auth.id)
        {
            error!(username = %user.username, error = %e, "Failed to store session, clearing it");
            self.clear_session();
            return Err(e.into());
        }

        info!(username = %user.username, full_name = %user.full_name, "Login successful");
        Ok(Some(user))
    }

    fn persist(
        &self,
        token: &str,
        user: &UserIdentity,
        full_name: Option<&str>,
        role: Option<&str>,
        user_id: Option<i64>,
    ) -> Result<(), StoreError> {
        debug!("Storing session in credential store");
        // The token is the commit marker: gone while the identity fields
        // change, written only once all of them are stored.
        self.store.remove(TOKEN_KEY)?;
        self.store.set(USERNAME_KEY, &user.username)?;
        self.set_or_remove(FULL_NAME_KEY, full_name)?;
        self.set_or_remove(ROLE_KEY, role)?;
        self.set_or_remove(USER_ID_KEY, user_id.map(|id| id.to_string()).as_deref())?;
        self.store.set(TOKEN_KEY, token)?;
        Ok(())
    }

    // Fields absent from this login must not leak in from the previous one.
    fn set_or_remove(&self, key: &str, value: Option<&str>) -> Result<(), StoreError> {
        match value {
            Some(value) => self.store.set(key, value),
            None => self.store.remove(key),
        }
    }

    /// Remove every persisted session field. Never fails.
    pub fn logout(&self) {
        info!("Logging out user");
        self.clear_session();
    }

    fn clear_session(&self) {
        for key in SESSION_KEYS {
            if let Err(e) = self.store.remove(key) {
                warn!(key = key, error = %e, "Failed to remove session field");
            }
        }
    }

    /// The persisted bearer token, if any. Storage failures read as absent.
    pub fn current_token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => {
                let token = token.filter(|t| !t.is_empty());
                debug!(has_token = token.is_some(), "Token read from store");
                token
            }
            Err(e) => {
                error!(error = %e, "Failed to read token");
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_token().is_some()
    }

    /// Rebuild the logged-in identity from persisted fields.
    /// Without a username there is no user, whatever else is stored.
    pub fn current_user(&self) -> Option<UserIdentity> {
        match self.read_user() {
            Ok(user) => user,
            Err(e) => {
                error!(error = %e, "Failed to read current user");
                None
            }
        }
    }

    fn read_user(&self) -> Result<Option<UserIdentity>, StoreError> {
        let username = match self.store.get(USERNAME_KEY)?.filter(|u| !u.is_empty()) {
            Some(username) => username,
            None => {
                debug!("No user data in credential store");
                return Ok(None);
            }
        };

        let full_name = self.store.get(FULL_NAME_KEY)?;
        let role = self.store.get(ROLE_KEY)?;
        let id = self
            .store
            .get(USER_ID_KEY)?
            .and_then(|id| id.parse::<i64>().ok())
            .unwrap_or(0);

        Ok(Some(UserIdentity {
            id,
            full_name: full_name.unwrap_or_else(|| username.clone()),
            username,
            email: String::new(),
            role: role.unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            is_active: true,
        }))
    }
}
