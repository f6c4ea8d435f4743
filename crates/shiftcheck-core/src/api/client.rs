//! API client for the sample-tracking backend.
//!
//! Every call fetches the current token from the `SessionManager`, attaches
//! it as a bearer credential when present, and gets exactly one attempt
//! bounded by the client timeout.
//!
//! Two flavours of each operation exist. `try_*` returns the failure as an
//! `ApiError`. The plain operations collapse any failure into an empty list
//! or `None` and log it, so UI code can treat "no data" uniformly.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, info, warn};

use super::json::from_str_ci;
use super::ApiError;
use crate::auth::SessionManager;
use crate::config::endpoint;
use crate::models::{HandoverRecord, HandoverRequest, Sample, Shift, UserIdentity};

/// Date format the backend expects for handover range filters
const QUERY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Build the shared HTTP client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
pub fn build_http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder().timeout(timeout).build()
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionManager>,
}

impl ApiClient {
    pub fn new(client: Client, base_url: &str, session: Arc<SessionManager>) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            session,
        }
    }

    /// Attach the bearer token, if the session has one
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.current_token() {
            Some(token) => {
                debug!("Added bearer token to request");
                request.bearer_auth(token)
            }
            None => {
                warn!("No authentication token available for API request");
                request
            }
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: &str,
    ) -> Result<T, ApiError> {
        let response = self.authorized(request).send().await?;

        let status = response.status();
        info!(operation = operation, status = %status, "Response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ApiError::from_status(status, &body);
            warn!(operation = operation, error = %err, "Request failed");
            return Err(err);
        }

        let body = response.text().await?;
        debug!(operation = operation, length = body.len(), "Received JSON response");

        Ok(from_str_ci(&body)?)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        operation: &str,
    ) -> Result<T, ApiError> {
        let url = endpoint(&self.base_url, path);
        debug!(url = %url, ?query, "GET");

        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.send(request, operation).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        operation: &str,
    ) -> Result<T, ApiError> {
        let url = endpoint(&self.base_url, path);
        debug!(url = %url, "POST");
        self.send(self.client.post(&url).json(body), operation).await
    }

    /// Log the outcome of a list call and collapse failure into an empty list
    fn or_empty<T>(operation: &str, result: Result<Vec<T>, ApiError>) -> Vec<T> {
        match result {
            Ok(items) => {
                info!(operation = operation, count = items.len(), "Fetched");
                items
            }
            Err(e) if e.is_transport() => {
                error!(operation = operation, error = %e, "Network error");
                Vec::new()
            }
            Err(e) => {
                error!(operation = operation, error = %e, "Request failed, returning empty list");
                Vec::new()
            }
        }
    }

    // ===== Samples =====

    pub async fn try_list_pending_samples(&self) -> Result<Vec<Sample>, ApiError> {
        info!("Fetching pending samples");
        let samples: Option<Vec<Sample>> =
            self.get("samples/pending", &[], "list_pending_samples").await?;
        Ok(samples.unwrap_or_default())
    }

    pub async fn list_pending_samples(&self) -> Vec<Sample> {
        Self::or_empty("list_pending_samples", self.try_list_pending_samples().await)
    }

    // ===== Shifts =====

    pub async fn try_list_shifts(&self) -> Result<Vec<Shift>, ApiError> {
        info!("Fetching shifts");
        let shifts: Option<Vec<Shift>> = self.get("shifts", &[], "list_shifts").await?;
        Ok(shifts.unwrap_or_default())
    }

    pub async fn list_shifts(&self) -> Vec<Shift> {
        Self::or_empty("list_shifts", self.try_list_shifts().await)
    }

    // ===== Users =====

    /// Active accounts only; the filter is applied server-side
    pub async fn try_list_active_users(&self) -> Result<Vec<UserIdentity>, ApiError> {
        info!("Fetching active users");
        let query = [("isActive", "true".to_string())];
        let users: Option<Vec<UserIdentity>> =
            self.get("users", &query, "list_active_users").await?;
        Ok(users.unwrap_or_default())
    }

    pub async fn list_active_users(&self) -> Vec<UserIdentity> {
        Self::or_empty("list_active_users", self.try_list_active_users().await)
    }

    // ===== Shift Handovers =====

    pub async fn try_create_handover(
        &self,
        request: &HandoverRequest,
    ) -> Result<HandoverRecord, ApiError> {
        info!(
            shift_id = request.shift_id,
            sample_count = request.pending_samples.len(),
            "Creating shift handover"
        );
        let record: Option<HandoverRecord> =
            self.post("shifthandovers", request, "create_handover").await?;
        record.ok_or_else(|| ApiError::InvalidResponse("empty handover response".to_string()))
    }

    pub async fn create_handover(&self, request: &HandoverRequest) -> Option<HandoverRecord> {
        match self.try_create_handover(request).await {
            Ok(record) => {
                info!(handover_id = record.id, "Created shift handover");
                Some(record)
            }
            Err(e) => {
                error!(error = %e, "Failed to create shift handover");
                None
            }
        }
    }

    /// Handover history, optionally bounded by calendar dates.
    /// Either bound may be given without the other.
    pub async fn try_list_handovers(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<HandoverRecord>, ApiError> {
        info!(?start_date, ?end_date, "Fetching shift handovers");
        let query = Self::date_range_query(start_date, end_date);
        let handovers: Option<Vec<HandoverRecord>> =
            self.get("shifthandovers", &query, "list_handovers").await?;
        Ok(handovers.unwrap_or_default())
    }

    pub async fn list_handovers(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Vec<HandoverRecord> {
        Self::or_empty(
            "list_handovers",
            self.try_list_handovers(start_date, end_date).await,
        )
    }

    fn date_range_query(
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(start) = start_date {
            query.push(("startDate", start.format(QUERY_DATE_FORMAT).to_string()));
        }
        if let Some(end) = end_date {
            query.push(("endDate", end.format(QUERY_DATE_FORMAT).to_string()));
        }
        query
    }
}
