use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info, warn};

use super::{ValidationError, WorkflowError};
use crate::api::ApiClient;
use crate::auth::SessionManager;
use crate::models::{HandoverRecord, HandoverRequest, Shift};
use crate::selection::SelectionCoordinator;

#[derive(Debug, Clone, PartialEq)]
pub enum HandoverState {
    Idle,
    LoadingShifts,
    Ready,
    Submitting,
    Succeeded(HandoverRecord),
    Failed(String),
}

impl HandoverState {
    fn name(&self) -> &'static str {
        match self {
            HandoverState::Idle => "idle",
            HandoverState::LoadingShifts => "loading shifts",
            HandoverState::Ready => "ready",
            HandoverState::Submitting => "submitting",
            HandoverState::Succeeded(_) => "succeeded",
            HandoverState::Failed(_) => "failed",
        }
    }
}

/// A single in-progress handover submission.
///
/// `Idle -> LoadingShifts -> Ready -> Submitting -> Succeeded`, with
/// `LoadingShifts -> Failed` when no shift exists and `Submitting -> Ready`
/// when the backend does not confirm the handover.
pub struct HandoverWorkflow {
    api: ApiClient,
    session: Arc<SessionManager>,
    selection: Arc<SelectionCoordinator>,
    state: HandoverState,
    shifts: Vec<Shift>,
    selected_shift: Option<Shift>,
    notes: String,
    handover_date: NaiveDateTime,
}

impl HandoverWorkflow {
    pub fn new(
        api: ApiClient,
        session: Arc<SessionManager>,
        selection: Arc<SelectionCoordinator>,
    ) -> Self {
        Self {
            api,
            session,
            selection,
            state: HandoverState::Idle,
            shifts: Vec::new(),
            selected_shift: None,
            notes: String::new(),
            handover_date: Local::now().naive_local(),
        }
    }

    pub fn state(&self) -> &HandoverState {
        &self.state
    }

    pub fn shifts(&self) -> &[Shift] {
        &self.shifts
    }

    pub fn selected_shift(&self) -> Option<&Shift> {
        self.selected_shift.as_ref()
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn handover_date(&self) -> NaiveDateTime {
        self.handover_date
    }

    fn transition(&mut self, next: HandoverState) {
        debug!(from = self.state.name(), to = next.name(), "Handover state change");
        self.state = next;
    }

    /// Load shifts and pick the first one as default.
    /// Also used to retry after a failed load.
    pub async fn initialize(&mut self) -> Result<(), WorkflowError> {
        if !matches!(self.state, HandoverState::Idle | HandoverState::Failed(_)) {
            return Err(WorkflowError::InvalidState(self.state.name()));
        }

        self.transition(HandoverState::LoadingShifts);
        self.shifts = self.api.list_shifts().await;
        info!(count = self.shifts.len(), "Loaded shifts");

        match self.shifts.first() {
            Some(first) => {
                debug!(shift = %first.name, "Default shift selected");
                self.selected_shift = Some(first.clone());
                self.transition(HandoverState::Ready);
                Ok(())
            }
            None => {
                warn!("No shifts available");
                self.selected_shift = None;
                self.transition(HandoverState::Failed(
                    WorkflowError::NoShiftsAvailable.to_string(),
                ));
                Err(WorkflowError::NoShiftsAvailable)
            }
        }
    }

    pub fn select_shift(&mut self, shift_id: i64) -> Result<(), WorkflowError> {
        if self.state != HandoverState::Ready {
            return Err(WorkflowError::InvalidState(self.state.name()));
        }
        let shift = self
            .shifts
            .iter()
            .find(|s| s.id == shift_id)
            .ok_or(WorkflowError::UnknownShift(shift_id))?;
        self.selected_shift = Some(shift.clone());
        Ok(())
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub fn set_handover_date(&mut self, date: NaiveDateTime) {
        self.handover_date = date;
    }

    /// Check the submission preconditions and build the request from a
    /// snapshot of the selection.
    fn build_request(&self) -> Result<HandoverRequest, ValidationError> {
        let shift = self
            .selected_shift
            .as_ref()
            .ok_or(ValidationError::NoShiftSelected)?;

        let samples = self.selection.snapshot();
        if samples.is_empty() {
            return Err(ValidationError::NoSamplesSelected);
        }

        let user = self
            .session
            .current_user()
            .ok_or(ValidationError::NotAuthenticated)?;

        let notes = Some(self.notes.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        Ok(HandoverRequest::new(
            shift.id,
            user.id,
            self.handover_date,
            notes,
            &samples,
        ))
    }

    /// Submit the selection as a handover.
    ///
    /// On success the submitted samples leave the selection; samples toggled
    /// while the request was in flight stay selected. A missing precondition
    /// or an unconfirmed submission leaves the workflow `Ready` and the
    /// selection untouched.
    pub async fn submit(&mut self) -> Result<HandoverRecord, WorkflowError> {
        if self.state != HandoverState::Ready {
            return Err(WorkflowError::InvalidState(self.state.name()));
        }

        let request = self.build_request().map_err(|e| {
            warn!(reason = %e, "Cannot save handover");
            e
        })?;

        info!(
            shift_id = request.shift_id,
            sample_count = request.pending_samples.len(),
            "Submitting handover"
        );
        self.transition(HandoverState::Submitting);

        match self.api.create_handover(&request).await {
            Some(record) => {
                info!(handover_id = record.id, "Handover created");
                let submitted: Vec<i64> =
                    request.pending_samples.iter().map(|p| p.sample_id).collect();
                self.selection.remove_all(&submitted);
                self.transition(HandoverState::Succeeded(record.clone()));
                Ok(record)
            }
            None => {
                warn!("Failed to create handover");
                self.transition(HandoverState::Ready);
                Err(WorkflowError::SubmissionFailed)
            }
        }
    }

    /// Abandon the workflow. The selection is left as it is.
    pub fn cancel(&mut self) -> Result<(), WorkflowError> {
        if self.state == HandoverState::Submitting {
            return Err(WorkflowError::InvalidState(self.state.name()));
        }
        info!("Handover creation cancelled");
        self.shifts.clear();
        self.selected_shift = None;
        self.transition(HandoverState::Idle);
        Ok(())
    }
}
