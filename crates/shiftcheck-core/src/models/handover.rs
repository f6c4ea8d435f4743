use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Sample;
use crate::utils::format_timestamp;

/// Reason attached to every sample handed over while awaiting release.
pub const PENDING_RELEASE_REASON: &str = "Pendiente de liberación";

/// One sample line of a handover, both outbound and as echoed back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct PendingSampleEntry {
    #[serde(rename(deserialize = "sampleid"), default)]
    pub sample_id: i64,
    #[serde(default)]
    pub folio: Option<i64>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl PendingSampleEntry {
    pub fn pending_release(sample: &Sample) -> Self {
        Self {
            sample_id: sample.id,
            folio: sample.folio,
            reason: Some(PENDING_RELEASE_REASON.to_string()),
        }
    }
}

/// Outbound payload for `POST shifthandovers`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoverRequest {
    pub shift_id: i64,
    pub user_id: i64,
    pub handover_date: NaiveDateTime,
    pub notes: Option<String>,
    pub pending_samples: Vec<PendingSampleEntry>,
}

impl HandoverRequest {
    /// Build a request handing over `samples` as pending release.
    pub fn new(
        shift_id: i64,
        user_id: i64,
        handover_date: NaiveDateTime,
        notes: Option<String>,
        samples: &[Sample],
    ) -> Self {
        Self {
            shift_id,
            user_id,
            handover_date,
            notes,
            pending_samples: samples.iter().map(PendingSampleEntry::pending_release).collect(),
        }
    }
}

/// A handover as confirmed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct HandoverRecord {
    #[serde(default)]
    pub id: i64,
    #[serde(rename(deserialize = "shiftid"), default)]
    pub shift_id: i64,
    #[serde(rename(deserialize = "shiftname"), default)]
    pub shift_name: String,
    #[serde(rename(deserialize = "userid"), default)]
    pub user_id: i64,
    #[serde(rename(deserialize = "username"), default)]
    pub user_name: String,
    #[serde(rename(deserialize = "handoverdate"), default)]
    pub handover_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(rename(deserialize = "pendingsamplescount"), default)]
    pub pending_samples_count: i64,
    #[serde(rename(deserialize = "pendingsamples"), default)]
    pub pending_samples: Vec<PendingSampleEntry>,
}

impl HandoverRecord {
    pub fn date_display(&self) -> String {
        self.handover_date
            .as_deref()
            .map(format_timestamp)
            .unwrap_or_else(|| "TBD".to_string())
    }
}
