//! Samples selected for the next handover.
//!
//! One `SelectionCoordinator` is shared (behind an `Arc`) by the listing
//! workflow, which toggles samples, and the handover workflow, which reads a
//! snapshot and removes the submitted samples once the handover is created.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::models::Sample;

#[derive(Debug, Default)]
pub struct SelectionCoordinator {
    // Keyed by sample id
    selected: Mutex<BTreeMap<i64, Sample>>,
}

impl SelectionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<i64, Sample>> {
        self.selected.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add the sample if absent, remove it if present.
    /// Returns whether the sample is selected afterwards.
    pub fn toggle(&self, sample: &Sample) -> bool {
        let mut selected = self.lock();
        let now_selected = if selected.remove(&sample.id).is_some() {
            false
        } else {
            selected.insert(sample.id, sample.clone());
            true
        };
        debug!(
            sample_id = sample.id,
            selected = now_selected,
            total = selected.len(),
            "Sample toggled"
        );
        now_selected
    }

    pub fn contains(&self, sample_id: i64) -> bool {
        self.lock().contains_key(&sample_id)
    }

    pub fn clear(&self) {
        self.lock().clear();
        debug!("Selection cleared");
    }

    /// Remove the given ids, leaving anything else selected in place.
    /// Returns how many entries were removed.
    pub fn remove_all(&self, sample_ids: &[i64]) -> usize {
        let mut selected = self.lock();
        let before = selected.len();
        selected.retain(|id, _| !sample_ids.contains(id));
        let removed = before - selected.len();
        debug!(removed = removed, remaining = selected.len(), "Samples removed from selection");
        removed
    }

    pub fn count(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Owned copy of the selection, ordered by sample id. Later toggles do
    /// not affect a snapshot already taken.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.lock().values().cloned().collect()
    }

    /// Drop entries that are not in `loaded` and refresh the kept ones with
    /// the newly loaded data. Returns how many entries were dropped.
    pub fn retain_loaded(&self, loaded: &[Sample]) -> usize {
        let loaded_ids: HashSet<i64> = loaded.iter().map(|s| s.id).collect();
        let mut selected = self.lock();
        let before = selected.len();
        selected.retain(|id, _| loaded_ids.contains(id));
        for sample in loaded {
            if let Some(entry) = selected.get_mut(&sample.id) {
                *entry = sample.clone();
            }
        }
        let dropped = before - selected.len();
        if dropped > 0 {
            debug!(dropped = dropped, "Removed stale samples from selection");
        }
        dropped
    }
}
