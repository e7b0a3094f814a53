use serde::Serialize;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Mutex, MutexGuard, PoisonError};
use time::OffsetDateTime;
use utoipa::ToSchema;

use super::events::ProcessHandle;
use super::identity::JobKey;

#[derive(Debug)]
struct Slot {
    started_at: OffsetDateTime,
    handle: Option<ProcessHandle>,
}

/// Read-only view of a registry entry.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActiveJob {
    pub key: String,
    pub pid: Option<u32>,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub started_at: OffsetDateTime,
}

/// Table of transcode jobs that are reserved or running, at most one per key.
///
/// The lock is only ever held for a single map operation and never across an
/// `.await`, so a plain std mutex is enough.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: Mutex<HashMap<JobKey, Slot>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<JobKey, Slot>> {
        // Every critical section is a single map call, so a poisoned map is
        // still consistent.
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reserve the slot for `key`. Returns true only to the caller that
    /// inserted it; check and insert happen under the same lock.
    pub fn try_acquire(&self, key: &JobKey) -> bool {
        match self.lock().entry(key.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Slot {
                    started_at: OffsetDateTime::now_utc(),
                    handle: None,
                });
                true
            }
        }
    }

    /// Record the process running for a reserved key. Returns false when the
    /// slot no longer exists, in which case the handle is dropped.
    pub fn attach(&self, key: &JobKey, handle: ProcessHandle) -> bool {
        match self.lock().get_mut(key) {
            Some(slot) => {
                slot.handle = Some(handle);
                true
            }
            None => false,
        }
    }

    /// Remove the entry for `key`. Returns whether there was one.
    pub fn release(&self, key: &JobKey) -> bool {
        self.lock().remove(key).is_some()
    }

    pub fn is_active(&self, key: &JobKey) -> bool {
        self.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Active jobs, oldest first.
    pub fn snapshot(&self) -> Vec<ActiveJob> {
        let mut jobs: Vec<ActiveJob> = self
            .lock()
            .iter()
            .map(|(key, slot)| ActiveJob {
                key: key.to_string(),
                pid: slot.handle.and_then(|h| h.pid),
                started_at: slot.started_at,
            })
            .collect();
        jobs.sort_by(|a, b| a.started_at.cmp(&b.started_at).then_with(|| a.key.cmp(&b.key)));
        jobs
    }
}
