//! Case aggregate store
//!
//! The store exclusively owns every case. Mutations are whole-record
//! replacements, so a failed transition never leaves a half-updated case
//! behind. Interested parties subscribe to a channel of [`StoreEvent`]s.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use crossbeam::channel::{Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};

use crate::core::classification::Classification;
use crate::core::error::CaseError;
use crate::core::identity::{is_valid_case_prefix, CaseId};
use crate::core::routing::{generate, instantiate};
use crate::core::vocabulary::{Department, FinalStatus};
use crate::entities::case::{Case, CaseInput};

/// Default case ID prefix
pub const DEFAULT_PREFIX: &str = "DL";

/// Change notification sent to subscribers after each commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Created(CaseId),
    Updated(CaseId),
}

impl StoreEvent {
    pub fn case_id(&self) -> &CaseId {
        match self {
            StoreEvent::Created(id) | StoreEvent::Updated(id) => id,
        }
    }
}

/// Serialized form of the store, as written to `.dlt/cases.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Sequence number the next created case receives
    #[serde(default = "first_sequence")]
    pub next_sequence: u32,

    #[serde(default)]
    pub cases: Vec<Case>,
}

fn first_sequence() -> u32 {
    1
}

/// In-memory collection of cases in insertion order
pub struct CaseStore {
    cases: Vec<Case>,
    index: HashMap<CaseId, usize>,
    next_sequence: u32,
    prefix: String,
    subscribers: Vec<Sender<StoreEvent>>,
}

impl Default for CaseStore {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl CaseStore {
    /// Create an empty store issuing IDs with `prefix`
    ///
    /// A prefix that could not be parsed back out of a case ID is replaced by
    /// [`DEFAULT_PREFIX`].
    pub fn new(prefix: &str) -> Self {
        let prefix = prefix.trim();
        let prefix = if is_valid_case_prefix(prefix) {
            prefix.to_uppercase()
        } else {
            tracing::warn!(prefix, fallback = DEFAULT_PREFIX, "unusable case ID prefix");
            DEFAULT_PREFIX.to_string()
        };
        Self {
            cases: Vec::new(),
            index: HashMap::new(),
            next_sequence: 1,
            prefix,
            subscribers: Vec::new(),
        }
    }

    /// Rebuild a store from a snapshot
    ///
    /// The sequence counter is never allowed to fall behind an existing case,
    /// so a hand-edited snapshot cannot cause ID reuse. Records whose category
    /// disagrees with their classification, or whose stages break the pointer
    /// invariant, are left out with a warning. Their sequence numbers still
    /// count as taken.
    pub fn from_snapshot(snapshot: StoreSnapshot, prefix: &str) -> Self {
        let mut store = Self::new(prefix);
        let mut max_seq = 0;

        for case in snapshot.cases {
            max_seq = max_seq.max(case.id.sequence());
            if store.index.contains_key(&case.id) {
                tracing::warn!(case = %case.id, "duplicate case in snapshot, keeping the first");
                continue;
            }
            if case.category != case.classification.category() {
                tracing::warn!(
                    case = %case.id,
                    category = %case.category,
                    classification = %case.classification.category(),
                    "case category disagrees with its classification, skipping"
                );
                continue;
            }
            if !case.check_invariant() {
                tracing::warn!(
                    case = %case.id,
                    stage_index = case.current_stage_index,
                    "case stages are inconsistent with the current stage, skipping"
                );
                continue;
            }
            store.index.insert(case.id.clone(), store.cases.len());
            store.cases.push(case);
        }

        store.next_sequence = snapshot.next_sequence.max(max_seq + 1);
        tracing::debug!(
            cases = store.cases.len(),
            next_sequence = store.next_sequence,
            "loaded case store"
        );
        store
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            next_sequence: self.next_sequence,
            cases: self.cases.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Create a case with its generated workflow
    pub fn create(&mut self, input: CaseInput) -> Result<Case, CaseError> {
        self.create_at(input, Utc::now())
    }

    /// Create a case as if received at `now`
    pub fn create_at(&mut self, input: CaseInput, now: DateTime<Utc>) -> Result<Case, CaseError> {
        let mut missing = Vec::new();
        if input.doctor_name.trim().is_empty() {
            missing.push("doctor_name".to_string());
        }
        if input.patient_name.trim().is_empty() {
            missing.push("patient_name".to_string());
        }
        let Some(due_date) = input.due_date else {
            missing.push("due_date".to_string());
            return Err(CaseError::Validation { fields: missing });
        };
        if !missing.is_empty() {
            return Err(CaseError::Validation { fields: missing });
        }

        let classification = Classification::resolve(
            input.category,
            &input.options,
            input.is_custom_product,
            &input.custom_steps,
        )?;
        let workflow = instantiate(&generate(&classification)?);

        let id = CaseId::new(&self.prefix, now, self.next_sequence);
        let case = Case {
            id: id.clone(),
            category: classification.category(),
            is_custom_product: classification.is_custom(),
            classification,
            priority: input.priority,
            doctor_name: input.doctor_name.trim().to_string(),
            patient_name: input.patient_name.trim().to_string(),
            tooth_numbers: input.tooth_numbers,
            shade: non_blank(input.shade),
            special_instructions: non_blank(input.special_instructions),
            date_received: now,
            due_date,
            workflow,
            current_stage_index: 0,
            is_paused: false,
            pause_history: Vec::new(),
            final_status: None,
            notes: Vec::new(),
            attachments: Vec::new(),
            revision: 0,
        };

        self.next_sequence += 1;
        self.index.insert(id.clone(), self.cases.len());
        self.cases.push(case.clone());

        tracing::debug!(case = %id, stages = case.workflow.len(), "created case");
        self.notify(StoreEvent::Created(id));
        Ok(case)
    }

    pub fn get(&self, id: &CaseId) -> Option<&Case> {
        self.index.get(id).map(|&idx| &self.cases[idx])
    }

    /// Like [`get`](Self::get) but reports a missing case as an error
    pub fn require(&self, id: &CaseId) -> Result<&Case, CaseError> {
        self.get(id)
            .ok_or_else(|| CaseError::CaseNotFound(id.to_string()))
    }

    /// Owned copy for read-modify-write
    pub fn get_owned(&self, id: &CaseId) -> Result<Case, CaseError> {
        self.require(id).cloned()
    }

    /// All cases in insertion order
    pub fn list(&self) -> impl Iterator<Item = &Case> {
        self.cases.iter()
    }

    /// Atomically replace a case and notify subscribers
    ///
    /// The stored ID is authoritative and the revision counter is bumped.
    pub fn replace(&mut self, id: &CaseId, mut case: Case) -> Result<(), CaseError> {
        let idx = *self
            .index
            .get(id)
            .ok_or_else(|| CaseError::CaseNotFound(id.to_string()))?;

        let slot = &mut self.cases[idx];
        case.id = slot.id.clone();
        case.revision = slot.revision + 1;
        *slot = case;

        tracing::debug!(case = %id, revision = slot.revision, "committed case");
        self.notify(StoreEvent::Updated(id.clone()));
        Ok(())
    }

    /// Cases whose current stage belongs to `department`
    ///
    /// Delivered cases have left the lab and are never queued.
    pub fn at_department(&self, department: Department) -> Vec<&Case> {
        self.cases
            .iter()
            .filter(|c| c.final_status != Some(FinalStatus::Delivery))
            .filter(|c| c.current_department() == Some(department))
            .collect()
    }

    /// Register for change notifications
    ///
    /// Meant for embedders that keep a live view, such as a dashboard, in step
    /// with the store inside one process. The `dlt` binary runs one command per
    /// process and never subscribes.
    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (sender, receiver) = crossbeam::channel::unbounded();
        self.subscribers.push(sender);
        receiver
    }

    fn notify(&mut self, event: StoreEvent) {
        self.subscribers
            .retain(|sender| match sender.try_send(event.clone()) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => true,
                Err(TrySendError::Disconnected(_)) => false,
            });
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
