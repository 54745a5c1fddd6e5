//! Case entity - a single dental-lab work order and its production workflow

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::classification::{Classification, ClassificationOptions};
use crate::core::identity::{CaseId, RecordId, RecordPrefix};
use crate::core::vocabulary::{
    AttachmentKind, Category, Department, FinalStatus, NoteType, PauseReason, Priority,
    StageStatus,
};

/// One production step bound to a case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// `stage-<n>`, unique within the case
    pub id: String,

    /// Display name
    pub stage: String,

    pub department: Department,

    #[serde(default)]
    pub status: StageStatus,

    /// Set when the stage is completed or skipped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Stage {
    /// Create a pending stage at zero-based position `idx`
    pub fn new(idx: usize, name: &str, department: Department) -> Self {
        Self {
            id: format!("stage-{}", idx + 1),
            stage: name.to_string(),
            department,
            status: StageStatus::Pending,
            completed_at: None,
        }
    }
}

/// A clinical hold, opened on pause and closed on resume
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseRecord {
    pub id: RecordId,
    pub reason: PauseReason,
    pub paused_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resumed_at: Option<DateTime<Utc>>,

    /// What happened at the return visit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_notes: Option<String>,
}

impl PauseRecord {
    pub fn open(reason: PauseReason, at: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::new(RecordPrefix::Pause),
            reason,
            paused_at: at,
            resumed_at: None,
            return_notes: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.resumed_at.is_none()
    }
}

/// Audit trail entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseNote {
    pub id: RecordId,
    pub author: String,
    pub note: String,

    #[serde(default)]
    pub note_type: NoteType,

    pub timestamp: DateTime<Utc>,
}

impl CaseNote {
    pub fn new(author: &str, note: &str, note_type: NoteType, at: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::new(RecordPrefix::Note),
            author: author.to_string(),
            note: note.to_string(),
            note_type,
            timestamp: at,
        }
    }
}

/// Reference to a file held by external storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: RecordId,
    pub name: String,

    /// Opaque locator; never dereferenced here
    pub url: String,

    #[serde(default, rename = "type")]
    pub kind: AttachmentKind,

    pub uploaded_at: DateTime<Utc>,
    pub uploaded_by: String,
}

impl Attachment {
    pub fn new(name: &str, url: &str, kind: AttachmentKind, uploaded_by: &str) -> Self {
        Self {
            id: RecordId::new(RecordPrefix::Att),
            name: name.to_string(),
            url: url.to_string(),
            kind,
            uploaded_at: Utc::now(),
            uploaded_by: uploaded_by.to_string(),
        }
    }
}

/// Fields supplied when a case is created
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseInput {
    pub category: Option<Category>,

    #[serde(flatten)]
    pub options: ClassificationOptions,

    pub is_custom_product: bool,
    pub custom_steps: Vec<String>,
    pub priority: Priority,

    pub doctor_name: String,
    pub patient_name: String,
    pub due_date: Option<NaiveDate>,

    pub tooth_numbers: Vec<String>,
    pub shade: Option<String>,
    pub special_instructions: Option<String>,
}

/// Where a case sits in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseState {
    Active,
    Paused,
    Finalized(FinalStatus),
}

impl std::fmt::Display for CaseState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseState::Active => write!(f, "active"),
            CaseState::Paused => write!(f, "paused"),
            CaseState::Finalized(status) => write!(f, "finalized({})", status),
        }
    }
}

/// A dental-lab case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    pub id: CaseId,
    pub category: Category,
    pub classification: Classification,

    #[serde(default)]
    pub is_custom_product: bool,

    #[serde(default)]
    pub priority: Priority,

    pub doctor_name: String,
    pub patient_name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tooth_numbers: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shade: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,

    pub date_received: DateTime<Utc>,
    pub due_date: NaiveDate,

    pub workflow: Vec<Stage>,

    #[serde(default)]
    pub current_stage_index: usize,

    #[serde(default)]
    pub is_paused: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pause_history: Vec<PauseRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_status: Option<FinalStatus>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<CaseNote>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,

    /// Number of committed replacements
    #[serde(default)]
    pub revision: u64,
}

impl Case {
    pub fn state(&self) -> CaseState {
        match (self.final_status, self.is_paused) {
            (Some(status), _) => CaseState::Finalized(status),
            (None, true) => CaseState::Paused,
            (None, false) => CaseState::Active,
        }
    }

    /// Stages that are completed or skipped
    pub fn completed_count(&self) -> usize {
        self.workflow
            .iter()
            .filter(|s| s.status.is_terminal())
            .count()
    }

    /// Rounded percentage of terminal stages
    pub fn progress_percent(&self) -> u8 {
        if self.workflow.is_empty() {
            return 0;
        }
        let pct = (100.0 * self.completed_count() as f64 / self.workflow.len() as f64).round();
        pct as u8
    }

    pub fn current_stage(&self) -> Option<&Stage> {
        self.workflow.get(self.current_stage_index)
    }

    pub fn is_complete(&self) -> bool {
        self.current_stage_index >= self.workflow.len()
    }

    /// Department currently holding the case, if any work remains
    pub fn current_department(&self) -> Option<Department> {
        self.current_stage().map(|s| s.department)
    }

    /// Most recent pause record that has not been resumed
    pub fn open_pause(&self) -> Option<&PauseRecord> {
        self.pause_history.iter().rev().find(|p| p.is_open())
    }

    /// Days until due (negative when overdue)
    pub fn days_until_due(&self, today: NaiveDate) -> i64 {
        (self.due_date - today).num_days()
    }

    /// Check the stage-pointer invariant
    ///
    /// Stages before the pointer are terminal, the stage at the pointer is the
    /// only one in progress, and stages after it are pending or skipped.
    pub fn check_invariant(&self) -> bool {
        let idx = self.current_stage_index;
        if idx > self.workflow.len() {
            return false;
        }
        self.workflow.iter().enumerate().all(|(i, s)| {
            if i < idx {
                s.status.is_terminal()
            } else if i == idx {
                s.status == StageStatus::InProgress
            } else {
                matches!(s.status, StageStatus::Pending | StageStatus::Skipped)
            }
        })
    }
}
