//! Errors raised by the case workflow engine
//!
//! Every variant is a deterministic precondition failure: the store is left
//! untouched and nothing is retried.

use miette::Diagnostic;
use thiserror::Error;

use crate::core::identity::CaseId;
use crate::core::vocabulary::Role;

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum CaseError {
    #[error("Missing required fields: {}", fields.join(", "))]
    #[diagnostic(
        code(dlt::case::validation),
        help("doctor name, patient name and due date are required")
    )]
    Validation { fields: Vec<String> },

    #[error("Invalid classification: {0}")]
    #[diagnostic(
        code(dlt::case::classification),
        help("run `dlt workflow preview --help` to see the accepted values")
    )]
    InvalidClassification(String),

    #[error("Case not found: {0}")]
    #[diagnostic(code(dlt::case::not_found))]
    CaseNotFound(String),

    #[error("Case {case} has no stage {index} (workflow has {len} stages)")]
    #[diagnostic(code(dlt::case::stage_not_found))]
    StageNotFound {
        case: CaseId,
        index: usize,
        len: usize,
    },

    #[error("Case {case} has no attachment {attachment}")]
    #[diagnostic(code(dlt::case::attachment_not_found))]
    AttachmentNotFound { case: CaseId, attachment: String },

    #[error("Case {case} has no open pause record")]
    #[diagnostic(code(dlt::case::pause_not_found))]
    PauseNotFound { case: CaseId },

    #[error("Invalid transition for {case}: {reason}")]
    #[diagnostic(code(dlt::case::invalid_transition))]
    InvalidTransition { case: CaseId, reason: String },

    #[error("{action} requires the admin role (current role: {role})")]
    #[diagnostic(code(dlt::case::unauthorized))]
    Unauthorized { action: String, role: Role },

    #[error("Case {case} is {progress}% complete; final status requires {threshold}%")]
    #[diagnostic(code(dlt::case::final_status_gate))]
    FinalStatusGate {
        case: CaseId,
        progress: u8,
        threshold: u8,
    },
}

impl CaseError {
    pub(crate) fn transition(case: &CaseId, reason: impl Into<String>) -> Self {
        CaseError::InvalidTransition {
            case: case.clone(),
            reason: reason.into(),
        }
    }

    /// True for the not-found family (case, stage, attachment, pause record)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CaseError::CaseNotFound(_)
                | CaseError::StageNotFound { .. }
                | CaseError::AttachmentNotFound { .. }
                | CaseError::PauseNotFound { .. }
        )
    }

    /// True for input validation failures
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CaseError::Validation { .. } | CaseError::InvalidClassification(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_fields() {
        let err = CaseError::Validation {
            fields: vec!["doctor_name".to_string(), "due_date".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required fields: doctor_name, due_date"
        );
        assert!(err.is_validation());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found_family() {
        let case: CaseId = "DL-2026-0001".parse().unwrap();
        assert!(CaseError::CaseNotFound("DL-2026-0009".to_string()).is_not_found());
        assert!(CaseError::PauseNotFound { case: case.clone() }.is_not_found());
        assert!(CaseError::StageNotFound {
            case,
            index: 9,
            len: 5
        }
        .is_not_found());
    }

    #[test]
    fn test_diagnostic_code() {
        let err = CaseError::CaseNotFound("DL-2026-0009".to_string());
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("dlt::case::not_found"));
    }
}
