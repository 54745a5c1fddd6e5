//! Case lifecycle controller
//!
//! Owns the state machine for a case's workflow: advancing and skipping
//! stages, clinical pauses, and the final disposition. Each operation loads
//! the case, validates it, builds the new value and commits it to the store
//! in one replacement, together with the audit note describing the change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::CaseError;
use crate::core::identity::CaseId;
use crate::core::store::CaseStore;
use crate::core::vocabulary::{FinalStatus, NoteType, PauseReason, Role, StageStatus};
use crate::entities::case::{Case, CaseNote, PauseRecord};

/// The staff member performing an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub name: String,
    pub role: Role,
}

impl Operator {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Tunables for the controller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// Minimum progress (percent) before a final status may be set
    pub final_status_threshold: Option<u8>,
}

/// Lifecycle state machine over a borrowed store
pub struct LifecycleController<'a> {
    store: &'a mut CaseStore,
    config: LifecycleConfig,
    operator: Operator,
}

impl<'a> LifecycleController<'a> {
    pub fn new(store: &'a mut CaseStore, config: LifecycleConfig, operator: Operator) -> Self {
        Self {
            store,
            config,
            operator,
        }
    }

    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    /// Complete the current stage and move to the next pending one
    pub fn advance_stage(&mut self, id: &CaseId) -> Result<Case, CaseError> {
        let mut case = self.store.get_owned(id)?;

        if case.is_paused {
            return Err(reject(id, "case is paused; resume it before advancing"));
        }
        if case.is_complete() {
            return Err(reject(id, "every stage is already finished"));
        }

        let idx = case.current_stage_index;
        if case.workflow[idx].status != StageStatus::InProgress {
            return Err(reject(
                id,
                format!("stage '{}' is not in progress", case.workflow[idx].stage),
            ));
        }

        let now = Utc::now();
        let name = case.workflow[idx].stage.clone();
        case.workflow[idx].status = StageStatus::Completed;
        case.workflow[idx].completed_at = Some(now);
        move_to_next_pending(&mut case);

        let text = match case.current_stage() {
            Some(next) => format!("Completed '{}'; now at '{}'", name, next.stage),
            None => format!("Completed '{}'; workflow finished", name),
        };
        self.push_note(&mut case, &text, NoteType::Update, now);

        tracing::info!(
            case = %id,
            stage = %name,
            index = case.current_stage_index,
            "advanced stage"
        );
        self.commit(id, case)
    }

    /// Mark a stage skipped (admin only)
    ///
    /// A pending stage is skipped in place. Skipping the stage in progress
    /// moves the pointer exactly as [`advance_stage`](Self::advance_stage) does.
    pub fn skip_stage(&mut self, id: &CaseId, stage_index: usize) -> Result<Case, CaseError> {
        if !self.operator.is_admin() {
            tracing::debug!(case = %id, operator = %self.operator.name, "skip refused");
            return Err(CaseError::Unauthorized {
                action: "skipping a stage".to_string(),
                role: self.operator.role,
            });
        }

        let mut case = self.store.get_owned(id)?;
        let len = case.workflow.len();
        if stage_index >= len {
            return Err(CaseError::StageNotFound {
                case: id.clone(),
                index: stage_index,
                len,
            });
        }

        let now = Utc::now();
        let name = case.workflow[stage_index].stage.clone();
        match case.workflow[stage_index].status {
            StageStatus::Pending => {
                case.workflow[stage_index].status = StageStatus::Skipped;
                case.workflow[stage_index].completed_at = Some(now);
            }
            StageStatus::InProgress => {
                if case.is_paused {
                    return Err(reject(id, "case is paused; resume it before skipping"));
                }
                case.workflow[stage_index].status = StageStatus::Skipped;
                case.workflow[stage_index].completed_at = Some(now);
                move_to_next_pending(&mut case);
            }
            status => {
                return Err(reject(id, format!("stage '{}' is already {}", name, status)));
            }
        }

        let text = format!("Skipped '{}' (stage {})", name, stage_index + 1);
        self.push_note(&mut case, &text, NoteType::Update, now);

        tracing::info!(case = %id, stage = %name, "skipped stage");
        self.commit(id, case)
    }

    /// Put the case on hold for a clinical return visit
    pub fn pause_case(&mut self, id: &CaseId, reason: PauseReason) -> Result<Case, CaseError> {
        let mut case = self.store.get_owned(id)?;
        if case.is_paused {
            return Err(reject(id, "case is already paused"));
        }

        let now = Utc::now();
        case.is_paused = true;
        case.pause_history.push(PauseRecord::open(reason, now));

        let text = format!("Case paused for {}", reason.label());
        self.push_note(&mut case, &text, NoteType::Pause, now);

        tracing::info!(case = %id, reason = %reason, "paused case");
        self.commit(id, case)
    }

    /// Release a hold, closing the most recent open pause record
    pub fn resume_case(
        &mut self,
        id: &CaseId,
        return_notes: Option<&str>,
    ) -> Result<Case, CaseError> {
        let mut case = self.store.get_owned(id)?;
        if !case.is_paused {
            return Err(reject(id, "case is not paused"));
        }

        let now = Utc::now();
        let return_notes = return_notes
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        let record = case
            .pause_history
            .iter_mut()
            .rev()
            .find(|p| p.is_open())
            .ok_or_else(|| CaseError::PauseNotFound { case: id.clone() })?;
        record.resumed_at = Some(now);
        record.return_notes = return_notes.clone();
        let reason = record.reason;
        case.is_paused = false;

        let text = match &return_notes {
            Some(notes) => format!("Case resumed after {}: {}", reason.label(), notes),
            None => format!("Case resumed after {}", reason.label()),
        };
        self.push_note(&mut case, &text, NoteType::Resume, now);

        tracing::info!(case = %id, reason = %reason, "resumed case");
        self.commit(id, case)
    }

    /// Record the terminal disposition
    ///
    /// Try-in also pauses the case until the clinic reports back.
    pub fn set_final_status(
        &mut self,
        id: &CaseId,
        status: FinalStatus,
    ) -> Result<Case, CaseError> {
        let mut case = self.store.get_owned(id)?;

        if let Some(threshold) = self.config.final_status_threshold {
            let progress = case.progress_percent();
            if progress < threshold {
                tracing::debug!(case = %id, progress, threshold, "final status gated");
                return Err(CaseError::FinalStatusGate {
                    case: id.clone(),
                    progress,
                    threshold,
                });
            }
        }

        let now = Utc::now();
        let text = match status {
            FinalStatus::TryIn => {
                if case.is_paused {
                    return Err(reject(id, "case is already paused"));
                }
                case.is_paused = true;
                case.pause_history
                    .push(PauseRecord::open(PauseReason::TryIn, now));
                "Final status set to Try-in; case paused until the clinic reports back"
            }
            FinalStatus::Delivery => "Final status set to Delivery",
        };
        case.final_status = Some(status);

        let note_type = match status {
            FinalStatus::TryIn => NoteType::Pause,
            FinalStatus::Delivery => NoteType::Update,
        };
        self.push_note(&mut case, text, note_type, now);

        tracing::info!(case = %id, status = %status, "set final status");
        self.commit(id, case)
    }

    fn push_note(&self, case: &mut Case, text: &str, note_type: NoteType, at: DateTime<Utc>) {
        case.notes
            .push(CaseNote::new(&self.operator.name, text, note_type, at));
    }

    fn commit(&mut self, id: &CaseId, case: Case) -> Result<Case, CaseError> {
        self.store.replace(id, case)?;
        self.store.get_owned(id)
    }
}

/// Move the pointer past the current stage to the next pending one
fn move_to_next_pending(case: &mut Case) {
    let start = case.current_stage_index + 1;
    let next = case
        .workflow
        .iter()
        .enumerate()
        .skip(start)
        .find(|(_, s)| s.status == StageStatus::Pending)
        .map(|(i, _)| i);

    match next {
        Some(i) => {
            case.workflow[i].status = StageStatus::InProgress;
            case.current_stage_index = i;
        }
        None => case.current_stage_index = case.workflow.len(),
    }
}

fn reject(id: &CaseId, reason: impl Into<String>) -> CaseError {
    let err = CaseError::transition(id, reason);
    tracing::debug!(case = %id, error = %err, "transition rejected");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vocabulary::{Category, FixedMaterial, RemovableSubType};
    use crate::entities::case::CaseInput;
    use chrono::NaiveDate;

    fn base_input() -> CaseInput {
        CaseInput {
            doctor_name: "Dr. Ortiz".to_string(),
            patient_name: "J. Doe".to_string(),
            due_date: NaiveDate::from_ymd_opt(2026, 5, 1),
            ..Default::default()
        }
    }

    fn night_guard(store: &mut CaseStore) -> CaseId {
        let mut input = base_input();
        input.category = Some(Category::Removable);
        input.options.removable_sub_type = Some(RemovableSubType::NightGuard);
        store.create(input).unwrap().id
    }

    fn layered(store: &mut CaseStore) -> CaseId {
        let mut input = base_input();
        input.category = Some(Category::Fixed);
        input.options.fixed_material = Some(FixedMaterial::ZirconiaLayered);
        store.create(input).unwrap().id
    }

    fn admin() -> Operator {
        Operator::new("Alex", Role::Admin)
    }

    fn tech() -> Operator {
        Operator::new("Sam", Role::Tech)
    }

    #[test]
    fn test_advance_through_whole_workflow() {
        let mut store = CaseStore::default();
        let id = night_guard(&mut store);
        let mut ctl = LifecycleController::new(&mut store, LifecycleConfig::default(), tech());

        let mut last = 0;
        for _ in 0..6 {
            let case = ctl.advance_stage(&id).unwrap();
            assert!(case.check_invariant());
            assert!(case.progress_percent() >= last);
            last = case.progress_percent();
        }

        let case = store.require(&id).unwrap();
        assert_eq!(case.current_stage_index, 6);
        assert!(case
            .workflow
            .iter()
            .all(|s| s.status == StageStatus::Completed && s.completed_at.is_some()));
        assert_eq!(case.progress_percent(), 100);
        assert_eq!(case.notes.len(), 6);
    }

    #[test]
    fn test_advance_past_end_is_rejected() {
        let mut store = CaseStore::default();
        let id = night_guard(&mut store);
        let mut ctl = LifecycleController::new(&mut store, LifecycleConfig::default(), tech());
        for _ in 0..6 {
            ctl.advance_stage(&id).unwrap();
        }
        let err = ctl.advance_stage(&id).unwrap_err();
        assert!(matches!(err, CaseError::InvalidTransition { .. }));
    }

    #[test]
    fn test_advance_while_paused_changes_nothing() {
        let mut store = CaseStore::default();
        let id = night_guard(&mut store);
        let mut ctl = LifecycleController::new(&mut store, LifecycleConfig::default(), tech());
        let paused = ctl.pause_case(&id, PauseReason::BiteRegistration).unwrap();

        let err = ctl.advance_stage(&id).unwrap_err();
        assert!(matches!(err, CaseError::InvalidTransition { .. }));
        assert_eq!(store.require(&id).unwrap(), &paused);
    }

    #[test]
    fn test_pause_resume_closes_one_record() {
        let mut store = CaseStore::default();
        let id = layered(&mut store);
        let mut ctl = LifecycleController::new(&mut store, LifecycleConfig::default(), tech());

        ctl.pause_case(&id, PauseReason::TryIn).unwrap();
        let case = ctl.resume_case(&id, Some("patient approved")).unwrap();

        assert!(!case.is_paused);
        assert_eq!(case.pause_history.len(), 1);
        let record = &case.pause_history[0];
        assert_eq!(record.reason, PauseReason::TryIn);
        assert!(record.resumed_at.is_some());
        assert_eq!(record.return_notes.as_deref(), Some("patient approved"));

        let types: Vec<NoteType> = case.notes.iter().map(|n| n.note_type).collect();
        assert_eq!(types, vec![NoteType::Pause, NoteType::Resume]);
        assert_eq!(case.notes[1].author, "Sam");
    }

    #[test]
    fn test_double_pause_rejected() {
        let mut store = CaseStore::default();
        let id = layered(&mut store);
        let mut ctl = LifecycleController::new(&mut store, LifecycleConfig::default(), tech());
        ctl.pause_case(&id, PauseReason::SpecialTray).unwrap();
        assert!(ctl.pause_case(&id, PauseReason::TryIn).is_err());
        assert_eq!(store.require(&id).unwrap().pause_history.len(), 1);
    }

    #[test]
    fn test_resume_unpaused_rejected() {
        let mut store = CaseStore::default();
        let id = layered(&mut store);
        let mut ctl = LifecycleController::new(&mut store, LifecycleConfig::default(), tech());
        assert!(matches!(
            ctl.resume_case(&id, None),
            Err(CaseError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_try_in_pauses_case() {
        let mut store = CaseStore::default();
        let id = layered(&mut store);
        let mut ctl = LifecycleController::new(&mut store, LifecycleConfig::default(), tech());

        let case = ctl.set_final_status(&id, FinalStatus::TryIn).unwrap();
        assert_eq!(case.final_status, Some(FinalStatus::TryIn));
        assert!(case.is_paused);
        let open = case.open_pause().unwrap();
        assert_eq!(open.reason, PauseReason::TryIn);
    }

    #[test]
    fn test_try_in_on_paused_case_rejected() {
        let mut store = CaseStore::default();
        let id = layered(&mut store);
        let mut ctl = LifecycleController::new(&mut store, LifecycleConfig::default(), tech());
        ctl.pause_case(&id, PauseReason::BiteRegistration).unwrap();
        assert!(ctl.set_final_status(&id, FinalStatus::TryIn).is_err());
        assert!(ctl.set_final_status(&id, FinalStatus::Delivery).is_ok());
    }

    #[test]
    fn test_final_status_gate() {
        let mut store = CaseStore::default();
        let id = layered(&mut store);
        let config = LifecycleConfig {
            final_status_threshold: Some(90),
        };
        let mut ctl = LifecycleController::new(&mut store, config, tech());
        let err = ctl.set_final_status(&id, FinalStatus::Delivery).unwrap_err();
        assert_eq!(
            err,
            CaseError::FinalStatusGate {
                case: id.clone(),
                progress: 0,
                threshold: 90
            }
        );
    }

    #[test]
    fn test_skip_requires_admin() {
        let mut store = CaseStore::default();
        let id = layered(&mut store);
        let mut ctl = LifecycleController::new(&mut store, LifecycleConfig::default(), tech());
        assert!(matches!(
            ctl.skip_stage(&id, 3),
            Err(CaseError::Unauthorized { role: Role::Tech, .. })
        ));
    }

    #[test]
    fn test_skip_pending_keeps_pointer() {
        let mut store = CaseStore::default();
        let id = layered(&mut store);
        let mut ctl = LifecycleController::new(&mut store, LifecycleConfig::default(), admin());

        let case = ctl.skip_stage(&id, 5).unwrap();
        assert_eq!(case.current_stage_index, 0);
        assert_eq!(case.workflow[5].status, StageStatus::Skipped);
        assert!(case.check_invariant());

        // Advancing walks over the skipped stage
        for _ in 0..5 {
            ctl.advance_stage(&id).unwrap();
        }
        let case = store.require(&id).unwrap();
        assert_eq!(case.current_stage_index, 6);
        assert!(case.check_invariant());
    }

    #[test]
    fn test_skip_current_advances() {
        let mut store = CaseStore::default();
        let id = night_guard(&mut store);
        let mut ctl = LifecycleController::new(&mut store, LifecycleConfig::default(), admin());
        ctl.advance_stage(&id).unwrap();
        ctl.advance_stage(&id).unwrap();

        let case = ctl.skip_stage(&id, 2).unwrap();
        assert_eq!(case.workflow[2].status, StageStatus::Skipped);
        assert_eq!(case.workflow[3].status, StageStatus::InProgress);
        assert_eq!(case.current_stage_index, 3);
    }

    #[test]
    fn test_skip_completed_and_out_of_range() {
        let mut store = CaseStore::default();
        let id = night_guard(&mut store);
        let mut ctl = LifecycleController::new(&mut store, LifecycleConfig::default(), admin());
        ctl.advance_stage(&id).unwrap();

        assert!(matches!(
            ctl.skip_stage(&id, 0),
            Err(CaseError::InvalidTransition { .. })
        ));
        assert!(matches!(
            ctl.skip_stage(&id, 6),
            Err(CaseError::StageNotFound { index: 6, len: 6, .. })
        ));
    }

    #[test]
    fn test_unknown_case() {
        let mut store = CaseStore::default();
        let mut ctl = LifecycleController::new(&mut store, LifecycleConfig::default(), admin());
        let id: CaseId = "DL-2026-0404".parse().unwrap();
        assert!(ctl.advance_stage(&id).unwrap_err().is_not_found());
    }
}
