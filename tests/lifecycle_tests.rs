//! Lifecycle scenarios and properties exercised through the library API

use chrono::NaiveDate;
use dlt::core::attachments::{add_attachment, remove_attachment};
use dlt::core::audit;
use dlt::core::vocabulary::{
    AttachmentKind, Category, FinalStatus, FixedMaterial, FixedSupport, NoteType,
    OrthodonticsType, PauseReason, RemovableSubType, Role, StageStatus,
};
use dlt::core::{
    generate, CaseError, CaseId, CaseStore, Classification, ClassificationOptions,
    LifecycleConfig, LifecycleController, Operator, StoreEvent,
};
use dlt::entities::{Attachment, CaseInput};
use proptest::prelude::*;

fn input(category: Category, options: ClassificationOptions) -> CaseInput {
    CaseInput {
        category: Some(category),
        options,
        doctor_name: "Dr. Lee".to_string(),
        patient_name: "A. Patient".to_string(),
        due_date: NaiveDate::from_ymd_opt(2030, 1, 15),
        ..Default::default()
    }
}

fn night_guard() -> CaseInput {
    input(
        Category::Removable,
        ClassificationOptions {
            removable_sub_type: Some(RemovableSubType::NightGuard),
            ..Default::default()
        },
    )
}

fn layered_crown() -> CaseInput {
    input(
        Category::Fixed,
        ClassificationOptions {
            fixed_material: Some(FixedMaterial::ZirconiaLayered),
            ..Default::default()
        },
    )
}

fn admin() -> Operator {
    Operator::new("admin", Role::Admin)
}

fn tech() -> Operator {
    Operator::new("tech", Role::Tech)
}

// ============================================================================
// End-to-end Scenarios
// ============================================================================

#[test]
fn test_case_runs_to_delivery() {
    let mut store = CaseStore::default();
    let id = store.create(night_guard()).unwrap().id;
    let stages = store.require(&id).unwrap().workflow.len();

    let mut ctl = LifecycleController::new(&mut store, LifecycleConfig::default(), tech());
    let mut last = None;
    for _ in 0..stages {
        last = Some(ctl.advance_stage(&id).unwrap());
    }
    let case = last.unwrap();
    assert!(case.is_complete());
    assert_eq!(case.progress_percent(), 100);
    assert!(case.current_stage().is_none());

    let err = ctl.advance_stage(&id).unwrap_err();
    assert!(matches!(err, CaseError::InvalidTransition { .. }));

    let case = ctl.set_final_status(&id, FinalStatus::Delivery).unwrap();
    assert_eq!(case.final_status, Some(FinalStatus::Delivery));
    assert!(!case.is_paused);
}

#[test]
fn test_try_in_round_trip_then_delivery() {
    let mut store = CaseStore::default();
    let id = store.create(layered_crown()).unwrap().id;

    let mut ctl = LifecycleController::new(&mut store, LifecycleConfig::default(), tech());
    for _ in 0..4 {
        ctl.advance_stage(&id).unwrap();
    }

    let case = ctl.set_final_status(&id, FinalStatus::TryIn).unwrap();
    assert!(case.is_paused);
    assert_eq!(case.open_pause().map(|p| p.reason), Some(PauseReason::TryIn));
    assert!(ctl.advance_stage(&id).is_err());

    let case = ctl.resume_case(&id, Some("Fit is good")).unwrap();
    assert!(!case.is_paused);
    assert_eq!(
        case.pause_history[0].return_notes.as_deref(),
        Some("Fit is good")
    );

    let case = ctl.advance_stage(&id).unwrap();
    assert_eq!(case.current_stage_index, 5);

    let case = ctl.set_final_status(&id, FinalStatus::Delivery).unwrap();
    assert_eq!(case.final_status, Some(FinalStatus::Delivery));
}

#[test]
fn test_skip_current_stage_moves_pointer() {
    let mut store = CaseStore::default();
    let id = store.create(layered_crown()).unwrap().id;

    let mut ctl = LifecycleController::new(&mut store, LifecycleConfig::default(), admin());
    ctl.advance_stage(&id).unwrap();
    let case = ctl.skip_stage(&id, 1).unwrap();

    assert_eq!(case.workflow[1].status, StageStatus::Skipped);
    assert_eq!(case.current_stage_index, 2);
    assert_eq!(case.workflow[2].status, StageStatus::InProgress);
    assert_eq!(case.completed_count(), 2);
    assert!(case.check_invariant());
}

#[test]
fn test_advance_passes_over_skipped_stages() {
    let mut store = CaseStore::default();
    let id = store.create(layered_crown()).unwrap().id;

    let mut ctl = LifecycleController::new(&mut store, LifecycleConfig::default(), admin());
    ctl.skip_stage(&id, 1).unwrap();
    ctl.skip_stage(&id, 2).unwrap();
    let case = ctl.advance_stage(&id).unwrap();

    assert_eq!(case.current_stage_index, 3);
    assert_eq!(case.workflow[3].status, StageStatus::InProgress);
    assert!(case.check_invariant());
}

#[test]
fn test_tech_cannot_skip_and_case_is_untouched() {
    let mut store = CaseStore::default();
    let id = store.create(layered_crown()).unwrap().id;
    let before = store.require(&id).unwrap().clone();

    let err = LifecycleController::new(&mut store, LifecycleConfig::default(), tech())
        .skip_stage(&id, 1)
        .unwrap_err();
    assert!(matches!(err, CaseError::Unauthorized { role: Role::Tech, .. }));
    assert_eq!(store.require(&id).unwrap(), &before);
}

#[test]
fn test_skip_out_of_range_stage() {
    let mut store = CaseStore::default();
    let id = store.create(night_guard()).unwrap().id;

    let err = LifecycleController::new(&mut store, LifecycleConfig::default(), admin())
        .skip_stage(&id, 99)
        .unwrap_err();
    assert!(matches!(err, CaseError::StageNotFound { index: 99, .. }));
    assert!(err.is_not_found());
}

#[test]
fn test_final_status_gate() {
    let mut store = CaseStore::default();
    let id = store.create(night_guard()).unwrap().id;
    let config = LifecycleConfig {
        final_status_threshold: Some(90),
    };

    let mut ctl = LifecycleController::new(&mut store, config, tech());
    let err = ctl
        .set_final_status(&id, FinalStatus::Delivery)
        .unwrap_err();
    assert!(matches!(err, CaseError::FinalStatusGate { progress: 0, threshold: 90, .. }));

    while ctl.advance_stage(&id).is_ok() {}
    assert!(ctl.set_final_status(&id, FinalStatus::Delivery).is_ok());
}

#[test]
fn test_unknown_case_is_not_found() {
    let mut store = CaseStore::default();
    let id: CaseId = "DL-2030-0042".parse().unwrap();
    let err = LifecycleController::new(&mut store, LifecycleConfig::default(), tech())
        .advance_stage(&id)
        .unwrap_err();
    assert!(matches!(err, CaseError::CaseNotFound(_)));
}

#[test]
fn test_audit_trail_records_transitions() {
    let mut store = CaseStore::default();
    let id = store.create(night_guard()).unwrap().id;

    {
        let mut ctl = LifecycleController::new(&mut store, LifecycleConfig::default(), tech());
        ctl.pause_case(&id, PauseReason::SpecialTray).unwrap();
        ctl.resume_case(&id, None).unwrap();
        ctl.advance_stage(&id).unwrap();
    }
    audit::add_note(&mut store, &id, "front desk", "Doctor called", NoteType::Feedback).unwrap();

    let all = audit::notes(&store, &id, None).unwrap();
    assert_eq!(all.len(), 4);
    assert!(all.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert_eq!(all[0].note_type, NoteType::Pause);
    assert_eq!(all[1].note_type, NoteType::Resume);
    assert_eq!(all[0].author, "tech");

    let feedback = audit::notes(&store, &id, Some(NoteType::Feedback)).unwrap();
    assert_eq!(feedback.len(), 1);
    assert_eq!(feedback[0].note, "Doctor called");

    let history = audit::pause_history(&store, &id).unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].resumed_at.is_some());
    assert!(audit::open_pause(&store, &id).unwrap().is_none());
}

#[test]
fn test_attachments_round_trip_through_store() {
    let mut store = CaseStore::default();
    let id = store.create(night_guard()).unwrap().id;

    let att = Attachment::new("upper.stl", "s3://lab/upper.stl", AttachmentKind::File, "tech");
    let added = add_attachment(&mut store, &id, att.clone()).unwrap();
    assert_eq!(store.require(&id).unwrap().attachments.len(), 1);

    // Same reference twice is rejected
    assert!(add_attachment(&mut store, &id, att).unwrap_err().is_validation());

    let removed = remove_attachment(&mut store, &id, &added.id.to_string()).unwrap();
    assert_eq!(removed.name, "upper.stl");
    assert!(store.require(&id).unwrap().attachments.is_empty());

    let err = remove_attachment(&mut store, &id, &added.id.to_string()).unwrap_err();
    assert!(matches!(err, CaseError::AttachmentNotFound { .. }));
}

#[test]
fn test_subscribers_see_creates_and_updates() {
    let mut store = CaseStore::default();
    let events = store.subscribe();

    let id = store.create(night_guard()).unwrap().id;
    LifecycleController::new(&mut store, LifecycleConfig::default(), tech())
        .advance_stage(&id)
        .unwrap();

    let received: Vec<StoreEvent> = events.try_iter().collect();
    assert_eq!(
        received,
        vec![StoreEvent::Created(id.clone()), StoreEvent::Updated(id)]
    );
}

#[test]
fn test_snapshot_restores_sequence() {
    let mut store = CaseStore::default();
    store.create(night_guard()).unwrap();
    store.create(layered_crown()).unwrap();

    let mut restored = CaseStore::from_snapshot(store.snapshot(), "DL");
    assert_eq!(restored.len(), 2);
    let third = restored.create(night_guard()).unwrap();
    assert_eq!(third.id.sequence(), 3);
}

// ============================================================================
// Properties
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Advance,
    Skip(usize),
    Pause(PauseReason),
    Resume,
    TryIn,
    Deliver,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Advance),
        2 => (0usize..12).prop_map(Op::Skip),
        1 => prop_oneof![
            Just(PauseReason::TryIn),
            Just(PauseReason::SpecialTray),
            Just(PauseReason::BiteRegistration),
        ]
        .prop_map(Op::Pause),
        1 => Just(Op::Resume),
        1 => Just(Op::TryIn),
        1 => Just(Op::Deliver),
    ]
}

fn intake_strategy() -> impl Strategy<Value = CaseInput> {
    prop_oneof![
        prop_oneof![
            Just(FixedMaterial::Zirconia),
            Just(FixedMaterial::ZirconiaLayered),
            Just(FixedMaterial::Emax),
            Just(FixedMaterial::Pfm),
            Just(FixedMaterial::Pmma),
            Just(FixedMaterial::Composite),
        ]
        .prop_flat_map(|material| {
            prop_oneof![Just(FixedSupport::ToothSupported), Just(FixedSupport::Implant)].prop_map(
                move |support| {
                    input(
                        Category::Fixed,
                        ClassificationOptions {
                            fixed_material: Some(material),
                            fixed_support: Some(support),
                            ..Default::default()
                        },
                    )
                },
            )
        }),
        prop_oneof![
            Just(RemovableSubType::FullDenture),
            Just(RemovableSubType::PartialDenture),
            Just(RemovableSubType::NightGuard),
            Just(RemovableSubType::AddTooth),
        ]
        .prop_map(|sub_type| {
            input(
                Category::Removable,
                ClassificationOptions {
                    removable_sub_type: Some(sub_type),
                    tooth_count: Some(1),
                    ..Default::default()
                },
            )
        }),
        prop_oneof![
            Just(OrthodonticsType::HawleyRetainer),
            Just(OrthodonticsType::EssixRetainer),
            Just(OrthodonticsType::Expander),
            Just(OrthodonticsType::SpaceMaintainer),
        ]
        .prop_map(|appliance| {
            input(
                Category::Orthodontics,
                ClassificationOptions {
                    orthodontics_type: Some(appliance),
                    ..Default::default()
                },
            )
        }),
    ]
}

proptest! {
    #[test]
    fn prop_generation_is_deterministic(intake in intake_strategy()) {
        let classification = Classification::resolve(
            intake.category,
            &intake.options,
            intake.is_custom_product,
            &intake.custom_steps,
        ).unwrap();
        let first = generate(&classification).unwrap();
        let second = generate(&classification).unwrap();
        prop_assert!(!first.is_empty());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_transitions_preserve_invariants(
        intake in intake_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..40),
    ) {
        let mut store = CaseStore::default();
        let id = store.create(intake).unwrap().id;
        let mut before = store.require(&id).unwrap().clone();

        for op in ops {
            let result = {
                let mut ctl =
                    LifecycleController::new(&mut store, LifecycleConfig::default(), admin());
                match &op {
                    Op::Advance => ctl.advance_stage(&id),
                    Op::Skip(idx) => ctl.skip_stage(&id, *idx),
                    Op::Pause(reason) => ctl.pause_case(&id, *reason),
                    Op::Resume => ctl.resume_case(&id, Some("back")),
                    Op::TryIn => ctl.set_final_status(&id, FinalStatus::TryIn),
                    Op::Deliver => ctl.set_final_status(&id, FinalStatus::Delivery),
                }
            };
            let stored = store.require(&id).unwrap().clone();

            match result {
                Ok(after) => {
                    prop_assert_eq!(&after, &stored);
                    prop_assert!(after.check_invariant(), "{:?} broke the invariant", op);
                    prop_assert!(after.completed_count() >= before.completed_count());
                    prop_assert!(after.progress_percent() >= before.progress_percent());
                    prop_assert_eq!(after.revision, before.revision + 1);
                    prop_assert!(after.notes.len() > before.notes.len());

                    let open = after.pause_history.iter().filter(|p| p.is_open()).count();
                    prop_assert!(open <= 1);
                    prop_assert_eq!(after.is_paused, open == 1);
                    before = after;
                }
                Err(_) => {
                    // Rejected operations leave the stored case as it was
                    prop_assert_eq!(&stored, &before);
                }
            }
        }
    }
}
