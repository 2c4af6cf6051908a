// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{create_test_self_evaluation, later};
use crate::{DomainError, SelfEvaluationState};
use time::macros::datetime;

#[test]
fn test_new_record_is_draft() {
    let record = create_test_self_evaluation();
    assert_eq!(record.state(), SelfEvaluationState::Draft);
    assert!(record.ensure_editable().is_ok());
}

#[test]
fn test_forward_path_keeps_flags_consistent() {
    let mut record = create_test_self_evaluation();
    let now = datetime!(2026-03-01 10:00 UTC);

    for target in [
        SelfEvaluationState::SubmittedToEvaluator,
        SelfEvaluationState::SubmittedToManager,
        SelfEvaluationState::Completed,
    ] {
        record.validate_transition(record.state(), target).unwrap();
        record.set_state(target, now);
        assert_eq!(record.state(), target);
        assert!(record.flags_consistent());
    }

    assert_eq!(record.submitted_to_evaluator_at, Some(now));
    assert_eq!(record.completed_at, Some(now));
}

#[test]
fn test_skipping_a_state_is_rejected() {
    let record = create_test_self_evaluation();
    assert!(matches!(
        record.validate_transition(
            SelfEvaluationState::Draft,
            SelfEvaluationState::SubmittedToManager
        ),
        Err(DomainError::InvalidTransition { .. })
    ));
    assert!(
        record
            .validate_transition(SelfEvaluationState::Draft, SelfEvaluationState::Completed)
            .is_err()
    );
}

#[test]
fn test_transition_requires_the_source_state() {
    let mut record = create_test_self_evaluation();
    record.set_state(
        SelfEvaluationState::SubmittedToManager,
        datetime!(2026-03-01 10:00 UTC),
    );

    // The reverse edge exists, but not from the draft state.
    let err = record
        .validate_transition(
            SelfEvaluationState::Draft,
            SelfEvaluationState::SubmittedToEvaluator,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::InvalidTransition { ref from, ref to, .. }
            if from == "submitted_to_manager" && to == "submitted_to_evaluator"
    ));
    assert!(
        record
            .validate_transition(
                SelfEvaluationState::SubmittedToManager,
                SelfEvaluationState::SubmittedToEvaluator
            )
            .is_ok()
    );
}

#[test]
fn test_revert_clears_later_timestamps() {
    let mut record = create_test_self_evaluation();
    let now = datetime!(2026-03-01 10:00 UTC);
    record.set_state(SelfEvaluationState::SubmittedToManager, now);

    record
        .validate_transition(
            SelfEvaluationState::SubmittedToManager,
            SelfEvaluationState::SubmittedToEvaluator,
        )
        .unwrap();
    record.set_state(SelfEvaluationState::SubmittedToEvaluator, later(now));

    assert!(record.submitted_to_evaluator);
    assert_eq!(record.submitted_to_evaluator_at, Some(now));
    assert!(!record.submitted_to_manager);
    assert_eq!(record.submitted_to_manager_at, None);
}

#[test]
fn test_submitted_record_is_not_editable() {
    let mut record = create_test_self_evaluation();
    record.set_state(
        SelfEvaluationState::SubmittedToEvaluator,
        datetime!(2026-03-01 10:00 UTC),
    );
    assert!(matches!(
        record.ensure_editable(),
        Err(DomainError::AlreadySubmitted { id: 10, .. })
    ));
}

#[test]
fn test_submission_requires_content_and_score() {
    let mut record = create_test_self_evaluation();
    assert!(record.ensure_submittable(120.0).is_ok());

    record.score = Some(121.0);
    assert!(matches!(
        record.ensure_submittable(120.0),
        Err(DomainError::CannotSubmit { .. })
    ));

    record.score = None;
    assert!(record.ensure_submittable(120.0).is_err());

    record.score = Some(50.0);
    record.content = Some(String::from("   "));
    assert!(record.ensure_submittable(120.0).is_err());
}
