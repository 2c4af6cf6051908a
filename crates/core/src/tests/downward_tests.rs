// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    NOW, create_employee_actor, create_test_actor, create_test_downward_evaluation,
    create_test_period,
};
use crate::{CoreError, DownwardEvaluationCommand, apply_downward_evaluation};
use evalcycle_domain::DomainError;
use time::macros::datetime;

#[test]
fn test_evaluator_completes_own_evaluation() {
    let result = apply_downward_evaluation(
        &create_test_downward_evaluation(),
        DownwardEvaluationCommand::Complete,
        &create_test_period(),
        &create_employee_actor("M1"),
        NOW,
    )
    .unwrap();
    assert!(result.record.is_completed);
    assert_eq!(result.record.completed_at, Some(NOW));
}

#[test]
fn test_other_evaluator_rejected_but_admin_allowed() {
    let record = create_test_downward_evaluation();
    let period = create_test_period();

    let result = apply_downward_evaluation(
        &record,
        DownwardEvaluationCommand::Complete,
        &period,
        &create_employee_actor("M2"),
        NOW,
    );
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::EvaluatorMismatch { .. }
        ))
    ));

    assert!(
        apply_downward_evaluation(
            &record,
            DownwardEvaluationCommand::Complete,
            &period,
            &create_test_actor(),
            NOW,
        )
        .is_ok()
    );
}

#[test]
fn test_changes_after_deadline_rejected() {
    let result = apply_downward_evaluation(
        &create_test_downward_evaluation(),
        DownwardEvaluationCommand::Complete,
        &create_test_period(),
        &create_test_actor(),
        datetime!(2026-06-16 08:00 UTC),
    );
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::PeriodExpired { .. }))
    ));
}

#[test]
fn test_upsert_on_completed_rejected() {
    let mut record = create_test_downward_evaluation();
    record.is_completed = true;

    let result = apply_downward_evaluation(
        &record,
        DownwardEvaluationCommand::Upsert {
            content: None,
            score: Some(10.0),
            self_evaluation_id: None,
        },
        &create_test_period(),
        &create_employee_actor("M1"),
        NOW,
    );
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::AlreadyCompleted { .. }
        ))
    ));
}

#[test]
fn test_complete_without_score_cannot_submit() {
    let mut record = create_test_downward_evaluation();
    record.score = None;

    let result = apply_downward_evaluation(
        &record,
        DownwardEvaluationCommand::Complete,
        &create_test_period(),
        &create_employee_actor("M1"),
        NOW,
    );
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::CannotSubmit { .. }))
    ));
}

#[test]
fn test_reset_of_open_evaluation_is_no_op() {
    let result = apply_downward_evaluation(
        &create_test_downward_evaluation(),
        DownwardEvaluationCommand::Reset,
        &create_test_period(),
        &create_employee_actor("M1"),
        NOW,
    )
    .unwrap();
    assert!(!result.changed);

    let mut completed = create_test_downward_evaluation();
    completed.is_completed = true;
    completed.completed_at = Some(NOW);
    let reopened = apply_downward_evaluation(
        &completed,
        DownwardEvaluationCommand::Reset,
        &create_test_period(),
        &create_employee_actor("M1"),
        NOW,
    )
    .unwrap();
    assert!(reopened.changed);
    assert!(!reopened.record.is_completed);
    assert_eq!(reopened.record.completed_at, None);
}
