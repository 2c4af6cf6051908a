// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::test_meta;
use crate::{
    DomainError, DownwardEvaluation, DownwardEvaluationType, FinalEvaluation,
    FinalEvaluationGrades, JobDetailedGrade, JobGrade,
};

fn downward(score: Option<f64>) -> DownwardEvaluation {
    DownwardEvaluation {
        id: 5,
        period_id: 1,
        evaluator_id: String::from("mgr-1"),
        employee_id: String::from("emp-1"),
        evaluation_type: DownwardEvaluationType::Primary,
        work_item_id: None,
        self_evaluation_id: Some(10),
        content: Some(String::from("Reliable")),
        score,
        is_completed: false,
        completed_at: None,
        meta: test_meta(),
    }
}

fn final_evaluation(is_confirmed: bool) -> FinalEvaluation {
    FinalEvaluation {
        id: 3,
        employee_id: String::from("emp-1"),
        period_id: 1,
        evaluation_grade: String::from("A"),
        job_grade: JobGrade::T2,
        job_detailed_grade: JobDetailedGrade::Normal,
        final_comments: None,
        is_confirmed,
        confirmed_at: None,
        confirmed_by: None,
        meta: test_meta(),
    }
}

#[test]
fn test_only_the_evaluator_or_admin_may_edit_downward() {
    let record = downward(Some(70.0));

    assert!(record.ensure_evaluator("mgr-1", false).is_ok());
    assert!(record.ensure_evaluator("admin-1", true).is_ok());
    assert_eq!(
        record.ensure_evaluator("mgr-2", false),
        Err(DomainError::EvaluatorMismatch {
            expected: String::from("mgr-1"),
            actual: String::from("mgr-2"),
        })
    );
}

#[test]
fn test_completed_downward_rejects_edits() {
    let mut record = downward(Some(70.0));
    assert!(record.ensure_not_completed().is_ok());

    record.is_completed = true;

    assert!(matches!(
        record.ensure_not_completed(),
        Err(DomainError::AlreadyCompleted { id: 5, .. })
    ));
}

#[test]
fn test_downward_completion_needs_score_in_range() {
    assert!(downward(Some(100.0)).ensure_completable(100.0).is_ok());
    assert!(matches!(
        downward(None).ensure_completable(100.0),
        Err(DomainError::CannotSubmit { .. })
    ));
    assert!(matches!(
        downward(Some(101.0)).ensure_completable(100.0),
        Err(DomainError::CannotSubmit { .. })
    ));
}

#[test]
fn test_confirmed_final_evaluation_is_immutable() {
    assert!(final_evaluation(false).ensure_mutable().is_ok());
    assert_eq!(
        final_evaluation(true).ensure_mutable(),
        Err(DomainError::ConfirmedEvaluationModification { id: 3 })
    );
}

#[test]
fn test_blank_grade_is_rejected() {
    let grades = FinalEvaluationGrades {
        evaluation_grade: String::from("  "),
        job_grade: JobGrade::T1,
        job_detailed_grade: JobDetailedGrade::Upper,
        final_comments: None,
    };

    assert!(matches!(
        grades.validate(),
        Err(DomainError::InvalidValue { kind: "evaluation grade", .. })
    ));
}
