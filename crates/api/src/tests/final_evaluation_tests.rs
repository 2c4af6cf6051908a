// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use evalcycle_domain::{JobDetailedGrade, JobGrade};

use crate::tests::helpers::{
    PERIOD, create_test_admin, create_test_evaluator, create_test_service,
    final_evaluation_request,
};
use crate::{ApiError, ErrorCode, FinalEvaluationFromScoreRequest};

fn from_score(score: f64) -> FinalEvaluationFromScoreRequest {
    FinalEvaluationFromScoreRequest {
        employee_id: String::from("emp-1"),
        period_id: PERIOD,
        score,
        job_grade: JobGrade::T3,
        job_detailed_grade: JobDetailedGrade::Upper,
        final_comments: Some(String::from("Strong year")),
    }
}

#[test]
fn test_upsert_creates_then_updates() {
    let mut service = create_test_service();
    let admin = create_test_admin();

    let created = service
        .upsert_final_evaluation(&admin, &final_evaluation_request("emp-1", "B"))
        .unwrap();
    let updated = service
        .upsert_final_evaluation(&admin, &final_evaluation_request("emp-1", "A"))
        .unwrap();

    assert_eq!(created.id, updated.id);
    assert_eq!(updated.evaluation_grade, "A");
    assert!(!updated.is_confirmed);
    assert_eq!(service.list_final_evaluations(PERIOD).unwrap().len(), 1);
}

#[test]
fn test_grade_is_derived_from_score() {
    let mut service = create_test_service();
    let admin = create_test_admin();

    let high = service
        .upsert_final_evaluation_from_score(&admin, &from_score(85.0))
        .unwrap();
    assert_eq!(high.evaluation_grade, "A");
    assert_eq!(high.job_grade, JobGrade::T3);

    let low = service
        .upsert_final_evaluation_from_score(&admin, &from_score(79.0))
        .unwrap();
    assert_eq!(low.evaluation_grade, "B");
}

#[test]
fn test_score_between_ranges_has_no_grade() {
    let mut service = create_test_service();

    let err = service
        .upsert_final_evaluation_from_score(&create_test_admin(), &from_score(79.5))
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::ValidationError);
    assert!(service.get_final_evaluation("emp-1", PERIOD).unwrap().is_none());
}

#[test]
fn test_confirmed_evaluation_is_frozen() {
    let mut service = create_test_service();
    let admin = create_test_admin();
    let record = service
        .upsert_final_evaluation(&admin, &final_evaluation_request("emp-1", "B"))
        .unwrap();

    let confirmed = service.confirm_final_evaluation(&admin, record.id).unwrap();
    assert!(confirmed.is_confirmed);
    assert_eq!(confirmed.confirmed_by.as_deref(), Some("admin-1"));
    assert!(confirmed.confirmed_at.is_some());

    let err = service
        .upsert_final_evaluation(&admin, &final_evaluation_request("emp-1", "A"))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyConfirmed);
    let delete = service.delete_final_evaluation(&admin, record.id).unwrap_err();
    assert_eq!(delete.code(), ErrorCode::AlreadyConfirmed);

    let stored = service.get_final_evaluation("emp-1", PERIOD).unwrap().unwrap();
    assert_eq!(stored.evaluation_grade, "B");
}

#[test]
fn test_confirming_twice_is_rejected() {
    let mut service = create_test_service();
    let admin = create_test_admin();
    let record = service
        .upsert_final_evaluation(&admin, &final_evaluation_request("emp-1", "B"))
        .unwrap();
    service.confirm_final_evaluation(&admin, record.id).unwrap();

    let err = service
        .confirm_final_evaluation(&admin, record.id)
        .unwrap_err();

    assert!(matches!(err, ApiError::AlreadyConfirmed { id } if id == record.id));
}

#[test]
fn test_cancel_requires_confirmation() {
    let mut service = create_test_service();
    let admin = create_test_admin();
    let record = service
        .upsert_final_evaluation(&admin, &final_evaluation_request("emp-1", "B"))
        .unwrap();

    let err = service
        .cancel_final_evaluation_confirmation(&admin, record.id)
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::NotConfirmed);
}

#[test]
fn test_cancelled_confirmation_allows_edits() {
    let mut service = create_test_service();
    let admin = create_test_admin();
    let record = service
        .upsert_final_evaluation(&admin, &final_evaluation_request("emp-1", "B"))
        .unwrap();
    service.confirm_final_evaluation(&admin, record.id).unwrap();

    let reopened = service
        .cancel_final_evaluation_confirmation(&admin, record.id)
        .unwrap();
    assert!(!reopened.is_confirmed);
    assert!(reopened.confirmed_by.is_none());

    let updated = service
        .upsert_final_evaluation(&admin, &final_evaluation_request("emp-1", "A"))
        .unwrap();
    assert_eq!(updated.evaluation_grade, "A");
}

#[test]
fn test_deleted_evaluation_is_hidden() {
    let mut service = create_test_service();
    let admin = create_test_admin();
    let record = service
        .upsert_final_evaluation(&admin, &final_evaluation_request("emp-1", "B"))
        .unwrap();

    service.delete_final_evaluation(&admin, record.id).unwrap();

    assert!(service.get_final_evaluation("emp-1", PERIOD).unwrap().is_none());
    assert!(service.list_final_evaluations(PERIOD).unwrap().is_empty());
}

#[test]
fn test_final_evaluation_requires_admin() {
    let mut service = create_test_service();

    let err = service
        .upsert_final_evaluation(
            &create_test_evaluator("mgr-1"),
            &final_evaluation_request("emp-1", "A"),
        )
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::PermissionDenied);
}

#[test]
fn test_unknown_final_evaluation_is_not_found() {
    let mut service = create_test_service();

    let err = service
        .confirm_final_evaluation(&create_test_admin(), 404)
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::NotFound);
}
