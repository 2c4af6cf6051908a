// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use evalcycle_domain::{ApprovalStep, EvaluatorType, RecipientType, StepStatus};

use crate::tests::helpers::{
    PERIOD, assign, create_test_admin, create_test_employee, create_test_evaluator,
    create_test_service,
};
use crate::{ApiError, ErrorCode, SkippedStep};

#[test]
fn test_submit_creates_pending_step() {
    let mut service = create_test_service();

    let approval = service
        .submit_step(&create_test_employee("emp-1"), PERIOD, "emp-1", ApprovalStep::Criteria)
        .unwrap();

    assert_eq!(approval.status, StepStatus::Pending);
    assert_eq!(
        service
            .get_step_status(PERIOD, "emp-1", ApprovalStep::Criteria)
            .unwrap(),
        Some(StepStatus::Pending)
    );
    assert_eq!(
        service
            .get_step_status(PERIOD, "emp-1", ApprovalStep::Primary)
            .unwrap(),
        None
    );
}

#[test]
fn test_approving_unsubmitted_step_is_invalid() {
    let mut service = create_test_service();

    let err = service
        .approve_step(&create_test_evaluator("mgr-1"), PERIOD, "emp-1", ApprovalStep::Criteria, false)
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::InvalidTransition);
}

#[test]
fn test_employee_cannot_approve() {
    let mut service = create_test_service();
    let employee = create_test_employee("emp-1");
    service
        .submit_step(&employee, PERIOD, "emp-1", ApprovalStep::Criteria)
        .unwrap();

    let err = service
        .approve_step(&employee, PERIOD, "emp-1", ApprovalStep::Criteria, false)
        .unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { .. }));
}

#[test]
fn test_approve_records_approver() {
    let mut service = create_test_service();
    service
        .submit_step(&create_test_employee("emp-1"), PERIOD, "emp-1", ApprovalStep::Criteria)
        .unwrap();

    let response = service
        .approve_step(&create_test_evaluator("mgr-1"), PERIOD, "emp-1", ApprovalStep::Criteria, false)
        .unwrap();

    assert_eq!(response.approval.status, StepStatus::Approved);
    assert_eq!(response.approval.approved_by.as_deref(), Some("mgr-1"));
    assert!(response.cascaded.is_empty());
    assert!(response.skipped.is_empty());
}

#[test]
fn test_revision_loop_returns_to_approval() {
    let mut service = create_test_service();
    let employee = create_test_employee("emp-1");
    let evaluator = create_test_evaluator("mgr-1");
    assign(&mut service, "emp-1", "mgr-1", EvaluatorType::Primary);
    service
        .submit_step(&employee, PERIOD, "emp-1", ApprovalStep::SelfEvaluation)
        .unwrap();

    let requested = service
        .request_revision(&evaluator, PERIOD, "emp-1", ApprovalStep::SelfEvaluation, "  Add detail  ")
        .unwrap();
    assert_eq!(requested.status, StepStatus::RevisionRequested);

    let inbox = service.list_revision_requests_for_recipient("emp-1").unwrap();
    assert_eq!(inbox.len(), 1);
    let (request, recipient) = &inbox[0];
    assert_eq!(request.comment, "Add detail");
    assert_eq!(recipient.recipient_type, RecipientType::Evaluatee);
    assert!(!recipient.is_read);

    let read = service
        .mark_revision_request_read(&employee, request.id)
        .unwrap();
    assert!(read.is_read);

    let completed = service
        .complete_revision(&employee, PERIOD, "emp-1", ApprovalStep::SelfEvaluation, Some(String::from("Done")))
        .unwrap();
    assert_eq!(completed.status, StepStatus::RevisionCompleted);

    let resubmitted = service
        .submit_step(&employee, PERIOD, "emp-1", ApprovalStep::SelfEvaluation)
        .unwrap();
    assert_eq!(resubmitted.status, StepStatus::Pending);
    let approved = service
        .approve_step(&evaluator, PERIOD, "emp-1", ApprovalStep::SelfEvaluation, false)
        .unwrap();
    assert_eq!(approved.approval.status, StepStatus::Approved);
}

#[test]
fn test_completed_revision_can_be_approved_directly() {
    let mut service = create_test_service();
    let employee = create_test_employee("emp-1");
    let evaluator = create_test_evaluator("mgr-1");
    service
        .submit_step(&employee, PERIOD, "emp-1", ApprovalStep::SelfEvaluation)
        .unwrap();
    service
        .request_revision(&evaluator, PERIOD, "emp-1", ApprovalStep::SelfEvaluation, "fix numbers")
        .unwrap();
    service
        .complete_revision(&employee, PERIOD, "emp-1", ApprovalStep::SelfEvaluation, None)
        .unwrap();

    let approved = service
        .approve_step(&evaluator, PERIOD, "emp-1", ApprovalStep::SelfEvaluation, false)
        .unwrap();

    assert_eq!(approved.approval.status, StepStatus::Approved);
    let err = service
        .request_revision(&evaluator, PERIOD, "emp-1", ApprovalStep::SelfEvaluation, "")
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);
}

#[test]
fn test_blank_revision_comment_is_rejected() {
    let mut service = create_test_service();
    assign(&mut service, "emp-1", "mgr-1", EvaluatorType::Primary);
    service
        .submit_step(&create_test_employee("emp-1"), PERIOD, "emp-1", ApprovalStep::SelfEvaluation)
        .unwrap();

    let err = service
        .request_revision(&create_test_evaluator("mgr-1"), PERIOD, "emp-1", ApprovalStep::SelfEvaluation, "   ")
        .unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "comment"));
    assert_eq!(
        service
            .get_step_status(PERIOD, "emp-1", ApprovalStep::SelfEvaluation)
            .unwrap(),
        Some(StepStatus::Pending)
    );
}

#[test]
fn test_revision_without_recipients_is_rolled_back() {
    let mut service = create_test_service();
    service
        .submit_step(&create_test_employee("emp-1"), PERIOD, "emp-1", ApprovalStep::Secondary)
        .unwrap();

    let err = service
        .request_revision(&create_test_admin(), PERIOD, "emp-1", ApprovalStep::Secondary, "Redo")
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::ValidationError);
    assert_eq!(
        service
            .get_step_status(PERIOD, "emp-1", ApprovalStep::Secondary)
            .unwrap(),
        Some(StepStatus::Pending)
    );
}

#[test]
fn test_criteria_revision_waits_for_every_recipient() {
    let mut service = create_test_service();
    let employee = create_test_employee("emp-1");
    let evaluator = create_test_evaluator("mgr-1");
    assign(&mut service, "emp-1", "mgr-1", EvaluatorType::Primary);
    service
        .submit_step(&employee, PERIOD, "emp-1", ApprovalStep::Criteria)
        .unwrap();
    service
        .request_revision(&create_test_admin(), PERIOD, "emp-1", ApprovalStep::Criteria, "Rework goals")
        .unwrap();

    let after_employee = service
        .complete_revision(&employee, PERIOD, "emp-1", ApprovalStep::Criteria, None)
        .unwrap();
    assert_eq!(after_employee.status, StepStatus::RevisionRequested);

    let after_evaluator = service
        .complete_revision(&evaluator, PERIOD, "emp-1", ApprovalStep::Criteria, None)
        .unwrap();
    assert_eq!(after_evaluator.status, StepStatus::RevisionCompleted);
}

#[test]
fn test_non_recipient_cannot_complete_revision() {
    let mut service = create_test_service();
    assign(&mut service, "emp-1", "mgr-1", EvaluatorType::Primary);
    service
        .submit_step(&create_test_employee("emp-1"), PERIOD, "emp-1", ApprovalStep::Primary)
        .unwrap();
    service
        .request_revision(&create_test_admin(), PERIOD, "emp-1", ApprovalStep::Primary, "Redo")
        .unwrap();

    let err = service
        .complete_revision(&create_test_evaluator("mgr-9"), PERIOD, "emp-1", ApprovalStep::Primary, None)
        .unwrap_err();

    assert!(matches!(err, ApiError::PermissionDenied { .. }));
}

#[test]
fn test_cascade_approves_waiting_steps_and_reports_the_rest() {
    let mut service = create_test_service();
    let employee = create_test_employee("emp-1");
    let admin = create_test_admin();
    assign(&mut service, "emp-1", "mgr-1", EvaluatorType::Primary);
    for step in [ApprovalStep::Criteria, ApprovalStep::SelfEvaluation, ApprovalStep::Primary] {
        service.submit_step(&employee, PERIOD, "emp-1", step).unwrap();
    }
    service
        .request_revision(&admin, PERIOD, "emp-1", ApprovalStep::Primary, "Redo")
        .unwrap();

    let response = service
        .approve_step(&admin, PERIOD, "emp-1", ApprovalStep::Criteria, true)
        .unwrap();

    assert_eq!(response.approval.status, StepStatus::Approved);
    assert_eq!(response.cascaded.len(), 1);
    assert_eq!(response.cascaded[0].step, ApprovalStep::SelfEvaluation);
    assert_eq!(response.cascaded[0].status, StepStatus::Approved);
    assert_eq!(
        response.skipped,
        vec![
            SkippedStep {
                step: ApprovalStep::Primary,
                status: Some(StepStatus::RevisionRequested),
            },
            SkippedStep {
                step: ApprovalStep::Secondary,
                status: None,
            },
        ]
    );
    assert_eq!(
        service
            .get_step_status(PERIOD, "emp-1", ApprovalStep::Primary)
            .unwrap(),
        Some(StepStatus::RevisionRequested)
    );
}

#[test]
fn test_approved_step_cannot_be_resubmitted() {
    let mut service = create_test_service();
    let employee = create_test_employee("emp-1");
    service
        .submit_step(&employee, PERIOD, "emp-1", ApprovalStep::Criteria)
        .unwrap();
    service
        .approve_step(&create_test_admin(), PERIOD, "emp-1", ApprovalStep::Criteria, false)
        .unwrap();

    let err = service
        .submit_step(&employee, PERIOD, "emp-1", ApprovalStep::Criteria)
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::InvalidTransition);
}
