// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use evalcycle_domain::{ApprovalStep, EvaluatorType};

use crate::tests::helpers::{
    CLOSED_PERIOD, PERIOD, assign, create_self_evaluation, create_test_admin,
    create_test_employee, create_test_evaluator, create_test_service, downward_request,
};
use crate::{
    ApiError, CreateQuestionRequest, EvaluationLineResetCounts, RequestPeerEvaluationRequest,
    SelfEvaluationResetCounts, StepApprovalResetCounts,
};

#[test]
fn test_reset_evaluation_lines_removes_dependents() {
    let mut service = create_test_service();
    let admin = create_test_admin();
    assign(&mut service, "emp-1", "mgr-1", EvaluatorType::Primary);
    assign(&mut service, "emp-1", "mgr-2", EvaluatorType::Secondary);
    service
        .upsert_downward_evaluation(
            &create_test_evaluator("mgr-1"),
            &downward_request(PERIOD, "mgr-1", "emp-1", None, Some(70.0)),
        )
        .unwrap();
    let mut question_ids = Vec::new();
    for text in ["Communicates clearly", "Helps the team"] {
        let question = service
            .create_question(
                &admin,
                &CreateQuestionRequest {
                    text: text.to_string(),
                    min_score: None,
                    max_score: None,
                },
            )
            .unwrap();
        question_ids.push(question.id);
    }
    service
        .request_peer_evaluation(
            &admin,
            &RequestPeerEvaluationRequest {
                period_id: PERIOD,
                evaluator_id: String::from("emp-2"),
                evaluatee_id: String::from("emp-1"),
                question_ids,
                question_group_id: None,
            },
        )
        .unwrap();

    let response = service.reset_all_evaluation_lines(&admin).unwrap();

    assert_eq!(
        response.deleted_counts,
        EvaluationLineResetCounts {
            peer_evaluation_question_mappings: 2,
            peer_evaluations: 1,
            downward_evaluations: 1,
            evaluation_line_mappings: 2,
        }
    );
    assert!(!response.message.is_empty());
    assert!(service.list_for_employee(None, "emp-1").unwrap().is_empty());
    assert!(
        service
            .list_peer_evaluations_for_evaluatee(PERIOD, "emp-1")
            .unwrap()
            .is_empty()
    );
    // Lines themselves survive.
    assign(&mut service, "emp-1", "mgr-1", EvaluatorType::Primary);

    let again = service.reset_all_evaluation_lines(&admin).unwrap();
    assert_eq!(again.deleted_counts.evaluation_line_mappings, 1);
    let empty = service.reset_all_evaluation_lines(&admin).unwrap();
    assert_eq!(empty.deleted_counts, EvaluationLineResetCounts::default());
}

#[test]
fn test_reset_evaluation_lines_counts_every_dependent() {
    let mut service = create_test_service();
    let admin = create_test_admin();
    assign(&mut service, "emp-1", "mgr-1", EvaluatorType::Primary);
    assign(&mut service, "emp-1", "mgr-2", EvaluatorType::Secondary);
    assign(&mut service, "emp-2", "mgr-1", EvaluatorType::Primary);
    let mut question_ids = Vec::new();
    for text in ["Communicates clearly", "Helps the team"] {
        let question = service
            .create_question(
                &admin,
                &CreateQuestionRequest {
                    text: text.to_string(),
                    min_score: None,
                    max_score: None,
                },
            )
            .unwrap();
        question_ids.push(question.id);
    }
    let mut peer_ids = Vec::new();
    for evaluator in ["emp-2", "emp-3"] {
        let peer = service
            .request_peer_evaluation(
                &admin,
                &RequestPeerEvaluationRequest {
                    period_id: PERIOD,
                    evaluator_id: evaluator.to_string(),
                    evaluatee_id: String::from("emp-1"),
                    question_ids: question_ids.clone(),
                    question_group_id: None,
                },
            )
            .unwrap();
        peer_ids.push(peer.id);
    }
    service
        .upsert_downward_evaluation(
            &create_test_evaluator("mgr-1"),
            &downward_request(PERIOD, "mgr-1", "emp-1", None, Some(70.0)),
        )
        .unwrap();

    let response = service.reset_all_evaluation_lines(&admin).unwrap();

    assert_eq!(
        response.deleted_counts,
        EvaluationLineResetCounts {
            peer_evaluation_question_mappings: 4,
            peer_evaluations: 2,
            downward_evaluations: 1,
            evaluation_line_mappings: 3,
        }
    );
    for peer_id in peer_ids {
        assert!(service.list_question_mappings(peer_id).unwrap().is_empty());
    }
    let again = service.reset_all_evaluation_lines(&admin).unwrap();
    assert_eq!(again.deleted_counts, EvaluationLineResetCounts::default());
}

#[test]
fn test_reset_self_evaluations_removes_linked_downward_only() {
    let mut service = create_test_service();
    let admin = create_test_admin();
    let evaluator = create_test_evaluator("mgr-1");
    let first = create_self_evaluation(&mut service, "emp-1", 10);
    create_self_evaluation(&mut service, "emp-1", 11);
    service
        .upsert_downward_evaluation(
            &evaluator,
            &downward_request(PERIOD, "mgr-1", "emp-1", Some(first.id), Some(70.0)),
        )
        .unwrap();
    let mut unlinked = downward_request(PERIOD, "mgr-1", "emp-1", None, Some(60.0));
    unlinked.work_item_id = Some(99);
    let unlinked = service
        .upsert_downward_evaluation(&evaluator, &unlinked)
        .unwrap();

    let response = service.reset_all_self_evaluations(&admin).unwrap();

    assert_eq!(
        response.deleted_counts,
        SelfEvaluationResetCounts {
            downward_evaluations: 1,
            self_evaluations: 2,
        }
    );
    assert!(service.list_self_evaluations("emp-1", PERIOD).unwrap().is_empty());
    assert!(service.get_downward_evaluation(unlinked.id).unwrap().is_some());

    let empty = service.reset_all_self_evaluations(&admin).unwrap();
    assert_eq!(empty.deleted_counts, SelfEvaluationResetCounts::default());
}

#[test]
fn test_reset_step_approvals_is_scoped_to_period() {
    let mut service = create_test_service();
    let admin = create_test_admin();
    let employee = create_test_employee("emp-1");
    assign(&mut service, "emp-1", "mgr-1", EvaluatorType::Primary);
    service
        .submit_step(&employee, PERIOD, "emp-1", ApprovalStep::Criteria)
        .unwrap();
    service
        .submit_step(&employee, PERIOD, "emp-1", ApprovalStep::SelfEvaluation)
        .unwrap();
    service
        .request_revision(&admin, PERIOD, "emp-1", ApprovalStep::Criteria, "Rework goals")
        .unwrap();
    service
        .submit_step(&employee, CLOSED_PERIOD, "emp-1", ApprovalStep::Criteria)
        .unwrap();

    let response = service.reset_period_step_approvals(&admin, PERIOD).unwrap();

    assert_eq!(
        response.deleted_counts,
        StepApprovalResetCounts {
            revision_request_recipients: 2,
            revision_requests: 1,
            step_approvals: 2,
        }
    );
    assert!(service.list_step_approvals(PERIOD, "emp-1").unwrap().is_empty());
    assert!(service.list_revision_requests_for_recipient("emp-1").unwrap().is_empty());
    assert_eq!(service.list_step_approvals(CLOSED_PERIOD, "emp-1").unwrap().len(), 1);

    let empty = service.reset_period_step_approvals(&admin, PERIOD).unwrap();
    assert_eq!(empty.deleted_counts, StepApprovalResetCounts::default());
}

#[test]
fn test_resets_require_admin() {
    let mut service = create_test_service();
    let evaluator = create_test_evaluator("mgr-1");

    assert!(matches!(
        service.reset_all_evaluation_lines(&evaluator),
        Err(ApiError::Unauthorized { .. })
    ));
    assert!(matches!(
        service.reset_all_self_evaluations(&evaluator),
        Err(ApiError::Unauthorized { .. })
    ));
    assert!(matches!(
        service.reset_period_step_approvals(&evaluator, PERIOD),
        Err(ApiError::Unauthorized { .. })
    ));
}
