// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use evalcycle_domain::PeerEvaluationStatus;

use crate::tests::helpers::{
    CLOSED_PERIOD, PERIOD, create_test_admin, create_test_employee, create_test_service,
};
use crate::{
    ApiError, CreateQuestionRequest, ErrorCode, EvaluationService, RequestPeerEvaluationRequest,
};

fn create_question(service: &mut EvaluationService, text: &str) -> i64 {
    service
        .create_question(
            &create_test_admin(),
            &CreateQuestionRequest {
                text: text.to_string(),
                min_score: Some(1.0),
                max_score: Some(5.0),
            },
        )
        .unwrap()
        .id
}

fn peer_request(
    evaluator_id: &str,
    evaluatee_id: &str,
    question_ids: Vec<i64>,
) -> RequestPeerEvaluationRequest {
    RequestPeerEvaluationRequest {
        period_id: PERIOD,
        evaluator_id: evaluator_id.to_string(),
        evaluatee_id: evaluatee_id.to_string(),
        question_ids,
        question_group_id: None,
    }
}

#[test]
fn test_request_maps_questions_in_order() {
    let mut service = create_test_service();
    let q1 = create_question(&mut service, "Communicates clearly");
    let q2 = create_question(&mut service, "Helps the team");

    let evaluation = service
        .request_peer_evaluation(&create_test_admin(), &peer_request("emp-2", "emp-1", vec![q1, q2]))
        .unwrap();

    assert_eq!(evaluation.status, PeerEvaluationStatus::Pending);
    let mappings = service.list_question_mappings(evaluation.id).unwrap();
    let questions: Vec<i64> = mappings.iter().map(|m| m.question_id).collect();
    assert_eq!(questions, vec![q1, q2]);
    assert!(mappings[0].display_order < mappings[1].display_order);
}

#[test]
fn test_default_group_is_used_without_explicit_questions() {
    let mut service = create_test_service();
    let admin = create_test_admin();
    let q1 = create_question(&mut service, "Communicates clearly");
    let q2 = create_question(&mut service, "Helps the team");
    let group = service.create_question_group(&admin, "Standard", true).unwrap();
    service.add_question_to_group(&admin, group.id, q2, 1).unwrap();
    service.add_question_to_group(&admin, group.id, q1, 2).unwrap();

    let evaluation = service
        .request_peer_evaluation(&admin, &peer_request("emp-2", "emp-1", Vec::new()))
        .unwrap();

    let mappings = service.list_question_mappings(evaluation.id).unwrap();
    let questions: Vec<i64> = mappings.iter().map(|m| m.question_id).collect();
    assert_eq!(questions, vec![q2, q1]);
    assert!(mappings.iter().all(|m| m.question_group_id == Some(group.id)));
}

#[test]
fn test_second_default_group_is_rejected() {
    let mut service = create_test_service();
    let admin = create_test_admin();
    service.create_question_group(&admin, "Standard", true).unwrap();

    let err = service
        .create_question_group(&admin, "Other", true)
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::Duplicate);
}

#[test]
fn test_self_peer_evaluation_is_rejected() {
    let mut service = create_test_service();

    let err = service
        .request_peer_evaluation(&create_test_admin(), &peer_request("emp-1", "emp-1", Vec::new()))
        .unwrap_err();

    assert!(matches!(
        err,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "self_peer_evaluation"
    ));
}

#[test]
fn test_duplicate_request_is_rejected() {
    let mut service = create_test_service();
    let admin = create_test_admin();
    service
        .request_peer_evaluation(&admin, &peer_request("emp-2", "emp-1", Vec::new()))
        .unwrap();

    let err = service
        .request_peer_evaluation(&admin, &peer_request("emp-2", "emp-1", Vec::new()))
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::Duplicate);
}

#[test]
fn test_batch_request_continues_past_failures() {
    let mut service = create_test_service();

    let results = service
        .request_peer_evaluations_batch(
            &create_test_admin(),
            &[
                peer_request("emp-2", "emp-1", Vec::new()),
                peer_request("emp-3", "emp-3", Vec::new()),
                peer_request("emp-3", "emp-1", Vec::new()),
            ],
        )
        .unwrap();

    let outcomes: Vec<bool> = results.iter().map(crate::BatchItemResult::is_success).collect();
    assert_eq!(outcomes, vec![true, false, true]);
    assert_eq!(
        service
            .list_peer_evaluations_for_evaluatee(PERIOD, "emp-1")
            .unwrap()
            .len(),
        2
    );
}

#[test]
fn test_answer_submit_flow() {
    let mut service = create_test_service();
    let evaluator = create_test_employee("emp-2");
    let q1 = create_question(&mut service, "Communicates clearly");
    let q2 = create_question(&mut service, "Helps the team");
    let evaluation = service
        .request_peer_evaluation(&create_test_admin(), &peer_request("emp-2", "emp-1", vec![q1, q2]))
        .unwrap();
    let mappings = service.list_question_mappings(evaluation.id).unwrap();

    let answered = service
        .answer_question(&evaluator, mappings[0].id, "Always", Some(5.0))
        .unwrap();
    assert!(answered.answered_at.is_some());
    assert_eq!(answered.answered_by.as_deref(), Some("emp-2"));
    let in_progress = service.get_peer_evaluation(evaluation.id).unwrap().unwrap();
    assert_eq!(in_progress.status, PeerEvaluationStatus::InProgress);

    let err = service
        .submit_peer_evaluation(&evaluator, evaluation.id)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::CannotSubmit);

    service
        .answer_question(&evaluator, mappings[1].id, "Often", Some(4.0))
        .unwrap();
    let completed = service
        .submit_peer_evaluation(&evaluator, evaluation.id)
        .unwrap();
    assert_eq!(completed.status, PeerEvaluationStatus::Completed);
    assert!(completed.completed_at.is_some());
}

#[test]
fn test_only_the_evaluator_may_answer() {
    let mut service = create_test_service();
    let q1 = create_question(&mut service, "Communicates clearly");
    let evaluation = service
        .request_peer_evaluation(&create_test_admin(), &peer_request("emp-2", "emp-1", vec![q1]))
        .unwrap();
    let mapping_id = service.list_question_mappings(evaluation.id).unwrap()[0].id;

    let err = service
        .answer_question(&create_test_employee("emp-1"), mapping_id, "Great", Some(5.0))
        .unwrap_err();

    assert!(matches!(err, ApiError::PermissionDenied { .. }));
}

#[test]
fn test_score_outside_question_bounds_is_rejected() {
    let mut service = create_test_service();
    let q1 = create_question(&mut service, "Communicates clearly");
    let evaluation = service
        .request_peer_evaluation(&create_test_admin(), &peer_request("emp-2", "emp-1", vec![q1]))
        .unwrap();
    let mapping_id = service.list_question_mappings(evaluation.id).unwrap()[0].id;

    let err = service
        .answer_question(&create_test_employee("emp-2"), mapping_id, "Great", Some(9.0))
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::ValidationError);
}

#[test]
fn test_cancelled_evaluation_is_closed() {
    let mut service = create_test_service();
    let admin = create_test_admin();
    let q1 = create_question(&mut service, "Communicates clearly");
    let q2 = create_question(&mut service, "Helps the team");
    let evaluation = service
        .request_peer_evaluation(&admin, &peer_request("emp-2", "emp-1", vec![q1]))
        .unwrap();
    let mapping_id = service.list_question_mappings(evaluation.id).unwrap()[0].id;

    let cancelled = service.cancel_peer_evaluation(&admin, evaluation.id).unwrap();
    assert_eq!(cancelled.status, PeerEvaluationStatus::Cancelled);

    let answer = service
        .answer_question(&create_test_employee("emp-2"), mapping_id, "Great", Some(5.0))
        .unwrap_err();
    assert_eq!(answer.code(), ErrorCode::AlreadyCompleted);
    let add = service
        .add_question_mapping(&admin, evaluation.id, q2, None)
        .unwrap_err();
    assert_eq!(add.code(), ErrorCode::AlreadyCompleted);
    let remove = service
        .remove_question_mapping(&admin, mapping_id)
        .unwrap_err();
    assert_eq!(remove.code(), ErrorCode::AlreadyCompleted);
}

#[test]
fn test_question_cannot_be_mapped_twice() {
    let mut service = create_test_service();
    let admin = create_test_admin();
    let q1 = create_question(&mut service, "Communicates clearly");
    let evaluation = service
        .request_peer_evaluation(&admin, &peer_request("emp-2", "emp-1", vec![q1]))
        .unwrap();

    let err = service
        .add_question_mapping(&admin, evaluation.id, q1, None)
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::Duplicate);
}

#[test]
fn test_removed_mapping_no_longer_blocks_submit() {
    let mut service = create_test_service();
    let admin = create_test_admin();
    let evaluator = create_test_employee("emp-2");
    let q1 = create_question(&mut service, "Communicates clearly");
    let q2 = create_question(&mut service, "Helps the team");
    let evaluation = service
        .request_peer_evaluation(&admin, &peer_request("emp-2", "emp-1", vec![q1, q2]))
        .unwrap();
    let mappings = service.list_question_mappings(evaluation.id).unwrap();
    service
        .answer_question(&evaluator, mappings[0].id, "Always", Some(5.0))
        .unwrap();

    service
        .remove_question_mapping(&admin, mappings[1].id)
        .unwrap();
    let completed = service
        .submit_peer_evaluation(&evaluator, evaluation.id)
        .unwrap();

    assert_eq!(completed.status, PeerEvaluationStatus::Completed);
}

#[test]
fn test_answers_rejected_after_peer_deadline() {
    let mut service = create_test_service();
    let q1 = create_question(&mut service, "Communicates clearly");
    let mut request = peer_request("emp-2", "emp-1", vec![q1]);
    request.period_id = CLOSED_PERIOD;
    let evaluation = service
        .request_peer_evaluation(&create_test_admin(), &request)
        .unwrap();
    let mapping_id = service.list_question_mappings(evaluation.id).unwrap()[0].id;
    let evaluator = create_test_employee("emp-2");

    let err = service
        .answer_question(&evaluator, mapping_id, "Always clear", Some(4.0))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::PeriodExpired);

    let err = service
        .submit_peer_evaluation(&evaluator, evaluation.id)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::PeriodExpired);
    let stored = service.get_peer_evaluation(evaluation.id).unwrap().unwrap();
    assert_eq!(stored.status, PeerEvaluationStatus::Pending);
}
