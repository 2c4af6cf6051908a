// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use evalcycle_audit::{ActivityAction, ActivityType, Actor, EvaluationActivity};
use evalcycle_domain::{
    ApprovalStep, DownwardEvaluation, DownwardEvaluationType, EvaluationLine,
    EvaluationLineMapping, EvaluationQuestion, EvaluatorType, FinalEvaluation, JobDetailedGrade,
    JobGrade, PeerEvaluation, PeerEvaluationQuestionMapping, PeerEvaluationStatus, RecordMeta,
    SelfEvaluation, StepApproval, StepStatus,
};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::Persistence;

pub const NOW: OffsetDateTime = datetime!(2026-03-01 10:00 UTC);

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("admin-123"), String::from("admin"))
}

pub fn test_meta() -> RecordMeta {
    RecordMeta::new("admin-123", datetime!(2026-01-10 09:00 UTC))
}

/// Inserts the primary and secondary lines and returns their ids.
pub fn seed_lines(persistence: &mut Persistence) -> (i64, i64) {
    let primary = EvaluationLine {
        id: 0,
        evaluator_type: EvaluatorType::Primary,
        display_order: 1,
        is_required: true,
        is_auto_assigned: false,
        meta: test_meta(),
    };
    let secondary = EvaluationLine {
        id: 0,
        evaluator_type: EvaluatorType::Secondary,
        display_order: 2,
        is_required: false,
        is_auto_assigned: false,
        meta: test_meta(),
    };
    let primary_id = persistence
        .insert_evaluation_line(&primary)
        .expect("insert primary line");
    let secondary_id = persistence
        .insert_evaluation_line(&secondary)
        .expect("insert secondary line");
    (primary_id, secondary_id)
}

pub fn create_test_mapping(
    employee_id: &str,
    evaluator_id: &str,
    evaluation_line_id: i64,
) -> EvaluationLineMapping {
    EvaluationLineMapping {
        id: 0,
        period_id: 1,
        employee_id: employee_id.to_string(),
        evaluator_id: evaluator_id.to_string(),
        work_item_id: None,
        evaluation_line_id,
        meta: test_meta(),
    }
}

pub fn create_test_self_evaluation(employee_id: &str, work_item_id: i64) -> SelfEvaluation {
    SelfEvaluation {
        id: 0,
        period_id: 1,
        employee_id: employee_id.to_string(),
        work_item_id,
        project_id: 3,
        content: Some(String::from("shipped the billing rewrite")),
        score: Some(85.0),
        submitted_to_evaluator: false,
        submitted_to_evaluator_at: None,
        submitted_to_manager: false,
        submitted_to_manager_at: None,
        is_completed: false,
        completed_at: None,
        meta: test_meta(),
    }
}

pub fn create_test_downward_evaluation(self_evaluation_id: Option<i64>) -> DownwardEvaluation {
    DownwardEvaluation {
        id: 0,
        period_id: 1,
        evaluator_id: String::from("M1"),
        employee_id: String::from("E1"),
        evaluation_type: DownwardEvaluationType::Primary,
        work_item_id: None,
        self_evaluation_id,
        content: Some(String::from("solid half")),
        score: Some(90.0),
        is_completed: false,
        completed_at: None,
        meta: test_meta(),
    }
}

pub fn create_test_peer_evaluation(evaluator_id: &str, evaluatee_id: &str) -> PeerEvaluation {
    PeerEvaluation {
        id: 0,
        period_id: 1,
        evaluator_id: evaluator_id.to_string(),
        evaluatee_id: evaluatee_id.to_string(),
        status: PeerEvaluationStatus::Pending,
        requested_by: String::from("admin-123"),
        completed_at: None,
        meta: test_meta(),
    }
}

pub fn create_test_question(text: &str) -> EvaluationQuestion {
    EvaluationQuestion {
        id: 0,
        text: text.to_string(),
        min_score: Some(1.0),
        max_score: Some(5.0),
        meta: test_meta(),
    }
}

pub fn create_test_question_mapping(
    peer_evaluation_id: i64,
    question_id: i64,
    display_order: i32,
) -> PeerEvaluationQuestionMapping {
    PeerEvaluationQuestionMapping {
        id: 0,
        peer_evaluation_id,
        question_id,
        question_group_id: None,
        display_order,
        answer: None,
        score: None,
        answered_at: None,
        answered_by: None,
        meta: test_meta(),
    }
}

pub fn create_test_step(step: ApprovalStep, status: StepStatus) -> StepApproval {
    StepApproval {
        id: 0,
        period_id: 1,
        employee_id: String::from("E1"),
        step,
        status,
        approved_by: None,
        approved_at: None,
        meta: test_meta(),
    }
}

pub fn create_test_final_evaluation(employee_id: &str) -> FinalEvaluation {
    FinalEvaluation {
        id: 0,
        employee_id: employee_id.to_string(),
        period_id: 1,
        evaluation_grade: String::from("A"),
        job_grade: JobGrade::T2,
        job_detailed_grade: JobDetailedGrade::Normal,
        final_comments: None,
        is_confirmed: false,
        confirmed_at: None,
        confirmed_by: None,
        meta: test_meta(),
    }
}

pub fn create_test_activity(
    employee_id: &str,
    action: ActivityAction,
    performed_at: OffsetDateTime,
) -> EvaluationActivity {
    EvaluationActivity::new(
        1,
        employee_id,
        ActivityType::SelfEvaluation,
        action,
        format!("self evaluation {action}"),
        &create_test_actor(),
        performed_at,
    )
}
