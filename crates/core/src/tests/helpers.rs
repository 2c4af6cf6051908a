// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use evalcycle_audit::Actor;
use evalcycle_domain::{
    ApprovalStep, DownwardEvaluation, DownwardEvaluationType, EvaluationLineMapping,
    FinalEvaluationGrades, GradeRange, GradeTable, JobDetailedGrade, JobGrade, PeerEvaluation,
    PeerEvaluationStatus, PeriodConfig, RecordMeta, SelfEvaluation, StepApproval, StepStatus,
};
use time::OffsetDateTime;
use time::macros::datetime;

pub const NOW: OffsetDateTime = datetime!(2026-03-01 10:00 UTC);

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("admin-123"), String::from("admin"))
}

pub fn create_employee_actor(id: &str) -> Actor {
    Actor::new(id.to_string(), String::from("employee"))
}

pub fn create_test_period() -> PeriodConfig {
    PeriodConfig {
        period_id: 1,
        name: String::from("2026 H1"),
        start_date: datetime!(2026-01-01 00:00 UTC),
        end_date: datetime!(2026-06-30 23:59 UTC),
        self_evaluation_deadline: None,
        downward_evaluation_deadline: Some(datetime!(2026-06-15 23:59 UTC)),
        peer_evaluation_deadline: None,
        max_self_evaluation_rate: 100.0,
        grade_ranges: GradeTable::new(vec![
            GradeRange::new("B", 0.0, 79.0),
            GradeRange::new("A", 80.0, 100.0),
        ])
        .unwrap(),
    }
}

pub fn test_meta() -> RecordMeta {
    RecordMeta::new("admin-123", datetime!(2026-01-10 09:00 UTC))
}

pub fn create_test_self_evaluation() -> SelfEvaluation {
    SelfEvaluation {
        id: 1,
        period_id: 1,
        employee_id: String::from("E1"),
        work_item_id: 11,
        project_id: 3,
        content: Some(String::from("done")),
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

pub fn create_test_downward_evaluation() -> DownwardEvaluation {
    DownwardEvaluation {
        id: 5,
        period_id: 1,
        evaluator_id: String::from("M1"),
        employee_id: String::from("E1"),
        evaluation_type: DownwardEvaluationType::Primary,
        work_item_id: None,
        self_evaluation_id: Some(1),
        content: Some(String::from("solid half")),
        score: Some(90.0),
        is_completed: false,
        completed_at: None,
        meta: test_meta(),
    }
}

pub fn create_test_peer_evaluation() -> PeerEvaluation {
    PeerEvaluation {
        id: 7,
        period_id: 1,
        evaluator_id: String::from("E2"),
        evaluatee_id: String::from("E1"),
        status: PeerEvaluationStatus::Pending,
        requested_by: String::from("admin-123"),
        completed_at: None,
        meta: test_meta(),
    }
}

pub fn create_test_step(step: ApprovalStep, status: StepStatus) -> StepApproval {
    StepApproval {
        id: 20,
        period_id: 1,
        employee_id: String::from("E1"),
        step,
        status,
        approved_by: None,
        approved_at: None,
        meta: test_meta(),
    }
}

pub fn create_test_mapping(id: i64, evaluator_id: &str) -> EvaluationLineMapping {
    EvaluationLineMapping {
        id,
        period_id: 1,
        employee_id: String::from("E1"),
        evaluator_id: evaluator_id.to_string(),
        work_item_id: None,
        evaluation_line_id: 1,
        meta: test_meta(),
    }
}

pub fn create_test_grades(grade: &str) -> FinalEvaluationGrades {
    FinalEvaluationGrades {
        evaluation_grade: grade.to_string(),
        job_grade: JobGrade::T2,
        job_detailed_grade: JobDetailedGrade::Normal,
        final_comments: None,
    }
}
