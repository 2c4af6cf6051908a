// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use evalcycle_domain::{
    DownwardEvaluationType, EvaluatorAssignment, EvaluatorType, GradeRange, GradeTable,
    JobDetailedGrade, JobGrade, PeriodCatalog, PeriodConfig, SelfEvaluation,
};
use evalcycle_persistence::Persistence;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{
    AuthenticatedActor, EvaluationService, Role, UpsertDownwardEvaluationRequest,
    UpsertFinalEvaluationRequest, UpsertSelfEvaluationRequest,
};

pub const NOW: OffsetDateTime = datetime!(2026-03-01 10:00 UTC);

/// Open period.
pub const PERIOD: i64 = 1;
/// Period whose deadlines have all passed.
pub const CLOSED_PERIOD: i64 = 2;

pub fn fixed_now() -> OffsetDateTime {
    NOW
}

pub fn create_test_admin() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("admin-1"), Role::Admin)
}

pub fn create_test_evaluator(id: &str) -> AuthenticatedActor {
    AuthenticatedActor::new(id.to_string(), Role::Evaluator)
}

pub fn create_test_employee(id: &str) -> AuthenticatedActor {
    AuthenticatedActor::new(id.to_string(), Role::Employee)
}

fn grade_table() -> GradeTable {
    GradeTable::new(vec![
        GradeRange::new("B", 0.0, 79.0),
        GradeRange::new("A", 80.0, 100.0),
    ])
    .unwrap()
}

pub fn create_test_catalog() -> PeriodCatalog {
    PeriodCatalog::from_periods(vec![
        PeriodConfig {
            period_id: PERIOD,
            name: String::from("2026 H1"),
            start_date: datetime!(2026-01-01 00:00 UTC),
            end_date: datetime!(2026-12-31 23:59 UTC),
            self_evaluation_deadline: None,
            downward_evaluation_deadline: None,
            peer_evaluation_deadline: None,
            max_self_evaluation_rate: 100.0,
            grade_ranges: grade_table(),
        },
        PeriodConfig {
            period_id: CLOSED_PERIOD,
            name: String::from("2025 H2"),
            start_date: datetime!(2025-07-01 00:00 UTC),
            end_date: datetime!(2025-12-31 23:59 UTC),
            self_evaluation_deadline: Some(datetime!(2025-11-30 23:59 UTC)),
            downward_evaluation_deadline: Some(datetime!(2025-12-15 23:59 UTC)),
            peer_evaluation_deadline: Some(datetime!(2025-12-15 23:59 UTC)),
            max_self_evaluation_rate: 100.0,
            grade_ranges: grade_table(),
        },
    ])
    .unwrap()
}

/// An in-memory service with the default evaluation lines in place.
pub fn create_test_service() -> EvaluationService {
    let persistence = Persistence::new_in_memory().expect("in-memory database");
    let mut service =
        EvaluationService::new(persistence, create_test_catalog()).with_clock(fixed_now);
    service
        .ensure_default_evaluation_lines(&create_test_admin())
        .expect("default lines");
    service
}

pub fn assignment(
    employee_id: &str,
    evaluator_id: &str,
    evaluator_type: EvaluatorType,
) -> EvaluatorAssignment {
    EvaluatorAssignment {
        period_id: PERIOD,
        employee_id: employee_id.to_string(),
        evaluator_id: evaluator_id.to_string(),
        evaluator_type,
        work_item_id: None,
    }
}

pub fn assign(
    service: &mut EvaluationService,
    employee_id: &str,
    evaluator_id: &str,
    evaluator_type: EvaluatorType,
) -> i64 {
    service
        .assign_evaluator(
            &create_test_admin(),
            &assignment(employee_id, evaluator_id, evaluator_type),
        )
        .expect("assign evaluator")
}

pub fn self_evaluation_request(
    employee_id: &str,
    work_item_id: i64,
    project_id: i64,
    score: Option<f64>,
) -> UpsertSelfEvaluationRequest {
    UpsertSelfEvaluationRequest {
        period_id: PERIOD,
        employee_id: employee_id.to_string(),
        work_item_id,
        project_id,
        content: Some(format!("Shipped work item {work_item_id}")),
        score,
    }
}

/// A draft self evaluation with content and a valid score.
pub fn create_self_evaluation(
    service: &mut EvaluationService,
    employee_id: &str,
    work_item_id: i64,
) -> SelfEvaluation {
    service
        .upsert_self_evaluation(
            &create_test_employee(employee_id),
            &self_evaluation_request(employee_id, work_item_id, 1, Some(85.0)),
        )
        .expect("create self evaluation")
}

pub fn downward_request(
    period_id: i64,
    evaluator_id: &str,
    employee_id: &str,
    self_evaluation_id: Option<i64>,
    score: Option<f64>,
) -> UpsertDownwardEvaluationRequest {
    UpsertDownwardEvaluationRequest {
        period_id,
        evaluator_id: evaluator_id.to_string(),
        employee_id: employee_id.to_string(),
        evaluation_type: DownwardEvaluationType::Primary,
        work_item_id: None,
        self_evaluation_id,
        content: Some(String::from("Consistent delivery")),
        score,
    }
}

pub fn final_evaluation_request(employee_id: &str, grade: &str) -> UpsertFinalEvaluationRequest {
    UpsertFinalEvaluationRequest {
        employee_id: employee_id.to_string(),
        period_id: PERIOD,
        evaluation_grade: grade.to_string(),
        job_grade: JobGrade::T2,
        job_detailed_grade: JobDetailedGrade::Normal,
        final_comments: None,
    }
}
