// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    EvaluationLine, EvaluationLineMapping, EvaluatorType, GradeRange, GradeTable, PeriodConfig,
    RecordMeta, SelfEvaluation,
};
use time::OffsetDateTime;
use time::macros::datetime;

pub fn test_meta() -> RecordMeta {
    RecordMeta::new("admin", datetime!(2026-01-05 09:00 UTC))
}

pub fn create_test_grade_table() -> GradeTable {
    GradeTable::new(vec![
        GradeRange::new("S", 90.0, 120.0),
        GradeRange::new("A", 80.0, 89.99),
        GradeRange::new("B", 60.0, 79.99),
        GradeRange::new("C", 0.0, 59.99),
    ])
    .unwrap()
}

pub fn create_test_period() -> PeriodConfig {
    PeriodConfig {
        period_id: 1,
        name: String::from("2026 H1"),
        start_date: datetime!(2026-01-01 00:00 UTC),
        end_date: datetime!(2026-06-30 23:59 UTC),
        self_evaluation_deadline: Some(datetime!(2026-05-31 23:59 UTC)),
        downward_evaluation_deadline: Some(datetime!(2026-06-15 23:59 UTC)),
        peer_evaluation_deadline: None,
        max_self_evaluation_rate: 120.0,
        grade_ranges: create_test_grade_table(),
    }
}

pub fn create_test_self_evaluation() -> SelfEvaluation {
    SelfEvaluation {
        id: 10,
        period_id: 1,
        employee_id: String::from("emp-1"),
        work_item_id: 100,
        project_id: 7,
        content: Some(String::from("Shipped the billing rewrite")),
        score: Some(95.0),
        submitted_to_evaluator: false,
        submitted_to_evaluator_at: None,
        submitted_to_manager: false,
        submitted_to_manager_at: None,
        is_completed: false,
        completed_at: None,
        meta: test_meta(),
    }
}

pub fn create_test_line(id: i64, evaluator_type: EvaluatorType, is_required: bool) -> EvaluationLine {
    EvaluationLine {
        id,
        evaluator_type,
        display_order: i32::try_from(id).unwrap(),
        is_required,
        is_auto_assigned: false,
        meta: test_meta(),
    }
}

pub fn create_test_mapping(id: i64, evaluator_id: &str, evaluation_line_id: i64) -> EvaluationLineMapping {
    EvaluationLineMapping {
        id,
        period_id: 1,
        employee_id: String::from("emp-1"),
        evaluator_id: evaluator_id.to_string(),
        work_item_id: None,
        evaluation_line_id,
        meta: test_meta(),
    }
}

pub fn later(now: OffsetDateTime) -> OffsetDateTime {
    now + time::Duration::hours(1)
}
