// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::FinalEvaluationCommand;
use crate::error::CoreError;
use crate::state::TransitionResult;
use evalcycle_audit::{ActivityAction, ActivityType, Actor, EvaluationActivity};
use evalcycle_domain::{DomainError, FinalEvaluation, FinalEvaluationGrades, RecordMeta};
use time::OffsetDateTime;

fn final_activity(
    record: &FinalEvaluation,
    action: ActivityAction,
    title: String,
    actor: &Actor,
    now: OffsetDateTime,
) -> EvaluationActivity {
    EvaluationActivity::new(
        record.period_id,
        &record.employee_id,
        ActivityType::FinalEvaluation,
        action,
        title,
        actor,
        now,
    )
    .with_related_entity("final_evaluation", record.id)
}

/// Builds a new, unconfirmed final evaluation.
///
/// # Errors
///
/// Returns an error if the evaluation grade is blank.
pub fn create_final_evaluation(
    employee_id: &str,
    period_id: i64,
    grades: FinalEvaluationGrades,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<TransitionResult<FinalEvaluation>, CoreError> {
    grades.validate()?;

    let record = FinalEvaluation {
        id: 0,
        employee_id: employee_id.to_string(),
        period_id,
        evaluation_grade: grades.evaluation_grade,
        job_grade: grades.job_grade,
        job_detailed_grade: grades.job_detailed_grade,
        final_comments: grades.final_comments,
        is_confirmed: false,
        confirmed_at: None,
        confirmed_by: None,
        meta: RecordMeta::new(&actor.id, now),
    };
    let activity = final_activity(
        &record,
        ActivityAction::Created,
        format!("Final evaluation graded {}", record.evaluation_grade),
        actor,
        now,
    );
    Ok(TransitionResult::changed(record, Some(activity)))
}

/// Applies a command to a final evaluation.
///
/// # Errors
///
/// Returns an error if:
/// - A confirmed evaluation is updated or deleted
/// - A confirmed evaluation is confirmed again
/// - An unconfirmed evaluation has its confirmation cancelled
pub fn apply_final_evaluation(
    record: &FinalEvaluation,
    command: FinalEvaluationCommand,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<TransitionResult<FinalEvaluation>, CoreError> {
    let mut updated = record.clone();
    let (action, title) = match command {
        FinalEvaluationCommand::Upsert(grades) => {
            record.ensure_mutable()?;
            grades.validate()?;
            updated.evaluation_grade = grades.evaluation_grade;
            updated.job_grade = grades.job_grade;
            updated.job_detailed_grade = grades.job_detailed_grade;
            updated.final_comments = grades.final_comments;
            updated.meta.touch(&actor.id, now);
            (
                ActivityAction::Updated,
                format!("Final evaluation graded {}", updated.evaluation_grade),
            )
        }
        FinalEvaluationCommand::Confirm => {
            if record.is_confirmed {
                return Err(DomainError::AlreadyConfirmed { id: record.id }.into());
            }
            updated.is_confirmed = true;
            updated.confirmed_at = Some(now);
            updated.confirmed_by = Some(actor.id.clone());
            updated.meta.touch(&actor.id, now);
            (
                ActivityAction::Confirmed,
                String::from("Final evaluation confirmed"),
            )
        }
        FinalEvaluationCommand::CancelConfirmation => {
            if !record.is_confirmed {
                return Err(DomainError::NotConfirmed { id: record.id }.into());
            }
            updated.is_confirmed = false;
            updated.confirmed_at = None;
            updated.confirmed_by = None;
            updated.meta.touch(&actor.id, now);
            (
                ActivityAction::ConfirmationCancelled,
                String::from("Final evaluation confirmation cancelled"),
            )
        }
        FinalEvaluationCommand::Delete => {
            record.ensure_mutable()?;
            updated.meta.mark_deleted(&actor.id, now);
            (
                ActivityAction::Deleted,
                String::from("Final evaluation deleted"),
            )
        }
    };

    let activity = final_activity(&updated, action, title, actor, now);
    Ok(TransitionResult::changed(updated, Some(activity)))
}
