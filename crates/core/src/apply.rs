// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{DownwardEvaluationCommand, SelfEvaluationCommand};
use crate::error::CoreError;
use crate::state::TransitionResult;
use evalcycle_audit::{ActivityAction, ActivityType, Actor, EvaluationActivity};
use evalcycle_domain::{
    DownwardEvaluation, NewDownwardEvaluation, NewSelfEvaluation, PeriodConfig, RecordMeta,
    SelfEvaluation, SelfEvaluationState, validate_score,
};
use time::OffsetDateTime;

fn self_activity(
    record: &SelfEvaluation,
    action: ActivityAction,
    title: String,
    actor: &Actor,
    now: OffsetDateTime,
) -> EvaluationActivity {
    EvaluationActivity::new(
        record.period_id,
        &record.employee_id,
        ActivityType::SelfEvaluation,
        action,
        title,
        actor,
        now,
    )
    .with_related_entity("self_evaluation", record.id)
}

fn downward_activity(
    record: &DownwardEvaluation,
    action: ActivityAction,
    title: String,
    actor: &Actor,
    now: OffsetDateTime,
) -> EvaluationActivity {
    EvaluationActivity::new(
        record.period_id,
        &record.employee_id,
        ActivityType::DownwardEvaluation,
        action,
        title,
        actor,
        now,
    )
    .with_related_entity("downward_evaluation", record.id)
}

fn validate_optional_score(score: Option<f64>, max_score: f64) -> Result<(), CoreError> {
    if let Some(score) = score {
        validate_score(score, 0.0, max_score)?;
    }
    Ok(())
}

/// Builds a new draft self-evaluation.
///
/// The returned record has id 0; persistence assigns the real id.
///
/// # Errors
///
/// Returns an error if the self-evaluation deadline has passed or the score
/// is outside `[0, max]` for the period.
pub fn create_self_evaluation(
    new: NewSelfEvaluation,
    period: &PeriodConfig,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<TransitionResult<SelfEvaluation>, CoreError> {
    period.ensure_self_evaluation_open(now)?;
    validate_optional_score(new.score, period.max_self_evaluation_rate)?;

    let record = SelfEvaluation {
        id: 0,
        period_id: new.period_id,
        employee_id: new.employee_id,
        work_item_id: new.work_item_id,
        project_id: new.project_id,
        content: new.content,
        score: new.score,
        submitted_to_evaluator: false,
        submitted_to_evaluator_at: None,
        submitted_to_manager: false,
        submitted_to_manager_at: None,
        is_completed: false,
        completed_at: None,
        meta: RecordMeta::new(&actor.id, now),
    };
    let activity = self_activity(
        &record,
        ActivityAction::Created,
        format!("Self evaluation created for work item {}", record.work_item_id),
        actor,
        now,
    );
    Ok(TransitionResult::changed(record, Some(activity)))
}

/// Moves a self-evaluation along the edge `from -> target`.
///
/// A record already in `target` is left alone. Any other state than `from`
/// is rejected, so a forward command never reverts a record and a revert
/// never advances one.
fn move_self_evaluation(
    record: &SelfEvaluation,
    (from, target): (SelfEvaluationState, SelfEvaluationState),
    period: &PeriodConfig,
    action: ActivityAction,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<TransitionResult<SelfEvaluation>, CoreError> {
    if record.state() == target {
        return Ok(TransitionResult::unchanged(record.clone()));
    }
    record.validate_transition(from, target)?;
    // Every state past draft requires complete content.
    if target != SelfEvaluationState::Draft {
        record.ensure_submittable(period.max_self_evaluation_rate)?;
    }

    let mut updated = record.clone();
    updated.set_state(target, now);
    updated.meta.touch(&actor.id, now);
    let activity = self_activity(
        &updated,
        action,
        format!("Self evaluation {} moved to {target}", updated.id),
        actor,
        now,
    );
    Ok(TransitionResult::changed(updated, Some(activity)))
}

/// Applies a command to a self-evaluation, producing the new record and
/// its activity entry.
///
/// # Errors
///
/// Returns an error if:
/// - Content is edited or submitted after the self-evaluation deadline
/// - Content is edited outside the draft state
/// - A score is outside `[0, max]` for the period
/// - A submission lacks content or a valid score
/// - The transition is not an edge of the state machine
pub fn apply_self_evaluation(
    record: &SelfEvaluation,
    command: SelfEvaluationCommand,
    period: &PeriodConfig,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<TransitionResult<SelfEvaluation>, CoreError> {
    match command {
        SelfEvaluationCommand::UpsertContent { content, score } => {
            period.ensure_self_evaluation_open(now)?;
            record.ensure_editable()?;
            validate_optional_score(score, period.max_self_evaluation_rate)?;

            let mut updated = record.clone();
            updated.content = content;
            updated.score = score;
            updated.meta.touch(&actor.id, now);
            let activity = self_activity(
                &updated,
                ActivityAction::Updated,
                format!("Self evaluation {} updated", updated.id),
                actor,
                now,
            );
            Ok(TransitionResult::changed(updated, Some(activity)))
        }
        SelfEvaluationCommand::SubmitToEvaluator => {
            period.ensure_self_evaluation_open(now)?;
            move_self_evaluation(
                record,
                (SelfEvaluationState::Draft, SelfEvaluationState::SubmittedToEvaluator),
                period,
                ActivityAction::Submitted,
                actor,
                now,
            )
        }
        SelfEvaluationCommand::SubmitToManager => move_self_evaluation(
            record,
            (SelfEvaluationState::SubmittedToEvaluator, SelfEvaluationState::SubmittedToManager),
            period,
            ActivityAction::Submitted,
            actor,
            now,
        ),
        SelfEvaluationCommand::Complete => move_self_evaluation(
            record,
            (SelfEvaluationState::SubmittedToManager, SelfEvaluationState::Completed),
            period,
            ActivityAction::Completed,
            actor,
            now,
        ),
        SelfEvaluationCommand::Uncomplete => move_self_evaluation(
            record,
            (SelfEvaluationState::Completed, SelfEvaluationState::SubmittedToManager),
            period,
            ActivityAction::Reset,
            actor,
            now,
        ),
        SelfEvaluationCommand::ResetToEvaluator => move_self_evaluation(
            record,
            (SelfEvaluationState::SubmittedToManager, SelfEvaluationState::SubmittedToEvaluator),
            period,
            ActivityAction::Reset,
            actor,
            now,
        ),
        SelfEvaluationCommand::Withdraw => move_self_evaluation(
            record,
            (SelfEvaluationState::SubmittedToEvaluator, SelfEvaluationState::Draft),
            period,
            ActivityAction::Reset,
            actor,
            now,
        ),
        SelfEvaluationCommand::ResetToDraft => {
            if record.state() == SelfEvaluationState::Draft {
                return Ok(TransitionResult::unchanged(record.clone()));
            }
            let mut updated = record.clone();
            updated.set_state(SelfEvaluationState::Draft, now);
            updated.meta.touch(&actor.id, now);
            let activity = self_activity(
                &updated,
                ActivityAction::Reset,
                format!("Self evaluation {} reset to draft", updated.id),
                actor,
                now,
            );
            Ok(TransitionResult::changed(updated, Some(activity)))
        }
        SelfEvaluationCommand::ClearContent => {
            if record.state() == SelfEvaluationState::Draft
                && record.content.is_none()
                && record.score.is_none()
            {
                return Ok(TransitionResult::unchanged(record.clone()));
            }
            let mut updated = record.clone();
            updated.set_state(SelfEvaluationState::Draft, now);
            updated.content = None;
            updated.score = None;
            updated.meta.touch(&actor.id, now);
            let activity = self_activity(
                &updated,
                ActivityAction::Reset,
                format!("Self evaluation {} content cleared", updated.id),
                actor,
                now,
            );
            Ok(TransitionResult::changed(updated, Some(activity)))
        }
        SelfEvaluationCommand::Delete => {
            let mut updated = record.clone();
            updated.meta.mark_deleted(&actor.id, now);
            let activity = self_activity(
                &updated,
                ActivityAction::Deleted,
                format!("Self evaluation {} deleted", updated.id),
                actor,
                now,
            );
            Ok(TransitionResult::changed(updated, Some(activity)))
        }
    }
}

/// Builds a new downward evaluation.
///
/// # Errors
///
/// Returns an error if the period's downward deadline has passed or the
/// score is outside `[0, max]`.
pub fn create_downward_evaluation(
    new: NewDownwardEvaluation,
    period: &PeriodConfig,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<TransitionResult<DownwardEvaluation>, CoreError> {
    period.ensure_downward_open(now)?;
    validate_optional_score(new.score, period.max_self_evaluation_rate)?;

    let record = DownwardEvaluation {
        id: 0,
        period_id: new.period_id,
        evaluator_id: new.evaluator_id,
        employee_id: new.employee_id,
        evaluation_type: new.evaluation_type,
        work_item_id: new.work_item_id,
        self_evaluation_id: new.self_evaluation_id,
        content: new.content,
        score: new.score,
        is_completed: false,
        completed_at: None,
        meta: RecordMeta::new(&actor.id, now),
    };
    let activity = downward_activity(
        &record,
        ActivityAction::Created,
        format!(
            "{} downward evaluation created by {}",
            record.evaluation_type, record.evaluator_id
        ),
        actor,
        now,
    );
    Ok(TransitionResult::changed(record, Some(activity)))
}

/// Applies a command to a downward evaluation.
///
/// The deadline and evaluator checks run before anything else, so a late
/// or foreign change is rejected even when it would be a no-op.
///
/// # Errors
///
/// Returns an error if:
/// - The period's downward deadline has passed
/// - The actor is neither the evaluator nor an administrator
/// - A completed record is edited
/// - Completion lacks a score in `[0, max]`
pub fn apply_downward_evaluation(
    record: &DownwardEvaluation,
    command: DownwardEvaluationCommand,
    period: &PeriodConfig,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<TransitionResult<DownwardEvaluation>, CoreError> {
    period.ensure_downward_open(now)?;
    record.ensure_evaluator(&actor.id, actor.is_admin())?;

    match command {
        DownwardEvaluationCommand::Upsert {
            content,
            score,
            self_evaluation_id,
        } => {
            record.ensure_not_completed()?;
            validate_optional_score(score, period.max_self_evaluation_rate)?;

            let mut updated = record.clone();
            updated.content = content;
            updated.score = score;
            if self_evaluation_id.is_some() {
                updated.self_evaluation_id = self_evaluation_id;
            }
            updated.meta.touch(&actor.id, now);
            let activity = downward_activity(
                &updated,
                ActivityAction::Updated,
                format!("Downward evaluation {} updated", updated.id),
                actor,
                now,
            );
            Ok(TransitionResult::changed(updated, Some(activity)))
        }
        DownwardEvaluationCommand::Complete => {
            if record.is_completed {
                return Ok(TransitionResult::unchanged(record.clone()));
            }
            record.ensure_completable(period.max_self_evaluation_rate)?;

            let mut updated = record.clone();
            updated.is_completed = true;
            updated.completed_at = Some(now);
            updated.meta.touch(&actor.id, now);
            let activity = downward_activity(
                &updated,
                ActivityAction::Completed,
                format!("Downward evaluation {} completed", updated.id),
                actor,
                now,
            );
            Ok(TransitionResult::changed(updated, Some(activity)))
        }
        DownwardEvaluationCommand::Reset => {
            if !record.is_completed {
                return Ok(TransitionResult::unchanged(record.clone()));
            }

            let mut updated = record.clone();
            updated.is_completed = false;
            updated.completed_at = None;
            updated.meta.touch(&actor.id, now);
            let activity = downward_activity(
                &updated,
                ActivityAction::Reset,
                format!("Downward evaluation {} reopened", updated.id),
                actor,
                now,
            );
            Ok(TransitionResult::changed(updated, Some(activity)))
        }
    }
}
