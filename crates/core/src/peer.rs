// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::PeerEvaluationCommand;
use crate::error::CoreError;
use crate::state::TransitionResult;
use evalcycle_audit::{ActivityAction, ActivityType, Actor, EvaluationActivity};
use evalcycle_domain::{
    DomainError, EvaluationQuestion, NewPeerEvaluation, PeerEvaluation,
    PeerEvaluationQuestionMapping, PeerEvaluationStatus, RecordMeta, ensure_all_answered,
};
use time::OffsetDateTime;

fn peer_activity(
    record: &PeerEvaluation,
    action: ActivityAction,
    title: String,
    actor: &Actor,
    now: OffsetDateTime,
) -> EvaluationActivity {
    EvaluationActivity::new(
        record.period_id,
        &record.evaluatee_id,
        ActivityType::PeerEvaluation,
        action,
        title,
        actor,
        now,
    )
    .with_related_entity("peer_evaluation", record.id)
}

/// Builds a pending peer evaluation requested by `actor`.
///
/// # Errors
///
/// Returns `DomainError::SelfPeerEvaluation` if evaluator and evaluatee match.
pub fn create_peer_evaluation(
    new: NewPeerEvaluation,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<TransitionResult<PeerEvaluation>, CoreError> {
    new.validate()?;

    let record = PeerEvaluation {
        id: 0,
        period_id: new.period_id,
        evaluator_id: new.evaluator_id,
        evaluatee_id: new.evaluatee_id,
        status: PeerEvaluationStatus::Pending,
        requested_by: actor.id.clone(),
        completed_at: None,
        meta: RecordMeta::new(&actor.id, now),
    };
    let activity = peer_activity(
        &record,
        ActivityAction::Created,
        format!("Peer evaluation requested from {}", record.evaluator_id),
        actor,
        now,
    );
    Ok(TransitionResult::changed(record, Some(activity)))
}

/// Applies a command to a peer evaluation.
///
/// # Errors
///
/// Returns an error if:
/// - A non-evaluator answers or submits
/// - The evaluation is already closed
/// - Submission finds unanswered questions
pub fn apply_peer_evaluation(
    record: &PeerEvaluation,
    command: PeerEvaluationCommand,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<TransitionResult<PeerEvaluation>, CoreError> {
    match command {
        PeerEvaluationCommand::StartAnswering => {
            record.ensure_evaluator(&actor.id)?;
            record.ensure_open()?;
            if record.status == PeerEvaluationStatus::InProgress {
                return Ok(TransitionResult::unchanged(record.clone()));
            }
            record
                .status
                .validate_transition(record.id, PeerEvaluationStatus::InProgress)?;

            let mut updated = record.clone();
            updated.status = PeerEvaluationStatus::InProgress;
            updated.meta.touch(&actor.id, now);
            Ok(TransitionResult::changed(updated, None))
        }
        PeerEvaluationCommand::Submit { mappings } => {
            record.ensure_evaluator(&actor.id)?;
            if record.status == PeerEvaluationStatus::Completed {
                return Ok(TransitionResult::unchanged(record.clone()));
            }
            record
                .status
                .validate_transition(record.id, PeerEvaluationStatus::Completed)?;
            ensure_all_answered(record.id, &mappings)?;

            let mut updated = record.clone();
            updated.status = PeerEvaluationStatus::Completed;
            updated.completed_at = Some(now);
            updated.meta.touch(&actor.id, now);
            let activity = peer_activity(
                &updated,
                ActivityAction::Submitted,
                format!("Peer evaluation {} submitted", updated.id),
                actor,
                now,
            );
            Ok(TransitionResult::changed(updated, Some(activity)))
        }
        PeerEvaluationCommand::Cancel => {
            if record.status == PeerEvaluationStatus::Cancelled {
                return Ok(TransitionResult::unchanged(record.clone()));
            }
            record
                .status
                .validate_transition(record.id, PeerEvaluationStatus::Cancelled)?;

            let mut updated = record.clone();
            updated.status = PeerEvaluationStatus::Cancelled;
            updated.meta.touch(&actor.id, now);
            let activity = peer_activity(
                &updated,
                ActivityAction::Cancelled,
                format!("Peer evaluation {} cancelled", updated.id),
                actor,
                now,
            );
            Ok(TransitionResult::changed(updated, Some(activity)))
        }
    }
}

/// Records an answer on one question mapping.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not the evaluator
/// - The evaluation is closed
/// - The answer is blank
/// - The score is outside the question's bounds
pub fn answer_question(
    evaluation: &PeerEvaluation,
    mapping: &PeerEvaluationQuestionMapping,
    question: &EvaluationQuestion,
    answer: &str,
    score: Option<f64>,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<PeerEvaluationQuestionMapping, CoreError> {
    evaluation.ensure_evaluator(&actor.id)?;
    evaluation.ensure_open()?;
    if answer.trim().is_empty() {
        return Err(DomainError::InvalidValue {
            kind: "answer",
            value: answer.to_string(),
        }
        .into());
    }
    if let Some(score) = score {
        question.validate_score(score)?;
    }

    let mut updated = mapping.clone();
    updated.answer = Some(answer.to_string());
    updated.score = score;
    updated.answered_at = Some(now);
    updated.answered_by = Some(actor.id.clone());
    updated.meta.touch(&actor.id, now);
    Ok(updated)
}

/// Builds a question mapping for an open peer evaluation.
///
/// `existing` holds the evaluation's active mappings.
///
/// # Errors
///
/// Returns an error if the evaluation is closed or the question is already
/// mapped.
pub fn map_question(
    evaluation: &PeerEvaluation,
    existing: &[PeerEvaluationQuestionMapping],
    question_id: i64,
    question_group_id: Option<i64>,
    display_order: i32,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<PeerEvaluationQuestionMapping, CoreError> {
    evaluation.ensure_open()?;
    if existing
        .iter()
        .any(|m| m.question_id == question_id && !m.meta.is_deleted)
    {
        return Err(DomainError::DuplicateQuestionMapping {
            peer_evaluation_id: evaluation.id,
            question_id,
        }
        .into());
    }

    Ok(PeerEvaluationQuestionMapping {
        id: 0,
        peer_evaluation_id: evaluation.id,
        question_id,
        question_group_id,
        display_order,
        answer: None,
        score: None,
        answered_at: None,
        answered_by: None,
        meta: RecordMeta::new(&actor.id, now),
    })
}
