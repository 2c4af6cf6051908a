// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::StepCommand;
use crate::error::CoreError;
use crate::state::{CascadePlan, TransitionResult};
use evalcycle_audit::{ActivityAction, ActivityType, Actor, EvaluationActivity};
use evalcycle_domain::{
    ApprovalStep, DomainError, EvaluationLineMapping, EvaluatorType, RecipientType, RecordMeta,
    StepApproval, StepStatus, normalize_revision_comment,
};
use time::OffsetDateTime;

const NOT_SUBMITTED: &str = "not_submitted";

/// The activity action logged for a step entering `status`.
///
/// # Errors
///
/// Returns `DomainError::UnloggableStepStatus` for every status other than
/// approved and revision requested.
pub fn step_activity_action(status: StepStatus) -> Result<ActivityAction, CoreError> {
    match status {
        StepStatus::Approved => Ok(ActivityAction::Approved),
        StepStatus::RevisionRequested => Ok(ActivityAction::RevisionRequested),
        StepStatus::Pending | StepStatus::RevisionCompleted => Err(
            DomainError::UnloggableStepStatus(status.as_str().to_string()).into(),
        ),
    }
}

fn step_activity(
    record: &StepApproval,
    description: Option<&str>,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<EvaluationActivity, CoreError> {
    let action = step_activity_action(record.status)?;
    let activity = EvaluationActivity::new(
        record.period_id,
        &record.employee_id,
        ActivityType::StepApproval,
        action,
        format!("Step '{}' {}", record.step, record.status),
        actor,
        now,
    )
    .with_related_entity("step_approval", record.id);
    Ok(match description {
        Some(description) => activity.with_description(description),
        None => activity,
    })
}

fn not_submitted(period_id: i64, step: ApprovalStep, target: StepStatus) -> CoreError {
    DomainError::InvalidTransition {
        entity: "step approval",
        id: period_id,
        from: format!("{step}:{NOT_SUBMITTED}"),
        to: target.as_str().to_string(),
    }
    .into()
}

fn transition(
    record: &StepApproval,
    target: StepStatus,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<StepApproval, CoreError> {
    record.status.validate_transition(record.id, target)?;
    let mut updated = record.clone();
    updated.status = target;
    updated.meta.touch(&actor.id, now);
    Ok(updated)
}

/// Applies a command to the approval record of one step.
///
/// `current` is `None` when the step was never submitted.
///
/// # Errors
///
/// Returns an error if:
/// - The step is not in a state the command accepts
/// - A revision request has an empty comment
pub fn apply_step(
    current: Option<&StepApproval>,
    period_id: i64,
    employee_id: &str,
    step: ApprovalStep,
    command: StepCommand,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<TransitionResult<StepApproval>, CoreError> {
    match (command, current) {
        (StepCommand::Submit, None) => {
            let record = StepApproval {
                id: 0,
                period_id,
                employee_id: employee_id.to_string(),
                step,
                status: StepStatus::Pending,
                approved_by: None,
                approved_at: None,
                meta: RecordMeta::new(&actor.id, now),
            };
            Ok(TransitionResult::changed(record, None))
        }
        (StepCommand::Submit, Some(record)) => {
            if record.status == StepStatus::Pending {
                return Ok(TransitionResult::unchanged(record.clone()));
            }
            let updated = transition(record, StepStatus::Pending, actor, now)?;
            Ok(TransitionResult::changed(updated, None))
        }
        (StepCommand::Approve, Some(record)) => {
            if record.status == StepStatus::Approved {
                return Ok(TransitionResult::unchanged(record.clone()));
            }
            let mut updated = transition(record, StepStatus::Approved, actor, now)?;
            updated.approved_by = Some(actor.id.clone());
            updated.approved_at = Some(now);
            let activity = step_activity(&updated, None, actor, now)?;
            Ok(TransitionResult::changed(updated, Some(activity)))
        }
        (StepCommand::RequestRevision { comment }, current) => {
            let comment = normalize_revision_comment(&comment)?;
            let Some(record) = current else {
                return Err(not_submitted(period_id, step, StepStatus::RevisionRequested));
            };
            let updated = transition(record, StepStatus::RevisionRequested, actor, now)?;
            let activity = step_activity(&updated, Some(&comment), actor, now)?;
            Ok(TransitionResult::changed(updated, Some(activity)))
        }
        // Only approvals and revision requests are logged for steps.
        (StepCommand::CompleteRevision, Some(record)) => {
            let updated = transition(record, StepStatus::RevisionCompleted, actor, now)?;
            Ok(TransitionResult::changed(updated, None))
        }
        (StepCommand::Approve, None) => Err(not_submitted(period_id, step, StepStatus::Approved)),
        (StepCommand::CompleteRevision, None) => Err(not_submitted(
            period_id,
            step,
            StepStatus::RevisionCompleted,
        )),
    }
}

/// Decides which steps after `step` an approval cascade approves.
///
/// Only steps awaiting a decision are approved. Steps never submitted or
/// waiting on a revision are skipped; already approved steps are neither.
#[must_use]
pub fn plan_cascade(step: ApprovalStep, existing: &[StepApproval]) -> CascadePlan {
    let mut plan = CascadePlan::default();
    for later in step.subsequent() {
        let status = existing
            .iter()
            .find(|approval| approval.step == later && !approval.meta.is_deleted)
            .map(|approval| approval.status);
        match status {
            Some(StepStatus::Approved) => {}
            Some(status) if status.awaits_decision() => plan.approve.push(later),
            other => plan.skipped.push((later, other)),
        }
    }
    plan
}

/// Derives who must respond to a revision request on `step`.
///
/// `mappings` pairs the employee's active evaluator mappings with the type
/// of their evaluation line. Recipients are deduplicated by id, keeping the
/// first role found.
#[must_use]
pub fn revision_recipients(
    step: ApprovalStep,
    employee_id: &str,
    mappings: &[(EvaluationLineMapping, EvaluatorType)],
) -> Vec<(String, RecipientType)> {
    let mut recipients: Vec<(String, RecipientType)> = Vec::new();
    for recipient_type in step.revision_recipients() {
        let ids: Vec<String> = match recipient_type {
            RecipientType::Evaluatee => vec![employee_id.to_string()],
            RecipientType::PrimaryEvaluator | RecipientType::SecondaryEvaluator => {
                let wanted = if *recipient_type == RecipientType::PrimaryEvaluator {
                    EvaluatorType::Primary
                } else {
                    EvaluatorType::Secondary
                };
                mappings
                    .iter()
                    .filter(|(mapping, evaluator_type)| {
                        *evaluator_type == wanted
                            && !mapping.meta.is_deleted
                            && mapping.employee_id == employee_id
                    })
                    .map(|(mapping, _)| mapping.evaluator_id.clone())
                    .collect()
            }
        };
        for id in ids {
            if !recipients.iter().any(|(existing, _)| *existing == id) {
                recipients.push((id, *recipient_type));
            }
        }
    }
    recipients
}
