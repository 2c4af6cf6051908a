// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::state::TransitionResult;
use evalcycle_audit::{ActivityAction, ActivityType, Actor, EvaluationActivity};
use evalcycle_domain::{
    EvaluationLineMapping, EvaluatorAssignment, EvaluatorType, RecordMeta,
};
use time::OffsetDateTime;

fn mapping_activity(
    mapping: &EvaluationLineMapping,
    action: ActivityAction,
    title: String,
    actor: &Actor,
    now: OffsetDateTime,
) -> EvaluationActivity {
    EvaluationActivity::new(
        mapping.period_id,
        &mapping.employee_id,
        ActivityType::EvaluationLine,
        action,
        title,
        actor,
        now,
    )
    .with_related_entity("evaluation_line_mapping", mapping.id)
}

/// Builds the mapping for a new evaluator assignment.
///
/// `existing` pairs the employee's active mappings with their line type.
///
/// # Errors
///
/// Returns an error if:
/// - The employee would evaluate themselves
/// - The same evaluator already holds the slot for the same scope
pub fn assign_evaluator(
    assignment: EvaluatorAssignment,
    evaluation_line_id: i64,
    existing: &[(EvaluationLineMapping, EvaluatorType)],
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<TransitionResult<EvaluationLineMapping>, CoreError> {
    assignment.validate()?;
    assignment.ensure_not_duplicate(existing)?;

    let mapping = EvaluationLineMapping {
        id: 0,
        period_id: assignment.period_id,
        employee_id: assignment.employee_id,
        evaluator_id: assignment.evaluator_id,
        work_item_id: assignment.work_item_id,
        evaluation_line_id,
        meta: RecordMeta::new(&actor.id, now),
    };
    let activity = mapping_activity(
        &mapping,
        ActivityAction::Created,
        format!(
            "{} evaluator '{}' assigned",
            assignment.evaluator_type, mapping.evaluator_id
        ),
        actor,
        now,
    );
    Ok(TransitionResult::changed(mapping, Some(activity)))
}

/// Soft-deletes an assignment.
#[must_use]
pub fn remove_assignment(
    mapping: &EvaluationLineMapping,
    actor: &Actor,
    now: OffsetDateTime,
) -> TransitionResult<EvaluationLineMapping> {
    let mut updated = mapping.clone();
    updated.meta.mark_deleted(&actor.id, now);
    let activity = mapping_activity(
        &updated,
        ActivityAction::Deleted,
        format!("Evaluator '{}' unassigned", updated.evaluator_id),
        actor,
        now,
    );
    TransitionResult::changed(updated, Some(activity))
}
