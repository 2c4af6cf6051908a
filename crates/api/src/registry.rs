// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Evaluation line registry: who evaluates whom.

use evalcycle_audit::{Actor, EvaluationActivity};
use evalcycle_domain::{
    EvaluationLine, EvaluationLineMapping, EvaluatorAssignment, EvaluatorType, RecordMeta,
    RequiredEvaluatorMissing, find_missing_required_evaluators,
};
use evalcycle_persistence::Persistence;
use time::OffsetDateTime;
use tracing::info;

use crate::auth::{AuthenticatedActor, require_admin};
use crate::error::ApiError;
use crate::request_response::{BatchItemResult, CreateEvaluationLineRequest};
use crate::{EvaluationService, with_entity_id};

/// The lines every installation starts with.
const DEFAULT_LINES: [(EvaluatorType, i32, bool); 2] = [
    (EvaluatorType::Primary, 1, true),
    (EvaluatorType::Secondary, 2, false),
];

fn assign_in_transaction(
    p: &mut Persistence,
    assignment: &EvaluatorAssignment,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<(i64, Option<EvaluationActivity>), ApiError> {
    let line = p
        .find_evaluation_line_by_type(assignment.evaluator_type)?
        .ok_or_else(|| {
            ApiError::not_found(
                "Evaluation line",
                format!("No {} evaluation line is configured", assignment.evaluator_type),
            )
        })?;
    let existing = p.list_mappings_for_employee(Some(assignment.period_id), &assignment.employee_id)?;

    let result = evalcycle::assign_evaluator(assignment.clone(), line.id, &existing, actor, now)?;
    let mapping_id = p.insert_mapping(&result.record)?;
    Ok((mapping_id, with_entity_id(result.activity, mapping_id)))
}

impl EvaluationService {
    /// Creates the primary and secondary lines when they are missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not an admin or the store fails.
    pub fn ensure_default_evaluation_lines(
        &mut self,
        actor: &AuthenticatedActor,
    ) -> Result<Vec<EvaluationLine>, ApiError> {
        require_admin(actor, "ensure_default_evaluation_lines")?;
        let now = self.now();

        self.persistence.transaction(|p| {
            for (evaluator_type, display_order, is_required) in DEFAULT_LINES {
                if p.find_evaluation_line_by_type(evaluator_type)?.is_some() {
                    continue;
                }
                let line = EvaluationLine {
                    id: 0,
                    evaluator_type,
                    display_order,
                    is_required,
                    is_auto_assigned: false,
                    meta: RecordMeta::new(&actor.id, now),
                };
                let line_id = p.insert_evaluation_line(&line)?;
                info!(line_id, %evaluator_type, "Created default evaluation line");
            }
            Ok(p.list_evaluation_lines()?)
        })
    }

    /// Adds an evaluation line. Type and display order must both be unused.
    ///
    /// # Errors
    ///
    /// Returns `Duplicate` if a line with the same type or order exists.
    pub fn create_evaluation_line(
        &mut self,
        actor: &AuthenticatedActor,
        request: &CreateEvaluationLineRequest,
    ) -> Result<EvaluationLine, ApiError> {
        require_admin(actor, "create_evaluation_line")?;
        let now = self.now();

        self.persistence.transaction(|p| {
            let lines = p.list_evaluation_lines()?;
            if let Some(clash) = lines.iter().find(|line| {
                line.evaluator_type == request.evaluator_type
                    || line.display_order == request.display_order
            }) {
                return Err(ApiError::Duplicate {
                    resource_type: String::from("evaluation line"),
                    message: format!(
                        "Line {} ({}, order {}) already uses this type or order",
                        clash.id, clash.evaluator_type, clash.display_order
                    ),
                });
            }

            let mut line = EvaluationLine {
                id: 0,
                evaluator_type: request.evaluator_type,
                display_order: request.display_order,
                is_required: request.is_required,
                is_auto_assigned: request.is_auto_assigned,
                meta: RecordMeta::new(&actor.id, now),
            };
            line.id = p.insert_evaluation_line(&line)?;
            Ok(line)
        })
    }

    /// Assigns an evaluator to an employee for a period.
    ///
    /// # Errors
    ///
    /// Returns an error if the evaluator is the employee, the same
    /// assignment is already active, or the line type is not configured.
    pub fn assign_evaluator(
        &mut self,
        actor: &AuthenticatedActor,
        assignment: &EvaluatorAssignment,
    ) -> Result<i64, ApiError> {
        require_admin(actor, "assign_evaluator")?;
        self.period(assignment.period_id)?;
        let audit_actor = actor.to_audit_actor();
        let now = self.now();

        let (mapping_id, activity) = self
            .persistence
            .transaction(|p| assign_in_transaction(p, assignment, &audit_actor, now))?;

        info!(
            mapping_id,
            employee_id = %assignment.employee_id,
            evaluator_id = %assignment.evaluator_id,
            "Assigned evaluator"
        );
        self.record_activities(activity.as_slice());
        Ok(mapping_id)
    }

    /// Assigns many evaluators. Each item succeeds or fails on its own.
    ///
    /// # Errors
    ///
    /// Returns an error only if the actor is not an admin or the outer
    /// transaction cannot be opened or committed.
    pub fn assign_evaluators_batch(
        &mut self,
        actor: &AuthenticatedActor,
        assignments: &[EvaluatorAssignment],
    ) -> Result<Vec<BatchItemResult>, ApiError> {
        require_admin(actor, "assign_evaluators_batch")?;
        let audit_actor = actor.to_audit_actor();
        let now = self.now();
        let period_checks: Vec<Result<(), ApiError>> = assignments
            .iter()
            .map(|a| self.period(a.period_id).map(|_| ()))
            .collect();

        let (results, activities) = self.persistence.transaction(|p| {
            let mut results: Vec<BatchItemResult> = Vec::with_capacity(assignments.len());
            let mut activities: Vec<EvaluationActivity> = Vec::new();
            for (index, (assignment, period_check)) in
                assignments.iter().zip(period_checks).enumerate()
            {
                let outcome = period_check.and_then(|()| {
                    p.transaction(|p| assign_in_transaction(p, assignment, &audit_actor, now))
                });
                let outcome = outcome.map(|(mapping_id, activity)| {
                    activities.extend(activity);
                    mapping_id
                });
                results.push(BatchItemResult { index, outcome });
            }
            Ok::<_, ApiError>((results, activities))
        })?;

        let succeeded = results.iter().filter(|r| r.is_success()).count();
        info!(
            total = results.len(),
            succeeded,
            failed = results.len() - succeeded,
            "Processed evaluator assignment batch"
        );
        self.record_activities(&activities);
        Ok(results)
    }

    /// Soft-deletes an evaluator assignment.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the mapping does not exist or is already deleted.
    pub fn remove_assignment(
        &mut self,
        actor: &AuthenticatedActor,
        mapping_id: i64,
    ) -> Result<(), ApiError> {
        require_admin(actor, "remove_assignment")?;
        let audit_actor = actor.to_audit_actor();
        let now = self.now();

        let activity = self.persistence.transaction(|p| {
            let (mapping, _) = p.get_mapping(mapping_id)?.ok_or_else(|| {
                ApiError::not_found(
                    "Evaluator assignment",
                    format!("Evaluator assignment {mapping_id} does not exist"),
                )
            })?;
            let result = evalcycle::remove_assignment(&mapping, &audit_actor, now);
            p.update_mapping(&result.record)?;
            Ok::<_, ApiError>(result.activity)
        })?;

        info!(mapping_id, "Removed evaluator assignment");
        self.record_activities(activity.as_slice());
        Ok(())
    }

    /// Lists the active assignments where `evaluator_id` evaluates someone.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_for_evaluator(
        &mut self,
        period_id: Option<i64>,
        evaluator_id: &str,
    ) -> Result<Vec<(EvaluationLineMapping, EvaluatorType)>, ApiError> {
        Ok(self
            .persistence
            .list_mappings_for_evaluator(period_id, evaluator_id)?)
    }

    /// Lists the active evaluators of `employee_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_for_employee(
        &mut self,
        period_id: Option<i64>,
        employee_id: &str,
    ) -> Result<Vec<(EvaluationLineMapping, EvaluatorType)>, ApiError> {
        Ok(self
            .persistence
            .list_mappings_for_employee(period_id, employee_id)?)
    }

    /// Reports required lines that have no evaluator for the employee.
    ///
    /// An empty list means the employee is fully staffed.
    ///
    /// # Errors
    ///
    /// Returns an error if the period is unknown or a query fails.
    pub fn validate_required_evaluators(
        &mut self,
        period_id: i64,
        employee_id: &str,
    ) -> Result<Vec<RequiredEvaluatorMissing>, ApiError> {
        self.period(period_id)?;
        let lines = self.persistence.list_evaluation_lines()?;
        let mappings: Vec<EvaluationLineMapping> = self
            .persistence
            .list_mappings_for_employee(Some(period_id), employee_id)?
            .into_iter()
            .map(|(mapping, _)| mapping)
            .collect();
        Ok(find_missing_required_evaluators(
            period_id,
            employee_id,
            &lines,
            &mappings,
        ))
    }
}
