// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Self-evaluation submission: single records and bulk runs.

use evalcycle::SelfEvaluationCommand;
use evalcycle_audit::{Actor, EvaluationActivity};
use evalcycle_domain::{NewSelfEvaluation, PeriodConfig, SelfEvaluation, SelfEvaluationState};
use evalcycle_persistence::Persistence;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::auth::{AuthenticatedActor, Role, require_owner_or_reviewer};
use crate::error::ApiError;
use crate::request_response::{BulkResult, UpsertSelfEvaluationRequest};
use crate::{EvaluationService, with_entity_id};

/// Commands only an evaluator or admin may issue.
const fn is_reviewer_command(command: &SelfEvaluationCommand) -> bool {
    matches!(
        command,
        SelfEvaluationCommand::SubmitToManager
            | SelfEvaluationCommand::Complete
            | SelfEvaluationCommand::Uncomplete
            | SelfEvaluationCommand::ResetToEvaluator
            | SelfEvaluationCommand::ResetToDraft
    )
}

fn command_name(command: &SelfEvaluationCommand) -> &'static str {
    match command {
        SelfEvaluationCommand::UpsertContent { .. } => "edit self evaluation",
        SelfEvaluationCommand::SubmitToEvaluator => "submit self evaluation to evaluator",
        SelfEvaluationCommand::SubmitToManager => "submit self evaluation to manager",
        SelfEvaluationCommand::Complete => "complete self evaluation",
        SelfEvaluationCommand::Uncomplete => "uncomplete self evaluation",
        SelfEvaluationCommand::ResetToEvaluator => "return self evaluation to evaluator",
        SelfEvaluationCommand::Withdraw => "withdraw self evaluation",
        SelfEvaluationCommand::ResetToDraft => "reset self evaluation",
        SelfEvaluationCommand::ClearContent => "clear self evaluation content",
        SelfEvaluationCommand::Delete => "delete self evaluation",
    }
}

/// Clearing content also un-submits the record, so once it reaches the
/// manager only a reviewer may clear it.
const fn needs_reviewer(record: &SelfEvaluation, command: &SelfEvaluationCommand) -> bool {
    if is_reviewer_command(command) {
        return true;
    }
    matches!(command, SelfEvaluationCommand::ClearContent)
        && matches!(
            record.state(),
            SelfEvaluationState::SubmittedToManager | SelfEvaluationState::Completed
        )
}

fn authorize(
    actor: &AuthenticatedActor,
    record: &SelfEvaluation,
    command: &SelfEvaluationCommand,
) -> Result<(), ApiError> {
    let action = command_name(command);
    if needs_reviewer(record, command) && actor.role == Role::Employee {
        return Err(ApiError::Unauthorized {
            action: action.to_string(),
            required_role: String::from("Evaluator"),
        });
    }
    require_owner_or_reviewer(actor, &record.employee_id, action)
}

/// Applies one command to a stored record and saves it if it changed.
fn apply_and_save(
    p: &mut Persistence,
    record: &SelfEvaluation,
    command: SelfEvaluationCommand,
    period: &PeriodConfig,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<(SelfEvaluation, Option<EvaluationActivity>), ApiError> {
    let result = evalcycle::apply_self_evaluation(record, command, period, actor, now)?;
    let mut updated = result.record;
    if result.changed {
        updated.meta.version = p.update_self_evaluation(&updated)?;
    }
    Ok((updated, result.activity))
}

impl EvaluationService {
    /// Creates the self evaluation for a work item, or edits its content.
    ///
    /// Editing is only allowed while the record is a draft.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the record was already submitted and
    /// `InvalidInput` if the score is outside `[0, max]`.
    pub fn upsert_self_evaluation(
        &mut self,
        actor: &AuthenticatedActor,
        request: &UpsertSelfEvaluationRequest,
    ) -> Result<SelfEvaluation, ApiError> {
        require_owner_or_reviewer(actor, &request.employee_id, "edit self evaluation")?;
        let period = self.period(request.period_id)?;
        let audit_actor = actor.to_audit_actor();
        let now = self.now();

        let (record, activity) = self.persistence.transaction(|p| {
            let existing = p.find_self_evaluation(
                &request.employee_id,
                request.work_item_id,
                request.period_id,
            )?;
            if let Some(existing) = existing {
                let command = SelfEvaluationCommand::UpsertContent {
                    content: request.content.clone(),
                    score: request.score,
                };
                return apply_and_save(p, &existing, command, &period, &audit_actor, now);
            }

            let new = NewSelfEvaluation {
                period_id: request.period_id,
                employee_id: request.employee_id.clone(),
                work_item_id: request.work_item_id,
                project_id: request.project_id,
                content: request.content.clone(),
                score: request.score,
            };
            let result = evalcycle::create_self_evaluation(new, &period, &audit_actor, now)?;
            let mut record = result.record;
            record.id = p.insert_self_evaluation(&record)?;
            let activity = with_entity_id(result.activity, record.id);
            Ok((record, activity))
        })?;

        info!(
            self_evaluation_id = record.id,
            employee_id = %record.employee_id,
            "Saved self evaluation"
        );
        self.record_activities(activity.as_slice());
        Ok(record)
    }

    fn transition_self_evaluation(
        &mut self,
        actor: &AuthenticatedActor,
        self_evaluation_id: i64,
        command: SelfEvaluationCommand,
    ) -> Result<SelfEvaluation, ApiError> {
        let audit_actor = actor.to_audit_actor();
        let now = self.now();
        let current = self
            .persistence
            .get_self_evaluation(self_evaluation_id)?
            .ok_or_else(|| {
                ApiError::not_found(
                    "Self evaluation",
                    format!("Self evaluation {self_evaluation_id} does not exist"),
                )
            })?;
        authorize(actor, &current, &command)?;
        let period = self.period(current.period_id)?;

        let (record, activity) = self.persistence.transaction(|p| {
            apply_and_save(p, &current, command, &period, &audit_actor, now)
        })?;

        debug!(
            self_evaluation_id,
            state = %record.state(),
            "Self evaluation transition applied"
        );
        self.record_activities(activity.as_slice());
        Ok(record)
    }

    /// Draft to submitted-to-evaluator.
    ///
    /// # Errors
    ///
    /// Returns `CannotSubmit` when content or score is missing or invalid.
    pub fn submit_self_evaluation_to_evaluator(
        &mut self,
        actor: &AuthenticatedActor,
        self_evaluation_id: i64,
    ) -> Result<SelfEvaluation, ApiError> {
        self.transition_self_evaluation(
            actor,
            self_evaluation_id,
            SelfEvaluationCommand::SubmitToEvaluator,
        )
    }

    /// Submitted-to-evaluator to submitted-to-manager. Evaluators only.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the record is with the evaluator.
    pub fn submit_self_evaluation_to_manager(
        &mut self,
        actor: &AuthenticatedActor,
        self_evaluation_id: i64,
    ) -> Result<SelfEvaluation, ApiError> {
        self.transition_self_evaluation(
            actor,
            self_evaluation_id,
            SelfEvaluationCommand::SubmitToManager,
        )
    }

    /// Marks a self evaluation completed.
    ///
    /// # Errors
    ///
    /// Returns `CannotSubmit` when content or score is missing or invalid.
    pub fn complete_self_evaluation(
        &mut self,
        actor: &AuthenticatedActor,
        self_evaluation_id: i64,
    ) -> Result<SelfEvaluation, ApiError> {
        self.transition_self_evaluation(actor, self_evaluation_id, SelfEvaluationCommand::Complete)
    }

    /// Completed back to submitted-to-manager.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the record is completed.
    pub fn uncomplete_self_evaluation(
        &mut self,
        actor: &AuthenticatedActor,
        self_evaluation_id: i64,
    ) -> Result<SelfEvaluation, ApiError> {
        self.transition_self_evaluation(
            actor,
            self_evaluation_id,
            SelfEvaluationCommand::Uncomplete,
        )
    }

    /// The manager sends the record back to the evaluator.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the record is with the manager.
    pub fn return_self_evaluation_to_evaluator(
        &mut self,
        actor: &AuthenticatedActor,
        self_evaluation_id: i64,
    ) -> Result<SelfEvaluation, ApiError> {
        self.transition_self_evaluation(
            actor,
            self_evaluation_id,
            SelfEvaluationCommand::ResetToEvaluator,
        )
    }

    /// Submitted-to-evaluator back to draft.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the record is with the evaluator.
    pub fn withdraw_self_evaluation(
        &mut self,
        actor: &AuthenticatedActor,
        self_evaluation_id: i64,
    ) -> Result<SelfEvaluation, ApiError> {
        self.transition_self_evaluation(actor, self_evaluation_id, SelfEvaluationCommand::Withdraw)
    }

    /// Clears content and score and returns the record to draft.
    ///
    /// Employees may only clear their own records while they are drafts or
    /// with the evaluator.
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not exist or the actor may not
    /// edit it.
    pub fn clear_self_evaluation_content(
        &mut self,
        actor: &AuthenticatedActor,
        self_evaluation_id: i64,
    ) -> Result<SelfEvaluation, ApiError> {
        self.transition_self_evaluation(
            actor,
            self_evaluation_id,
            SelfEvaluationCommand::ClearContent,
        )
    }

    /// Soft-deletes a self evaluation.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the record does not exist.
    pub fn delete_self_evaluation(
        &mut self,
        actor: &AuthenticatedActor,
        self_evaluation_id: i64,
    ) -> Result<(), ApiError> {
        self.transition_self_evaluation(actor, self_evaluation_id, SelfEvaluationCommand::Delete)
            .map(|_| ())
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_self_evaluation(
        &mut self,
        self_evaluation_id: i64,
    ) -> Result<Option<SelfEvaluation>, ApiError> {
        Ok(self.persistence.get_self_evaluation(self_evaluation_id)?)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_self_evaluations(
        &mut self,
        employee_id: &str,
        period_id: i64,
    ) -> Result<Vec<SelfEvaluation>, ApiError> {
        Ok(self
            .persistence
            .list_self_evaluations(employee_id, period_id, None)?)
    }

    /// Applies one command to every matching self evaluation.
    ///
    /// Each record runs in its own savepoint so a failure rolls back only
    /// that record.
    fn bulk_self_evaluations(
        &mut self,
        actor: &AuthenticatedActor,
        employee_id: &str,
        period_id: i64,
        project_id: Option<i64>,
        command: &SelfEvaluationCommand,
    ) -> Result<BulkResult, ApiError> {
        let period = self.period(period_id)?;
        let audit_actor = actor.to_audit_actor();
        let now = self.now();

        let records = self
            .persistence
            .list_self_evaluations(employee_id, period_id, project_id)?;
        if records.is_empty() {
            let scope = project_id.map_or_else(String::new, |id| format!(" in project {id}"));
            return Err(ApiError::NoRecordsFound {
                message: format!(
                    "No self evaluations for employee '{employee_id}' in period {period_id}{scope}"
                ),
            });
        }

        let (result, activities) = self.persistence.transaction(|p| {
            let mut result = BulkResult::default();
            let mut activities: Vec<EvaluationActivity> = Vec::new();
            for record in &records {
                let outcome = authorize(actor, record, command).and_then(|()| {
                    p.transaction(|p| {
                        apply_and_save(p, record, command.clone(), &period, &audit_actor, now)
                    })
                });
                match outcome {
                    Ok((_, activity)) => {
                        activities.extend(activity);
                        result.record_success();
                    }
                    Err(e) => {
                        debug!(self_evaluation_id = record.id, error = %e, "Bulk item failed");
                        result.record_failure(record.id, &e);
                    }
                }
            }
            Ok::<_, ApiError>((result, activities))
        })?;

        info!(
            employee_id,
            period_id,
            total = result.total_count,
            succeeded = result.success_count,
            failed = result.failed_count,
            "{}",
            command_name(command)
        );
        self.record_activities(&activities);
        Ok(result)
    }

    /// Submits every self evaluation of the employee to the evaluator.
    ///
    /// # Errors
    ///
    /// Returns `NoRecordsFound` if the employee has no self evaluations in
    /// the period. Per-record failures are reported in the result.
    pub fn submit_all_to_evaluator(
        &mut self,
        actor: &AuthenticatedActor,
        employee_id: &str,
        period_id: i64,
    ) -> Result<BulkResult, ApiError> {
        self.bulk_self_evaluations(
            actor,
            employee_id,
            period_id,
            None,
            &SelfEvaluationCommand::SubmitToEvaluator,
        )
    }

    /// Project-scoped [`Self::submit_all_to_evaluator`].
    ///
    /// # Errors
    ///
    /// Returns `NoRecordsFound` if nothing matches.
    pub fn submit_all_to_evaluator_for_project(
        &mut self,
        actor: &AuthenticatedActor,
        employee_id: &str,
        period_id: i64,
        project_id: i64,
    ) -> Result<BulkResult, ApiError> {
        self.bulk_self_evaluations(
            actor,
            employee_id,
            period_id,
            Some(project_id),
            &SelfEvaluationCommand::SubmitToEvaluator,
        )
    }

    /// Forwards every self evaluation of the employee to the manager.
    ///
    /// # Errors
    ///
    /// Returns `NoRecordsFound` if nothing matches.
    pub fn submit_all_to_manager(
        &mut self,
        actor: &AuthenticatedActor,
        employee_id: &str,
        period_id: i64,
    ) -> Result<BulkResult, ApiError> {
        self.bulk_self_evaluations(
            actor,
            employee_id,
            period_id,
            None,
            &SelfEvaluationCommand::SubmitToManager,
        )
    }

    /// Project-scoped [`Self::submit_all_to_manager`].
    ///
    /// # Errors
    ///
    /// Returns `NoRecordsFound` if nothing matches.
    pub fn submit_all_to_manager_for_project(
        &mut self,
        actor: &AuthenticatedActor,
        employee_id: &str,
        period_id: i64,
        project_id: i64,
    ) -> Result<BulkResult, ApiError> {
        self.bulk_self_evaluations(
            actor,
            employee_id,
            period_id,
            Some(project_id),
            &SelfEvaluationCommand::SubmitToManager,
        )
    }

    /// Returns every self evaluation of the employee to draft.
    ///
    /// # Errors
    ///
    /// Returns `NoRecordsFound` if nothing matches.
    pub fn reset_all_for_employee_period(
        &mut self,
        actor: &AuthenticatedActor,
        employee_id: &str,
        period_id: i64,
    ) -> Result<BulkResult, ApiError> {
        self.bulk_self_evaluations(
            actor,
            employee_id,
            period_id,
            None,
            &SelfEvaluationCommand::ResetToDraft,
        )
    }

    /// Project-scoped [`Self::reset_all_for_employee_period`].
    ///
    /// # Errors
    ///
    /// Returns `NoRecordsFound` if nothing matches.
    pub fn reset_all_for_project(
        &mut self,
        actor: &AuthenticatedActor,
        employee_id: &str,
        period_id: i64,
        project_id: i64,
    ) -> Result<BulkResult, ApiError> {
        self.bulk_self_evaluations(
            actor,
            employee_id,
            period_id,
            Some(project_id),
            &SelfEvaluationCommand::ResetToDraft,
        )
    }

    /// Clears content and score of every self evaluation of the employee.
    ///
    /// # Errors
    ///
    /// Returns `NoRecordsFound` if nothing matches.
    pub fn clear_content_for_employee_period(
        &mut self,
        actor: &AuthenticatedActor,
        employee_id: &str,
        period_id: i64,
    ) -> Result<BulkResult, ApiError> {
        self.bulk_self_evaluations(
            actor,
            employee_id,
            period_id,
            None,
            &SelfEvaluationCommand::ClearContent,
        )
    }

    /// Project-scoped [`Self::clear_content_for_employee_period`].
    ///
    /// # Errors
    ///
    /// Returns `NoRecordsFound` if nothing matches.
    pub fn clear_content_for_project(
        &mut self,
        actor: &AuthenticatedActor,
        employee_id: &str,
        period_id: i64,
        project_id: i64,
    ) -> Result<BulkResult, ApiError> {
        self.bulk_self_evaluations(
            actor,
            employee_id,
            period_id,
            Some(project_id),
            &SelfEvaluationCommand::ClearContent,
        )
    }
}
