// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Downward evaluations written by evaluators about their reports.

use evalcycle::DownwardEvaluationCommand;
use evalcycle_audit::{Actor, EvaluationActivity};
use evalcycle_domain::{
    DomainError, DownwardEvaluation, DownwardEvaluationType, NewDownwardEvaluation, PeriodConfig,
};
use evalcycle_persistence::Persistence;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::auth::AuthenticatedActor;
use crate::error::ApiError;
use crate::request_response::{BulkResult, UpsertDownwardEvaluationRequest};
use crate::{EvaluationService, with_entity_id};

fn apply_and_save(
    p: &mut Persistence,
    record: &DownwardEvaluation,
    command: DownwardEvaluationCommand,
    period: &PeriodConfig,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<(DownwardEvaluation, Option<EvaluationActivity>), ApiError> {
    let result = evalcycle::apply_downward_evaluation(record, command, period, actor, now)?;
    let mut updated = result.record;
    if result.changed {
        updated.meta.version = p.update_downward_evaluation(&updated)?;
    }
    Ok((updated, result.activity))
}

impl EvaluationService {
    /// Creates a downward evaluation or edits the open one.
    ///
    /// # Errors
    ///
    /// Returns `PeriodExpired` after the downward deadline,
    /// `PermissionDenied` if a non-admin writes for another evaluator, and
    /// `AlreadyCompleted` when editing a completed evaluation.
    pub fn upsert_downward_evaluation(
        &mut self,
        actor: &AuthenticatedActor,
        request: &UpsertDownwardEvaluationRequest,
    ) -> Result<DownwardEvaluation, ApiError> {
        if !actor.is_admin() && actor.id != request.evaluator_id {
            return Err(DomainError::EvaluatorMismatch {
                expected: request.evaluator_id.clone(),
                actual: actor.id.clone(),
            }
            .into());
        }
        let period = self.period(request.period_id)?;
        let audit_actor = actor.to_audit_actor();
        let now = self.now();

        let (record, activity) = self.persistence.transaction(|p| {
            if let Some(self_evaluation_id) = request.self_evaluation_id {
                if p.get_self_evaluation(self_evaluation_id)?.is_none() {
                    return Err(ApiError::not_found(
                        "Self evaluation",
                        format!("Self evaluation {self_evaluation_id} does not exist"),
                    ));
                }
            }

            let existing = p.find_downward_evaluation(
                &request.evaluator_id,
                &request.employee_id,
                request.period_id,
                request.evaluation_type,
                request.work_item_id,
            )?;
            if let Some(existing) = existing {
                let command = DownwardEvaluationCommand::Upsert {
                    content: request.content.clone(),
                    score: request.score,
                    self_evaluation_id: request.self_evaluation_id,
                };
                return apply_and_save(p, &existing, command, &period, &audit_actor, now);
            }

            let new = NewDownwardEvaluation {
                period_id: request.period_id,
                evaluator_id: request.evaluator_id.clone(),
                employee_id: request.employee_id.clone(),
                evaluation_type: request.evaluation_type,
                work_item_id: request.work_item_id,
                self_evaluation_id: request.self_evaluation_id,
                content: request.content.clone(),
                score: request.score,
            };
            let result = evalcycle::create_downward_evaluation(new, &period, &audit_actor, now)?;
            let mut record = result.record;
            record.id = p.insert_downward_evaluation(&record)?;
            let activity = with_entity_id(result.activity, record.id);
            Ok((record, activity))
        })?;

        info!(
            downward_evaluation_id = record.id,
            evaluator_id = %record.evaluator_id,
            employee_id = %record.employee_id,
            "Saved downward evaluation"
        );
        self.record_activities(activity.as_slice());
        Ok(record)
    }

    fn transition_downward_evaluation(
        &mut self,
        actor: &AuthenticatedActor,
        downward_evaluation_id: i64,
        command: DownwardEvaluationCommand,
    ) -> Result<DownwardEvaluation, ApiError> {
        let audit_actor = actor.to_audit_actor();
        let now = self.now();
        let current = self
            .persistence
            .get_downward_evaluation(downward_evaluation_id)?
            .ok_or_else(|| {
                ApiError::not_found(
                    "Downward evaluation",
                    format!("Downward evaluation {downward_evaluation_id} does not exist"),
                )
            })?;
        let period = self.period(current.period_id)?;

        let (record, activity) = self.persistence.transaction(|p| {
            apply_and_save(p, &current, command, &period, &audit_actor, now)
        })?;

        self.record_activities(activity.as_slice());
        Ok(record)
    }

    /// Marks a downward evaluation completed.
    ///
    /// # Errors
    ///
    /// Returns `CannotSubmit` without a valid score and `PeriodExpired`
    /// after the deadline.
    pub fn complete_downward_evaluation(
        &mut self,
        actor: &AuthenticatedActor,
        downward_evaluation_id: i64,
    ) -> Result<DownwardEvaluation, ApiError> {
        self.transition_downward_evaluation(
            actor,
            downward_evaluation_id,
            DownwardEvaluationCommand::Complete,
        )
    }

    /// Reopens a completed downward evaluation. A no-op if it is open.
    ///
    /// # Errors
    ///
    /// Returns `PeriodExpired` after the deadline.
    pub fn reset_downward_evaluation(
        &mut self,
        actor: &AuthenticatedActor,
        downward_evaluation_id: i64,
    ) -> Result<DownwardEvaluation, ApiError> {
        self.transition_downward_evaluation(
            actor,
            downward_evaluation_id,
            DownwardEvaluationCommand::Reset,
        )
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_downward_evaluation(
        &mut self,
        downward_evaluation_id: i64,
    ) -> Result<Option<DownwardEvaluation>, ApiError> {
        Ok(self
            .persistence
            .get_downward_evaluation(downward_evaluation_id)?)
    }

    fn bulk_downward_evaluations(
        &mut self,
        actor: &AuthenticatedActor,
        evaluator_id: &str,
        employee_id: &str,
        period_id: i64,
        evaluation_type: Option<DownwardEvaluationType>,
        command: &DownwardEvaluationCommand,
    ) -> Result<BulkResult, ApiError> {
        let period = self.period(period_id)?;
        let audit_actor = actor.to_audit_actor();
        let now = self.now();

        let records = self.persistence.list_downward_evaluations(
            evaluator_id,
            employee_id,
            period_id,
            evaluation_type,
        )?;
        if records.is_empty() {
            return Err(ApiError::NoRecordsFound {
                message: format!(
                    "No downward evaluations by '{evaluator_id}' for employee '{employee_id}' in period {period_id}"
                ),
            });
        }

        let (result, activities) = self.persistence.transaction(|p| {
            let mut result = BulkResult::default();
            let mut activities: Vec<EvaluationActivity> = Vec::new();
            for record in &records {
                let outcome = p.transaction(|p| {
                    apply_and_save(p, record, command.clone(), &period, &audit_actor, now)
                });
                match outcome {
                    Ok((_, activity)) => {
                        activities.extend(activity);
                        result.record_success();
                    }
                    Err(e) => {
                        debug!(downward_evaluation_id = record.id, error = %e, "Bulk item failed");
                        result.record_failure(record.id, &e);
                    }
                }
            }
            Ok::<_, ApiError>((result, activities))
        })?;

        info!(
            evaluator_id,
            employee_id,
            period_id,
            total = result.total_count,
            succeeded = result.success_count,
            failed = result.failed_count,
            "Processed downward evaluations"
        );
        self.record_activities(&activities);
        Ok(result)
    }

    /// Completes every downward evaluation the evaluator wrote for the
    /// employee, optionally limited to one evaluation type.
    ///
    /// # Errors
    ///
    /// Returns `NoRecordsFound` if nothing matches.
    pub fn complete_all_for_evaluator(
        &mut self,
        actor: &AuthenticatedActor,
        evaluator_id: &str,
        employee_id: &str,
        period_id: i64,
        evaluation_type: Option<DownwardEvaluationType>,
    ) -> Result<BulkResult, ApiError> {
        self.bulk_downward_evaluations(
            actor,
            evaluator_id,
            employee_id,
            period_id,
            evaluation_type,
            &DownwardEvaluationCommand::Complete,
        )
    }

    /// Reopens every downward evaluation the evaluator wrote for the
    /// employee.
    ///
    /// # Errors
    ///
    /// Returns `NoRecordsFound` if nothing matches.
    pub fn reset_all_for_evaluator(
        &mut self,
        actor: &AuthenticatedActor,
        evaluator_id: &str,
        employee_id: &str,
        period_id: i64,
        evaluation_type: Option<DownwardEvaluationType>,
    ) -> Result<BulkResult, ApiError> {
        self.bulk_downward_evaluations(
            actor,
            evaluator_id,
            employee_id,
            period_id,
            evaluation_type,
            &DownwardEvaluationCommand::Reset,
        )
    }
}
