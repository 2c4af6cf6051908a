// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Final evaluations and their confirmation.

use evalcycle::FinalEvaluationCommand;
use evalcycle_domain::{FinalEvaluation, FinalEvaluationGrades};
use tracing::info;

use crate::auth::{AuthenticatedActor, require_admin};
use crate::error::ApiError;
use crate::request_response::{FinalEvaluationFromScoreRequest, UpsertFinalEvaluationRequest};
use crate::{EvaluationService, with_entity_id};

impl EvaluationService {
    /// Creates the employee's final evaluation for the period or updates
    /// the existing one.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyConfirmed` if the existing evaluation is confirmed,
    /// leaving every stored grade untouched.
    pub fn upsert_final_evaluation(
        &mut self,
        actor: &AuthenticatedActor,
        request: &UpsertFinalEvaluationRequest,
    ) -> Result<FinalEvaluation, ApiError> {
        require_admin(actor, "upsert_final_evaluation")?;
        self.period(request.period_id)?;
        let grades = FinalEvaluationGrades {
            evaluation_grade: request.evaluation_grade.clone(),
            job_grade: request.job_grade,
            job_detailed_grade: request.job_detailed_grade,
            final_comments: request.final_comments.clone(),
        };
        self.save_final_evaluation(actor, &request.employee_id, request.period_id, grades)
    }

    /// Like [`Self::upsert_final_evaluation`], deriving the evaluation
    /// grade from a score through the period's grade table.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if no grade range contains the score.
    pub fn upsert_final_evaluation_from_score(
        &mut self,
        actor: &AuthenticatedActor,
        request: &FinalEvaluationFromScoreRequest,
    ) -> Result<FinalEvaluation, ApiError> {
        require_admin(actor, "upsert_final_evaluation")?;
        let period = self.period(request.period_id)?;
        let evaluation_grade = evalcycle::derive_grade(&period.grade_ranges, request.score)?;
        let grades = FinalEvaluationGrades {
            evaluation_grade,
            job_grade: request.job_grade,
            job_detailed_grade: request.job_detailed_grade,
            final_comments: request.final_comments.clone(),
        };
        self.save_final_evaluation(actor, &request.employee_id, request.period_id, grades)
    }

    fn save_final_evaluation(
        &mut self,
        actor: &AuthenticatedActor,
        employee_id: &str,
        period_id: i64,
        grades: FinalEvaluationGrades,
    ) -> Result<FinalEvaluation, ApiError> {
        let audit_actor = actor.to_audit_actor();
        let now = self.now();

        let (record, activity) = self.persistence.transaction(|p| {
            if let Some(existing) = p.find_final_evaluation(employee_id, period_id)? {
                let result = evalcycle::apply_final_evaluation(
                    &existing,
                    FinalEvaluationCommand::Upsert(grades),
                    &audit_actor,
                    now,
                )?;
                let mut record = result.record;
                record.meta.version = p.update_final_evaluation(&record)?;
                return Ok::<_, ApiError>((record, result.activity));
            }

            let result =
                evalcycle::create_final_evaluation(employee_id, period_id, grades, &audit_actor, now)?;
            let mut record = result.record;
            record.id = p.insert_final_evaluation(&record)?;
            let activity = with_entity_id(result.activity, record.id);
            Ok((record, activity))
        })?;

        info!(
            final_evaluation_id = record.id,
            employee_id,
            period_id,
            grade = %record.evaluation_grade,
            "Saved final evaluation"
        );
        self.record_activities(activity.as_slice());
        Ok(record)
    }

    fn transition_final_evaluation(
        &mut self,
        actor: &AuthenticatedActor,
        final_evaluation_id: i64,
        command: FinalEvaluationCommand,
    ) -> Result<FinalEvaluation, ApiError> {
        let audit_actor = actor.to_audit_actor();
        let now = self.now();

        let (record, activity) = self.persistence.transaction(|p| {
            let current = p
                .get_final_evaluation_by_id(final_evaluation_id)?
                .ok_or_else(|| {
                    ApiError::not_found(
                        "Final evaluation",
                        format!("Final evaluation {final_evaluation_id} does not exist"),
                    )
                })?;
            let result = evalcycle::apply_final_evaluation(&current, command, &audit_actor, now)?;
            let mut record = result.record;
            record.meta.version = p.update_final_evaluation(&record)?;
            Ok::<_, ApiError>((record, result.activity))
        })?;

        self.record_activities(activity.as_slice());
        Ok(record)
    }

    /// Confirms a final evaluation, freezing its grades.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyConfirmed` if it is already confirmed.
    pub fn confirm_final_evaluation(
        &mut self,
        actor: &AuthenticatedActor,
        final_evaluation_id: i64,
    ) -> Result<FinalEvaluation, ApiError> {
        require_admin(actor, "confirm_final_evaluation")?;
        let record = self.transition_final_evaluation(
            actor,
            final_evaluation_id,
            FinalEvaluationCommand::Confirm,
        )?;
        info!(final_evaluation_id, actor_id = %actor.id, "Confirmed final evaluation");
        Ok(record)
    }

    /// Lifts the confirmation so the grades can change again.
    ///
    /// # Errors
    ///
    /// Returns `NotConfirmed` if it is not confirmed.
    pub fn cancel_final_evaluation_confirmation(
        &mut self,
        actor: &AuthenticatedActor,
        final_evaluation_id: i64,
    ) -> Result<FinalEvaluation, ApiError> {
        require_admin(actor, "cancel_final_evaluation_confirmation")?;
        let record = self.transition_final_evaluation(
            actor,
            final_evaluation_id,
            FinalEvaluationCommand::CancelConfirmation,
        )?;
        info!(final_evaluation_id, actor_id = %actor.id, "Cancelled final evaluation confirmation");
        Ok(record)
    }

    /// Soft-deletes an unconfirmed final evaluation.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyConfirmed` while it is confirmed.
    pub fn delete_final_evaluation(
        &mut self,
        actor: &AuthenticatedActor,
        final_evaluation_id: i64,
    ) -> Result<(), ApiError> {
        require_admin(actor, "delete_final_evaluation")?;
        self.transition_final_evaluation(actor, final_evaluation_id, FinalEvaluationCommand::Delete)?;
        info!(final_evaluation_id, actor_id = %actor.id, "Deleted final evaluation");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_final_evaluation(
        &mut self,
        employee_id: &str,
        period_id: i64,
    ) -> Result<Option<FinalEvaluation>, ApiError> {
        Ok(self
            .persistence
            .find_final_evaluation(employee_id, period_id)?)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_final_evaluations(
        &mut self,
        period_id: i64,
    ) -> Result<Vec<FinalEvaluation>, ApiError> {
        Ok(self.persistence.list_final_evaluations(period_id)?)
    }
}
