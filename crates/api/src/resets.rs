// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Cascading resets.
//!
//! Each reset physically deletes rows inside one transaction, children
//! before parents, so either everything goes or nothing does. Running a
//! reset again with nothing left returns zero counts.

use tracing::info;

use crate::EvaluationService;
use crate::auth::{AuthenticatedActor, require_admin};
use crate::error::ApiError;
use crate::request_response::{
    EvaluationLineResetCounts, ResetResponse, SelfEvaluationResetCounts, StepApprovalResetCounts,
};

impl EvaluationService {
    /// Deletes every evaluator assignment and everything that hangs off it.
    ///
    /// Order: peer question mappings, peer evaluations, downward
    /// evaluations, then the assignments themselves.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not an admin or any delete fails,
    /// in which case nothing is deleted.
    pub fn reset_all_evaluation_lines(
        &mut self,
        actor: &AuthenticatedActor,
    ) -> Result<ResetResponse<EvaluationLineResetCounts>, ApiError> {
        require_admin(actor, "reset_all_evaluation_lines")?;

        let counts = self.persistence.transaction(|p| {
            Ok::<_, ApiError>(EvaluationLineResetCounts {
                peer_evaluation_question_mappings: p.delete_all_question_mappings()?,
                peer_evaluations: p.delete_all_peer_evaluations()?,
                downward_evaluations: p.delete_all_downward_evaluations()?,
                evaluation_line_mappings: p.delete_all_mappings()?,
            })
        })?;

        info!(
            actor_id = %actor.id,
            question_mappings = counts.peer_evaluation_question_mappings,
            peer_evaluations = counts.peer_evaluations,
            downward_evaluations = counts.downward_evaluations,
            mappings = counts.evaluation_line_mappings,
            "Reset all evaluation lines"
        );
        Ok(ResetResponse {
            message: format!(
                "Deleted {} evaluator assignments, {} downward evaluations, {} peer evaluations and {} peer question mappings",
                counts.evaluation_line_mappings,
                counts.downward_evaluations,
                counts.peer_evaluations,
                counts.peer_evaluation_question_mappings
            ),
            deleted_counts: counts,
        })
    }

    /// Deletes every self evaluation, removing the downward evaluations
    /// that reference each one first.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not an admin or any delete fails,
    /// in which case nothing is deleted.
    pub fn reset_all_self_evaluations(
        &mut self,
        actor: &AuthenticatedActor,
    ) -> Result<ResetResponse<SelfEvaluationResetCounts>, ApiError> {
        require_admin(actor, "reset_all_self_evaluations")?;

        let counts = self.persistence.transaction(|p| {
            let mut counts = SelfEvaluationResetCounts::default();
            for self_evaluation_id in p.list_all_self_evaluation_ids()? {
                counts.downward_evaluations +=
                    p.delete_downward_for_self_evaluation(self_evaluation_id)?;
                counts.self_evaluations += p.delete_self_evaluation_row(self_evaluation_id)?;
            }
            Ok::<_, ApiError>(counts)
        })?;

        info!(
            actor_id = %actor.id,
            downward_evaluations = counts.downward_evaluations,
            self_evaluations = counts.self_evaluations,
            "Reset all self evaluations"
        );
        Ok(ResetResponse {
            message: format!(
                "Deleted {} self evaluations and {} linked downward evaluations",
                counts.self_evaluations, counts.downward_evaluations
            ),
            deleted_counts: counts,
        })
    }

    /// Deletes the step approvals and revision requests of one period.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not an admin, the period is
    /// unknown, or any delete fails.
    pub fn reset_period_step_approvals(
        &mut self,
        actor: &AuthenticatedActor,
        period_id: i64,
    ) -> Result<ResetResponse<StepApprovalResetCounts>, ApiError> {
        require_admin(actor, "reset_period_step_approvals")?;
        self.period(period_id)?;

        let counts = self.persistence.transaction(|p| {
            Ok::<_, ApiError>(StepApprovalResetCounts {
                revision_request_recipients: p.delete_recipients_for_period(period_id)?,
                revision_requests: p.delete_revision_requests_for_period(period_id)?,
                step_approvals: p.delete_step_approvals_for_period(period_id)?,
            })
        })?;

        info!(
            actor_id = %actor.id,
            period_id,
            recipients = counts.revision_request_recipients,
            revision_requests = counts.revision_requests,
            step_approvals = counts.step_approvals,
            "Reset step approvals"
        );
        Ok(ResetResponse {
            message: format!(
                "Deleted {} step approvals, {} revision requests and {} recipients in period {period_id}",
                counts.step_approvals, counts.revision_requests, counts.revision_request_recipients
            ),
            deleted_counts: counts,
        })
    }
}
