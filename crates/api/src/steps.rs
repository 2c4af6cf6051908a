// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Step approvals and the revision loop.

use evalcycle::StepCommand;
use evalcycle_audit::{Actor, EvaluationActivity};
use evalcycle_domain::{
    ApprovalStep, DomainError, RecordMeta, RevisionRequest, RevisionRequestRecipient,
    StepApproval, StepStatus, normalize_revision_comment,
};
use evalcycle_persistence::Persistence;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::EvaluationService;
use crate::auth::{AuthenticatedActor, require_owner_or_reviewer, require_reviewer};
use crate::error::ApiError;
use crate::request_response::{ApproveStepResponse, SkippedStep};

fn save_step(p: &mut Persistence, mut record: StepApproval) -> Result<StepApproval, ApiError> {
    if record.id == 0 {
        record.id = p.insert_step_approval(&record)?;
    } else {
        record.meta.version = p.update_step_approval(&record)?;
    }
    Ok(record)
}

/// Identifies one step of one employee in one period.
#[derive(Clone, Copy)]
struct StepKey<'a> {
    period_id: i64,
    employee_id: &'a str,
    step: ApprovalStep,
}

/// Applies a step command and saves the result if it changed.
fn apply_and_save(
    p: &mut Persistence,
    current: Option<&StepApproval>,
    key: StepKey<'_>,
    command: StepCommand,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<(StepApproval, Option<EvaluationActivity>), ApiError> {
    let result = evalcycle::apply_step(
        current,
        key.period_id,
        key.employee_id,
        key.step,
        command,
        actor,
        now,
    )?;
    let record = if result.changed {
        save_step(p, result.record)?
    } else {
        result.record
    };
    Ok((record, result.activity))
}

fn load_step(
    p: &mut Persistence,
    period_id: i64,
    employee_id: &str,
    step: ApprovalStep,
) -> Result<StepApproval, ApiError> {
    p.find_step_approval(period_id, employee_id, step)?
        .ok_or_else(|| {
            ApiError::not_found(
                "Step approval",
                format!(
                    "Step '{step}' of employee '{employee_id}' in period {period_id} was never submitted"
                ),
            )
        })
}

impl EvaluationService {
    /// Submits a step for approval, or resubmits it after a revision.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the step is new, pending or
    /// revision-completed.
    pub fn submit_step(
        &mut self,
        actor: &AuthenticatedActor,
        period_id: i64,
        employee_id: &str,
        step: ApprovalStep,
    ) -> Result<StepApproval, ApiError> {
        require_owner_or_reviewer(actor, employee_id, "submit step")?;
        self.period(period_id)?;
        let audit_actor = actor.to_audit_actor();
        let now = self.now();
        let key = StepKey {
            period_id,
            employee_id,
            step,
        };

        let (approval, _) = self.persistence.transaction(|p| {
            let current = p.find_step_approval(period_id, employee_id, step)?;
            apply_and_save(
                p,
                current.as_ref(),
                key,
                StepCommand::Submit,
                &audit_actor,
                now,
            )
        })?;

        debug!(period_id, employee_id, %step, "Step submitted");
        Ok(approval)
    }

    /// Approves a step.
    ///
    /// With `cascade`, every later step that is pending or
    /// revision-completed is approved too. Later steps that were never
    /// submitted or are waiting on a revision are left alone and listed
    /// in the response.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the step cannot be approved. A
    /// failing cascaded step rolls back the whole approval.
    pub fn approve_step(
        &mut self,
        actor: &AuthenticatedActor,
        period_id: i64,
        employee_id: &str,
        step: ApprovalStep,
        cascade: bool,
    ) -> Result<ApproveStepResponse, ApiError> {
        require_reviewer(actor, "approve_step")?;
        self.period(period_id)?;
        let audit_actor = actor.to_audit_actor();
        let now = self.now();
        let key = StepKey {
            period_id,
            employee_id,
            step,
        };

        let (response, activities) = self.persistence.transaction(|p| {
            let mut activities: Vec<EvaluationActivity> = Vec::new();
            let current = p.find_step_approval(period_id, employee_id, step)?;
            let (approval, activity) = apply_and_save(
                p,
                current.as_ref(),
                key,
                StepCommand::Approve,
                &audit_actor,
                now,
            )?;
            activities.extend(activity);

            let mut response = ApproveStepResponse {
                approval,
                cascaded: Vec::new(),
                skipped: Vec::new(),
            };
            if !cascade {
                return Ok((response, activities));
            }

            let existing = p.list_step_approvals(period_id, employee_id)?;
            let plan = evalcycle::plan_cascade(step, &existing);
            for later in plan.approve {
                let current = existing.iter().find(|a| a.step == later);
                let (approved, activity) = apply_and_save(
                    p,
                    current,
                    StepKey { step: later, ..key },
                    StepCommand::Approve,
                    &audit_actor,
                    now,
                )?;
                activities.extend(activity);
                response.cascaded.push(approved);
            }
            response.skipped = plan
                .skipped
                .into_iter()
                .map(|(step, status)| SkippedStep { step, status })
                .collect();
            Ok::<_, ApiError>((response, activities))
        })?;

        info!(
            period_id,
            employee_id,
            %step,
            cascaded = response.cascaded.len(),
            skipped = response.skipped.len(),
            "Step approved"
        );
        self.record_activities(&activities);
        Ok(response)
    }

    /// Sends a step back for revision.
    ///
    /// Recipients come from the registry: the employee for the criteria
    /// and self-evaluation steps, plus the primary or secondary evaluators
    /// for the steps they own.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank comment, `InvalidTransition` if
    /// the step is not awaiting a decision, and a rule violation if the
    /// step has nobody to send the revision to.
    pub fn request_revision(
        &mut self,
        actor: &AuthenticatedActor,
        period_id: i64,
        employee_id: &str,
        step: ApprovalStep,
        comment: &str,
    ) -> Result<StepApproval, ApiError> {
        require_reviewer(actor, "request_revision")?;
        let comment = normalize_revision_comment(comment)?;
        self.period(period_id)?;
        let audit_actor = actor.to_audit_actor();
        let now = self.now();
        let key = StepKey {
            period_id,
            employee_id,
            step,
        };

        let (approval, activity) = self.persistence.transaction(|p| {
            let current = p.find_step_approval(period_id, employee_id, step)?;
            let (approval, activity) = apply_and_save(
                p,
                current.as_ref(),
                key,
                StepCommand::RequestRevision {
                    comment: comment.clone(),
                },
                &audit_actor,
                now,
            )?;

            let mappings = p.list_mappings_for_employee(Some(period_id), employee_id)?;
            let recipients = evalcycle::revision_recipients(step, employee_id, &mappings);
            if recipients.is_empty() {
                return Err(ApiError::DomainRuleViolation {
                    rule: String::from("revision_recipients_required"),
                    message: format!(
                        "Step '{step}' of employee '{employee_id}' has no evaluator to revise it"
                    ),
                });
            }

            let mut request = RevisionRequest {
                id: 0,
                period_id,
                employee_id: employee_id.to_string(),
                step,
                comment: comment.clone(),
                requested_by: audit_actor.id.clone(),
                requested_at: now,
                meta: RecordMeta::new(&audit_actor.id, now),
            };
            request.id = p.insert_revision_request(&request)?;

            for (recipient_id, recipient_type) in recipients {
                let recipient = RevisionRequestRecipient {
                    id: 0,
                    revision_request_id: request.id,
                    recipient_id,
                    recipient_type,
                    is_read: false,
                    read_at: None,
                    is_completed: false,
                    completed_at: None,
                    response_comment: None,
                    meta: RecordMeta::new(&audit_actor.id, now),
                };
                p.insert_revision_recipient(&recipient)?;
            }
            Ok((approval, activity))
        })?;

        info!(period_id, employee_id, %step, "Revision requested");
        self.record_activities(activity.as_slice());
        Ok(approval)
    }

    /// Records that the actor finished their part of the open revision.
    ///
    /// The step moves to revision-completed once every recipient is done.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` if the actor is not a recipient and
    /// `InvalidTransition` if the step is not waiting on a revision.
    pub fn complete_revision(
        &mut self,
        actor: &AuthenticatedActor,
        period_id: i64,
        employee_id: &str,
        step: ApprovalStep,
        response_comment: Option<String>,
    ) -> Result<StepApproval, ApiError> {
        let audit_actor = actor.to_audit_actor();
        let now = self.now();
        let key = StepKey {
            period_id,
            employee_id,
            step,
        };

        let (approval, activity) = self.persistence.transaction(|p| {
            let approval = load_step(p, period_id, employee_id, step)?;
            approval
                .status
                .validate_transition(approval.id, StepStatus::RevisionCompleted)?;

            let request = p
                .find_latest_revision_request(period_id, employee_id, step)?
                .ok_or_else(|| {
                    ApiError::not_found(
                        "Revision request",
                        format!("Step '{step}' of employee '{employee_id}' has no revision request"),
                    )
                })?;
            let mut recipients = p.list_revision_recipients(request.id)?;
            let mine = recipients
                .iter_mut()
                .find(|r| r.recipient_id == audit_actor.id)
                .ok_or_else(|| DomainError::NotARevisionRecipient {
                    revision_request_id: request.id,
                    actor_id: audit_actor.id.clone(),
                })?;
            if mine.is_completed {
                return Ok((approval, None));
            }

            mine.is_completed = true;
            mine.completed_at = Some(now);
            if !mine.is_read {
                mine.is_read = true;
                mine.read_at = Some(now);
            }
            mine.response_comment = response_comment;
            mine.meta.touch(&audit_actor.id, now);
            p.update_revision_recipient(mine)?;

            if !recipients.iter().all(|r| r.is_completed) {
                return Ok((approval, None));
            }
            apply_and_save(
                p,
                Some(&approval),
                key,
                StepCommand::CompleteRevision,
                &audit_actor,
                now,
            )
        })?;

        debug!(period_id, employee_id, %step, status = %approval.status, "Revision response recorded");
        self.record_activities(activity.as_slice());
        Ok(approval)
    }

    /// Returns the status of a step, or `None` if it was never submitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_step_status(
        &mut self,
        period_id: i64,
        employee_id: &str,
        step: ApprovalStep,
    ) -> Result<Option<StepStatus>, ApiError> {
        Ok(self
            .persistence
            .find_step_approval(period_id, employee_id, step)?
            .map(|approval| approval.status))
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_step_approvals(
        &mut self,
        period_id: i64,
        employee_id: &str,
    ) -> Result<Vec<StepApproval>, ApiError> {
        Ok(self.persistence.list_step_approvals(period_id, employee_id)?)
    }

    /// Lists revision requests addressed to a recipient, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_revision_requests_for_recipient(
        &mut self,
        recipient_id: &str,
    ) -> Result<Vec<(RevisionRequest, RevisionRequestRecipient)>, ApiError> {
        Ok(self
            .persistence
            .list_revision_requests_for_recipient(recipient_id)?)
    }

    /// Marks the actor's copy of a revision request as read.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown request and `PermissionDenied` if
    /// the actor is not a recipient.
    pub fn mark_revision_request_read(
        &mut self,
        actor: &AuthenticatedActor,
        revision_request_id: i64,
    ) -> Result<RevisionRequestRecipient, ApiError> {
        let now = self.now();

        self.persistence.transaction(|p| {
            if p.get_revision_request(revision_request_id)?.is_none() {
                return Err(ApiError::not_found(
                    "Revision request",
                    format!("Revision request {revision_request_id} does not exist"),
                ));
            }
            let mut recipient = p
                .list_revision_recipients(revision_request_id)?
                .into_iter()
                .find(|r| r.recipient_id == actor.id)
                .ok_or_else(|| DomainError::NotARevisionRecipient {
                    revision_request_id,
                    actor_id: actor.id.clone(),
                })?;
            if recipient.is_read {
                return Ok(recipient);
            }
            recipient.is_read = true;
            recipient.read_at = Some(now);
            recipient.meta.touch(&actor.id, now);
            recipient.meta.version = p.update_revision_recipient(&recipient)?;
            Ok(recipient)
        })
    }
}
