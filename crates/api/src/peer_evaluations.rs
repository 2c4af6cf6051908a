// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Peer evaluations, the question catalog and question mappings.

use evalcycle::PeerEvaluationCommand;
use evalcycle_audit::{Actor, EvaluationActivity};
use evalcycle_domain::{
    EvaluationQuestion, NewPeerEvaluation, PeerEvaluation, PeerEvaluationQuestionMapping,
    PeerEvaluationStatus, QuestionGroup, QuestionGroupMember, RecordMeta,
};
use evalcycle_persistence::Persistence;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::auth::{AuthenticatedActor, require_admin};
use crate::error::ApiError;
use crate::request_response::{BatchItemResult, CreateQuestionRequest, RequestPeerEvaluationRequest};
use crate::{EvaluationService, with_entity_id};

fn load_peer_evaluation(
    p: &mut Persistence,
    peer_evaluation_id: i64,
) -> Result<PeerEvaluation, ApiError> {
    p.get_peer_evaluation(peer_evaluation_id)?.ok_or_else(|| {
        ApiError::not_found(
            "Peer evaluation",
            format!("Peer evaluation {peer_evaluation_id} does not exist"),
        )
    })
}

fn load_question(p: &mut Persistence, question_id: i64) -> Result<EvaluationQuestion, ApiError> {
    p.get_question(question_id)?.ok_or_else(|| {
        ApiError::not_found(
            "Question",
            format!("Question {question_id} does not exist"),
        )
    })
}

fn load_group(p: &mut Persistence, question_group_id: i64) -> Result<QuestionGroup, ApiError> {
    p.get_question_group(question_group_id)?.ok_or_else(|| {
        ApiError::not_found(
            "Question group",
            format!("Question group {question_group_id} does not exist"),
        )
    })
}

fn next_display_order(mappings: &[PeerEvaluationQuestionMapping]) -> i32 {
    mappings.iter().map(|m| m.display_order).max().unwrap_or(0) + 1
}

/// Maps one question, appending it after the existing ones when no
/// display order is given.
fn map_one(
    p: &mut Persistence,
    evaluation: &PeerEvaluation,
    question_id: i64,
    question_group_id: Option<i64>,
    display_order: Option<i32>,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<PeerEvaluationQuestionMapping, ApiError> {
    load_question(p, question_id)?;
    let existing = p.list_question_mappings(evaluation.id)?;
    let display_order = display_order.unwrap_or_else(|| next_display_order(&existing));
    let mut mapping = evalcycle::map_question(
        evaluation,
        &existing,
        question_id,
        question_group_id,
        display_order,
        actor,
        now,
    )?;
    mapping.id = p.insert_question_mapping(&mapping)?;
    Ok(mapping)
}

/// Maps every question of a group that is not mapped yet. Returns how
/// many were added.
fn map_group(
    p: &mut Persistence,
    evaluation: &PeerEvaluation,
    question_group_id: i64,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<usize, ApiError> {
    load_group(p, question_group_id)?;
    let mut members = p.list_group_members(question_group_id)?;
    members.sort_by_key(|member| member.display_order);

    let mut added = 0;
    for member in members {
        let existing = p.list_question_mappings(evaluation.id)?;
        if existing.iter().any(|m| m.question_id == member.question_id) {
            continue;
        }
        map_one(
            p,
            evaluation,
            member.question_id,
            Some(question_group_id),
            None,
            actor,
            now,
        )?;
        added += 1;
    }
    Ok(added)
}

fn request_in_transaction(
    p: &mut Persistence,
    request: &RequestPeerEvaluationRequest,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<(PeerEvaluation, Option<EvaluationActivity>), ApiError> {
    let new = NewPeerEvaluation {
        period_id: request.period_id,
        evaluator_id: request.evaluator_id.clone(),
        evaluatee_id: request.evaluatee_id.clone(),
    };
    new.validate()?;
    if let Some(existing) =
        p.find_peer_evaluation(request.period_id, &request.evaluator_id, &request.evaluatee_id)?
    {
        return Err(ApiError::Duplicate {
            resource_type: String::from("peer evaluation"),
            message: format!(
                "Peer evaluation {} already asks '{}' to evaluate '{}' in period {}",
                existing.id, request.evaluator_id, request.evaluatee_id, request.period_id
            ),
        });
    }

    let result = evalcycle::create_peer_evaluation(new, actor, now)?;
    let mut evaluation = result.record;
    evaluation.id = p.insert_peer_evaluation(&evaluation)?;

    for question_id in &request.question_ids {
        map_one(p, &evaluation, *question_id, None, None, actor, now)?;
    }
    if let Some(question_group_id) = request.question_group_id {
        map_group(p, &evaluation, question_group_id, actor, now)?;
    } else if request.question_ids.is_empty() {
        if let Some(default_group) = p.find_default_question_group()? {
            map_group(p, &evaluation, default_group.id, actor, now)?;
        }
    }

    let activity = with_entity_id(result.activity, evaluation.id);
    Ok((evaluation, activity))
}

impl EvaluationService {
    /// Adds a question to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for blank text or an inverted score range.
    pub fn create_question(
        &mut self,
        actor: &AuthenticatedActor,
        request: &CreateQuestionRequest,
    ) -> Result<EvaluationQuestion, ApiError> {
        require_admin(actor, "create_question")?;
        if request.text.trim().is_empty() {
            return Err(ApiError::InvalidInput {
                field: String::from("text"),
                message: String::from("Question text must not be empty"),
            });
        }
        if let (Some(min), Some(max)) = (request.min_score, request.max_score) {
            if min > max {
                return Err(ApiError::InvalidInput {
                    field: String::from("min_score"),
                    message: format!("Minimum score {min} exceeds maximum score {max}"),
                });
            }
        }

        let mut question = EvaluationQuestion {
            id: 0,
            text: request.text.trim().to_string(),
            min_score: request.min_score,
            max_score: request.max_score,
            meta: RecordMeta::new(&actor.id, self.now()),
        };
        question.id = self.persistence.insert_question(&question)?;
        Ok(question)
    }

    /// Creates a question group. At most one group may be the default.
    ///
    /// # Errors
    ///
    /// Returns `Duplicate` when a second default group is requested.
    pub fn create_question_group(
        &mut self,
        actor: &AuthenticatedActor,
        name: &str,
        is_default: bool,
    ) -> Result<QuestionGroup, ApiError> {
        require_admin(actor, "create_question_group")?;
        if name.trim().is_empty() {
            return Err(ApiError::InvalidInput {
                field: String::from("name"),
                message: String::from("Question group name must not be empty"),
            });
        }
        let now = self.now();

        self.persistence.transaction(|p| {
            if is_default {
                if let Some(current) = p.find_default_question_group()? {
                    return Err(ApiError::Duplicate {
                        resource_type: String::from("default question group"),
                        message: format!("Question group '{}' is already the default", current.name),
                    });
                }
            }
            let mut group = QuestionGroup {
                id: 0,
                name: name.trim().to_string(),
                is_default,
                meta: RecordMeta::new(&actor.id, now),
            };
            group.id = p.insert_question_group(&group)?;
            Ok(group)
        })
    }

    /// Adds a catalog question to a group.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown group or question and
    /// `Duplicate` if the question is already in the group.
    pub fn add_question_to_group(
        &mut self,
        actor: &AuthenticatedActor,
        question_group_id: i64,
        question_id: i64,
        display_order: i32,
    ) -> Result<QuestionGroupMember, ApiError> {
        require_admin(actor, "add_question_to_group")?;
        let now = self.now();

        self.persistence.transaction(|p| {
            load_group(p, question_group_id)?;
            load_question(p, question_id)?;
            let member = QuestionGroupMember {
                question_group_id,
                question_id,
                display_order,
            };
            p.insert_group_member(&member, now)?;
            Ok(member)
        })
    }

    /// Asks an evaluator to review a colleague and attaches the questions.
    ///
    /// # Errors
    ///
    /// Returns a rule violation when evaluator and evaluatee are the same
    /// person and `Duplicate` when the pair already has an active request.
    pub fn request_peer_evaluation(
        &mut self,
        actor: &AuthenticatedActor,
        request: &RequestPeerEvaluationRequest,
    ) -> Result<PeerEvaluation, ApiError> {
        require_admin(actor, "request_peer_evaluation")?;
        self.period(request.period_id)?;
        let audit_actor = actor.to_audit_actor();
        let now = self.now();

        let (evaluation, activity) = self
            .persistence
            .transaction(|p| request_in_transaction(p, request, &audit_actor, now))?;

        info!(
            peer_evaluation_id = evaluation.id,
            evaluator_id = %evaluation.evaluator_id,
            evaluatee_id = %evaluation.evaluatee_id,
            "Requested peer evaluation"
        );
        self.record_activities(activity.as_slice());
        Ok(evaluation)
    }

    /// Requests many peer evaluations. Each item succeeds or fails on its own.
    ///
    /// # Errors
    ///
    /// Returns an error only if the actor is not an admin or the outer
    /// transaction fails.
    pub fn request_peer_evaluations_batch(
        &mut self,
        actor: &AuthenticatedActor,
        requests: &[RequestPeerEvaluationRequest],
    ) -> Result<Vec<BatchItemResult>, ApiError> {
        require_admin(actor, "request_peer_evaluations_batch")?;
        let audit_actor = actor.to_audit_actor();
        let now = self.now();
        let period_checks: Vec<Result<(), ApiError>> = requests
            .iter()
            .map(|r| self.period(r.period_id).map(|_| ()))
            .collect();

        let (results, activities) = self.persistence.transaction(|p| {
            let mut results: Vec<BatchItemResult> = Vec::with_capacity(requests.len());
            let mut activities: Vec<EvaluationActivity> = Vec::new();
            for (index, (request, period_check)) in requests.iter().zip(period_checks).enumerate()
            {
                let outcome = period_check
                    .and_then(|()| {
                        p.transaction(|p| request_in_transaction(p, request, &audit_actor, now))
                    })
                    .map(|(evaluation, activity)| {
                        activities.extend(activity);
                        evaluation.id
                    });
                results.push(BatchItemResult { index, outcome });
            }
            Ok::<_, ApiError>((results, activities))
        })?;

        self.record_activities(&activities);
        Ok(results)
    }

    /// Attaches one question to an open peer evaluation.
    ///
    /// # Errors
    ///
    /// Returns `Duplicate` if the question is already mapped and
    /// `AlreadyCompleted` if the evaluation is completed or cancelled.
    pub fn add_question_mapping(
        &mut self,
        actor: &AuthenticatedActor,
        peer_evaluation_id: i64,
        question_id: i64,
        display_order: Option<i32>,
    ) -> Result<PeerEvaluationQuestionMapping, ApiError> {
        require_admin(actor, "add_question_mapping")?;
        let audit_actor = actor.to_audit_actor();
        let now = self.now();

        self.persistence.transaction(|p| {
            let evaluation = load_peer_evaluation(p, peer_evaluation_id)?;
            map_one(
                p,
                &evaluation,
                question_id,
                None,
                display_order,
                &audit_actor,
                now,
            )
        })
    }

    /// Attaches every question of a group, skipping questions already
    /// mapped. Returns how many were added.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown evaluation or group.
    pub fn add_question_group_mappings(
        &mut self,
        actor: &AuthenticatedActor,
        peer_evaluation_id: i64,
        question_group_id: i64,
    ) -> Result<usize, ApiError> {
        require_admin(actor, "add_question_group_mappings")?;
        let audit_actor = actor.to_audit_actor();
        let now = self.now();

        let added = self.persistence.transaction(|p| {
            let evaluation = load_peer_evaluation(p, peer_evaluation_id)?;
            evaluation.ensure_open()?;
            map_group(p, &evaluation, question_group_id, &audit_actor, now)
        })?;
        debug!(peer_evaluation_id, question_group_id, added, "Mapped question group");
        Ok(added)
    }

    /// Detaches a question. Not allowed once the evaluation is completed
    /// or cancelled.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown mapping and `AlreadyCompleted`
    /// for a closed evaluation.
    pub fn remove_question_mapping(
        &mut self,
        actor: &AuthenticatedActor,
        mapping_id: i64,
    ) -> Result<(), ApiError> {
        require_admin(actor, "remove_question_mapping")?;
        let now = self.now();

        self.persistence.transaction(|p| {
            let mut mapping = p.get_question_mapping(mapping_id)?.ok_or_else(|| {
                ApiError::not_found(
                    "Question mapping",
                    format!("Question mapping {mapping_id} does not exist"),
                )
            })?;
            let evaluation = load_peer_evaluation(p, mapping.peer_evaluation_id)?;
            evaluation.ensure_open()?;

            mapping.meta.mark_deleted(&actor.id, now);
            p.update_question_mapping(&mapping)?;
            Ok(())
        })
    }

    /// Records the evaluator's answer to one question.
    ///
    /// The first answer moves the evaluation from pending to in progress.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` unless the actor is the evaluator,
    /// `InvalidInput` for a blank answer or out-of-range score and
    /// `PeriodExpired` after the peer-evaluation deadline.
    pub fn answer_question(
        &mut self,
        actor: &AuthenticatedActor,
        mapping_id: i64,
        answer: &str,
        score: Option<f64>,
    ) -> Result<PeerEvaluationQuestionMapping, ApiError> {
        let audit_actor = actor.to_audit_actor();
        let now = self.now();
        let periods = &self.periods;

        self.persistence.transaction(|p| {
            let mapping = p.get_question_mapping(mapping_id)?.ok_or_else(|| {
                ApiError::not_found(
                    "Question mapping",
                    format!("Question mapping {mapping_id} does not exist"),
                )
            })?;
            let evaluation = load_peer_evaluation(p, mapping.peer_evaluation_id)?;
            periods
                .get(evaluation.period_id)?
                .ensure_peer_evaluation_open(now)?;
            let question = load_question(p, mapping.question_id)?;

            let mut answered = evalcycle::answer_question(
                &evaluation,
                &mapping,
                &question,
                answer,
                score,
                &audit_actor,
                now,
            )?;
            answered.meta.version = p.update_question_mapping(&answered)?;

            if evaluation.status == PeerEvaluationStatus::Pending {
                let started = evalcycle::apply_peer_evaluation(
                    &evaluation,
                    PeerEvaluationCommand::StartAnswering,
                    &audit_actor,
                    now,
                )?;
                p.update_peer_evaluation(&started.record)?;
            }
            Ok(answered)
        })
    }

    /// Completes a peer evaluation. Every question must be answered.
    ///
    /// # Errors
    ///
    /// Returns `CannotSubmit` while any question is unanswered and
    /// `PeriodExpired` after the peer-evaluation deadline.
    pub fn submit_peer_evaluation(
        &mut self,
        actor: &AuthenticatedActor,
        peer_evaluation_id: i64,
    ) -> Result<PeerEvaluation, ApiError> {
        self.peer_command(actor, peer_evaluation_id, |p, id| {
            Ok(PeerEvaluationCommand::Submit {
                mappings: p.list_question_mappings(id)?,
            })
        })
    }

    /// Cancels a pending or in-progress peer evaluation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` for a completed evaluation.
    pub fn cancel_peer_evaluation(
        &mut self,
        actor: &AuthenticatedActor,
        peer_evaluation_id: i64,
    ) -> Result<PeerEvaluation, ApiError> {
        require_admin(actor, "cancel_peer_evaluation")?;
        self.peer_command(actor, peer_evaluation_id, |_, _| {
            Ok(PeerEvaluationCommand::Cancel)
        })
    }

    fn peer_command<F>(
        &mut self,
        actor: &AuthenticatedActor,
        peer_evaluation_id: i64,
        build: F,
    ) -> Result<PeerEvaluation, ApiError>
    where
        F: FnOnce(&mut Persistence, i64) -> Result<PeerEvaluationCommand, ApiError>,
    {
        let audit_actor = actor.to_audit_actor();
        let now = self.now();
        let periods = &self.periods;

        let (evaluation, activity) = self.persistence.transaction(|p| {
            let evaluation = load_peer_evaluation(p, peer_evaluation_id)?;
            let command = build(p, peer_evaluation_id)?;
            if matches!(command, PeerEvaluationCommand::Submit { .. }) {
                periods
                    .get(evaluation.period_id)?
                    .ensure_peer_evaluation_open(now)?;
            }
            let result = evalcycle::apply_peer_evaluation(&evaluation, command, &audit_actor, now)?;
            let mut updated = result.record;
            if result.changed {
                updated.meta.version = p.update_peer_evaluation(&updated)?;
            }
            Ok::<_, ApiError>((updated, result.activity))
        })?;

        info!(
            peer_evaluation_id,
            status = %evaluation.status,
            "Peer evaluation updated"
        );
        self.record_activities(activity.as_slice());
        Ok(evaluation)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_peer_evaluation(
        &mut self,
        peer_evaluation_id: i64,
    ) -> Result<Option<PeerEvaluation>, ApiError> {
        Ok(self.persistence.get_peer_evaluation(peer_evaluation_id)?)
    }

    /// Lists the active question mappings in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_question_mappings(
        &mut self,
        peer_evaluation_id: i64,
    ) -> Result<Vec<PeerEvaluationQuestionMapping>, ApiError> {
        Ok(self.persistence.list_question_mappings(peer_evaluation_id)?)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_peer_evaluations_for_evaluatee(
        &mut self,
        period_id: i64,
        evaluatee_id: &str,
    ) -> Result<Vec<PeerEvaluation>, ApiError> {
        Ok(self
            .persistence
            .list_peer_evaluations_for_evaluatee(period_id, evaluatee_id)?)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_peer_evaluations_for_evaluator(
        &mut self,
        period_id: i64,
        evaluator_id: &str,
    ) -> Result<Vec<PeerEvaluation>, ApiError> {
        Ok(self
            .persistence
            .list_peer_evaluations_for_evaluator(period_id, evaluator_id)?)
    }
}
