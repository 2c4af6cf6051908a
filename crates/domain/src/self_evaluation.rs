// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Self-evaluation records and their submission states.
//!
//! The persisted shape keeps the original flags; the state enum is derived
//! from them so that the flag invariants can be checked in one place.

use crate::error::DomainError;
use crate::types::{RecordMeta, validate_score};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

const ENTITY: &str = "self evaluation";

/// Submission state derived from the self-evaluation flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelfEvaluationState {
    Draft,
    SubmittedToEvaluator,
    SubmittedToManager,
    Completed,
}

impl SelfEvaluationState {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::SubmittedToEvaluator => "submitted_to_evaluator",
            Self::SubmittedToManager => "submitted_to_manager",
            Self::Completed => "completed",
        }
    }

    /// Validates a single-step transition.
    ///
    /// Forward edges advance one state at a time; every forward edge has a
    /// matching revert edge. Staying in place is handled by callers as a
    /// no-op and is not a transition.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Draft, Self::SubmittedToEvaluator)
                | (Self::SubmittedToEvaluator, Self::SubmittedToManager)
                | (Self::SubmittedToManager, Self::Completed)
                | (Self::Completed, Self::SubmittedToManager)
                | (Self::SubmittedToManager, Self::SubmittedToEvaluator)
                | (Self::SubmittedToEvaluator, Self::Draft)
        )
    }
}

impl std::fmt::Display for SelfEvaluationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An employee's assessment of one work item in one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfEvaluation {
    pub id: i64,
    pub period_id: i64,
    pub employee_id: String,
    pub work_item_id: i64,
    pub project_id: i64,
    pub content: Option<String>,
    pub score: Option<f64>,
    pub submitted_to_evaluator: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub submitted_to_evaluator_at: Option<OffsetDateTime>,
    pub submitted_to_manager: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub submitted_to_manager_at: Option<OffsetDateTime>,
    pub is_completed: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
    pub meta: RecordMeta,
}

impl SelfEvaluation {
    /// The state implied by the submission flags.
    #[must_use]
    pub const fn state(&self) -> SelfEvaluationState {
        if self.is_completed {
            SelfEvaluationState::Completed
        } else if self.submitted_to_manager {
            SelfEvaluationState::SubmittedToManager
        } else if self.submitted_to_evaluator {
            SelfEvaluationState::SubmittedToEvaluator
        } else {
            SelfEvaluationState::Draft
        }
    }

    /// Checks that content and score are present and the score is in
    /// `[0, max_score]`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::CannotSubmit` describing the first missing or
    /// invalid field.
    pub fn ensure_submittable(&self, max_score: f64) -> Result<(), DomainError> {
        let has_content = self
            .content
            .as_deref()
            .is_some_and(|content| !content.trim().is_empty());
        if !has_content {
            return Err(DomainError::CannotSubmit {
                reason: format!("self evaluation {} has no content", self.id),
            });
        }
        let Some(score) = self.score else {
            return Err(DomainError::CannotSubmit {
                reason: format!("self evaluation {} has no score", self.id),
            });
        };
        validate_score(score, 0.0, max_score).map_err(|_| DomainError::CannotSubmit {
            reason: format!(
                "self evaluation {} score {score} is outside [0, {max_score}]",
                self.id
            ),
        })
    }

    /// Validates that the record sits in `from` and that `from -> target`
    /// is an edge of the machine.
    ///
    /// Each command owns one edge, so a record in any other state is
    /// rejected even when some other edge would reach `target`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` when the record is not in
    /// `from` or the edge does not exist.
    pub fn validate_transition(
        &self,
        from: SelfEvaluationState,
        target: SelfEvaluationState,
    ) -> Result<(), DomainError> {
        let current = self.state();
        if current == from && from.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition {
                entity: ENTITY,
                id: self.id,
                from: current.to_string(),
                to: target.to_string(),
            })
        }
    }

    /// Rejects content edits once the record has been submitted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AlreadySubmitted` outside the draft state.
    pub fn ensure_editable(&self) -> Result<(), DomainError> {
        if self.state() == SelfEvaluationState::Draft {
            Ok(())
        } else {
            Err(DomainError::AlreadySubmitted {
                entity: ENTITY,
                id: self.id,
            })
        }
    }

    /// Applies the flags of `target`, keeping the timestamps consistent.
    ///
    /// Callers must have validated the transition first.
    pub fn set_state(&mut self, target: SelfEvaluationState, now: OffsetDateTime) {
        let (to_evaluator, to_manager, completed) = match target {
            SelfEvaluationState::Draft => (false, false, false),
            SelfEvaluationState::SubmittedToEvaluator => (true, false, false),
            SelfEvaluationState::SubmittedToManager => (true, true, false),
            SelfEvaluationState::Completed => (true, true, true),
        };

        if to_evaluator && !self.submitted_to_evaluator {
            self.submitted_to_evaluator_at = Some(now);
        } else if !to_evaluator {
            self.submitted_to_evaluator_at = None;
        }
        if to_manager && !self.submitted_to_manager {
            self.submitted_to_manager_at = Some(now);
        } else if !to_manager {
            self.submitted_to_manager_at = None;
        }
        if completed && !self.is_completed {
            self.completed_at = Some(now);
        } else if !completed {
            self.completed_at = None;
        }

        self.submitted_to_evaluator = to_evaluator;
        self.submitted_to_manager = to_manager;
        self.is_completed = completed;
    }

    /// Returns true if the flag invariants hold.
    #[must_use]
    pub const fn flags_consistent(&self) -> bool {
        (!self.submitted_to_manager || self.submitted_to_evaluator)
            && (!self.is_completed || self.submitted_to_manager)
    }
}

/// Values for a self-evaluation that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSelfEvaluation {
    pub period_id: i64,
    pub employee_id: String,
    pub work_item_id: i64,
    pub project_id: i64,
    pub content: Option<String>,
    pub score: Option<f64>,
}
