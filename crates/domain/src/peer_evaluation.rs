// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Peer evaluations and the questions attached to them.

use crate::error::DomainError;
use crate::types::{RecordMeta, validate_score};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

const ENTITY: &str = "peer evaluation";

/// Peer evaluation progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerEvaluationStatus {
    /// Requested, nothing answered yet.
    Pending,
    /// At least one question answered.
    InProgress,
    /// Submitted by the evaluator.
    Completed,
    /// Withdrawn before completion.
    Cancelled,
}

impl PeerEvaluationStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Validates a status change.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if the change is not allowed.
    pub fn validate_transition(&self, id: i64, new_status: Self) -> Result<(), DomainError> {
        let valid = match self {
            Self::Pending => matches!(
                new_status,
                Self::InProgress | Self::Completed | Self::Cancelled
            ),
            Self::InProgress => matches!(new_status, Self::Completed | Self::Cancelled),
            Self::Completed | Self::Cancelled => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition {
                entity: ENTITY,
                id,
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
            })
        }
    }
}

impl FromStr for PeerEvaluationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidValue {
                kind: "peer evaluation status",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for PeerEvaluationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One employee's assessment of a colleague.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerEvaluation {
    pub id: i64,
    pub period_id: i64,
    pub evaluator_id: String,
    pub evaluatee_id: String,
    pub status: PeerEvaluationStatus,
    pub requested_by: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
    pub meta: RecordMeta,
}

impl PeerEvaluation {
    /// Checks that `actor_id` is the evaluator.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EvaluatorMismatch` otherwise.
    pub fn ensure_evaluator(&self, actor_id: &str) -> Result<(), DomainError> {
        if self.evaluator_id == actor_id {
            Ok(())
        } else {
            Err(DomainError::EvaluatorMismatch {
                expected: self.evaluator_id.clone(),
                actual: actor_id.to_string(),
            })
        }
    }

    /// Rejects question changes once the evaluation is closed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AlreadyCompleted` for completed or cancelled
    /// evaluations.
    pub const fn ensure_open(&self) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            Err(DomainError::AlreadyCompleted {
                entity: ENTITY,
                id: self.id,
            })
        } else {
            Ok(())
        }
    }
}

/// A peer evaluation request prior to persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPeerEvaluation {
    pub period_id: i64,
    pub evaluator_id: String,
    pub evaluatee_id: String,
}

impl NewPeerEvaluation {
    /// # Errors
    ///
    /// Returns `DomainError::SelfPeerEvaluation` if evaluator and evaluatee
    /// are the same person.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.evaluator_id == self.evaluatee_id {
            return Err(DomainError::SelfPeerEvaluation {
                employee_id: self.evaluator_id.clone(),
            });
        }
        Ok(())
    }
}

/// A reusable question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationQuestion {
    pub id: i64,
    pub text: String,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
    pub meta: RecordMeta,
}

impl EvaluationQuestion {
    /// Validates an answer score against the question bounds.
    ///
    /// Questions without bounds accept any finite score.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ScoreOutOfRange` if the score is rejected.
    pub fn validate_score(&self, score: f64) -> Result<(), DomainError> {
        validate_score(
            score,
            self.min_score.unwrap_or(f64::MIN),
            self.max_score.unwrap_or(f64::MAX),
        )
    }
}

/// A named set of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionGroup {
    pub id: i64,
    pub name: String,
    pub is_default: bool,
    pub meta: RecordMeta,
}

/// Membership of a question in a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionGroupMember {
    pub question_group_id: i64,
    pub question_id: i64,
    pub display_order: i32,
}

/// A question attached to a peer evaluation, with its answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerEvaluationQuestionMapping {
    pub id: i64,
    pub peer_evaluation_id: i64,
    pub question_id: i64,
    pub question_group_id: Option<i64>,
    pub display_order: i32,
    pub answer: Option<String>,
    pub score: Option<f64>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub answered_at: Option<OffsetDateTime>,
    pub answered_by: Option<String>,
    pub meta: RecordMeta,
}

impl PeerEvaluationQuestionMapping {
    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.answer
            .as_deref()
            .is_some_and(|answer| !answer.trim().is_empty())
    }
}

/// Checks that every question of a peer evaluation has an answer.
///
/// # Errors
///
/// Returns `DomainError::CannotSubmit` if there are no questions or any
/// question is unanswered.
pub fn ensure_all_answered(
    peer_evaluation_id: i64,
    mappings: &[PeerEvaluationQuestionMapping],
) -> Result<(), DomainError> {
    if mappings.is_empty() {
        return Err(DomainError::CannotSubmit {
            reason: format!("peer evaluation {peer_evaluation_id} has no questions"),
        });
    }
    let unanswered = mappings.iter().filter(|m| !m.is_answered()).count();
    if unanswered > 0 {
        return Err(DomainError::CannotSubmit {
            reason: format!(
                "peer evaluation {peer_evaluation_id} has {unanswered} unanswered question(s)"
            ),
        });
    }
    Ok(())
}
