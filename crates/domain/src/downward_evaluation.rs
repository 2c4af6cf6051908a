// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Downward evaluations written by primary and secondary evaluators.

use crate::error::DomainError;
use crate::types::{DownwardEvaluationType, RecordMeta, validate_score};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

const ENTITY: &str = "downward evaluation";

/// An evaluator's assessment of a subordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownwardEvaluation {
    pub id: i64,
    pub period_id: i64,
    pub evaluator_id: String,
    pub employee_id: String,
    pub evaluation_type: DownwardEvaluationType,
    pub work_item_id: Option<i64>,
    pub self_evaluation_id: Option<i64>,
    pub content: Option<String>,
    pub score: Option<f64>,
    pub is_completed: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
    pub meta: RecordMeta,
}

impl DownwardEvaluation {
    /// Checks that `actor_id` is the evaluator on this record.
    ///
    /// Administrators bypass the check.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EvaluatorMismatch` for anyone else.
    pub fn ensure_evaluator(&self, actor_id: &str, is_admin: bool) -> Result<(), DomainError> {
        if is_admin || self.evaluator_id == actor_id {
            Ok(())
        } else {
            Err(DomainError::EvaluatorMismatch {
                expected: self.evaluator_id.clone(),
                actual: actor_id.to_string(),
            })
        }
    }

    /// Rejects edits to a completed evaluation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AlreadyCompleted` if the record is completed.
    pub const fn ensure_not_completed(&self) -> Result<(), DomainError> {
        if self.is_completed {
            Err(DomainError::AlreadyCompleted {
                entity: ENTITY,
                id: self.id,
            })
        } else {
            Ok(())
        }
    }

    /// Checks that a score in `[0, max_score]` is present.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::CannotSubmit` naming the problem.
    pub fn ensure_completable(&self, max_score: f64) -> Result<(), DomainError> {
        let Some(score) = self.score else {
            return Err(DomainError::CannotSubmit {
                reason: format!("downward evaluation {} has no score", self.id),
            });
        };
        validate_score(score, 0.0, max_score).map_err(|_| DomainError::CannotSubmit {
            reason: format!(
                "downward evaluation {} score {score} is outside [0, {max_score}]",
                self.id
            ),
        })
    }
}

/// Values for a downward evaluation that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDownwardEvaluation {
    pub period_id: i64,
    pub evaluator_id: String,
    pub employee_id: String,
    pub evaluation_type: DownwardEvaluationType,
    pub work_item_id: Option<i64>,
    pub self_evaluation_id: Option<i64>,
    pub content: Option<String>,
    pub score: Option<f64>,
}
