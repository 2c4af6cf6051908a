// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Who evaluates whom.
//!
//! Evaluation lines are shared configuration describing the evaluator
//! slots. Mappings attach a concrete evaluator to an employee for one
//! slot, optionally narrowed to a single work item.

use crate::error::DomainError;
use crate::types::{EvaluatorType, RecordMeta};
use serde::{Deserialize, Serialize};

/// An evaluator slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationLine {
    pub id: i64,
    pub evaluator_type: EvaluatorType,
    pub display_order: i32,
    pub is_required: bool,
    pub is_auto_assigned: bool,
    pub meta: RecordMeta,
}

/// Assignment of an evaluator to an employee within a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationLineMapping {
    pub id: i64,
    pub period_id: i64,
    pub employee_id: String,
    pub evaluator_id: String,
    pub work_item_id: Option<i64>,
    pub evaluation_line_id: i64,
    pub meta: RecordMeta,
}

/// A requested evaluator assignment, prior to persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatorAssignment {
    pub period_id: i64,
    pub employee_id: String,
    pub evaluator_id: String,
    pub evaluator_type: EvaluatorType,
    pub work_item_id: Option<i64>,
}

impl EvaluatorAssignment {
    /// Checks the rules that do not need stored state.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SelfEvaluatorAssignment` if the employee would
    /// evaluate themselves.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.employee_id == self.evaluator_id {
            return Err(DomainError::SelfEvaluatorAssignment {
                employee_id: self.employee_id.clone(),
            });
        }
        Ok(())
    }

    /// Checks the assignment against the employee's existing mappings.
    ///
    /// `existing` pairs each active mapping with the evaluator type of its line.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DuplicateEvaluatorAssignment` if the same
    /// evaluator already holds the same slot and scope.
    pub fn ensure_not_duplicate(
        &self,
        existing: &[(EvaluationLineMapping, EvaluatorType)],
    ) -> Result<(), DomainError> {
        let duplicate = existing.iter().any(|(mapping, evaluator_type)| {
            !mapping.meta.is_deleted
                && mapping.period_id == self.period_id
                && mapping.employee_id == self.employee_id
                && mapping.evaluator_id == self.evaluator_id
                && mapping.work_item_id == self.work_item_id
                && *evaluator_type == self.evaluator_type
        });
        if duplicate {
            return Err(DomainError::DuplicateEvaluatorAssignment {
                employee_id: self.employee_id.clone(),
                evaluator_id: self.evaluator_id.clone(),
                evaluator_type: self.evaluator_type.to_string(),
                work_item_id: self.work_item_id,
            });
        }
        Ok(())
    }
}

/// A required evaluator slot that has nobody assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredEvaluatorMissing {
    pub period_id: i64,
    pub employee_id: String,
    pub evaluator_type: EvaluatorType,
}

/// Reports required evaluator slots without an active assignment.
///
/// This is a validation report, not an error: employees are routinely
/// incomplete while the registry is being set up.
#[must_use]
pub fn find_missing_required_evaluators(
    period_id: i64,
    employee_id: &str,
    lines: &[EvaluationLine],
    mappings: &[EvaluationLineMapping],
) -> Vec<RequiredEvaluatorMissing> {
    lines
        .iter()
        .filter(|line| line.is_required && !line.meta.is_deleted)
        .filter(|line| {
            !mappings.iter().any(|mapping| {
                !mapping.meta.is_deleted
                    && mapping.period_id == period_id
                    && mapping.employee_id == employee_id
                    && mapping.evaluation_line_id == line.id
            })
        })
        .map(|line| RequiredEvaluatorMissing {
            period_id,
            employee_id: employee_id.to_string(),
            evaluator_type: line.evaluator_type,
        })
        .collect()
}
