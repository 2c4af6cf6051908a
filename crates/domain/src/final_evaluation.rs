// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{JobDetailedGrade, JobGrade, RecordMeta};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The administrator's final verdict for an employee in a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalEvaluation {
    pub id: i64,
    pub employee_id: String,
    pub period_id: i64,
    pub evaluation_grade: String,
    pub job_grade: JobGrade,
    pub job_detailed_grade: JobDetailedGrade,
    pub final_comments: Option<String>,
    pub is_confirmed: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub confirmed_at: Option<OffsetDateTime>,
    pub confirmed_by: Option<String>,
    pub meta: RecordMeta,
}

impl FinalEvaluation {
    /// Rejects any mutation while confirmed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ConfirmedEvaluationModification` if confirmed.
    pub const fn ensure_mutable(&self) -> Result<(), DomainError> {
        if self.is_confirmed {
            Err(DomainError::ConfirmedEvaluationModification { id: self.id })
        } else {
            Ok(())
        }
    }
}

/// Grade values written by an upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalEvaluationGrades {
    pub evaluation_grade: String,
    pub job_grade: JobGrade,
    pub job_detailed_grade: JobDetailedGrade,
    pub final_comments: Option<String>,
}

impl FinalEvaluationGrades {
    /// # Errors
    ///
    /// Returns `DomainError::InvalidValue` if the evaluation grade is blank.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.evaluation_grade.trim().is_empty() {
            return Err(DomainError::InvalidValue {
                kind: "evaluation grade",
                value: self.evaluation_grade.clone(),
            });
        }
        Ok(())
    }
}
