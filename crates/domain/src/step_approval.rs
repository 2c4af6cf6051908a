// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Step approval and revision request tracking.
//!
//! Each `(period, employee)` pair moves through four approval checkpoints
//! in a fixed order. A step is approved, or sent back with a comment and
//! then resubmitted until it is approved.

use crate::error::DomainError;
use crate::types::RecordMeta;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

const ENTITY: &str = "step approval";

/// An approval checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStep {
    Criteria,
    SelfEvaluation,
    Primary,
    Secondary,
}

impl ApprovalStep {
    /// All steps in approval order.
    pub const ALL: [Self; 4] = [
        Self::Criteria,
        Self::SelfEvaluation,
        Self::Primary,
        Self::Secondary,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Criteria => "criteria",
            Self::SelfEvaluation => "self",
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }

    /// Steps that come after this one, in order.
    pub fn subsequent(self) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(move |step| *step > self)
    }

    /// Who must act on a revision request for this step.
    #[must_use]
    pub const fn revision_recipients(&self) -> &'static [RecipientType] {
        match self {
            Self::Criteria => &[RecipientType::Evaluatee, RecipientType::PrimaryEvaluator],
            Self::SelfEvaluation => &[RecipientType::Evaluatee],
            Self::Primary => &[RecipientType::PrimaryEvaluator],
            Self::Secondary => &[RecipientType::SecondaryEvaluator],
        }
    }
}

impl FromStr for ApprovalStep {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "criteria" => Ok(Self::Criteria),
            "self" => Ok(Self::SelfEvaluation),
            "primary" => Ok(Self::Primary),
            "secondary" => Ok(Self::Secondary),
            _ => Err(DomainError::InvalidValue {
                kind: "approval step",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ApprovalStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Approval state of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Submitted and awaiting a decision.
    Pending,
    /// Approved for this cycle.
    Approved,
    /// Sent back with a comment.
    RevisionRequested,
    /// Every recipient has handled the revision request.
    RevisionCompleted,
}

impl StepStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::RevisionRequested => "revision_requested",
            Self::RevisionCompleted => "revision_completed",
        }
    }

    /// Returns true if a decision (approve / request revision) may be taken.
    #[must_use]
    pub const fn awaits_decision(&self) -> bool {
        matches!(self, Self::Pending | Self::RevisionCompleted)
    }

    /// Validates a status change.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` for changes outside the
    /// approval loop.
    pub fn validate_transition(&self, id: i64, new_status: Self) -> Result<(), DomainError> {
        let valid = match self {
            Self::Pending => matches!(new_status, Self::Approved | Self::RevisionRequested),
            Self::RevisionRequested => matches!(new_status, Self::RevisionCompleted),
            Self::RevisionCompleted => matches!(
                new_status,
                Self::Pending | Self::Approved | Self::RevisionRequested
            ),
            Self::Approved => false,
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

impl FromStr for StepStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "revision_requested" => Ok(Self::RevisionRequested),
            "revision_completed" => Ok(Self::RevisionCompleted),
            _ => Err(DomainError::InvalidValue {
                kind: "step status",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The role a revision request recipient plays for the employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientType {
    Evaluatee,
    PrimaryEvaluator,
    SecondaryEvaluator,
}

impl RecipientType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Evaluatee => "evaluatee",
            Self::PrimaryEvaluator => "primary_evaluator",
            Self::SecondaryEvaluator => "secondary_evaluator",
        }
    }
}

impl FromStr for RecipientType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "evaluatee" => Ok(Self::Evaluatee),
            "primary_evaluator" => Ok(Self::PrimaryEvaluator),
            "secondary_evaluator" => Ok(Self::SecondaryEvaluator),
            _ => Err(DomainError::InvalidValue {
                kind: "recipient type",
                value: s.to_string(),
            }),
        }
    }
}

/// Approval record of one step for one employee in one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepApproval {
    pub id: i64,
    pub period_id: i64,
    pub employee_id: String,
    pub step: ApprovalStep,
    pub status: StepStatus,
    pub approved_by: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub approved_at: Option<OffsetDateTime>,
    pub meta: RecordMeta,
}

/// A revision request sent back for one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionRequest {
    pub id: i64,
    pub period_id: i64,
    pub employee_id: String,
    pub step: ApprovalStep,
    pub comment: String,
    pub requested_by: String,
    #[serde(with = "time::serde::rfc3339")]
    pub requested_at: OffsetDateTime,
    pub meta: RecordMeta,
}

/// One person who must respond to a revision request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionRequestRecipient {
    pub id: i64,
    pub revision_request_id: i64,
    pub recipient_id: String,
    pub recipient_type: RecipientType,
    pub is_read: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub read_at: Option<OffsetDateTime>,
    pub is_completed: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
    pub response_comment: Option<String>,
    pub meta: RecordMeta,
}

/// Trims and checks a revision comment.
///
/// # Errors
///
/// Returns `DomainError::CommentRequired` for empty or whitespace-only
/// comments.
pub fn normalize_revision_comment(comment: &str) -> Result<String, DomainError> {
    let trimmed = comment.trim();
    if trimmed.is_empty() {
        return Err(DomainError::CommentRequired);
    }
    Ok(trimmed.to_string())
}
