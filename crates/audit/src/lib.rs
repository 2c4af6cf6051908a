// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Activity log entries for the evaluation cycle.
//!
//! Every successful workflow change produces at most one activity entry.
//! Entries are recorded after the change is committed, and a failure to
//! record one never fails the change itself.

use evalcycle_domain::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;
use tracing::warn;

#[cfg(test)]
mod tests;

/// Represents the entity performing an action.
///
/// An actor is any identifiable entity that initiates a state change,
/// such as an employee, an administrator or a scheduled job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "admin", "evaluator", "system").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }

    /// Administrators bypass ownership checks.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.actor_type == "admin"
    }
}

/// The workflow area an activity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    EvaluationLine,
    SelfEvaluation,
    DownwardEvaluation,
    PeerEvaluation,
    StepApproval,
    RevisionRequest,
    FinalEvaluation,
    Reset,
}

impl ActivityType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EvaluationLine => "evaluation_line",
            Self::SelfEvaluation => "self_evaluation",
            Self::DownwardEvaluation => "downward_evaluation",
            Self::PeerEvaluation => "peer_evaluation",
            Self::StepApproval => "step_approval",
            Self::RevisionRequest => "revision_request",
            Self::FinalEvaluation => "final_evaluation",
            Self::Reset => "reset",
        }
    }
}

impl FromStr for ActivityType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "evaluation_line" => Ok(Self::EvaluationLine),
            "self_evaluation" => Ok(Self::SelfEvaluation),
            "downward_evaluation" => Ok(Self::DownwardEvaluation),
            "peer_evaluation" => Ok(Self::PeerEvaluation),
            "step_approval" => Ok(Self::StepApproval),
            "revision_request" => Ok(Self::RevisionRequest),
            "final_evaluation" => Ok(Self::FinalEvaluation),
            "reset" => Ok(Self::Reset),
            _ => Err(DomainError::InvalidValue {
                kind: "activity type",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Created,
    Updated,
    Submitted,
    Completed,
    Reset,
    Cancelled,
    Deleted,
    Approved,
    RevisionRequested,
    RevisionCompleted,
    Confirmed,
    ConfirmationCancelled,
}

impl ActivityAction {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Submitted => "submitted",
            Self::Completed => "completed",
            Self::Reset => "reset",
            Self::Cancelled => "cancelled",
            Self::Deleted => "deleted",
            Self::Approved => "approved",
            Self::RevisionRequested => "revision_requested",
            Self::RevisionCompleted => "revision_completed",
            Self::Confirmed => "confirmed",
            Self::ConfirmationCancelled => "confirmation_cancelled",
        }
    }
}

impl FromStr for ActivityAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            "updated" => Ok(Self::Updated),
            "submitted" => Ok(Self::Submitted),
            "completed" => Ok(Self::Completed),
            "reset" => Ok(Self::Reset),
            "cancelled" => Ok(Self::Cancelled),
            "deleted" => Ok(Self::Deleted),
            "approved" => Ok(Self::Approved),
            "revision_requested" => Ok(Self::RevisionRequested),
            "revision_completed" => Ok(Self::RevisionCompleted),
            "confirmed" => Ok(Self::Confirmed),
            "confirmation_cancelled" => Ok(Self::ConfirmationCancelled),
            _ => Err(DomainError::InvalidValue {
                kind: "activity action",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable activity log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationActivity {
    pub period_id: i64,
    pub employee_id: String,
    pub activity_type: ActivityType,
    pub activity_action: ActivityAction,
    pub title: String,
    pub description: Option<String>,
    pub related_entity_type: Option<String>,
    pub related_entity_id: Option<i64>,
    pub performed_by: String,
    #[serde(with = "time::serde::rfc3339")]
    pub performed_at: OffsetDateTime,
}

impl EvaluationActivity {
    /// Creates an entry without description or related entity.
    #[must_use]
    pub fn new(
        period_id: i64,
        employee_id: &str,
        activity_type: ActivityType,
        activity_action: ActivityAction,
        title: String,
        actor: &Actor,
        performed_at: OffsetDateTime,
    ) -> Self {
        Self {
            period_id,
            employee_id: employee_id.to_string(),
            activity_type,
            activity_action,
            title,
            description: None,
            related_entity_type: None,
            related_entity_id: None,
            performed_by: actor.id.clone(),
            performed_at,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_related_entity(mut self, entity_type: &str, entity_id: i64) -> Self {
        self.related_entity_type = Some(entity_type.to_string());
        self.related_entity_id = Some(entity_id);
        self
    }
}

/// Failure to write an activity entry.
#[derive(Debug, thiserror::Error)]
pub enum ActivityLogError {
    #[error("activity log storage failed: {0}")]
    Storage(String),
    #[error("activity log is unavailable")]
    Unavailable,
}

/// Destination for activity entries.
pub trait ActivitySink {
    /// Appends one entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry could not be stored.
    fn record(&mut self, activity: &EvaluationActivity) -> Result<(), ActivityLogError>;
}

/// Keeps entries in memory. Used when no durable log is configured.
#[derive(Debug, Default, Clone)]
pub struct MemoryActivitySink {
    entries: Vec<EvaluationActivity>,
}

impl MemoryActivitySink {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[EvaluationActivity] {
        &self.entries
    }
}

impl ActivitySink for MemoryActivitySink {
    fn record(&mut self, activity: &EvaluationActivity) -> Result<(), ActivityLogError> {
        self.entries.push(activity.clone());
        Ok(())
    }
}

/// Records every entry, logging failures instead of returning them.
///
/// Returns the number of entries that could not be recorded.
pub fn record_best_effort<S: ActivitySink + ?Sized>(
    sink: &mut S,
    activities: &[EvaluationActivity],
) -> usize {
    let mut failures = 0;
    for activity in activities {
        if let Err(e) = sink.record(activity) {
            failures += 1;
            warn!(
                period_id = activity.period_id,
                employee_id = %activity.employee_id,
                activity_type = %activity.activity_type,
                activity_action = %activity.activity_action,
                error = %e,
                "Failed to record activity"
            );
        }
    }
    failures
}
