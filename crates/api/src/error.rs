// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use evalcycle::CoreError;
use evalcycle_domain::DomainError;
use evalcycle_persistence::PersistenceError;
use serde::Serialize;

/// Machine-readable error kind, stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    Duplicate,
    ValidationError,
    PermissionDenied,
    PeriodExpired,
    AlreadyCompleted,
    NotCompleted,
    AlreadyConfirmed,
    NotConfirmed,
    CannotSubmit,
    StaleWrite,
    InvalidTransition,
    Internal,
}

impl ErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Duplicate => "DUPLICATE",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::PeriodExpired => "PERIOD_EXPIRED",
            Self::AlreadyCompleted => "ALREADY_COMPLETED",
            Self::NotCompleted => "NOT_COMPLETED",
            Self::AlreadyConfirmed => "ALREADY_CONFIRMED",
            Self::NotConfirmed => "NOT_CONFIRMED",
            Self::CannotSubmit => "CANNOT_SUBMIT",
            Self::StaleWrite => "STALE_WRITE",
            Self::InvalidTransition => "INVALID_TRANSITION",
            Self::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
/// Every variant maps to exactly one [`ErrorCode`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The actor's role does not allow the action.
    #[error("Unauthorized: '{action}' requires {required_role} role")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// The actor is not the owner, evaluator or recipient of the record.
    #[error("Permission denied: {message}")]
    PermissionDenied {
        /// A human-readable description naming the record and actor.
        message: String,
    },
    /// A domain rule was violated.
    #[error("Domain rule violation ({rule}): {message}")]
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// A bulk operation's filter matched nothing.
    #[error("No records found: {message}")]
    NoRecordsFound {
        /// Description of the filter.
        message: String,
    },
    /// A uniqueness invariant would be violated.
    #[error("Duplicate {resource_type}: {message}")]
    Duplicate {
        /// The type of resource.
        resource_type: String,
        /// A human-readable description of the conflict.
        message: String,
    },
    /// The relevant period deadline has passed.
    #[error("Period {period_id} expired at {deadline}")]
    PeriodExpired {
        /// The evaluation period.
        period_id: i64,
        /// The deadline that passed, RFC 3339.
        deadline: String,
    },
    /// Submission was blocked by a business rule.
    #[error("Cannot submit: {reason}")]
    CannotSubmit {
        /// Why the submission was rejected.
        reason: String,
    },
    /// The record is already completed or closed.
    #[error("{message}")]
    AlreadyCompleted {
        /// A human-readable description naming the record.
        message: String,
    },
    /// The record is not completed.
    #[error("{message}")]
    NotCompleted {
        /// A human-readable description naming the record.
        message: String,
    },
    /// The final evaluation is already confirmed.
    #[error("Final evaluation {id} is already confirmed")]
    AlreadyConfirmed {
        /// The final evaluation identifier.
        id: i64,
    },
    /// A confirmed final evaluation cannot be modified.
    #[error("Final evaluation {id} is confirmed; cancel the confirmation before modifying it")]
    ConfirmedEvaluationModification {
        /// The final evaluation identifier.
        id: i64,
    },
    /// The final evaluation was never confirmed.
    #[error("Final evaluation {id} is not confirmed")]
    NotConfirmed {
        /// The final evaluation identifier.
        id: i64,
    },
    /// A state machine transition is not permitted.
    #[error("Invalid transition: {message}")]
    InvalidTransition {
        /// A human-readable description naming the record and states.
        message: String,
    },
    /// The record changed since it was read. Re-read and retry.
    #[error("Stale write: {message}")]
    StaleWrite {
        /// A human-readable description naming the record.
        message: String,
    },
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Returns the machine-readable kind of this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Unauthorized { .. } | Self::PermissionDenied { .. } => ErrorCode::PermissionDenied,
            Self::DomainRuleViolation { .. } | Self::InvalidInput { .. } => {
                ErrorCode::ValidationError
            }
            Self::ResourceNotFound { .. } | Self::NoRecordsFound { .. } => ErrorCode::NotFound,
            Self::Duplicate { .. } => ErrorCode::Duplicate,
            Self::PeriodExpired { .. } => ErrorCode::PeriodExpired,
            Self::CannotSubmit { .. } => ErrorCode::CannotSubmit,
            Self::AlreadyCompleted { .. } => ErrorCode::AlreadyCompleted,
            Self::NotCompleted { .. } => ErrorCode::NotCompleted,
            Self::AlreadyConfirmed { .. } | Self::ConfirmedEvaluationModification { .. } => {
                ErrorCode::AlreadyConfirmed
            }
            Self::NotConfirmed { .. } => ErrorCode::NotConfirmed,
            Self::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            Self::StaleWrite { .. } => ErrorCode::StaleWrite,
            Self::Internal { .. } => ErrorCode::Internal,
        }
    }

    pub(crate) fn not_found(resource_type: &str, message: String) -> Self {
        Self::ResourceNotFound {
            resource_type: resource_type.to_string(),
            message,
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message = err.to_string();
    match err {
        DomainError::NoMatchingGrade { .. } => ApiError::InvalidInput {
            field: String::from("score"),
            message,
        },
        DomainError::InvalidGradeRange { .. } | DomainError::OverlappingGradeRanges { .. } => {
            ApiError::InvalidInput {
                field: String::from("grade_ranges"),
                message,
            }
        }
        DomainError::SelfEvaluatorAssignment { .. } => ApiError::DomainRuleViolation {
            rule: String::from("self_evaluator_assignment"),
            message,
        },
        DomainError::SelfPeerEvaluation { .. } => ApiError::DomainRuleViolation {
            rule: String::from("self_peer_evaluation"),
            message,
        },
        DomainError::DuplicateEvaluatorAssignment { .. } => ApiError::Duplicate {
            resource_type: String::from("evaluator assignment"),
            message,
        },
        DomainError::DuplicatePeerEvaluation { .. } => ApiError::Duplicate {
            resource_type: String::from("peer evaluation"),
            message,
        },
        DomainError::DuplicateQuestionMapping { .. } => ApiError::Duplicate {
            resource_type: String::from("question mapping"),
            message,
        },
        DomainError::ScoreOutOfRange { .. } => ApiError::InvalidInput {
            field: String::from("score"),
            message,
        },
        DomainError::CommentRequired => ApiError::InvalidInput {
            field: String::from("comment"),
            message,
        },
        DomainError::InvalidValue { kind, .. } => ApiError::InvalidInput {
            field: kind.replace(' ', "_"),
            message,
        },
        DomainError::CannotSubmit { reason } => ApiError::CannotSubmit { reason },
        DomainError::InvalidTransition { .. } | DomainError::AlreadySubmitted { .. } => {
            ApiError::InvalidTransition { message }
        }
        DomainError::AlreadyCompleted { .. } => ApiError::AlreadyCompleted { message },
        DomainError::NotCompleted { .. } => ApiError::NotCompleted { message },
        DomainError::PeriodExpired {
            period_id,
            deadline,
        } => ApiError::PeriodExpired {
            period_id,
            deadline,
        },
        DomainError::EvaluatorMismatch { .. } | DomainError::NotARevisionRecipient { .. } => {
            ApiError::PermissionDenied { message }
        }
        DomainError::ConfirmedEvaluationModification { id } => {
            ApiError::ConfirmedEvaluationModification { id }
        }
        DomainError::AlreadyConfirmed { id } => ApiError::AlreadyConfirmed { id },
        DomainError::NotConfirmed { id } => ApiError::NotConfirmed { id },
        DomainError::PeriodNotFound(period_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Evaluation period"),
            message: format!("Evaluation period {period_id} is not configured"),
        },
        DomainError::InvalidPeriodConfig { .. } => ApiError::InvalidInput {
            field: String::from("period"),
            message,
        },
        DomainError::UnloggableStepStatus(_) => ApiError::Internal { message },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}

/// Translates a persistence error into an API error.
///
/// Storage details other than the conflict kinds are reported as internal.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message,
        },
        PersistenceError::Duplicate(message) => ApiError::Duplicate {
            resource_type: String::from("record"),
            message,
        },
        stale @ PersistenceError::StaleWrite { .. } => ApiError::StaleWrite {
            message: stale.to_string(),
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        translate_domain_error(err)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        translate_core_error(err)
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err)
    }
}
