// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// No grade range contains the score.
    NoMatchingGrade {
        /// The score that was looked up.
        score: f64,
    },
    /// A grade range is malformed.
    InvalidGradeRange {
        /// The grade label of the offending range.
        grade: String,
        /// Description of the problem.
        reason: String,
    },
    /// Two grade ranges share at least one score.
    OverlappingGradeRanges {
        /// The first overlapping grade.
        first: String,
        /// The second overlapping grade.
        second: String,
    },
    /// An employee cannot be assigned as their own evaluator.
    SelfEvaluatorAssignment {
        /// The employee identifier.
        employee_id: String,
    },
    /// The same evaluator is already assigned in the same slot and scope.
    DuplicateEvaluatorAssignment {
        /// The evaluated employee.
        employee_id: String,
        /// The evaluator.
        evaluator_id: String,
        /// The evaluator slot.
        evaluator_type: String,
        /// The optional work item scope.
        work_item_id: Option<i64>,
    },
    /// A score lies outside the accepted bounds.
    ScoreOutOfRange {
        /// The rejected score.
        score: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// A submission was blocked by a business rule.
    CannotSubmit {
        /// Why the submission was rejected.
        reason: String,
    },
    /// A state machine transition is not permitted.
    InvalidTransition {
        /// The kind of record.
        entity: &'static str,
        /// The record identifier.
        id: i64,
        /// The current state.
        from: String,
        /// The requested state.
        to: String,
    },
    /// Content cannot be edited once the record left the draft state.
    AlreadySubmitted {
        /// The kind of record.
        entity: &'static str,
        /// The record identifier.
        id: i64,
    },
    /// The record is already completed.
    AlreadyCompleted {
        /// The kind of record.
        entity: &'static str,
        /// The record identifier.
        id: i64,
    },
    /// The record is not completed.
    NotCompleted {
        /// The kind of record.
        entity: &'static str,
        /// The record identifier.
        id: i64,
    },
    /// The mutation happened after the relevant period deadline.
    PeriodExpired {
        /// The evaluation period.
        period_id: i64,
        /// The deadline that passed, RFC 3339.
        deadline: String,
    },
    /// The acting evaluator is not the evaluator on the record.
    EvaluatorMismatch {
        /// The evaluator recorded on the evaluation.
        expected: String,
        /// The actor attempting the change.
        actual: String,
    },
    /// An employee cannot peer-evaluate themselves.
    SelfPeerEvaluation {
        /// The employee identifier.
        employee_id: String,
    },
    /// A peer evaluation already exists for the pair in the period.
    DuplicatePeerEvaluation {
        /// The evaluation period.
        period_id: i64,
        /// The evaluator.
        evaluator_id: String,
        /// The evaluatee.
        evaluatee_id: String,
    },
    /// The question is already mapped to the peer evaluation.
    DuplicateQuestionMapping {
        /// The peer evaluation.
        peer_evaluation_id: i64,
        /// The question.
        question_id: i64,
    },
    /// A revision request needs a non-empty comment.
    CommentRequired,
    /// The actor is not a recipient of the revision request.
    NotARevisionRecipient {
        /// The revision request.
        revision_request_id: i64,
        /// The actor who tried to respond.
        actor_id: String,
    },
    /// Only approvals and revision requests are written to the activity log.
    UnloggableStepStatus(String),
    /// A confirmed final evaluation cannot be mutated.
    ConfirmedEvaluationModification {
        /// The final evaluation identifier.
        id: i64,
    },
    /// The final evaluation is already confirmed.
    AlreadyConfirmed {
        /// The final evaluation identifier.
        id: i64,
    },
    /// The final evaluation was never confirmed.
    NotConfirmed {
        /// The final evaluation identifier.
        id: i64,
    },
    /// A stored or supplied enum string is not recognized.
    InvalidValue {
        /// The kind of value being parsed.
        kind: &'static str,
        /// The raw value.
        value: String,
    },
    /// The evaluation period is not configured.
    PeriodNotFound(i64),
    /// The evaluation period configuration is malformed.
    InvalidPeriodConfig {
        /// The evaluation period.
        period_id: i64,
        /// Description of the problem.
        reason: String,
    },
}

impl std::fmt::Display for DomainError {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoMatchingGrade { score } => {
                write!(f, "No grade range contains score {score}")
            }
            Self::InvalidGradeRange { grade, reason } => {
                write!(f, "Invalid grade range '{grade}': {reason}")
            }
            Self::OverlappingGradeRanges { first, second } => {
                write!(f, "Grade ranges '{first}' and '{second}' overlap")
            }
            Self::SelfEvaluatorAssignment { employee_id } => {
                write!(
                    f,
                    "Employee '{employee_id}' cannot be assigned as their own evaluator"
                )
            }
            Self::DuplicateEvaluatorAssignment {
                employee_id,
                evaluator_id,
                evaluator_type,
                work_item_id,
            } => match work_item_id {
                Some(work_item_id) => write!(
                    f,
                    "Evaluator '{evaluator_id}' is already the {evaluator_type} evaluator of employee '{employee_id}' for work item {work_item_id}"
                ),
                None => write!(
                    f,
                    "Evaluator '{evaluator_id}' is already the {evaluator_type} evaluator of employee '{employee_id}'"
                ),
            },
            Self::ScoreOutOfRange { score, min, max } => {
                write!(f, "Score {score} is outside the range [{min}, {max}]")
            }
            Self::CannotSubmit { reason } => write!(f, "Cannot submit: {reason}"),
            Self::InvalidTransition {
                entity,
                id,
                from,
                to,
            } => write!(f, "Invalid {entity} transition for {id}: {from} -> {to}"),
            Self::AlreadySubmitted { entity, id } => {
                write!(f, "{entity} {id} has already been submitted")
            }
            Self::AlreadyCompleted { entity, id } => {
                write!(f, "{entity} {id} is already completed")
            }
            Self::NotCompleted { entity, id } => write!(f, "{entity} {id} is not completed"),
            Self::PeriodExpired {
                period_id,
                deadline,
            } => write!(
                f,
                "Evaluation period {period_id} closed for changes at {deadline}"
            ),
            Self::EvaluatorMismatch { expected, actual } => write!(
                f,
                "Evaluation belongs to evaluator '{expected}', not '{actual}'"
            ),
            Self::SelfPeerEvaluation { employee_id } => {
                write!(f, "Employee '{employee_id}' cannot peer-evaluate themselves")
            }
            Self::DuplicatePeerEvaluation {
                period_id,
                evaluator_id,
                evaluatee_id,
            } => write!(
                f,
                "Peer evaluation of '{evaluatee_id}' by '{evaluator_id}' already exists in period {period_id}"
            ),
            Self::DuplicateQuestionMapping {
                peer_evaluation_id,
                question_id,
            } => write!(
                f,
                "Question {question_id} is already mapped to peer evaluation {peer_evaluation_id}"
            ),
            Self::CommentRequired => write!(f, "A revision request requires a comment"),
            Self::NotARevisionRecipient {
                revision_request_id,
                actor_id,
            } => write!(
                f,
                "'{actor_id}' is not a recipient of revision request {revision_request_id}"
            ),
            Self::UnloggableStepStatus(status) => write!(
                f,
                "Step status '{status}' is not recorded in the activity log"
            ),
            Self::ConfirmedEvaluationModification { id } => write!(
                f,
                "Final evaluation {id} is confirmed; cancel the confirmation before changing it"
            ),
            Self::AlreadyConfirmed { id } => {
                write!(f, "Final evaluation {id} is already confirmed")
            }
            Self::NotConfirmed { id } => write!(f, "Final evaluation {id} is not confirmed"),
            Self::InvalidValue { kind, value } => write!(f, "Invalid {kind}: '{value}'"),
            Self::PeriodNotFound(period_id) => {
                write!(f, "Evaluation period {period_id} is not configured")
            }
            Self::InvalidPeriodConfig { period_id, reason } => write!(
                f,
                "Invalid configuration for evaluation period {period_id}: {reason}"
            ),
        }
    }
}

impl std::error::Error for DomainError {}
