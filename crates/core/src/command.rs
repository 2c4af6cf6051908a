// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use evalcycle_domain::{FinalEvaluationGrades, PeerEvaluationQuestionMapping};

/// Requested change to a self-evaluation.
///
/// Commands are the only way to request state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum SelfEvaluationCommand {
    /// Replace content and score. Only allowed in draft.
    UpsertContent {
        content: Option<String>,
        score: Option<f64>,
    },
    /// Draft to submitted-to-evaluator.
    SubmitToEvaluator,
    /// Submitted-to-evaluator to submitted-to-manager.
    SubmitToManager,
    /// Submitted-to-manager to completed.
    Complete,
    /// Completed back to submitted-to-manager.
    Uncomplete,
    /// The evaluator sends the record back one step.
    ResetToEvaluator,
    /// Submitted-to-evaluator back to draft.
    Withdraw,
    /// Any state back to draft. Used by bulk resets.
    ResetToDraft,
    /// Clears content and score and returns to draft.
    ClearContent,
    /// Soft delete.
    Delete,
}

/// Requested change to a downward evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum DownwardEvaluationCommand {
    Upsert {
        content: Option<String>,
        score: Option<f64>,
        self_evaluation_id: Option<i64>,
    },
    Complete,
    /// Completed back to not completed.
    Reset,
}

/// Requested change to a peer evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum PeerEvaluationCommand {
    /// The evaluator answered a question; moves pending to in progress.
    StartAnswering,
    /// Completes the evaluation. Carries the current question mappings.
    Submit {
        mappings: Vec<PeerEvaluationQuestionMapping>,
    },
    Cancel,
}

/// Requested change to a step approval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepCommand {
    /// Submit (or resubmit after a completed revision) for approval.
    Submit,
    Approve,
    RequestRevision { comment: String },
    /// Every recipient of the open revision request has responded.
    CompleteRevision,
}

/// Requested change to a final evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalEvaluationCommand {
    Upsert(FinalEvaluationGrades),
    Confirm,
    CancelConfirmation,
    Delete,
}
