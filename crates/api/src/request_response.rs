// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use evalcycle_domain::{
    ApprovalStep, DownwardEvaluationType, EvaluatorType, JobDetailedGrade, JobGrade,
    StepApproval, StepStatus,
};

use crate::error::ApiError;

/// API request to add an evaluation line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEvaluationLineRequest {
    pub evaluator_type: EvaluatorType,
    pub display_order: i32,
    pub is_required: bool,
    pub is_auto_assigned: bool,
}

/// Outcome of one item in a batch call.
///
/// Batches never fail as a whole; each item carries its own result.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchItemResult {
    /// Zero-based position of the item in the request.
    pub index: usize,
    /// The created record id, or why the item was rejected.
    pub outcome: Result<i64, ApiError>,
}

impl BatchItemResult {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// One record that a bulk operation could not process.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BulkFailure {
    pub record_id: i64,
    pub reason: String,
}

/// Aggregate result of a bulk operation.
///
/// Records already in the target state count as successes.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BulkResult {
    pub total_count: usize,
    pub success_count: usize,
    pub failed_count: usize,
    pub failures: Vec<BulkFailure>,
}

impl BulkResult {
    pub(crate) fn record_success(&mut self) {
        self.total_count += 1;
        self.success_count += 1;
    }

    pub(crate) fn record_failure(&mut self, record_id: i64, error: &ApiError) {
        self.total_count += 1;
        self.failed_count += 1;
        self.failures.push(BulkFailure {
            record_id,
            reason: error.to_string(),
        });
    }
}

/// API request to create or edit a self evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertSelfEvaluationRequest {
    pub period_id: i64,
    pub employee_id: String,
    pub work_item_id: i64,
    pub project_id: i64,
    pub content: Option<String>,
    pub score: Option<f64>,
}

/// API request to create or edit a downward evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertDownwardEvaluationRequest {
    pub period_id: i64,
    pub evaluator_id: String,
    pub employee_id: String,
    pub evaluation_type: DownwardEvaluationType,
    pub work_item_id: Option<i64>,
    pub self_evaluation_id: Option<i64>,
    pub content: Option<String>,
    pub score: Option<f64>,
}

/// API request to add a question to the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateQuestionRequest {
    pub text: String,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
}

/// API request to ask an evaluator for a peer evaluation.
///
/// Questions come from `question_ids` (in order), then from
/// `question_group_id`. When both are empty the default group is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPeerEvaluationRequest {
    pub period_id: i64,
    pub evaluator_id: String,
    pub evaluatee_id: String,
    pub question_ids: Vec<i64>,
    pub question_group_id: Option<i64>,
}

/// A later step that cascade approval left alone.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SkippedStep {
    pub step: ApprovalStep,
    /// `None` when the step was never submitted.
    pub status: Option<StepStatus>,
}

/// API response for a step approval.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ApproveStepResponse {
    /// The approved step.
    pub approval: StepApproval,
    /// Later steps approved by the cascade, in step order.
    pub cascaded: Vec<StepApproval>,
    /// Later steps the cascade did not touch.
    pub skipped: Vec<SkippedStep>,
}

/// Rows removed by [`crate::EvaluationService::reset_all_evaluation_lines`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationLineResetCounts {
    pub peer_evaluation_question_mappings: usize,
    pub peer_evaluations: usize,
    pub downward_evaluations: usize,
    pub evaluation_line_mappings: usize,
}

/// Rows removed by [`crate::EvaluationService::reset_all_self_evaluations`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfEvaluationResetCounts {
    pub downward_evaluations: usize,
    pub self_evaluations: usize,
}

/// Rows removed by [`crate::EvaluationService::reset_period_step_approvals`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepApprovalResetCounts {
    pub revision_request_recipients: usize,
    pub revision_requests: usize,
    pub step_approvals: usize,
}

/// API response for a cascading reset.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetResponse<C> {
    pub deleted_counts: C,
    pub message: String,
}

/// API request to create or update a final evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertFinalEvaluationRequest {
    pub employee_id: String,
    pub period_id: i64,
    pub evaluation_grade: String,
    pub job_grade: JobGrade,
    pub job_detailed_grade: JobDetailedGrade,
    pub final_comments: Option<String>,
}

/// API request to grade a final evaluation from a numeric score.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalEvaluationFromScoreRequest {
    pub employee_id: String,
    pub period_id: i64,
    pub score: f64,
    pub job_grade: JobGrade,
    pub job_detailed_grade: JobDetailedGrade,
    pub final_comments: Option<String>,
}
