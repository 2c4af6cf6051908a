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
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod downward_evaluation;
mod error;
mod evaluation_line;
mod final_evaluation;
mod grade;
mod peer_evaluation;
mod period;
mod self_evaluation;
mod step_approval;
mod types;

#[cfg(test)]
mod tests;

pub use downward_evaluation::{DownwardEvaluation, NewDownwardEvaluation};
pub use error::DomainError;
pub use evaluation_line::{
    EvaluationLine, EvaluationLineMapping, EvaluatorAssignment, RequiredEvaluatorMissing,
    find_missing_required_evaluators,
};
pub use final_evaluation::{FinalEvaluation, FinalEvaluationGrades};
pub use grade::{GradeRange, GradeTable, weighted_score};
pub use peer_evaluation::{
    EvaluationQuestion, NewPeerEvaluation, PeerEvaluation, PeerEvaluationQuestionMapping,
    PeerEvaluationStatus, QuestionGroup, QuestionGroupMember, ensure_all_answered,
};
pub use period::{PeriodCatalog, PeriodConfig};
pub use self_evaluation::{NewSelfEvaluation, SelfEvaluation, SelfEvaluationState};
pub use step_approval::{
    ApprovalStep, RecipientType, RevisionRequest, RevisionRequestRecipient, StepApproval,
    StepStatus, normalize_revision_comment,
};
pub use types::{
    DownwardEvaluationType, EvaluatorType, JobDetailedGrade, JobGrade, RecordMeta, validate_score,
};
