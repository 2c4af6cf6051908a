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

//! Evaluation cycle state machines.
//!
//! Every function here is pure: it takes the current record, a command and
//! the acting [`Actor`](evalcycle_audit::Actor), and returns the new record
//! together with the activity entry describing the change. Loading and
//! saving records is left to the caller.

mod apply;
mod command;
mod error;
mod final_evaluation;
mod peer;
mod registry;
mod state;
mod step;

#[cfg(test)]
mod tests;

pub use apply::{
    apply_downward_evaluation, apply_self_evaluation, create_downward_evaluation,
    create_self_evaluation,
};
pub use command::{
    DownwardEvaluationCommand, FinalEvaluationCommand, PeerEvaluationCommand,
    SelfEvaluationCommand, StepCommand,
};
pub use error::CoreError;
pub use final_evaluation::{apply_final_evaluation, create_final_evaluation};
pub use peer::{answer_question, apply_peer_evaluation, create_peer_evaluation, map_question};
pub use registry::{assign_evaluator, remove_assignment};
pub use state::{CascadePlan, TransitionResult};
pub use step::{apply_step, plan_cascade, revision_recipients, step_activity_action};

use evalcycle_domain::{DomainError, GradeTable};

/// Derives the evaluation grade for a score using the period's grade table.
///
/// # Errors
///
/// Returns `DomainError::NoMatchingGrade` if no range contains the score.
pub fn derive_grade(table: &GradeTable, score: f64) -> Result<String, DomainError> {
    table.grade_of(score).map(ToString::to_string)
}
