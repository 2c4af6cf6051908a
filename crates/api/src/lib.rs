// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Workflow operations for the evaluation cycle.
//!
//! [`EvaluationService`] owns a [`Persistence`] handle and the period
//! catalog. Each mutating operation:
//!
//! 1. checks the actor's role,
//! 2. runs the core transition inside one transaction,
//! 3. commits, then writes the activity entries on a best-effort basis.
//!
//! Activity-log failures are logged and never change the returned result.
//! Bulk operations give every record its own savepoint and report
//! per-record outcomes instead of failing the whole call.

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
#![allow(clippy::multiple_crate_versions)]

mod activity;
mod auth;
mod csv_import;
mod downward_evaluations;
mod error;
mod final_evaluations;
mod peer_evaluations;
mod registry;
mod request_response;
mod resets;
mod self_evaluations;
mod steps;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, Role};
pub use csv_import::{AssignmentCsvRow, parse_assignment_csv};
pub use error::{
    ApiError, ErrorCode, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use request_response::{
    ApproveStepResponse, BatchItemResult, BulkFailure, BulkResult, CreateEvaluationLineRequest,
    CreateQuestionRequest, EvaluationLineResetCounts, FinalEvaluationFromScoreRequest,
    RequestPeerEvaluationRequest, ResetResponse, SelfEvaluationResetCounts, SkippedStep,
    StepApprovalResetCounts, UpsertDownwardEvaluationRequest, UpsertFinalEvaluationRequest,
    UpsertSelfEvaluationRequest,
};

use evalcycle_audit::{ActivitySink, EvaluationActivity, record_best_effort};
use evalcycle_domain::{PeriodCatalog, PeriodConfig};
use evalcycle_persistence::Persistence;
use time::OffsetDateTime;

/// Entry point for every workflow operation.
///
/// Dependencies are passed in explicitly: the persistence handle, the
/// period catalog and, optionally, a separate activity sink. Without a
/// sink, activity entries go to the activity table of the same database.
pub struct EvaluationService {
    persistence: Persistence,
    periods: PeriodCatalog,
    sink: Option<Box<dyn ActivitySink>>,
    clock: fn() -> OffsetDateTime,
}

impl EvaluationService {
    #[must_use]
    pub fn new(persistence: Persistence, periods: PeriodCatalog) -> Self {
        Self {
            persistence,
            periods,
            sink: None,
            clock: OffsetDateTime::now_utc,
        }
    }

    /// Sends activity entries to `sink` instead of the database.
    #[must_use]
    pub fn with_activity_sink(mut self, sink: Box<dyn ActivitySink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Replaces the wall clock used for timestamps and deadline checks.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> OffsetDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Direct access to the underlying store, for queries and tooling.
    pub const fn persistence(&mut self) -> &mut Persistence {
        &mut self.persistence
    }

    #[must_use]
    pub const fn periods(&self) -> &PeriodCatalog {
        &self.periods
    }

    fn now(&self) -> OffsetDateTime {
        (self.clock)()
    }

    fn period(&self, period_id: i64) -> Result<PeriodConfig, ApiError> {
        Ok(self.periods.get(period_id)?.clone())
    }

    /// Writes activity entries after the main transaction committed.
    ///
    /// Returns the number of entries that could not be written.
    fn record_activities(&mut self, activities: &[EvaluationActivity]) -> usize {
        if activities.is_empty() {
            return 0;
        }
        match self.sink.as_mut() {
            Some(sink) => record_best_effort(sink.as_mut(), activities),
            None => record_best_effort(&mut self.persistence, activities),
        }
    }
}

/// Points a creation activity at the id the row was given on insert.
pub(crate) fn with_entity_id(
    activity: Option<EvaluationActivity>,
    id: i64,
) -> Option<EvaluationActivity> {
    activity.map(|mut activity| {
        activity.related_entity_id = Some(id);
        activity
    })
}
