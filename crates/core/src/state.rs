// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use evalcycle_audit::EvaluationActivity;
use evalcycle_domain::{ApprovalStep, StepStatus};

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without
/// side effects. A transition whose target state was already reached is a
/// success with `changed == false` and no activity.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult<T> {
    /// The record after the transition.
    pub record: T,
    /// The activity entry describing this transition, if it is logged.
    pub activity: Option<EvaluationActivity>,
    /// False when the command was a no-op.
    pub changed: bool,
}

impl<T> TransitionResult<T> {
    #[must_use]
    pub const fn changed(record: T, activity: Option<EvaluationActivity>) -> Self {
        Self {
            record,
            activity,
            changed: true,
        }
    }

    #[must_use]
    pub const fn unchanged(record: T) -> Self {
        Self {
            record,
            activity: None,
            changed: false,
        }
    }
}

/// Which later steps an approval cascade touches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadePlan {
    /// Steps to approve, in order.
    pub approve: Vec<ApprovalStep>,
    /// Steps left alone, with their status (`None` if never submitted).
    pub skipped: Vec<(ApprovalStep, Option<StepStatus>)>,
}
