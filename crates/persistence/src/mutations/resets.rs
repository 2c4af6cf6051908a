// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Physical deletes used by the cascading resets.
//!
//! These bypass soft delete. Callers run them inside one transaction and
//! delete children before parents; each returns the number of rows removed.

use diesel::prelude::*;
use tracing::debug;

use crate::diesel_schema::{
    downward_evaluations, evaluation_line_mappings, peer_evaluation_question_mappings,
    peer_evaluations, revision_request_recipients, revision_requests, self_evaluations,
    step_approvals,
};
use crate::error::PersistenceError;

backend_fn! {
/// Deletes every peer evaluation question mapping.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_all_question_mappings(conn: &mut _) -> Result<usize, PersistenceError> {
    let deleted: usize = diesel::delete(peer_evaluation_question_mappings::table).execute(conn)?;
    debug!(deleted, "Deleted peer question mappings");
    Ok(deleted)
}
}

backend_fn! {
/// Deletes every peer evaluation.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_all_peer_evaluations(conn: &mut _) -> Result<usize, PersistenceError> {
    let deleted: usize = diesel::delete(peer_evaluations::table).execute(conn)?;
    debug!(deleted, "Deleted peer evaluations");
    Ok(deleted)
}
}

backend_fn! {
/// Deletes every downward evaluation.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_all_downward_evaluations(conn: &mut _) -> Result<usize, PersistenceError> {
    let deleted: usize = diesel::delete(downward_evaluations::table).execute(conn)?;
    debug!(deleted, "Deleted downward evaluations");
    Ok(deleted)
}
}

backend_fn! {
/// Deletes every evaluator mapping.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_all_mappings(conn: &mut _) -> Result<usize, PersistenceError> {
    let deleted: usize = diesel::delete(evaluation_line_mappings::table).execute(conn)?;
    debug!(deleted, "Deleted evaluator mappings");
    Ok(deleted)
}
}

backend_fn! {
/// Deletes the downward evaluations that reference a self-evaluation.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_downward_for_self_evaluation(
    conn: &mut _,
    self_evaluation_id: i64,
) -> Result<usize, PersistenceError> {
    Ok(diesel::delete(
        downward_evaluations::table
            .filter(downward_evaluations::self_evaluation_id.eq(self_evaluation_id)),
    )
    .execute(conn)?)
}
}

backend_fn! {
/// Deletes one self-evaluation row, active or not.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_self_evaluation_row(
    conn: &mut _,
    self_evaluation_id: i64,
) -> Result<usize, PersistenceError> {
    Ok(diesel::delete(self_evaluations::table.filter(self_evaluations::id.eq(self_evaluation_id)))
        .execute(conn)?)
}
}

backend_fn! {
/// Deletes the recipients of every revision request in a period.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_recipients_for_period(
    conn: &mut _,
    period_id: i64,
) -> Result<usize, PersistenceError> {
    let request_ids: Vec<i64> = revision_requests::table
        .filter(revision_requests::period_id.eq(period_id))
        .select(revision_requests::id)
        .load(conn)?;
    if request_ids.is_empty() {
        return Ok(0);
    }

    let deleted: usize = diesel::delete(
        revision_request_recipients::table
            .filter(revision_request_recipients::revision_request_id.eq_any(request_ids)),
    )
    .execute(conn)?;
    debug!(period_id, deleted, "Deleted revision recipients");
    Ok(deleted)
}
}

backend_fn! {
/// Deletes every revision request in a period.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_revision_requests_for_period(
    conn: &mut _,
    period_id: i64,
) -> Result<usize, PersistenceError> {
    Ok(
        diesel::delete(revision_requests::table.filter(revision_requests::period_id.eq(period_id)))
            .execute(conn)?,
    )
}
}

backend_fn! {
/// Deletes every step approval in a period.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_step_approvals_for_period(
    conn: &mut _,
    period_id: i64,
) -> Result<usize, PersistenceError> {
    Ok(
        diesel::delete(step_approvals::table.filter(step_approvals::period_id.eq(period_id)))
            .execute(conn)?,
    )
}
}
