// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Step approval and revision request queries.

use diesel::prelude::*;
use evalcycle_domain::{ApprovalStep, RevisionRequest, RevisionRequestRecipient, StepApproval};

use crate::data_models::{RevisionRecipientRow, RevisionRequestRow, StepApprovalRow};
use crate::diesel_schema::{revision_request_recipients, revision_requests, step_approvals};
use crate::error::PersistenceError;

backend_fn! {
/// Finds the active approval record of one step.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_step_approval(
    conn: &mut _,
    period_id: i64,
    employee_id: &str,
    step: ApprovalStep,
) -> Result<Option<StepApproval>, PersistenceError> {
    let result: Result<StepApprovalRow, diesel::result::Error> = step_approvals::table
        .filter(step_approvals::period_id.eq(period_id))
        .filter(step_approvals::employee_id.eq(employee_id))
        .filter(step_approvals::step.eq(step.as_str()))
        .filter(step_approvals::is_deleted.eq(0))
        .select(StepApprovalRow::as_select())
        .first(conn);

    match result {
        Ok(row) => row.into_domain().map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists the active approval records of an employee in a period.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_step_approvals(
    conn: &mut _,
    period_id: i64,
    employee_id: &str,
) -> Result<Vec<StepApproval>, PersistenceError> {
    let rows: Vec<StepApprovalRow> = step_approvals::table
        .filter(step_approvals::period_id.eq(period_id))
        .filter(step_approvals::employee_id.eq(employee_id))
        .filter(step_approvals::is_deleted.eq(0))
        .order(step_approvals::id.asc())
        .select(StepApprovalRow::as_select())
        .load(conn)?;

    let mut approvals = rows
        .into_iter()
        .map(StepApprovalRow::into_domain)
        .collect::<Result<Vec<_>, _>>()?;
    approvals.sort_by_key(|approval| approval.step);
    Ok(approvals)
}
}

backend_fn! {
/// Retrieves an active revision request by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_revision_request(
    conn: &mut _,
    revision_request_id: i64,
) -> Result<Option<RevisionRequest>, PersistenceError> {
    let result: Result<RevisionRequestRow, diesel::result::Error> = revision_requests::table
        .filter(revision_requests::id.eq(revision_request_id))
        .filter(revision_requests::is_deleted.eq(0))
        .select(RevisionRequestRow::as_select())
        .first(conn);

    match result {
        Ok(row) => row.into_domain().map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Finds the most recent active revision request for a step.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_latest_revision_request(
    conn: &mut _,
    period_id: i64,
    employee_id: &str,
    step: ApprovalStep,
) -> Result<Option<RevisionRequest>, PersistenceError> {
    let result: Result<RevisionRequestRow, diesel::result::Error> = revision_requests::table
        .filter(revision_requests::period_id.eq(period_id))
        .filter(revision_requests::employee_id.eq(employee_id))
        .filter(revision_requests::step.eq(step.as_str()))
        .filter(revision_requests::is_deleted.eq(0))
        .order(revision_requests::id.desc())
        .select(RevisionRequestRow::as_select())
        .first(conn);

    match result {
        Ok(row) => row.into_domain().map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists the active recipients of a revision request.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_revision_recipients(
    conn: &mut _,
    revision_request_id: i64,
) -> Result<Vec<RevisionRequestRecipient>, PersistenceError> {
    let rows: Vec<RevisionRecipientRow> = revision_request_recipients::table
        .filter(revision_request_recipients::revision_request_id.eq(revision_request_id))
        .filter(revision_request_recipients::is_deleted.eq(0))
        .order(revision_request_recipients::id.asc())
        .select(RevisionRecipientRow::as_select())
        .load(conn)?;

    rows.into_iter().map(RevisionRecipientRow::into_domain).collect()
}
}

backend_fn! {
/// Lists the revision requests addressed to a recipient, newest first,
/// each paired with the recipient's own row.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_revision_requests_for_recipient(
    conn: &mut _,
    recipient_id: &str,
) -> Result<Vec<(RevisionRequest, RevisionRequestRecipient)>, PersistenceError> {
    let rows: Vec<(RevisionRequestRow, RevisionRecipientRow)> = revision_requests::table
        .inner_join(revision_request_recipients::table)
        .filter(revision_request_recipients::recipient_id.eq(recipient_id))
        .filter(revision_request_recipients::is_deleted.eq(0))
        .filter(revision_requests::is_deleted.eq(0))
        .order(revision_requests::id.desc())
        .select((
            RevisionRequestRow::as_select(),
            RevisionRecipientRow::as_select(),
        ))
        .load(conn)?;

    rows.into_iter()
        .map(|(request, recipient)| Ok((request.into_domain()?, recipient.into_domain()?)))
        .collect()
}
}
