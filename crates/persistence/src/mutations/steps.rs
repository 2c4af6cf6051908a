// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use evalcycle_domain::{RevisionRequest, RevisionRequestRecipient, StepApproval};
use tracing::info;

use super::stale_write_or_missing;
use crate::backend::PersistenceBackend;
use crate::data_models::{StoredMeta, flag, format_optional_timestamp, format_timestamp};
use crate::diesel_schema::{revision_request_recipients, revision_requests, step_approvals};
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a step approval and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_step_approval(
    conn: &mut _,
    approval: &StepApproval,
) -> Result<i64, PersistenceError> {
    let meta = StoredMeta::new(&approval.meta)?;

    diesel::insert_into(step_approvals::table)
        .values((
            step_approvals::period_id.eq(approval.period_id),
            step_approvals::employee_id.eq(&approval.employee_id),
            step_approvals::step.eq(approval.step.as_str()),
            step_approvals::status.eq(approval.status.as_str()),
            step_approvals::approved_by.eq(&approval.approved_by),
            step_approvals::approved_at.eq(format_optional_timestamp(approval.approved_at)?),
            step_approvals::created_at.eq(&meta.created_at),
            step_approvals::updated_at.eq(&meta.updated_at),
            step_approvals::deleted_at.eq(&meta.deleted_at),
            step_approvals::is_deleted.eq(meta.is_deleted),
            step_approvals::created_by.eq(meta.created_by),
            step_approvals::updated_by.eq(meta.updated_by),
            step_approvals::version.eq(meta.version),
        ))
        .execute(conn)?;

    let step_approval_id: i64 = conn.get_last_insert_rowid()?;
    info!(
        step_approval_id,
        employee_id = %approval.employee_id,
        step = %approval.step,
        status = %approval.status,
        "Recorded step approval"
    );
    Ok(step_approval_id)
}
}

backend_fn! {
/// Saves a step approval read at `approval.meta.version` and returns the
/// new version.
///
/// # Errors
///
/// Returns `PersistenceError::StaleWrite` if the row changed since it was
/// read, or `NotFound` if it no longer exists.
pub fn update_step_approval(
    conn: &mut _,
    approval: &StepApproval,
) -> Result<i64, PersistenceError> {
    let meta = StoredMeta::new(&approval.meta)?;

    let updated: usize = diesel::update(step_approvals::table)
        .filter(step_approvals::id.eq(approval.id))
        .filter(step_approvals::version.eq(meta.version))
        .set((
            step_approvals::status.eq(approval.status.as_str()),
            step_approvals::approved_by.eq(&approval.approved_by),
            step_approvals::approved_at.eq(format_optional_timestamp(approval.approved_at)?),
            step_approvals::updated_at.eq(&meta.updated_at),
            step_approvals::deleted_at.eq(&meta.deleted_at),
            step_approvals::is_deleted.eq(meta.is_deleted),
            step_approvals::updated_by.eq(meta.updated_by),
            step_approvals::version.eq(meta.version + 1),
        ))
        .execute(conn)?;

    if updated == 0 {
        let existing: i64 = step_approvals::table
            .filter(step_approvals::id.eq(approval.id))
            .count()
            .get_result(conn)?;
        return Err(stale_write_or_missing(
            "step approval",
            approval.id,
            meta.version,
            existing > 0,
        ));
    }
    info!(
        step_approval_id = approval.id,
        step = %approval.step,
        status = %approval.status,
        "Updated step approval"
    );
    Ok(meta.version + 1)
}
}

backend_fn! {
/// Inserts a revision request and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_revision_request(
    conn: &mut _,
    request: &RevisionRequest,
) -> Result<i64, PersistenceError> {
    let meta = StoredMeta::new(&request.meta)?;

    diesel::insert_into(revision_requests::table)
        .values((
            revision_requests::period_id.eq(request.period_id),
            revision_requests::employee_id.eq(&request.employee_id),
            revision_requests::step.eq(request.step.as_str()),
            revision_requests::comment.eq(&request.comment),
            revision_requests::requested_by.eq(&request.requested_by),
            revision_requests::requested_at.eq(format_timestamp(request.requested_at)?),
            revision_requests::created_at.eq(&meta.created_at),
            revision_requests::updated_at.eq(&meta.updated_at),
            revision_requests::deleted_at.eq(&meta.deleted_at),
            revision_requests::is_deleted.eq(meta.is_deleted),
            revision_requests::created_by.eq(meta.created_by),
            revision_requests::updated_by.eq(meta.updated_by),
            revision_requests::version.eq(meta.version),
        ))
        .execute(conn)?;

    let revision_request_id: i64 = conn.get_last_insert_rowid()?;
    info!(
        revision_request_id,
        employee_id = %request.employee_id,
        step = %request.step,
        "Created revision request"
    );
    Ok(revision_request_id)
}
}

backend_fn! {
/// Inserts a revision request recipient and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_revision_recipient(
    conn: &mut _,
    recipient: &RevisionRequestRecipient,
) -> Result<i64, PersistenceError> {
    let meta = StoredMeta::new(&recipient.meta)?;

    diesel::insert_into(revision_request_recipients::table)
        .values((
            revision_request_recipients::revision_request_id.eq(recipient.revision_request_id),
            revision_request_recipients::recipient_id.eq(&recipient.recipient_id),
            revision_request_recipients::recipient_type.eq(recipient.recipient_type.as_str()),
            revision_request_recipients::is_read.eq(flag(recipient.is_read)),
            revision_request_recipients::read_at.eq(format_optional_timestamp(recipient.read_at)?),
            revision_request_recipients::is_completed.eq(flag(recipient.is_completed)),
            revision_request_recipients::completed_at
                .eq(format_optional_timestamp(recipient.completed_at)?),
            revision_request_recipients::response_comment.eq(&recipient.response_comment),
            revision_request_recipients::created_at.eq(&meta.created_at),
            revision_request_recipients::updated_at.eq(&meta.updated_at),
            revision_request_recipients::deleted_at.eq(&meta.deleted_at),
            revision_request_recipients::is_deleted.eq(meta.is_deleted),
            revision_request_recipients::created_by.eq(meta.created_by),
            revision_request_recipients::updated_by.eq(meta.updated_by),
            revision_request_recipients::version.eq(meta.version),
        ))
        .execute(conn)?;

    Ok(conn.get_last_insert_rowid()?)
}
}

backend_fn! {
/// Saves a revision recipient read at `recipient.meta.version` and returns
/// the new version.
///
/// # Errors
///
/// Returns `PersistenceError::StaleWrite` if the row changed since it was
/// read, or `NotFound` if it no longer exists.
pub fn update_revision_recipient(
    conn: &mut _,
    recipient: &RevisionRequestRecipient,
) -> Result<i64, PersistenceError> {
    let meta = StoredMeta::new(&recipient.meta)?;

    let updated: usize = diesel::update(revision_request_recipients::table)
        .filter(revision_request_recipients::id.eq(recipient.id))
        .filter(revision_request_recipients::version.eq(meta.version))
        .set((
            revision_request_recipients::is_read.eq(flag(recipient.is_read)),
            revision_request_recipients::read_at.eq(format_optional_timestamp(recipient.read_at)?),
            revision_request_recipients::is_completed.eq(flag(recipient.is_completed)),
            revision_request_recipients::completed_at
                .eq(format_optional_timestamp(recipient.completed_at)?),
            revision_request_recipients::response_comment.eq(&recipient.response_comment),
            revision_request_recipients::updated_at.eq(&meta.updated_at),
            revision_request_recipients::deleted_at.eq(&meta.deleted_at),
            revision_request_recipients::is_deleted.eq(meta.is_deleted),
            revision_request_recipients::updated_by.eq(meta.updated_by),
            revision_request_recipients::version.eq(meta.version + 1),
        ))
        .execute(conn)?;

    if updated == 0 {
        let existing: i64 = revision_request_recipients::table
            .filter(revision_request_recipients::id.eq(recipient.id))
            .count()
            .get_result(conn)?;
        return Err(stale_write_or_missing(
            "revision recipient",
            recipient.id,
            meta.version,
            existing > 0,
        ));
    }
    Ok(meta.version + 1)
}
}
