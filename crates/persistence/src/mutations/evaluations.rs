// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Self and downward evaluation writes.

use diesel::prelude::*;
use evalcycle_domain::{DownwardEvaluation, SelfEvaluation};
use tracing::{debug, info};

use super::stale_write_or_missing;
use crate::backend::PersistenceBackend;
use crate::data_models::{StoredMeta, flag, format_optional_timestamp};
use crate::diesel_schema::{downward_evaluations, self_evaluations};
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a self-evaluation and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_self_evaluation(
    conn: &mut _,
    record: &SelfEvaluation,
) -> Result<i64, PersistenceError> {
    let meta = StoredMeta::new(&record.meta)?;

    diesel::insert_into(self_evaluations::table)
        .values((
            self_evaluations::period_id.eq(record.period_id),
            self_evaluations::employee_id.eq(&record.employee_id),
            self_evaluations::work_item_id.eq(record.work_item_id),
            self_evaluations::project_id.eq(record.project_id),
            self_evaluations::content.eq(&record.content),
            self_evaluations::score.eq(record.score),
            self_evaluations::submitted_to_evaluator.eq(flag(record.submitted_to_evaluator)),
            self_evaluations::submitted_to_evaluator_at
                .eq(format_optional_timestamp(record.submitted_to_evaluator_at)?),
            self_evaluations::submitted_to_manager.eq(flag(record.submitted_to_manager)),
            self_evaluations::submitted_to_manager_at
                .eq(format_optional_timestamp(record.submitted_to_manager_at)?),
            self_evaluations::is_completed.eq(flag(record.is_completed)),
            self_evaluations::completed_at.eq(format_optional_timestamp(record.completed_at)?),
            self_evaluations::created_at.eq(&meta.created_at),
            self_evaluations::updated_at.eq(&meta.updated_at),
            self_evaluations::deleted_at.eq(&meta.deleted_at),
            self_evaluations::is_deleted.eq(meta.is_deleted),
            self_evaluations::created_by.eq(meta.created_by),
            self_evaluations::updated_by.eq(meta.updated_by),
            self_evaluations::version.eq(meta.version),
        ))
        .execute(conn)?;

    let self_evaluation_id: i64 = conn.get_last_insert_rowid()?;
    info!(
        self_evaluation_id,
        employee_id = %record.employee_id,
        work_item_id = record.work_item_id,
        "Created self evaluation"
    );
    Ok(self_evaluation_id)
}
}

backend_fn! {
/// Saves a self-evaluation read at `record.meta.version` and returns the
/// new version.
///
/// # Errors
///
/// Returns `PersistenceError::StaleWrite` if the row changed since it was
/// read, or `NotFound` if it no longer exists.
pub fn update_self_evaluation(
    conn: &mut _,
    record: &SelfEvaluation,
) -> Result<i64, PersistenceError> {
    let meta = StoredMeta::new(&record.meta)?;
    debug!(self_evaluation_id = record.id, version = meta.version, "Saving self evaluation");

    let updated: usize = diesel::update(self_evaluations::table)
        .filter(self_evaluations::id.eq(record.id))
        .filter(self_evaluations::version.eq(meta.version))
        .set((
            self_evaluations::content.eq(&record.content),
            self_evaluations::score.eq(record.score),
            self_evaluations::submitted_to_evaluator.eq(flag(record.submitted_to_evaluator)),
            self_evaluations::submitted_to_evaluator_at
                .eq(format_optional_timestamp(record.submitted_to_evaluator_at)?),
            self_evaluations::submitted_to_manager.eq(flag(record.submitted_to_manager)),
            self_evaluations::submitted_to_manager_at
                .eq(format_optional_timestamp(record.submitted_to_manager_at)?),
            self_evaluations::is_completed.eq(flag(record.is_completed)),
            self_evaluations::completed_at.eq(format_optional_timestamp(record.completed_at)?),
            self_evaluations::updated_at.eq(&meta.updated_at),
            self_evaluations::deleted_at.eq(&meta.deleted_at),
            self_evaluations::is_deleted.eq(meta.is_deleted),
            self_evaluations::updated_by.eq(meta.updated_by),
            self_evaluations::version.eq(meta.version + 1),
        ))
        .execute(conn)?;

    if updated == 0 {
        let existing: i64 = self_evaluations::table
            .filter(self_evaluations::id.eq(record.id))
            .count()
            .get_result(conn)?;
        return Err(stale_write_or_missing(
            "self evaluation",
            record.id,
            meta.version,
            existing > 0,
        ));
    }
    Ok(meta.version + 1)
}
}

backend_fn! {
/// Inserts a downward evaluation and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_downward_evaluation(
    conn: &mut _,
    record: &DownwardEvaluation,
) -> Result<i64, PersistenceError> {
    let meta = StoredMeta::new(&record.meta)?;

    diesel::insert_into(downward_evaluations::table)
        .values((
            downward_evaluations::period_id.eq(record.period_id),
            downward_evaluations::evaluator_id.eq(&record.evaluator_id),
            downward_evaluations::employee_id.eq(&record.employee_id),
            downward_evaluations::evaluation_type.eq(record.evaluation_type.as_str()),
            downward_evaluations::work_item_id.eq(record.work_item_id),
            downward_evaluations::self_evaluation_id.eq(record.self_evaluation_id),
            downward_evaluations::content.eq(&record.content),
            downward_evaluations::score.eq(record.score),
            downward_evaluations::is_completed.eq(flag(record.is_completed)),
            downward_evaluations::completed_at
                .eq(format_optional_timestamp(record.completed_at)?),
            downward_evaluations::created_at.eq(&meta.created_at),
            downward_evaluations::updated_at.eq(&meta.updated_at),
            downward_evaluations::deleted_at.eq(&meta.deleted_at),
            downward_evaluations::is_deleted.eq(meta.is_deleted),
            downward_evaluations::created_by.eq(meta.created_by),
            downward_evaluations::updated_by.eq(meta.updated_by),
            downward_evaluations::version.eq(meta.version),
        ))
        .execute(conn)?;

    let downward_evaluation_id: i64 = conn.get_last_insert_rowid()?;
    info!(
        downward_evaluation_id,
        evaluator_id = %record.evaluator_id,
        employee_id = %record.employee_id,
        "Created downward evaluation"
    );
    Ok(downward_evaluation_id)
}
}

backend_fn! {
/// Saves a downward evaluation read at `record.meta.version` and returns
/// the new version.
///
/// # Errors
///
/// Returns `PersistenceError::StaleWrite` if the row changed since it was
/// read, or `NotFound` if it no longer exists.
pub fn update_downward_evaluation(
    conn: &mut _,
    record: &DownwardEvaluation,
) -> Result<i64, PersistenceError> {
    let meta = StoredMeta::new(&record.meta)?;

    let updated: usize = diesel::update(downward_evaluations::table)
        .filter(downward_evaluations::id.eq(record.id))
        .filter(downward_evaluations::version.eq(meta.version))
        .set((
            downward_evaluations::self_evaluation_id.eq(record.self_evaluation_id),
            downward_evaluations::content.eq(&record.content),
            downward_evaluations::score.eq(record.score),
            downward_evaluations::is_completed.eq(flag(record.is_completed)),
            downward_evaluations::completed_at
                .eq(format_optional_timestamp(record.completed_at)?),
            downward_evaluations::updated_at.eq(&meta.updated_at),
            downward_evaluations::deleted_at.eq(&meta.deleted_at),
            downward_evaluations::is_deleted.eq(meta.is_deleted),
            downward_evaluations::updated_by.eq(meta.updated_by),
            downward_evaluations::version.eq(meta.version + 1),
        ))
        .execute(conn)?;

    if updated == 0 {
        let existing: i64 = downward_evaluations::table
            .filter(downward_evaluations::id.eq(record.id))
            .count()
            .get_result(conn)?;
        return Err(stale_write_or_missing(
            "downward evaluation",
            record.id,
            meta.version,
            existing > 0,
        ));
    }
    Ok(meta.version + 1)
}
}
