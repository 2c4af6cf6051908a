// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use evalcycle_domain::{EvaluationLine, EvaluationLineMapping};
use tracing::info;

use super::stale_write_or_missing;
use crate::backend::PersistenceBackend;
use crate::data_models::{StoredMeta, flag};
use crate::diesel_schema::{evaluation_line_mappings, evaluation_lines};
use crate::error::PersistenceError;

backend_fn! {
/// Inserts an evaluation line and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails, including a duplicate
/// (type, display order) pair among active lines.
pub fn insert_evaluation_line(
    conn: &mut _,
    line: &EvaluationLine,
) -> Result<i64, PersistenceError> {
    let meta = StoredMeta::new(&line.meta)?;

    diesel::insert_into(evaluation_lines::table)
        .values((
            evaluation_lines::evaluator_type.eq(line.evaluator_type.as_str()),
            evaluation_lines::display_order.eq(line.display_order),
            evaluation_lines::is_required.eq(flag(line.is_required)),
            evaluation_lines::is_auto_assigned.eq(flag(line.is_auto_assigned)),
            evaluation_lines::created_at.eq(&meta.created_at),
            evaluation_lines::updated_at.eq(&meta.updated_at),
            evaluation_lines::deleted_at.eq(&meta.deleted_at),
            evaluation_lines::is_deleted.eq(meta.is_deleted),
            evaluation_lines::created_by.eq(meta.created_by),
            evaluation_lines::updated_by.eq(meta.updated_by),
            evaluation_lines::version.eq(meta.version),
        ))
        .execute(conn)?;

    let line_id: i64 = conn.get_last_insert_rowid()?;
    info!(line_id, evaluator_type = %line.evaluator_type, "Created evaluation line");
    Ok(line_id)
}
}

backend_fn! {
/// Inserts an evaluator mapping and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_mapping(
    conn: &mut _,
    mapping: &EvaluationLineMapping,
) -> Result<i64, PersistenceError> {
    let meta = StoredMeta::new(&mapping.meta)?;

    diesel::insert_into(evaluation_line_mappings::table)
        .values((
            evaluation_line_mappings::period_id.eq(mapping.period_id),
            evaluation_line_mappings::employee_id.eq(&mapping.employee_id),
            evaluation_line_mappings::evaluator_id.eq(&mapping.evaluator_id),
            evaluation_line_mappings::work_item_id.eq(mapping.work_item_id),
            evaluation_line_mappings::evaluation_line_id.eq(mapping.evaluation_line_id),
            evaluation_line_mappings::created_at.eq(&meta.created_at),
            evaluation_line_mappings::updated_at.eq(&meta.updated_at),
            evaluation_line_mappings::deleted_at.eq(&meta.deleted_at),
            evaluation_line_mappings::is_deleted.eq(meta.is_deleted),
            evaluation_line_mappings::created_by.eq(meta.created_by),
            evaluation_line_mappings::updated_by.eq(meta.updated_by),
            evaluation_line_mappings::version.eq(meta.version),
        ))
        .execute(conn)?;

    let mapping_id: i64 = conn.get_last_insert_rowid()?;
    info!(
        mapping_id,
        employee_id = %mapping.employee_id,
        evaluator_id = %mapping.evaluator_id,
        "Created evaluator mapping"
    );
    Ok(mapping_id)
}
}

backend_fn! {
/// Saves an evaluator mapping read at `mapping.meta.version`.
///
/// Returns the new version.
///
/// # Errors
///
/// Returns `PersistenceError::StaleWrite` if the row changed since it was
/// read, or `NotFound` if it no longer exists.
pub fn update_mapping(
    conn: &mut _,
    mapping: &EvaluationLineMapping,
) -> Result<i64, PersistenceError> {
    let meta = StoredMeta::new(&mapping.meta)?;

    let updated: usize = diesel::update(evaluation_line_mappings::table)
        .filter(evaluation_line_mappings::id.eq(mapping.id))
        .filter(evaluation_line_mappings::version.eq(meta.version))
        .set((
            evaluation_line_mappings::evaluator_id.eq(&mapping.evaluator_id),
            evaluation_line_mappings::work_item_id.eq(mapping.work_item_id),
            evaluation_line_mappings::evaluation_line_id.eq(mapping.evaluation_line_id),
            evaluation_line_mappings::updated_at.eq(&meta.updated_at),
            evaluation_line_mappings::deleted_at.eq(&meta.deleted_at),
            evaluation_line_mappings::is_deleted.eq(meta.is_deleted),
            evaluation_line_mappings::updated_by.eq(meta.updated_by),
            evaluation_line_mappings::version.eq(meta.version + 1),
        ))
        .execute(conn)?;

    if updated == 0 {
        let existing: i64 = evaluation_line_mappings::table
            .filter(evaluation_line_mappings::id.eq(mapping.id))
            .count()
            .get_result(conn)?;
        return Err(stale_write_or_missing(
            "evaluation line mapping",
            mapping.id,
            meta.version,
            existing > 0,
        ));
    }
    Ok(meta.version + 1)
}
}
