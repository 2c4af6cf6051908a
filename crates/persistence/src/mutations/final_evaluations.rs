// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use evalcycle_domain::FinalEvaluation;
use tracing::info;

use super::stale_write_or_missing;
use crate::backend::PersistenceBackend;
use crate::data_models::{StoredMeta, flag, format_optional_timestamp};
use crate::diesel_schema::final_evaluations;
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a final evaluation and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_final_evaluation(
    conn: &mut _,
    record: &FinalEvaluation,
) -> Result<i64, PersistenceError> {
    let meta = StoredMeta::new(&record.meta)?;

    diesel::insert_into(final_evaluations::table)
        .values((
            final_evaluations::employee_id.eq(&record.employee_id),
            final_evaluations::period_id.eq(record.period_id),
            final_evaluations::evaluation_grade.eq(&record.evaluation_grade),
            final_evaluations::job_grade.eq(record.job_grade.as_str()),
            final_evaluations::job_detailed_grade.eq(record.job_detailed_grade.as_str()),
            final_evaluations::final_comments.eq(&record.final_comments),
            final_evaluations::is_confirmed.eq(flag(record.is_confirmed)),
            final_evaluations::confirmed_at.eq(format_optional_timestamp(record.confirmed_at)?),
            final_evaluations::confirmed_by.eq(&record.confirmed_by),
            final_evaluations::created_at.eq(&meta.created_at),
            final_evaluations::updated_at.eq(&meta.updated_at),
            final_evaluations::deleted_at.eq(&meta.deleted_at),
            final_evaluations::is_deleted.eq(meta.is_deleted),
            final_evaluations::created_by.eq(meta.created_by),
            final_evaluations::updated_by.eq(meta.updated_by),
            final_evaluations::version.eq(meta.version),
        ))
        .execute(conn)?;

    let final_evaluation_id: i64 = conn.get_last_insert_rowid()?;
    info!(
        final_evaluation_id,
        employee_id = %record.employee_id,
        evaluation_grade = %record.evaluation_grade,
        "Created final evaluation"
    );
    Ok(final_evaluation_id)
}
}

backend_fn! {
/// Saves a final evaluation read at `record.meta.version` and returns the
/// new version.
///
/// # Errors
///
/// Returns `PersistenceError::StaleWrite` if the row changed since it was
/// read, or `NotFound` if it no longer exists.
pub fn update_final_evaluation(
    conn: &mut _,
    record: &FinalEvaluation,
) -> Result<i64, PersistenceError> {
    let meta = StoredMeta::new(&record.meta)?;

    let updated: usize = diesel::update(final_evaluations::table)
        .filter(final_evaluations::id.eq(record.id))
        .filter(final_evaluations::version.eq(meta.version))
        .set((
            final_evaluations::evaluation_grade.eq(&record.evaluation_grade),
            final_evaluations::job_grade.eq(record.job_grade.as_str()),
            final_evaluations::job_detailed_grade.eq(record.job_detailed_grade.as_str()),
            final_evaluations::final_comments.eq(&record.final_comments),
            final_evaluations::is_confirmed.eq(flag(record.is_confirmed)),
            final_evaluations::confirmed_at.eq(format_optional_timestamp(record.confirmed_at)?),
            final_evaluations::confirmed_by.eq(&record.confirmed_by),
            final_evaluations::updated_at.eq(&meta.updated_at),
            final_evaluations::deleted_at.eq(&meta.deleted_at),
            final_evaluations::is_deleted.eq(meta.is_deleted),
            final_evaluations::updated_by.eq(meta.updated_by),
            final_evaluations::version.eq(meta.version + 1),
        ))
        .execute(conn)?;

    if updated == 0 {
        let existing: i64 = final_evaluations::table
            .filter(final_evaluations::id.eq(record.id))
            .count()
            .get_result(conn)?;
        return Err(stale_write_or_missing(
            "final evaluation",
            record.id,
            meta.version,
            existing > 0,
        ));
    }
    Ok(meta.version + 1)
}
}
