// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Evaluation line and evaluator mapping queries.

use diesel::prelude::*;
use evalcycle_domain::{EvaluationLine, EvaluationLineMapping, EvaluatorType};
use tracing::debug;

use crate::data_models::{EvaluationLineMappingRow, EvaluationLineRow, typed_mapping};
use crate::diesel_schema::{evaluation_line_mappings, evaluation_lines};
use crate::error::PersistenceError;

backend_fn! {
/// Lists every active evaluation line in display order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_evaluation_lines(conn: &mut _) -> Result<Vec<EvaluationLine>, PersistenceError> {
    let rows: Vec<EvaluationLineRow> = evaluation_lines::table
        .filter(evaluation_lines::is_deleted.eq(0))
        .order((evaluation_lines::display_order.asc(), evaluation_lines::id.asc()))
        .select(EvaluationLineRow::as_select())
        .load(conn)?;

    rows.into_iter().map(EvaluationLineRow::into_domain).collect()
}
}

backend_fn! {
/// Finds the active line for an evaluator type with the lowest display order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_evaluation_line_by_type(
    conn: &mut _,
    evaluator_type: EvaluatorType,
) -> Result<Option<EvaluationLine>, PersistenceError> {
    let result: Result<EvaluationLineRow, diesel::result::Error> = evaluation_lines::table
        .filter(evaluation_lines::evaluator_type.eq(evaluator_type.as_str()))
        .filter(evaluation_lines::is_deleted.eq(0))
        .order(evaluation_lines::display_order.asc())
        .select(EvaluationLineRow::as_select())
        .first(conn);

    match result {
        Ok(row) => row.into_domain().map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Retrieves an active evaluator mapping by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the mapping is absent or soft-deleted.
pub fn get_mapping(
    conn: &mut _,
    mapping_id: i64,
) -> Result<Option<(EvaluationLineMapping, EvaluatorType)>, PersistenceError> {
    let result: Result<(EvaluationLineMappingRow, String), diesel::result::Error> =
        evaluation_line_mappings::table
            .inner_join(evaluation_lines::table)
            .filter(evaluation_line_mappings::id.eq(mapping_id))
            .filter(evaluation_line_mappings::is_deleted.eq(0))
            .select((
                EvaluationLineMappingRow::as_select(),
                evaluation_lines::evaluator_type,
            ))
            .first(conn);

    match result {
        Ok(row) => typed_mapping(row).map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists an employee's active mappings with their evaluator type.
///
/// `period_id` narrows the result to one period when given.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_mappings_for_employee(
    conn: &mut _,
    period_id: Option<i64>,
    employee_id: &str,
) -> Result<Vec<(EvaluationLineMapping, EvaluatorType)>, PersistenceError> {
    debug!(employee_id, ?period_id, "Listing evaluator mappings for employee");

    let mut query = evaluation_line_mappings::table
        .inner_join(evaluation_lines::table)
        .filter(evaluation_line_mappings::employee_id.eq(employee_id))
        .filter(evaluation_line_mappings::is_deleted.eq(0))
        .select((
            EvaluationLineMappingRow::as_select(),
            evaluation_lines::evaluator_type,
        ))
        .order((evaluation_lines::display_order.asc(), evaluation_line_mappings::id.asc()))
        .into_boxed();
    if let Some(period_id) = period_id {
        query = query.filter(evaluation_line_mappings::period_id.eq(period_id));
    }

    let rows: Vec<(EvaluationLineMappingRow, String)> = query.load(conn)?;
    rows.into_iter().map(typed_mapping).collect()
}
}

backend_fn! {
/// Lists an evaluator's active mappings with their evaluator type.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_mappings_for_evaluator(
    conn: &mut _,
    period_id: Option<i64>,
    evaluator_id: &str,
) -> Result<Vec<(EvaluationLineMapping, EvaluatorType)>, PersistenceError> {
    debug!(evaluator_id, ?period_id, "Listing evaluator mappings for evaluator");

    let mut query = evaluation_line_mappings::table
        .inner_join(evaluation_lines::table)
        .filter(evaluation_line_mappings::evaluator_id.eq(evaluator_id))
        .filter(evaluation_line_mappings::is_deleted.eq(0))
        .select((
            EvaluationLineMappingRow::as_select(),
            evaluation_lines::evaluator_type,
        ))
        .order((
            evaluation_line_mappings::employee_id.asc(),
            evaluation_line_mappings::id.asc(),
        ))
        .into_boxed();
    if let Some(period_id) = period_id {
        query = query.filter(evaluation_line_mappings::period_id.eq(period_id));
    }

    let rows: Vec<(EvaluationLineMappingRow, String)> = query.load(conn)?;
    rows.into_iter().map(typed_mapping).collect()
}
}
