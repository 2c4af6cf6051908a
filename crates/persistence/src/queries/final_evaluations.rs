// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use evalcycle_domain::FinalEvaluation;

use crate::data_models::FinalEvaluationRow;
use crate::diesel_schema::final_evaluations;
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves an active final evaluation by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_final_evaluation_by_id(
    conn: &mut _,
    final_evaluation_id: i64,
) -> Result<Option<FinalEvaluation>, PersistenceError> {
    let result: Result<FinalEvaluationRow, diesel::result::Error> = final_evaluations::table
        .filter(final_evaluations::id.eq(final_evaluation_id))
        .filter(final_evaluations::is_deleted.eq(0))
        .select(FinalEvaluationRow::as_select())
        .first(conn);

    match result {
        Ok(row) => row.into_domain().map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Finds the active final evaluation of an employee in a period.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_final_evaluation(
    conn: &mut _,
    employee_id: &str,
    period_id: i64,
) -> Result<Option<FinalEvaluation>, PersistenceError> {
    let result: Result<FinalEvaluationRow, diesel::result::Error> = final_evaluations::table
        .filter(final_evaluations::employee_id.eq(employee_id))
        .filter(final_evaluations::period_id.eq(period_id))
        .filter(final_evaluations::is_deleted.eq(0))
        .select(FinalEvaluationRow::as_select())
        .first(conn);

    match result {
        Ok(row) => row.into_domain().map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists the active final evaluations of a period by employee.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_final_evaluations(
    conn: &mut _,
    period_id: i64,
) -> Result<Vec<FinalEvaluation>, PersistenceError> {
    let rows: Vec<FinalEvaluationRow> = final_evaluations::table
        .filter(final_evaluations::period_id.eq(period_id))
        .filter(final_evaluations::is_deleted.eq(0))
        .order(final_evaluations::employee_id.asc())
        .select(FinalEvaluationRow::as_select())
        .load(conn)?;

    rows.into_iter().map(FinalEvaluationRow::into_domain).collect()
}
}
