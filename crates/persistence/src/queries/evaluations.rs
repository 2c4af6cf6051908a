// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Self and downward evaluation queries.
//!
//! Every query here ignores soft-deleted rows.

use diesel::prelude::*;
use evalcycle_domain::{DownwardEvaluation, DownwardEvaluationType, SelfEvaluation};
use tracing::debug;

use crate::data_models::{DownwardEvaluationRow, SelfEvaluationRow};
use crate::diesel_schema::{downward_evaluations, self_evaluations};
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves an active self-evaluation by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_self_evaluation(
    conn: &mut _,
    self_evaluation_id: i64,
) -> Result<Option<SelfEvaluation>, PersistenceError> {
    let result: Result<SelfEvaluationRow, diesel::result::Error> = self_evaluations::table
        .filter(self_evaluations::id.eq(self_evaluation_id))
        .filter(self_evaluations::is_deleted.eq(0))
        .select(SelfEvaluationRow::as_select())
        .first(conn);

    match result {
        Ok(row) => row.into_domain().map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Finds the active self-evaluation for one work item of an employee.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_self_evaluation(
    conn: &mut _,
    employee_id: &str,
    work_item_id: i64,
    period_id: i64,
) -> Result<Option<SelfEvaluation>, PersistenceError> {
    let result: Result<SelfEvaluationRow, diesel::result::Error> = self_evaluations::table
        .filter(self_evaluations::employee_id.eq(employee_id))
        .filter(self_evaluations::work_item_id.eq(work_item_id))
        .filter(self_evaluations::period_id.eq(period_id))
        .filter(self_evaluations::is_deleted.eq(0))
        .select(SelfEvaluationRow::as_select())
        .first(conn);

    match result {
        Ok(row) => row.into_domain().map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists an employee's active self-evaluations in a period.
///
/// `project_id` narrows the result to one project when given.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_self_evaluations(
    conn: &mut _,
    employee_id: &str,
    period_id: i64,
    project_id: Option<i64>,
) -> Result<Vec<SelfEvaluation>, PersistenceError> {
    debug!(employee_id, period_id, ?project_id, "Listing self evaluations");

    let mut query = self_evaluations::table
        .filter(self_evaluations::employee_id.eq(employee_id))
        .filter(self_evaluations::period_id.eq(period_id))
        .filter(self_evaluations::is_deleted.eq(0))
        .order(self_evaluations::id.asc())
        .select(SelfEvaluationRow::as_select())
        .into_boxed();
    if let Some(project_id) = project_id {
        query = query.filter(self_evaluations::project_id.eq(project_id));
    }

    let rows: Vec<SelfEvaluationRow> = query.load(conn)?;
    rows.into_iter().map(SelfEvaluationRow::into_domain).collect()
}
}

backend_fn! {
/// Lists the id of every self-evaluation row, soft-deleted ones included.
///
/// Used by the global reset, which removes rows physically.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_all_self_evaluation_ids(conn: &mut _) -> Result<Vec<i64>, PersistenceError> {
    Ok(self_evaluations::table
        .select(self_evaluations::id)
        .order(self_evaluations::id.asc())
        .load(conn)?)
}
}

backend_fn! {
/// Retrieves an active downward evaluation by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_downward_evaluation(
    conn: &mut _,
    downward_evaluation_id: i64,
) -> Result<Option<DownwardEvaluation>, PersistenceError> {
    let result: Result<DownwardEvaluationRow, diesel::result::Error> =
        downward_evaluations::table
            .filter(downward_evaluations::id.eq(downward_evaluation_id))
            .filter(downward_evaluations::is_deleted.eq(0))
            .select(DownwardEvaluationRow::as_select())
            .first(conn);

    match result {
        Ok(row) => row.into_domain().map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Finds the active downward evaluation for one evaluator slot.
///
/// A `None` work item matches only rows without a work item.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_downward_evaluation(
    conn: &mut _,
    evaluator_id: &str,
    employee_id: &str,
    period_id: i64,
    evaluation_type: DownwardEvaluationType,
    work_item_id: Option<i64>,
) -> Result<Option<DownwardEvaluation>, PersistenceError> {
    let mut query = downward_evaluations::table
        .filter(downward_evaluations::evaluator_id.eq(evaluator_id))
        .filter(downward_evaluations::employee_id.eq(employee_id))
        .filter(downward_evaluations::period_id.eq(period_id))
        .filter(downward_evaluations::evaluation_type.eq(evaluation_type.as_str()))
        .filter(downward_evaluations::is_deleted.eq(0))
        .select(DownwardEvaluationRow::as_select())
        .into_boxed();
    query = match work_item_id {
        Some(work_item_id) => query.filter(downward_evaluations::work_item_id.eq(work_item_id)),
        None => query.filter(downward_evaluations::work_item_id.is_null()),
    };

    match query.first::<DownwardEvaluationRow>(conn) {
        Ok(row) => row.into_domain().map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists the active downward evaluations one evaluator wrote for an
/// employee in a period, optionally of a single type.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_downward_evaluations(
    conn: &mut _,
    evaluator_id: &str,
    employee_id: &str,
    period_id: i64,
    evaluation_type: Option<DownwardEvaluationType>,
) -> Result<Vec<DownwardEvaluation>, PersistenceError> {
    debug!(evaluator_id, employee_id, period_id, "Listing downward evaluations");

    let mut query = downward_evaluations::table
        .filter(downward_evaluations::evaluator_id.eq(evaluator_id))
        .filter(downward_evaluations::employee_id.eq(employee_id))
        .filter(downward_evaluations::period_id.eq(period_id))
        .filter(downward_evaluations::is_deleted.eq(0))
        .order(downward_evaluations::id.asc())
        .select(DownwardEvaluationRow::as_select())
        .into_boxed();
    if let Some(evaluation_type) = evaluation_type {
        query = query.filter(downward_evaluations::evaluation_type.eq(evaluation_type.as_str()));
    }

    let rows: Vec<DownwardEvaluationRow> = query.load(conn)?;
    rows.into_iter().map(DownwardEvaluationRow::into_domain).collect()
}
}
