// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use evalcycle_audit::EvaluationActivity;

use crate::data_models::ActivityLogRow;
use crate::diesel_schema::evaluation_activity_logs;
use crate::error::PersistenceError;

backend_fn! {
/// Lists an employee's activity in a period, oldest first.
///
/// Entries written in the same instant keep insertion order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_activity_logs(
    conn: &mut _,
    period_id: i64,
    employee_id: &str,
) -> Result<Vec<EvaluationActivity>, PersistenceError> {
    let rows: Vec<ActivityLogRow> = evaluation_activity_logs::table
        .filter(evaluation_activity_logs::period_id.eq(period_id))
        .filter(evaluation_activity_logs::employee_id.eq(employee_id))
        .order((
            evaluation_activity_logs::performed_at.asc(),
            evaluation_activity_logs::id.asc(),
        ))
        .select(ActivityLogRow::as_select())
        .load(conn)?;

    let mut entries = rows
        .into_iter()
        .map(ActivityLogRow::into_domain)
        .collect::<Result<Vec<_>, _>>()?;
    // Text order is not time order once fractional seconds differ in width.
    entries.sort_by_key(|entry| entry.performed_at);
    Ok(entries)
}
}
