// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use evalcycle_audit::EvaluationActivity;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::data_models::format_timestamp;
use crate::diesel_schema::evaluation_activity_logs;
use crate::error::PersistenceError;

backend_fn! {
/// Appends an activity entry and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_activity_log(
    conn: &mut _,
    activity: &EvaluationActivity,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(evaluation_activity_logs::table)
        .values((
            evaluation_activity_logs::period_id.eq(activity.period_id),
            evaluation_activity_logs::employee_id.eq(&activity.employee_id),
            evaluation_activity_logs::activity_type.eq(activity.activity_type.as_str()),
            evaluation_activity_logs::activity_action.eq(activity.activity_action.as_str()),
            evaluation_activity_logs::title.eq(&activity.title),
            evaluation_activity_logs::description.eq(&activity.description),
            evaluation_activity_logs::related_entity_type.eq(&activity.related_entity_type),
            evaluation_activity_logs::related_entity_id.eq(activity.related_entity_id),
            evaluation_activity_logs::performed_by.eq(&activity.performed_by),
            evaluation_activity_logs::performed_at.eq(format_timestamp(activity.performed_at)?),
        ))
        .execute(conn)?;

    let activity_id: i64 = conn.get_last_insert_rowid()?;
    debug!(
        activity_id,
        employee_id = %activity.employee_id,
        action = activity.activity_action.as_str(),
        "Recorded activity"
    );
    Ok(activity_id)
}
}
