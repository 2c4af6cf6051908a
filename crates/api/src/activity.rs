// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use evalcycle_audit::EvaluationActivity;

use crate::EvaluationService;
use crate::auth::{AuthenticatedActor, require_owner_or_reviewer};
use crate::error::ApiError;

impl EvaluationService {
    /// Lists the activity history of one employee in one period, oldest
    /// first.
    ///
    /// Employees may only read their own history.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` for another employee's history.
    pub fn list_activity_logs(
        &mut self,
        actor: &AuthenticatedActor,
        period_id: i64,
        employee_id: &str,
    ) -> Result<Vec<EvaluationActivity>, ApiError> {
        require_owner_or_reviewer(actor, employee_id, "list_activity_logs")?;
        Ok(self.persistence.list_activity_logs(period_id, employee_id)?)
    }
}
