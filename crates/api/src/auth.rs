// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor roles and authorization checks.
//!
//! Authentication happens upstream; callers hand in an already
//! authenticated actor.

use evalcycle_audit::Actor;

use crate::error::ApiError;

/// Actor roles for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Configures the cycle, runs resets and confirms final evaluations.
    Admin,
    /// Reviews other employees' self evaluations and approves steps.
    Evaluator,
    /// Works on their own records only.
    Employee,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Evaluator => "evaluator",
            Self::Employee => "employee",
        }
    }
}

/// An authenticated actor with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    #[must_use]
    pub const fn new(id: String, role: Role) -> Self {
        Self { id, role }
    }

    /// Converts this authenticated actor into the actor recorded on
    /// records and activity entries.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.id.clone(), String::from(self.role.as_str()))
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Fails unless the actor is an administrator.
pub(crate) fn require_admin(actor: &AuthenticatedActor, action: &str) -> Result<(), ApiError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Unauthorized {
            action: action.to_string(),
            required_role: String::from("Admin"),
        })
    }
}

/// Fails unless the actor is an evaluator or administrator.
pub(crate) fn require_reviewer(actor: &AuthenticatedActor, action: &str) -> Result<(), ApiError> {
    if actor.role == Role::Employee {
        Err(ApiError::Unauthorized {
            action: action.to_string(),
            required_role: String::from("Evaluator"),
        })
    } else {
        Ok(())
    }
}

/// Employees may only act on their own records.
pub(crate) fn require_owner_or_reviewer(
    actor: &AuthenticatedActor,
    owner_id: &str,
    action: &str,
) -> Result<(), ApiError> {
    if actor.role != Role::Employee || actor.id == owner_id {
        Ok(())
    } else {
        Err(ApiError::PermissionDenied {
            message: format!(
                "Actor '{}' cannot {action} on behalf of employee '{owner_id}'",
                actor.id
            ),
        })
    }
}
