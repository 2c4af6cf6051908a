// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic mutations.
//!
//! Inserts return the new row id. Updates are versioned: the caller passes
//! the record exactly as it was read (with `meta.version` untouched), the
//! `UPDATE` only matches that version, and the new version is returned.
//! A soft delete is an update that sets `is_deleted` and `deleted_at`.
//!
//! Physical deletes exist only for the cascading resets in `resets`.

pub mod activity;
pub mod evaluations;
pub mod final_evaluations;
pub mod peer;
pub mod registry;
pub mod resets;
pub mod steps;

use tracing::warn;

use crate::error::PersistenceError;

/// Chooses the error for a versioned update that matched no row.
pub(crate) fn stale_write_or_missing(
    entity: &'static str,
    id: i64,
    expected_version: i64,
    row_exists: bool,
) -> PersistenceError {
    if row_exists {
        warn!(entity, id, expected_version, "Rejected stale write");
        PersistenceError::StaleWrite {
            entity,
            id,
            expected_version,
        }
    } else {
        PersistenceError::NotFound(format!("{entity} {id}"))
    }
}
