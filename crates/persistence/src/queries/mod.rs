// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic read queries.
//!
//! Every function is generated twice by `backend_fn!`; the `Persistence`
//! adapter picks the variant matching its connection.
//!
//! - `registry`: evaluation lines and evaluator mappings
//! - `evaluations`: self and downward evaluations
//! - `peer`: question catalog and peer evaluations
//! - `steps`: step approvals and revision requests
//! - `final_evaluations`: final grades
//! - `activity`: the activity log

pub mod activity;
pub mod evaluations;
pub mod final_evaluations;
pub mod peer;
pub mod registry;
pub mod steps;
