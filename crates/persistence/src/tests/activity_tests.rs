// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use evalcycle_audit::{ActivityAction, ActivitySink, record_best_effort};
use time::macros::datetime;

use super::helpers::create_test_activity;
use crate::Persistence;

#[test]
fn test_activity_log_is_ordered_by_time() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let later = create_test_activity("E1", ActivityAction::Submitted, datetime!(2026-03-02 08:00 UTC));
    let earlier = create_test_activity("E1", ActivityAction::Created, datetime!(2026-03-01 08:00 UTC))
        .with_description("first draft")
        .with_related_entity("self_evaluation", 11);
    persistence.insert_activity_log(&later).unwrap();
    persistence.insert_activity_log(&earlier).unwrap();
    persistence
        .insert_activity_log(&create_test_activity(
            "E2",
            ActivityAction::Created,
            datetime!(2026-03-01 07:00 UTC),
        ))
        .unwrap();

    let entries = persistence.list_activity_logs(1, "E1").unwrap();
    assert_eq!(entries, vec![earlier, later]);
}

#[test]
fn test_fractional_seconds_sort_by_instant() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    // "00.5Z" sorts before "00Z" as text.
    let whole = create_test_activity("E1", ActivityAction::Created, datetime!(2026-03-01 08:00:00 UTC));
    let half = create_test_activity("E1", ActivityAction::Updated, datetime!(2026-03-01 08:00:00.5 UTC));
    persistence.insert_activity_log(&whole).unwrap();
    persistence.insert_activity_log(&half).unwrap();

    let actions: Vec<ActivityAction> = persistence
        .list_activity_logs(1, "E1")
        .unwrap()
        .into_iter()
        .map(|e| e.activity_action)
        .collect();
    assert_eq!(actions, vec![ActivityAction::Created, ActivityAction::Updated]);
}

#[test]
fn test_same_instant_keeps_insertion_order() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let at = datetime!(2026-03-01 08:00 UTC);
    for action in [
        ActivityAction::Approved,
        ActivityAction::Approved,
        ActivityAction::Completed,
    ] {
        persistence
            .insert_activity_log(&create_test_activity("E1", action, at))
            .unwrap();
    }

    let actions: Vec<ActivityAction> = persistence
        .list_activity_logs(1, "E1")
        .unwrap()
        .into_iter()
        .map(|e| e.activity_action)
        .collect();
    assert_eq!(
        actions,
        vec![
            ActivityAction::Approved,
            ActivityAction::Approved,
            ActivityAction::Completed
        ]
    );
}

#[test]
fn test_persistence_is_an_activity_sink() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let entry = create_test_activity("E1", ActivityAction::Created, datetime!(2026-03-01 08:00 UTC));
    persistence.record(&entry).unwrap();
    let failures = record_best_effort(&mut persistence, std::slice::from_ref(&entry));

    assert_eq!(failures, 0);
    assert_eq!(persistence.list_activity_logs(1, "E1").unwrap().len(), 2);
}
