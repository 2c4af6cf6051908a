// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    ActivityAction, ActivityLogError, ActivitySink, ActivityType, Actor, EvaluationActivity,
    MemoryActivitySink, record_best_effort,
};
use time::macros::datetime;

fn create_test_actor() -> Actor {
    Actor::new(String::from("admin-1"), String::from("admin"))
}

fn create_test_activity(action: ActivityAction) -> EvaluationActivity {
    EvaluationActivity::new(
        1,
        "emp-1",
        ActivityType::StepApproval,
        action,
        String::from("Step approved"),
        &create_test_actor(),
        datetime!(2026-04-01 12:00 UTC),
    )
}

struct FailingSink;

impl ActivitySink for FailingSink {
    fn record(&mut self, _activity: &EvaluationActivity) -> Result<(), ActivityLogError> {
        Err(ActivityLogError::Unavailable)
    }
}

#[test]
fn test_actor_creation_requires_all_fields() {
    let actor = create_test_actor();
    assert_eq!(actor.id, "admin-1");
    assert_eq!(actor.actor_type, "admin");
}

#[test]
fn test_activity_builder_sets_optional_fields() {
    let activity = create_test_activity(ActivityAction::Approved)
        .with_description("criteria approved")
        .with_related_entity("step_approval", 42);

    assert_eq!(activity.performed_by, "admin-1");
    assert_eq!(activity.description.as_deref(), Some("criteria approved"));
    assert_eq!(activity.related_entity_type.as_deref(), Some("step_approval"));
    assert_eq!(activity.related_entity_id, Some(42));
}

#[test]
fn test_action_and_type_strings_round_trip() {
    for action in [
        ActivityAction::Created,
        ActivityAction::RevisionRequested,
        ActivityAction::ConfirmationCancelled,
    ] {
        assert_eq!(action.as_str().parse::<ActivityAction>().unwrap(), action);
    }
    assert_eq!(
        "downward_evaluation".parse::<ActivityType>().unwrap(),
        ActivityType::DownwardEvaluation
    );
    assert!("unknown".parse::<ActivityAction>().is_err());
}

#[test]
fn test_activity_serializes_snake_case() {
    let json = serde_json::to_value(create_test_activity(ActivityAction::RevisionRequested)).unwrap();
    assert_eq!(json["activity_action"], "revision_requested");
    assert_eq!(json["activity_type"], "step_approval");
    assert_eq!(json["performed_at"], "2026-04-01T12:00:00Z");
}

#[test]
fn test_best_effort_recording_counts_failures() {
    let activities = vec![
        create_test_activity(ActivityAction::Approved),
        create_test_activity(ActivityAction::RevisionRequested),
    ];

    let mut failing = FailingSink;
    assert_eq!(record_best_effort(&mut failing, &activities), 2);

    let mut memory = MemoryActivitySink::new();
    assert_eq!(record_best_effort(&mut memory, &activities), 0);
    assert_eq!(memory.entries().len(), 2);
}

#[test]
fn test_admin_actor_detection() {
    assert!(create_test_actor().is_admin());
    assert!(!Actor::new(String::from("emp-1"), String::from("employee")).is_admin());
}
