// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use evalcycle_domain::{
    ApprovalStep, RecipientType, RevisionRequest, RevisionRequestRecipient, StepStatus,
};

use super::helpers::{NOW, create_test_step, test_meta};
use crate::{Persistence, PersistenceError};

fn create_request(persistence: &mut Persistence, step: ApprovalStep) -> RevisionRequest {
    let mut request = RevisionRequest {
        id: 0,
        period_id: 1,
        employee_id: String::from("E1"),
        step,
        comment: String::from("Please add measurable outcomes"),
        requested_by: String::from("admin-123"),
        requested_at: NOW,
        meta: test_meta(),
    };
    request.id = persistence.insert_revision_request(&request).unwrap();
    request
}

fn create_recipient(
    persistence: &mut Persistence,
    revision_request_id: i64,
    recipient_id: &str,
    recipient_type: RecipientType,
) -> RevisionRequestRecipient {
    let mut recipient = RevisionRequestRecipient {
        id: 0,
        revision_request_id,
        recipient_id: recipient_id.to_string(),
        recipient_type,
        is_read: false,
        read_at: None,
        is_completed: false,
        completed_at: None,
        response_comment: None,
        meta: test_meta(),
    };
    recipient.id = persistence.insert_revision_recipient(&recipient).unwrap();
    recipient
}

#[test]
fn test_step_approvals_are_listed_in_step_order() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    for step in [
        ApprovalStep::Secondary,
        ApprovalStep::Criteria,
        ApprovalStep::Primary,
    ] {
        persistence
            .insert_step_approval(&create_test_step(step, StepStatus::Pending))
            .unwrap();
    }

    let steps: Vec<ApprovalStep> = persistence
        .list_step_approvals(1, "E1")
        .unwrap()
        .into_iter()
        .map(|s| s.step)
        .collect();
    assert_eq!(
        steps,
        vec![
            ApprovalStep::Criteria,
            ApprovalStep::Primary,
            ApprovalStep::Secondary
        ]
    );
}

#[test]
fn test_step_approval_status_change_is_versioned() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let mut approval = create_test_step(ApprovalStep::SelfEvaluation, StepStatus::Pending);
    approval.id = persistence.insert_step_approval(&approval).unwrap();
    let stale_copy = approval.clone();

    approval.status = StepStatus::Approved;
    approval.approved_by = Some(String::from("admin-123"));
    approval.approved_at = Some(NOW);
    approval.meta.touch("admin-123", NOW);
    persistence.update_step_approval(&approval).unwrap();

    let stored = persistence
        .find_step_approval(1, "E1", ApprovalStep::SelfEvaluation)
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, StepStatus::Approved);
    assert_eq!(stored.approved_at, Some(NOW));

    let result = persistence.update_step_approval(&stale_copy);
    assert!(matches!(result, Err(PersistenceError::StaleWrite { .. })));
    assert!(
        persistence
            .find_step_approval(1, "E1", ApprovalStep::Primary)
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_duplicate_step_approval_is_rejected() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let approval = create_test_step(ApprovalStep::Criteria, StepStatus::Pending);
    persistence.insert_step_approval(&approval).unwrap();
    let result = persistence.insert_step_approval(&approval);
    assert!(matches!(result, Err(PersistenceError::Duplicate(_))));
}

#[test]
fn test_latest_revision_request_and_recipients() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let older = create_request(&mut persistence, ApprovalStep::Criteria);
    let newer = create_request(&mut persistence, ApprovalStep::Criteria);
    create_recipient(&mut persistence, newer.id, "E1", RecipientType::Evaluatee);
    create_recipient(&mut persistence, newer.id, "M1", RecipientType::PrimaryEvaluator);

    let latest = persistence
        .find_latest_revision_request(1, "E1", ApprovalStep::Criteria)
        .unwrap()
        .unwrap();
    assert_eq!(latest.id, newer.id);
    assert_ne!(latest.id, older.id);

    let recipients = persistence.list_revision_recipients(newer.id).unwrap();
    assert_eq!(recipients.len(), 2);
    assert_eq!(recipients[1].recipient_type, RecipientType::PrimaryEvaluator);
    assert!(persistence.list_revision_recipients(older.id).unwrap().is_empty());
}

#[test]
fn test_recipient_inbox_and_read_marker() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let request = create_request(&mut persistence, ApprovalStep::Primary);
    let mut recipient =
        create_recipient(&mut persistence, request.id, "M1", RecipientType::PrimaryEvaluator);

    recipient.is_read = true;
    recipient.read_at = Some(NOW);
    recipient.meta.touch("M1", NOW);
    persistence.update_revision_recipient(&recipient).unwrap();

    let inbox = persistence.list_revision_requests_for_recipient("M1").unwrap();
    assert_eq!(inbox.len(), 1);
    let (stored_request, stored_recipient) = &inbox[0];
    assert_eq!(stored_request, &request);
    assert!(stored_recipient.is_read);
    assert_eq!(stored_recipient.read_at, Some(NOW));
    assert!(
        persistence
            .list_revision_requests_for_recipient("E1")
            .unwrap()
            .is_empty()
    );
}
