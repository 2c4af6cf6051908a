// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use evalcycle_domain::DomainError;
use evalcycle_persistence::PersistenceError;

use crate::tests::helpers::{
    create_self_evaluation, create_test_employee, create_test_service, self_evaluation_request,
};
use crate::{ApiError, ErrorCode, translate_domain_error, translate_persistence_error};

#[test]
fn test_error_codes_render_as_stable_strings() {
    assert_eq!(ErrorCode::StaleWrite.as_str(), "STALE_WRITE");
    assert_eq!(ErrorCode::AlreadyConfirmed.to_string(), "ALREADY_CONFIRMED");
    assert_eq!(ErrorCode::PeriodExpired.to_string(), "PERIOD_EXPIRED");
}

#[test]
fn test_persistence_conflicts_keep_their_kind() {
    let stale = translate_persistence_error(PersistenceError::StaleWrite {
        entity: "self evaluation",
        id: 1,
        expected_version: 2,
    });
    assert_eq!(stale.code(), ErrorCode::StaleWrite);

    let duplicate = translate_persistence_error(PersistenceError::Duplicate(String::from("row")));
    assert_eq!(duplicate.code(), ErrorCode::Duplicate);

    let missing = translate_persistence_error(PersistenceError::NotFound(String::from("row")));
    assert_eq!(missing.code(), ErrorCode::NotFound);
}

#[test]
fn test_storage_failures_are_internal() {
    let err = translate_persistence_error(PersistenceError::QueryFailed(String::from("locked")));

    assert_eq!(err.code(), ErrorCode::Internal);
    assert!(matches!(err, ApiError::Internal { .. }));
}

#[test]
fn test_domain_errors_map_to_codes() {
    let mismatch = translate_domain_error(DomainError::EvaluatorMismatch {
        expected: String::from("mgr-1"),
        actual: String::from("mgr-2"),
    });
    assert_eq!(mismatch.code(), ErrorCode::PermissionDenied);

    let confirmed = translate_domain_error(DomainError::ConfirmedEvaluationModification { id: 7 });
    assert_eq!(confirmed.code(), ErrorCode::AlreadyConfirmed);

    let period = translate_domain_error(DomainError::PeriodNotFound(42));
    assert_eq!(period.code(), ErrorCode::NotFound);
    assert!(period.to_string().contains("42"));
}

#[test]
fn test_unknown_period_is_not_found() {
    let mut service = create_test_service();
    let mut request = self_evaluation_request("emp-1", 10, 1, Some(50.0));
    request.period_id = 99;

    let err = service
        .upsert_self_evaluation(&create_test_employee("emp-1"), &request)
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[test]
fn test_concurrent_update_is_a_stale_write() {
    let mut service = create_test_service();
    let record = create_self_evaluation(&mut service, "emp-1", 10);

    let mut first = record.clone();
    first.content = Some(String::from("First writer"));
    service.persistence().update_self_evaluation(&first).unwrap();

    let mut second = record;
    second.content = Some(String::from("Second writer"));
    let err = ApiError::from(
        service
            .persistence()
            .update_self_evaluation(&second)
            .unwrap_err(),
    );

    assert_eq!(err.code(), ErrorCode::StaleWrite);
}
