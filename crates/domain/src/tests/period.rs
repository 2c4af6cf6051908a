// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::create_test_period;
use crate::{DomainError, PeriodCatalog};
use time::macros::datetime;

#[test]
fn test_downward_deadline_falls_back_to_end_date() {
    let mut period = create_test_period();
    assert_eq!(
        period.downward_deadline(),
        datetime!(2026-06-15 23:59 UTC)
    );

    period.downward_evaluation_deadline = None;
    assert_eq!(period.downward_deadline(), period.end_date);
}

#[test]
fn test_downward_changes_rejected_after_deadline() {
    let period = create_test_period();

    assert!(
        period
            .ensure_downward_open(datetime!(2026-06-15 23:59 UTC))
            .is_ok()
    );
    let result = period.ensure_downward_open(datetime!(2026-06-16 00:00 UTC));
    assert!(matches!(
        result,
        Err(DomainError::PeriodExpired { period_id: 1, .. })
    ));
}

#[test]
fn test_self_and_peer_deadlines_only_apply_when_set() {
    let mut period = create_test_period();
    let late = datetime!(2026-06-01 00:00 UTC);

    assert!(matches!(
        period.ensure_self_evaluation_open(late),
        Err(DomainError::PeriodExpired { period_id: 1, .. })
    ));
    assert!(
        period
            .ensure_self_evaluation_open(datetime!(2026-05-31 23:59 UTC))
            .is_ok()
    );
    assert!(period.ensure_peer_evaluation_open(late).is_ok());

    period.self_evaluation_deadline = None;
    period.peer_evaluation_deadline = Some(datetime!(2026-05-15 00:00 UTC));
    assert!(period.ensure_self_evaluation_open(late).is_ok());
    assert!(period.ensure_peer_evaluation_open(late).is_err());
}

#[test]
fn test_period_validation() {
    let mut period = create_test_period();
    period.end_date = datetime!(2025-12-31 00:00 UTC);
    assert!(matches!(
        period.validate(),
        Err(DomainError::InvalidPeriodConfig { .. })
    ));

    let mut period = create_test_period();
    period.peer_evaluation_deadline = Some(datetime!(2026-07-10 00:00 UTC));
    assert!(period.validate().is_err());
}

#[test]
fn test_catalog_lookup_and_duplicates() {
    let catalog = PeriodCatalog::from_periods(vec![create_test_period()]).unwrap();
    assert_eq!(catalog.get(1).unwrap().name, "2026 H1");
    assert_eq!(catalog.get(2), Err(DomainError::PeriodNotFound(2)));

    let duplicate = PeriodCatalog::from_periods(vec![create_test_period(), create_test_period()]);
    assert!(duplicate.is_err());
}

#[test]
fn test_period_config_from_json() {
    let json = r#"{
        "periodId": 4,
        "name": "2026 H2",
        "startDate": "2026-07-01T00:00:00Z",
        "endDate": "2026-12-31T23:59:59Z",
        "gradeRanges": [{"grade": "A", "minRange": 0, "maxRange": 120}]
    }"#;
    let period: crate::PeriodConfig = serde_json::from_str(json).unwrap();
    assert!((period.max_self_evaluation_rate - 120.0).abs() < f64::EPSILON);
    assert_eq!(period.grade_ranges.grade_of(42.0).unwrap(), "A");
    assert!(period.self_evaluation_deadline.is_none());
}
