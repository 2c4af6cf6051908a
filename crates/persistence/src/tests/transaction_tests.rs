// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::create_test_self_evaluation;
use crate::{Persistence, PersistenceError};

#[test]
fn test_foreign_keys_are_enforced() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_in_memory_databases_are_isolated() {
    let mut first = Persistence::new_in_memory().unwrap();
    let mut second = Persistence::new_in_memory().unwrap();

    first
        .insert_self_evaluation(&create_test_self_evaluation("E1", 11))
        .unwrap();

    assert!(second.list_self_evaluations("E1", 1, None).unwrap().is_empty());
}

#[test]
fn test_commit_keeps_writes() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let id = persistence
        .transaction(|p| p.insert_self_evaluation(&create_test_self_evaluation("E1", 11)))
        .unwrap();

    assert!(persistence.get_self_evaluation(id).unwrap().is_some());
}

#[test]
fn test_error_rolls_back_every_write() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let result: Result<(), PersistenceError> = persistence.transaction(|p| {
        p.insert_self_evaluation(&create_test_self_evaluation("E1", 11))?;
        p.insert_self_evaluation(&create_test_self_evaluation("E1", 12))?;
        Err(PersistenceError::Other(String::from("abort")))
    });

    assert_eq!(result, Err(PersistenceError::Other(String::from("abort"))));
    assert!(persistence.list_self_evaluations("E1", 1, None).unwrap().is_empty());
}

#[test]
fn test_failed_savepoint_keeps_outer_writes() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let outcomes = persistence
        .transaction(|p| {
            let mut outcomes = Vec::new();
            for work_item_id in [11, 11, 12] {
                let outcome = p.transaction(|inner| {
                    inner.insert_self_evaluation(&create_test_self_evaluation("E1", work_item_id))
                });
                outcomes.push(outcome.is_ok());
            }
            Ok::<_, PersistenceError>(outcomes)
        })
        .unwrap();

    assert_eq!(outcomes, vec![true, false, true]);
    let stored: Vec<i64> = persistence
        .list_self_evaluations("E1", 1, None)
        .unwrap()
        .into_iter()
        .map(|s| s.work_item_id)
        .collect();
    assert_eq!(stored, vec![11, 12]);
}
