//! Reorder request validation against a project's current task set.

use std::collections::HashSet;

use taskhive_backend::error::AppError;
use taskhive_backend::services::reorder::validate_reorder;

fn ids(values: &[i64]) -> HashSet<i64> {
    values.iter().copied().collect()
}

#[test]
fn permutation_of_the_full_task_set_is_accepted() {
    // [T1, T2, T3] reordered to [T3, T1, T2] yields orders 0, 1, 2 by index.
    assert!(validate_reorder(&ids(&[1, 2, 3]), &[3, 1, 2]).is_ok());
}

#[test]
fn id_from_another_project_fails_before_any_write() {
    let err = validate_reorder(&ids(&[1, 2, 3]), &[3, 1, 42]).unwrap_err();
    match err {
        AppError::Validation(msg) => assert!(msg.contains("42")),
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[test]
fn repeated_id_fails_the_count_check() {
    assert!(validate_reorder(&ids(&[1, 2, 3]), &[1, 1, 2]).is_err());
}

#[test]
fn partial_list_is_accepted_as_caller_responsibility() {
    assert!(validate_reorder(&ids(&[1, 2, 3, 4]), &[2, 1]).is_ok());
}
