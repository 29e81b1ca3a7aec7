//! Test: Steps that never ran leave no result behind

use crate::helpers::*;
use runstate::{ExecRunState, RunState, StepId};
use std::sync::Arc;

/// "check" is skipped by a conditional; downstream sees not-found
#[tokio::test]
async fn test_skipped_check_is_not_found() {
    let state: Arc<dyn RunState> = Arc::new(ExecRunState::new());

    run_sequence(vec![step(OnSuccessStep::new("deploy", "check"))], Arc::clone(&state)).await;

    let mut passed = true;
    assert!(!state.result(&StepId::from("check"), &mut passed));
    assert!(passed, "slot must stay untouched");
    assert!(!expect_bool_result(state.as_ref(), "deploy"));
}

/// on_success hook runs only when the watched step stored `true`
#[tokio::test]
async fn test_on_success_follows_result() {
    let state: Arc<dyn RunState> = Arc::new(ExecRunState::new());

    run_sequence(
        vec![
            step(PutStep::new("build", "image", handle("vol"))),
            step(OnSuccessStep::new("announce", "build")),
        ],
        Arc::clone(&state),
    )
    .await;

    assert!(expect_bool_result(state.as_ref(), "announce"));
}

/// A result stored under another type reads as absent
#[tokio::test]
async fn test_mismatched_result_type_is_not_found() {
    let state: Arc<dyn RunState> = Arc::new(ExecRunState::new());

    run_sequence(vec![step(GetStep::new("fetch", "missing"))], Arc::clone(&state)).await;

    let mut succeeded = false;
    assert!(!state.result(&StepId::from("fetch"), &mut succeeded));
    assert_eq!(found_handle(state.as_ref(), "fetch"), None);
}
