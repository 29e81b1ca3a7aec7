//! Test: Artifact flow between dependent and independent steps

use crate::helpers::*;
use runstate::{ExecRunState, RunState};
use std::sync::Arc;
use tokio::sync::oneshot;

/// build registers the image, push (depends on build) sees exactly that handle
#[tokio::test]
async fn test_dependent_step_sees_artifact() {
    let state: Arc<dyn RunState> = Arc::new(ExecRunState::new());
    let image = handle("image-h1");

    let build = spawn_step(
        step(PutStep::new("build", "image", image.clone())),
        Arc::clone(&state),
    );
    build.await.unwrap();

    spawn_step(step(GetStep::new("push", "image")), Arc::clone(&state))
        .await
        .unwrap();

    assert_eq!(found_handle(state.as_ref(), "push"), Some(image));
}

/// notify has no dependency on build; it only sees the image once a
/// synchronisation point orders it after build's registration
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_independent_step_after_sync_point() {
    let state: Arc<dyn RunState> = Arc::new(ExecRunState::new());
    let image = handle("image-h1");
    let (registered_tx, registered_rx) = oneshot::channel::<()>();

    let notify = {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            registered_rx.await.unwrap();
            GetStep::new("notify", "image").run(state).await;
        })
    };

    let build = {
        let state = Arc::clone(&state);
        let image = image.clone();
        tokio::spawn(async move {
            PutStep::new("build", "image", image).run(state).await;
            registered_tx.send(()).unwrap();
        })
    };

    build.await.unwrap();
    notify.await.unwrap();

    assert_eq!(found_handle(state.as_ref(), "notify"), Some(image));
    assert!(expect_bool_result(state.as_ref(), "build"));
}

/// Parallel producers of distinct artifacts are all visible once joined
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_producers() {
    let state: Arc<dyn RunState> = Arc::new(ExecRunState::new());

    let steps = (0..8)
        .map(|i| {
            step(PutStep::new(
                &format!("build-{}", i),
                &format!("artifact-{}", i),
                handle(&format!("vol-{}", i)),
            ))
        })
        .collect();

    run_parallel(steps, Arc::clone(&state)).await;

    let repository = state.artifacts();
    assert_eq!(repository.len(), 8);
    for i in 0..8 {
        let found = repository.lookup(&format!("artifact-{}", i)).unwrap();
        assert_eq!(found.id(), format!("vol-{}", i));
        assert!(expect_bool_result(state.as_ref(), &format!("build-{}", i)));
    }
}
