//! Test: Fan-out steps working in local artifact scopes

use crate::helpers::*;
use runstate::{ExecRunState, RunState};
use std::sync::Arc;

/// Each iteration writes the same artifact name in its own scope
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_across_iterations_are_isolated() {
    let run = Arc::new(ExecRunState::new());
    run.artifacts().register("source", handle("repo"));

    let mut scopes = Vec::new();
    let mut tasks = Vec::new();
    for i in 0..4 {
        let scope = run.new_local_scope();
        let scoped: Arc<dyn RunState> = scope.clone();
        tasks.push(spawn_step(
            step(PutStep::new(
                &format!("build-{}", i),
                "image",
                handle(&format!("image-{}", i)),
            )),
            scoped,
        ));
        scopes.push(scope);
    }

    for task in tasks {
        task.await.unwrap();
    }

    for (i, scope) in scopes.iter().enumerate() {
        let image = scope.artifacts().lookup("image").unwrap();
        assert_eq!(image.id(), format!("image-{}", i));
        assert_eq!(scope.artifacts().lookup("source").unwrap().id(), "repo");
    }

    assert!(run.artifacts().lookup("image").is_none());
    assert_eq!(run.artifacts().names(), vec!["source"]);

    // Results are shared across scopes
    for i in 0..4 {
        assert!(expect_bool_result(&*run, &format!("build-{}", i)));
    }
}
