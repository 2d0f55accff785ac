//! Cross-owner isolation tests.
//!
//! For owners A != B, operations authenticated as A must never observe or
//! mutate B's tasks -- even when addressed with B's task id, the answer is
//! NotFound, indistinguishable from a task that never existed.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use taskly::api::{ApiError, HttpTaskApi, Session, TaskApi};
use taskly_proto::page::ListQuery;
use taskly_proto::task::TaskId;

async fn start_server() -> (String, tokio::task::JoinHandle<()>) {
    let (addr, handle) = taskly_server::routes::start_server("127.0.0.1:0")
        .await
        .expect("failed to start task server");
    (format!("http://{addr}"), handle)
}

fn api_as(base_url: &str, owner: &str) -> HttpTaskApi {
    HttpTaskApi::new(Session::new(base_url, owner))
}

#[tokio::test]
async fn listings_never_cross_owners() {
    let (url, _handle) = start_server().await;
    let alice = api_as(&url, "alice");
    let bob = api_as(&url, "bob");

    alice.create("Alice task").await.unwrap();
    bob.create("Bob task").await.unwrap();

    let alice_page = alice.list(&ListQuery::default()).await.unwrap();
    assert_eq!(alice_page.total, 1);
    assert_eq!(alice_page.tasks[0].title, "Alice task");

    let bob_page = bob.list(&ListQuery::default()).await.unwrap();
    assert_eq!(bob_page.total, 1);
    assert_eq!(bob_page.tasks[0].title, "Bob task");
}

#[tokio::test]
async fn foreign_task_id_yields_not_found_for_every_operation() {
    let (url, _handle) = start_server().await;
    let alice = api_as(&url, "alice");
    let mallory = api_as(&url, "mallory");

    let task = alice.create("Alice's secret errand").await.unwrap();

    assert_eq!(mallory.toggle(task.id).await.unwrap_err(), ApiError::NotFound);
    assert_eq!(
        mallory.rename(task.id, "Hijacked").await.unwrap_err(),
        ApiError::NotFound
    );
    assert_eq!(mallory.delete(task.id).await.unwrap_err(), ApiError::NotFound);

    // Alice's task is untouched by any of the attempts.
    let page = alice.list(&ListQuery::default()).await.unwrap();
    assert_eq!(page.tasks[0].title, "Alice's secret errand");
    assert!(!page.tasks[0].completed);
}

#[tokio::test]
async fn foreign_and_nonexistent_ids_are_indistinguishable() {
    let (url, _handle) = start_server().await;
    let alice = api_as(&url, "alice");
    let mallory = api_as(&url, "mallory");

    let real = alice.create("Alice task").await.unwrap();
    let ghost = TaskId::new();

    // Same error for a foreign id and an id that never existed.
    let foreign = mallory.toggle(real.id).await.unwrap_err();
    let missing = mallory.toggle(ghost).await.unwrap_err();
    assert_eq!(foreign, missing);
}

#[tokio::test]
async fn deleting_own_task_leaves_same_titled_foreign_task_alone() {
    let (url, _handle) = start_server().await;
    let alice = api_as(&url, "alice");
    let bob = api_as(&url, "bob");

    let alice_task = alice.create("Water the plants").await.unwrap();
    bob.create("Water the plants").await.unwrap();

    alice.delete(alice_task.id).await.unwrap();

    assert_eq!(alice.list(&ListQuery::default()).await.unwrap().total, 0);
    assert_eq!(bob.list(&ListQuery::default()).await.unwrap().total, 1);
}
