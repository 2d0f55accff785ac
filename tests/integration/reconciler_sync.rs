//! End-to-end reconciler tests against a live in-process server.
//!
//! Covers the synchronization contract: add resets to the first page,
//! delete refreshes pagination counts, rename replaces in place, and the
//! optimistic toggle/delete paths roll back to the exact pre-mutation
//! snapshot when the server rejects the operation.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use taskly::api::{HttpTaskApi, Session, TaskApi};
use taskly::sync::{Reconciler, SyncError};

async fn start_server() -> (String, tokio::task::JoinHandle<()>) {
    let (addr, handle) = taskly_server::routes::start_server("127.0.0.1:0")
        .await
        .expect("failed to start task server");
    (format!("http://{addr}"), handle)
}

fn api_as(base_url: &str, owner: &str) -> HttpTaskApi {
    HttpTaskApi::new(Session::new(base_url, owner))
}

/// A reconciler for `owner` with the server pre-seeded with `titles`.
async fn seeded_reconciler(
    base_url: &str,
    owner: &str,
    titles: &[&str],
) -> Reconciler<HttpTaskApi> {
    let api = api_as(base_url, owner);
    for title in titles {
        api.create(title).await.unwrap();
    }
    let mut reconciler = Reconciler::new(api_as(base_url, owner));
    reconciler.refresh().await.unwrap();
    reconciler
}

#[tokio::test]
async fn refresh_renders_the_first_page_newest_first() {
    let (url, _handle) = start_server().await;
    let reconciler =
        seeded_reconciler(&url, "alice", &["Buy milk", "Write report", "Call mom"]).await;

    let titles: Vec<&str> = reconciler.tasks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["Call mom", "Write report", "Buy milk"]);
    assert_eq!(reconciler.total(), 3);
}

#[tokio::test]
async fn add_lands_on_page_one_with_the_new_task_visible() {
    let (url, _handle) = start_server().await;
    let mut reconciler = seeded_reconciler(
        &url,
        "alice",
        &["one task", "two task", "three task", "four task", "five task", "six task"],
    )
    .await;

    reconciler.goto_page(2).await.unwrap();
    assert_eq!(reconciler.page(), 2);

    reconciler.add("Call mom").await.unwrap();
    assert_eq!(reconciler.page(), 1);
    assert_eq!(reconciler.tasks()[0].title, "Call mom");
    assert_eq!(reconciler.total(), 7);
}

#[tokio::test]
async fn toggle_confirms_against_the_server() {
    let (url, _handle) = start_server().await;
    let mut reconciler = seeded_reconciler(&url, "alice", &["Buy milk"]).await;
    let id = reconciler.tasks()[0].id;

    reconciler.toggle(id).await.unwrap();
    assert!(reconciler.tasks()[0].completed);

    // The server agrees after a full refresh.
    reconciler.refresh().await.unwrap();
    assert!(reconciler.tasks()[0].completed);
}

#[tokio::test]
async fn completed_filter_shows_exactly_the_toggled_task() {
    let (url, _handle) = start_server().await;
    let mut reconciler =
        seeded_reconciler(&url, "alice", &["Buy milk", "Write report", "Call mom"]).await;
    let buy_milk = reconciler
        .tasks()
        .iter()
        .find(|t| t.title == "Buy milk")
        .unwrap()
        .id;

    reconciler.toggle(buy_milk).await.unwrap();
    reconciler.set_filter(Some(true)).await.unwrap();

    assert_eq!(reconciler.tasks().len(), 1);
    assert_eq!(reconciler.tasks()[0].title, "Buy milk");
}

#[tokio::test]
async fn delete_refreshes_pagination_counts() {
    let (url, _handle) = start_server().await;
    let mut reconciler = seeded_reconciler(
        &url,
        "alice",
        &["one task", "two task", "three task", "four task", "five task", "six task"],
    )
    .await;
    assert_eq!(reconciler.total_pages(), 2);

    let id = reconciler.tasks()[0].id;
    reconciler.delete(id).await.unwrap();

    assert_eq!(reconciler.total(), 5);
    assert_eq!(reconciler.total_pages(), 1);
    assert_eq!(reconciler.tasks().len(), 5);
}

#[tokio::test]
async fn rename_replaces_the_task_in_place() {
    let (url, _handle) = start_server().await;
    let mut reconciler =
        seeded_reconciler(&url, "alice", &["Buy milk", "Write report"]).await;
    let id = reconciler.tasks()[1].id;

    reconciler.rename(id, "Buy oat milk").await.unwrap();

    // Same position, same id, new title.
    assert_eq!(reconciler.tasks()[1].id, id);
    assert_eq!(reconciler.tasks()[1].title, "Buy oat milk");
    assert_eq!(reconciler.tasks().len(), 2);
}

#[tokio::test]
async fn failed_toggle_rolls_back_to_the_exact_prior_list() {
    let (url, _handle) = start_server().await;
    let mut reconciler = seeded_reconciler(&url, "alice", &["Buy milk", "Write report"]).await;
    let id = reconciler.tasks()[0].id;

    // The task disappears server-side behind the reconciler's back.
    api_as(&url, "alice").delete(id).await.unwrap();

    let before = reconciler.tasks().to_vec();
    let err = reconciler.toggle(id).await.unwrap_err();
    assert!(matches!(err, SyncError::Api(_)));

    // Value-for-value identical to the pre-optimistic snapshot.
    assert_eq!(reconciler.tasks(), before.as_slice());
}

#[tokio::test]
async fn failed_delete_rolls_back_to_the_exact_prior_list() {
    let (url, _handle) = start_server().await;
    let mut reconciler = seeded_reconciler(&url, "alice", &["Buy milk", "Write report"]).await;
    let id = reconciler.tasks()[1].id;

    api_as(&url, "alice").delete(id).await.unwrap();

    let before = reconciler.tasks().to_vec();
    let err = reconciler.delete(id).await.unwrap_err();
    assert!(matches!(err, SyncError::Api(_)));
    assert_eq!(reconciler.tasks(), before.as_slice());
}

#[tokio::test]
async fn edit_confirm_round_trips_through_the_server() {
    let (url, _handle) = start_server().await;
    let mut reconciler = seeded_reconciler(&url, "alice", &["Buy milk"]).await;
    let id = reconciler.tasks()[0].id;

    reconciler.begin_edit(id).unwrap();
    reconciler.set_draft("Buy oat milk");
    reconciler.confirm_edit().await.unwrap();

    reconciler.refresh().await.unwrap();
    assert_eq!(reconciler.tasks()[0].title, "Buy oat milk");
}

#[tokio::test]
async fn two_reconcilers_for_different_owners_stay_isolated() {
    let (url, _handle) = start_server().await;
    let alice = seeded_reconciler(&url, "alice", &["Alice task"]).await;
    let bob = seeded_reconciler(&url, "bob", &["Bob task"]).await;

    assert_eq!(alice.tasks().len(), 1);
    assert_eq!(alice.tasks()[0].title, "Alice task");
    assert_eq!(bob.tasks().len(), 1);
    assert_eq!(bob.tasks()[0].title, "Bob task");
}
