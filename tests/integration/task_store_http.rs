//! Integration tests for the task store's REST surface.
//!
//! Starts the server in-process and exercises it through the client's
//! [`HttpTaskApi`]: pagination and filtering scenarios, the status-code
//! contract, and the lifecycle invariants (toggle is its own inverse,
//! rename touches only the title, delete is terminal).

#![allow(clippy::unwrap_used, clippy::expect_used)]

use taskly::api::{ApiError, HttpTaskApi, Session, TaskApi};
use taskly_proto::page::{ListQuery, SortOrder};
use taskly_proto::task::{Task, TaskId};

/// Start the task server in-process and return its base URL.
async fn start_server() -> (String, tokio::task::JoinHandle<()>) {
    let (addr, handle) = taskly_server::routes::start_server("127.0.0.1:0")
        .await
        .expect("failed to start task server");
    (format!("http://{addr}"), handle)
}

/// An API client authenticated as the given owner.
fn api_as(base_url: &str, owner: &str) -> HttpTaskApi {
    HttpTaskApi::new(Session::new(base_url, owner))
}

async fn create_all(api: &HttpTaskApi, titles: &[&str]) -> Vec<Task> {
    let mut tasks = Vec::new();
    for title in titles {
        tasks.push(api.create(title).await.unwrap());
    }
    tasks
}

fn query(page: u32, limit: u32) -> ListQuery {
    ListQuery {
        page: Some(page),
        limit: Some(limit),
        ..Default::default()
    }
}

#[tokio::test]
async fn three_tasks_paginate_newest_first() {
    let (url, _handle) = start_server().await;
    let api = api_as(&url, "alice");
    create_all(&api, &["Buy milk", "Write report", "Call mom"]).await;

    let page = api.list(&query(1, 2)).await.unwrap();
    let titles: Vec<&str> = page.tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["Call mom", "Write report"]);
    assert_eq!(page.total, 3);
    assert_eq!(page.total_pages, 2);

    let second = api.list(&query(2, 2)).await.unwrap();
    assert_eq!(second.tasks.len(), 1);
    assert_eq!(second.tasks[0].title, "Buy milk");
}

#[tokio::test]
async fn oldest_sort_reverses_the_listing() {
    let (url, _handle) = start_server().await;
    let api = api_as(&url, "alice");
    create_all(&api, &["Buy milk", "Write report"]).await;

    let page = api
        .list(&ListQuery {
            sort: Some(SortOrder::Oldest),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.tasks[0].title, "Buy milk");
    assert_eq!(page.tasks[1].title, "Write report");
}

#[tokio::test]
async fn page_beyond_the_end_is_empty_not_an_error() {
    let (url, _handle) = start_server().await;
    let api = api_as(&url, "alice");
    create_all(&api, &["Buy milk"]).await;

    let page = api.list(&query(42, 5)).await.unwrap();
    assert!(page.tasks.is_empty());
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn completed_filter_returns_exactly_the_toggled_task() {
    let (url, _handle) = start_server().await;
    let api = api_as(&url, "alice");
    let tasks = create_all(&api, &["Buy milk", "Write report", "Call mom"]).await;

    api.toggle(tasks[0].id).await.unwrap();

    let done = api
        .list(&ListQuery {
            completed: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(done.total, 1);
    assert_eq!(done.tasks[0].title, "Buy milk");

    let open = api
        .list(&ListQuery {
            completed: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(open.total, 2);
}

#[tokio::test]
async fn toggle_twice_restores_completed_and_created_at() {
    let (url, _handle) = start_server().await;
    let api = api_as(&url, "alice");
    let created = create_all(&api, &["Buy milk"]).await.remove(0);

    let once = api.toggle(created.id).await.unwrap();
    assert!(once.completed);

    let twice = api.toggle(created.id).await.unwrap();
    assert!(!twice.completed);
    assert_eq!(twice.created_at, created.created_at);
    assert_eq!(twice, created);
}

#[tokio::test]
async fn rename_changes_only_the_title() {
    let (url, _handle) = start_server().await;
    let api = api_as(&url, "alice");
    let created = create_all(&api, &["Buy milk"]).await.remove(0);

    let renamed = api.rename(created.id, "Buy oat milk").await.unwrap();
    assert_eq!(renamed.title, "Buy oat milk");
    assert_eq!(renamed.id, created.id);
    assert_eq!(renamed.owner, created.owner);
    assert_eq!(renamed.created_at, created.created_at);
}

#[tokio::test]
async fn rename_below_minimum_is_a_validation_error() {
    let (url, _handle) = start_server().await;
    let api = api_as(&url, "alice");
    let created = create_all(&api, &["Buy milk"]).await.remove(0);

    let err = api.rename(created.id, " ab ").await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    // Nothing was mutated.
    let page = api.list(&ListQuery::default()).await.unwrap();
    assert_eq!(page.tasks[0].title, "Buy milk");
}

#[tokio::test]
async fn delete_is_terminal() {
    let (url, _handle) = start_server().await;
    let api = api_as(&url, "alice");
    let tasks = create_all(&api, &["Buy milk", "Write report"]).await;

    api.delete(tasks[0].id).await.unwrap();

    let page = api.list(&ListQuery::default()).await.unwrap();
    assert!(page.tasks.iter().all(|t| t.id != tasks[0].id));

    let err = api.delete(tasks[0].id).await.unwrap_err();
    assert_eq!(err, ApiError::NotFound);
}

#[tokio::test]
async fn unknown_id_operations_are_not_found() {
    let (url, _handle) = start_server().await;
    let api = api_as(&url, "alice");

    let ghost = TaskId::new();
    assert_eq!(api.toggle(ghost).await.unwrap_err(), ApiError::NotFound);
    assert_eq!(api.delete(ghost).await.unwrap_err(), ApiError::NotFound);
    assert_eq!(
        api.rename(ghost, "Ghost task").await.unwrap_err(),
        ApiError::NotFound
    );
}

#[tokio::test]
async fn missing_identity_header_is_rejected() {
    let (url, _handle) = start_server().await;

    let response = reqwest::Client::new()
        .get(format!("{url}/tasks"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn health_answers_without_identity() {
    let (url, _handle) = start_server().await;

    let response = reqwest::Client::new()
        .get(format!("{url}/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}
