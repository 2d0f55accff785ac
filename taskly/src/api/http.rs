//! HTTP implementation of the [`TaskApi`] seam over reqwest.
//!
//! Maps the fixed status/message contract of the REST surface onto
//! [`ApiError`]: 400 becomes `Validation` (with the server's message),
//! 404 becomes `NotFound`, everything else `Unexpected`. Response bodies
//! are the shared wire types from `taskly-proto`.

use serde::de::DeserializeOwned;

use taskly_proto::page::{ListQuery, TaskPage};
use taskly_proto::task::{Task, TaskId};
use taskly_proto::wire::{CreateTask, Deleted, ErrorBody, IDENTITY_HEADER, RenameTask};

use super::{ApiError, TaskApi};

/// Explicit session context for every request: where the service lives and
/// who the caller is.
///
/// The token is whatever the authentication layer in front of the server
/// accepts; it is forwarded verbatim in the identity header.
#[derive(Debug, Clone)]
pub struct Session {
    /// Base URL of the task service (e.g., `http://127.0.0.1:8080`).
    pub base_url: String,
    /// Identity token presented on every request.
    pub token: String,
}

impl Session {
    /// Creates a session context.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }
}

/// [`TaskApi`] implementation speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: reqwest::Client,
    session: Session,
}

impl HttpTaskApi {
    /// Creates an API client bound to a session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            client: reqwest::Client::new(),
            session,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.session.base_url)
    }

    /// Sends a prepared request and decodes the success body, translating
    /// failures into the [`ApiError`] taxonomy.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request
            .header(IDENTITY_HEADER, self.session.token.as_str())
            .send()
            .await
            .map_err(|e| ApiError::Unexpected(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ApiError::Unexpected(format!("malformed response: {e}")));
        }

        let message = error_message(response).await;
        Err(match status {
            reqwest::StatusCode::BAD_REQUEST => ApiError::Validation(message),
            reqwest::StatusCode::NOT_FOUND => ApiError::NotFound,
            _ => ApiError::Unexpected(message),
        })
    }
}

/// Extracts the `{message}` body of a failing response, falling back to the
/// status line when the body is not the expected shape.
async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status.to_string(),
    }
}

impl TaskApi for HttpTaskApi {
    async fn list(&self, query: &ListQuery) -> Result<TaskPage, ApiError> {
        self.execute(self.client.get(self.url("/tasks")).query(query))
            .await
    }

    async fn create(&self, title: &str) -> Result<Task, ApiError> {
        self.execute(self.client.post(self.url("/tasks")).json(&CreateTask {
            title: title.to_string(),
        }))
        .await
    }

    async fn toggle(&self, id: TaskId) -> Result<Task, ApiError> {
        self.execute(self.client.patch(self.url(&format!("/tasks/{id}"))))
            .await
    }

    async fn rename(&self, id: TaskId, title: &str) -> Result<Task, ApiError> {
        self.execute(
            self.client
                .patch(self.url(&format!("/tasks/{id}/title")))
                .json(&RenameTask {
                    title: title.to_string(),
                }),
        )
        .await
    }

    async fn delete(&self, id: TaskId) -> Result<(), ApiError> {
        let _: Deleted = self
            .execute(self.client.delete(self.url(&format!("/tasks/{id}"))))
            .await?;
        Ok(())
    }
}
