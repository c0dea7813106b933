//! REST task store client.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::HttpStoreConfig;
use crate::board::{
    domain::{NewTask, TaskId, TaskPatch, TaskRecord},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};

/// Non-success response the store contract has no meaning for.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("task store answered {status}: {body}")]
pub struct UnexpectedStatus {
    /// HTTP status code.
    pub status: u16,
    /// Response body, as text.
    pub body: String,
}

#[derive(Debug, Deserialize)]
struct DeletedTask {
    id: TaskId,
}

/// Task store backed by a REST endpoint.
#[derive(Debug, Clone)]
pub struct HttpTaskStore {
    client: Client,
    config: HttpStoreConfig,
}

impl HttpTaskStore {
    /// Creates a client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Transport`] when the HTTP client cannot be
    /// built.
    pub fn new(config: HttpStoreConfig) -> TaskStoreResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(TaskStoreError::transport)?;
        Ok(Self { client, config })
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpStoreConfig {
        &self.config
    }

    /// Returns the URL of the task collection.
    #[must_use]
    pub fn collection_url(&self) -> String {
        self.config.endpoint.trim_end_matches('/').to_owned()
    }

    /// Returns the URL of a single task.
    #[must_use]
    pub fn task_url(&self, id: &TaskId) -> String {
        format!("{}/{id}", self.collection_url())
    }
}

/// Maps a response onto the store contract.
///
/// The reference backend answers unknown ids with `400`, so a `400` on an
/// id-addressed request is read as [`TaskStoreError::NotFound`].
async fn check(response: Response, id: Option<&TaskId>) -> TaskStoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(classify(status, id, body))
}

fn classify(status: StatusCode, id: Option<&TaskId>, body: String) -> TaskStoreError {
    match (status, id) {
        (StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST, Some(task_id)) => {
            TaskStoreError::NotFound(task_id.clone())
        }
        (StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY, _) => {
            TaskStoreError::Validation(body)
        }
        _ => TaskStoreError::transport(UnexpectedStatus {
            status: status.as_u16(),
            body,
        }),
    }
}

#[async_trait]
impl TaskStore for HttpTaskStore {
    async fn list(&self) -> TaskStoreResult<Vec<TaskRecord>> {
        debug!(url = %self.collection_url(), "listing tasks");
        let response = self
            .client
            .get(self.collection_url())
            .send()
            .await
            .map_err(TaskStoreError::transport)?;
        check(response, None)
            .await?
            .json()
            .await
            .map_err(TaskStoreError::transport)
    }

    async fn create(&self, task: &NewTask) -> TaskStoreResult<TaskRecord> {
        debug!(status = %task.status, "creating task");
        let response = self
            .client
            .post(self.collection_url())
            .json(task)
            .send()
            .await
            .map_err(TaskStoreError::transport)?;
        check(response, None)
            .await?
            .json()
            .await
            .map_err(TaskStoreError::transport)
    }

    async fn update(&self, id: &TaskId, patch: &TaskPatch) -> TaskStoreResult<TaskRecord> {
        debug!(task_id = %id, "updating task");
        let response = self
            .client
            .put(self.task_url(id))
            .json(patch)
            .send()
            .await
            .map_err(TaskStoreError::transport)?;
        check(response, Some(id))
            .await?
            .json()
            .await
            .map_err(TaskStoreError::transport)
    }

    async fn delete(&self, id: &TaskId) -> TaskStoreResult<TaskId> {
        debug!(task_id = %id, "deleting task");
        let response = self
            .client
            .delete(self.task_url(id))
            .send()
            .await
            .map_err(TaskStoreError::transport)?;
        let deleted: DeletedTask = check(response, Some(id))
            .await?
            .json()
            .await
            .map_err(TaskStoreError::transport)?;
        Ok(deleted.id)
    }
}
