/// Task calls

use chrono::NaiveDate;
use serde::Serialize;
use taskboard_shared::models::task::{TaskDetails, TaskPriority, TaskStatus};

use crate::client::ApiClient;
use crate::error::ClientResult;

/// Listing filters; unset fields are left out of the query string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
}

impl TaskQuery {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Body of `POST /tasks`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask {
    pub project_id: i64,
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Server default (pending) when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    pub priority: TaskPriority,
    pub due_date: NaiveDate,
    pub assigned_to: i64,
}

/// Body of `PUT /tasks/:id`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct TaskService {
    client: ApiClient,
}

impl TaskService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &TaskQuery) -> ClientResult<Vec<TaskDetails>> {
        self.client
            .get_with_query("/tasks", query)
            .await?
            .into_data()
    }

    /// Tasks assigned to the signed-in user
    pub async fn mine(&self, query: &TaskQuery) -> ClientResult<Vec<TaskDetails>> {
        self.client
            .get_with_query("/me/tasks", query)
            .await?
            .into_data()
    }

    pub async fn get(&self, id: i64) -> ClientResult<TaskDetails> {
        self.client.get(&format!("/tasks/{}", id)).await?.into_data()
    }

    pub async fn create(&self, task: &NewTask) -> ClientResult<TaskDetails> {
        self.client.post("/tasks", task).await?.into_data()
    }

    pub async fn update(&self, id: i64, changes: &TaskChanges) -> ClientResult<TaskDetails> {
        self.client
            .put(&format!("/tasks/{}", id), changes)
            .await?
            .into_data()
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.client.delete(&format!("/tasks/{}", id)).await?;
        Ok(())
    }
}
