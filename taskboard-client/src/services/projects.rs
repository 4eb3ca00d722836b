/// Project calls

use serde::Serialize;
use taskboard_shared::models::project::ProjectDetails;

use crate::client::ApiClient;
use crate::error::ClientResult;

/// Body of `POST /projects`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewProject {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of `PUT /projects/:id`
///
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Clone)]
pub struct ProjectService {
    client: ApiClient,
}

impl ProjectService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ClientResult<Vec<ProjectDetails>> {
        self.client.get("/projects").await?.into_data()
    }

    /// Projects owned by the signed-in user
    pub async fn mine(&self) -> ClientResult<Vec<ProjectDetails>> {
        self.client.get("/me/projects").await?.into_data()
    }

    /// One project with its tasks
    pub async fn get(&self, id: i64) -> ClientResult<ProjectDetails> {
        self.client
            .get(&format!("/projects/{}", id))
            .await?
            .into_data()
    }

    pub async fn create(&self, project: &NewProject) -> ClientResult<ProjectDetails> {
        self.client.post("/projects", project).await?.into_data()
    }

    pub async fn update(&self, id: i64, changes: &ProjectChanges) -> ClientResult<ProjectDetails> {
        self.client
            .put(&format!("/projects/{}", id), changes)
            .await?
            .into_data()
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.client.delete(&format!("/projects/{}", id)).await?;
        Ok(())
    }
}
