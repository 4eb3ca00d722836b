/// Project model
///
/// A project is created by a user (its owner) and groups tasks. Only the
/// owner may change or delete it; see [`crate::auth::authorization`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     owner_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::task::TaskDetails;
use super::user::UserSummary;

/// Project row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: i64,

    /// Project name (at most 255 characters)
    pub name: String,

    /// Optional free-form description (at most 2000 characters)
    pub description: Option<String>,

    /// User who created the project
    pub owner_id: i64,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: i64,
}

/// Input for updating a project
///
/// Only `Some` fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProject {
    /// New name
    pub name: Option<String>,

    /// New description (use Some(None) to clear)
    pub description: Option<Option<String>>,
}

impl UpdateProject {
    /// Whether the update would change nothing
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }

    /// Applies the update to an in-memory project
    pub fn apply_to(self, project: &mut Project) {
        if let Some(name) = self.name {
            project.name = name;
        }
        if let Some(description) = self.description {
            project.description = description;
        }
        project.updated_at = Utc::now();
    }
}

/// Project fields embedded in task payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
}

/// A project together with its owner and, on detail reads, its tasks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDetails {
    #[serde(flatten)]
    pub project: Project,

    /// Owner summary
    pub owner: UserSummary,

    /// Tasks of the project (only present on single-project reads)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<TaskDetails>>,
}

impl ProjectDetails {
    pub fn new(project: Project, owner: UserSummary) -> Self {
        Self {
            project,
            owner,
            tasks: None,
        }
    }

    /// Attaches the project's tasks
    pub fn with_tasks(mut self, tasks: Vec<TaskDetails>) -> Self {
        self.tasks = Some(tasks);
        self
    }
}
