/// Project endpoints
///
/// # Endpoints
///
/// - `GET /v1/projects` - All projects with owner summaries
/// - `POST /v1/projects` - Create a project owned by the caller
/// - `GET /v1/projects/:id` - One project with owner and tasks
/// - `PUT|PATCH /v1/projects/:id` - Update (owner only)
/// - `DELETE /v1/projects/:id` - Delete with its tasks (owner only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{EntityId, JsonBody},
    routes::{created, Envelope},
    validation::{nullable, trimmed, Violations, MAX_DESCRIPTION_LEN},
};
use axum::{extract::State, http::StatusCode, Extension};
use serde::Deserialize;
use taskboard_shared::{
    auth::{
        authorization::{authorize, Action},
        middleware::AuthContext,
    },
    models::{
        project::{CreateProject, ProjectDetails, UpdateProject},
        task::TaskFilter,
    },
};
use tracing::info;
use validator::Validate;

const MAX_NAME_CHARS: usize = 255;

fn project_not_found() -> ApiError {
    ApiError::NotFound("Project not found".to_string())
}

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(
        required(message = "The name field is required."),
        length(max = 255, message = "The name field must not be greater than 255 characters.")
    )]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    pub description: Option<String>,
}

impl CreateProjectRequest {
    fn validate_into(self, owner_id: i64) -> ApiResult<CreateProject> {
        let mut violations = Violations::of(&self);
        violations.max_chars("description", self.description.as_deref(), MAX_DESCRIPTION_LEN);
        violations.into_result()?;

        Ok(CreateProject {
            name: self.name.unwrap_or_default(),
            description: self.description,
            owner_id,
        })
    }
}

/// Update project request
///
/// Absent fields are left alone. `description: null` clears the description;
/// `name` may be omitted but not blanked.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProjectRequest {
    #[serde(default, deserialize_with = "nullable")]
    pub name: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
}

impl UpdateProjectRequest {
    fn validate_into(self) -> ApiResult<UpdateProject> {
        let mut violations = Violations::new();

        match self.name.as_ref() {
            Some(None) => violations.add("name", "The name field is required."),
            Some(Some(name)) => violations.max_chars("name", Some(name), MAX_NAME_CHARS),
            None => {}
        }
        if let Some(description) = self.description.as_ref() {
            violations.max_chars("description", description.as_deref(), MAX_DESCRIPTION_LEN);
        }
        violations.into_result()?;

        Ok(UpdateProject {
            name: self.name.flatten(),
            description: self.description,
        })
    }
}

/// List all projects, newest first
pub async fn list_projects(
    State(state): State<AppState>,
) -> ApiResult<Envelope<Vec<ProjectDetails>>> {
    let projects = state.store.projects.list().await?;
    Ok(Envelope::data(projects))
}

/// Create a project
///
/// # Endpoint
///
/// ```text
/// POST /v1/projects
/// Authorization: Bearer <token>
///
/// { "name": "Website relaunch", "description": "Q3" }
/// ```
///
/// # Response (201)
///
/// ```json
/// {
///   "message": "Project created successfully",
///   "data": { "id": 7, "name": "Website relaunch", "owner_id": 1, "owner": { ... } }
/// }
/// ```
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    JsonBody(req): JsonBody<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Envelope<ProjectDetails>)> {
    let data = req.validate_into(auth.user_id)?;

    let project = state.store.projects.create(data).await?;
    info!(project_id = project.id, owner_id = auth.user_id, "Project created");

    let details = state
        .store
        .projects
        .find_by_id(project.id)
        .await?
        .ok_or_else(|| ApiError::InternalError(format!("Project {} vanished after insert", project.id)))?;

    Ok(created("Project created successfully", details))
}

/// One project with its owner and tasks
pub async fn get_project(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> ApiResult<Envelope<ProjectDetails>> {
    let project = state
        .store
        .projects
        .find_by_id(id)
        .await?
        .ok_or_else(project_not_found)?;

    let tasks = state.store.tasks.list(&TaskFilter::for_project(id)).await?;

    Ok(Envelope::data(project.with_tasks(tasks)))
}

/// Update a project
///
/// # Errors
///
/// - `404 Not Found`: No such project
/// - `403 Forbidden`: Caller is not the owner
/// - `422 Unprocessable Entity`: Invalid fields
pub async fn update_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    EntityId(id): EntityId,
    JsonBody(req): JsonBody<UpdateProjectRequest>,
) -> ApiResult<Envelope<ProjectDetails>> {
    let existing = state
        .store
        .projects
        .find_by_id(id)
        .await?
        .ok_or_else(project_not_found)?;
    authorize(auth.user_id, Action::Update, &existing)?;

    let changes = req.validate_into()?;
    if !changes.is_empty() {
        state
            .store
            .projects
            .update(id, changes)
            .await?
            .ok_or_else(project_not_found)?;
        info!(project_id = id, user_id = auth.user_id, "Project updated");
    }

    let updated = state
        .store
        .projects
        .find_by_id(id)
        .await?
        .ok_or_else(project_not_found)?;

    Ok(Envelope::with_message("Project updated successfully", updated))
}

/// Delete a project and its tasks
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    EntityId(id): EntityId,
) -> ApiResult<Envelope<()>> {
    let existing = state
        .store
        .projects
        .find_by_id(id)
        .await?
        .ok_or_else(project_not_found)?;
    authorize(auth.user_id, Action::Delete, &existing)?;

    if !state.store.projects.delete(id).await? {
        return Err(project_not_found());
    }
    info!(project_id = id, user_id = auth.user_id, "Project deleted");

    Ok(Envelope::message("Project deleted successfully"))
}
