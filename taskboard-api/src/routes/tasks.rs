/// Task endpoints
///
/// # Endpoints
///
/// - `GET /v1/tasks?project_id=&status=&priority=` - Filtered listing, by due date
/// - `POST /v1/tasks` - Create a task
/// - `GET /v1/tasks/:id` - One task with project and assignee summaries
/// - `PUT|PATCH /v1/tasks/:id` - Partial update (project owner or assignee)
/// - `DELETE /v1/tasks/:id` - Delete (project owner or assignee)
///
/// # Example
///
/// ```text
/// POST /v1/tasks
/// Authorization: Bearer <token>
///
/// {
///   "project_id": 7,
///   "title": "Draft copy",
///   "priority": "high",
///   "due_date": "2030-01-15",
///   "assigned_to": 2
/// }
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{EntityId, JsonBody, QueryParams},
    routes::{created, Envelope},
    validation::{explicit, nullable, trimmed, Violations, MAX_DESCRIPTION_LEN},
};
use axum::{extract::State, http::StatusCode, Extension};
use serde::Deserialize;
use taskboard_shared::{
    auth::{
        authorization::{authorize, Action},
        middleware::AuthContext,
    },
    models::task::{
        CreateTask, TaskDetails, TaskFilter, TaskPriority, TaskStatus, UpdateTask,
    },
    repository::Store,
};
use tracing::info;
use validator::Validate;

const MAX_TITLE_CHARS: usize = 255;

fn task_not_found() -> ApiError {
    ApiError::NotFound("Task not found".to_string())
}

/// Listing filters, all optional and combined with AND
///
/// Values arrive as raw strings so a bad value is reported per field rather
/// than as an opaque query error. Blank values are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    #[serde(default, deserialize_with = "trimmed")]
    pub project_id: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    pub status: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    pub priority: Option<String>,
}

impl TaskListQuery {
    pub fn into_filter(self) -> ApiResult<TaskFilter> {
        let mut violations = Violations::new();

        let project_id = self.project_id.as_deref().and_then(|raw| {
            let parsed = raw.parse::<i64>().ok();
            violations.check(parsed.is_some(), "project_id", "The selected project_id is invalid.");
            parsed
        });
        let status = violations.parse_enum::<TaskStatus>("status", self.status.as_deref());
        let priority = violations.parse_enum::<TaskPriority>("priority", self.priority.as_deref());

        violations.into_result()?;

        Ok(TaskFilter {
            project_id,
            assigned_to: None,
            status,
            priority,
        })
    }
}

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(required(message = "The project_id field is required."))]
    pub project_id: Option<i64>,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(
        required(message = "The title field is required."),
        length(max = 255, message = "The title field must not be greater than 255 characters.")
    )]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    pub description: Option<String>,

    /// Defaults to pending
    #[serde(default, deserialize_with = "trimmed")]
    pub status: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(required(message = "The priority field is required."))]
    pub priority: Option<String>,

    /// `YYYY-MM-DD`, today or later
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(required(message = "The due_date field is required."))]
    pub due_date: Option<String>,

    #[validate(required(message = "The assigned_to field is required."))]
    pub assigned_to: Option<i64>,
}

impl CreateTaskRequest {
    async fn validate_into(self, store: &Store) -> ApiResult<CreateTask> {
        let mut violations = Violations::of(&self);

        violations.max_chars("description", self.description.as_deref(), MAX_DESCRIPTION_LEN);
        let status = violations.parse_enum::<TaskStatus>("status", self.status.as_deref());
        let priority = violations.parse_enum::<TaskPriority>("priority", self.priority.as_deref());
        let due_date = violations.parse_date("due_date", self.due_date.as_deref());
        violations.not_before_today("due_date", due_date);

        if let Some(project_id) = self.project_id {
            violations.exists("project_id", store.projects.exists(project_id).await?);
        }
        if let Some(assigned_to) = self.assigned_to {
            violations.exists("assigned_to", store.users.exists(assigned_to).await?);
        }

        violations.into_result()?;

        match (self.project_id, self.title, priority, due_date, self.assigned_to) {
            (Some(project_id), Some(title), Some(priority), Some(due_date), Some(assigned_to)) => {
                Ok(CreateTask {
                    project_id,
                    title,
                    description: self.description,
                    status: status.unwrap_or_default(),
                    priority,
                    due_date,
                    assigned_to,
                })
            }
            _ => Err(ApiError::BadRequest("Incomplete task".to_string())),
        }
    }
}

/// Update task request
///
/// Absent fields are left alone; present ones follow the create rules except
/// that `due_date` may lie in the past and the project cannot change.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default, deserialize_with = "nullable")]
    pub title: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    pub status: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    pub priority: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    pub due_date: Option<Option<String>>,

    #[serde(default, deserialize_with = "explicit")]
    pub assigned_to: Option<Option<i64>>,
}

impl UpdateTaskRequest {
    async fn validate_into(self, store: &Store) -> ApiResult<UpdateTask> {
        let mut violations = Violations::new();

        match self.title.as_ref() {
            Some(None) => violations.add("title", "The title field is required."),
            Some(Some(title)) => violations.max_chars("title", Some(title), MAX_TITLE_CHARS),
            None => {}
        }
        if let Some(description) = self.description.as_ref() {
            violations.max_chars("description", description.as_deref(), MAX_DESCRIPTION_LEN);
        }

        // Present fields may not be null, except description
        if matches!(self.status, Some(None)) {
            violations.add("status", "The selected status is invalid.");
        }
        if matches!(self.priority, Some(None)) {
            violations.add("priority", "The selected priority is invalid.");
        }
        if matches!(self.due_date, Some(None)) {
            violations.add("due_date", "The due_date field is required.");
        }
        if matches!(self.assigned_to, Some(None)) {
            violations.add("assigned_to", "The assigned_to field is required.");
        }

        let status = violations.parse_enum::<TaskStatus>("status", self.status.flatten().as_deref());
        let priority =
            violations.parse_enum::<TaskPriority>("priority", self.priority.flatten().as_deref());
        let due_date = violations.parse_date("due_date", self.due_date.flatten().as_deref());

        let assigned_to = self.assigned_to.flatten();
        if let Some(assigned_to) = assigned_to {
            violations.exists("assigned_to", store.users.exists(assigned_to).await?);
        }

        violations.into_result()?;

        Ok(UpdateTask {
            title: self.title.flatten(),
            description: self.description,
            status,
            priority,
            due_date,
            assigned_to,
        })
    }
}

async fn load_task(store: &Store, id: i64) -> ApiResult<TaskDetails> {
    store.tasks.find_by_id(id).await?.ok_or_else(task_not_found)
}

/// List tasks matching every supplied filter, earliest due date first
pub async fn list_tasks(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<TaskListQuery>,
) -> ApiResult<Envelope<Vec<TaskDetails>>> {
    let filter = query.into_filter()?;
    let tasks = state.store.tasks.list(&filter).await?;

    Ok(Envelope::data(tasks))
}

/// Create a task
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Missing fields, bad enum values, a due date
///   before today, or an unknown project/assignee
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    JsonBody(req): JsonBody<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Envelope<TaskDetails>)> {
    let data = req.validate_into(&state.store).await?;

    let task = state.store.tasks.create(data).await?;
    info!(
        task_id = task.id,
        project_id = task.project_id,
        user_id = auth.user_id,
        "Task created"
    );

    let details = load_task(&state.store, task.id).await?;
    Ok(created("Task created successfully", details))
}

/// One task
pub async fn get_task(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> ApiResult<Envelope<TaskDetails>> {
    Ok(Envelope::data(load_task(&state.store, id).await?))
}

/// Update a task
///
/// # Errors
///
/// - `404 Not Found`: No such task
/// - `403 Forbidden`: Caller neither owns the project nor is the assignee
/// - `422 Unprocessable Entity`: Invalid fields
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    EntityId(id): EntityId,
    JsonBody(req): JsonBody<UpdateTaskRequest>,
) -> ApiResult<Envelope<TaskDetails>> {
    let existing = load_task(&state.store, id).await?;
    authorize(auth.user_id, Action::Update, &existing)?;

    let changes = req.validate_into(&state.store).await?;
    if !changes.is_empty() {
        state
            .store
            .tasks
            .update(id, changes)
            .await?
            .ok_or_else(task_not_found)?;
        info!(task_id = id, user_id = auth.user_id, "Task updated");
    }

    let updated = load_task(&state.store, id).await?;
    Ok(Envelope::with_message("Task updated successfully", updated))
}

/// Delete a task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    EntityId(id): EntityId,
) -> ApiResult<Envelope<()>> {
    let existing = load_task(&state.store, id).await?;
    authorize(auth.user_id, Action::Delete, &existing)?;

    if !state.store.tasks.delete(id).await? {
        return Err(task_not_found());
    }
    info!(task_id = id, user_id = auth.user_id, "Task deleted");

    Ok(Envelope::message("Task deleted successfully"))
}
