/// Task list with filters and create form
///
/// Changing a filter re-fetches immediately. New tasks are assigned to the
/// signed-in user.

use chrono::NaiveDate;
use taskboard_shared::models::{
    project::ProjectDetails,
    task::{TaskDetails, TaskPriority, TaskStatus},
};

use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::pages::{banner, non_blank};
use crate::services::tasks::{NewTask, TaskQuery};

/// Create form fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    /// Selected project id, empty when none is selected
    pub project_id: String,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,

    /// `YYYY-MM-DD`
    pub due_date: String,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            title: String::new(),
            description: String::new(),
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            due_date: String::new(),
        }
    }
}

impl TaskForm {
    fn to_new_task(&self, assigned_to: i64) -> ClientResult<NewTask> {
        let project_id = self
            .project_id
            .trim()
            .parse::<i64>()
            .map_err(|_| ClientError::Input("Select a project".to_string()))?;
        let due_date = NaiveDate::parse_from_str(self.due_date.trim(), "%Y-%m-%d")
            .map_err(|_| ClientError::Input("Enter a due date as YYYY-MM-DD".to_string()))?;

        Ok(NewTask {
            project_id,
            title: self.title.trim().to_string(),
            description: non_blank(&self.description),
            status: Some(self.status),
            priority: self.priority,
            due_date,
            assigned_to,
        })
    }
}

#[derive(Debug, Clone)]
pub struct TasksPage {
    client: ApiClient,
    pub tasks: Vec<TaskDetails>,

    /// Choices for the project selector
    pub projects: Vec<ProjectDetails>,
    pub filters: TaskQuery,
    pub loading: bool,
    pub show_form: bool,
    pub form: TaskForm,
    pub submitting: bool,
    pub error: Option<String>,
}

impl TasksPage {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            tasks: Vec::new(),
            projects: Vec::new(),
            filters: TaskQuery::default(),
            loading: true,
            show_form: false,
            form: TaskForm::default(),
            submitting: false,
            error: None,
        }
    }

    pub async fn mount(&mut self) {
        self.load_projects().await;
        self.reload().await;
    }

    async fn load_projects(&mut self) {
        match self.client.projects().list().await {
            Ok(projects) => self.projects = projects,
            // The list still works without the selector
            Err(e) => tracing::warn!(error = %e, "Could not load projects"),
        }
    }

    pub async fn reload(&mut self) {
        match self.client.tasks().list(&self.filters).await {
            Ok(tasks) => self.tasks = tasks,
            Err(e) => self.error = banner(&e),
        }
        self.loading = false;
    }

    pub async fn set_status_filter(&mut self, status: Option<TaskStatus>) {
        self.filters.status = status;
        self.reload().await;
    }

    pub async fn set_priority_filter(&mut self, priority: Option<TaskPriority>) {
        self.filters.priority = priority;
        self.reload().await;
    }

    pub async fn set_project_filter(&mut self, project_id: Option<i64>) {
        self.filters.project_id = project_id;
        self.reload().await;
    }

    pub async fn clear_filters(&mut self) {
        self.filters = TaskQuery::default();
        self.reload().await;
    }

    pub fn toggle_form(&mut self) {
        self.show_form = !self.show_form;
    }

    /// Creates a task from the form, then resets the form and re-fetches
    pub async fn create(&mut self) -> bool {
        self.submitting = true;
        self.error = None;

        let result = match self.client.session().user().await {
            Some(user) => match self.form.to_new_task(user.id) {
                Ok(task) => self.client.tasks().create(&task).await,
                Err(e) => Err(e),
            },
            None => Err(ClientError::Input("Sign in to create tasks".to_string())),
        };
        self.submitting = false;

        match result {
            Ok(_) => {
                self.form = TaskForm::default();
                self.show_form = false;
                self.reload().await;
                true
            }
            Err(e) => {
                self.error = banner(&e);
                false
            }
        }
    }

    pub async fn delete(&mut self, id: i64) -> bool {
        match self.client.tasks().delete(id).await {
            Ok(()) => {
                self.reload().await;
                true
            }
            Err(e) => {
                self.error = banner(&e);
                false
            }
        }
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}
