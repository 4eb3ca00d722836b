/// Project list with create form

use taskboard_shared::models::project::ProjectDetails;

use crate::client::ApiClient;
use crate::pages::{banner, non_blank};
use crate::services::projects::NewProject;
use crate::session::Route;

/// Create form fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectForm {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct ProjectsPage {
    client: ApiClient,
    pub projects: Vec<ProjectDetails>,
    pub loading: bool,
    pub show_form: bool,
    pub form: ProjectForm,
    pub submitting: bool,
    pub error: Option<String>,
}

impl ProjectsPage {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            projects: Vec::new(),
            loading: true,
            show_form: false,
            form: ProjectForm::default(),
            submitting: false,
            error: None,
        }
    }

    pub async fn mount(&mut self) {
        self.reload().await;
    }

    pub async fn reload(&mut self) {
        match self.client.projects().list().await {
            Ok(projects) => self.projects = projects,
            Err(e) => self.error = banner(&e),
        }
        self.loading = false;
    }

    pub fn toggle_form(&mut self) {
        self.show_form = !self.show_form;
    }

    /// Creates a project from the form, then resets the form and re-fetches
    pub async fn create(&mut self) -> bool {
        self.submitting = true;
        self.error = None;

        let project = NewProject {
            name: self.form.name.trim().to_string(),
            description: non_blank(&self.form.description),
        };
        let result = self.client.projects().create(&project).await;
        self.submitting = false;

        match result {
            Ok(_) => {
                self.form = ProjectForm::default();
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
        match self.client.projects().delete(id).await {
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

    pub fn open(&self, id: i64) {
        self.client.session().navigate(Route::ProjectDetail(id));
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}
