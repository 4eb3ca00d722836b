/// One project with its tasks and an edit form

use taskboard_shared::models::project::ProjectDetails;

use crate::client::ApiClient;
use crate::pages::{banner, non_blank, projects::ProjectForm};
use crate::services::projects::ProjectChanges;
use crate::session::Route;

#[derive(Debug, Clone)]
pub struct ProjectDetailPage {
    client: ApiClient,
    pub id: i64,
    pub project: Option<ProjectDetails>,
    pub loading: bool,
    pub editing: bool,
    pub form: ProjectForm,
    pub submitting: bool,
    pub error: Option<String>,
}

impl ProjectDetailPage {
    pub fn new(client: ApiClient, id: i64) -> Self {
        Self {
            client,
            id,
            project: None,
            loading: true,
            editing: false,
            form: ProjectForm::default(),
            submitting: false,
            error: None,
        }
    }

    pub async fn mount(&mut self) {
        self.reload().await;
    }

    /// Fetches the project and prefills the edit form from it
    pub async fn reload(&mut self) {
        match self.client.projects().get(self.id).await {
            Ok(project) => {
                self.form = ProjectForm {
                    name: project.project.name.clone(),
                    description: project.project.description.clone().unwrap_or_default(),
                };
                self.project = Some(project);
            }
            Err(e) => self.error = banner(&e),
        }
        self.loading = false;
    }

    pub fn start_editing(&mut self) {
        self.editing = true;
    }

    /// Drops unsaved edits
    pub fn cancel_editing(&mut self) {
        self.editing = false;
        if let Some(project) = &self.project {
            self.form = ProjectForm {
                name: project.project.name.clone(),
                description: project.project.description.clone().unwrap_or_default(),
            };
        }
    }

    /// Saves the form; a blank description clears it
    pub async fn save(&mut self) -> bool {
        self.submitting = true;
        self.error = None;

        let changes = ProjectChanges {
            name: Some(self.form.name.trim().to_string()),
            description: Some(non_blank(&self.form.description)),
        };
        let result = self.client.projects().update(self.id, &changes).await;
        self.submitting = false;

        match result {
            Ok(_) => {
                self.editing = false;
                self.reload().await;
                true
            }
            Err(e) => {
                self.error = banner(&e);
                false
            }
        }
    }

    pub fn back(&self) {
        self.client.session().navigate(Route::Projects);
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}
