/// In-memory repositories
///
/// A single [`MemoryStore`] holds every table behind one `tokio::sync::RwLock`
/// and implements all repository traits. It mirrors the Postgres schema's
/// constraints: unique case-insensitive emails, foreign keys on
/// `owner_id`/`project_id`/`assigned_to`, and cascading project deletes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    ProjectRepository, StoreError, StoreResult, TaskRepository, TokenRepository, UserRepository,
};
use crate::models::project::{CreateProject, Project, ProjectDetails, ProjectSummary, UpdateProject};
use crate::models::task::{CreateTask, Task, TaskDetails, TaskFilter, UpdateTask};
use crate::models::user::{CreateUser, User, UserSummary};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    projects: BTreeMap<i64, Project>,
    tasks: BTreeMap<i64, Task>,
    revoked: HashMap<Uuid, DateTime<Utc>>,
    next_user_id: i64,
    next_project_id: i64,
    next_task_id: i64,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    fn email_taken(&self, email: &str) -> bool {
        self.users
            .values()
            .any(|user| user.email.eq_ignore_ascii_case(email))
    }

    fn project_details(&self, project: &Project) -> Option<ProjectDetails> {
        let owner = self.users.get(&project.owner_id)?;
        Some(ProjectDetails::new(project.clone(), UserSummary::from(owner)))
    }

    fn task_details(&self, task: &Task) -> Option<TaskDetails> {
        let project = self.projects.get(&task.project_id)?;
        let assignee = self.users.get(&task.assigned_to)?;
        Some(TaskDetails {
            task: task.clone(),
            project: ProjectSummary {
                id: project.id,
                name: project.name.clone(),
                owner_id: project.owner_id,
            },
            assignee: UserSummary::from(assignee),
        })
    }

    fn check_task_refs(&self, project_id: i64, assigned_to: i64) -> StoreResult<()> {
        if !self.projects.contains_key(&project_id) {
            return Err(StoreError::ForeignKeyViolation(
                "tasks_project_id_fkey".to_string(),
            ));
        }
        if !self.users.contains_key(&assigned_to) {
            return Err(StoreError::ForeignKeyViolation(
                "tasks_assigned_to_fkey".to_string(),
            ));
        }
        Ok(())
    }

    /// Newest first, matching `ORDER BY created_at DESC, id DESC`
    fn sorted_projects<'a>(&self, projects: impl Iterator<Item = &'a Project>) -> Vec<ProjectDetails> {
        let mut details: Vec<ProjectDetails> = projects
            .filter_map(|project| self.project_details(project))
            .collect();
        details.sort_by(|a, b| {
            b.project
                .created_at
                .cmp(&a.project.created_at)
                .then(b.project.id.cmp(&a.project.id))
        });
        details
    }
}

/// All tables of the in-process store
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, data: CreateUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;

        if tables.email_taken(&data.email) {
            return Err(StoreError::UniqueViolation("users_email_key".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Tables::next_id(&mut tables.next_user_id),
            name: data.name,
            email: data.email,
            password_hash: data.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn exists(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.read().await.users.contains_key(&id))
    }
}

#[async_trait]
impl ProjectRepository for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<ProjectDetails>> {
        let tables = self.tables.read().await;
        Ok(tables.sorted_projects(tables.projects.values()))
    }

    async fn list_by_owner(&self, owner_id: i64) -> StoreResult<Vec<ProjectDetails>> {
        let tables = self.tables.read().await;
        Ok(tables.sorted_projects(
            tables
                .projects
                .values()
                .filter(|project| project.owner_id == owner_id),
        ))
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<ProjectDetails>> {
        let tables = self.tables.read().await;
        Ok(tables
            .projects
            .get(&id)
            .and_then(|project| tables.project_details(project)))
    }

    async fn exists(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.read().await.projects.contains_key(&id))
    }

    async fn create(&self, data: CreateProject) -> StoreResult<Project> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&data.owner_id) {
            return Err(StoreError::ForeignKeyViolation(
                "projects_owner_id_fkey".to_string(),
            ));
        }

        let now = Utc::now();
        let project = Project {
            id: Tables::next_id(&mut tables.next_project_id),
            name: data.name,
            description: data.description,
            owner_id: data.owner_id,
            created_at: now,
            updated_at: now,
        };
        tables.projects.insert(project.id, project.clone());

        Ok(project)
    }

    async fn update(&self, id: i64, data: UpdateProject) -> StoreResult<Option<Project>> {
        let mut tables = self.tables.write().await;

        Ok(tables.projects.get_mut(&id).map(|project| {
            data.apply_to(project);
            project.clone()
        }))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;

        if tables.projects.remove(&id).is_none() {
            return Ok(false);
        }
        tables.tasks.retain(|_, task| task.project_id != id);

        Ok(true)
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn list(&self, filter: &TaskFilter) -> StoreResult<Vec<TaskDetails>> {
        let tables = self.tables.read().await;

        let mut tasks: Vec<TaskDetails> = tables
            .tasks
            .values()
            .filter(|task| filter.matches(task))
            .filter_map(|task| tables.task_details(task))
            .collect();
        tasks.sort_by(|a, b| {
            a.task
                .due_date
                .cmp(&b.task.due_date)
                .then(a.task.id.cmp(&b.task.id))
        });

        Ok(tasks)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<TaskDetails>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .get(&id)
            .and_then(|task| tables.task_details(task)))
    }

    async fn create(&self, data: CreateTask) -> StoreResult<Task> {
        let mut tables = self.tables.write().await;

        tables.check_task_refs(data.project_id, data.assigned_to)?;

        let now = Utc::now();
        let task = Task {
            id: Tables::next_id(&mut tables.next_task_id),
            project_id: data.project_id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            due_date: data.due_date,
            assigned_to: data.assigned_to,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.insert(task.id, task.clone());

        Ok(task)
    }

    async fn update(&self, id: i64, data: UpdateTask) -> StoreResult<Option<Task>> {
        let mut tables = self.tables.write().await;

        let Some(current) = tables.tasks.get(&id) else {
            return Ok(None);
        };
        let project_id = current.project_id;
        if let Some(assigned_to) = data.assigned_to {
            tables.check_task_refs(project_id, assigned_to)?;
        }

        Ok(tables.tasks.get_mut(&id).map(|task| {
            data.apply_to(task);
            task.clone()
        }))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.write().await.tasks.remove(&id).is_some())
    }
}

#[async_trait]
impl TokenRepository for MemoryStore {
    async fn revoke(&self, token_id: Uuid, expires_at: DateTime<Utc>) -> StoreResult<()> {
        self.tables
            .write()
            .await
            .revoked
            .entry(token_id)
            .or_insert(expires_at);
        Ok(())
    }

    async fn is_revoked(&self, token_id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.read().await.revoked.contains_key(&token_id))
    }

    async fn purge_expired(&self) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let before = tables.revoked.len();
        tables.revoked.retain(|_, expires_at| *expires_at >= now);
        Ok((before - tables.revoked.len()) as u64)
    }
}
