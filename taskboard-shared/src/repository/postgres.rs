/// Postgres repositories
///
/// sqlx-backed implementations of the repository traits. Each repository
/// owns a clone of the pool (a cheap `Arc` handle).
///
/// Relationship summaries (owner, project, assignee) are loaded with joins in
/// the same statement as the rows they decorate.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{
    ProjectRepository, StoreResult, TaskRepository, TokenRepository, UserRepository,
};
use crate::models::project::{CreateProject, Project, ProjectDetails, ProjectSummary, UpdateProject};
use crate::models::task::{
    CreateTask, Task, TaskDetails, TaskFilter, TaskPriority, TaskStatus, UpdateTask,
};
use crate::models::user::{CreateUser, User, UserSummary};

const USER_COLUMNS: &str = "id, name, email::TEXT AS email, password_hash, created_at, updated_at";

const PROJECT_COLUMNS: &str = "id, name, description, owner_id, created_at, updated_at";

const TASK_COLUMNS: &str = "id, project_id, title, description, status, priority, due_date, \
                            assigned_to, created_at, updated_at";

/// User repository over Postgres
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, data: CreateUser) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(data.name)
        .bind(data.email)
        .bind(data.password_hash)
        .fetch_one(&self.pool)
        .await?;

        debug!(user_id = user.id, "Created user");
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        // CITEXT comparison is case-insensitive
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1::CITEXT",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn exists(&self, id: i64) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}

/// Project row joined with its owner
#[derive(sqlx::FromRow)]
struct ProjectOwnerRow {
    id: i64,
    name: String,
    description: Option<String>,
    owner_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    owner_name: String,
    owner_email: String,
}

impl From<ProjectOwnerRow> for ProjectDetails {
    fn from(row: ProjectOwnerRow) -> Self {
        let owner = UserSummary {
            id: row.owner_id,
            name: row.owner_name,
            email: row.owner_email,
        };
        let project = Project {
            id: row.id,
            name: row.name,
            description: row.description,
            owner_id: row.owner_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };
        ProjectDetails::new(project, owner)
    }
}

const PROJECT_OWNER_SELECT: &str = r#"
    SELECT p.id, p.name, p.description, p.owner_id, p.created_at, p.updated_at,
           u.name AS owner_name, u.email::TEXT AS owner_email
    FROM projects p
    JOIN users u ON u.id = p.owner_id
"#;

/// Project repository over Postgres
#[derive(Clone)]
pub struct PgProjectRepository {
    pool: PgPool,
}

impl PgProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for PgProjectRepository {
    async fn list(&self) -> StoreResult<Vec<ProjectDetails>> {
        let rows = sqlx::query_as::<_, ProjectOwnerRow>(&format!(
            "{} ORDER BY p.created_at DESC, p.id DESC",
            PROJECT_OWNER_SELECT
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProjectDetails::from).collect())
    }

    async fn list_by_owner(&self, owner_id: i64) -> StoreResult<Vec<ProjectDetails>> {
        let rows = sqlx::query_as::<_, ProjectOwnerRow>(&format!(
            "{} WHERE p.owner_id = $1 ORDER BY p.created_at DESC, p.id DESC",
            PROJECT_OWNER_SELECT
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProjectDetails::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<ProjectDetails>> {
        let row = sqlx::query_as::<_, ProjectOwnerRow>(&format!(
            "{} WHERE p.id = $1",
            PROJECT_OWNER_SELECT
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProjectDetails::from))
    }

    async fn exists(&self, id: i64) -> StoreResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM projects WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn create(&self, data: CreateProject) -> StoreResult<Project> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "INSERT INTO projects (name, description, owner_id) VALUES ($1, $2, $3) RETURNING {}",
            PROJECT_COLUMNS
        ))
        .bind(data.name)
        .bind(data.description)
        .bind(data.owner_id)
        .fetch_one(&self.pool)
        .await?;

        debug!(project_id = project.id, owner_id = project.owner_id, "Created project");
        Ok(project)
    }

    async fn update(&self, id: i64, data: UpdateProject) -> StoreResult<Option<Project>> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE projects SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {}", PROJECT_COLUMNS));

        let mut q = sqlx::query_as::<_, Project>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }

        let project = q.fetch_optional(&self.pool).await?;

        Ok(project)
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        // Tasks go with the project via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Task row joined with its project and assignee
#[derive(sqlx::FromRow)]
struct TaskRelationsRow {
    id: i64,
    project_id: i64,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: NaiveDate,
    assigned_to: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    project_name: String,
    project_owner_id: i64,
    assignee_name: String,
    assignee_email: String,
}

impl From<TaskRelationsRow> for TaskDetails {
    fn from(row: TaskRelationsRow) -> Self {
        TaskDetails {
            project: ProjectSummary {
                id: row.project_id,
                name: row.project_name,
                owner_id: row.project_owner_id,
            },
            assignee: UserSummary {
                id: row.assigned_to,
                name: row.assignee_name,
                email: row.assignee_email,
            },
            task: Task {
                id: row.id,
                project_id: row.project_id,
                title: row.title,
                description: row.description,
                status: row.status,
                priority: row.priority,
                due_date: row.due_date,
                assigned_to: row.assigned_to,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

const TASK_RELATIONS_SELECT: &str = r#"
    SELECT t.id, t.project_id, t.title, t.description, t.status, t.priority, t.due_date,
           t.assigned_to, t.created_at, t.updated_at,
           p.name AS project_name, p.owner_id AS project_owner_id,
           u.name AS assignee_name, u.email::TEXT AS assignee_email
    FROM tasks t
    JOIN projects p ON p.id = t.project_id
    JOIN users u ON u.id = t.assigned_to
"#;

/// Task repository over Postgres
#[derive(Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn list(&self, filter: &TaskFilter) -> StoreResult<Vec<TaskDetails>> {
        let rows = sqlx::query_as::<_, TaskRelationsRow>(&format!(
            r#"{}
            WHERE ($1::BIGINT IS NULL OR t.project_id = $1)
              AND ($2::BIGINT IS NULL OR t.assigned_to = $2)
              AND ($3::task_status IS NULL OR t.status = $3)
              AND ($4::task_priority IS NULL OR t.priority = $4)
            ORDER BY t.due_date ASC, t.id ASC
            "#,
            TASK_RELATIONS_SELECT
        ))
        .bind(filter.project_id)
        .bind(filter.assigned_to)
        .bind(filter.status)
        .bind(filter.priority)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), ?filter, "Listed tasks");
        Ok(rows.into_iter().map(TaskDetails::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<TaskDetails>> {
        let row = sqlx::query_as::<_, TaskRelationsRow>(&format!(
            "{} WHERE t.id = $1",
            TASK_RELATIONS_SELECT
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(TaskDetails::from))
    }

    async fn create(&self, data: CreateTask) -> StoreResult<Task> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (project_id, title, description, status, priority, due_date, assigned_to)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            TASK_COLUMNS
        ))
        .bind(data.project_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.due_date)
        .bind(data.assigned_to)
        .fetch_one(&self.pool)
        .await?;

        debug!(task_id = task.id, project_id = task.project_id, "Created task");
        Ok(task)
    }

    async fn update(&self, id: i64, data: UpdateTask) -> StoreResult<Option<Task>> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        let mut push = |column: &str, present: bool| {
            if present {
                bind_count += 1;
                query.push_str(&format!(", {} = ${}", column, bind_count));
            }
        };
        push("title", data.title.is_some());
        push("description", data.description.is_some());
        push("status", data.status.is_some());
        push("priority", data.priority.is_some());
        push("due_date", data.due_date.is_some());
        push("assigned_to", data.assigned_to.is_some());

        query.push_str(&format!(" WHERE id = $1 RETURNING {}", TASK_COLUMNS));

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }
        if let Some(assigned_to) = data.assigned_to {
            q = q.bind(assigned_to);
        }

        let task = q.fetch_optional(&self.pool).await?;

        Ok(task)
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Revoked-token repository over Postgres
#[derive(Clone)]
pub struct PgTokenRepository {
    pool: PgPool,
}

impl PgTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for PgTokenRepository {
    async fn revoke(&self, token_id: Uuid, expires_at: DateTime<Utc>) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO revoked_tokens (token_id, expires_at)
            VALUES ($1, $2)
            ON CONFLICT (token_id) DO NOTHING
            "#,
        )
        .bind(token_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn is_revoked(&self, token_id: Uuid) -> StoreResult<bool> {
        let revoked: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM revoked_tokens WHERE token_id = $1)",
        )
        .bind(token_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(revoked)
    }

    async fn purge_expired(&self) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < NOW()")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
