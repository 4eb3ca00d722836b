/// Repository layer
///
/// Each entity is reached through an explicit repository trait. Handlers
/// never talk to a connection pool directly: they receive a [`Store`] handle
/// holding one implementation of every trait.
///
/// # Implementations
///
/// - [`postgres`]: sqlx-backed repositories over a `PgPool`
/// - [`memory`]: in-process tables with the same semantics, used by tests
///   and by `DATABASE_URL=memory://` local runs
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::repository::Store;
/// use taskboard_shared::models::task::TaskFilter;
///
/// # async fn example(pool: sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let store = Store::postgres(pool);
///
/// let tasks = store.tasks.list(&TaskFilter::for_project(42)).await?;
/// println!("{} tasks", tasks.len());
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::project::{CreateProject, Project, ProjectDetails, UpdateProject};
use crate::models::task::{CreateTask, Task, TaskDetails, TaskFilter, UpdateTask};
use crate::models::user::{CreateUser, User};

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint was violated (e.g. duplicate email)
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A referenced row does not exist
    #[error("Referenced row does not exist: {0}")]
    ForeignKeyViolation(String),

    /// Underlying database error
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation(constraint);
            }
        }
        StoreError::Database(err)
    }
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Access to user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user; fails with `UniqueViolation` on a taken email
    async fn create(&self, data: CreateUser) -> StoreResult<User>;

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>>;

    /// Case-insensitive email lookup
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn exists(&self, id: i64) -> StoreResult<bool>;
}

/// Access to projects
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// All projects with owner summaries, newest first
    async fn list(&self) -> StoreResult<Vec<ProjectDetails>>;

    /// Projects owned by one user, newest first
    async fn list_by_owner(&self, owner_id: i64) -> StoreResult<Vec<ProjectDetails>>;

    /// One project with its owner summary (tasks are not loaded)
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<ProjectDetails>>;

    async fn exists(&self, id: i64) -> StoreResult<bool>;

    async fn create(&self, data: CreateProject) -> StoreResult<Project>;

    /// Returns None if the project doesn't exist
    async fn update(&self, id: i64, data: UpdateProject) -> StoreResult<Option<Project>>;

    /// Deletes the project and its tasks; false if nothing was deleted
    async fn delete(&self, id: i64) -> StoreResult<bool>;
}

/// Access to tasks
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Tasks matching every filter field, ordered by due date then id
    async fn list(&self, filter: &TaskFilter) -> StoreResult<Vec<TaskDetails>>;

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<TaskDetails>>;

    async fn create(&self, data: CreateTask) -> StoreResult<Task>;

    /// Returns None if the task doesn't exist
    async fn update(&self, id: i64, data: UpdateTask) -> StoreResult<Option<Task>>;

    /// False if nothing was deleted
    async fn delete(&self, id: i64) -> StoreResult<bool>;
}

/// Denylist of access tokens invalidated before their expiry
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Records a token id as revoked until `expires_at`
    async fn revoke(&self, token_id: Uuid, expires_at: DateTime<Utc>) -> StoreResult<()>;

    async fn is_revoked(&self, token_id: Uuid) -> StoreResult<bool>;

    /// Drops entries whose tokens have expired anyway; returns how many
    async fn purge_expired(&self) -> StoreResult<u64>;
}

#[derive(Clone)]
enum Backend {
    Postgres(PgPool),
    Memory,
}

/// Handle bundling one implementation of every repository
///
/// Cheap to clone; all repositories are behind `Arc`.
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn UserRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub tasks: Arc<dyn TaskRepository>,
    pub tokens: Arc<dyn TokenRepository>,
    backend: Backend,
}

impl Store {
    /// Builds a store over a Postgres pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(postgres::PgUserRepository::new(pool.clone())),
            projects: Arc::new(postgres::PgProjectRepository::new(pool.clone())),
            tasks: Arc::new(postgres::PgTaskRepository::new(pool.clone())),
            tokens: Arc::new(postgres::PgTokenRepository::new(pool.clone())),
            backend: Backend::Postgres(pool),
        }
    }

    /// Builds an empty in-process store
    pub fn memory() -> Self {
        let tables = Arc::new(memory::MemoryStore::new());
        Self {
            users: tables.clone(),
            projects: tables.clone(),
            tasks: tables.clone(),
            tokens: tables,
            backend: Backend::Memory,
        }
    }

    /// Name of the backing store, for health reporting
    pub fn kind(&self) -> &'static str {
        match self.backend {
            Backend::Postgres(_) => "postgres",
            Backend::Memory => "memory",
        }
    }

    /// Verifies the backing store is reachable
    pub async fn ping(&self) -> StoreResult<()> {
        match &self.backend {
            Backend::Postgres(pool) => Ok(crate::db::pool::health_check(pool).await?),
            Backend::Memory => Ok(()),
        }
    }
}
