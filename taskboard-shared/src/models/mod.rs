/// Domain models for Taskboard
///
/// This module contains the persisted entities and the input types used to
/// create and update them. Persistence itself lives behind the traits in
/// [`crate::repository`].
///
/// # Models
///
/// - `user`: User accounts (project owners, task assignees)
/// - `project`: Projects owned by a user
/// - `task`: Tasks belonging to a project and assigned to a user
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::project::CreateProject;
/// use taskboard_shared::repository::Store;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Store::memory();
///
/// let project = store
///     .projects
///     .create(CreateProject {
///         name: "Website relaunch".to_string(),
///         description: None,
///         owner_id: 1,
///     })
///     .await?;
/// # Ok(())
/// # }
/// ```

pub mod project;
pub mod task;
pub mod user;

/// Error returned when a string does not name a known enum variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: '{value}'")]
pub struct ParseEnumError {
    /// Which enum was being parsed (e.g. "status")
    pub kind: &'static str,

    /// The rejected input
    pub value: String,
}
