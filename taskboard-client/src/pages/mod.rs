/// Page view-models
///
/// Each page owns its form state and the data it shows, fetches on
/// [`mount`](ProjectsPage::mount), re-fetches after every mutation and keeps
/// the last failure in `error` until it is dismissed. Rendering is left to
/// whatever shell drives these types.
///
/// - `login` / `register`: credential forms
/// - `projects`: project list with create and delete
/// - `project_detail`: one project with its tasks and an edit form
/// - `tasks`: filtered task list with create and delete

pub mod login;
pub mod project_detail;
pub mod projects;
pub mod register;
pub mod tasks;

pub use login::LoginPage;
pub use project_detail::ProjectDetailPage;
pub use projects::ProjectsPage;
pub use register::RegisterPage;
pub use tasks::TasksPage;

use crate::error::ClientError;

/// Banner text for a failed call
fn banner(err: &ClientError) -> Option<String> {
    tracing::warn!(error = %err, "Request failed");
    Some(err.message())
}

/// Trimmed text, or None when blank
fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
