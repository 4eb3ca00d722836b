/// Typed wrappers over the API endpoints
///
/// - `auth`: register, login, logout, current user
/// - `projects`: project CRUD
/// - `tasks`: task CRUD and filtered listing

pub mod auth;
pub mod projects;
pub mod tasks;
