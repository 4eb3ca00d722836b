/// Authorization policies
///
/// Resource-level permission checks for projects and tasks.
///
/// # Permission Model
///
/// | Resource | View | Update / Delete |
/// |----------|------|-----------------|
/// | Project  | any authenticated user | project owner |
/// | Task     | any authenticated user | owner of the task's project, or the assignee |
///
/// Handlers load the entity first (a missing entity is a 404) and only then
/// call [`authorize`], so absence is always reported before denial.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::auth::authorization::{authorize, Action};
/// use taskboard_shared::auth::middleware::AuthContext;
/// use taskboard_shared::repository::Store;
///
/// # async fn example(store: Store, auth: AuthContext) -> Result<(), Box<dyn std::error::Error>> {
/// if let Some(project) = store.projects.find_by_id(42).await? {
///     authorize(auth.user_id, Action::Delete, &project)?;
/// }
/// # Ok(())
/// # }
/// ```

use crate::models::project::{Project, ProjectDetails};
use crate::models::task::TaskDetails;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Caller may not perform the action on the resource
    #[error("You are not allowed to {action} this {resource}")]
    Forbidden {
        action: &'static str,
        resource: &'static str,
    },
}

/// Actions a caller can attempt on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

/// A resource with an access policy
pub trait Authorizable {
    /// Resource name used in denial messages
    const RESOURCE: &'static str;

    /// Whether `user_id` may perform `action` on this resource
    fn permits(&self, user_id: i64, action: Action) -> bool;
}

impl Authorizable for Project {
    const RESOURCE: &'static str = "project";

    fn permits(&self, user_id: i64, action: Action) -> bool {
        match action {
            Action::View => true,
            Action::Update | Action::Delete => self.owner_id == user_id,
        }
    }
}

impl Authorizable for ProjectDetails {
    const RESOURCE: &'static str = "project";

    fn permits(&self, user_id: i64, action: Action) -> bool {
        self.project.permits(user_id, action)
    }
}

impl Authorizable for TaskDetails {
    const RESOURCE: &'static str = "task";

    fn permits(&self, user_id: i64, action: Action) -> bool {
        match action {
            Action::View => true,
            Action::Update | Action::Delete => {
                self.project.owner_id == user_id || self.task.assigned_to == user_id
            }
        }
    }
}

/// Checks whether an actor may perform an action on an entity
pub fn can<R: Authorizable>(user_id: i64, action: Action, entity: &R) -> bool {
    entity.permits(user_id, action)
}

/// Like [`can`], but as a `Result` suitable for `?`
///
/// # Errors
///
/// Returns `AuthzError::Forbidden` when the policy denies the action
pub fn authorize<R: Authorizable>(user_id: i64, action: Action, entity: &R) -> Result<(), AuthzError> {
    if can(user_id, action, entity) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden {
            action: action.as_str(),
            resource: R::RESOURCE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::ProjectSummary;
    use crate::models::task::{Task, TaskPriority, TaskStatus};
    use crate::models::user::UserSummary;
    use chrono::{NaiveDate, Utc};

    const OWNER: i64 = 1;
    const ASSIGNEE: i64 = 2;
    const STRANGER: i64 = 3;

    fn project() -> Project {
        Project {
            id: 10,
            name: "P".to_string(),
            description: None,
            owner_id: OWNER,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn task() -> TaskDetails {
        TaskDetails {
            task: Task {
                id: 100,
                project_id: 10,
                title: "T".to_string(),
                description: None,
                status: TaskStatus::Pending,
                priority: TaskPriority::Low,
                due_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
                assigned_to: ASSIGNEE,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            project: ProjectSummary {
                id: 10,
                name: "P".to_string(),
                owner_id: OWNER,
            },
            assignee: UserSummary {
                id: ASSIGNEE,
                name: "A".to_string(),
                email: "a@example.com".to_string(),
            },
        }
    }

    #[test]
    fn test_project_policy() {
        let project = project();

        for user in [OWNER, ASSIGNEE, STRANGER] {
            assert!(can(user, Action::View, &project));
        }
        assert!(can(OWNER, Action::Update, &project));
        assert!(can(OWNER, Action::Delete, &project));
        assert!(!can(STRANGER, Action::Update, &project));
        assert!(!can(STRANGER, Action::Delete, &project));
    }

    #[test]
    fn test_task_policy_owner_or_assignee() {
        let task = task();

        assert!(can(STRANGER, Action::View, &task));
        assert!(can(OWNER, Action::Update, &task));
        assert!(can(ASSIGNEE, Action::Update, &task));
        assert!(can(ASSIGNEE, Action::Delete, &task));
        assert!(!can(STRANGER, Action::Update, &task));
        assert!(!can(STRANGER, Action::Delete, &task));
    }

    #[test]
    fn test_authorize_error_message() {
        let err = authorize(STRANGER, Action::Delete, &project()).unwrap_err();
        assert_eq!(err.to_string(), "You are not allowed to delete this project");

        assert!(authorize(OWNER, Action::Delete, &project()).is_ok());
    }
}
