/// Integration tests for page view-models against a live server

mod common;

use common::{days_from_today, TestServer, PASSWORD};
use taskboard_client::pages::{
    LoginPage, ProjectDetailPage, ProjectsPage, RegisterPage, TasksPage,
};
use taskboard_client::Route;
use taskboard_shared::models::task::{TaskPriority, TaskStatus};

#[tokio::test]
async fn test_register_page_routes_to_projects() {
    let server = TestServer::start().await;
    let client = server.client();
    let mut page = RegisterPage::new(client.clone());

    page.name = "Grace".to_string();
    page.email = "grace@example.com".to_string();
    page.password = PASSWORD.to_string();
    page.password_confirmation = PASSWORD.to_string();

    assert!(page.submit().await);
    assert!(page.error.is_none());
    assert!(page.password.is_empty());
    assert_eq!(client.session().current_route(), Route::Projects);
}

#[tokio::test]
async fn test_login_page_shows_server_message() {
    let server = TestServer::start().await;
    server.signed_in("Grace", "grace@example.com").await;

    let client = server.client();
    let mut page = LoginPage::new(client.clone());
    page.email = "grace@example.com".to_string();
    page.password = "wrong-password".to_string();

    assert!(!page.submit().await);
    assert_eq!(page.error.as_deref(), Some("Invalid email or password"));
    assert_eq!(client.session().current_route(), Route::Login);

    page.dismiss_error();
    assert!(page.error.is_none());

    page.password = PASSWORD.to_string();
    assert!(page.submit().await);
    assert_eq!(client.session().current_route(), Route::Projects);
}

#[tokio::test]
async fn test_projects_page_create_and_delete_refetch() {
    let server = TestServer::start().await;
    let client = server.signed_in("Grace", "grace@example.com").await;
    let mut page = ProjectsPage::new(client.clone());

    page.mount().await;
    assert!(!page.loading);
    assert!(page.projects.is_empty());

    page.toggle_form();
    page.form.name = "Compiler".to_string();
    assert!(page.create().await);
    assert!(!page.show_form);
    assert!(page.form.name.is_empty());
    assert_eq!(page.projects.len(), 1);
    assert!(page.projects[0].project.description.is_none());

    let id = page.projects[0].project.id;
    page.open(id);
    assert_eq!(client.session().current_route(), Route::ProjectDetail(id));

    assert!(page.delete(id).await);
    assert!(page.projects.is_empty());
}

#[tokio::test]
async fn test_projects_page_validation_banner() {
    let server = TestServer::start().await;
    let client = server.signed_in("Grace", "grace@example.com").await;
    let mut page = ProjectsPage::new(client);

    page.form.name = "   ".to_string();
    assert!(!page.create().await);
    assert_eq!(page.error.as_deref(), Some("The name field is required."));
}

#[tokio::test]
async fn test_project_detail_edit_flow() {
    let server = TestServer::start().await;
    let client = server.signed_in("Grace", "grace@example.com").await;

    let mut list = ProjectsPage::new(client.clone());
    list.form.name = "Compiler".to_string();
    list.form.description = "first cut".to_string();
    list.create().await;
    let id = list.projects[0].project.id;

    let mut page = ProjectDetailPage::new(client.clone(), id);
    page.mount().await;
    assert_eq!(page.form.name, "Compiler");
    assert_eq!(page.form.description, "first cut");
    assert_eq!(page.project.as_ref().and_then(|p| p.tasks.as_ref()).map(Vec::len), Some(0));

    page.start_editing();
    page.form.name = "Compiler 2".to_string();
    page.form.description.clear();
    assert!(page.save().await);
    assert!(!page.editing);

    let project = page.project.as_ref().unwrap();
    assert_eq!(project.project.name, "Compiler 2");
    assert!(project.project.description.is_none());

    page.back();
    assert_eq!(client.session().current_route(), Route::Projects);
}

#[tokio::test]
async fn test_project_detail_forbidden_for_non_owner() {
    let server = TestServer::start().await;
    let owner = server.signed_in("Grace", "grace@example.com").await;
    let stranger = server.signed_in("Alan", "alan@example.com").await;

    let mut list = ProjectsPage::new(owner);
    list.form.name = "Compiler".to_string();
    list.create().await;
    let id = list.projects[0].project.id;

    let mut page = ProjectDetailPage::new(stranger.clone(), id);
    page.mount().await;
    page.start_editing();
    page.form.name = "Mine now".to_string();

    assert!(!page.save().await);
    assert_eq!(
        page.error.as_deref(),
        Some("You are not allowed to update this project")
    );
    // A 403 leaves the session alone
    assert!(stranger.session().is_authenticated().await);
}

#[tokio::test]
async fn test_tasks_page_filters_and_create() {
    let server = TestServer::start().await;
    let client = server.signed_in("Grace", "grace@example.com").await;

    let mut projects = ProjectsPage::new(client.clone());
    projects.form.name = "Compiler".to_string();
    projects.create().await;
    let project_id = projects.projects[0].project.id;

    let mut page = TasksPage::new(client.clone());
    page.mount().await;
    assert_eq!(page.projects.len(), 1);
    assert!(page.tasks.is_empty());

    for (title, priority, due) in [
        ("later", TaskPriority::High, 5),
        ("sooner", TaskPriority::High, 1),
        ("minor", TaskPriority::Low, 2),
    ] {
        page.toggle_form();
        page.form.project_id = project_id.to_string();
        page.form.title = title.to_string();
        page.form.priority = priority;
        page.form.due_date = days_from_today(due);
        assert!(page.create().await, "{:?}", page.error);
        assert!(page.form.title.is_empty());
    }
    assert_eq!(page.tasks.len(), 3);

    page.set_priority_filter(Some(TaskPriority::High)).await;
    let titles: Vec<_> = page.tasks.iter().map(|t| t.task.title.as_str()).collect();
    assert_eq!(titles, vec!["sooner", "later"]);

    page.set_status_filter(Some(TaskStatus::Done)).await;
    assert!(page.tasks.is_empty());

    page.clear_filters().await;
    assert_eq!(page.tasks.len(), 3);

    let id = page.tasks[0].task.id;
    assert!(page.delete(id).await);
    assert_eq!(page.tasks.len(), 2);
}

#[tokio::test]
async fn test_tasks_page_rejects_past_due_date() {
    let server = TestServer::start().await;
    let client = server.signed_in("Grace", "grace@example.com").await;

    let mut projects = ProjectsPage::new(client.clone());
    projects.form.name = "Compiler".to_string();
    projects.create().await;

    let mut page = TasksPage::new(client);
    page.form.project_id = projects.projects[0].project.id.to_string();
    page.form.title = "Too late".to_string();
    page.form.due_date = days_from_today(-1);

    assert!(!page.create().await);
    assert_eq!(
        page.error.as_deref(),
        Some("The due_date field must be a date after or equal to today.")
    );
    assert_eq!(page.form.title, "Too late");
}
