/// Integration tests for project endpoints

mod common;

use axum::http::{Method, StatusCode};
use common::TestContext;
use serde_json::json;

#[tokio::test]
async fn test_create_project_requires_name() {
    let ctx = TestContext::new();
    let (_, token) = ctx.create_user("Grace", "grace@example.com").await;

    let response = ctx
        .post("/v1/projects", &token, json!({ "description": "no name" }))
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.error_fields(), vec!["name".to_string()]);
    assert_eq!(response.body["message"], "The name field is required.");
}

#[tokio::test]
async fn test_create_project_without_description() {
    let ctx = TestContext::new();
    let (user, token) = ctx.create_user("Grace", "grace@example.com").await;

    let response = ctx
        .post("/v1/projects", &token, json!({ "name": "Compiler" }))
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["message"], "Project created successfully");

    let project = &response.body["data"];
    assert_eq!(project["name"], "Compiler");
    assert!(project["description"].is_null());
    assert_eq!(project["owner_id"], user.id);
    assert_eq!(project["owner"]["email"], "grace@example.com");
}

#[tokio::test]
async fn test_create_project_length_limits() {
    let ctx = TestContext::new();
    let (_, token) = ctx.create_user("Grace", "grace@example.com").await;

    let response = ctx
        .post(
            "/v1/projects",
            &token,
            json!({ "name": "n".repeat(256), "description": "d".repeat(2001) }),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.error_fields(),
        vec!["name".to_string(), "description".to_string()]
    );
}

#[tokio::test]
async fn test_list_projects_newest_first_with_owner() {
    let ctx = TestContext::new();
    let (_, grace) = ctx.create_user("Grace", "grace@example.com").await;
    let (_, alan) = ctx.create_user("Alan", "alan@example.com").await;

    ctx.create_project(&grace, "First").await;
    ctx.create_project(&alan, "Second").await;

    let response = ctx.get("/v1/projects", &grace).await;
    assert_eq!(response.status, StatusCode::OK);

    let projects = response.body["data"].as_array().unwrap();
    let names: Vec<_> = projects.iter().map(|p| p["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Second", "First"]);
    assert_eq!(projects[0]["owner"]["name"], "Alan");
    assert!(projects[0].get("tasks").is_none());
}

#[tokio::test]
async fn test_get_missing_project_is_404_without_data() {
    let ctx = TestContext::new();
    let (_, token) = ctx.create_user("Grace", "grace@example.com").await;

    let response = ctx.get("/v1/projects/999", &token).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Project not found");
    assert!(response.body.get("data").is_none());

    let non_numeric = ctx.get("/v1/projects/abc", &token).await;
    assert_eq!(non_numeric.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_project_includes_tasks() {
    let ctx = TestContext::new();
    let (user, token) = ctx.create_user("Grace", "grace@example.com").await;
    let project_id = ctx.create_project(&token, "Compiler").await;
    ctx.create_task(&token, project_id, user.id, json!({ "title": "Parser" }))
        .await;

    let response = ctx.get(&format!("/v1/projects/{}", project_id), &token).await;

    assert_eq!(response.status, StatusCode::OK);
    let tasks = response.body["data"]["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Parser");
    assert_eq!(tasks[0]["assignee"]["id"], user.id);
}

#[tokio::test]
async fn test_non_owner_cannot_update_or_delete() {
    let ctx = TestContext::new();
    let (_, owner) = ctx.create_user("Grace", "grace@example.com").await;
    let (_, stranger) = ctx.create_user("Alan", "alan@example.com").await;
    let project_id = ctx.create_project(&owner, "Compiler").await;
    let uri = format!("/v1/projects/{}", project_id);

    let update = ctx.put(&uri, &stranger, json!({ "name": "Hijacked" })).await;
    assert_eq!(update.status, StatusCode::FORBIDDEN);
    assert_eq!(update.body["error"], "forbidden");

    let delete = ctx.delete(&uri, &stranger).await;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);

    // Still readable by anyone and unchanged
    let read = ctx.get(&uri, &stranger).await;
    assert_eq!(read.status, StatusCode::OK);
    assert_eq!(read.body["data"]["name"], "Compiler");
}

#[tokio::test]
async fn test_missing_project_is_404_before_403() {
    let ctx = TestContext::new();
    let (_, token) = ctx.create_user("Grace", "grace@example.com").await;

    let response = ctx
        .put("/v1/projects/42", &token, json!({ "name": "x" }))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mistyped_body_rejected_before_lookup() {
    let ctx = TestContext::new();
    let (_, token) = ctx.create_user("Grace", "grace@example.com").await;

    let response = ctx
        .put("/v1/projects/999", &token, json!({ "name": 5 }))
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "validation_error");
    assert_eq!(response.error_fields(), vec!["body"]);
}

#[tokio::test]
async fn test_owner_updates_partially() {
    let ctx = TestContext::new();
    let (_, token) = ctx.create_user("Grace", "grace@example.com").await;

    let created = ctx
        .post(
            "/v1/projects",
            &token,
            json!({ "name": "Compiler", "description": "v1" }),
        )
        .await;
    let uri = format!("/v1/projects/{}", created.body["data"]["id"]);

    let renamed = ctx.put(&uri, &token, json!({ "name": "Compiler 2" })).await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.body["message"], "Project updated successfully");
    assert_eq!(renamed.body["data"]["name"], "Compiler 2");
    assert_eq!(renamed.body["data"]["description"], "v1");

    let cleared = ctx
        .send(
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({ "description": null })),
        )
        .await;
    assert_eq!(cleared.status, StatusCode::OK);
    assert!(cleared.body["data"]["description"].is_null());
    assert_eq!(cleared.body["data"]["name"], "Compiler 2");

    let blank = ctx.put(&uri, &token, json!({ "name": "" })).await;
    assert_eq!(blank.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_delete_twice_and_cascade() {
    let ctx = TestContext::new();
    let (user, token) = ctx.create_user("Grace", "grace@example.com").await;
    let project_id = ctx.create_project(&token, "Compiler").await;
    let task_id = ctx.create_task(&token, project_id, user.id, json!({})).await;
    let uri = format!("/v1/projects/{}", project_id);

    let first = ctx.delete(&uri, &token).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["message"], "Project deleted successfully");

    let second = ctx.delete(&uri, &token).await;
    assert_eq!(second.status, StatusCode::NOT_FOUND);

    let task = ctx.get(&format!("/v1/tasks/{}", task_id), &token).await;
    assert_eq!(task.status, StatusCode::NOT_FOUND);
}
