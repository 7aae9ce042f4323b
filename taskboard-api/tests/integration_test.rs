/// Integration tests for the Taskboard API
///
/// These tests drive the full router over the in-memory store:
/// - Project and task lifecycle
/// - Ownership isolation between users, under both status policies
/// - Cascade delete
/// - Validation and partial updates
/// - Routing edge cases, health and security headers

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{id_of, read_json, TestContext, TEST_SECRET};
use serde_json::json;
use taskboard_api::config::Config;
use taskboard_shared::store::Store;
use uuid::Uuid;

#[tokio::test]
async fn test_full_scenario() {
    let ctx = TestContext::new();
    let ada = ctx.signup("Ada", "ada@example.com").await;

    let project = ctx.create_project(&ada, "Launch").await;
    let project_id = id_of(&project);
    assert_eq!(project["name"], "Launch");
    assert_eq!(project["ownerId"], ada.id.as_str());

    let task = ctx.create_task(&ada, &project_id, "Write copy", json!({})).await;
    let task_id = id_of(&task);
    assert_eq!(task["status"], "todo");
    assert_eq!(task["priority"], "medium");
    assert_eq!(task["description"], "");
    assert_eq!(task["projectId"], project_id.as_str());
    assert!(task["dueDate"].is_null());

    let (status, tasks) = ctx.list_tasks(&ada, &project_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tasks.as_array().unwrap().len(), 1);

    let (status, updated) = ctx
        .put(
            &format!("/api/tasks/{}", task_id),
            &ada.token,
            json!({ "status": "in-progress" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "in-progress");
    assert_eq!(updated["title"], "Write copy");

    let (status, body) = ctx.delete(&format!("/api/tasks/{}", task_id), &ada.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task deleted successfully");

    let (_, tasks) = ctx.list_tasks(&ada, &project_id).await;
    assert!(tasks.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_project_round_trip_and_listing() {
    let ctx = TestContext::new();
    let ada = ctx.signup("Ada", "ada@example.com").await;
    let bob = ctx.signup("Bob", "bob@example.com").await;

    let first = ctx.create_project(&ada, "First").await;
    let second = ctx.create_project(&ada, "Second").await;
    ctx.create_project(&bob, "Bob's").await;

    let (status, fetched) = ctx
        .get(&format!("/api/projects/{}", id_of(&first)), &ada.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, first);

    let (status, list) = ctx.get("/api/projects", &ada.token).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Second", "First"]);
    assert_eq!(list[0], second);
}

#[tokio::test]
async fn test_project_name_is_required() {
    let ctx = TestContext::new();
    let ada = ctx.signup("Ada", "ada@example.com").await;

    let (status, body) = ctx
        .post("/api/projects", Some(&ada.token), json!({ "name": "   " }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "name");
}

async fn assert_isolated(ctx: &TestContext, expected: StatusCode) {
    let ada = ctx.signup("Ada", "ada@example.com").await;
    let eve = ctx.signup("Eve", "eve@example.com").await;

    let project = ctx.create_project(&ada, "Secret").await;
    let project_id = id_of(&project);
    let task = ctx.create_task(&ada, &project_id, "Hidden", json!({})).await;
    let task_id = id_of(&task);

    let attempts = vec![
        ctx.get(&format!("/api/projects/{}", project_id), &eve.token).await,
        ctx.list_tasks(&eve, &project_id).await,
        ctx.post(
            "/api/tasks",
            Some(&eve.token),
            json!({ "projectId": project_id, "title": "Injected" }),
        )
        .await,
        ctx.put(
            &format!("/api/tasks/{}", task_id),
            &eve.token,
            json!({ "title": "Defaced" }),
        )
        .await,
        ctx.delete(&format!("/api/tasks/{}", task_id), &eve.token).await,
        ctx.delete(&format!("/api/projects/{}", project_id), &eve.token).await,
    ];

    for (status, body) in attempts {
        assert_eq!(status, expected, "body: {}", body);
        assert_eq!(body["error"], "not_authorized");
    }

    let (_, list) = ctx.get("/api/projects", &eve.token).await;
    assert!(list.as_array().unwrap().is_empty());

    let (status, tasks) = ctx.list_tasks(&ada, &project_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tasks.as_array().unwrap().len(), 1);
    assert_eq!(tasks[0]["title"], "Hidden");
}

#[tokio::test]
async fn test_cross_user_access_is_not_authorized() {
    assert_isolated(&TestContext::new(), StatusCode::UNAUTHORIZED).await;
}

#[tokio::test]
async fn test_cross_user_access_with_forbidden_policy() {
    let mut config = Config::with_secret(TEST_SECRET);
    config.api.forbidden_status = 403;

    assert_isolated(&TestContext::with_config(config), StatusCode::FORBIDDEN).await;
}

#[tokio::test]
async fn test_delete_project_cascades_to_tasks() {
    let ctx = TestContext::new();
    let ada = ctx.signup("Ada", "ada@example.com").await;

    let doomed = ctx.create_project(&ada, "Doomed").await;
    let kept = ctx.create_project(&ada, "Kept").await;

    let mut doomed_tasks = Vec::new();
    for title in ["One", "Two", "Three"] {
        let task = ctx.create_task(&ada, &id_of(&doomed), title, json!({})).await;
        doomed_tasks.push(Uuid::parse_str(&id_of(&task)).unwrap());
    }
    ctx.create_task(&ada, &id_of(&kept), "Survivor", json!({})).await;

    let (status, body) = ctx
        .delete(&format!("/api/projects/{}", id_of(&doomed)), &ada.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Project deleted successfully");

    for id in doomed_tasks {
        assert!(ctx.store.find_task(id).await.unwrap().is_none());

        let (status, _) = ctx
            .put(&format!("/api/tasks/{}", id), &ada.token, json!({ "title": "x" }))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    let (status, _) = ctx
        .get(&format!("/api/projects/{}", id_of(&doomed)), &ada.token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, survivors) = ctx.list_tasks(&ada, &id_of(&kept)).await;
    assert_eq!(survivors.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_enum_is_rejected_and_nothing_persisted() {
    let ctx = TestContext::new();
    let ada = ctx.signup("Ada", "ada@example.com").await;
    let project_id = id_of(&ctx.create_project(&ada, "Launch").await);

    let (status, body) = ctx
        .post(
            "/api/tasks",
            Some(&ada.token),
            json!({ "projectId": project_id, "title": "Bad", "status": "blocked" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "status");

    let (_, tasks) = ctx.list_tasks(&ada, &project_id).await;
    assert!(tasks.as_array().unwrap().is_empty());

    let task = ctx.create_task(&ada, &project_id, "Good", json!({})).await;
    let (status, _) = ctx
        .put(
            &format!("/api/tasks/{}", id_of(&task)),
            &ada.token,
            json!({ "priority": "urgent" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, tasks) = ctx.list_tasks(&ada, &project_id).await;
    assert_eq!(tasks[0]["priority"], "medium");
}

#[tokio::test]
async fn test_partial_update_preserves_other_fields() {
    let ctx = TestContext::new();
    let ada = ctx.signup("Ada", "ada@example.com").await;
    let project_id = id_of(&ctx.create_project(&ada, "Launch").await);

    let task = ctx
        .create_task(
            &ada,
            &project_id,
            "Draft",
            json!({
                "description": "First pass",
                "priority": "high",
                "dueDate": "2025-06-01",
            }),
        )
        .await;
    assert_eq!(task["dueDate"], "2025-06-01T00:00:00Z");

    let uri = format!("/api/tasks/{}", id_of(&task));

    let (status, updated) = ctx.put(&uri, &ada.token, json!({ "status": "done" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "done");
    assert_eq!(updated["title"], "Draft");
    assert_eq!(updated["description"], "First pass");
    assert_eq!(updated["priority"], "high");
    assert_eq!(updated["dueDate"], task["dueDate"]);
    assert_eq!(updated["createdAt"], task["createdAt"]);

    let (status, cleared) = ctx
        .put(&uri, &ada.token, json!({ "dueDate": null, "description": null }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(cleared["dueDate"].is_null());
    assert_eq!(cleared["description"], "");
    assert_eq!(cleared["status"], "done");

    let (status, _) = ctx.put(&uri, &ada.token, json!({ "title": null })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_cannot_move_task_between_projects() {
    let ctx = TestContext::new();
    let ada = ctx.signup("Ada", "ada@example.com").await;
    let source = id_of(&ctx.create_project(&ada, "Source").await);
    let target = id_of(&ctx.create_project(&ada, "Target").await);

    let task = ctx.create_task(&ada, &source, "Stay", json!({})).await;

    let (status, updated) = ctx
        .put(
            &format!("/api/tasks/{}", id_of(&task)),
            &ada.token,
            json!({ "projectId": target, "title": "Still here" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["projectId"], source.as_str());
    assert_eq!(updated["title"], "Still here");
}

#[tokio::test]
async fn test_missing_and_malformed_ids_are_not_found() {
    let ctx = TestContext::new();
    let ada = ctx.signup("Ada", "ada@example.com").await;
    let missing = Uuid::new_v4();

    let cases = vec![
        (ctx.get(&format!("/api/projects/{}", missing), &ada.token).await, "Project not found"),
        (ctx.get("/api/projects/not-a-uuid", &ada.token).await, "Project not found"),
        (ctx.list_tasks(&ada, &missing.to_string()).await, "Project not found"),
        (
            ctx.put(&format!("/api/tasks/{}", missing), &ada.token, json!({ "title": "x" }))
                .await,
            "Task not found",
        ),
        (ctx.delete("/api/tasks/42", &ada.token).await, "Task not found"),
        (
            ctx.post(
                "/api/tasks",
                Some(&ada.token),
                json!({ "projectId": missing, "title": "Orphan" }),
            )
            .await,
            "Project not found",
        ),
    ];

    for ((status, body), message) in cases {
        assert_eq!(status, StatusCode::NOT_FOUND, "body: {}", body);
        assert_eq!(body["error"], "not_found");
        assert_eq!(body["message"], message);
    }
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let ctx = TestContext::new();
    let ada = ctx.signup("Ada", "ada@example.com").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/projects")
        .header(header::AUTHORIZATION, format!("Bearer {}", ada.token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let (status, body) = read_json(ctx.send(request).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_unknown_route_is_json_not_found() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .uri("/api/nothing-here")
        .body(Body::empty())
        .unwrap();

    let (status, body) = read_json(ctx.send(request).await).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_health_and_security_headers() {
    let ctx = TestContext::new();

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = ctx.send(request).await;

    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
    assert!(response.headers().get("strict-transport-security").is_none());

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn test_empty_base_path_serves_routes_at_root() {
    let mut config = Config::with_secret(TEST_SECRET);
    config.api.base_path = String::new();
    let ctx = TestContext::with_config(config);

    let (status, body) = ctx
        .post(
            "/auth/signup",
            None,
            json!({ "name": "Ada", "email": "ada@example.com", "password": "secret123" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let token = body["token"].as_str().unwrap();
    let (status, _) = ctx.get("/projects", token).await;
    assert_eq!(status, StatusCode::OK);
}
