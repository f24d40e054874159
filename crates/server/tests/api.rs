use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::Engine as _;
use http_body_util::BodyExt;
use sea_orm::{ConnectionTrait, Database, Statement};
use serde_json::{Value, json};
use tower::ServiceExt;

use migration::MigratorTrait;

async fn app_with_user() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password, name, currency, theme) \
         VALUES (?, ?, ?, ?, ?)",
        vec![
            "alice".into(),
            "password".into(),
            "Alice".into(),
            "USD".into(),
            "light".into(),
        ],
    ))
    .await
    .unwrap();

    let engine = engine::Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    server::app(engine, db)
}

fn basic_auth(username: &str, password: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {encoded}")
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, basic_auth("alice", "password"))
        .header(header::CONTENT_TYPE, "application/json");
    match body {
        Some(value) => builder.body(Body::from(value.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn requests_without_credentials_are_rejected() {
    let app = app_with_user().await;

    let response = app
        .oneshot(Request::get("/budgets").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let app = app_with_user().await;

    let response = app
        .oneshot(
            Request::get("/budgets")
                .header(header::AUTHORIZATION, basic_auth("alice", "nope"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_returns_the_authenticated_user() {
    let app = app_with_user().await;

    let response = app.oneshot(request("GET", "/user", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["username"], json!("alice"));
    assert_eq!(body["data"]["currency"], json!("USD"));
}

#[tokio::test]
async fn expense_flow_updates_budget_spent() {
    let app = app_with_user().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/categories",
            Some(json!({"name": "Food"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let category = json_body(response).await;
    let category_id = category["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(category["data"]["color"], json!("#3b82f6"));

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/budgets",
            Some(json!({
                "name": "Groceries",
                "total_minor": 100_000,
                "start_date": "2026-08-01T00:00:00Z",
                "end_date": "2026-08-31T00:00:00Z",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let budget = json_body(response).await;
    let budget_id = budget["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(budget["data"]["period"], json!("monthly"));

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            &format!("/budgets/{budget_id}/categories"),
            Some(json!({"category_id": category_id, "allocated_minor": 20_000})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/expenses",
            Some(json!({
                "budget_id": budget_id,
                "category_id": category_id,
                "amount_minor": 4_200,
                "description": "weekly shop",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(request("GET", &format!("/budgets/{budget_id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let budget = json_body(response).await;
    assert_eq!(budget["data"]["categories"][0]["spent_minor"], json!(4_200));
    assert_eq!(budget["data"]["expenses"][0]["amount_minor"], json!(4_200));

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/budgets/{budget_id}/breakdown"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let breakdown = json_body(response).await;
    assert_eq!(breakdown["data"]["total_spent_minor"], json!(4_200));
}

#[tokio::test]
async fn duplicate_category_returns_conflict_envelope() {
    let app = app_with_user().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/categories",
            Some(json!({"name": "Food"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/categories",
            Some(json!({"name": "food"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_body(response).await;
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("Food"));
}

#[tokio::test]
async fn missing_budget_returns_not_found_envelope() {
    let app = app_with_user().await;

    let response = app
        .oneshot(request(
            "GET",
            "/budgets/00000000-0000-0000-0000-000000000000",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn invalid_amount_returns_unprocessable() {
    let app = app_with_user().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/budgets",
            Some(json!({
                "name": "Broken",
                "total_minor": -5,
                "start_date": "2026-08-01T00:00:00Z",
                "end_date": "2026-08-31T00:00:00Z",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
