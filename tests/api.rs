//! Requests routed through the full `/v1` router against temp-dir tenants.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use rstest::{fixture, rstest};
use serde_json::{json, Value};
use tempfile::TempDir;
use tenantchat::{app, AppState, Config};
use tower::ServiceExt;

struct Server {
    dir: TempDir,
    app: Router,
}

#[fixture]
fn server() -> Server {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config {
        db_base_path: dir.path().to_path_buf(),
        ..Config::default()
    };
    Server { app: app(AppState { config }), dir }
}

fn request(method: Method, uri: &str, role: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-tenant-id", "acme")
        .header("x-user-id", "u1");
    if let Some(role) = role {
        builder = builder.header("x-user-role", role);
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Status plus the JSON body, `Null` for plain-text error bodies.
async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn init(app: &Router) {
    let (status, _) = send(app, request(Method::POST, "/v1/admin/initsystem", Some("admin"), None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[rstest]
#[tokio::test]
async fn tenant_header_selects_the_store_file(server: Server) {
    init(&server.app).await;

    assert!(server.dir.path().join("acme.db").exists());
    assert!(!server.dir.path().join("default.db").exists());
}

#[rstest]
#[case(None)]
#[case(Some("member"))]
#[tokio::test]
async fn admin_routes_refuse_other_roles(server: Server, #[case] role: Option<&str>) {
    for (method, uri) in [
        (Method::POST, "/v1/admin/initsystem"),
        (Method::GET, "/v1/admin/tables"),
        (Method::GET, "/v1/admin/tables/users"),
    ] {
        let (status, _) = send(&server.app, request(method, uri, role, None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
    }
}

#[rstest]
#[case("admin")]
#[case("superadmin")]
#[tokio::test]
async fn admin_roles_list_tables(server: Server, #[case] role: &str) {
    init(&server.app).await;

    let (status, body) = send(&server.app, request(Method::GET, "/v1/admin/tables", Some(role), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().map(Vec::len), Some(4));
}

#[rstest]
#[tokio::test]
async fn missing_identity_is_unauthorized(server: Server) {
    let anonymous = Request::builder().uri("/v1/chats").body(Body::empty()).unwrap();
    let (status, _) = send(&server.app, anonymous).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[tokio::test]
async fn chat_list_reads_top_and_skip(server: Server) {
    init(&server.app).await;
    for name in ["one", "two", "three"] {
        let (status, _) = send(&server.app, request(Method::POST, "/v1/chats", None, Some(json!({ "name": name })))).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&server.app, request(Method::GET, "/v1/chats?$top=2&$skip=2", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["isPaged"], json!(true));
    assert_eq!(body["pageSize"], json!(2));
    assert_eq!(body["page"], json!(1));

    let (_, body) = send(&server.app, request(Method::GET, "/v1/chats", None, None)).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(3));
}

#[rstest]
#[tokio::test]
async fn unknown_chat_is_not_found(server: Server) {
    init(&server.app).await;

    let (status, _) = send(&server.app, request(Method::GET, "/v1/chats/nope", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test]
async fn member_without_reference_is_a_bad_request(server: Server) {
    init(&server.app).await;

    let (status, _) = send(&server.app, request(Method::POST, "/v1/chats/c1/users", None, Some(json!({})))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &server.app,
        request(Method::POST, "/v1/chats/c1/users", None, Some(json!({ "email": "b@x.com" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[rstest]
#[tokio::test]
async fn email_taken_by_another_user_is_a_conflict(server: Server) {
    init(&server.app).await;
    let (_, a) = send(&server.app, request(Method::POST, "/v1/users", None, Some(json!({ "email": "a@x.com" })))).await;
    let (_, b) = send(&server.app, request(Method::POST, "/v1/users", None, Some(json!({ "email": "b@x.com" })))).await;
    assert_ne!(a["id"], b["id"]);

    let uri = format!("/v1/users/{}", b["id"].as_str().unwrap());
    let (status, _) = send(&server.app, request(Method::PUT, &uri, None, Some(json!({ "email": "a@x.com" })))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}
