use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_users, demo_users, User};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json; charset=UTF-8")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder().method(method).uri(uri).body(String::new()).unwrap()
}

// --- list ---

#[tokio::test]
async fn list_users_empty() {
    let resp = app().oneshot(empty_request("GET", "/users")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let users: Vec<User> = body_json(resp).await;
    assert!(users.is_empty());
}

#[tokio::test]
async fn list_users_keeps_seed_order() {
    let resp = app_with_users(demo_users())
        .oneshot(empty_request("GET", "/users"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let users: Vec<User> = body_json(resp).await;
    let ids: Vec<u64> = users.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

// --- create ---

#[tokio::test]
async fn create_user_returns_201_with_next_id() {
    let resp = app_with_users(demo_users())
        .oneshot(json_request(
            "POST",
            "/users",
            r#"{"name":"Cy","email":"cy@x.com","phone":"555"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let user: User = body_json(resp).await;
    assert_eq!(user.id, 4);
    assert_eq!(user.name, "Cy");
}

#[tokio::test]
async fn create_user_normalizes_email() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/users",
            r#"{"name":"Cy","email":" Cy@X.com","phone":"555"}"#,
        ))
        .await
        .unwrap();

    let user: User = body_json(resp).await;
    assert_eq!(user.email, "cy@x.com");
}

#[tokio::test]
async fn create_user_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/users", r#"{"not_name":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- get ---

#[tokio::test]
async fn get_user_with_nested_records() {
    let resp = app_with_users(demo_users())
        .oneshot(empty_request("GET", "/users/1"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json: serde_json::Value = body_json(resp).await;
    assert_eq!(json["company"]["catchPhrase"], "Multi-layered client-server neural-net");
    assert_eq!(json["address"]["city"], "Gwenborough");
}

#[tokio::test]
async fn get_user_not_found() {
    let resp = app().oneshot(empty_request("GET", "/users/42")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_user_bad_id_returns_400() {
    let resp = app().oneshot(empty_request("GET", "/users/not-a-number")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- update ---

#[tokio::test]
async fn update_user_not_found() {
    let resp = app()
        .oneshot(json_request(
            "PUT",
            "/users/42",
            r#"{"id":42,"name":"Nope","email":"n@x.com","phone":"1"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- delete ---

#[tokio::test]
async fn delete_user_not_found() {
    let resp = app().oneshot(empty_request("DELETE", "/users/42")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/users",
            r#"{"name":"Walker","email":"walker@x.com","phone":"555"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: User = body_json(resp).await;
    assert_eq!(created.id, 1);
    let id = created.id;

    // list
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/users"))
        .await
        .unwrap();
    let users: Vec<User> = body_json(resp).await;
    assert_eq!(users, vec![created.clone()]);

    // update: full replacement, id from the path wins
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/users/{id}"),
            r#"{"id":77,"name":"Walker T.","email":"WALKER@X.COM","phone":"556"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: User = body_json(resp).await;
    assert_eq!(updated.id, id);
    assert_eq!(updated.name, "Walker T.");
    assert_eq!(updated.email, "walker@x.com");

    // get
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/users/{id}")))
        .await
        .unwrap();
    let fetched: User = body_json(resp).await;
    assert_eq!(fetched, updated);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/users/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(&body_bytes(resp).await[..], b"{}");

    // get after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/users/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
