use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, Db};
use serde_json::{json, Value};
use tower::ServiceExt;

const AUTH: &str = "key=app-key&token=user-token";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn form_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body.to_string())
        .unwrap()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_credentials_return_401() {
    let resp = app()
        .oneshot(get_request("/1/boards/5f1c0c0e8a4b2d3e4f5a6b7c"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app()
        .oneshot(get_request("/1/boards/5f1c0c0e8a4b2d3e4f5a6b7c?key=app-key"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn authorization_header_is_accepted() {
    let req = Request::builder()
        .uri("/1/boards/5f1c0c0e8a4b2d3e4f5a6b7c")
        .header(http::header::AUTHORIZATION, "token abc")
        .body(String::new())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- create ---

#[tokio::test]
async fn create_list_returns_object_with_id() {
    let resp = app()
        .oneshot(form_request(
            "POST",
            &format!("/1/lists?{AUTH}"),
            "name=To+do&idBoard=b1&closed=false",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let list = body_json(resp).await;
    assert_eq!(list["name"], "To do");
    assert_eq!(list["closed"], false);
    assert_eq!(list["id"].as_str().unwrap().len(), 24);
}

#[tokio::test]
async fn create_without_required_field_returns_422() {
    let resp = app()
        .oneshot(form_request("POST", &format!("/1/lists?{AUTH}"), "name=To+do"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(resp).await;
    assert_eq!(
        body["errors"],
        json!([{"code": "missing_field", "field": "idBoard", "resource": "lists"}])
    );
}

// --- show / update / remove ---

#[tokio::test]
async fn unknown_id_returns_404_message() {
    let resp = app()
        .oneshot(get_request(&format!("/1/cards/000000000000000000000000?{AUTH}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "The requested resource was not found.");
}

#[tokio::test]
async fn update_merges_and_field_routes_read_back() {
    let db = Db::default();
    let id = {
        let mut object = serde_json::Map::new();
        object.insert("name".into(), json!("Roadmap"));
        let created = db.write().await.insert("boards", object);
        created["id"].as_str().unwrap().to_string()
    };

    let resp = app_with(db.clone())
        .oneshot(form_request(
            "PUT",
            &format!("/1/boards/{id}?{AUTH}"),
            "id=other&desc=Q3&closed=true",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let board = body_json(resp).await;
    assert_eq!(board["id"], id.as_str());
    assert_eq!(board["desc"], "Q3");
    assert_eq!(board["closed"], true);

    let resp = app_with(db.clone())
        .oneshot(form_request("PUT", &format!("/1/boards/{id}/name?{AUTH}"), "value=Plans"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app_with(db.clone())
        .oneshot(get_request(&format!("/1/boards/{id}/name?{AUTH}")))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await, json!({"_value": "Plans"}));

    let resp = app_with(db.clone())
        .oneshot(get_request(&format!("/1/boards/{id}/starred?{AUTH}")))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await, json!({"_value": null}));
}

#[tokio::test]
async fn remove_then_show_returns_404() {
    let db = Db::default();
    let id = {
        let created = db.write().await.insert("cards", serde_json::Map::new());
        created["id"].as_str().unwrap().to_string()
    };

    let resp = app_with(db.clone())
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/1/cards/{id}?{AUTH}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"_value": null}));

    let resp = app_with(db)
        .oneshot(get_request(&format!("/1/cards/{id}?{AUTH}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
