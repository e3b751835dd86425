//! In-memory stand-in for the Trello REST API.
//!
//! Objects live in one map per collection (`boards`, `lists`, `cards`, ...)
//! and are addressed the same way the real service addresses them:
//!
//! | route | behaviour |
//! |-------|-----------|
//! | `POST /1/{collection}` | create from a form body, 422 on missing fields |
//! | `GET /1/{collection}/{id}` | the stored object or 404 |
//! | `PUT /1/{collection}/{id}` | merge the form body |
//! | `DELETE /1/{collection}/{id}` | `{"_value": null}` |
//! | `GET /1/{collection}/{id}/{field}` | `{"_value": ...}` |
//! | `PUT /1/{collection}/{id}/{field}` | store `value` |
//!
//! Every route answers 401 unless the request carries `key` and `token`
//! query parameters or an `Authorization` header.

use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub type Object = Map<String, Value>;

#[derive(Debug, Default)]
pub struct Store {
    collections: HashMap<String, HashMap<String, Object>>,
}

impl Store {
    pub fn get(&self, collection: &str, id: &str) -> Option<&Object> {
        self.collections.get(collection)?.get(id)
    }

    /// Insert `object` under a fresh id and return the stored copy.
    pub fn insert(&mut self, collection: &str, mut object: Object) -> Object {
        let id = new_id();
        object.insert("id".to_string(), Value::String(id.clone()));
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id, object.clone());
        object
    }

    fn get_mut(&mut self, collection: &str, id: &str) -> Option<&mut Object> {
        self.collections.get_mut(collection)?.get_mut(id)
    }

    fn remove(&mut self, collection: &str, id: &str) -> Option<Object> {
        self.collections.get_mut(collection)?.remove(id)
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Fields a create must carry, per collection.
fn required_fields(collection: &str) -> &'static [&'static str] {
    match collection {
        "boards" => &["name"],
        "lists" => &["name", "idBoard"],
        "cards" => &["idList"],
        "checklists" => &["idCard"],
        "labels" => &["name", "idBoard"],
        "webhooks" => &["callbackURL", "idModel"],
        _ => &[],
    }
}

pub fn app() -> Router {
    app_with(Db::default())
}

/// Router over an existing store, so tests can seed or inspect it.
pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/1/{collection}", post(create_object))
        .route(
            "/1/{collection}/{id}",
            get(show_object).put(update_object).delete(remove_object),
        )
        .route("/1/{collection}/{id}/{field}", get(show_field).put(update_field))
        .layer(middleware::from_fn(require_auth))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock trello api listening");
    }
    axum::serve(listener, app()).await
}

async fn require_auth(request: Request, next: Next) -> Response {
    let query = request.uri().query().unwrap_or_default();
    let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    let has_key = pairs.iter().any(|(k, _)| k == "key");
    let has_token = pairs.iter().any(|(k, _)| k == "token");
    let has_header = request.headers().contains_key(header::AUTHORIZATION);

    if !(has_header || (has_key && has_token)) {
        debug!(uri = %request.uri(), "rejecting unauthenticated request");
        return (StatusCode::UNAUTHORIZED, "invalid key").into_response();
    }
    next.run(request).await
}

async fn create_object(
    State(db): State<Db>,
    Path(collection): Path<String>,
    body: Bytes,
) -> Response {
    let form = parse_form(&body);
    let missing: Vec<Value> = required_fields(&collection)
        .iter()
        .filter(|field| !form.contains_key(**field))
        .map(|field| {
            json!({"code": "missing_field", "field": field, "resource": collection})
        })
        .collect();
    if !missing.is_empty() {
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"errors": missing})))
            .into_response();
    }

    let created = db.write().await.insert(&collection, form);
    debug!(%collection, id = ?created.get("id"), "created");
    Json(Value::Object(created)).into_response()
}

async fn show_object(
    State(db): State<Db>,
    Path((collection, id)): Path<(String, String)>,
) -> Response {
    match db.read().await.get(&collection, &id) {
        Some(object) => Json(Value::Object(object.clone())).into_response(),
        None => not_found(),
    }
}

async fn update_object(
    State(db): State<Db>,
    Path((collection, id)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    let mut store = db.write().await;
    let Some(object) = store.get_mut(&collection, &id) else {
        return not_found();
    };
    for (key, value) in parse_form(&body) {
        if key != "id" {
            object.insert(key, value);
        }
    }
    Json(Value::Object(object.clone())).into_response()
}

async fn remove_object(
    State(db): State<Db>,
    Path((collection, id)): Path<(String, String)>,
) -> Response {
    match db.write().await.remove(&collection, &id) {
        Some(_) => Json(json!({"_value": null})).into_response(),
        None => not_found(),
    }
}

async fn show_field(
    State(db): State<Db>,
    Path((collection, id, field)): Path<(String, String, String)>,
) -> Response {
    match db.read().await.get(&collection, &id) {
        Some(object) => {
            let value = object.get(&field).cloned().unwrap_or(Value::Null);
            Json(json!({ "_value": value })).into_response()
        }
        None => not_found(),
    }
}

async fn update_field(
    State(db): State<Db>,
    Path((collection, id, field)): Path<(String, String, String)>,
    body: Bytes,
) -> Response {
    let mut form = parse_form(&body);
    let Some(value) = form.remove("value") else {
        return (StatusCode::BAD_REQUEST, "invalid value").into_response();
    };
    let mut store = db.write().await;
    match store.get_mut(&collection, &id) {
        Some(object) => {
            object.insert(field, value);
            Json(Value::Object(object.clone())).into_response()
        }
        None => not_found(),
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"message": "The requested resource was not found."})),
    )
        .into_response()
}

/// Decode a form body; `true`/`false` become booleans.
pub fn parse_form(body: &[u8]) -> Object {
    url::form_urlencoded::parse(body)
        .into_owned()
        .map(|(key, value)| {
            let value = match value.as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => Value::String(value),
            };
            (key, value)
        })
        .collect()
}

/// 24 lowercase hex digits, the shape of a Trello object id.
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()[..24].to_string()
}
