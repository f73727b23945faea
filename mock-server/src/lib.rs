use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::IntoResponse,
    routing::{any, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// How long `/slow` waits before answering.
pub const SLOW_DELAY: Duration = Duration::from_millis(500);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u32,
    pub name: String,
}

/// One part as seen by `/upload`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadedPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub size: usize,
    /// Part contents when they are valid UTF-8.
    pub text: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Echo {
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

#[derive(Clone, Default)]
pub struct AppState {
    media_hits: Arc<AtomicUsize>,
}

#[derive(Deserialize)]
pub struct ProxyQuery {
    pub url: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user))
        .route("/count", get(count))
        .route("/greeting", get(greeting))
        .route("/empty", get(empty))
        .route("/status/{code}", get(status))
        .route("/echo", any(echo))
        .route("/upload", post(upload))
        .route("/media/{name}", get(media))
        .route("/Proxy", get(proxy))
        .route("/stats", get(stats))
        .route("/slow", get(slow))
        .with_state(AppState::default())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn users() -> Vec<User> {
    vec![
        User {
            id: 1,
            name: "ada".to_string(),
        },
        User {
            id: 2,
            name: "grace".to_string(),
        },
    ]
}

async fn list_users() -> Json<Vec<User>> {
    Json(users())
}

async fn get_user(Path(id): Path<u32>) -> Result<Json<User>, (StatusCode, Json<Value>)> {
    users()
        .into_iter()
        .find(|u| u.id == id)
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, Json(json!({"error": "no such user"}))))
}

/// A JSON primitive, which clients must not surface as a payload.
async fn count() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], "42")
}

async fn greeting() -> &'static str {
    "hello world"
}

async fn empty() -> StatusCode {
    StatusCode::OK
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, &'static str), StatusCode> {
    let code = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((code, r#"{"ignored":true}"#))
}

async fn echo(method: Method, headers: HeaderMap, body: String) -> Json<Echo> {
    let headers = headers
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
        .collect();
    Json(Echo {
        method: method.to_string(),
        headers,
        body,
    })
}

async fn upload(mut multipart: Multipart) -> Result<Json<Vec<UploadedPart>>, (StatusCode, String)> {
    let mut parts = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
        parts.push(UploadedPart {
            name,
            file_name,
            content_type,
            size: data.len(),
            text: String::from_utf8(data.to_vec()).ok(),
        });
    }
    Ok(Json(parts))
}

async fn media(State(state): State<AppState>, Path(name): Path<String>) -> impl IntoResponse {
    state.media_hits.fetch_add(1, Ordering::SeqCst);
    ([(header::CONTENT_TYPE, OCTET_STREAM)], format!("media:{name}").into_bytes())
}

async fn proxy(State(state): State<AppState>, Query(query): Query<ProxyQuery>) -> impl IntoResponse {
    state.media_hits.fetch_add(1, Ordering::SeqCst);
    ([(header::CONTENT_TYPE, OCTET_STREAM)], format!("proxied:{}", query.url).into_bytes())
}

async fn stats(State(state): State<AppState>) -> Json<Value> {
    Json(json!({"media_hits": state.media_hits.load(Ordering::SeqCst)}))
}

async fn slow() -> &'static str {
    tokio::time::sleep(SLOW_DELAY).await;
    "finally"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serializes_to_json() {
        let user = User {
            id: 1,
            name: "ada".to_string(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json, json!({"id": 1, "name": "ada"}));
    }

    #[test]
    fn uploaded_part_keeps_optional_fields() {
        let part: UploadedPart =
            serde_json::from_str(r#"{"name":"album","file_name":null,"content_type":null,"size":6,"text":"summer"}"#)
                .unwrap();
        assert_eq!(part.name, "album");
        assert!(part.file_name.is_none());
        assert_eq!(part.text.as_deref(), Some("summer"));
    }

    #[test]
    fn fixture_users_have_unique_ids() {
        let users = users();
        assert_eq!(users.len(), 2);
        assert_ne!(users[0].id, users[1].id);
    }
}
