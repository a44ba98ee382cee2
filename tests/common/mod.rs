#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use objective_tracker::api::ApiClient;
use objective_tracker::config::AppConfig;
use objective_tracker::session::Session;

const SECRET: &[u8] = b"mock-backend-secret";
pub const PASSWORD: &str = "secret";

/// One request as seen by the mock backend
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub exp: usize,
}

/// Mutable backend data plus the request log
pub struct BackendState {
    pub requests: Mutex<Vec<RecordedRequest>>,
    pub users: Mutex<Vec<Value>>,
    pub objectives: Mutex<Vec<Value>>,
    pub comments: Mutex<Vec<Value>>,
    pub failing_prefix: Mutex<Option<String>>,
    next_id: AtomicI64,
}

impl BackendState {
    fn seeded() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            users: Mutex::new(vec![
                json!({"id": 1, "username": "admin", "role": "ADMIN", "password": PASSWORD}),
                json!({"id": 2, "username": "alice", "role": "CONSULTANT", "password": PASSWORD}),
                json!({"id": 3, "username": "bob", "role": "CONSULTANT", "password": PASSWORD}),
            ]),
            objectives: Mutex::new(vec![
                json!({
                    "id": 10, "userId": 2, "annee": 2025,
                    "description": "Get AWS certified", "status": "Atteint",
                    "createdAt": "2025-01-15T09:30:00.000Z", "validatedbyadmin": false,
                    "commentaires": [{"id": 100, "contenu": "Exam booked"}]
                }),
                json!({
                    "id": 11, "userId": 2, "annee": 2025,
                    "description": "Mentor a junior", "status": "En cours",
                    "createdAt": "2025-02-01T10:00:00.000Z", "validatedbyadmin": false
                }),
                json!({
                    "id": 12, "userId": 3, "annee": 2024,
                    "description": "Lead a workshop", "status": "En cours",
                    "validatedbyadmin": null
                }),
            ]),
            comments: Mutex::new(vec![json!({
                "id": 100, "objectiveId": 10, "contenu": "Exam booked",
                "createdAt": "2025-03-01T08:00:00.000Z",
                "user": {"id": 2, "username": "alice", "role": "CONSULTANT"}
            })]),
            failing_prefix: Mutex::new(None),
            next_id: AtomicI64::new(1000),
        }
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

/// Mock of the objectives backend on a free local port
pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<BackendState>,
}

impl MockBackend {
    pub async fn start() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);
        let state = Arc::new(BackendState::seeded());

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind {}", base_url))?;
        let app = router(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { base_url, state })
    }

    /// Session and HTTP client pointed at this backend
    pub fn client(&self) -> Result<(Session, Arc<ApiClient>)> {
        let config = AppConfig::development().with_base_url(&self.base_url);
        let session = Session::new();
        let client = ApiClient::new(&config, session.clone())?;
        Ok((session, Arc::new(client)))
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    /// Answer 500 to every request whose path starts with `prefix`
    pub fn fail(&self, prefix: &str) {
        *self.state.failing_prefix.lock().unwrap() = Some(prefix.to_string());
    }

    pub fn recover(&self) {
        *self.state.failing_prefix.lock().unwrap() = None;
    }

    pub fn objective(&self, id: i64) -> Option<Value> {
        self.state
            .objectives
            .lock()
            .unwrap()
            .iter()
            .find(|o| o["id"] == id)
            .cloned()
    }
}

pub fn token_for(id: i64, username: &str, role: &str) -> String {
    let claims = TokenClaims {
        id,
        username: username.to_string(),
        role: role.to_string(),
        exp: 4_102_444_800,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).expect("encode token")
}

fn router(state: Arc<BackendState>) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/users", get(list_users))
        .route("/users/:id", delete(delete_user))
        .route("/objectifs/mine/:year", get(my_objectives))
        .route("/objectifs/admin/multiple", post(assign))
        .route("/objectifs/commentaire/:id", put(update_comment).delete(delete_comment))
        .route("/objectifs/:id/valider", put(validate))
        .route("/objectifs/:id/commentaires", get(list_comments).post(add_comment))
        .route("/objectifs/:id/:year", get(user_objectives))
        .layer(middleware::from_fn_with_state(state.clone(), record_and_authenticate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

async fn record_and_authenticate(
    State(state): State<Arc<BackendState>>,
    mut request: Request,
    next: Next,
) -> Response {
    // Scoped so no borrow of the request lives across an await
    let recorded = {
        let header_value = |name: header::HeaderName| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        RecordedRequest {
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            authorization: header_value(header::AUTHORIZATION),
            content_type: header_value(header::CONTENT_TYPE),
        }
    };
    state.requests.lock().unwrap().push(recorded.clone());

    let failing = state.failing_prefix.lock().unwrap().clone();
    if failing.is_some_and(|prefix| recorded.path.starts_with(&prefix)) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable");
    }

    if recorded.path == "/auth/login" {
        return next.run(request).await;
    }

    let Some(token) = recorded.authorization.as_deref().and_then(|h| h.strip_prefix("Bearer ")) else {
        return error(StatusCode::UNAUTHORIZED, "Missing token");
    };
    match decode::<TokenClaims>(token, &DecodingKey::from_secret(SECRET), &Validation::default()) {
        Ok(data) => {
            request.extensions_mut().insert(data.claims);
            next.run(request).await
        }
        Err(_) => error(StatusCode::UNAUTHORIZED, "Invalid token"),
    }
}

fn require_admin(caller: &TokenClaims) -> Result<(), Response> {
    if caller.role == "ADMIN" {
        Ok(())
    } else {
        Err(error(StatusCode::FORBIDDEN, "Admin access required"))
    }
}

async fn login(State(state): State<Arc<BackendState>>, Json(body): Json<Value>) -> Response {
    let users = state.users.lock().unwrap();
    let found = users
        .iter()
        .find(|u| u["username"] == body["username"] && u["password"] == body["password"]);

    match found {
        Some(user) => {
            let token = token_for(
                user["id"].as_i64().unwrap_or_default(),
                user["username"].as_str().unwrap_or_default(),
                user["role"].as_str().unwrap_or_default(),
            );
            Json(json!({ "token": token })).into_response()
        }
        None => error(StatusCode::UNAUTHORIZED, "Invalid credentials"),
    }
}

async fn register(
    State(state): State<Arc<BackendState>>,
    Extension(caller): Extension<TokenClaims>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = require_admin(&caller) {
        return denied;
    }
    let mut users = state.users.lock().unwrap();
    if users.iter().any(|u| u["username"] == body["username"]) {
        return error(StatusCode::CONFLICT, "Username already taken");
    }
    let id = state.next_id();
    users.push(json!({
        "id": id,
        "username": body["username"],
        "password": body["password"],
        "role": body["role"],
    }));
    (StatusCode::CREATED, Json(json!({ "message": "User created", "id": id }))).into_response()
}

async fn list_users(State(state): State<Arc<BackendState>>, Extension(caller): Extension<TokenClaims>) -> Response {
    if let Err(denied) = require_admin(&caller) {
        return denied;
    }
    let users: Vec<Value> = state
        .users
        .lock()
        .unwrap()
        .iter()
        .map(|u| json!({ "id": u["id"], "username": u["username"], "role": u["role"] }))
        .collect();
    Json(users).into_response()
}

async fn delete_user(
    State(state): State<Arc<BackendState>>,
    Extension(caller): Extension<TokenClaims>,
    Path(id): Path<i64>,
) -> Response {
    if let Err(denied) = require_admin(&caller) {
        return denied;
    }
    let mut users = state.users.lock().unwrap();
    let before = users.len();
    users.retain(|u| u["id"] != id);
    if users.len() == before {
        return error(StatusCode::NOT_FOUND, "User not found");
    }
    Json(json!({ "message": "User deleted" })).into_response()
}

fn objectives_of(state: &BackendState, user_id: i64, year: i32) -> Vec<Value> {
    state
        .objectives
        .lock()
        .unwrap()
        .iter()
        .filter(|o| o["userId"] == user_id && o["annee"] == year)
        .cloned()
        .collect()
}

async fn my_objectives(
    State(state): State<Arc<BackendState>>,
    Extension(caller): Extension<TokenClaims>,
    Path(year): Path<i32>,
) -> Response {
    Json(objectives_of(&state, caller.id, year)).into_response()
}

async fn user_objectives(
    State(state): State<Arc<BackendState>>,
    Extension(caller): Extension<TokenClaims>,
    Path((id, year)): Path<(i64, i32)>,
) -> Response {
    if let Err(denied) = require_admin(&caller) {
        return denied;
    }
    Json(objectives_of(&state, id, year)).into_response()
}

async fn assign(
    State(state): State<Arc<BackendState>>,
    Extension(caller): Extension<TokenClaims>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = require_admin(&caller) {
        return denied;
    }
    let Some(user_ids) = body["userIds"].as_array() else {
        return error(StatusCode::BAD_REQUEST, "userIds is required");
    };
    let mut objectives = state.objectives.lock().unwrap();
    for user_id in user_ids {
        objectives.push(json!({
            "id": state.next_id(),
            "userId": user_id,
            "annee": body["annee"],
            "description": body["description"],
            "status": "En cours",
            "createdAt": chrono::Utc::now().to_rfc3339(),
            "validatedbyadmin": false,
        }));
    }
    (StatusCode::CREATED, Json(json!({ "message": "Objectives assigned" }))).into_response()
}

async fn validate(
    State(state): State<Arc<BackendState>>,
    Extension(caller): Extension<TokenClaims>,
    Path(id): Path<i64>,
) -> Response {
    if let Err(denied) = require_admin(&caller) {
        return denied;
    }
    let mut objectives = state.objectives.lock().unwrap();
    match objectives.iter_mut().find(|o| o["id"] == id) {
        Some(objective) => {
            objective["validatedbyadmin"] = json!(true);
            objective["status"] = json!("Validé");
            Json(objective.clone()).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Objective not found"),
    }
}

async fn list_comments(State(state): State<Arc<BackendState>>, Path(id): Path<i64>) -> Response {
    let comments: Vec<Value> = state
        .comments
        .lock()
        .unwrap()
        .iter()
        .filter(|c| c["objectiveId"] == id)
        .cloned()
        .collect();
    Json(comments).into_response()
}

async fn add_comment(
    State(state): State<Arc<BackendState>>,
    Extension(caller): Extension<TokenClaims>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if body["contenu"].as_str().map_or(true, |c| c.trim().is_empty()) {
        return error(StatusCode::BAD_REQUEST, "contenu is required");
    }
    let comment = json!({
        "id": state.next_id(),
        "objectiveId": id,
        "contenu": body["contenu"],
        "createdAt": chrono::Utc::now().to_rfc3339(),
        "user": {"id": caller.id, "username": caller.username, "role": caller.role},
    });
    state.comments.lock().unwrap().push(comment.clone());
    (StatusCode::CREATED, Json(comment)).into_response()
}

async fn update_comment(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut comments = state.comments.lock().unwrap();
    match comments.iter_mut().find(|c| c["id"] == id) {
        Some(comment) => {
            comment["contenu"] = body["contenu"].clone();
            Json(comment.clone()).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Comment not found"),
    }
}

async fn delete_comment(State(state): State<Arc<BackendState>>, Path(id): Path<i64>) -> Response {
    let mut comments = state.comments.lock().unwrap();
    let before = comments.len();
    comments.retain(|c| c["id"] != id);
    if comments.len() == before {
        return error(StatusCode::NOT_FOUND, "Comment not found");
    }
    Json(json!({ "message": "Comment deleted" })).into_response()
}
