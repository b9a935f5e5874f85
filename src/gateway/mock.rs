//! 测试用的进程内后端，行为对齐真实 REST 接口。

use axum::{
    extract::{Multipart, Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::models::{ChatMessage, Paper, Workspace};
use super::Gateway;
use crate::config::AppConfig;
use crate::session::Session;

#[derive(Default)]
struct Inner {
    users: HashMap<String, String>,
    next_id: i64,
    workspaces: Vec<(String, Workspace)>,
    papers: HashMap<i64, Vec<Paper>>,
    chats: HashMap<i64, Vec<ChatMessage>>,
    last_query: Option<String>,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn owns(&self, user: &str, workspace_id: i64) -> bool {
        self.workspaces
            .iter()
            .any(|(owner, ws)| owner == user && ws.id == workspace_id)
    }
}

#[derive(Clone, Default)]
struct MockState {
    inner: Arc<Mutex<Inner>>,
    hits: Arc<AtomicUsize>,
}

pub struct MockBackend {
    base_url: String,
    state: MockState,
}

fn token_for(username: &str) -> String {
    format!("token-{}", username)
}

fn fail(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

fn current_user(state: &MockState, headers: &HeaderMap) -> Result<String, Response> {
    let username = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer token-"))
        .map(str::to_string);

    match username {
        Some(name) if state.inner.lock().unwrap().users.contains_key(&name) => Ok(name),
        _ => Err(fail(StatusCode::UNAUTHORIZED, "Invalid credentials")),
    }
}

fn sample_results() -> Vec<Paper> {
    vec![
        Paper {
            id: None,
            title: "Attention Is All You Need".to_string(),
            authors: "Ashish Vaswani, Noam Shazeer".to_string(),
            abstract_text: "The dominant sequence transduction models...".to_string(),
            date: "2017-06-12".to_string(),
            url: "http://arxiv.org/abs/1706.03762v7".to_string(),
        },
        Paper {
            id: None,
            title: "BERT: Pre-training of Deep Bidirectional Transformers".to_string(),
            authors: "Jacob Devlin, Ming-Wei Chang".to_string(),
            abstract_text: "We introduce a new language representation model...".to_string(),
            date: "2018-10-11".to_string(),
            url: "http://arxiv.org/abs/1810.04805v2".to_string(),
        },
    ]
}

async fn count_hits(State(state): State<MockState>, request: Request, next: Next) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    next.run(request).await
}

async fn register(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    let username = body["username"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();
    let mut inner = state.inner.lock().unwrap();
    if inner.users.contains_key(&username) {
        return fail(StatusCode::BAD_REQUEST, "Username already exists");
    }
    inner.users.insert(username.clone(), password);
    Json(json!({ "access_token": token_for(&username), "token_type": "bearer" })).into_response()
}

async fn login(State(state): State<MockState>, Form(form): Form<HashMap<String, String>>) -> Response {
    let username = form.get("username").cloned().unwrap_or_default();
    let password = form.get("password").cloned().unwrap_or_default();
    let inner = state.inner.lock().unwrap();
    match inner.users.get(&username) {
        Some(stored) if *stored == password => {
            Json(json!({ "access_token": token_for(&username), "token_type": "bearer" })).into_response()
        }
        _ => fail(StatusCode::UNAUTHORIZED, "Incorrect username or password"),
    }
}

async fn list_workspaces(State(state): State<MockState>, headers: HeaderMap) -> Response {
    let user = match current_user(&state, &headers) {
        Ok(user) => user,
        Err(resp) => return resp,
    };
    let inner = state.inner.lock().unwrap();
    let list: Vec<Workspace> = inner
        .workspaces
        .iter()
        .filter(|(owner, _)| *owner == user)
        .map(|(_, ws)| ws.clone())
        .collect();
    Json(list).into_response()
}

async fn create_workspace(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let user = match current_user(&state, &headers) {
        Ok(user) => user,
        Err(resp) => return resp,
    };
    let mut inner = state.inner.lock().unwrap();
    let workspace = Workspace {
        id: inner.next_id(),
        name: body["name"].as_str().unwrap_or_default().to_string(),
    };
    inner.workspaces.push((user, workspace.clone()));
    Json(workspace).into_response()
}

async fn search(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(resp) = current_user(&state, &headers) {
        return resp;
    }
    let query = params.get("query").cloned().unwrap_or_default();
    let results = if query.to_lowercase().contains("transformer") {
        sample_results()
    } else {
        Vec::new()
    };
    state.inner.lock().unwrap().last_query = Some(query);
    Json(results).into_response()
}

async fn import(State(state): State<MockState>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let user = match current_user(&state, &headers) {
        Ok(user) => user,
        Err(resp) => return resp,
    };
    let workspace_id = body["workspace_id"].as_i64().unwrap_or_default();
    let mut paper: Paper = match serde_json::from_value(body) {
        Ok(paper) => paper,
        Err(_) => return fail(StatusCode::UNPROCESSABLE_ENTITY, "Invalid paper"),
    };
    let mut inner = state.inner.lock().unwrap();
    if !inner.owns(&user, workspace_id) {
        return fail(StatusCode::NOT_FOUND, "Workspace not found");
    }
    paper.id = Some(inner.next_id());
    inner.papers.entry(workspace_id).or_default().push(paper.clone());
    Json(paper).into_response()
}

async fn workspace_papers(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let user = match current_user(&state, &headers) {
        Ok(user) => user,
        Err(resp) => return resp,
    };
    let inner = state.inner.lock().unwrap();
    if !inner.owns(&user, id) {
        return fail(StatusCode::NOT_FOUND, "Workspace not found");
    }
    Json(inner.papers.get(&id).cloned().unwrap_or_default()).into_response()
}

async fn upload(State(state): State<MockState>, headers: HeaderMap, mut multipart: Multipart) -> Response {
    let user = match current_user(&state, &headers) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let mut file_name = None;
    let mut workspace_id = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        match field.name() {
            Some("file") => {
                file_name = field.file_name().map(str::to_string);
                let _ = field.bytes().await;
            }
            Some("workspace_id") => {
                workspace_id = field.text().await.ok().and_then(|t| t.parse::<i64>().ok());
            }
            _ => {}
        }
    }

    let (Some(file_name), Some(workspace_id)) = (file_name, workspace_id) else {
        return fail(StatusCode::UNPROCESSABLE_ENTITY, "Missing file or workspace_id");
    };
    if !file_name.ends_with(".pdf") {
        return fail(StatusCode::BAD_REQUEST, "Only PDF files are allowed");
    }

    let mut inner = state.inner.lock().unwrap();
    if !inner.owns(&user, workspace_id) {
        return fail(StatusCode::NOT_FOUND, "Workspace not found");
    }
    let title = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem.to_string())
        .unwrap_or(file_name);
    let paper = Paper {
        id: Some(inner.next_id()),
        title,
        authors: "Uploaded by user".to_string(),
        abstract_text: String::new(),
        date: String::new(),
        url: String::new(),
    };
    inner.papers.entry(workspace_id).or_default().push(paper.clone());
    Json(paper).into_response()
}

async fn chat(State(state): State<MockState>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let user = match current_user(&state, &headers) {
        Ok(user) => user,
        Err(resp) => return resp,
    };
    let workspace_id = body["workspace_id"].as_i64().unwrap_or_default();
    let message = body["message"].as_str().unwrap_or_default().to_string();

    let mut inner = state.inner.lock().unwrap();
    if !inner.owns(&user, workspace_id) {
        return fail(StatusCode::NOT_FOUND, "Workspace not found");
    }
    let paper_count = inner.papers.get(&workspace_id).map(Vec::len).unwrap_or(0);
    if paper_count == 0 {
        return fail(
            StatusCode::BAD_REQUEST,
            "I don't have any papers to analyze in this workspace yet.",
        );
    }

    let response = format!("Based on {} paper(s): **{}**", paper_count, message);
    inner.chats.entry(workspace_id).or_default().push(ChatMessage {
        message,
        response: response.clone(),
    });
    Json(json!({ "response": response })).into_response()
}

async fn history(State(state): State<MockState>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    let user = match current_user(&state, &headers) {
        Ok(user) => user,
        Err(resp) => return resp,
    };
    let inner = state.inner.lock().unwrap();
    if !inner.owns(&user, id) {
        return fail(StatusCode::NOT_FOUND, "Workspace not found");
    }
    Json(inner.chats.get(&id).cloned().unwrap_or_default()).into_response()
}

async fn clear_history(State(state): State<MockState>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    let user = match current_user(&state, &headers) {
        Ok(user) => user,
        Err(resp) => return resp,
    };
    let mut inner = state.inner.lock().unwrap();
    if !inner.owns(&user, id) {
        return fail(StatusCode::NOT_FOUND, "Workspace not found");
    }
    inner.chats.remove(&id);
    Json(json!({ "message": "Chat history cleared successfully" })).into_response()
}

impl MockBackend {
    pub async fn spawn() -> Self {
        let state = MockState::default();
        let app = Router::new()
            .route("/auth/register", post(register))
            .route("/auth/login", post(login))
            .route("/workspaces", get(list_workspaces).post(create_workspace))
            .route("/papers/search", get(search))
            .route("/papers/import", post(import))
            .route("/papers/workspace/{id}", get(workspace_papers))
            .route("/papers/upload", post(upload))
            .route("/chat", post(chat))
            .route("/chat/history/{id}", get(history).delete(clear_history))
            .layer(middleware::from_fn_with_state(state.clone(), count_hits))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn config(&self) -> AppConfig {
        let mut config = AppConfig::default();
        config.backend.base_url = self.base_url.clone();
        config.backend.timeout_secs = 10;
        config
    }

    pub fn gateway(&self, session: Session) -> Gateway {
        Gateway::new(&self.config(), session).unwrap()
    }

    /// 直接在后端建用户并写入 token，不计入请求数
    pub async fn logged_in_gateway(&self, username: &str) -> Gateway {
        self.add_user(username, "secret1");
        let session = Session::in_memory();
        session.set_token(&token_for(username)).await.unwrap();
        self.gateway(session)
    }

    pub fn add_user(&self, username: &str, password: &str) {
        self.state
            .inner
            .lock()
            .unwrap()
            .users
            .insert(username.to_string(), password.to_string());
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<String> {
        self.state.inner.lock().unwrap().last_query.clone()
    }
}
