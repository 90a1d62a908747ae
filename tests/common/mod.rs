#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use student_registry::{
    app_router, AdminCredential, AppError, AppState, AuthConfig, HttpConfig, NewStudent, Student,
    StudentFilter, StudentPatch, StudentStore,
};
use tower::ServiceExt;

pub const JWT_SECRET: &str = "test-secret";

/// In-memory store with the same not-found semantics as the PostgreSQL one.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<BTreeMap<i64, Student>>,
    next_id: Mutex<i64>,
}

impl MemoryStore {
    pub fn snapshot(&self) -> Vec<Student> {
        self.rows.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl StudentStore for MemoryStore {
    async fn insert(&self, student: &NewStudent) -> Result<i64, AppError> {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        let id = *next;
        self.rows.lock().unwrap().insert(
            id,
            Student {
                id,
                first_name: student.first_name.clone(),
                last_name: student.last_name.clone(),
                gender: student.gender,
            },
        );
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<Student>, AppError> {
        Ok(self.snapshot())
    }

    async fn search(&self, filter: &StudentFilter) -> Result<Vec<Student>, AppError> {
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|s| filter_matches(filter, s))
            .collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Student>, AppError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn update(&self, id: i64, patch: &StudentPatch) -> Result<Option<Student>, AppError> {
        if patch.is_empty() {
            return Err(AppError::MissingInput("No fields to update".into()));
        }
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.get_mut(&id).map(|s| {
            apply_patch(patch, s);
            s.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.rows.lock().unwrap().remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Every call fails the way a lost database connection would.
pub struct FailingStore;

#[async_trait]
impl StudentStore for FailingStore {
    async fn insert(&self, _: &NewStudent) -> Result<i64, AppError> {
        Err(AppError::Db(sqlx::Error::PoolTimedOut))
    }

    async fn list_all(&self) -> Result<Vec<Student>, AppError> {
        Err(AppError::Db(sqlx::Error::PoolTimedOut))
    }

    async fn search(&self, _: &StudentFilter) -> Result<Vec<Student>, AppError> {
        Err(AppError::Db(sqlx::Error::PoolTimedOut))
    }

    async fn get_by_id(&self, _: i64) -> Result<Option<Student>, AppError> {
        Err(AppError::Db(sqlx::Error::PoolTimedOut))
    }

    async fn update(&self, _: i64, _: &StudentPatch) -> Result<Option<Student>, AppError> {
        Err(AppError::Db(sqlx::Error::PoolTimedOut))
    }

    async fn delete(&self, _: i64) -> Result<bool, AppError> {
        Err(AppError::Db(sqlx::Error::PoolTimedOut))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(AppError::Db(sqlx::Error::PoolTimedOut))
    }
}

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: JWT_SECRET.into(),
        token_ttl: chrono::Duration::minutes(30),
        admin: AdminCredential::new("admin", "password"),
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let router = build(store.clone());
        TestApp { router, store }
    }

    pub async fn login(&self) -> String {
        let res = self
            .send(
                Method::POST,
                "/api/login",
                None,
                Some(serde_json::json!({"username": "admin", "password": "password"})),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK);
        res.json()["token"].as_str().unwrap().to_string()
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        send(&self.router, method, uri, auth, body).await
    }
}

pub fn build(store: Arc<dyn StudentStore>) -> Router {
    let state = AppState::new(store, &auth_config());
    app_router(
        state,
        &HttpConfig {
            bind_addr: "127.0.0.1:0".into(),
            body_limit: 64 * 1024,
        },
    )
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(a) = auth {
        req = req.header(header::AUTHORIZATION, a);
    }
    let req = match body {
        Some(v) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    let res = router.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let content_type = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    TestResponse {
        status,
        content_type,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Decode an XML body back into a mapping. Leaf values come back as strings;
/// an element whose children are all `<item>` becomes a sequence.
pub fn xml_to_value(xml: &str) -> Value {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<(String, Vec<(String, Value)>, String)> = Vec::new();
    let mut root = None;
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) => {
                let name = String::from_utf8(e.name().as_ref().to_vec()).unwrap();
                stack.push((name, Vec::new(), String::new()));
            }
            Event::Text(t) => {
                if let Some(top) = stack.last_mut() {
                    top.2.push_str(&t.unescape().unwrap());
                }
            }
            Event::End(_) => {
                let (name, children, text) = stack.pop().unwrap();
                let v = if children.is_empty() {
                    Value::String(text)
                } else if children.iter().all(|(k, _)| k == "item") {
                    Value::Array(children.into_iter().map(|(_, v)| v).collect())
                } else {
                    Value::Object(children.into_iter().collect::<Map<String, Value>>())
                };
                match stack.last_mut() {
                    Some(parent) => parent.1.push((name, v)),
                    None => root = Some((name, v)),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    let (name, v) = root.unwrap();
    assert_eq!(name, "response");
    v
}

/// Scalars as strings, structure kept; how JSON values look after an XML trip.
pub fn stringify(v: &Value) -> Value {
    match v {
        Value::Object(m) => Value::Object(m.iter().map(|(k, v)| (k.clone(), stringify(v))).collect()),
        Value::Array(items) => Value::Array(items.iter().map(stringify).collect()),
        Value::String(s) => Value::String(s.clone()),
        Value::Null => Value::String(String::new()),
        other => Value::String(other.to_string()),
    }
}

/// Search predicate with the store's semantics: substring on names, exact gender.
pub fn filter_matches(filter: &StudentFilter, student: &Student) -> bool {
    filter
        .first_name
        .as_deref()
        .map_or(true, |s| student.first_name.contains(s))
        && filter
            .last_name
            .as_deref()
            .map_or(true, |s| student.last_name.contains(s))
        && filter
            .gender
            .as_deref()
            .map_or(true, |g| student.gender.as_str() == g)
}

pub fn apply_patch(patch: &StudentPatch, student: &mut Student) {
    if let Some(v) = &patch.first_name {
        student.first_name = v.clone();
    }
    if let Some(v) = &patch.last_name {
        student.last_name = v.clone();
    }
    if let Some(g) = patch.gender {
        student.gender = g;
    }
}
