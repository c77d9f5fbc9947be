//! Backend falso (axum) para las pruebas de integración
//!
//! Implementa las rutas que usa la CLI con estado en memoria y exige
//! `Authorization: Bearer <TOKEN>` en todo salvo login y catálogos.

#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

pub const TOKEN: &str = "tok-123";
pub const PASSWORD: &str = "secreto";

#[derive(Default)]
pub struct Backend {
    pub ois: Vec<Value>,
    /// (oi_id, bancada)
    pub bancadas: Vec<(i64, Value)>,
    pub last_bancada_body: Option<Value>,
    pub fail_bancadas_list: bool,
    pub excel_without_header: bool,
    next_id: i64,
}

impl Backend {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

pub type Shared = Arc<Mutex<Backend>>;

pub struct TestServer {
    pub url: String,
    pub state: Shared,
}

pub async fn start() -> TestServer {
    let state: Shared = Arc::new(Mutex::new(Backend::default()));

    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/catalogs", get(catalogs))
        .route("/oi", get(list_oi).post(create_oi))
        .route("/oi/{id}", get(get_oi))
        .route("/oi/{id}/full", get(get_full))
        .route("/oi/{id}/bancadas", post(add_bancada))
        .route("/oi/{id}/bancadas-list", get(list_bancadas))
        .route("/oi/{id}/excel", post(excel))
        .route("/oi/bancadas/{id}", put(update_bancada).delete(delete_bancada))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        url: format!("http://{}", addr),
        state,
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        == Some(TOKEN)
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn unauthorized() -> Response {
    detail(StatusCode::UNAUTHORIZED, "Not authenticated")
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] != PASSWORD {
        return detail(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    Json(json!({
        "user": body["username"],
        "bancoId": body["bancoId"],
        "token": TOKEN,
        "techNumber": 101,
    }))
    .into_response()
}

async fn catalogs() -> Response {
    Json(json!({
        "q3": [1.6, 2.5, 4.0, 6.3],
        "alcance": [100, 125, 160, 200, 400, 500],
        "pma": [10, 16],
        "bancos": [
            {"id": 3, "name": "Banco 3"},
            {"id": 4, "name": "Banco 4"},
        ],
    }))
    .into_response()
}

async fn create_oi(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let code = body["code"].as_str().unwrap_or_default();
    if code.len() != 12 || !code.starts_with("OI-") {
        return detail(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Código OI inválido (formato OI-####-YYYY).",
        );
    }
    let presion = match body["pma"].as_i64() {
        Some(16) => 25.6,
        Some(10) => 16.0,
        _ => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"detail": [{"loc": ["body", "pma"], "msg": "PMA inválido"}]})),
            )
                .into_response()
        }
    };

    let mut backend = state.lock().unwrap();
    let mut oi = body.clone();
    oi["id"] = json!(backend.next_id());
    oi["presion_bar"] = json!(presion);
    backend.ois.push(oi.clone());
    Json(oi).into_response()
}

async fn list_oi(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(Value::Array(state.lock().unwrap().ois.clone())).into_response()
}

fn find_oi(backend: &Backend, id: i64) -> Option<Value> {
    backend.ois.iter().find(|oi| oi["id"] == id).cloned()
}

async fn get_oi(State(state): State<Shared>, Path(id): Path<i64>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    match find_oi(&state.lock().unwrap(), id) {
        Some(oi) => Json(oi).into_response(),
        None => detail(StatusCode::NOT_FOUND, "OI no encontrada"),
    }
}

async fn get_full(State(state): State<Shared>, Path(id): Path<i64>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let backend = state.lock().unwrap();
    let Some(mut oi) = find_oi(&backend, id) else {
        return detail(StatusCode::NOT_FOUND, "OI no encontrada");
    };
    let bancadas: Vec<Value> = backend
        .bancadas
        .iter()
        .filter(|(oi_id, _)| *oi_id == id)
        .map(|(_, b)| b.clone())
        .collect();
    oi["bancadas"] = Value::Array(bancadas);
    Json(oi).into_response()
}

async fn add_bancada(
    State(state): State<Shared>,
    Path(oi_id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut backend = state.lock().unwrap();
    if find_oi(&backend, oi_id).is_none() {
        return detail(StatusCode::NOT_FOUND, "OI no encontrada");
    }
    let item = backend.bancadas.iter().filter(|(o, _)| *o == oi_id).count() + 1;
    let mut bancada = body.clone();
    bancada["id"] = json!(backend.next_id());
    bancada["item"] = json!(item);
    backend.last_bancada_body = Some(body);
    backend.bancadas.push((oi_id, bancada.clone()));
    Json(bancada).into_response()
}

async fn list_bancadas(State(state): State<Shared>, Path(oi_id): Path<i64>) -> Response {
    let backend = state.lock().unwrap();
    if backend.fail_bancadas_list {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    let list: Vec<Value> = backend
        .bancadas
        .iter()
        .filter(|(o, _)| *o == oi_id)
        .map(|(_, b)| b.clone())
        .collect();
    Json(Value::Array(list)).into_response()
}

async fn update_bancada(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut backend = state.lock().unwrap();
    backend.last_bancada_body = Some(body.clone());
    let Some((_, stored)) = backend.bancadas.iter_mut().find(|(_, b)| b["id"] == id) else {
        return detail(StatusCode::NOT_FOUND, "Bancada no encontrada");
    };
    let item = stored["item"].clone();
    *stored = body;
    stored["id"] = json!(id);
    stored["item"] = item;
    Json(stored.clone()).into_response()
}

async fn delete_bancada(State(state): State<Shared>, Path(id): Path<i64>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut backend = state.lock().unwrap();
    let before = backend.bancadas.len();
    backend.bancadas.retain(|(_, b)| b["id"] != id);
    if backend.bancadas.len() == before {
        return detail(StatusCode::NOT_FOUND, "Bancada no encontrada");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn excel(
    State(state): State<Shared>,
    Path(oi_id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if body["password"].as_str().unwrap_or_default().is_empty() {
        return detail(StatusCode::BAD_REQUEST, "Password requerido");
    }
    let backend = state.lock().unwrap();
    let Some(oi) = find_oi(&backend, oi_id) else {
        return detail(StatusCode::NOT_FOUND, "OI no encontrada");
    };
    let bytes = b"PK\x03\x04fake-xlsx".to_vec();
    if backend.excel_without_header {
        return bytes.into_response();
    }
    let disposition = format!(
        "attachment; filename=\"VI_{}.xlsx\"",
        oi["code"].as_str().unwrap_or_default()
    );
    ([(header::CONTENT_DISPOSITION, disposition)], bytes).into_response()
}
