//! Cliente REST del navegador (fetch)
//!
//! Mismas rutas y mensajes de error que la CLI; ver `vi_common::api`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use vi_common::api::{bearer, failure_message, join_url, paths};
use vi_common::{
    excel_filename, AuthPayload, AuthSession, BancadaCreate, BancadaRead, Catalogs,
    ExcelRequest, LoginInput, OiCreate, OiRead, OiWithBancadas, Operation,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// Falla de una llamada, con el mensaje para el toast
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: Option<u16>,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Texto de un error de JS (`TypeError: Failed to fetch`, ...)
fn js_message(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}

fn transport(operation: Operation, value: JsValue) -> ApiError {
    ApiError {
        status: None,
        message: failure_message(operation, None, None, Some(&js_message(&value))),
    }
}

/// Excel descargado
pub struct ExcelFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Api {
    base_url: String,
    token: Option<String>,
}

impl Api {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    async fn send(
        &self,
        operation: Operation,
        method: &str,
        path: &str,
        body: Option<String>,
    ) -> ApiResult<Response> {
        let url = join_url(&self.base_url, path);

        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);
        if let Some(body) = &body {
            opts.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(&url, &opts)
            .map_err(|e| transport(operation, e))?;
        let headers = request.headers();
        if body.is_some() {
            headers
                .set("Content-Type", "application/json")
                .map_err(|e| transport(operation, e))?;
        }
        if let Some(token) = &self.token {
            headers
                .set("Authorization", &bearer(token))
                .map_err(|e| transport(operation, e))?;
        }

        let window = web_sys::window().ok_or_else(|| ApiError {
            status: None,
            message: operation.default_message().to_string(),
        })?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| transport(operation, e))?;
        let resp: Response = resp_value.dyn_into().map_err(|e| transport(operation, e))?;

        if resp.ok() {
            return Ok(resp);
        }

        let status = resp.status();
        let text = match resp.text() {
            Ok(promise) => JsFuture::from(promise).await.ok().and_then(|v| v.as_string()),
            Err(_) => None,
        };
        gloo::console::warn!(format!("{:?}: HTTP {}", operation, status));
        Err(ApiError {
            status: Some(status),
            message: failure_message(operation, Some(status), text.as_deref(), None),
        })
    }

    async fn json<T: DeserializeOwned>(
        &self,
        operation: Operation,
        method: &str,
        path: &str,
        body: Option<String>,
    ) -> ApiResult<T> {
        let resp = self.send(operation, method, path, body).await?;
        let promise = resp.json().map_err(|e| transport(operation, e))?;
        let value = JsFuture::from(promise)
            .await
            .map_err(|e| transport(operation, e))?;
        serde_wasm_bindgen::from_value(value).map_err(|e| ApiError {
            status: Some(resp.status()),
            message: format!("{} (respuesta inválida: {})", operation.default_message(), e),
        })
    }

    fn body<T: Serialize>(operation: Operation, payload: &T) -> ApiResult<Option<String>> {
        serde_json::to_string(payload)
            .map(Some)
            .map_err(|e| ApiError {
                status: None,
                message: format!("{} ({})", operation.default_message(), e),
            })
    }

    pub async fn login(&self, input: &LoginInput) -> ApiResult<AuthSession> {
        let body = Self::body(Operation::Login, input)?;
        let payload: AuthPayload = self
            .json(Operation::Login, "POST", paths::LOGIN, body)
            .await?;
        payload.into_session().ok_or_else(|| ApiError {
            status: None,
            message: Operation::Login.default_message().to_string(),
        })
    }

    pub async fn catalogs(&self) -> ApiResult<Catalogs> {
        self.json(Operation::Catalogs, "GET", paths::CATALOGS, None)
            .await
    }

    pub async fn create_oi(&self, oi: &OiCreate) -> ApiResult<OiRead> {
        let body = Self::body(Operation::CreateOi, oi)?;
        self.json(Operation::CreateOi, "POST", paths::OI, body).await
    }

    pub async fn list_oi(&self) -> ApiResult<Vec<OiRead>> {
        self.json(Operation::ListOi, "GET", paths::OI, None).await
    }

    pub async fn get_oi_full(&self, id: i64) -> ApiResult<OiWithBancadas> {
        self.json(Operation::GetOiFull, "GET", &paths::oi_full(id), None)
            .await
    }

    /// Cualquier falla da lista vacía
    pub async fn list_bancadas(&self, oi_id: i64) -> Vec<BancadaRead> {
        self.json(
            Operation::ListBancadas,
            "GET",
            &paths::bancadas_list(oi_id),
            None,
        )
        .await
        .unwrap_or_default()
    }

    pub async fn add_bancada(&self, oi_id: i64, bancada: &BancadaCreate) -> ApiResult<BancadaRead> {
        let body = Self::body(Operation::AddBancada, bancada)?;
        self.json(Operation::AddBancada, "POST", &paths::bancadas(oi_id), body)
            .await
    }

    pub async fn update_bancada(
        &self,
        bancada_id: i64,
        bancada: &BancadaCreate,
    ) -> ApiResult<BancadaRead> {
        let body = Self::body(Operation::UpdateBancada, bancada)?;
        self.json(
            Operation::UpdateBancada,
            "PUT",
            &paths::bancada(bancada_id),
            body,
        )
        .await
    }

    pub async fn delete_bancada(&self, bancada_id: i64) -> ApiResult<()> {
        self.send(
            Operation::DeleteBancada,
            "DELETE",
            &paths::bancada(bancada_id),
            None,
        )
        .await
        .map(|_| ())
    }

    pub async fn generate_excel(&self, oi_id: i64, password: &str) -> ApiResult<ExcelFile> {
        let operation = Operation::GenerateExcel;
        let body = Self::body(
            operation,
            &ExcelRequest {
                password: password.to_string(),
            },
        )?;
        let resp = self
            .send(operation, "POST", &paths::excel(oi_id), body)
            .await?;

        let disposition = resp.headers().get("Content-Disposition").ok().flatten();
        let filename = excel_filename(disposition.as_deref(), oi_id);

        let buffer = JsFuture::from(resp.array_buffer().map_err(|e| transport(operation, e))?)
            .await
            .map_err(|e| transport(operation, e))?;
        Ok(ExcelFile {
            filename,
            bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
        })
    }
}
