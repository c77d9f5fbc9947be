//! Cliente HTTP del backend (reqwest)
//!
//! Todas las fallas se convierten en `ViError::Api` con el mensaje que
//! se muestra al usuario: `detail` del servidor, texto del transporte o
//! el mensaje por defecto de la operación.

use crate::error::{Result, ViError};
use reqwest::{header, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use vi_common::api::{failure_message, join_url, paths};
use vi_common::{
    excel_filename, AuthPayload, AuthSession, BancadaCreate, BancadaRead, Catalogs,
    ExcelRequest, LoginInput, OiCreate, OiRead, OiWithBancadas, Operation,
};

/// Excel descargado
#[derive(Debug, Clone)]
pub struct ExcelFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ViError::Config(format!("Cliente HTTP: {}", e)))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = join_url(&self.base_url, path);
        tracing::debug!("{} {}", method, url);
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Envía y convierte respuestas no-2xx en `ViError::Api`
    async fn send(&self, operation: Operation, builder: RequestBuilder) -> Result<Response> {
        let resp = match builder.send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!("{:?}: sin respuesta del backend: {}", operation, e);
                return Err(ViError::Api {
                    status: None,
                    message: failure_message(operation, None, None, Some(&e.to_string())),
                });
            }
        };

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let code = status.as_u16();
        let body = resp.text().await.ok();
        tracing::warn!("{:?}: HTTP {}", operation, code);
        Err(ViError::Api {
            status: Some(code),
            message: failure_message(operation, Some(code), body.as_deref(), None),
        })
    }

    async fn json<T: DeserializeOwned>(
        &self,
        operation: Operation,
        builder: RequestBuilder,
    ) -> Result<T> {
        let resp = self.send(operation, builder).await?;
        let status = resp.status().as_u16();
        resp.json::<T>().await.map_err(|e| ViError::Api {
            status: Some(status),
            message: format!("{} (respuesta inválida: {})", operation.default_message(), e),
        })
    }

    /// `POST /auth/login`
    pub async fn login(&self, input: &LoginInput) -> Result<AuthSession> {
        let builder = self.request(Method::POST, paths::LOGIN).json(input);
        let payload: AuthPayload = self.json(Operation::Login, builder).await?;
        payload.into_session().ok_or_else(|| ViError::Api {
            status: None,
            message: format!("{} (respuesta sin usuario o token)", Operation::Login.default_message()),
        })
    }

    /// `GET /catalogs`
    pub async fn catalogs(&self) -> Result<Catalogs> {
        let builder = self.request(Method::GET, paths::CATALOGS);
        self.json(Operation::Catalogs, builder).await
    }

    /// `POST /oi`
    pub async fn create_oi(&self, oi: &OiCreate) -> Result<OiRead> {
        let builder = self.request(Method::POST, paths::OI).json(oi);
        self.json(Operation::CreateOi, builder).await
    }

    /// `GET /oi`
    pub async fn list_oi(&self) -> Result<Vec<OiRead>> {
        let builder = self.request(Method::GET, paths::OI);
        self.json(Operation::ListOi, builder).await
    }

    /// `GET /oi/:id`
    pub async fn get_oi(&self, id: i64) -> Result<OiRead> {
        let builder = self.request(Method::GET, &paths::oi(id));
        self.json(Operation::GetOi, builder).await
    }

    /// `GET /oi/:id/full`
    pub async fn get_oi_full(&self, id: i64) -> Result<OiWithBancadas> {
        let builder = self.request(Method::GET, &paths::oi_full(id));
        self.json(Operation::GetOiFull, builder).await
    }

    /// `GET /oi/:id/bancadas-list`; cualquier falla da lista vacía
    pub async fn list_bancadas(&self, oi_id: i64) -> Vec<BancadaRead> {
        let builder = self.request(Method::GET, &paths::bancadas_list(oi_id));
        match self.json(Operation::ListBancadas, builder).await {
            Ok(list) => list,
            Err(e) => {
                tracing::debug!("Listado de bancadas vacío: {}", e);
                Vec::new()
            }
        }
    }

    /// `POST /oi/:id/bancadas`
    pub async fn add_bancada(&self, oi_id: i64, bancada: &BancadaCreate) -> Result<BancadaRead> {
        let builder = self
            .request(Method::POST, &paths::bancadas(oi_id))
            .json(bancada);
        self.json(Operation::AddBancada, builder).await
    }

    /// `PUT /oi/bancadas/:id` (reemplazo completo)
    pub async fn update_bancada(
        &self,
        bancada_id: i64,
        bancada: &BancadaCreate,
    ) -> Result<BancadaRead> {
        let builder = self
            .request(Method::PUT, &paths::bancada(bancada_id))
            .json(bancada);
        self.json(Operation::UpdateBancada, builder).await
    }

    /// `DELETE /oi/bancadas/:id`
    pub async fn delete_bancada(&self, bancada_id: i64) -> Result<()> {
        let builder = self.request(Method::DELETE, &paths::bancada(bancada_id));
        self.send(Operation::DeleteBancada, builder).await?;
        Ok(())
    }

    /// `POST /oi/:id/excel`; nombre desde `Content-Disposition`
    pub async fn generate_excel(&self, oi_id: i64, password: &str) -> Result<ExcelFile> {
        let body = ExcelRequest {
            password: password.to_string(),
        };
        let builder = self.request(Method::POST, &paths::excel(oi_id)).json(&body);
        let resp = self.send(Operation::GenerateExcel, builder).await?;

        let filename = excel_filename(
            resp.headers()
                .get(header::CONTENT_DISPOSITION)
                .and_then(|v| v.to_str().ok()),
            oi_id,
        );
        let bytes = resp.bytes().await.map_err(|e| ViError::Api {
            status: None,
            message: failure_message(Operation::GenerateExcel, None, None, Some(&e.to_string())),
        })?;

        Ok(ExcelFile {
            filename,
            bytes: bytes.to_vec(),
        })
    }
}
