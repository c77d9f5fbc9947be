//! Contrato HTTP con el backend
//!
//! Rutas, mensajes de error por operación y nombre del archivo Excel.
//! El transporte (reqwest / fetch) lo implementa cada front-end.

use regex::Regex;

/// URL del backend por defecto
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Mensaje fijo para 401 en el login
pub const INVALID_CREDENTIALS: &str = "Credenciales inválidas";

lazy_static::lazy_static! {
    static ref FILENAME_RE: Regex = Regex::new(r#"(?i)filename="(.+?)""#).unwrap();
}

/// Rutas relativas a la URL base
pub mod paths {
    pub const LOGIN: &str = "/auth/login";
    pub const CATALOGS: &str = "/catalogs";
    pub const OI: &str = "/oi";

    pub fn oi(id: i64) -> String {
        format!("/oi/{}", id)
    }

    pub fn oi_full(id: i64) -> String {
        format!("/oi/{}/full", id)
    }

    pub fn bancadas(oi_id: i64) -> String {
        format!("/oi/{}/bancadas", oi_id)
    }

    pub fn bancadas_list(oi_id: i64) -> String {
        format!("/oi/{}/bancadas-list", oi_id)
    }

    pub fn bancada(bancada_id: i64) -> String {
        format!("/oi/bancadas/{}", bancada_id)
    }

    pub fn excel(oi_id: i64) -> String {
        format!("/oi/{}/excel", oi_id)
    }
}

/// Une URL base y ruta sin duplicar `/`
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Operación contra el backend (define el mensaje por defecto)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    Catalogs,
    CreateOi,
    ListOi,
    GetOi,
    GetOiFull,
    ListBancadas,
    AddBancada,
    UpdateBancada,
    DeleteBancada,
    GenerateExcel,
}

impl Operation {
    pub fn default_message(&self) -> &'static str {
        match self {
            Operation::Login => "Error de autenticación",
            Operation::Catalogs => "No se pudieron cargar los catálogos",
            Operation::CreateOi => "No se pudo crear el OI",
            Operation::ListOi => "No se pudo obtener el listado de OI",
            Operation::GetOi => "No se pudo obtener el OI",
            Operation::GetOiFull => "No se pudo cargar el OI",
            Operation::ListBancadas => "No se pudo obtener el listado de bancadas",
            Operation::AddBancada => "No se pudo agregar la bancada",
            Operation::UpdateBancada => "No se pudo actualizar la bancada",
            Operation::DeleteBancada => "No se pudo eliminar la bancada",
            Operation::GenerateExcel => "No se pudo generar el Excel",
        }
    }
}

/// Extrae `detail` de un cuerpo de error.
///
/// Acepta texto (`{"detail": "..."}`) o la lista de validación
/// (`{"detail": [{"msg": "..."}]}`), cuyos mensajes se unen con `; `.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        serde_json::Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

/// Mensaje para el usuario ante una falla.
///
/// Prioridad: 401 en login ⇒ mensaje fijo; `detail` del servidor;
/// texto del error de transporte; mensaje por defecto de la operación.
pub fn failure_message(
    operation: Operation,
    status: Option<u16>,
    body: Option<&str>,
    transport: Option<&str>,
) -> String {
    if operation == Operation::Login && status == Some(401) {
        return INVALID_CREDENTIALS.to_string();
    }
    body.and_then(extract_detail)
        .or_else(|| {
            transport
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| operation.default_message().to_string())
}

/// Nombre del Excel desde `Content-Disposition`; por defecto `OI-<id>.xlsx`
///
/// Se descartan componentes de ruta del nombre recibido.
pub fn excel_filename(content_disposition: Option<&str>, oi_id: i64) -> String {
    content_disposition
        .and_then(|cd| FILENAME_RE.captures(cd))
        .map(|cap| cap[1].to_string())
        .and_then(|name| {
            name.rsplit(['/', '\\'])
                .next()
                .map(str::trim)
                .filter(|n| !n.is_empty() && *n != "." && *n != "..")
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("OI-{}.xlsx", oi_id))
}

/// Cabecera `Authorization`
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
