//! Reglas del formulario OI
//!
//! - PMA → Presión (bar): tabla cerrada {16 → 25.6, 10 → 16.0}
//! - Código OI: `OI-####-YYYY`
//! - Estado de bancada: 0..=5

use crate::error::{Error, Result};
use crate::types::{AuthSession, LoginInput, OiCreate};
use regex::Regex;

/// Filas por defecto de una bancada nueva
pub const DEFAULT_ROWS: u32 = 15;

/// Marcador del veredicto de tolerancia (lo calcula la planilla)
pub const VERDICT_PLACEHOLDER: &str = "CALCULADO";

lazy_static::lazy_static! {
    static ref OI_CODE_RE: Regex = Regex::new(r"^OI-\d{4}-\d{4}$").unwrap();
}

/// Presión máxima admisible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pma {
    Pma10,
    Pma16,
}

impl Pma {
    /// Presión de trabajo (bar)
    pub fn pressure_bar(&self) -> f64 {
        match self {
            Pma::Pma16 => 25.6,
            Pma::Pma10 => 16.0,
        }
    }

    pub fn value(&self) -> i64 {
        match self {
            Pma::Pma10 => 10,
            Pma::Pma16 => 16,
        }
    }
}

impl TryFrom<f64> for Pma {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        if value == 16.0 {
            Ok(Pma::Pma16)
        } else if value == 10.0 {
            Ok(Pma::Pma10)
        } else {
            Err(Error::InvalidPma(value))
        }
    }
}

impl TryFrom<i64> for Pma {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        Pma::try_from(value as f64)
    }
}

/// PMA → Presión (bar); cualquier otro PMA se rechaza
pub fn pressure_from_pma(pma: f64) -> Result<f64> {
    Pma::try_from(pma).map(|p| p.pressure_bar())
}

/// Valida el formato `OI-####-YYYY` (se ignoran espacios externos)
pub fn validate_oi_code(code: &str) -> Result<String> {
    let trimmed = code.trim();
    if OI_CODE_RE.is_match(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(Error::InvalidOiCode(code.to_string()))
    }
}

/// Código sugerido para un formulario nuevo
pub fn default_oi_code(year: i32) -> String {
    format!("OI-0001-{:04}", year)
}

/// Estado de una bancada
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BenchStatus {
    #[default]
    Conforme,
    DanoFisico,
    Fuga,
    Picado,
    Desfasado,
    Paralizado,
}

impl BenchStatus {
    pub const ALL: [BenchStatus; 6] = [
        BenchStatus::Conforme,
        BenchStatus::DanoFisico,
        BenchStatus::Fuga,
        BenchStatus::Picado,
        BenchStatus::Desfasado,
        BenchStatus::Paralizado,
    ];

    pub fn code(&self) -> u8 {
        match self {
            BenchStatus::Conforme => 0,
            BenchStatus::DanoFisico => 1,
            BenchStatus::Fuga => 2,
            BenchStatus::Picado => 3,
            BenchStatus::Desfasado => 4,
            BenchStatus::Paralizado => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BenchStatus::Conforme => "Conforme",
            BenchStatus::DanoFisico => "Daño Físico",
            BenchStatus::Fuga => "Fuga",
            BenchStatus::Picado => "Picado",
            BenchStatus::Desfasado => "Desfasado",
            BenchStatus::Paralizado => "Paralizado",
        }
    }

    /// Clase CSS del badge
    pub fn badge_class(&self) -> &'static str {
        match self {
            BenchStatus::Conforme => "bg-success",
            BenchStatus::DanoFisico => "bg-secondary",
            BenchStatus::Fuga => "bg-warning text-dark",
            BenchStatus::Picado => "bg-info text-dark",
            BenchStatus::Desfasado => "bg-primary",
            BenchStatus::Paralizado => "bg-danger",
        }
    }

    /// "0 = Conforme"
    pub fn option_label(&self) -> String {
        format!("{} = {}", self.code(), self.label())
    }
}

impl TryFrom<i64> for BenchStatus {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        BenchStatus::ALL
            .iter()
            .copied()
            .find(|s| i64::from(s.code()) == value)
            .ok_or(Error::InvalidEstado(value))
    }
}

/// Etiqueta de un código de estado; "—" si no existe
pub fn estado_label(code: u8) -> &'static str {
    BenchStatus::try_from(i64::from(code))
        .map(|s| s.label())
        .unwrap_or("—")
}

/// Valida el número de filas de una bancada
pub fn validate_row_count(rows: i64) -> Result<u32> {
    if rows >= 1 && rows <= i64::from(u32::MAX) {
        Ok(rows as u32)
    } else {
        Err(Error::InvalidRowCount(rows))
    }
}

/// Datos del login; el usuario se recorta y ningún campo puede faltar
pub fn login_input(username: &str, banco_id: Option<i64>, password: &str) -> Result<LoginInput> {
    let username = username.trim();
    if username.is_empty() {
        return Err(Error::Validation("Ingresa el usuario.".into()));
    }
    let banco_id = banco_id.ok_or_else(|| Error::Validation("Selecciona el N° de banco.".into()))?;
    if password.is_empty() {
        return Err(Error::Validation("Ingresa la contraseña.".into()));
    }
    Ok(LoginInput {
        username: username.to_string(),
        password: password.to_string(),
        banco_id,
    })
}

/// Contraseña del Excel, sin espacios externos
pub fn validate_excel_password(password: &str) -> Result<String> {
    let trimmed = password.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(
            "La contraseña no puede estar vacía".into(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Estado del formulario de cabecera OI
#[derive(Debug, Clone, PartialEq)]
pub struct OiForm {
    pub code: String,
    pub q3: f64,
    pub alcance: i64,
    pub pma: i64,
    pub estado: i64,
}

impl OiForm {
    /// Valores por defecto: primer Q3/alcance del catálogo, PMA 16
    pub fn with_defaults(year: i32, catalogs: Option<&crate::types::Catalogs>) -> Self {
        let q3 = catalogs.and_then(|c| c.q3.first().copied()).unwrap_or(2.5);
        let alcance = catalogs
            .and_then(|c| c.alcance.first().copied())
            .unwrap_or(80);
        Self {
            code: default_oi_code(year),
            q3,
            alcance,
            pma: 16,
            estado: 0,
        }
    }

    /// Presión derivada para mostrar; `None` si el PMA no está en la tabla
    pub fn pressure(&self) -> Option<f64> {
        pressure_from_pma(self.pma as f64).ok()
    }

    /// Valida y arma el payload con los datos de la sesión
    pub fn to_create(&self, auth: &AuthSession) -> Result<OiCreate> {
        let code = validate_oi_code(&self.code)?;
        let pma = Pma::try_from(self.pma)?;
        BenchStatus::try_from(self.estado)?;
        if !self.q3.is_finite() {
            return Err(Error::Validation("Q3 inválido".into()));
        }
        Ok(OiCreate {
            code,
            q3: self.q3,
            alcance: self.alcance,
            pma: pma.value(),
            banco_id: auth.banco_id,
            tech_number: auth.tech_number,
        })
    }
}
