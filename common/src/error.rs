//! Definición de errores

use thiserror::Error;

/// Error común de validación y serialización
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validación: {0}")]
    Validation(String),

    #[error("Código OI inválido (formato OI-####-YYYY): {0}")]
    InvalidOiCode(String),

    #[error("PMA inválido (solo se aceptan 10 o 16): {0}")]
    InvalidPma(f64),

    #[error("Estado inválido (0-5): {0}")]
    InvalidEstado(i64),

    #[error("Número de filas inválido (mínimo 1): {0}")]
    InvalidRowCount(i64),

    #[error("Almacenamiento: {0}")]
    Storage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Alias de Result
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_pma() {
        let error = Error::InvalidPma(12.0);
        let display = format!("{}", error);
        assert!(display.contains("PMA inválido"));
        assert!(display.contains("12"));
    }

    #[test]
    fn test_error_display_oi_code() {
        let error = Error::InvalidOiCode("OI-1-2024".to_string());
        assert_eq!(
            format!("{}", error),
            "Código OI inválido (formato OI-####-YYYY): OI-1-2024"
        );
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_error_debug() {
        let error = Error::Validation("prueba".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("Validation"));
        assert!(debug.contains("prueba"));
    }
}
