use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViError {
    #[error("Error de configuración: {0}")]
    Config(String),

    #[error("No hay sesión iniciada. Ejecute `vi login`")]
    NotLoggedIn,

    #[error("No hay una OI activa. Use `vi oi new` o `vi oi open <ID>`")]
    NoActiveOi,

    /// Falla contra el backend, con el mensaje ya resuelto para el usuario
    #[error("{message}")]
    Api { status: Option<u16>, message: String },

    #[error("Entrada cancelada: {0}")]
    Prompt(String),

    #[error("Archivo no encontrado: {0}")]
    FileNotFound(String),

    #[error(transparent)]
    Common(#[from] vi_common::Error),

    #[error("Error de JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Error de E/S: {0}")]
    Io(#[from] std::io::Error),
}

impl ViError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ViError::Api { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<dialoguer::Error> for ViError {
    fn from(e: dialoguer::Error) -> Self {
        ViError::Prompt(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ViError>;
