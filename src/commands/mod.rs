//! Subcomandos de la CLI
//!
//! - auth: login, logout, whoami, catálogos
//! - oi: alta, listado, apertura y cierre de la OI activa
//! - bancada: alta, edición, borrado y vista previa
//! - excel: descarga del Excel protegido
//! - settings: configuración local

pub mod auth;
pub mod bancada;
pub mod excel;
pub mod oi;
pub mod settings;

use crate::client::ApiClient;
use crate::config::Config;
use crate::error::{Result, ViError};
use crate::store::{open_session, FileStore};
use std::path::PathBuf;
use std::time::Duration;
use vi_common::{AuthSession, CurrentOi, Session};

/// Estado compartido por los subcomandos
pub struct Context {
    pub config_dir: PathBuf,
    pub config: Config,
    pub session: Session<FileStore>,
    pub client: ApiClient,
}

impl Context {
    /// Carga configuración y sesión; el cliente lleva el token guardado
    pub fn load(config_dir: PathBuf) -> Result<Self> {
        let config = Config::load_from(&config_dir)?;
        let session = open_session(&config_dir);
        let client = ApiClient::new(
            &config.api_url(),
            Duration::from_secs(config.timeout_seconds.max(1)),
        )?
        .with_token(session.token());
        tracing::debug!("Backend: {}", client.base_url());

        Ok(Self {
            config_dir,
            config,
            session,
            client,
        })
    }

    pub fn require_auth(&self) -> Result<AuthSession> {
        self.session.load_auth().ok_or(ViError::NotLoggedIn)
    }

    pub fn require_current_oi(&self) -> Result<CurrentOi> {
        self.session.load_current_oi().ok_or(ViError::NoActiveOi)
    }
}
