//! Estado de sesión del cliente
//!
//! Dos ranuras persistidas, sin cifrado ni expiración:
//! - `vi.auth`: usuario, banco, token y técnico (`vi_auth` es la clave antigua)
//! - `vi.currentOI`: puntero a la OI activa `{id, code}`
//!
//! El almacenamiento concreto lo pone cada front-end (archivos en la CLI,
//! localStorage / sessionStorage en el navegador).

use crate::error::Result;
use crate::types::{AuthPayload, AuthSession, CurrentOi};
use std::cell::RefCell;
use std::collections::HashMap;

pub const AUTH_KEY: &str = "vi.auth";
pub const LEGACY_AUTH_KEY: &str = "vi_auth";
pub const CURRENT_OI_KEY: &str = "vi.currentOI";

/// Almacén clave → texto
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str);
}

/// Almacén en memoria (pruebas y sesiones efímeras)
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Lectura/escritura tipada de las ranuras de sesión
#[derive(Debug)]
pub struct Session<S> {
    auth: S,
    current: S,
}

impl<S: KeyValueStore> Session<S> {
    /// `auth` persiste entre ejecuciones; `current` guarda la OI activa
    pub fn new(auth: S, current: S) -> Self {
        Self { auth, current }
    }

    pub fn save_auth(&self, session: &AuthSession) -> Result<()> {
        let json = serde_json::to_string(session)?;
        self.auth.set(AUTH_KEY, &json)
    }

    /// Sesión guardada; un blob ilegible o sin token cuenta como ausente
    pub fn load_auth(&self) -> Option<AuthSession> {
        let raw = self
            .auth
            .get(AUTH_KEY)
            .or_else(|| self.auth.get(LEGACY_AUTH_KEY))?;
        serde_json::from_str::<AuthPayload>(&raw)
            .ok()?
            .into_session()
    }

    pub fn clear_auth(&self) {
        self.auth.remove(AUTH_KEY);
        self.auth.remove(LEGACY_AUTH_KEY);
    }

    pub fn token(&self) -> Option<String> {
        self.load_auth().map(|a| a.token)
    }

    pub fn save_current_oi(&self, current: &CurrentOi) -> Result<()> {
        let json = serde_json::to_string(current)?;
        self.current.set(CURRENT_OI_KEY, &json)
    }

    pub fn load_current_oi(&self) -> Option<CurrentOi> {
        let raw = self.current.get(CURRENT_OI_KEY)?;
        serde_json::from_str(&raw).ok()
    }

    pub fn clear_current_oi(&self) {
        self.current.remove(CURRENT_OI_KEY);
    }
}
