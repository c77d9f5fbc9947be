use crate::error::{Result, ViError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vi_common::DEFAULT_API_URL;

/// Variable de entorno que reemplaza la URL del backend
pub const API_URL_ENV: &str = "VI_API_URL";
/// Variable de entorno que reemplaza el directorio de configuración
pub const CONFIG_DIR_ENV: &str = "VI_CONFIG_DIR";

const CONFIG_FILE: &str = "config.json";
const SESSION_DIR: &str = "session";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub timeout_seconds: u64,
    pub download_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.into(),
            timeout_seconds: 30,
            download_dir: None,
        }
    }
}

impl Config {
    pub fn load_from(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(dir.join(CONFIG_FILE), content)?;
        Ok(())
    }

    /// `~/.config/vi-registro`, o `VI_CONFIG_DIR` si está definida
    pub fn default_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        let home = dirs::home_dir()
            .ok_or_else(|| ViError::Config("No se encontró el directorio personal".into()))?;
        Ok(home.join(".config").join("vi-registro"))
    }

    /// Directorio de las ranuras de sesión
    pub fn session_dir(dir: &Path) -> PathBuf {
        dir.join(SESSION_DIR)
    }

    pub fn api_url(&self) -> String {
        // La variable de entorno manda
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                return url.trim().to_string();
            }
        }
        self.api_base_url.clone()
    }

    pub fn set_api_url(&mut self, url: &str, dir: &Path) -> Result<()> {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ViError::Config(format!(
                "URL inválida (debe empezar con http:// o https://): {}",
                url
            )));
        }
        self.api_base_url = url.trim_end_matches('/').to_string();
        self.save_to(dir)
    }

    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api_base_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), r#"{"timeout_seconds": 5}"#).unwrap();
        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_set_api_url_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.set_api_url("http://lab:9000/", dir.path()).unwrap();
        let loaded = Config::load_from(dir.path()).unwrap();
        assert_eq!(loaded.api_base_url, "http://lab:9000");
        assert!(config.set_api_url("lab:9000", dir.path()).is_err());
    }
}
