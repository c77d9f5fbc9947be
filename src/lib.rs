//! vi-registro: CLI para el registro del formato VI
//!
//! Sesión, OIs y bancadas contra el backend REST; las reglas y el
//! editor de grilla viven en `vi-common`.

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod store;

pub use client::{ApiClient, ExcelFile};
pub use config::Config;
pub use error::{Result, ViError};
pub use store::FileStore;
