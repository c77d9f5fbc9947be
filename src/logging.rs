//! Logs de la CLI (tracing)
//!
//! Salen por stderr para no mezclarse con las tablas. `RUST_LOG` tiene
//! prioridad sobre `-v`. Los tokens nunca se registran.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Nivel de detalle según la cantidad de `-v`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    #[default]
    Normal,
    Verbose,
    Trace,
}

impl Verbosity {
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Trace,
        }
    }

    pub fn level(&self) -> Level {
        match self {
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }
}

/// Filtro por defecto: la biblioteca y el binario `vi`
pub fn default_directive(verbosity: Verbosity) -> String {
    let level = verbosity.level();
    format!("vi_registro={},vi={}", level, level)
}

/// Instala el subscriber global (una sola vez; llamadas extra se ignoran)
pub fn init_logging(verbosity: Verbosity) {
    let default_filter = default_directive(verbosity);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_file(false)
            .with_line_number(false),
    );

    let _ = subscriber.try_init();
}
