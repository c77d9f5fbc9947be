use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vi_common::{CellEdit, FlowClass};

#[derive(Parser)]
#[command(name = "vi")]
#[command(about = "Registro de datos del formato VI: OI y bancadas de medidores", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Logs detallados (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Directorio de configuración (por defecto ~/.config/vi-registro)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Iniciar sesión (usuario, banco y contraseña)
    Login {
        /// Usuario
        #[arg(short, long)]
        username: Option<String>,

        /// N° de banco
        #[arg(short, long)]
        banco: Option<i64>,

        /// Contraseña (se pide si se omite)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Cerrar sesión
    Logout,

    /// Mostrar la sesión actual
    Whoami,

    /// Mostrar catálogos del backend
    Catalogs,

    /// Órdenes de inspección
    Oi {
        #[command(subcommand)]
        command: OiCommand,
    },

    /// Bancadas de la OI activa
    Bancada {
        #[command(subcommand)]
        command: BancadaCommand,
    },

    /// Generar y descargar el Excel de una OI
    Excel {
        /// Id de la OI (por defecto la activa)
        #[arg(long)]
        oi: Option<i64>,

        /// Contraseña de protección del archivo (se pide si se omite)
        #[arg(short, long)]
        password: Option<String>,

        /// Directorio de destino
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Mostrar/editar la configuración
    Config {
        /// URL del backend
        #[arg(long)]
        set_api_url: Option<String>,

        /// Mostrar configuración
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand)]
pub enum OiCommand {
    /// Crear una OI y dejarla activa
    New {
        /// Código (OI-####-YYYY)
        #[arg(short, long)]
        code: Option<String>,

        /// Q3 (m³/h)
        #[arg(long)]
        q3: Option<f64>,

        /// Alcance Q3/Q1
        #[arg(short, long)]
        alcance: Option<i64>,

        /// PMA (10 o 16)
        #[arg(long)]
        pma: Option<i64>,
    },

    /// Listar OIs
    List,

    /// Activar una OI existente
    Open {
        #[arg(required = true)]
        id: i64,
    },

    /// Mostrar una OI con sus bancadas (por defecto la activa)
    Show { id: Option<i64> },

    /// Cerrar la OI activa (no borra nada en el backend)
    Close,
}

#[derive(Subcommand)]
pub enum BancadaCommand {
    /// Agregar una bancada a la OI activa
    Add {
        #[command(flatten)]
        input: BancadaInput,
    },

    /// Reemplazar una bancada existente
    Edit {
        /// Id de la bancada
        #[arg(required = true)]
        id: i64,

        #[command(flatten)]
        input: BancadaInput,
    },

    /// Eliminar una bancada
    Delete {
        /// Id de la bancada
        #[arg(required = true)]
        id: i64,

        /// No pedir confirmación
        #[arg(short, long)]
        yes: bool,
    },

    /// Vista previa de caudal y error por fila
    Preview {
        /// Id de la bancada
        #[arg(required = true)]
        id: i64,

        /// Mostrar las 7 columnas de un bloque (q3/q2/q1)
        #[arg(long)]
        class: Option<FlowClass>,
    },
}

/// Datos de la grilla para alta/edición
#[derive(clap::Args, Debug, Default)]
pub struct BancadaInput {
    /// Estado (0-5)
    #[arg(short, long)]
    pub estado: Option<i64>,

    /// Cantidad de filas
    #[arg(short, long)]
    pub rows: Option<i64>,

    /// # Medidor de la fila 1
    #[arg(short, long)]
    pub medidor: Option<String>,

    /// Grilla desde JSON (lista de filas o {estado, rows_data})
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Edición de celda FILA:CELDA=VALOR (repetible), p.ej. 1:q3.c4=100,5;
    /// fuera de la fila 1 solo L.I. (c4) y L.F. (c5)
    #[arg(short, long = "set", value_name = "FILA:CELDA=VALOR")]
    pub set: Vec<CellEdit>,

    /// Pedir la fila 1 de forma interactiva
    #[arg(short, long)]
    pub interactive: bool,
}
