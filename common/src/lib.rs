//! Registro VI: biblioteca común
//!
//! Tipos y reglas compartidos entre la CLI y la Web(WASM)

pub mod api;
pub mod bench;
pub mod error;
pub mod metrics;
pub mod rules;
pub mod session;
pub mod types;

pub use api::{excel_filename, failure_message, Operation, DEFAULT_API_URL};
pub use bench::{increment_meter_id, meter_range_label, BancadaDraft, Cell, CellEdit};
pub use error::{Error, Result};
pub use metrics::{elapsed_hours, error_percent, flow, BlockMetrics, RowMetrics};
pub use rules::{
    login_input, pressure_from_pma, validate_excel_password, validate_oi_code, BenchStatus,
    OiForm, Pma,
};
pub use session::{KeyValueStore, MemoryStore, Session};
pub use types::{
    AuthPayload, AuthSession, BancadaCreate, BancadaRead, BancadaRow, Banco, BlockField,
    Catalogs, CurrentOi, ExcelRequest, FlowClass, LoginInput, OiCreate, OiRead,
    OiWithBancadas, QBlock,
};
