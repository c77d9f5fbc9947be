//! Tipos del contrato con el backend
//!
//! Compartidos entre la CLI y la Web(WASM):
//! - Sesión y login: LoginInput, AuthPayload, AuthSession
//! - Catálogos: Catalogs, Banco
//! - OI: OiCreate, OiRead, OiWithBancadas, CurrentOi
//! - Bancadas: QBlock, BancadaRow, BancadaCreate, BancadaRead

use serde::{Deserialize, Serialize};

/// Credenciales enviadas a `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    pub username: String,
    pub password: String,
    pub banco_id: i64,
}

/// Respuesta de login tal como llega (o como quedó guardada).
///
/// El backend puede mandar `user`, `username` o ambos.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthPayload {
    pub user: Option<String>,
    pub username: Option<String>,
    pub banco_id: Option<i64>,
    pub token: Option<String>,
    pub tech_number: Option<i64>,
}

impl AuthPayload {
    /// Normaliza a sesión; sin usuario o sin token no hay sesión
    pub fn into_session(self) -> Option<AuthSession> {
        let username = self
            .username
            .filter(|u| !u.is_empty())
            .or(self.user.filter(|u| !u.is_empty()))?;
        let token = self.token.filter(|t| !t.is_empty())?;
        Some(AuthSession {
            username,
            banco_id: self.banco_id.unwrap_or_default(),
            token,
            tech_number: self.tech_number.unwrap_or_default(),
        })
    }
}

/// Sesión autenticada persistida en el cliente
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub username: String,
    pub banco_id: i64,
    pub token: String,
    pub tech_number: i64,
}

impl AuthSession {
    /// Texto del banner: "Usuario: x · Banco n · Técnico m"
    pub fn banner(&self) -> String {
        format!(
            "Usuario: {} · Banco {} · Técnico {}",
            self.username, self.banco_id, self.tech_number
        )
    }
}

/// Banco de pruebas seleccionable en el login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banco {
    pub id: i64,
    pub name: String,
}

/// Catálogos de `GET /catalogs`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalogs {
    pub q3: Vec<f64>,
    pub alcance: Vec<i64>,
    pub pma: Vec<i64>,
    pub bancos: Vec<Banco>,
}

/// Alta de OI (`POST /oi`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OiCreate {
    pub code: String,
    pub q3: f64,
    pub alcance: i64,
    pub pma: i64,
    pub banco_id: i64,
    pub tech_number: i64,
}

/// OI leída del backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OiRead {
    pub id: i64,
    pub code: String,
    pub q3: f64,
    pub alcance: i64,
    pub pma: i64,
    pub presion_bar: f64,
    pub banco_id: i64,
    pub tech_number: i64,
}

/// OI completa con sus bancadas (`GET /oi/:id/full`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OiWithBancadas {
    #[serde(flatten)]
    pub oi: OiRead,
    #[serde(default)]
    pub bancadas: Vec<BancadaRead>,
}

/// Puntero local a la OI activa
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentOi {
    pub id: i64,
    pub code: String,
}

/// Cuerpo de `POST /oi/:id/excel`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcelRequest {
    pub password: String,
}

/// Clase de caudal con su bloque de mediciones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowClass {
    Q3,
    Q2,
    Q1,
}

impl FlowClass {
    pub const ALL: [FlowClass; 3] = [FlowClass::Q3, FlowClass::Q2, FlowClass::Q1];

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowClass::Q3 => "Q3",
            FlowClass::Q2 => "Q2",
            FlowClass::Q1 => "Q1",
        }
    }

    /// Columnas de la plantilla Excel (c1..c7)
    pub fn columns(&self) -> [&'static str; 7] {
        match self {
            FlowClass::Q3 => ["J", "K", "L", "M", "N", "O", "P"],
            FlowClass::Q2 => ["V", "W", "X", "Y", "Z", "AA", "AB"],
            FlowClass::Q1 => ["AH", "AI", "AJ", "AK", "AL", "AM", "AN"],
        }
    }
}

impl std::str::FromStr for FlowClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "q3" => Ok(FlowClass::Q3),
            "q2" => Ok(FlowClass::Q2),
            "q1" => Ok(FlowClass::Q1),
            _ => Err(format!("Clase desconocida: {}. Use q3, q2 o q1", s)),
        }
    }
}

/// Columna de un bloque Q (c1..c7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockField {
    Temperatura,
    PresionEntrada,
    PresionSalida,
    LimiteInferior,
    LimiteFinal,
    Volumen,
    Tiempo,
}

impl BlockField {
    pub const ALL: [BlockField; 7] = [
        BlockField::Temperatura,
        BlockField::PresionEntrada,
        BlockField::PresionSalida,
        BlockField::LimiteInferior,
        BlockField::LimiteFinal,
        BlockField::Volumen,
        BlockField::Tiempo,
    ];

    /// Posición 0..7 dentro del bloque
    pub fn index(&self) -> usize {
        match self {
            BlockField::Temperatura => 0,
            BlockField::PresionEntrada => 1,
            BlockField::PresionSalida => 2,
            BlockField::LimiteInferior => 3,
            BlockField::LimiteFinal => 4,
            BlockField::Volumen => 5,
            BlockField::Tiempo => 6,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BlockField::Temperatura => "Temperatura",
            BlockField::PresionEntrada => "P. Entrada",
            BlockField::PresionSalida => "P. Salida",
            BlockField::LimiteInferior => "L.I.",
            BlockField::LimiteFinal => "L.F.",
            BlockField::Volumen => "Vol. P",
            BlockField::Tiempo => "Tiempo",
        }
    }

    /// L.I. y L.F. se editan por fila y no se replican
    pub fn is_limit(&self) -> bool {
        matches!(self, BlockField::LimiteInferior | BlockField::LimiteFinal)
    }
}

impl std::str::FromStr for BlockField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "c1" | "temp" | "temperatura" => Ok(BlockField::Temperatura),
            "c2" | "pe" | "entrada" => Ok(BlockField::PresionEntrada),
            "c3" | "ps" | "salida" => Ok(BlockField::PresionSalida),
            "c4" | "li" => Ok(BlockField::LimiteInferior),
            "c5" | "lf" => Ok(BlockField::LimiteFinal),
            "c6" | "vol" | "volumen" => Ok(BlockField::Volumen),
            "c7" | "t" | "tiempo" => Ok(BlockField::Tiempo),
            _ => Err(format!("Columna desconocida: {}. Use c1..c7", s)),
        }
    }
}

/// Bloque de 7 columnas de una clase de caudal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QBlock {
    pub c1: Option<f64>,
    pub c2: Option<f64>,
    pub c3: Option<f64>,
    pub c4: Option<f64>,
    pub c5: Option<f64>,
    pub c6: Option<f64>,
    pub c7: Option<f64>,
}

impl QBlock {
    pub fn get(&self, field: BlockField) -> Option<f64> {
        match field {
            BlockField::Temperatura => self.c1,
            BlockField::PresionEntrada => self.c2,
            BlockField::PresionSalida => self.c3,
            BlockField::LimiteInferior => self.c4,
            BlockField::LimiteFinal => self.c5,
            BlockField::Volumen => self.c6,
            BlockField::Tiempo => self.c7,
        }
    }

    pub fn set(&mut self, field: BlockField, value: Option<f64>) {
        // NaN llega de inputs numéricos vacíos
        let value = value.filter(|v| v.is_finite());
        match field {
            BlockField::Temperatura => self.c1 = value,
            BlockField::PresionEntrada => self.c2 = value,
            BlockField::PresionSalida => self.c3 = value,
            BlockField::LimiteInferior => self.c4 = value,
            BlockField::LimiteFinal => self.c5 = value,
            BlockField::Volumen => self.c6 = value,
            BlockField::Tiempo => self.c7 = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        BlockField::ALL.iter().all(|f| self.get(*f).is_none())
    }
}

/// Fila de la mini-planilla de una bancada
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BancadaRow {
    pub medidor: Option<String>,
    pub q3: Option<QBlock>,
    pub q2: Option<QBlock>,
    pub q1: Option<QBlock>,
}

impl BancadaRow {
    pub fn block(&self, class: FlowClass) -> Option<&QBlock> {
        match class {
            FlowClass::Q3 => self.q3.as_ref(),
            FlowClass::Q2 => self.q2.as_ref(),
            FlowClass::Q1 => self.q1.as_ref(),
        }
    }

    /// Bloque mutable; se crea vacío si no existía
    pub fn block_mut(&mut self, class: FlowClass) -> &mut QBlock {
        let slot = match class {
            FlowClass::Q3 => &mut self.q3,
            FlowClass::Q2 => &mut self.q2,
            FlowClass::Q1 => &mut self.q1,
        };
        slot.get_or_insert_with(QBlock::default)
    }

    pub fn value(&self, class: FlowClass, field: BlockField) -> Option<f64> {
        self.block(class).and_then(|b| b.get(field))
    }

    pub fn set_value(&mut self, class: FlowClass, field: BlockField, value: Option<f64>) {
        self.block_mut(class).set(field, value);
    }

    /// Medidor sin espacios; vacío cuenta como ausente
    pub fn meter_id(&self) -> Option<&str> {
        self.medidor
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

/// Alta / reemplazo completo de una bancada
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BancadaCreate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medidor: Option<String>,
    pub estado: u8,
    pub rows: u32,
    pub rows_data: Vec<BancadaRow>,
}

/// Bancada leída del backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BancadaRead {
    pub id: i64,
    pub item: i64,
    #[serde(default)]
    pub medidor: Option<String>,
    #[serde(default)]
    pub estado: u8,
    #[serde(default = "default_rows")]
    pub rows: u32,
    #[serde(default, alias = "rowsData")]
    pub rows_data: Option<Vec<BancadaRow>>,
    #[serde(default)]
    pub q3: Option<QBlock>,
    #[serde(default)]
    pub q2: Option<QBlock>,
    #[serde(default)]
    pub q1: Option<QBlock>,
}

fn default_rows() -> u32 {
    crate::rules::DEFAULT_ROWS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_payload_prefers_username() {
        let payload: AuthPayload = serde_json::from_str(
            r#"{"user":"admin","username":"inspector","bancoId":3,"token":"t","techNumber":2}"#,
        )
        .unwrap();
        let session = payload.into_session().expect("sesión");
        assert_eq!(session.username, "inspector");
        assert_eq!(session.banco_id, 3);
        assert_eq!(session.tech_number, 2);
    }

    #[test]
    fn test_auth_payload_user_alias() {
        let payload: AuthPayload =
            serde_json::from_str(r#"{"user":"admin","bancoId":4,"token":"abc","techNumber":101}"#)
                .unwrap();
        assert_eq!(payload.into_session().unwrap().username, "admin");
    }

    #[test]
    fn test_auth_payload_without_token_is_no_session() {
        let payload: AuthPayload =
            serde_json::from_str(r#"{"username":"admin","bancoId":4,"token":""}"#).unwrap();
        assert!(payload.into_session().is_none());
    }

    #[test]
    fn test_login_input_serializes_camel_case() {
        let input = LoginInput {
            username: "admin".into(),
            password: "1234".into(),
            banco_id: 3,
        };
        let json = serde_json::to_string(&input).unwrap();
        assert!(json.contains("\"bancoId\":3"));
    }

    #[test]
    fn test_oi_with_bancadas_flatten() {
        let json = r#"{
            "id": 7, "code": "OI-0001-2025", "q3": 2.5, "alcance": 100,
            "pma": 16, "presion_bar": 25.6, "banco_id": 3, "tech_number": 2,
            "bancadas": [
                {"id": 1, "item": 1, "medidor": "M001", "estado": 0, "rows": 2,
                 "rows_data": [{"medidor": "M001", "q3": {"c1": 20.5}}, {"medidor": "M002"}]}
            ]
        }"#;
        let full: OiWithBancadas = serde_json::from_str(json).unwrap();
        assert_eq!(full.oi.id, 7);
        assert_eq!(full.bancadas.len(), 1);
        let rows = full.bancadas[0].rows_data.as_ref().unwrap();
        assert_eq!(rows[0].value(FlowClass::Q3, BlockField::Temperatura), Some(20.5));
        assert_eq!(rows[1].q3, None);
    }

    #[test]
    fn test_bancada_read_accepts_camel_rows_data() {
        let json = r#"{"id": 2, "item": 1, "rowsData": [{"medidor": "A1"}]}"#;
        let read: BancadaRead = serde_json::from_str(json).unwrap();
        assert_eq!(read.rows, 15);
        assert_eq!(read.estado, 0);
        assert_eq!(read.rows_data.unwrap()[0].medidor.as_deref(), Some("A1"));
    }

    #[test]
    fn test_qblock_set_drops_nan() {
        let mut block = QBlock::default();
        block.set(BlockField::Volumen, Some(f64::NAN));
        assert_eq!(block.c6, None);
        block.set(BlockField::Volumen, Some(10.0));
        assert_eq!(block.c6, Some(10.0));
        assert!(!block.is_empty());
    }

    #[test]
    fn test_block_field_from_str() {
        assert_eq!("c4".parse::<BlockField>().unwrap(), BlockField::LimiteInferior);
        assert_eq!("LF".parse::<BlockField>().unwrap(), BlockField::LimiteFinal);
        assert!("c8".parse::<BlockField>().is_err());
        assert!(BlockField::LimiteFinal.is_limit());
        assert!(!BlockField::Volumen.is_limit());
    }

    #[test]
    fn test_flow_class_columns() {
        assert_eq!(FlowClass::Q3.columns()[0], "J");
        assert_eq!(FlowClass::Q2.columns()[6], "AB");
        assert_eq!(FlowClass::Q1.columns()[0], "AH");
        assert_eq!("Q2".parse::<FlowClass>().unwrap(), FlowClass::Q2);
    }

    #[test]
    fn test_meter_id_blank_is_none() {
        let row = BancadaRow {
            medidor: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(row.meter_id(), None);
    }
}
